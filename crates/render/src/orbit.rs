use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Orbit controller limits and feel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Polar angle range in radians, measured from +Y.
    pub min_polar: f32,
    pub max_polar: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_polar: 0.0,
            max_polar: PI,
            enable_pan: true,
            enable_zoom: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
        }
    }
}

/// Spherical coordinates around the orbit target. `theta` is the azimuth
/// around +Y measured from +Z; `phi` is the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius < EPS {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Perspective camera orbiting a target point.
///
/// Pointer drags accumulate a pending rotation; [`OrbitCamera::update`]
/// applies it once per frame. With damping on, only a fraction of the
/// pending rotation is applied per update and the rest decays, so the
/// camera keeps drifting briefly after the drag ends.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub settings: OrbitSettings,
    pending: Spherical,
    projection: Mat4,
}

impl OrbitCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            fov,
            aspect,
            near,
            far,
            settings: OrbitSettings::default(),
            pending: Spherical {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            },
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn with_settings(mut self, settings: OrbitSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Place the camera at `target + offset`, looking at `target`.
    pub fn look_at_from(&mut self, target: Vec3, offset: Vec3) {
        self.target = target;
        self.position = target + offset;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        tracing::debug!(aspect, "camera aspect changed");
        self.aspect = aspect;
        self.update_projection();
    }

    /// Recompute the cached projection matrix from fov, aspect and clip
    /// planes.
    pub fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect.max(EPS), self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn spherical(&self) -> Spherical {
        Spherical::from_offset(self.position - self.target)
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels on a
    /// surface `viewport_height` pixels tall. A drag across the full height
    /// turns one full revolution.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        let speed = self.settings.rotate_speed;
        self.pending.theta -= TAU * dx / h * speed;
        self.pending.phi -= TAU * dy / h * speed;
    }

    /// Returns false when zoom is disabled.
    pub fn zoom(&mut self, scale: f32) -> bool {
        if !self.settings.enable_zoom || !(scale > 0.0) {
            return false;
        }
        let offset = self.position - self.target;
        self.position = self.target + offset * scale;
        true
    }

    /// Returns false when panning is disabled.
    pub fn pan(&mut self, delta: Vec3) -> bool {
        if !self.settings.enable_pan {
            return false;
        }
        self.position += delta;
        self.target += delta;
        true
    }

    /// Rotation still waiting to be applied, in radians.
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.pending.theta, self.pending.phi)
    }

    /// Apply the pending rotation, clamp the polar angle and, with damping,
    /// decay what remains. Returns true if the camera moved.
    pub fn update(&mut self) -> bool {
        let before = self.position;
        let mut s = self.spherical();
        let settings = self.settings;
        let step = if settings.enable_damping {
            settings.damping_factor
        } else {
            1.0
        };

        s.theta += self.pending.theta * step;
        let requested_phi = s.phi + self.pending.phi * step;
        s.phi = requested_phi
            .max(settings.min_polar)
            .min(settings.max_polar)
            .max(EPS)
            .min(PI - EPS);
        if s.phi != requested_phi {
            tracing::trace!(phi = s.phi, requested = requested_phi, "polar angle clamped");
        }
        self.position = self.target + s.to_offset();

        let keep = 1.0 - step;
        self.pending.theta *= keep;
        self.pending.phi *= keep;

        self.position.distance(before) > 1e-4
    }
}
