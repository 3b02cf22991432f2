use crate::bootstrap::{SceneRig, init_camera, init_scene};
use crate::clock::FrameClock;
use crate::config::SceneConfig;
use crate::motion::apply_action;
use carscene_common::Transform;
use carscene_input::{Action, InputState, KeyId, KeyMap};
use carscene_render::OrbitCamera;
use carscene_scene::Scene;
use glam::Vec3;

/// Zoom factor for one wheel notch.
const ZOOM_STEP: f32 = 0.95;

/// Drawable surface size in physical pixels. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Everything the frame loop mutates: the scene, the ids of the car rig,
/// input, camera and viewport.
pub struct AppState {
    pub scene: Scene,
    pub rig: SceneRig,
    pub input: InputState,
    pub keymap: KeyMap,
    pub camera: OrbitCamera,
    viewport: Viewport,
    clock: FrameClock,
    ticks: u64,
    frames: u64,
}

impl AppState {
    /// Build the stock scene for a surface of `width` x `height`.
    pub fn new(config: &SceneConfig, width: u32, height: u32) -> Self {
        let mut scene = Scene::new();
        let rig = init_scene(&mut scene, config);
        let viewport = Viewport::new(width, height);
        let camera = init_camera(config, &scene, &rig, viewport);
        Self {
            scene,
            rig,
            input: InputState::new(),
            keymap: KeyMap::default(),
            camera,
            viewport,
            clock: FrameClock::new(config.tick_rate_hz),
            ticks: 0,
            frames: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn key_down(&mut self, key: KeyId) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self) {
        self.input.key_up();
    }

    /// Whether `key` is mapped to an action.
    pub fn is_bound(&self, key: &KeyId) -> bool {
        self.keymap.resolve(key).is_some()
    }

    /// Run one fixed motion tick. Returns the action applied, if any.
    pub fn tick(&mut self) -> Option<Action> {
        self.ticks += 1;
        let action = self.input.current_action(&self.keymap)?;
        let body = self.rig.body?;
        if let Err(e) = apply_action(&mut self.scene, &body, self.rig.wheels.as_ref(), action) {
            tracing::error!("apply_action() : {e}");
            return None;
        }
        Some(action)
    }

    /// Advance one rendered frame by `dt` seconds: run the ticks that are
    /// due, then refresh the camera. Returns the number of ticks run.
    pub fn frame(&mut self, dt: f64) -> u32 {
        let due = self.clock.advance(dt);
        for _ in 0..due {
            self.tick();
        }
        self.camera.update_projection();
        self.camera.update();
        self.frames += 1;
        due
    }

    /// Store the new surface size and match the camera aspect to it.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport.aspect());
        tracing::debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            "viewport resized"
        );
    }

    /// Orbit the camera by a pointer drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.camera
            .rotate_by_pixels(dx, dy, self.viewport.height as f32);
    }

    /// Dolly toward the target by `lines` wheel notches; negative dollies
    /// out. Returns false when zoom is disabled.
    pub fn scroll(&mut self, lines: f32) -> bool {
        self.camera.zoom(ZOOM_STEP.powf(lines))
    }

    /// Pan camera and target so the point under the cursor follows a drag
    /// of `(dx, dy)` pixels. Returns false when panning is disabled.
    pub fn pan_drag(&mut self, dx: f32, dy: f32) -> bool {
        let camera = &self.camera;
        let distance = camera.position.distance(camera.target);
        let per_pixel =
            2.0 * distance * (camera.fov.to_radians() * 0.5).tan() / self.viewport.height as f32;
        let eye_to_world = camera.view_matrix().inverse();
        let right = eye_to_world.transform_vector3(Vec3::X);
        let up = eye_to_world.transform_vector3(Vec3::Y);
        self.camera.pan((up * dy - right * dx) * per_pixel)
    }

    /// The car group's local transform, if the car was built.
    pub fn car_transform(&self) -> Option<Transform> {
        let body = self.rig.body?;
        self.scene.transform(body.car).ok()
    }
}
