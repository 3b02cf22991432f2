use crate::shape::{Shape, triangulate};
use crate::{GeometryError, MeshData};
use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Settings for sweeping a [`Shape`] along +Z.
///
/// Bevels are generated as quarter-circle profiles: each of the
/// `bevel_segments` rings moves `bevel_thickness * cos(t)` outward along Z
/// while the outline grows by `bevel_size * sin(t) + bevel_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    pub steps: u32,
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            steps: 1,
            depth: 1.0,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

impl ExtrudeSettings {
    fn validate(&self) -> Result<(), GeometryError> {
        if self.steps == 0 {
            return Err(GeometryError::InvalidParameter {
                name: "steps",
                reason: "must be at least 1",
            });
        }
        if !(self.depth > 0.0 && self.depth.is_finite()) {
            return Err(GeometryError::InvalidParameter {
                name: "depth",
                reason: "must be positive and finite",
            });
        }
        if self.bevel_enabled {
            if self.bevel_segments == 0 {
                return Err(GeometryError::InvalidParameter {
                    name: "bevel_segments",
                    reason: "must be at least 1 when bevelling",
                });
            }
            if !(self.bevel_thickness >= 0.0 && self.bevel_thickness.is_finite()) {
                return Err(GeometryError::InvalidParameter {
                    name: "bevel_thickness",
                    reason: "must be non-negative and finite",
                });
            }
            if !(self.bevel_size.is_finite() && self.bevel_offset.is_finite()) {
                return Err(GeometryError::InvalidParameter {
                    name: "bevel_size",
                    reason: "must be finite",
                });
            }
        }
        Ok(())
    }

    /// Ring layout along Z as `(z, outward expansion)`, front to back.
    fn rings(&self) -> Vec<(f32, f32)> {
        let (segments, thickness, size, offset) = if self.bevel_enabled {
            (
                self.bevel_segments,
                self.bevel_thickness,
                self.bevel_size,
                self.bevel_offset,
            )
        } else {
            (0, 0.0, 0.0, 0.0)
        };
        let bevel = |b: u32| {
            let t = b as f32 / segments as f32 * FRAC_PI_2;
            (thickness * t.cos(), size * t.sin() + offset)
        };

        let mut rings = Vec::with_capacity((2 * segments + self.steps + 1) as usize);
        for b in 0..segments {
            let (z, grow) = bevel(b);
            rings.push((-z, grow));
        }
        for s in 0..=self.steps {
            rings.push((self.depth * s as f32 / self.steps as f32, size + offset));
        }
        for b in (0..segments).rev() {
            let (z, grow) = bevel(b);
            rings.push((self.depth + z, grow));
        }
        rings
    }
}

/// Outward miter direction at `pt` for a counter-clockwise outline, scaled so
/// both adjacent edges move out by exactly one unit.
fn bevel_vec(prev: Vec2, pt: Vec2, next: Vec2) -> Vec2 {
    let outward = |d: Vec2| Vec2::new(d.y, -d.x).normalize_or_zero();
    let n1 = outward(pt - prev);
    let n2 = outward(next - pt);
    let denom = 1.0 + n1.dot(n2);
    if denom.abs() < 1e-6 {
        n1
    } else {
        (n1 + n2) / denom
    }
}

/// Extrude a shape into a closed solid with optional bevelled edges.
///
/// The front cap sits at `z = -bevel_thickness` and the back cap at
/// `z = depth + bevel_thickness`; side walls are flat shaded.
pub fn extrude(shape: &Shape, settings: &ExtrudeSettings) -> Result<MeshData, GeometryError> {
    settings.validate()?;
    let outline = shape.outline()?;
    let caps = triangulate(&outline)?;
    let n = outline.len();

    let movements: Vec<Vec2> = (0..n)
        .map(|i| bevel_vec(outline[(i + n - 1) % n], outline[i], outline[(i + 1) % n]))
        .collect();

    let rings: Vec<Vec<Vec3>> = settings
        .rings()
        .into_iter()
        .map(|(z, grow)| {
            outline
                .iter()
                .zip(&movements)
                .map(|(p, m)| (*p + *m * grow).extend(z))
                .collect()
        })
        .collect();

    let mut mesh = MeshData::new();

    let front = &rings[0];
    for [a, b, c] in &caps {
        mesh.push_triangle(front[*a], front[*c], front[*b]);
    }
    let back = &rings[rings.len() - 1];
    for [a, b, c] in &caps {
        mesh.push_triangle(back[*a], back[*b], back[*c]);
    }

    for pair in rings.windows(2) {
        let (near, far) = (&pair[0], &pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.push_quad(near[i], near[j], far[j], far[i]);
        }
    }

    tracing::debug!(
        outline_points = n,
        rings = rings.len(),
        triangles = mesh.triangle_count(),
        "extruded shape"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car_settings(depth: f32) -> ExtrudeSettings {
        ExtrudeSettings {
            steps: 1,
            depth,
            bevel_enabled: true,
            bevel_thickness: 7.0,
            bevel_size: 2.0,
            bevel_offset: 1.0,
            bevel_segments: 3,
        }
    }

    #[test]
    fn ring_count_and_order() {
        let rings = car_settings(16.0).rings();
        // 3 front bevel rings + 2 step rings + 3 back bevel rings
        assert_eq!(rings.len(), 8);
        assert_eq!(rings[0], (-7.0, 1.0));
        assert_eq!(rings[rings.len() - 1], (23.0, 1.0));
        for pair in rings.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn bevelled_rectangle_bounds() {
        let mesh = extrude(&Shape::rectangle(8.0, 12.0), &car_settings(16.0)).unwrap();
        let b = mesh.bounds().unwrap();
        let grow = 2.0 + 1.0;
        assert!((b.min - Vec3::new(-grow, -grow, -7.0)).length() < 1e-4);
        assert!((b.max - Vec3::new(8.0 + grow, 12.0 + grow, 16.0 + 7.0)).length() < 1e-4);
    }

    #[test]
    fn extruded_solid_is_closed_and_outward() {
        let mesh = extrude(&Shape::rectangle(8.0, 4.0), &car_settings(22.0)).unwrap();
        assert!(mesh.signed_volume() > 0.0);
        // front and back caps face away from the body
        assert!((mesh.face_normal(0) - Vec3::NEG_Z).length() < 1e-6);
        assert!((mesh.face_normal(2) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn triangle_count_matches_layout() {
        let mesh = extrude(&Shape::rectangle(8.0, 4.0), &car_settings(22.0)).unwrap();
        // 2 caps * 2 triangles + 7 ring gaps * 4 edges * 2 triangles
        assert_eq!(mesh.triangle_count(), 4 + 7 * 4 * 2);
    }

    #[test]
    fn without_bevel_is_a_plain_prism() {
        let settings = ExtrudeSettings {
            depth: 5.0,
            bevel_enabled: false,
            ..ExtrudeSettings::default()
        };
        let mesh = extrude(&Shape::rectangle(2.0, 3.0), &settings).unwrap();
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::new(2.0, 3.0, 5.0));
        assert!((mesh.signed_volume() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn invalid_settings_rejected() {
        let shape = Shape::rectangle(1.0, 1.0);
        let zero_steps = ExtrudeSettings {
            steps: 0,
            ..ExtrudeSettings::default()
        };
        assert!(matches!(
            extrude(&shape, &zero_steps),
            Err(GeometryError::InvalidParameter { name: "steps", .. })
        ));
        let negative_depth = ExtrudeSettings {
            depth: -1.0,
            ..ExtrudeSettings::default()
        };
        assert!(extrude(&shape, &negative_depth).is_err());
    }

    #[test]
    fn miter_on_square_corner() {
        let v = bevel_vec(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0));
        assert!((v - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }
}
