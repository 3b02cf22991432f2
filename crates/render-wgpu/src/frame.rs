use bytemuck::{Pod, Zeroable};
use carscene_common::{Color, GeometryHandle, MaterialHandle};
use carscene_geometry::{MaterialKind, Side};
use carscene_render::{OrbitCamera, Renderer};
use carscene_scene::{NodeKind, Scene};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;

pub(crate) const SHADING_PHONG: f32 = 0.0;
pub(crate) const SHADING_TOON: f32 = 1.0;
pub(crate) const SHADING_BASIC: f32 = 2.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Unit vector from the surface toward the light; `w` is 1 when a light
    /// is present.
    pub light_dir: [f32; 4],
    /// Light color premultiplied by intensity.
    pub light_color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    /// x: shading model, y: shininess, z: 1 when double sided.
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// A run of instances drawn with one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub first_instance: u32,
    pub instance_count: u32,
}

/// Everything the GPU needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub uniforms: Uniforms,
    pub instances: Vec<InstanceData>,
    pub batches: Vec<DrawBatch>,
    pub lines: Vec<LineVertex>,
}

/// Plans a frame from the scene: instanced mesh batches, light uniforms and
/// helper lines.
#[derive(Debug, Default)]
pub struct FrameBuilder;

impl FrameBuilder {
    pub fn new() -> Self {
        Self
    }
}

/// Colors are authored as sRGB hex values; shading happens in linear space.
pub(crate) fn srgb_to_linear(c: Color) -> Color {
    let channel = |v: f32| {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    Color::rgb(channel(c.r), channel(c.g), channel(c.b))
}

fn instance(world: Mat4, color: Color, kind: MaterialKind, side: Side) -> InstanceData {
    let cols = world.to_cols_array_2d();
    let (shading, shininess) = match kind {
        MaterialKind::Phong { shininess } => (SHADING_PHONG, shininess),
        MaterialKind::Toon => (SHADING_TOON, 0.0),
        MaterialKind::LineBasic => (SHADING_BASIC, 0.0),
    };
    let double = if side == Side::Double { 1.0 } else { 0.0 };
    InstanceData {
        model_0: cols[0],
        model_1: cols[1],
        model_2: cols[2],
        model_3: cols[3],
        color: srgb_to_linear(color).to_array(1.0),
        params: [shading, shininess, double, 0.0],
    }
}

/// Square of half-width `size` facing `target`, plus a line to the target.
fn helper_lines(position: Vec3, target: Vec3, size: f32, color: Color) -> Vec<LineVertex> {
    let dir = (target - position).normalize_or_zero();
    let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    let u = dir.cross(up).normalize_or_zero() * size;
    let v = u.cross(dir).normalize_or_zero() * size;
    let corners = [
        position - u + v,
        position + u + v,
        position + u - v,
        position - u - v,
    ];
    let color = srgb_to_linear(color).to_array(1.0);
    let vertex = |p: Vec3| LineVertex {
        position: p.to_array(),
        color,
    };
    let mut lines = Vec::with_capacity(10);
    for i in 0..4 {
        lines.push(vertex(corners[i]));
        lines.push(vertex(corners[(i + 1) % 4]));
    }
    lines.push(vertex(position));
    lines.push(vertex(target));
    lines
}

impl Renderer for FrameBuilder {
    type Output = FrameData;

    fn render(&self, scene: &Scene, camera: &OrbitCamera) -> FrameData {
        let mut groups: BTreeMap<(GeometryHandle, MaterialHandle), Vec<InstanceData>> =
            BTreeMap::new();
        let mut light: Option<(Vec3, Vec3, Color, f32)> = None;
        let mut lines = Vec::new();

        let walk = scene.walk();
        for (_, node, world) in &walk {
            match &node.kind {
                NodeKind::Mesh { geometry, material } => {
                    let Some(mat) = scene.assets().material(*material) else {
                        continue;
                    };
                    groups
                        .entry((*geometry, *material))
                        .or_default()
                        .push(instance(*world, mat.color, mat.kind, mat.side));
                }
                NodeKind::DirectionalLight {
                    color,
                    intensity,
                    target,
                } => {
                    // first visible light wins
                    if light.is_none() {
                        let position = world.transform_point3(Vec3::ZERO);
                        light = Some((position, *target, *color, *intensity));
                    }
                }
                NodeKind::Group | NodeKind::LightHelper { .. } => {}
            }
        }

        for (_, node, _) in &walk {
            if let NodeKind::LightHelper {
                light: light_id,
                size,
                material,
            } = node.kind
            {
                let (Some(source), Some(mat)) =
                    (scene.get(light_id), scene.assets().material(material))
                else {
                    continue;
                };
                if let NodeKind::DirectionalLight { target, .. } = source.kind {
                    let Ok(position) = scene.world_position(light_id) else {
                        continue;
                    };
                    lines.extend(helper_lines(position, target, size, mat.color));
                }
            }
        }

        let mut instances = Vec::new();
        let mut batches = Vec::with_capacity(groups.len());
        for ((geometry, material), group) in groups {
            batches.push(DrawBatch {
                geometry,
                material,
                first_instance: instances.len() as u32,
                instance_count: group.len() as u32,
            });
            instances.extend(group);
        }

        let (light_dir, light_color) = match light {
            Some((position, target, color, intensity)) => {
                let color = srgb_to_linear(color);
                let dir = (position - target).normalize_or_zero();
                (
                    dir.extend(1.0).to_array(),
                    [color.r * intensity, color.g * intensity, color.b * intensity, 1.0],
                )
            }
            None => ([0.0, 1.0, 0.0, 0.0], [0.0; 4]),
        };

        FrameData {
            uniforms: Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                camera_pos: camera.position.extend(1.0).to_array(),
                light_dir,
                light_color,
            },
            instances,
            batches,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carscene_common::Transform;
    use carscene_geometry::{CylinderParams, Material, cylinder, plane};

    fn camera() -> OrbitCamera {
        let mut camera = OrbitCamera::new(75.0, 1.5, 0.1, 1000.0);
        camera.look_at_from(Vec3::ZERO, Vec3::new(0.0, 50.0, -120.0));
        camera
    }

    #[test]
    fn shared_geometry_becomes_one_batch() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(cylinder(&CylinderParams::new(5.0, 3.0, 10)).unwrap());
        let material = scene.add_material(Material::toon("tire", Color::BLACK));
        let group = scene.create_group("wheels");
        scene.add_to_root(group).unwrap();
        for i in 0..4 {
            let wheel = scene.create_mesh(format!("wheel{i}"), geometry, material).unwrap();
            scene.add(Some(group), wheel).unwrap();
        }

        let frame = FrameBuilder::new().render(&scene, &camera());
        assert_eq!(frame.batches.len(), 1);
        assert_eq!(frame.batches[0].instance_count, 4);
        assert_eq!(frame.instances.len(), 4);
        assert_eq!(frame.instances[0].params[0], SHADING_TOON);
    }

    #[test]
    fn instances_carry_world_matrix_and_side() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(plane(10.0, 10.0).unwrap());
        let material =
            scene.add_material(Material::phong("ground", Color::from_hex(0x999999)).double_sided());
        let parent = scene.create_group("offset");
        scene
            .set_transform(parent, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        scene.add_to_root(parent).unwrap();
        let ground = scene.create_mesh("ground", geometry, material).unwrap();
        scene.add(Some(parent), ground).unwrap();

        let frame = FrameBuilder::new().render(&scene, &camera());
        let inst = frame.instances[0];
        assert_eq!(inst.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(inst.params, [SHADING_PHONG, 30.0, 1.0, 0.0]);
    }

    #[test]
    fn light_uniforms_and_helper_lines() {
        let mut scene = Scene::new();
        let light = scene.create(
            "sun",
            NodeKind::DirectionalLight {
                color: Color::WHITE,
                intensity: 1.3,
                target: Vec3::new(0.0, 20.0, 0.0),
            },
        );
        scene
            .set_transform(light, Transform::from_position(Vec3::new(20.0, 80.0, 50.0)))
            .unwrap();
        scene.add_to_root(light).unwrap();
        let helper_material =
            scene.add_material(Material::line_basic("sun helper", Color::from_hex(0xffff00)));
        let helper = scene
            .create_light_helper("sun helper", light, 5.0, helper_material)
            .unwrap();
        scene.add_to_root(helper).unwrap();

        let frame = FrameBuilder::new().render(&scene, &camera());
        let dir = Vec3::new(20.0, 60.0, 50.0).normalize();
        let got = Vec3::new(
            frame.uniforms.light_dir[0],
            frame.uniforms.light_dir[1],
            frame.uniforms.light_dir[2],
        );
        assert!((got - dir).length() < 1e-5);
        assert_eq!(frame.uniforms.light_dir[3], 1.0);
        assert!((frame.uniforms.light_color[0] - 1.3).abs() < 1e-6);
        // four square edges and the target line
        assert_eq!(frame.lines.len(), 10);
        assert_eq!(frame.lines[9].position, [0.0, 20.0, 0.0]);
        // helper lines take the helper material's colour, not the light's
        assert_eq!(frame.lines[0].color, [1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn line_basic_mesh_is_unlit() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(plane(1.0, 1.0).unwrap());
        let material = scene.add_material(Material::line_basic("marker", Color::WHITE));
        let marker = scene.create_mesh("marker", geometry, material).unwrap();
        scene.add_to_root(marker).unwrap();

        let frame = FrameBuilder::new().render(&scene, &camera());
        assert_eq!(frame.instances[0].params[0], SHADING_BASIC);
    }

    #[test]
    fn unlit_scene_has_zero_light() {
        let frame = FrameBuilder::new().render(&Scene::new(), &camera());
        assert_eq!(frame.uniforms.light_dir[3], 0.0);
        assert_eq!(frame.uniforms.light_color, [0.0; 4]);
        assert!(frame.batches.is_empty());
        assert!(frame.lines.is_empty());
    }

    #[test]
    fn srgb_conversion_endpoints() {
        assert_eq!(srgb_to_linear(Color::BLACK), Color::BLACK);
        assert!((srgb_to_linear(Color::WHITE).r - 1.0).abs() < 1e-6);
        let mid = srgb_to_linear(Color::from_hex(0x808080));
        assert!((mid.g - 0.2158605).abs() < 1e-4);
    }

    #[test]
    fn helper_square_is_perpendicular_to_light() {
        let lines = helper_lines(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 5.0, Color::WHITE);
        for v in &lines[..8] {
            assert!((v.position[1] - 10.0).abs() < 1e-5);
        }
        let a = Vec3::from_array(lines[0].position);
        let b = Vec3::from_array(lines[1].position);
        assert!((a.distance(b) - 10.0).abs() < 1e-4);
    }
}
