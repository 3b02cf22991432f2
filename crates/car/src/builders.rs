//! Builders for the stock scene: ground, car body, wheels and lights.
//!
//! Each builder registers its geometry and materials with the scene,
//! creates the nodes and attaches them. All of them return the ids of what
//! they created so the caller can animate or inspect it.

use carscene_common::{Color, NodeId, Transform, radians};
use carscene_geometry::{
    CylinderParams, ExtrudeSettings, GeometryError, Material, Shape, cylinder, extrude, plane,
};
use carscene_scene::{NodeKind, Scene, SceneError};
use glam::Vec3;

pub const GROUND_SIZE: f32 = 10_000.0;
pub const GROUND_COLOR: u32 = 0x999999;

pub const BODY_COLOR: u32 = 0xc0c0c0;
/// Where both body meshes sit inside the car group.
pub const BODY_OFFSET: Vec3 = Vec3::new(-4.0, 5.0, -9.0);
/// Cabin outline `(width, length)` and extrusion depth.
pub const CABIN: (f32, f32, f32) = (8.0, 12.0, 16.0);
/// Chassis outline `(width, length)` and extrusion depth.
pub const CHASSIS: (f32, f32, f32) = (8.0, 4.0, 22.0);

pub const WHEEL_RADIUS: f32 = 5.0;
pub const WHEEL_WIDTH: f32 = 3.0;
pub const WHEEL_SEGMENTS: u32 = 10;
pub const WHEEL_OFFSETS: [Vec3; 4] = [
    Vec3::new(-8.5, 5.0, 8.0),
    Vec3::new(8.5, 5.0, 8.0),
    Vec3::new(-8.5, 5.0, -8.0),
    Vec3::new(8.5, 5.0, -8.0),
];

pub const LIGHT_INTENSITY: f32 = 1.3;
pub const LIGHT_POSITION: Vec3 = Vec3::new(20.0, 80.0, 50.0);
pub const LIGHT_TARGET: Vec3 = Vec3::new(0.0, 20.0, 0.0);
pub const LIGHT_HELPER_SIZE: f32 = 5.0;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// The car group and the two body meshes it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarBody {
    pub car: NodeId,
    pub cabin: NodeId,
    pub chassis: NodeId,
}

/// The wheel group and its four wheels, in [`WHEEL_OFFSETS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelSet {
    pub group: NodeId,
    pub wheels: [NodeId; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightRig {
    pub light: NodeId,
    pub helper: NodeId,
}

fn body_extrusion(depth: f32) -> ExtrudeSettings {
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

/// A horizontal ground plane through the origin.
pub fn build_ground(scene: &mut Scene) -> Result<NodeId, BuildError> {
    let geometry = scene.add_geometry(plane(GROUND_SIZE, GROUND_SIZE)?);
    let material =
        scene.add_material(Material::phong("ground", Color::from_hex(GROUND_COLOR)).double_sided());
    let ground = scene.create_mesh("ground", geometry, material)?;
    scene.set_transform(
        ground,
        Transform::default().with_rotation(Vec3::new(radians(-90.0), 0.0, 0.0)),
    )?;
    scene.add_to_root(ground)?;
    tracing::debug!(%ground, "built ground");
    Ok(ground)
}

/// The car group holding the extruded cabin and chassis, attached to the
/// scene root.
pub fn build_car_body(scene: &mut Scene) -> Result<CarBody, BuildError> {
    let (cabin_w, cabin_l, cabin_d) = CABIN;
    let (chassis_w, chassis_l, chassis_d) = CHASSIS;
    let cabin_mesh = extrude(&Shape::rectangle(cabin_w, cabin_l), &body_extrusion(cabin_d))?;
    let chassis_mesh = extrude(
        &Shape::rectangle(chassis_w, chassis_l),
        &body_extrusion(chassis_d),
    )?;

    let cabin_geometry = scene.add_geometry(cabin_mesh);
    let chassis_geometry = scene.add_geometry(chassis_mesh);
    let material = scene.add_material(Material::phong("body", Color::from_hex(BODY_COLOR)));

    let car = scene.create_group("car");
    let cabin = scene.create_mesh("cabin", cabin_geometry, material)?;
    let chassis = scene.create_mesh("chassis", chassis_geometry, material)?;
    for part in [cabin, chassis] {
        scene.set_position(part, BODY_OFFSET)?;
        scene.add(Some(car), part)?;
    }
    scene.add_to_root(car)?;
    tracing::debug!(%car, %cabin, %chassis, "built car body");
    Ok(CarBody {
        car,
        cabin,
        chassis,
    })
}

/// Four wheels sharing one cylinder and one toon material, grouped and
/// attached under `car`.
pub fn build_wheels(scene: &mut Scene, car: NodeId) -> Result<WheelSet, BuildError> {
    // fail before registering assets when the parent is missing
    if scene.get(car).is_none() {
        return Err(SceneError::NodeNotFound(car).into());
    }
    let geometry = scene.add_geometry(cylinder(&CylinderParams::new(
        WHEEL_RADIUS,
        WHEEL_WIDTH,
        WHEEL_SEGMENTS,
    ))?);
    let material = scene.add_material(Material::toon("tire", Color::BLACK));

    let group = scene.create_group("wheels");
    let mut wheels = [NodeId(0); 4];
    for (slot, offset) in wheels.iter_mut().zip(WHEEL_OFFSETS) {
        let wheel = scene.create_mesh("wheel", geometry, material)?;
        scene.set_transform(
            wheel,
            Transform::from_position(offset).with_rotation(Vec3::new(0.0, 0.0, radians(90.0))),
        )?;
        scene.add(Some(group), wheel)?;
        *slot = wheel;
    }
    scene.add(Some(car), group)?;
    tracing::debug!(%group, "built wheels");
    Ok(WheelSet { group, wheels })
}

/// A white directional light and a helper outlining it with a line material.
pub fn build_lights(scene: &mut Scene) -> Result<LightRig, BuildError> {
    let light = scene.create(
        "sun",
        NodeKind::DirectionalLight {
            color: Color::WHITE,
            intensity: LIGHT_INTENSITY,
            target: LIGHT_TARGET,
        },
    );
    scene.set_position(light, LIGHT_POSITION)?;
    scene.add_to_root(light)?;
    let helper_material = scene.add_material(Material::line_basic("sun helper", Color::WHITE));
    let helper =
        scene.create_light_helper("sun helper", light, LIGHT_HELPER_SIZE, helper_material)?;
    scene.add_to_root(helper)?;
    tracing::debug!(%light, %helper, "built lights");
    Ok(LightRig { light, helper })
}
