//! Startup: build the stock scene and the camera that frames it.

use crate::app::Viewport;
use crate::builders::{
    BuildError, CarBody, LightRig, WheelSet, build_car_body, build_ground, build_lights,
    build_wheels,
};
use crate::config::SceneConfig;
use carscene_common::NodeId;
use carscene_render::OrbitCamera;
use carscene_scene::Scene;
use glam::Vec3;

/// Ids of everything the startup sequence managed to build. A builder that
/// failed leaves its slot empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneRig {
    pub ground: Option<NodeId>,
    pub body: Option<CarBody>,
    pub wheels: Option<WheelSet>,
    pub lights: Option<LightRig>,
}

impl SceneRig {
    pub fn is_complete(&self, lights_expected: bool) -> bool {
        self.ground.is_some()
            && self.body.is_some()
            && self.wheels.is_some()
            && (self.lights.is_some() || !lights_expected)
    }
}

/// Log a failed builder as `name() : error` and carry on without it.
fn logged<T>(name: &str, result: Result<T, BuildError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("{name}() : {e}");
            None
        }
    }
}

/// Wheels under the car group, or nothing when the car was not built.
fn attach_wheels(scene: &mut Scene, body: Option<CarBody>) -> Option<WheelSet> {
    match body {
        Some(body) => logged("build_wheels", build_wheels(scene, body.car)),
        None => {
            tracing::error!("build_wheels() : no car group to attach to");
            None
        }
    }
}

/// Run every builder against `scene`. Failures are logged and skipped so
/// startup always completes with whatever could be built.
pub fn init_scene(scene: &mut Scene, config: &SceneConfig) -> SceneRig {
    let rig = SceneRig {
        ground: logged("build_ground", build_ground(scene)),
        body: logged("build_car_body", build_car_body(scene)),
        ..SceneRig::default()
    };
    finish_scene(scene, config, rig)
}

/// Builders that run after the ground and the car body, whether or not
/// those succeeded.
fn finish_scene(scene: &mut Scene, config: &SceneConfig, mut rig: SceneRig) -> SceneRig {
    rig.wheels = attach_wheels(scene, rig.body);
    if config.lights {
        rig.lights = logged("build_lights", build_lights(scene));
    }
    tracing::info!(
        nodes = scene.node_count(),
        complete = rig.is_complete(config.lights),
        "scene initialised"
    );
    rig
}

/// Camera at the configured offset from the car, looking at it, with the
/// configured orbit limits.
pub fn init_camera(
    config: &SceneConfig,
    scene: &Scene,
    rig: &SceneRig,
    viewport: Viewport,
) -> OrbitCamera {
    let cam = &config.camera;
    let mut camera = OrbitCamera::new(cam.fov, viewport.aspect(), cam.near, cam.far)
        .with_settings(config.controls.orbit_settings());
    let target = rig
        .body
        .and_then(|body| scene.world_position(body.car).ok())
        .unwrap_or(Vec3::ZERO);
    camera.look_at_from(target, Vec3::from_array(cam.offset));
    camera
}

#[cfg(test)]
mod tests {
    use super::*;
    use carscene_scene::NodeKind;

    #[test]
    fn stock_scene_is_complete() {
        let mut scene = Scene::new();
        let rig = init_scene(&mut scene, &SceneConfig::default());
        assert!(rig.is_complete(true));
        // ground, car, cabin, chassis, wheel group, 4 wheels, light, helper
        assert_eq!(scene.node_count(), 11);
        assert_eq!(scene.roots().len(), 4);
    }

    #[test]
    fn car_layout_after_startup() {
        let mut scene = Scene::new();
        let rig = init_scene(&mut scene, &SceneConfig::default());
        let body = rig.body.unwrap();
        let wheels = rig.wheels.unwrap();

        let children = scene.children(body.car).unwrap();
        assert_eq!(children, &[body.cabin, body.chassis, wheels.group]);
        let meshes = children
            .iter()
            .filter(|id| scene.get(**id).unwrap().is_mesh())
            .count();
        assert_eq!(meshes, 2);
        assert_eq!(scene.children(wheels.group).unwrap().len(), 4);
    }

    #[test]
    fn lights_can_be_disabled() {
        let mut scene = Scene::new();
        let config = SceneConfig {
            lights: false,
            ..SceneConfig::default()
        };
        let rig = init_scene(&mut scene, &config);
        assert!(rig.lights.is_none());
        assert!(rig.is_complete(false));
        assert!(
            !scene
                .nodes()
                .values()
                .any(|n| matches!(n.kind, NodeKind::DirectionalLight { .. }))
        );
    }

    #[test]
    fn camera_frames_the_car() {
        let mut scene = Scene::new();
        let config = SceneConfig::default();
        let rig = init_scene(&mut scene, &config);
        let camera = init_camera(&config, &scene, &rig, Viewport::new(800, 600));
        assert_eq!(camera.position, Vec3::new(0.0, 50.0, -120.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.fov, 75.0);
    }

    #[test]
    fn failed_builder_is_skipped() {
        let result: Result<NodeId, BuildError> =
            Err(carscene_scene::SceneError::NodeNotFound(NodeId(7)).into());
        assert_eq!(logged("build_ground", result), None);
        assert_eq!(logged("build_ground", Ok::<_, BuildError>(3)), Some(3));
    }

    #[test]
    fn missing_car_skips_wheels_and_keeps_going() {
        let mut scene = Scene::new();
        let partial = SceneRig {
            ground: build_ground(&mut scene).ok(),
            ..SceneRig::default()
        };
        let rig = finish_scene(&mut scene, &SceneConfig::default(), partial);
        assert!(rig.body.is_none());
        assert!(rig.wheels.is_none());
        assert!(rig.ground.is_some());
        assert!(rig.lights.is_some());
        assert!(!rig.is_complete(true));
        // ground, light and helper only
        assert_eq!(scene.node_count(), 3);
        assert!(scene.find_by_name("wheels").is_none());
    }

    #[test]
    fn attach_wheels_without_body_builds_nothing() {
        let mut scene = Scene::new();
        assert!(attach_wheels(&mut scene, None).is_none());
        assert!(scene.assets().is_empty());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn camera_without_car_looks_at_origin() {
        let camera = init_camera(
            &SceneConfig::default(),
            &Scene::new(),
            &SceneRig::default(),
            Viewport::new(100, 100),
        );
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
