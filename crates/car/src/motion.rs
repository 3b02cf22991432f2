//! Per-tick car motion.

use crate::builders::{CarBody, WheelSet};
use carscene_common::radians;
use carscene_input::Action;
use carscene_scene::{Scene, SceneError};
use glam::Vec3;

/// Distance moved per tick along any axis.
pub const STEP: f32 = 1.0;
/// Wheel roll per tick while driving, in radians.
pub const WHEEL_ROLL: f32 = 0.1;
/// Yaw per tick while strafing, in degrees.
pub const YAW_STEP_DEG: f32 = 1.0;

/// Apply one tick of `action` to the car and, when present, its wheels.
pub fn apply_action(
    scene: &mut Scene,
    body: &CarBody,
    wheels: Option<&WheelSet>,
    action: Action,
) -> Result<(), SceneError> {
    let car = body.car;
    match action {
        Action::Forward => {
            scene.translate(car, Vec3::Z * STEP)?;
            roll_wheels(scene, wheels, WHEEL_ROLL)?;
        }
        Action::Backward => {
            scene.translate(car, Vec3::NEG_Z * STEP)?;
            roll_wheels(scene, wheels, -WHEEL_ROLL)?;
        }
        Action::StrafeLeft => {
            scene.translate(car, Vec3::X * STEP)?;
            scene.rotate(car, Vec3::Y * radians(YAW_STEP_DEG))?;
        }
        Action::StrafeRight => {
            scene.translate(car, Vec3::NEG_X * STEP)?;
            scene.rotate(car, Vec3::NEG_Y * radians(YAW_STEP_DEG))?;
        }
        Action::Ascend => {
            scene.translate(car, Vec3::Y * STEP)?;
        }
        Action::Descend => {
            // never sink below the ground
            if scene.transform(car)?.position.y >= STEP {
                scene.translate(car, Vec3::NEG_Y * STEP)?;
            }
        }
    }
    Ok(())
}

fn roll_wheels(scene: &mut Scene, wheels: Option<&WheelSet>, amount: f32) -> Result<(), SceneError> {
    let Some(set) = wheels else {
        return Ok(());
    };
    for wheel in set.wheels {
        scene.rotate(wheel, Vec3::X * amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{build_car_body, build_wheels};

    fn rig() -> (Scene, CarBody, WheelSet) {
        let mut scene = Scene::new();
        let body = build_car_body(&mut scene).unwrap();
        let wheels = build_wheels(&mut scene, body.car).unwrap();
        (scene, body, wheels)
    }

    fn hold(scene: &mut Scene, body: &CarBody, wheels: &WheelSet, action: Action, ticks: usize) {
        for _ in 0..ticks {
            apply_action(scene, body, Some(wheels), action).unwrap();
        }
    }

    #[test]
    fn forward_moves_and_rolls() {
        let (mut scene, body, wheels) = rig();
        hold(&mut scene, &body, &wheels, Action::Forward, 3);
        assert_eq!(scene.transform(body.car).unwrap().position, Vec3::new(0.0, 0.0, 3.0));
        for wheel in wheels.wheels {
            let roll = scene.transform(wheel).unwrap().rotation.x;
            assert!((roll - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let (mut scene, body, wheels) = rig();
        hold(&mut scene, &body, &wheels, Action::Forward, 25);
        hold(&mut scene, &body, &wheels, Action::Backward, 25);
        assert_eq!(scene.transform(body.car).unwrap().position, Vec3::ZERO);
        let roll = scene.transform(wheels.wheels[0]).unwrap().rotation.x;
        assert!(roll.abs() < 1e-5);
    }

    #[test]
    fn left_then_right_restores_yaw() {
        let (mut scene, body, wheels) = rig();
        hold(&mut scene, &body, &wheels, Action::StrafeLeft, 40);
        let t = scene.transform(body.car).unwrap();
        assert_eq!(t.position.x, 40.0);
        assert!((t.rotation.y - radians(40.0)).abs() < 1e-5);

        hold(&mut scene, &body, &wheels, Action::StrafeRight, 40);
        let t = scene.transform(body.car).unwrap();
        assert_eq!(t.position, Vec3::ZERO);
        assert!(t.rotation.y.abs() < 1e-5);
    }

    #[test]
    fn strafing_leaves_wheels_alone() {
        let (mut scene, body, wheels) = rig();
        hold(&mut scene, &body, &wheels, Action::StrafeRight, 5);
        assert_eq!(scene.transform(wheels.wheels[2]).unwrap().rotation.x, 0.0);
    }

    #[test]
    fn descend_stops_at_ground() {
        let (mut scene, body, wheels) = rig();
        hold(&mut scene, &body, &wheels, Action::Ascend, 2);
        assert_eq!(scene.transform(body.car).unwrap().position.y, 2.0);
        hold(&mut scene, &body, &wheels, Action::Descend, 10);
        assert_eq!(scene.transform(body.car).unwrap().position.y, 0.0);
    }

    #[test]
    fn descend_from_ground_is_a_no_op() {
        let (mut scene, body, wheels) = rig();
        hold(&mut scene, &body, &wheels, Action::Descend, 1);
        assert_eq!(scene.transform(body.car).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn motion_without_wheels() {
        let mut scene = Scene::new();
        let body = build_car_body(&mut scene).unwrap();
        apply_action(&mut scene, &body, None, Action::Forward).unwrap();
        assert_eq!(scene.transform(body.car).unwrap().position.z, 1.0);
    }
}
