//! The car scene: a bevelled car body on four wheels over a ground plane,
//! lit by one directional light, driven from the keyboard while an orbit
//! camera watches.
//!
//! # Invariants
//! - The wheel group always holds exactly four wheels at fixed offsets.
//! - Motion is applied in whole fixed ticks; with no key held nothing moves.
//! - A builder failure at startup is logged and skipped, never fatal.

pub mod app;
pub mod bootstrap;
pub mod builders;
pub mod clock;
pub mod config;
pub mod motion;

pub use app::{AppState, Viewport};
pub use bootstrap::{SceneRig, init_camera, init_scene};
pub use builders::{BuildError, CarBody, LightRig, WheelSet};
pub use clock::FrameClock;
pub use config::{CameraConfig, ConfigError, ControlsConfig, SceneConfig, WindowConfig};
pub use motion::apply_action;
