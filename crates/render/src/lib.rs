//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate the scene.
//! - Camera motion lives outside the scene graph and is not driven by the
//!   fixed tick.

mod orbit;
mod renderer;

pub use orbit::{OrbitCamera, OrbitSettings, Spherical};
pub use renderer::{DebugTextRenderer, Renderer};
