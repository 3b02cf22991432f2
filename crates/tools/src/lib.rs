//! Developer tooling: scene inspector.
//!
//! # Invariants
//! - Tools only read the scene.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
