//! Scene graph: the hierarchy of groups, meshes and lights that makes up the
//! car scene.
//!
//! # Invariants
//! - All structural mutations flow through explicit operations and are
//!   recorded in the event log.
//! - The hierarchy is a forest: attaching a node under one of its own
//!   descendants is rejected.
//! - Mesh nodes only reference assets registered in the scene's store.

pub mod graph;

pub use graph::{Node, NodeKind, Scene, SceneError, SceneEvent};
