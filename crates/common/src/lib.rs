//! Shared value types used across the car scene crates.

pub mod types;

pub use types::{Color, GeometryHandle, MaterialHandle, NodeId, Transform, radians};
