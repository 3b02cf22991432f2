//! Geometry and material assets for the car scene.
//!
//! Geometries are plain CPU-side triangle meshes generated from a handful of
//! primitives. They are registered once in the [`AssetStore`] and referenced
//! from scene nodes by handle, so a single geometry (the wheel cylinder) can
//! back several meshes.
//!
//! # Conventions
//! - Right-handed, Y up. Triangles wind counter-clockwise when seen from
//!   the side their normal points to.
//! - Plane geometry lies in the XY plane facing +Z; cylinders are centred on
//!   the origin with their axis along Y; extrusions sweep along +Z.

mod extrude;
mod material;
mod mesh;
mod primitives;
mod shape;
mod store;

pub use extrude::{ExtrudeSettings, extrude};
pub use material::{Material, MaterialKind, Side};
pub use mesh::{Aabb, MeshData};
pub use primitives::{CylinderParams, cylinder, plane};
pub use shape::Shape;
pub use store::AssetStore;

/// Errors from geometry generation.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("shape needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),
    #[error("shape outline has zero area")]
    DegenerateShape,
    #[error("shape outline could not be triangulated (self-intersecting?)")]
    Triangulation,
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}
