//! wgpu render backend for the car scene.
//!
//! Each frame is first planned on the CPU by [`FrameBuilder`], which walks
//! the scene graph and groups meshes into instanced draws per
//! (geometry, material). [`WgpuRenderer`] then uploads and draws the plan.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Geometry buffers are uploaded once per handle; instances are rebuilt
//!   every frame from world matrices.

mod frame;
mod gpu;
mod shaders;

pub use frame::{DrawBatch, FrameBuilder, FrameData, InstanceData, LineVertex, Uniforms};
pub use gpu::WgpuRenderer;
