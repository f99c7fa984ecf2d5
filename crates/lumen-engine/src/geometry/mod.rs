//! Geometry setup.
//!
//! A [`VertexLayout`] describes how one interleaved vertex is laid out; a
//! [`Mesh`] pairs that layout with fixed vertex (and optional index) data.
//! Meshes are immutable once built and are uploaded to the GPU exactly once.

mod error;
mod layout;
mod mesh;

pub use error::GeometryError;
pub use layout::{AttributeKind, VertexAttribute, VertexLayout};
pub use mesh::{DrawMode, GpuMesh, Mesh};
