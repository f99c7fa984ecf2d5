//! Lumen engine crate.
//!
//! Owns the platform + GPU runtime pieces the demos are built on: the window
//! loop, the GPU context, shader loading, geometry upload and the mesh
//! renderer that ties them together.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod shader;
pub mod geometry;
pub mod texture;
pub mod render;
pub mod demo;
