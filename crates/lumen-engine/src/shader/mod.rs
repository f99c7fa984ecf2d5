//! Shader loading.
//!
//! Turns two GLSL files into a linked [`ShaderProgram`]:
//! - `source`: read a stage's text verbatim from disk
//! - `compile`: GLSL front end + validation, producing a naga module
//! - `link`: cross-stage interface checks and reflection
//!
//! Sources are GLSL 4.50 in its Vulkan flavour (explicit locations and
//! `set`/`binding` qualifiers). Compilation happens on the CPU, so a broken
//! shader is reported before any window or device exists.

mod compile;
mod error;
mod link;
mod source;

pub use compile::{compile, CompiledShader};
pub use error::ShaderError;
pub use link::{link, ProgramInterface, Resource, ResourceKind, ShaderProgram, StageIo};
pub use source::{ShaderSource, Stage};

#[cfg(test)]
pub(crate) use compile::tests as test_sources;

/// Entry point name produced by the GLSL front end.
pub const ENTRY_POINT: &str = "main";
