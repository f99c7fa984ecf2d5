//! GPU rendering subsystem.
//!
//! [`MeshRenderer`] owns everything one draw call needs: pipeline, uniform
//! buffer, bind group, mesh buffers and an optional texture. It is built from
//! a linked [`crate::shader::ShaderProgram`] and a [`crate::geometry::Mesh`],
//! so a renderer never exists without both.

mod color;
mod ctx;
mod pipeline;

pub use color::Color;
pub use ctx::{RenderCtx, RenderTarget};
pub use pipeline::{plan_bindings, BindingSlot, MeshRenderer, SlotKind};
