//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, wires them to the GPU
//! layer, and drives the close state machine.

mod loop_state;
mod runtime;

pub use loop_state::LoopState;
pub use runtime::{Runtime, RuntimeConfig};
