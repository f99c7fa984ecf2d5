//! Keyboard input.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates winit events into [`InputEvent`]s.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyEvent, KeyState};
