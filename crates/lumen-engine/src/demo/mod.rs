//! One configurable renderer for every demo.
//!
//! A demo is data: shader paths, a [`Mesh`](crate::geometry::Mesh), an
//! optional texture, a clear color and a per-frame uniform callback. [`Demo`]
//! validates all of it before a window exists, then runs it on the
//! [`Runtime`](crate::window::Runtime).

pub mod anim;
mod config;
mod runner;

pub use config::{DemoConfig, UpdateFn};
pub use runner::Demo;
