//! Data and uniform callbacks of the three lumen demos.
//!
//! Each module exposes a `config()` building the [`DemoConfig`] its binary
//! runs:
//! - [`pulse`]: a triangle whose color pulses
//! - [`offset_quad`]: an indexed quad drifting in a circle
//! - [`orbit_cube`]: a textured cube seen from an orbiting camera
//!
//! [`DemoConfig`]: lumen_engine::demo::DemoConfig

use std::path::{Path, PathBuf};

pub mod offset_quad;
pub mod orbit_cube;
pub mod pulse;

/// `shaders/<demo>/shader.vert` and `shader.frag` under this crate.
pub fn shader_paths(demo: &str) -> (PathBuf, PathBuf) {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders").join(demo);
    (dir.join("shader.vert"), dir.join("shader.frag"))
}

pub fn asset_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}
