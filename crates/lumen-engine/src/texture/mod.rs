//! Texture loading and upload.
//!
//! Images are decoded on the CPU with `image`, converted to RGBA8 and given a
//! full mip chain before upload, so sampling with trilinear filtering works
//! regardless of the source format.

mod error;
mod texture_image;

pub use error::TextureError;
pub use texture_image::{GpuTexture, TextureImage};
