use std::fmt;
use std::path::PathBuf;

/// Failure while reading or decoding a texture.
#[derive(Debug)]
pub enum TextureError {
    Decode {
        path: Option<PathBuf>,
        source: image::ImageError,
    },

    /// Decoded image has a zero dimension.
    Empty { width: u32, height: u32 },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path: Some(path), source } => {
                write!(f, "failed to load texture '{}': {source}", path.display())
            }
            Self::Decode { path: None, source } => write!(f, "failed to decode texture: {source}"),
            Self::Empty { width, height } => write!(f, "texture is empty ({width}x{height})"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::Empty { .. } => None,
        }
    }
}
