use std::fmt;
use std::path::PathBuf;

use super::Stage;

/// Failure while loading, compiling or linking shaders.
#[derive(Debug)]
pub enum ShaderError {
    /// The source file could not be read.
    Io { path: PathBuf, source: std::io::Error },

    /// A stage failed to parse or validate. `log` holds the rendered
    /// diagnostic and is never empty.
    Compile { stage: Stage, path: PathBuf, log: String },

    /// The stages compiled but do not fit together (or do not fit the
    /// geometry/uniforms they are used with).
    Link { log: String },
}

impl ShaderError {
    /// Returns the diagnostic log for compile/link failures.
    pub fn log(&self) -> Option<&str> {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => Some(log),
            Self::Io { .. } => None,
        }
    }

    pub(crate) fn link(lines: Vec<String>) -> Self {
        Self::Link { log: lines.join("\n") }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read shader '{}': {source}", path.display())
            }
            Self::Compile { stage, path, log } => write!(
                f,
                "{stage} shader compilation failed ({}):\n{log}",
                path.display()
            ),
            Self::Link { log } => write!(f, "program linking failed:\n{log}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
