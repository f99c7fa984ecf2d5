use std::fmt;
use std::path::{Path, PathBuf};

use wgpu::naga;

use super::ShaderError;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::ShaderStages {
        match self {
            Stage::Vertex => wgpu::ShaderStages::VERTEX,
            Stage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Full text of one shader stage, as read from disk.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub stage: Stage,
    pub path: PathBuf,
    pub text: String,
}

impl ShaderSource {
    /// Reads `path` verbatim. No includes, no preprocessing.
    pub fn read(path: impl AsRef<Path>, stage: Stage) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| ShaderError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("read {stage} shader '{}' ({} bytes)", path.display(), text.len());
        Ok(Self { stage, path, text })
    }

    /// Wraps in-memory source text; `label` stands in for the path in diagnostics.
    pub fn from_text(stage: Stage, label: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            stage,
            path: label.into(),
            text: text.into(),
        }
    }
}
