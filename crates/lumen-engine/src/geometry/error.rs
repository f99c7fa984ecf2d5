use std::fmt;

/// Invalid vertex layout or mesh data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Two attributes share a shader location.
    DuplicateLocation(u32),

    /// The vertex type's size does not equal the layout stride.
    StrideMismatch { vertex_size: u64, stride: u64 },

    /// A mesh needs at least one vertex.
    Empty,

    /// An indexed mesh needs at least one index.
    NoIndices,

    /// An index refers past the end of the vertex list.
    IndexOutOfRange { index: u32, vertex_count: u32 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLocation(loc) => {
                write!(f, "vertex layout uses location {loc} more than once")
            }
            Self::StrideMismatch { vertex_size, stride } => write!(
                f,
                "vertex type is {vertex_size} bytes but the layout stride is {stride}"
            ),
            Self::Empty => f.write_str("mesh has no vertices"),
            Self::NoIndices => f.write_str("indexed mesh has no indices"),
            Self::IndexOutOfRange { index, vertex_count } => write!(
                f,
                "index {index} out of range for {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}
