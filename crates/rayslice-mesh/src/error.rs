//! Error types for mesh loading and saving.

use thiserror::Error;

/// Errors that can occur while reading or writing meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Underlying file error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not a valid mesh.
    #[error("invalid STL: {0}")]
    Parse(String),

    /// An index points past the vertex buffer.
    #[error("triangle {triangle} references vertex {vertex}, mesh has {count}")]
    IndexOutOfRange {
        /// Triangle number.
        triangle: usize,
        /// Offending vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        count: usize,
    },
}

impl MeshError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
