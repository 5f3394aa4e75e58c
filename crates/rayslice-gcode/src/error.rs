//! Error types for toolpath output.

use thiserror::Error;

/// Errors that can occur while persisting a toolpath.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// The sink could not write the program.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for toolpath output.
pub type Result<T> = std::result::Result<T, GcodeError>;
