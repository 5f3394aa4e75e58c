//! Error types for the sampler.

use thiserror::Error;

/// Errors that can occur during sampling.
#[derive(Error, Debug)]
pub enum SlicerError {
    /// Invalid slice configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The bounds and layer height imply more layers than can be sampled.
    #[error("{layers} layers requested, limit is {limit}")]
    TooManyLayers {
        /// Layer count implied by the bounds (may be infinite).
        layers: f64,
        /// Largest accepted layer count.
        limit: u64,
    },

    /// Layers times rays per layer exceeds the per-run ray budget.
    #[error("{rays} rays requested ({layers} layers x {segments} segments), limit is {limit}")]
    TooManyRays {
        /// Total rays the run would cast.
        rays: u64,
        /// Layer count.
        layers: usize,
        /// Rays per layer.
        segments: u32,
        /// Largest accepted ray count.
        limit: u64,
    },
}

/// Result type for sampler operations.
pub type Result<T> = std::result::Result<T, SlicerError>;
