#![warn(missing_docs)]

//! Radial slicer: samples the surface of a mesh with fans of rays.
//!
//! For each height step between the mesh's lower and upper bound on the
//! vertical axis, rays are cast outward from the bounding box center at
//! evenly spaced angles. The nearest hit of every ray becomes one lattice
//! point. The resulting [`Lattice`] is ordered by layer, then by angle,
//! and is consumed by the G-code emitter.
//!
//! # Example
//!
//! ```
//! use rayslice_math::Axis;
//! use rayslice_mesh::{primitives::cylinder, MeshBvh};
//! use rayslice_slicer::{sample, SliceConfig};
//!
//! let mesh = cylinder(5.0, 10.0, 64, Axis::Y);
//! let bvh = MeshBvh::build(&mesh);
//! let config = SliceConfig {
//!     angular_segments: 16,
//!     ..Default::default()
//! };
//!
//! let out = sample(&bvh, &config)?;
//! assert_eq!(out.lattice.layer_count(), 10);
//! # Ok::<(), rayslice_slicer::SlicerError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lattice;
pub mod sample;

pub use config::{FanFrame, RayPlane, SliceConfig, VerticalAxis};
pub use diagnostics::{MarkerCollector, MarkerSink, NoMarkers, RadialAnomaly};
pub use error::{Result, SlicerError};
pub use lattice::{Lattice, Layer, Sample};
pub use sample::{layer_count, sample, sample_with_markers, Sampled, MAX_RAYS};
