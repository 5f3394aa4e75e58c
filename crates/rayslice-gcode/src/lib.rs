#![warn(missing_docs)]

//! G-code emission for rayslice lattices.
//!
//! Turns a sampled [`Lattice`](rayslice_slicer::Lattice) into a plain
//! motion program: a preamble, one linear move per lattice point, and a
//! footer. Sinks hand the finished text to a file or keep it in memory.
//!
//! # Example
//!
//! ```
//! use rayslice_gcode::{emit, MemorySink, ToolpathSink, DEFAULT_FILENAME};
//! use rayslice_slicer::{Lattice, VerticalAxis};
//!
//! let gcode = emit(&Lattice::default(), VerticalAxis::Y);
//! assert_eq!(gcode.lines().count(), 5);
//!
//! let mut sink = MemorySink::default();
//! sink.persist(&gcode, DEFAULT_FILENAME)?;
//! # Ok::<(), rayslice_gcode::GcodeError>(())
//! ```

pub mod emit;
pub mod error;
pub mod sink;

pub use emit::{emit, emit_with, format_coord, machine_coords, EmitSettings};
pub use error::{GcodeError, Result};
pub use sink::{FileSink, MemorySink, ToolpathSink, DEFAULT_FILENAME};
