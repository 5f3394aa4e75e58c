//! Diagnostic outputs of a sampling run: radial anomalies and debug markers.
//!
//! Neither influences the lattice. Anomalies are collected into the run
//! result and logged; markers are pushed to a caller-supplied sink.

use rayslice_math::Point3;
use serde::{Deserialize, Serialize};

/// A radial jump between two vertically adjacent samples at the same
/// angular index, larger than the configured threshold.
///
/// Usually marks an overhang or undercut worth inspecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialAnomaly {
    /// Layer holding the upper sample.
    pub layer: usize,
    /// Angular index shared by both samples.
    pub angle_index: usize,
    /// Radial distance of the sample one layer below.
    pub below_radius: f64,
    /// Radial distance of the upper sample.
    pub radius: f64,
    /// `|radius - below_radius|`.
    pub delta: f64,
}

/// Receives one marker per lattice point when debug visualization is on.
pub trait MarkerSink {
    /// Place a visual marker at `point`.
    fn place_marker(&mut self, point: &Point3);
}

/// A sink that discards markers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMarkers;

impl MarkerSink for NoMarkers {
    fn place_marker(&mut self, _point: &Point3) {}
}

/// A sink that keeps every marker, serializable for external viewers.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerCollector {
    /// Marker positions as `[x, y, z]`.
    pub markers: Vec<[f64; 3]>,
}

impl MarkerSink for MarkerCollector {
    fn place_marker(&mut self, point: &Point3) {
        self.markers.push([point.x, point.y, point.z]);
    }
}
