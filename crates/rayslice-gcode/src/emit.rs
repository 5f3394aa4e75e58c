//! Lattice to G-code text.

use rayslice_math::Point3;
use rayslice_slicer::{Lattice, VerticalAxis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed machine parameters of the emitted program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitSettings {
    /// Height of the lift moves before and after the toolpath.
    pub safe_z: f64,
    /// Feed rate of the lift moves.
    pub travel_feed: u32,
    /// Feed rate of every lattice move.
    pub cut_feed: u32,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            safe_z: 5.0,
            travel_feed: 5000,
            cut_feed: 1500,
        }
    }
}

/// Emit a program for `lattice` with the default [`EmitSettings`].
pub fn emit(lattice: &Lattice, vertical: VerticalAxis) -> String {
    emit_with(lattice, vertical, &EmitSettings::default())
}

/// Emit a program for `lattice`.
///
/// One `G1` move per lattice point, in layer-then-angle order, wrapped in
/// a fixed preamble and footer. The lattice is not checked for
/// continuity or point count; an empty lattice yields only the
/// boilerplate lines.
pub fn emit_with(lattice: &Lattice, vertical: VerticalAxis, settings: &EmitSettings) -> String {
    let lift = format!("G1 Z{} F{} ; Lift\n", settings.safe_z, settings.travel_feed);

    let mut output = String::new();
    output.push_str("G21 ; Set units to millimeters\n");
    output.push_str("G90 ; Use absolute positioning\n");
    output.push_str(&lift);

    for point in lattice.points() {
        let [x, y, z] = machine_coords(point, vertical);
        output.push_str(&format!(
            "G1 X{} Y{} Z{} F{}\n",
            format_coord(x),
            format_coord(y),
            format_coord(z),
            settings.cut_feed
        ));
    }

    output.push_str(&lift);
    output.push_str("M30 ; End of program\n");

    debug!(
        moves = lattice.point_count(),
        bytes = output.len(),
        "emitted program"
    );
    output
}

/// Map a world point to machine `[X, Y, Z]`: world x stays X, the
/// non-vertical of {y, z} becomes Y, the vertical axis becomes Z.
pub fn machine_coords(point: &Point3, vertical: VerticalAxis) -> [f64; 3] {
    let planar = vertical.flipped().axis().component(point);
    let height = vertical.axis().component(point);
    [point.x, planar, height]
}

/// Format a coordinate with exactly two fractional digits.
///
/// Rounds the exact binary value to the nearest hundredth, so `-1.005`
/// (stored just above `-1.005`) becomes `-1.00`. A result of `-0.00` is
/// written as `0.00`.
pub fn format_coord(value: f64) -> String {
    let text = format!("{:.2}", value);
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}
