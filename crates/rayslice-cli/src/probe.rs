//! Interactive probe line: rotate or shift a segment and report where it
//! first meets the mesh.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rayslice_math::{Axis, Point3, Transform};
use rayslice_mesh::{Ray, RayHit, RayTarget};

/// Rotation applied by one `rotate-*` command (radians).
pub const ROTATION_STEP: f64 = PI / 10.0;

/// Distance moved by one `raise`/`lower` command.
pub const SHIFT_STEP: f64 = 10.0;

/// A line segment used to poke at the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeLine {
    pub start: Point3,
    pub end: Point3,
}

impl Default for ProbeLine {
    fn default() -> Self {
        Self {
            start: Point3::new(-100.0, 0.0, 0.0),
            end: Point3::new(100.0, 0.0, 0.0),
        }
    }
}

impl ProbeLine {
    pub fn transform(&mut self, t: &Transform) {
        self.start = t.apply_point(&self.start);
        self.end = t.apply_point(&self.end);
    }

    /// Nearest hit between `start` and `end`.
    pub fn nearest_hit<M: RayTarget + ?Sized>(&self, mesh: &M) -> Option<RayHit> {
        let span = self.end - self.start;
        let length = span.norm();
        if length == 0.0 {
            return None;
        }
        mesh.intersect(&Ray::new(self.start, span))
            .into_iter()
            .find(|hit| hit.t <= length)
    }
}

/// One step of a probe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeCommand {
    RotateX,
    RotateY,
    RotateZ,
    Raise,
    Lower,
}

const COMMANDS: &[(&str, ProbeCommand)] = &[
    ("rotate-x", ProbeCommand::RotateX),
    ("rotate-y", ProbeCommand::RotateY),
    ("rotate-z", ProbeCommand::RotateZ),
    ("raise", ProbeCommand::Raise),
    ("lower", ProbeCommand::Lower),
];

impl ProbeCommand {
    pub fn name(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(_, cmd)| *cmd == self)
            .map_or("?", |(name, _)| name)
    }

    /// Transform applied to the probe line. Rotations are about the world
    /// origin; shifts move along world Y.
    pub fn transform(self) -> Transform {
        match self {
            ProbeCommand::RotateX => Transform::rotation(Axis::X, ROTATION_STEP),
            ProbeCommand::RotateY => Transform::rotation(Axis::Y, ROTATION_STEP),
            ProbeCommand::RotateZ => Transform::rotation(Axis::Z, ROTATION_STEP),
            ProbeCommand::Raise => Transform::translation(0.0, SHIFT_STEP, 0.0),
            ProbeCommand::Lower => Transform::translation(0.0, -SHIFT_STEP, 0.0),
        }
    }

    pub fn apply(self, line: &mut ProbeLine) {
        line.transform(&self.transform());
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = COMMANDS.iter().map(|(name, _)| *name).collect();
        write!(
            f,
            "unknown probe command '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for ProbeCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMMANDS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, cmd)| *cmd)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rayslice_mesh::primitives::cuboid;

    #[test]
    fn test_parse_commands() {
        for (name, cmd) in COMMANDS {
            assert_eq!(name.parse::<ProbeCommand>().unwrap(), *cmd);
            assert_eq!(cmd.to_string(), *name);
        }
        let err = "spin".parse::<ProbeCommand>().unwrap_err();
        assert!(err.to_string().contains("rotate-x"));
    }

    #[test]
    fn test_raise_and_lower_cancel() {
        let mut line = ProbeLine::default();
        ProbeCommand::Raise.apply(&mut line);
        assert_relative_eq!(line.start.y, 10.0);
        assert_relative_eq!(line.end.y, 10.0);
        ProbeCommand::Lower.apply(&mut line);
        assert_relative_eq!(line.start, ProbeLine::default().start, epsilon = 1e-12);
    }

    #[test]
    fn test_twenty_rotations_are_a_full_turn() {
        let mut line = ProbeLine::default();
        for _ in 0..20 {
            ProbeCommand::RotateY.apply(&mut line);
        }
        assert_relative_eq!(line.end, ProbeLine::default().end, epsilon = 1e-9);

        let mut line = ProbeLine::default();
        for _ in 0..5 {
            ProbeCommand::RotateZ.apply(&mut line);
        }
        // A quarter turn about Z points the line along Y.
        assert_relative_eq!(line.end.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(line.end.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nearest_hit_within_segment() {
        let mesh = cuboid(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0));
        let mut line = ProbeLine {
            start: Point3::new(-20.0, 1.0, 2.0),
            end: Point3::new(20.0, 1.0, 2.0),
        };
        let hit = line.nearest_hit(&mesh).unwrap();
        assert_relative_eq!(hit.point.x, -5.0, epsilon = 1e-9);

        // Raised clear of the box, nothing is hit.
        ProbeCommand::Raise.apply(&mut line);
        assert!(line.nearest_hit(&mesh).is_none());

        // Too short to reach the box.
        let short = ProbeLine {
            start: Point3::new(-20.0, 1.0, 2.0),
            end: Point3::new(-10.0, 1.0, 2.0),
        };
        assert!(short.nearest_hit(&mesh).is_none());
    }
}
