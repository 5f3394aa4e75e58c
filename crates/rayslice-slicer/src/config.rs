//! Sampling configuration.

use rayslice_math::Axis;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicerError};

/// World axis treated as the build direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAxis {
    /// Y up.
    #[default]
    Y,
    /// Z up.
    Z,
}

impl VerticalAxis {
    /// The other of {y, z}.
    pub fn flipped(self) -> Self {
        match self {
            VerticalAxis::Y => VerticalAxis::Z,
            VerticalAxis::Z => VerticalAxis::Y,
        }
    }

    /// The world axis this selects.
    pub fn axis(self) -> Axis {
        match self {
            VerticalAxis::Y => Axis::Y,
            VerticalAxis::Z => Axis::Z,
        }
    }
}

impl From<VerticalAxis> for Axis {
    fn from(v: VerticalAxis) -> Self {
        v.axis()
    }
}

/// Plane the per-layer ray fan is cast in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayPlane {
    /// Always the world X/Z plane, with the fan height on world Y,
    /// whatever the vertical axis. With a Z-up model the fan still
    /// sweeps X/Z while the height steps walk the Z range.
    #[default]
    Horizontal,
    /// The plane perpendicular to the vertical axis, with the fan
    /// height on the vertical axis itself.
    PerpendicularToAxis,
}

/// Orthonormal frame of one ray fan: rays point along
/// `cos(angle) * u + sin(angle) * v`, the origin moves along `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanFrame {
    /// Axis carrying the fan origin height.
    pub height: Axis,
    /// Direction of the ray at angle 0.
    pub u: Axis,
    /// Direction of the ray at angle π/2.
    pub v: Axis,
}

impl RayPlane {
    /// Resolve the fan frame for a build direction.
    pub fn frame(self, vertical: VerticalAxis) -> FanFrame {
        match (self, vertical) {
            (RayPlane::Horizontal, _) | (RayPlane::PerpendicularToAxis, VerticalAxis::Y) => {
                FanFrame {
                    height: Axis::Y,
                    u: Axis::X,
                    v: Axis::Z,
                }
            }
            (RayPlane::PerpendicularToAxis, VerticalAxis::Z) => FanFrame {
                height: Axis::Z,
                u: Axis::X,
                v: Axis::Y,
            },
        }
    }
}

/// Parameters for one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Build direction; selects the bound component that is stepped.
    pub vertical_axis: VerticalAxis,
    /// Distance between sampled heights (world units, > 0).
    pub layer_height: f64,
    /// Rays per layer (> 0).
    pub angular_segments: u32,
    /// Raise each ray's origin linearly across the sweep, producing a
    /// helical scan instead of flat rings.
    pub incremental_height_per_angle: bool,
    /// Report every sampled point to a marker sink.
    pub debug_visualize: bool,
    /// Plane the fan is cast in.
    pub ray_plane: RayPlane,
    /// Radial jump between vertically adjacent samples that is flagged.
    pub anomaly_threshold: f64,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            vertical_axis: VerticalAxis::Y,
            layer_height: 1.0,
            angular_segments: 100,
            incremental_height_per_angle: true,
            debug_visualize: false,
            ray_plane: RayPlane::Horizontal,
            anomaly_threshold: 1.0,
        }
    }
}

impl SliceConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.layer_height.is_finite() && self.layer_height > 0.0) {
            return Err(SlicerError::InvalidConfig(format!(
                "layer_height must be positive, got {}",
                self.layer_height
            )));
        }
        if self.angular_segments == 0 {
            return Err(SlicerError::InvalidConfig(
                "angular_segments must be positive".into(),
            ));
        }
        if !(self.anomaly_threshold.is_finite() && self.anomaly_threshold >= 0.0) {
            return Err(SlicerError::InvalidConfig(format!(
                "anomaly_threshold must be non-negative, got {}",
                self.anomaly_threshold
            )));
        }
        Ok(())
    }

    /// Angle step between consecutive rays (radians).
    pub fn angle_increment(&self) -> f64 {
        std::f64::consts::TAU / f64::from(self.angular_segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SliceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vertical_axis, VerticalAxis::Y);
        assert_eq!(config.angular_segments, 100);
        assert!(config.incremental_height_per_angle);
    }

    #[test]
    fn test_invalid_layer_height() {
        for h in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = SliceConfig {
                layer_height: h,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(SlicerError::InvalidConfig(_))),
                "layer_height {h} accepted"
            );
        }
    }

    #[test]
    fn test_invalid_segments_and_threshold() {
        let config = SliceConfig {
            angular_segments: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SliceConfig {
            anomaly_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flipped_axis() {
        assert_eq!(VerticalAxis::Y.flipped(), VerticalAxis::Z);
        assert_eq!(VerticalAxis::Z.flipped(), VerticalAxis::Y);
        assert_eq!(Axis::from(VerticalAxis::Z), Axis::Z);
    }

    #[test]
    fn test_fan_frames() {
        let horizontal = RayPlane::Horizontal.frame(VerticalAxis::Z);
        assert_eq!(horizontal.height, Axis::Y);
        assert_eq!((horizontal.u, horizontal.v), (Axis::X, Axis::Z));

        let perpendicular = RayPlane::PerpendicularToAxis.frame(VerticalAxis::Z);
        assert_eq!(perpendicular.height, Axis::Z);
        assert_eq!((perpendicular.u, perpendicular.v), (Axis::X, Axis::Y));

        assert_eq!(
            RayPlane::PerpendicularToAxis.frame(VerticalAxis::Y),
            RayPlane::Horizontal.frame(VerticalAxis::Y)
        );
    }

    #[test]
    fn test_toml_partial_config() {
        let config: SliceConfig = toml::from_str(
            r#"
            vertical_axis = "z"
            layer_height = 0.5
            ray_plane = "perpendicular_to_axis"
            "#,
        )
        .unwrap();
        assert_eq!(config.vertical_axis, VerticalAxis::Z);
        assert_eq!(config.layer_height, 0.5);
        assert_eq!(config.ray_plane, RayPlane::PerpendicularToAxis);
        assert_eq!(config.angular_segments, 100);
    }
}
