#![warn(missing_docs)]

//! Math types for the rayslice radial slicer.
//!
//! Thin wrappers around nalgebra: points, vectors, unit directions,
//! a homogeneous transform used to steer probe lines, and a world
//! axis selector shared by the sampler and the G-code emitter.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// One of the three world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// World X.
    X,
    /// World Y.
    Y,
    /// World Z.
    Z,
}

impl Axis {
    /// Index of this axis into a coordinate triple.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The coordinate of `p` along this axis.
    #[inline]
    pub fn component(self, p: &Point3) -> f64 {
        p[self.index()]
    }
}

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation by `angle` radians about the given world axis through the origin.
    pub fn rotation(axis: Axis, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        // (a, b) are the two axes spanning the rotation plane, right-handed.
        let (a, b) = match axis {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        };
        m[(a, a)] = c;
        m[(a, b)] = -s;
        m[(b, a)] = s;
        m[(b, b)] = c;
        Self { matrix: m }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}
