//! Axis-aligned bounding boxes.
//!
//! Used both as the sampler's bounds query and as the node volume of
//! the triangle BVH.

use rayslice_math::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another box.
    pub fn include_box(&mut self, other: &Aabb3) {
        if other.is_empty() {
            return;
        }
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Center point of the box.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the longest axis (0 = X, 1 = Y, 2 = Z).
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box() {
        let b = Aabb3::empty();
        assert!(b.is_empty());

        let mut b = Aabb3::empty();
        b.include_box(&Aabb3::empty());
        assert!(b.is_empty());
    }

    #[test]
    fn test_include_and_center() {
        let mut b = Aabb3::empty();
        b.include_point(&Point3::new(-1.0, 0.0, 2.0));
        b.include_point(&Point3::new(3.0, 4.0, -2.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, Point3::new(-1.0, 0.0, -2.0));
        assert_eq!(b.max, Point3::new(3.0, 4.0, 2.0));
        assert_eq!(b.center(), Point3::new(1.0, 2.0, 0.0));
        assert_eq!(b.extent(), Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_longest_axis() {
        let b = Aabb3::new(Point3::origin(), Point3::new(1.0, 5.0, 2.0));
        assert_eq!(b.longest_axis(), 1);
        let b = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 9.0));
        assert_eq!(b.longest_axis(), 2);
    }
}
