//! Ray representation and ray–triangle intersection.

use rayslice_math::{Dir3, Point3, Vec3};

use crate::bbox::Aabb3;

/// Hits closer than this along the ray are treated as self-intersections.
pub const MIN_HIT_DISTANCE: f64 = 1e-9;

/// Barycentric slack so rays grazing a shared edge still register.
const EDGE_EPSILON: f64 = 1e-9;

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let dir = Dir3::new_normalize(direction);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            usize::from(inv.x < 0.0),
            usize::from(inv.y < 0.0),
            usize::from(inv.z < 0.0),
        ];
        Self {
            origin,
            direction: dir,
            inv_direction: inv,
            sign,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))` with the entry and exit parameters,
    /// clamped so `t_min >= 0`. An origin lying exactly on a slab plane of
    /// an axis the ray does not move along counts as inside that slab.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let near =
                (bounds[self.sign[axis]][axis] - self.origin[axis]) * self.inv_direction[axis];
            let far =
                (bounds[1 - self.sign[axis]][axis] - self.origin[axis]) * self.inv_direction[axis];
            // 0 * inf yields NaN; f64::max/min ignore it, keeping the slab open.
            t_min = t_min.max(near);
            t_max = t_max.min(far);
        }

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

/// Result of a ray–mesh intersection.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Parameter along the ray where intersection occurs.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Geometric normal of the hit triangle (winding order, unit length).
    pub normal: Vec3,
    /// Index of the triangle that was hit.
    pub triangle: usize,
}

/// A mesh triangle promoted to f64.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Vertex positions.
    pub v: [Point3; 3],
}

impl Triangle {
    /// Create a triangle from its corners.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self { v: [v0, v1, v2] }
    }

    /// Bounding box of the three corners.
    pub fn aabb(&self) -> Aabb3 {
        let mut b = Aabb3::empty();
        for p in &self.v {
            b.include_point(p);
        }
        b
    }

    /// Centroid of the triangle.
    pub fn centroid(&self) -> Point3 {
        Point3::from((self.v[0].coords + self.v[1].coords + self.v[2].coords) / 3.0)
    }

    /// Unit normal following the winding order, or zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        let n = (self.v[1] - self.v[0]).cross(&(self.v[2] - self.v[0]));
        let len = n.norm();
        if len > 1e-12 {
            n / len
        } else {
            Vec3::zeros()
        }
    }

    /// Möller–Trumbore intersection, two-sided.
    ///
    /// Returns the ray parameter of the hit, if any lies beyond
    /// [`MIN_HIT_DISTANCE`]. Rays parallel to the triangle plane never hit.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let dir = ray.direction.as_ref();
        let e1 = self.v[1] - self.v[0];
        let e2 = self.v[2] - self.v[0];
        let p = dir.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() < 1e-14 {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - self.v[0];
        let u = s.dot(&p) * inv_det;
        if !(-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&u) {
            return None;
        }

        let q = s.cross(&e1);
        let v = dir.dot(&q) * inv_det;
        if v < -EDGE_EPSILON || u + v > 1.0 + EDGE_EPSILON {
            return None;
        }

        let t = e2.dot(&q) * inv_det;
        (t > MIN_HIT_DISTANCE).then_some(t)
    }
}
