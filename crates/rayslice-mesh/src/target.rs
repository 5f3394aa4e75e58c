//! The query surface a sampler needs from a mesh.

use crate::bbox::Aabb3;
use crate::mesh::TriangleMesh;
use crate::ray::{Ray, RayHit};

/// Something rays can be cast against.
///
/// Implementations must be shareable across threads: samplers fan rays
/// out over a thread pool.
pub trait RayTarget: Sync {
    /// Axis-aligned bounds, or `None` if there is no geometry.
    fn bounds(&self) -> Option<Aabb3>;

    /// All intersections along `ray`, sorted by increasing distance.
    fn intersect(&self, ray: &Ray) -> Vec<RayHit>;

    /// The nearest intersection along `ray`.
    fn intersect_nearest(&self, ray: &Ray) -> Option<RayHit> {
        self.intersect(ray).into_iter().next()
    }
}

/// Brute force: every triangle is tested.
impl RayTarget for TriangleMesh {
    fn bounds(&self) -> Option<Aabb3> {
        TriangleMesh::bounds(self)
    }

    fn intersect(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .triangles()
            .enumerate()
            .filter_map(|(i, tri)| {
                tri.intersect(ray).map(|t| RayHit {
                    t,
                    point: ray.at(t),
                    normal: tri.normal(),
                    triangle: i,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid;
    use approx::assert_relative_eq;
    use rayslice_math::{Point3, Vec3};

    #[test]
    fn test_brute_force_hits_sorted() {
        let cube = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
        let ray = Ray::new(Point3::new(3.0, 4.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let hits = RayTarget::intersect(&cube, &ray);
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0].point.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(hits[1].point.z, 10.0, epsilon = 1e-6);

        let nearest = cube.intersect_nearest(&ray).unwrap();
        assert_relative_eq!(nearest.t, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_from_inside_hits_wall() {
        let cube = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
        let ray = Ray::new(Point3::new(5.0, 3.0, 4.0), Vec3::new(1.0, 0.0, 0.0));
        let nearest = cube.intersect_nearest(&ray).unwrap();
        assert_relative_eq!(nearest.point.x, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_miss() {
        let cube = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
        let ray = Ray::new(Point3::new(50.0, 50.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(cube.intersect_nearest(&ray).is_none());
        assert!(RayTarget::bounds(&TriangleMesh::new()).is_none());
    }
}
