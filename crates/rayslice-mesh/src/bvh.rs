//! Bounding Volume Hierarchy over mesh triangles.
//!
//! Uses a bucketed Surface Area Heuristic for construction, falling back
//! to a centroid median split when no bucket boundary separates the
//! triangles.

use rayslice_math::Point3;

use crate::bbox::Aabb3;
use crate::mesh::TriangleMesh;
use crate::ray::{Ray, RayHit, Triangle};
use crate::target::RayTarget;

/// Triangles per leaf before a node is split.
const MAX_LEAF_SIZE: usize = 4;

/// Number of SAH buckets per axis.
const NUM_BUCKETS: usize = 12;

/// A BVH node - either a leaf containing triangles or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Triangle indices contained in this leaf.
        triangles: Vec<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } | BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Per-triangle build record.
#[derive(Debug, Clone, Copy)]
struct Primitive {
    index: usize,
    aabb: Aabb3,
    centroid: Point3,
}

/// Bounding Volume Hierarchy for accelerated ray–mesh intersection.
#[derive(Debug, Clone)]
pub struct MeshBvh {
    root: Option<BvhNode>,
    triangles: Vec<Triangle>,
    bounds: Option<Aabb3>,
}

impl MeshBvh {
    /// Build a BVH over every triangle of `mesh`.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let triangles: Vec<Triangle> = mesh.triangles().collect();

        let mut prims: Vec<Primitive> = triangles
            .iter()
            .enumerate()
            .map(|(index, tri)| Primitive {
                index,
                aabb: tri.aabb(),
                centroid: tri.centroid(),
            })
            .collect();

        let root = if prims.is_empty() {
            None
        } else {
            Some(build_node(&mut prims))
        };

        tracing::debug!(triangles = triangles.len(), "built mesh BVH");

        Self {
            root,
            triangles,
            bounds: mesh.bounds(),
        }
    }

    /// Number of triangles indexed.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get a reference to the root node, if any.
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Trace a ray through the BVH, returning all intersections sorted by t.
    pub fn trace(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        if let Some(ref root) = self.root {
            self.trace_node(ray, root, &mut hits);
        }
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// Trace a ray and return only the closest hit.
    pub fn trace_closest(&self, ray: &Ray) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;
        let mut closest_t = f64::INFINITY;
        if let Some(ref root) = self.root {
            self.trace_node_closest(ray, root, &mut closest, &mut closest_t);
        }
        closest
    }

    fn trace_node(&self, ray: &Ray, node: &BvhNode, hits: &mut Vec<RayHit>) {
        if ray.intersect_aabb(node.aabb()).is_none() {
            return;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &idx in triangles {
                    if let Some(hit) = self.test_triangle(ray, idx) {
                        hits.push(hit);
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                self.trace_node(ray, left, hits);
                self.trace_node(ray, right, hits);
            }
        }
    }

    fn trace_node_closest(
        &self,
        ray: &Ray,
        node: &BvhNode,
        closest: &mut Option<RayHit>,
        closest_t: &mut f64,
    ) {
        let Some((t_min, _)) = ray.intersect_aabb(node.aabb()) else {
            return;
        };
        // Entry beyond the current best cannot improve it.
        if t_min > *closest_t {
            return;
        }

        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &idx in triangles {
                    if let Some(hit) = self.test_triangle(ray, idx) {
                        if hit.t < *closest_t {
                            *closest_t = hit.t;
                            *closest = Some(hit);
                        }
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                let left_t = ray.intersect_aabb(left.aabb()).map(|(t, _)| t);
                let right_t = ray.intersect_aabb(right.aabb()).map(|(t, _)| t);

                match (left_t, right_t) {
                    (Some(lt), Some(rt)) => {
                        let (near, far) = if lt <= rt { (left, right) } else { (right, left) };
                        self.trace_node_closest(ray, near, closest, closest_t);
                        self.trace_node_closest(ray, far, closest, closest_t);
                    }
                    (Some(_), None) => self.trace_node_closest(ray, left, closest, closest_t),
                    (None, Some(_)) => self.trace_node_closest(ray, right, closest, closest_t),
                    (None, None) => {}
                }
            }
        }
    }

    fn test_triangle(&self, ray: &Ray, idx: usize) -> Option<RayHit> {
        let tri = &self.triangles[idx];
        tri.intersect(ray).map(|t| RayHit {
            t,
            point: ray.at(t),
            normal: tri.normal(),
            triangle: idx,
        })
    }
}

impl RayTarget for MeshBvh {
    fn bounds(&self) -> Option<Aabb3> {
        self.bounds
    }

    fn intersect(&self, ray: &Ray) -> Vec<RayHit> {
        self.trace(ray)
    }

    fn intersect_nearest(&self, ray: &Ray) -> Option<RayHit> {
        self.trace_closest(ray)
    }
}

/// Build a BVH node recursively.
fn build_node(prims: &mut [Primitive]) -> BvhNode {
    let mut bounds = Aabb3::empty();
    for p in prims.iter() {
        bounds.include_box(&p.aabb);
    }

    if prims.len() <= MAX_LEAF_SIZE {
        return BvhNode::Leaf {
            aabb: bounds,
            triangles: prims.iter().map(|p| p.index).collect(),
        };
    }

    let mid = match find_best_split(prims) {
        Some((axis, pos)) => partition(prims, axis, pos),
        None => 0,
    };

    let mid = if mid == 0 || mid == prims.len() {
        median_split(prims)
    } else {
        mid
    };

    let (left, right) = prims.split_at_mut(mid);
    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left)),
        right: Box::new(build_node(right)),
    }
}

/// Bucketed SAH over triangle centroids. Returns `(axis, split position)`.
fn find_best_split(prims: &[Primitive]) -> Option<(usize, f64)> {
    let mut centroid_bounds = Aabb3::empty();
    for p in prims {
        centroid_bounds.include_point(&p.centroid);
    }
    let mut node_bounds = Aabb3::empty();
    for p in prims {
        node_bounds.include_box(&p.aabb);
    }
    let total_area = surface_area(&node_bounds);
    if total_area <= 0.0 {
        return None;
    }

    let extent = centroid_bounds.extent();
    let mut best: Option<(f64, usize, f64)> = None;

    for axis in 0..3 {
        let axis_extent = extent[axis];
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = centroid_bounds.min[axis];

        let mut counts = [0usize; NUM_BUCKETS];
        let mut boxes = [Aabb3::empty(); NUM_BUCKETS];
        for p in prims {
            let b = ((p.centroid[axis] - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);
            counts[b] += 1;
            boxes[b].include_box(&p.aabb);
        }

        for split in 1..NUM_BUCKETS {
            let (mut left_count, mut right_count) = (0, 0);
            let (mut left_box, mut right_box) = (Aabb3::empty(), Aabb3::empty());
            for i in 0..split {
                left_count += counts[i];
                left_box.include_box(&boxes[i]);
            }
            for i in split..NUM_BUCKETS {
                right_count += counts[i];
                right_box.include_box(&boxes[i]);
            }
            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = 0.125
                + surface_area(&left_box) / total_area * left_count as f64
                + surface_area(&right_box) / total_area * right_count as f64;

            if best.map_or(true, |(c, _, _)| cost < c) {
                let pos = axis_min + (split as f64 / NUM_BUCKETS as f64) * axis_extent;
                best = Some((cost, axis, pos));
            }
        }
    }

    best.map(|(_, axis, pos)| (axis, pos))
}

/// Partition by centroid; returns the number of primitives left of `pos`.
fn partition(prims: &mut [Primitive], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = prims.len();
    while left < right {
        if prims[left].centroid[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            prims.swap(left, right);
        }
    }
    left
}

/// Sort along the longest centroid axis and cut in half.
fn median_split(prims: &mut [Primitive]) -> usize {
    let mut centroid_bounds = Aabb3::empty();
    for p in prims.iter() {
        centroid_bounds.include_point(&p.centroid);
    }
    let axis = centroid_bounds.longest_axis();
    prims.sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));
    prims.len() / 2
}

fn surface_area(aabb: &Aabb3) -> f64 {
    if aabb.is_empty() {
        return 0.0;
    }
    let d = aabb.extent();
    2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{cuboid, cylinder};
    use approx::assert_relative_eq;
    use rayslice_math::{Axis, Vec3};

    fn cube() -> TriangleMesh {
        cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0))
    }

    #[test]
    fn test_bvh_build() {
        let bvh = MeshBvh::build(&cube());
        assert!(bvh.root().is_some());
        assert_eq!(bvh.num_triangles(), 12);
        assert!(MeshBvh::build(&TriangleMesh::new()).root().is_none());
    }

    #[test]
    fn test_bvh_trace_cube() {
        let bvh = MeshBvh::build(&cube());
        let ray = Ray::new(Point3::new(3.0, 4.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let hits = bvh.trace(&ray);
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0].point.z, 0.0, epsilon = 1e-8);
        assert_relative_eq!(hits[1].point.z, 10.0, epsilon = 1e-8);
    }

    #[test]
    fn test_bvh_trace_miss() {
        let bvh = MeshBvh::build(&cube());
        let ray = Ray::new(Point3::new(50.0, 50.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(bvh.trace(&ray).is_empty());
        assert!(bvh.trace_closest(&ray).is_none());
    }

    #[test]
    fn test_bvh_trace_closest() {
        let bvh = MeshBvh::build(&cube());
        let ray = Ray::new(Point3::new(3.0, 4.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let closest = bvh.trace_closest(&ray).unwrap();
        assert_relative_eq!(closest.point.z, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mesh = cylinder(4.0, 12.0, 48, Axis::Y);
        let bvh = MeshBvh::build(&mesh);
        let origin = Point3::new(0.0, 6.5, 0.0);
        for i in 0..36 {
            let angle = i as f64 * std::f64::consts::TAU / 36.0;
            let ray = Ray::new(origin, Vec3::new(angle.cos(), 0.0, angle.sin()));
            let fast = bvh.intersect_nearest(&ray).map(|h| h.t);
            let slow = mesh.intersect_nearest(&ray).map(|h| h.t);
            match (fast, slow) {
                (Some(a), Some(b)) => assert_relative_eq!(a, b, epsilon = 1e-9),
                (a, b) => panic!("bvh {a:?} vs brute force {b:?} at ray {i}"),
            }
        }
    }
}
