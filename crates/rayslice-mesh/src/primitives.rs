//! Closed primitive meshes.

use std::f64::consts::TAU;

use rayslice_math::{Axis, Point3};

use crate::mesh::TriangleMesh;

/// Axis-aligned box between two corners.
pub fn cuboid(min: Point3, max: Point3) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let corners = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    for c in corners {
        mesh.push_vertex(c);
    }
    // Each face as a quad wound outward, split along its first diagonal.
    let quads: [[u32; 4]; 6] = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [0, 4, 7, 3],
        [1, 2, 6, 5],
    ];
    for [a, b, c, d] in quads {
        mesh.push_triangle(a, b, c);
        mesh.push_triangle(a, c, d);
    }
    mesh
}

/// Closed cylinder standing on the origin along `axis`.
///
/// The base cap lies at 0 and the top cap at `height` along `axis`.
/// Rim vertices sit at angles `(k + 0.5) * 2π / segments`, so a ray cast
/// at angle `i * 2π / n` (for `n` dividing `segments`) strikes a facet
/// midpoint rather than an edge.
pub fn cylinder(radius: f64, height: f64, segments: u32, axis: Axis) -> TriangleMesh {
    let segments = segments.max(3);
    let mut mesh = TriangleMesh::new();

    let place = |u: f64, v: f64, h: f64| match axis {
        Axis::X => Point3::new(h, u, v),
        Axis::Y => Point3::new(u, h, v),
        Axis::Z => Point3::new(u, v, h),
    };

    let bottom_center = mesh.push_vertex(place(0.0, 0.0, 0.0));
    let top_center = mesh.push_vertex(place(0.0, 0.0, height));

    let mut bottom = Vec::with_capacity(segments as usize);
    let mut top = Vec::with_capacity(segments as usize);
    for k in 0..segments {
        let angle = (k as f64 + 0.5) * TAU / segments as f64;
        let (s, c) = angle.sin_cos();
        bottom.push(mesh.push_vertex(place(radius * c, radius * s, 0.0)));
        top.push(mesh.push_vertex(place(radius * c, radius * s, height)));
    }

    for k in 0..segments as usize {
        let next = (k + 1) % segments as usize;
        mesh.push_triangle(bottom[k], top[next], bottom[next]);
        mesh.push_triangle(bottom[k], top[k], top[next]);
        mesh.push_triangle(bottom_center, bottom[k], bottom[next]);
        mesh.push_triangle(top_center, top[next], top[k]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_shape() {
        let mesh = cuboid(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.num_vertices(), 8);
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cylinder_shape() {
        let mesh = cylinder(5.0, 10.0, 32, Axis::Y);
        assert_eq!(mesh.num_triangles(), 32 * 4);
        assert_eq!(mesh.num_vertices(), 2 + 64);
        assert!(mesh.validate().is_ok());
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min.y, 0.0);
        assert_eq!(b.max.y, 10.0);
        // Rim vertices all lie on the radius.
        for i in 2..mesh.num_vertices() {
            let p = mesh.vertex(i);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - 5.0).abs() < 1e-5, "vertex {i} at radius {r}");
        }
    }

    #[test]
    fn test_cylinder_along_z() {
        let mesh = cylinder(2.0, 4.0, 8, Axis::Z);
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min.z, 0.0);
        assert_eq!(b.max.z, 4.0);
        assert!(b.max.x <= 2.0 && b.max.y <= 2.0);
    }
}
