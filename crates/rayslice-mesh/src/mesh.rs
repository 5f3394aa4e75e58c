//! Indexed triangle mesh.

use rayslice_math::{Point3, Transform};

use crate::bbox::Aabb3;
use crate::error::{MeshError, Result};
use crate::ray::Triangle;

/// Triangle mesh in flat buffer form.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). May be empty.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.num_triangles() == 0
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            f64::from(self.vertices[i * 3]),
            f64::from(self.vertices[i * 3 + 1]),
            f64::from(self.vertices[i * 3 + 2]),
        )
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, p: Point3) -> u32 {
        let idx = self.num_vertices() as u32;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        idx
    }

    /// Append a triangle by vertex indices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Triangle `i` promoted to f64.
    pub fn triangle(&self, i: usize) -> Triangle {
        let idx = &self.indices[i * 3..i * 3 + 3];
        Triangle::new(
            self.vertex(idx[0] as usize),
            self.vertex(idx[1] as usize),
            self.vertex(idx[2] as usize),
        )
    }

    /// Iterate all triangles in index order.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.num_triangles()).map(move |i| self.triangle(i))
    }

    /// Check that every index refers to an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let count = self.num_vertices();
        for (i, &vertex) in self.indices.iter().enumerate() {
            if vertex as usize >= count {
                return Err(MeshError::IndexOutOfRange {
                    triangle: i / 3,
                    vertex,
                    count,
                });
            }
        }
        Ok(())
    }

    /// Axis-aligned bounds of all vertices, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Aabb3> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut aabb = Aabb3::empty();
        for i in 0..self.num_vertices() {
            aabb.include_point(&self.vertex(i));
        }
        Some(aabb)
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Apply a transform to every vertex in place. Normals are dropped.
    pub fn transform(&mut self, t: &Transform) {
        for i in 0..self.num_vertices() {
            let p = t.apply_point(&self.vertex(i));
            self.vertices[i * 3] = p.x as f32;
            self.vertices[i * 3 + 1] = p.y as f32;
            self.vertices[i * 3 + 2] = p.z as f32;
        }
        self.normals.clear();
    }
}
