//! STL reading and writing.
//!
//! Both ASCII and binary STL are accepted on input; output is always
//! binary. Vertices are not welded: every facet contributes three fresh
//! vertices, which is all ray casting needs.

use std::fs;
use std::path::Path;

use rayslice_math::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::TriangleMesh;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file, detecting ASCII or binary encoding.
pub fn read_stl(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mesh = parse_stl(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        triangles = mesh.num_triangles(),
        "loaded STL"
    );
    Ok(mesh)
}

/// Parse STL content from memory.
pub fn parse_stl(bytes: &[u8]) -> Result<TriangleMesh> {
    if looks_binary(bytes) {
        parse_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| MeshError::parse(format!("not UTF-8 and not binary STL: {e}")))?;
        parse_ascii(text)
    }
}

/// Binary unless the file starts with `solid` and its length is not the
/// exact binary size implied by the facet count.
fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE + 4 {
        return false;
    }
    let count = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]) as usize;
    let exact = HEADER_SIZE + 4 + count * TRIANGLE_SIZE == bytes.len();
    let ascii_prefix = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(5)
        .eq(b"solid".iter());
    exact || !ascii_prefix
}

fn parse_binary(bytes: &[u8]) -> Result<TriangleMesh> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(MeshError::parse(format!(
            "binary STL needs at least {} bytes, got {}",
            HEADER_SIZE + 4,
            bytes.len()
        )));
    }
    let count = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]) as usize;

    let body = &bytes[HEADER_SIZE + 4..];
    if body.len() < count * TRIANGLE_SIZE {
        return Err(MeshError::parse(format!(
            "header declares {count} facets but only {} fit in the file",
            body.len() / TRIANGLE_SIZE
        )));
    }

    let mut mesh = TriangleMesh::new();
    mesh.vertices.reserve(count * 9);
    mesh.indices.reserve(count * 3);

    for record in body.chunks_exact(TRIANGLE_SIZE).take(count) {
        // Skip the stored normal (12 bytes); three vertices follow.
        let base = mesh.num_vertices() as u32;
        for v in 0..3 {
            let off = 12 + v * 12;
            for c in 0..3 {
                let o = off + c * 4;
                let value =
                    f32::from_le_bytes([record[o], record[o + 1], record[o + 2], record[o + 3]]);
                mesh.vertices.push(value);
            }
        }
        mesh.push_triangle(base, base + 1, base + 2);
    }

    Ok(mesh)
}

fn parse_ascii(text: &str) -> Result<TriangleMesh> {
    let mut mesh = TriangleMesh::new();
    let mut facet: Vec<Point3> = Vec::with_capacity(3);
    let mut saw_solid = false;

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "solid" => saw_solid = true,
            "vertex" => {
                let coords: Vec<f64> = parts
                    .map(str::parse::<f64>)
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| {
                        MeshError::parse(format!("line {}: bad vertex: {e}", line_no + 1))
                    })?;
                if coords.len() != 3 {
                    return Err(MeshError::parse(format!(
                        "line {}: vertex needs 3 coordinates, got {}",
                        line_no + 1,
                        coords.len()
                    )));
                }
                facet.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "endloop" => {
                if facet.len() != 3 {
                    return Err(MeshError::parse(format!(
                        "line {}: facet has {} vertices",
                        line_no + 1,
                        facet.len()
                    )));
                }
                let a = mesh.push_vertex(facet[0]);
                let b = mesh.push_vertex(facet[1]);
                let c = mesh.push_vertex(facet[2]);
                mesh.push_triangle(a, b, c);
                facet.clear();
            }
            _ => {}
        }
    }

    if !saw_solid {
        return Err(MeshError::parse("missing `solid` header"));
    }
    Ok(mesh)
}

/// Encode a mesh as binary STL.
pub fn stl_bytes(mesh: &TriangleMesh) -> Vec<u8> {
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(HEADER_SIZE + 4 + num_triangles * TRIANGLE_SIZE);

    let mut header = [b' '; HEADER_SIZE];
    let tag = b"rayslice STL export";
    header[..tag.len()].copy_from_slice(tag);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.triangles() {
        let n = tri.normal();
        for c in [n.x, n.y, n.z] {
            data.extend_from_slice(&(c as f32).to_le_bytes());
        }
        for v in &tri.v {
            for c in [v.x, v.y, v.z] {
                data.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Write a mesh to a binary STL file.
pub fn write_stl(path: impl AsRef<Path>, mesh: &TriangleMesh) -> Result<()> {
    fs::write(path, stl_bytes(mesh))?;
    Ok(())
}
