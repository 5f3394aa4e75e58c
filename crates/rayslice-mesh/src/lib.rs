#![warn(missing_docs)]

//! Triangle meshes and ray queries for the rayslice radial slicer.
//!
//! This crate provides the two collaborators the sampler depends on:
//! an axis-aligned bounds query and a ray–mesh intersection primitive.
//! Both are exposed through the [`RayTarget`] trait, implemented by
//! [`TriangleMesh`] (brute force) and [`MeshBvh`] (accelerated).
//!
//! # Example
//!
//! ```
//! use rayslice_math::{Axis, Point3, Vec3};
//! use rayslice_mesh::{primitives::cylinder, MeshBvh, Ray, RayTarget};
//!
//! let mesh = cylinder(5.0, 10.0, 64, Axis::Y);
//! let bvh = MeshBvh::build(&mesh);
//!
//! let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
//! let hit = bvh.intersect_nearest(&ray).unwrap();
//! assert!((hit.point.x - 5.0).abs() < 0.01);
//! ```

pub mod bbox;
pub mod bvh;
pub mod error;
pub mod mesh;
pub mod primitives;
mod ray;
pub mod stl;
mod target;

pub use bbox::Aabb3;
pub use bvh::MeshBvh;
pub use error::{MeshError, Result};
pub use mesh::TriangleMesh;
pub use ray::{Ray, RayHit, Triangle, MIN_HIT_DISTANCE};
pub use stl::{parse_stl, read_stl, stl_bytes, write_stl};
pub use target::RayTarget;
