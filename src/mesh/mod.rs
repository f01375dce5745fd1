//! Core mesh data structures.
//!
//! This module provides the polygon mesh store: entity tables with full
//! adjacency, mutation primitives and read-only views.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]. It stores four kinds of entities:
//!
//! - [`Vertex`]: a 3D position with selection flag and corner weight
//! - [`UvPoint`]: a texture coordinate owned by one vertex; several UV points
//!   on one vertex describe a UV seam
//! - [`Edge`]: an undirected vertex pair with sharp flag and crease weight
//! - [`Face`]: a loop of UV points (at least three) and its parallel loop of
//!   edges, plus a material tag
//!
//! # Handles
//!
//! Entities are identified by typed handles ([`VertexId`], [`UvPointId`],
//! [`EdgeId`], [`FaceId`], [`MaterialId`]), generic over the integer type
//! ([`MeshIndex`]). Removal only tombstones an entity, so handles stay valid
//! until [`Mesh::collect_garbage`] builds a compacted copy.
//!
//! # Construction
//!
//! ```
//! use polyforge::mesh::{Mesh, MaterialId};
//! use nalgebra::{Point2, Point3};
//!
//! let mut mesh: Mesh = Mesh::new();
//! let uvs: Vec<_> = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]
//! .into_iter()
//! .map(|p| {
//!     let v = mesh.add_vertex(p);
//!     mesh.add_uv_point(v, Point2::new(p.x, p.y))
//! })
//! .collect();
//! let face = mesh.add_face(&uvs, MaterialId::default());
//!
//! assert_eq!(mesh.num_edges(), 4);
//! assert_eq!(mesh.face_vertices(face).len(), 4);
//! ```
//!
//! The mesh has no internal locking. It can be read from several threads at
//! once, but every mutation needs exclusive access.

mod builder;
mod edit;
mod handle;
mod polygon;

pub use builder::{build_from_polygons, to_face_vertex};
pub use handle::{EdgeId, FaceId, MaterialId, MeshIndex, UvPointId, VertexId};
pub use polygon::{Edge, Face, Mesh, UvPoint, Vertex};
