//! # Polyforge
//!
//! A polygon mesh topology kernel for modelling tools.
//!
//! Polyforge stores vertices, UV points, edges and polygonal faces with full
//! adjacency, and provides the editing operations a box modeller needs: edge
//! insertion with automatic face splitting, edge belt and edge loop discovery,
//! edge cutting, loop cuts, extrusion, face flipping and splitting vertices
//! along sharp edges.
//!
//! ## Features
//!
//! - **Polygon store**: arbitrary n-gons, UV seams through per-vertex UV points
//! - **Stable handles**: removal tombstones entities; compaction is explicit
//! - **Flexible indexing**: 16-bit, 32-bit and 64-bit handles
//! - **Primitive builders**: plane, circle, cube, cone, cylinder, sphere
//! - **File formats**: JSON column buffers, PLY, STL
//!
//! ## Quick Start
//!
//! ```
//! use polyforge::prelude::*;
//!
//! // A cube with six quads.
//! let mut mesh: Mesh = CubeBuilder::default().build().unwrap();
//!
//! // Cut a ring of edges around it.
//! let edge = mesh.edge_ids().next().unwrap();
//! let new_vertices = loop_cut(&mut mesh, edge, 0.5);
//!
//! assert_eq!(new_vertices.len(), 4);
//! assert_eq!(mesh.num_faces(), 10);
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use polyforge::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![
//!     vec![0, 3, 2, 1], // base
//!     vec![0, 1, 4],
//!     vec![1, 2, 4],
//!     vec![2, 3, 4],
//!     vec![3, 0, 4],
//! ];
//!
//! let mesh: Mesh = build_from_polygons(&vertices, None, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 8);
//!
//! for f in mesh.face_ids() {
//!     let normal = mesh.calculate_normal(f);
//!     println!("{:?}: {:?}", f, normal);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod primitive;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use polyforge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        cut_edge, extrude, find_belt, find_connected, find_loop, flip_face, loop_cut,
        remove_loose_edges, split_sharp_edges, BeltElement,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, to_face_vertex, Edge, EdgeId, Face, FaceId, MaterialId, Mesh,
        MeshIndex, UvPoint, UvPointId, Vertex, VertexId,
    };
    pub use crate::io::MeshData;
    pub use crate::primitive::{
        CircleBuilder, ConeBuilder, CubeBuilder, CylinderBuilder, PlaneBuilder, SphereBuilder,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_cube_workflow() {
        let mut mesh: Mesh = CubeBuilder::default().build().unwrap();
        assert!(mesh.is_valid());

        let edge = mesh.edge_ids().next().unwrap();
        let ring = loop_cut(&mut mesh, edge, 0.25);
        assert_eq!(ring.len(), 4);

        let top: Vec<FaceId> = mesh.face_ids().take(1).collect();
        let flipped = flip_face(&mut mesh, top[0]);
        assert!(mesh.face(top[0]).is_deleted());
        assert!(!mesh.face(flipped).is_deleted());

        let compact = mesh.collect_garbage();
        assert_eq!(compact.num_vertices(), 12);
        assert_eq!(compact.num_edges(), 20);
        assert_eq!(compact.num_faces(), 10);
        assert!(compact.is_valid());
    }
}
