//! Topology editing algorithms.
//!
//! Every algorithm here is built on the public [`Mesh`](crate::mesh::Mesh)
//! API:
//!
//! - **Traversal**: [`find_belt`] (edge rings across quads), [`find_loop`]
//!   (edge loops through valence-4 vertices), [`find_connected`]
//! - **Cutting**: [`cut_edge`], [`loop_cut`]
//! - **Extrusion**: [`extrude`]
//! - **Orientation**: [`flip_face`]
//! - **Shading topology**: [`split_sharp_edges`], [`remove_loose_edges`]
//!
//! Searches that meet topology they cannot handle (non-manifold edges,
//! triangles inside a quad strip, figure-9 paths) return an empty result and
//! leave the mesh untouched. Callers treat that as "not applicable".

pub mod belt;
pub mod connected;
pub mod cut;
pub mod edge_loop;
pub mod extrude;
pub mod flip;
pub mod sharp;

pub use belt::{find_belt, BeltElement};
pub use connected::find_connected;
pub use cut::{cut_edge, loop_cut};
pub use edge_loop::find_loop;
pub use extrude::extrude;
pub use flip::flip_face;
pub use sharp::{remove_loose_edges, split_sharp_edges};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::f64::consts::TAU;

    use nalgebra::{Point2, Point3, Vector3};

    use crate::mesh::{EdgeId, FaceId, MaterialId, Mesh, UvPointId};

    /// A closed quad grid wrapped into a torus. Every vertex has valence 4 and
    /// every edge has two faces.
    pub fn torus(rings: usize, segments: usize) -> Mesh {
        let mut mesh = Mesh::new();
        let mut grid: Vec<Vec<UvPointId>> = Vec::with_capacity(rings);

        for i in 0..rings {
            let u = TAU * i as f64 / rings as f64;
            let row = (0..segments)
                .map(|j| {
                    let v = TAU * j as f64 / segments as f64;
                    let r = 2.0 + 0.5 * v.cos();
                    let p = Point3::new(r * u.cos(), r * u.sin(), 0.5 * v.sin());
                    let vertex = mesh.add_vertex(p);
                    mesh.add_uv_point(vertex, Point2::new(u, v))
                })
                .collect();
            grid.push(row);
        }

        for i in 0..rings {
            let ni = (i + 1) % rings;
            for j in 0..segments {
                let nj = (j + 1) % segments;
                mesh.add_face(
                    &[grid[i][j], grid[ni][j], grid[ni][nj], grid[i][nj]],
                    MaterialId::default(),
                );
            }
        }

        mesh
    }

    /// Hang an extra triangle off `edge`, making it non-manifold.
    pub fn add_fin(mesh: &mut Mesh, edge: EdgeId) -> FaceId {
        let [v0, v1] = mesh.edge_vertices(edge);
        let [p0, p1] = mesh.edge_positions(edge);
        let tip = mesh.add_vertex(nalgebra::center(&p0, &p1) + Vector3::z());
        let corners = [v0, v1, tip].map(|v| mesh.add_uv_point(v, Point2::origin()));
        mesh.add_face(&corners, MaterialId::default())
    }

    /// Number of slots in each entity table.
    pub fn slot_counts(mesh: &Mesh) -> [usize; 4] {
        [
            mesh.vertex_slots(),
            mesh.uv_point_slots(),
            mesh.edge_slots(),
            mesh.face_slots(),
        ]
    }
}
