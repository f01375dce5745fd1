//! Edge cuts and loop cuts.

use nalgebra::Point2;

use crate::mesh::{EdgeId, FaceId, Mesh, MeshIndex, UvPointId, VertexId};

use super::belt::find_belt;

/// Split an edge in two by inserting a vertex at parameter `t`.
///
/// The new vertex sits at `p0 + t * (p1 - p0)`, where `p0` and `p1` are the
/// positions of the edge's first and second endpoint. It gets one UV point
/// at the origin, which every face along the edge shares. Faces along the
/// edge are rebuilt with the extra corner and keep their material; the old
/// edge and faces are removed.
///
/// Returns the new vertex.
pub fn cut_edge<I: MeshIndex>(mesh: &mut Mesh<I>, edge: EdgeId<I>, t: f64) -> VertexId<I> {
    let [v0, v1] = mesh.edge_vertices(edge);
    let [p0, p1] = mesh.edge_positions(edge);

    let vertex = mesh.add_vertex(p0 + (p1 - p0) * t);
    let uv = mesh.add_uv_point(vertex, Point2::origin());
    mesh.add_edge(v0, vertex);
    mesh.add_edge(vertex, v1);

    let faces: Vec<FaceId<I>> = mesh.edge_faces(edge).collect();
    for &f in &faces {
        let loop_uvs = mesh.face_uv_points(f);
        let n = loop_uvs.len();

        let mut rebuilt: Vec<UvPointId<I>> = Vec::with_capacity(n + 1);
        for i in 0..n {
            let a = mesh.uv_point_vertex(loop_uvs[i]);
            let b = mesh.uv_point_vertex(loop_uvs[(i + 1) % n]);
            rebuilt.push(loop_uvs[i]);
            if (a == v0 && b == v1) || (a == v1 && b == v0) {
                rebuilt.push(uv);
            }
        }

        let material = mesh.material(f);
        mesh.add_face(&rebuilt, material);
    }

    for f in faces {
        mesh.remove_face(f);
    }
    mesh.remove_edge(edge);

    vertex
}

/// Insert a new edge loop across the belt of quads through `edge`.
///
/// Every edge of the belt is cut at `position`, mirrored to `1 - position`
/// where the belt edge runs against the first one, and the new vertices are
/// joined into a closed ring. Returns the new vertices in belt order, or an
/// empty vector (with the mesh untouched) if `edge` has no closed belt.
///
/// # Example
/// ```
/// use polyforge::prelude::*;
///
/// let mut mesh: Mesh = CubeBuilder::default().build().unwrap();
/// let edge = mesh.edge_ids().next().unwrap();
///
/// let ring = loop_cut(&mut mesh, edge, 0.5);
/// assert_eq!(ring.len(), 4);
/// assert_eq!(mesh.num_vertices(), 12);
/// assert_eq!(mesh.num_edges(), 20);
/// assert_eq!(mesh.num_faces(), 10);
/// ```
pub fn loop_cut<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    edge: EdgeId<I>,
    position: f64,
) -> Vec<VertexId<I>> {
    let belt = find_belt(mesh, edge);
    if belt.is_empty() {
        log::debug!("loop cut at {:?} skipped: no closed belt", edge);
        return Vec::new();
    }

    let vertices: Vec<VertexId<I>> = belt
        .iter()
        .map(|element| {
            let t = if element.is_reversed {
                1.0 - position
            } else {
                position
            };
            cut_edge(mesh, element.edge, t)
        })
        .collect();

    for i in 0..vertices.len() {
        mesh.add_edge(vertices[i], vertices[(i + 1) % vertices.len()]);
    }

    vertices
}
