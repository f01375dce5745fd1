//! Extrusion of a vertex selection.
//!
//! Extruding duplicates the selected vertices, moves the selected faces onto
//! the duplicates (the cap) and bridges the border of the selection with
//! side quads. The new vertices start at the positions of the old ones;
//! callers move them afterwards.
//!
//! ```text
//!   new0 ---- new1          cap: selected faces rebuilt on new vertices
//!    |         |
//!    |  side   |            side: one quad per open edge
//!    |         |
//!   old0 ---- old1          old edge on the border of the selection
//! ```

use std::collections::{HashMap, HashSet};

use nalgebra::Point2;

use crate::mesh::{EdgeId, FaceId, MaterialId, Mesh, MeshIndex, UvPointId, VertexId};

/// Book-keeping from old entities to their extruded copies.
struct Duplicates<I: MeshIndex> {
    vertices: HashMap<VertexId<I>, VertexId<I>>,
    seed_uvs: HashMap<VertexId<I>, UvPointId<I>>,
    uvs: HashMap<UvPointId<I>, UvPointId<I>>,
}

impl<I: MeshIndex> Duplicates<I> {
    /// The copy of `uv` on the extruded vertex, created on first use.
    fn uv_for(&mut self, mesh: &mut Mesh<I>, uv: UvPointId<I>) -> UvPointId<I> {
        if let Some(&copy) = self.uvs.get(&uv) {
            return copy;
        }
        let vertex = self.vertices[&mesh.uv_point_vertex(uv)];
        let position = *mesh.uv_position(uv);
        let copy = mesh.add_uv_point(vertex, position);
        self.uvs.insert(uv, copy);
        copy
    }
}

/// Extrude the given vertices.
///
/// Every input vertex gets a duplicate at the same position, joined to it by
/// a new edge. Edges and faces fully inside the selection are rebuilt on the
/// duplicates, and each edge on the border of the selection (at most one
/// selected face) gets a side quad. The original selected faces are removed;
/// with `add_flip_face` set a reversed copy of each stays behind, closing the
/// bottom of the extrusion.
///
/// Returns the new vertices in input order.
///
/// # Example
/// ```
/// use polyforge::prelude::*;
/// use nalgebra::Vector3;
///
/// let mut mesh: Mesh = PlaneBuilder::default().build().unwrap();
/// let vertices: Vec<VertexId> = mesh.vertex_ids().collect();
///
/// let top = extrude(&mut mesh, &vertices, false);
/// for &v in &top {
///     let p = *mesh.position(v) + Vector3::new(1.0, 0.0, 0.0);
///     mesh.set_position(v, p);
/// }
///
/// assert_eq!(mesh.num_vertices(), 8);
/// assert_eq!(mesh.num_faces(), 5);
/// ```
pub fn extrude<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    vertices: &[VertexId<I>],
    add_flip_face: bool,
) -> Vec<VertexId<I>> {
    let edges = mesh.edges_within(vertices.iter().copied());
    let faces = mesh.faces_within(vertices.iter().copied());
    let selected: HashSet<FaceId<I>> = faces.iter().copied().collect();

    let open_edges: Vec<EdgeId<I>> = edges
        .iter()
        .copied()
        .filter(|&e| mesh.edge_faces(e).filter(|f| selected.contains(f)).count() <= 1)
        .collect();

    let mut dup = Duplicates {
        vertices: HashMap::new(),
        seed_uvs: HashMap::new(),
        uvs: HashMap::new(),
    };
    let mut new_vertices = Vec::with_capacity(vertices.len());

    for &v in vertices {
        if dup.vertices.contains_key(&v) {
            continue;
        }
        let first_uv = mesh.vertex_uv_points(v).next();
        let seed = match first_uv {
            Some(uv) => uv,
            None => mesh.add_uv_point(v, Point2::origin()),
        };

        let copy = mesh.add_vertex(*mesh.position(v));
        let seed_position = *mesh.uv_position(seed);
        let copy_uv = mesh.add_uv_point(copy, seed_position);
        mesh.add_edge(v, copy);

        dup.vertices.insert(v, copy);
        dup.seed_uvs.insert(v, seed);
        dup.uvs.insert(seed, copy_uv);
        new_vertices.push(copy);
    }

    for &e in &edges {
        let [v0, v1] = mesh.edge_vertices(e);
        mesh.add_edge(dup.vertices[&v0], dup.vertices[&v1]);
    }

    for &e in &open_edges {
        let (from, to, material) = side_direction(mesh, e, &selected);
        let uv_from = dup.seed_uvs[&from];
        let uv_to = dup.seed_uvs[&to];
        let side = [
            uv_from,
            uv_to,
            dup.uv_for(mesh, uv_to),
            dup.uv_for(mesh, uv_from),
        ];
        mesh.add_face(&side, material);
    }

    for &f in &faces {
        let material = mesh.material(f);
        let original: Vec<UvPointId<I>> = mesh.face_uv_points(f).to_vec();
        let cap: Vec<UvPointId<I>> = original.iter().map(|&uv| dup.uv_for(mesh, uv)).collect();
        mesh.add_face(&cap, material);

        if add_flip_face {
            let flipped: Vec<UvPointId<I>> = original.iter().rev().copied().collect();
            mesh.add_face(&flipped, material);
        }
        mesh.remove_face(f);
    }

    new_vertices
}

/// Pick the direction in which the side quad on `edge` runs along the old
/// edge, and its material.
///
/// The side quad must run against an unselected neighbour and along the
/// selected face it is detached from. A bare edge follows its storage order.
fn side_direction<I: MeshIndex>(
    mesh: &Mesh<I>,
    edge: EdgeId<I>,
    selected: &HashSet<FaceId<I>>,
) -> (VertexId<I>, VertexId<I>, MaterialId<I>) {
    let [v0, v1] = mesh.edge_vertices(edge);
    let mut material = MaterialId::default();
    let mut has_outside = false;
    let mut outside_forward = false;
    let mut inside_forward: Option<bool> = None;

    for f in mesh.edge_faces(edge) {
        let forward = runs_forward(mesh, f, v0, v1);
        if selected.contains(&f) {
            material = mesh.material(f);
            inside_forward = Some(forward);
        } else {
            has_outside = true;
            outside_forward |= forward;
        }
    }

    let along = if has_outside {
        !outside_forward
    } else {
        inside_forward.unwrap_or(true)
    };

    if along {
        (v0, v1, material)
    } else {
        (v1, v0, material)
    }
}

/// Whether the loop of `face` steps directly from `v0` to `v1`.
fn runs_forward<I: MeshIndex>(
    mesh: &Mesh<I>,
    face: FaceId<I>,
    v0: VertexId<I>,
    v1: VertexId<I>,
) -> bool {
    let corners: Vec<VertexId<I>> = mesh.face_vertices(face).collect();
    let n = corners.len();
    (0..n).any(|i| corners[i] == v0 && corners[(i + 1) % n] == v1)
}
