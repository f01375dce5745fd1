//! Splitting vertices along hard edges.
//!
//! Renderers interpolate vertex normals across faces that share a vertex. To
//! get a crisp crease, each smooth patch around the vertex needs its own copy
//! of it. An edge is *hard* when it is marked sharp or is non-manifold (three
//! or more faces). Faces around a vertex form one patch when they are linked
//! through soft edges with exactly two faces.

use std::collections::HashMap;

use crate::mesh::{EdgeId, FaceId, Mesh, MeshIndex, UvPointId, VertexId};

/// Give every smooth patch around a vertex its own copy of the vertex.
///
/// Only vertices with more than one hard edge in the input mesh are split.
/// The first patch around such a vertex keeps it; every other patch is
/// rebuilt on a new vertex at the same position. Each rebuilt face gets its
/// own UV point on the new vertex, copying the position of the one it
/// replaces. Replacement edges inherit the sharp flag and crease of the edges
/// they replace.
///
/// Edges whose faces all moved away are left in place without faces; call
/// [`remove_loose_edges`] to drop them.
pub fn split_sharp_edges<I: MeshIndex>(mesh: &mut Mesh<I>) {
    let candidates: Vec<VertexId<I>> = mesh
        .vertex_ids()
        .filter(|&v| mesh.vertex_edges(v).filter(|&e| is_hard(mesh, e)).count() > 1)
        .collect();

    for v in candidates {
        let edges: Vec<EdgeId<I>> = mesh.vertex_edges(v).collect();
        let patches = smooth_patches(mesh, v, &edges);
        if patches.len() <= 1 {
            continue;
        }

        for patch in &patches[1..] {
            let copy = detach_patch(mesh, v, patch);
            for &e in &edges {
                let other = mesh.opposite_vertex(e, v);
                if let Some(replacement) = mesh.find_edge(copy, other) {
                    let (sharp, crease) = (mesh.is_sharp(e), mesh.crease(e));
                    mesh.set_sharp(replacement, sharp);
                    mesh.set_crease(replacement, crease);
                }
            }
        }
    }
}

/// Remove every live edge that no face uses and return how many went.
pub fn remove_loose_edges<I: MeshIndex>(mesh: &mut Mesh<I>) -> usize {
    let loose: Vec<EdgeId<I>> = mesh
        .edge_ids()
        .filter(|&e| mesh.edge_faces(e).next().is_none())
        .collect();
    for &e in &loose {
        mesh.remove_edge(e);
    }
    loose.len()
}

fn is_hard<I: MeshIndex>(mesh: &Mesh<I>, e: EdgeId<I>) -> bool {
    mesh.is_sharp(e) || mesh.edge_faces(e).count() >= 3
}

/// Group the faces around `v` into patches linked by soft manifold edges.
///
/// Patches come out in the order their first face is met around the vertex.
fn smooth_patches<I: MeshIndex>(
    mesh: &Mesh<I>,
    v: VertexId<I>,
    edges: &[EdgeId<I>],
) -> Vec<Vec<FaceId<I>>> {
    let mut faces: Vec<FaceId<I>> = Vec::new();
    for f in mesh.vertex_faces(v) {
        if !faces.contains(&f) {
            faces.push(f);
        }
    }

    let links: Vec<[FaceId<I>; 2]> = edges
        .iter()
        .filter(|&&e| !mesh.is_sharp(e))
        .filter_map(|&e| {
            let pair: Vec<FaceId<I>> = mesh.edge_faces(e).collect();
            match pair.as_slice() {
                &[a, b] => Some([a, b]),
                _ => None,
            }
        })
        .collect();

    let mut patch_of: HashMap<FaceId<I>, usize> = HashMap::new();
    let mut patches: Vec<Vec<FaceId<I>>> = Vec::new();

    for &seed in &faces {
        if patch_of.contains_key(&seed) {
            continue;
        }
        let index = patches.len();
        let mut patch = Vec::new();
        let mut stack = vec![seed];
        patch_of.insert(seed, index);

        while let Some(f) = stack.pop() {
            patch.push(f);
            for &[a, b] in &links {
                let neighbour = if a == f {
                    b
                } else if b == f {
                    a
                } else {
                    continue;
                };
                if !patch_of.contains_key(&neighbour) {
                    patch_of.insert(neighbour, index);
                    stack.push(neighbour);
                }
            }
        }
        patches.push(patch);
    }

    patches
}

/// Move the corners of `patch` at `v` onto a new vertex and return it.
fn detach_patch<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    v: VertexId<I>,
    patch: &[FaceId<I>],
) -> VertexId<I> {
    let copy = mesh.add_vertex(*mesh.position(v));
    let (selected, corner) = (mesh.is_selected(v), mesh.corner(v));
    mesh.set_selected(copy, selected);
    mesh.set_corner(copy, corner);

    for &f in patch {
        let material = mesh.material(f);
        let mut uv_points: Vec<UvPointId<I>> = mesh.face_uv_points(f).to_vec();
        for uv in uv_points.iter_mut() {
            if mesh.uv_point_vertex(*uv) == v {
                let position = *mesh.uv_position(*uv);
                *uv = mesh.add_uv_point(copy, position);
            }
        }

        mesh.remove_face(f);
        mesh.add_face(&uv_points, material);
    }

    copy
}
