//! Edge belts: rings of edges crossing a strip of quads.
//!
//! Starting from an edge, the walk enters one of its two faces, leaves
//! through the opposite edge of that quad and continues into the next face,
//! until it arrives back at the starting edge.
//!
//! ```text
//!   +----+----+----+----+
//!   |    |    |    |    |
//!   +-e0-+-e1-+-e2-+-e3-+   e0..e3 form a belt across the strip;
//!   |    |    |    |    |   e3's far face wraps back to e0
//!   +----+----+----+----+
//! ```
//!
//! Each element also records whether its edge points the opposite way to the
//! first edge of the belt, so that a cut at parameter `t` can be placed
//! consistently across the whole ring.

use std::collections::HashSet;

use crate::mesh::{EdgeId, FaceId, Mesh, MeshIndex, VertexId};

/// One step of an edge belt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeltElement<I: MeshIndex = u32> {
    /// Edge crossed at this step.
    pub edge: EdgeId<I>,

    /// Quad entered through `edge`.
    pub face: FaceId<I>,

    /// Whether `edge` runs against the direction of the belt's first edge.
    pub is_reversed: bool,
}

/// Find the closed belt of quads that crosses `edge`.
///
/// Returns the belt in walk order, starting with `edge`. Returns an empty
/// vector if the walk reaches an edge without exactly two faces, a face
/// without exactly four edges, or crosses its own path before closing.
/// The mesh is never modified.
///
/// # Example
/// ```
/// use polyforge::prelude::*;
///
/// let mesh: Mesh = CubeBuilder::default().build().unwrap();
/// let edge = mesh.edge_ids().next().unwrap();
///
/// let belt = find_belt(&mesh, edge);
/// assert_eq!(belt.len(), 4);
/// assert_eq!(belt[0].edge, edge);
/// ```
pub fn find_belt<I: MeshIndex>(mesh: &Mesh<I>, edge: EdgeId<I>) -> Vec<BeltElement<I>> {
    let mut belt: Vec<BeltElement<I>> = Vec::new();
    let mut visited: HashSet<EdgeId<I>> = HashSet::new();
    let mut last_face: Option<FaceId<I>> = None;
    let mut is_reversed = false;
    let mut current = edge;

    loop {
        let faces: Vec<FaceId<I>> = mesh.edge_faces(current).collect();
        if faces.len() != 2 {
            log::debug!(
                "belt search from {:?} aborted: {:?} has {} faces",
                edge,
                current,
                faces.len()
            );
            return Vec::new();
        }

        let face = if last_face == Some(faces[0]) {
            faces[1]
        } else {
            faces[0]
        };
        belt.push(BeltElement {
            edge: current,
            face,
            is_reversed,
        });
        visited.insert(current);

        let edges = mesh.face_edges(face);
        if edges.len() != 4 {
            log::debug!(
                "belt search from {:?} aborted: {:?} has {} edges",
                edge,
                face,
                edges.len()
            );
            return Vec::new();
        }

        let Some(edge_index) = edges.iter().position(|&e| e == current) else {
            return Vec::new();
        };
        let next_index = (edge_index + 2) % 4;
        let next = edges[next_index];

        // Opposite sides of a quad run in opposite directions along the face
        // loop, so equal storage directions mean the edges point apart.
        let corners: Vec<VertexId<I>> = mesh.face_vertices(face).collect();
        let forward = corners[edge_index] == mesh.edge_vertices(current)[0];
        let next_forward = corners[next_index] == mesh.edge_vertices(next)[0];
        if forward == next_forward {
            is_reversed = !is_reversed;
        }

        if next == edge {
            return belt;
        }
        if visited.contains(&next) {
            log::debug!(
                "belt search from {:?} aborted: path crosses itself at {:?}",
                edge,
                next
            );
            return Vec::new();
        }

        last_face = Some(face);
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::{add_fin, slot_counts, torus};
    use crate::primitive::{CubeBuilder, PlaneBuilder, SphereBuilder};

    #[test]
    fn test_cube_belt() {
        let mesh: Mesh = CubeBuilder::default().build().unwrap();
        let start = mesh.edge_ids().next().unwrap();

        let belt = find_belt(&mesh, start);
        assert_eq!(belt.len(), 4);
        assert_eq!(belt[0].edge, start);
        assert!(!belt[0].is_reversed);

        // Four distinct parallel edges around four distinct faces.
        let edges: HashSet<EdgeId> = belt.iter().map(|b| b.edge).collect();
        let faces: HashSet<FaceId> = belt.iter().map(|b| b.face).collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(faces.len(), 4);

        let [a, b] = mesh.edge_positions(start);
        let axis = (b - a).normalize();
        for element in &belt {
            let [p, q] = mesh.edge_positions(element.edge);
            let dir = (q - p).normalize();
            assert!((dir.dot(&axis).abs() - 1.0).abs() < 1e-12);
        }

        // Consecutive elements share their face with the next edge.
        for (i, element) in belt.iter().enumerate() {
            let next = belt[(i + 1) % belt.len()].edge;
            assert!(mesh.face_edges(element.face).contains(&next));
        }
    }

    #[test]
    fn test_reversal_tracks_geometric_direction() {
        let mesh: Mesh = CubeBuilder::default().build().unwrap();
        let start = mesh.edge_ids().next().unwrap();
        let [a, b] = mesh.edge_positions(start);
        let axis = b - a;

        for element in find_belt(&mesh, start) {
            let [p, q] = mesh.edge_positions(element.edge);
            let same_way = (q - p).dot(&axis) > 0.0;
            assert_eq!(element.is_reversed, !same_way);
        }
    }

    #[test]
    fn test_torus_belt() {
        let mesh = torus(4, 4);
        for e in mesh.edge_ids() {
            assert_eq!(find_belt(&mesh, e).len(), 4);
        }
    }

    #[test]
    fn test_open_boundary_aborts() {
        let mesh: Mesh = PlaneBuilder::default().build().unwrap();
        let e = mesh.edge_ids().next().unwrap();
        assert!(find_belt(&mesh, e).is_empty());
    }

    #[test]
    fn test_non_manifold_edge_aborts() {
        let mut mesh = torus(4, 4);
        let fin_edge = mesh.edge_ids().next().unwrap();
        let ring: Vec<EdgeId> = find_belt(&mesh, fin_edge).iter().map(|b| b.edge).collect();
        assert_eq!(ring.len(), 4);

        add_fin(&mut mesh, fin_edge);
        assert_eq!(mesh.edge_faces(fin_edge).count(), 3);

        // Every walk along the old ring now runs into the three-face edge.
        let slots = slot_counts(&mesh);
        for e in ring {
            assert!(find_belt(&mesh, e).is_empty(), "{:?}", e);
        }
        assert_eq!(slot_counts(&mesh), slots);
    }

    #[test]
    fn test_triangle_in_strip_aborts() {
        // Belts running towards the poles hit the triangle fans.
        let mesh: Mesh = SphereBuilder::default().build().unwrap();
        let latitude_edge = mesh
            .edge_ids()
            .find(|&e| {
                let [p, q] = mesh.edge_positions(e);
                (p.x - q.x).abs() < 1e-9
            })
            .unwrap();
        assert!(find_belt(&mesh, latitude_edge).is_empty());
    }
}
