//! Edge loops through valence-4 vertices.

use std::collections::HashSet;

use crate::mesh::{EdgeId, FaceId, Mesh, MeshIndex};

/// Find the closed edge loop that continues `edge` straight through
/// valence-4 vertices.
///
/// At each vertex the loop continues along the one incident manifold edge
/// that shares no face with the edge it arrived on. Returns the loop in walk
/// order starting with `edge`, or an empty vector if the walk meets a vertex
/// without exactly four faces, finds no continuation, or crosses itself
/// before closing. The mesh is never modified.
pub fn find_loop<I: MeshIndex>(mesh: &Mesh<I>, edge: EdgeId<I>) -> Vec<EdgeId<I>> {
    if mesh.edge_faces(edge).count() != 2 {
        log::debug!("loop search from {:?} aborted: start edge is not manifold", edge);
        return Vec::new();
    }

    let mut edges = vec![edge];
    let mut visited: HashSet<EdgeId<I>> = HashSet::from([edge]);
    let mut vertex = mesh.edge_vertices(edge)[0];
    let mut current = edge;

    loop {
        let next_vertex = mesh.opposite_vertex(current, vertex);
        let valence = mesh.vertex_faces(next_vertex).count();
        if valence != 4 {
            log::debug!(
                "loop search from {:?} aborted: {:?} has {} faces",
                edge,
                next_vertex,
                valence
            );
            return Vec::new();
        }

        let current_faces: Vec<FaceId<I>> = mesh.edge_faces(current).collect();
        let next = mesh.vertex_edges(next_vertex).find(|&e| {
            let faces: Vec<FaceId<I>> = mesh.edge_faces(e).collect();
            faces.len() == 2 && !faces.iter().any(|f| current_faces.contains(f))
        });

        let Some(next) = next else {
            log::debug!(
                "loop search from {:?} aborted: no continuation at {:?}",
                edge,
                next_vertex
            );
            return Vec::new();
        };

        if next == edge {
            return edges;
        }
        if !visited.insert(next) {
            log::debug!(
                "loop search from {:?} aborted: path crosses itself at {:?}",
                edge,
                next
            );
            return Vec::new();
        }

        edges.push(next);
        vertex = next_vertex;
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::{add_fin, slot_counts, torus};
    use crate::mesh::{build_from_polygons, VertexId};
    use crate::primitive::{CubeBuilder, SphereBuilder};
    use nalgebra::Point3;

    /// A walk that runs into a pinched vertex and comes back to its own tail.
    ///
    /// Quads `q-m-r-n` and `q-n-s-m` share both edges `q-m` and `q-n`, so
    /// leaving `q` along one of them returns along the other and picks the
    /// edge the walk arrived on. Every vertex on the path has four faces.
    fn figure_nine() -> (Mesh, EdgeId) {
        let vertices = vec![Point3::origin(); 13];
        let (z, p, q, m, n, r, s) = (0, 1, 2, 3, 4, 5, 6);
        let faces = vec![
            vec![z, p, 11],
            vec![p, z, 12],
            vec![p, q, 9],
            vec![q, p, 10],
            vec![m, n, 7],
            vec![n, m, 8],
            vec![q, m, r, n],
            vec![q, n, s, m],
        ];
        let mesh: Mesh = build_from_polygons(&vertices, None, &faces).unwrap();
        let tail = mesh
            .find_edge(VertexId::new(z), VertexId::new(p))
            .unwrap();
        (mesh, tail)
    }

    #[test]
    fn test_torus_loops() {
        let mesh = torus(4, 6);

        // Edges inside a ring loop around the tube (6 segments); edges between
        // rings loop around the hole (4 rings).
        for e in mesh.edge_ids() {
            let found = find_loop(&mesh, e);
            assert!(found.len() == 4 || found.len() == 6, "{:?} -> {}", e, found.len());
            assert_eq!(found[0], e);
        }

        let first = mesh.edge_ids().next().unwrap();
        let found = find_loop(&mesh, first);
        let distinct: HashSet<EdgeId> = found.iter().copied().collect();
        assert_eq!(distinct.len(), found.len());

        // Consecutive edges share a vertex and no face.
        for (i, &e) in found.iter().enumerate() {
            let next = found[(i + 1) % found.len()];
            let [a, b] = mesh.edge_vertices(e);
            let shared: Vec<VertexId> = mesh
                .edge_vertices(next)
                .into_iter()
                .filter(|v| *v == a || *v == b)
                .collect();
            assert_eq!(shared.len(), 1);
            for f in mesh.edge_faces(e) {
                assert!(!mesh.edge_faces(next).any(|g| g == f));
            }
        }
    }

    #[test]
    fn test_square_torus_loop_matches_belt_length() {
        let mesh = torus(4, 4);
        let e = mesh.edge_ids().next().unwrap();
        assert_eq!(find_loop(&mesh, e).len(), 4);
        assert_eq!(crate::algo::find_belt(&mesh, e).len(), 4);
    }

    #[test]
    fn test_non_manifold_edge_aborts() {
        let mut mesh = torus(4, 4);
        let fin_edge = mesh.edge_ids().next().unwrap();
        let before = find_loop(&mesh, fin_edge);
        assert_eq!(before.len(), 4);

        add_fin(&mut mesh, fin_edge);

        let slots = slot_counts(&mesh);
        for e in before {
            assert!(find_loop(&mesh, e).is_empty(), "{:?}", e);
        }
        assert_eq!(slot_counts(&mesh), slots);
    }

    #[test]
    fn test_figure_nine_aborts() {
        let (mesh, tail) = figure_nine();
        let slots = slot_counts(&mesh);

        assert!(find_loop(&mesh, tail).is_empty());
        assert_eq!(slot_counts(&mesh), slots);

        // Started on the pinched part itself, the same path closes.
        let (p, q) = (VertexId::new(1), VertexId::new(2));
        let closing = mesh.find_edge(p, q).unwrap();
        assert_eq!(find_loop(&mesh, closing).len(), 4);
    }

    #[test]
    fn test_cube_corners_abort() {
        // Cube corners have three faces.
        let mesh: Mesh = CubeBuilder::default().build().unwrap();
        for e in mesh.edge_ids() {
            assert!(find_loop(&mesh, e).is_empty());
        }
    }

    #[test]
    fn test_sphere_meridian_hits_pole() {
        let mesh: Mesh = SphereBuilder::default().build().unwrap();
        // Ring edges go around the sphere; meridians stop at the poles.
        let ring_edge = mesh
            .edge_ids()
            .find(|&e| {
                let [p, q] = mesh.edge_positions(e);
                (p.x - q.x).abs() < 1e-9
            })
            .unwrap();
        let meridian = mesh
            .edge_ids()
            .find(|&e| {
                let [p, q] = mesh.edge_positions(e);
                let off_pole = mesh
                    .edge_vertices(e)
                    .iter()
                    .all(|&v| mesh.vertex_faces(v).count() == 4);
                (p.x - q.x).abs() > 1e-9 && off_pole
            })
            .unwrap();

        assert_eq!(find_loop(&mesh, ring_edge).len(), 16);
        assert!(find_loop(&mesh, meridian).is_empty());
    }
}
