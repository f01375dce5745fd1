//! Connected vertex sets.

use std::collections::HashSet;

use crate::mesh::{Mesh, MeshIndex, VertexId};

/// Collect every vertex reachable from `seeds` through live edges.
///
/// The seeds themselves are part of the result.
///
/// # Example
/// ```
/// use polyforge::prelude::*;
/// use nalgebra::Point3;
///
/// let mut mesh: Mesh = CubeBuilder::default().build().unwrap();
/// let lonely = mesh.add_vertex(Point3::origin());
///
/// let first = mesh.vertex_ids().next().unwrap();
/// let connected = find_connected(&mesh, [first]);
/// assert_eq!(connected.len(), 8);
/// assert!(!connected.contains(&lonely));
/// ```
pub fn find_connected<I, V>(mesh: &Mesh<I>, seeds: V) -> HashSet<VertexId<I>>
where
    I: MeshIndex,
    V: IntoIterator<Item = VertexId<I>>,
{
    let mut found: HashSet<VertexId<I>> = HashSet::new();
    let mut stack: Vec<VertexId<I>> = Vec::new();

    for v in seeds {
        if found.insert(v) {
            stack.push(v);
        }
    }

    while let Some(v) = stack.pop() {
        for e in mesh.vertex_edges(v) {
            let other = mesh.opposite_vertex(e, v);
            if found.insert(other) {
                stack.push(other);
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{ConeBuilder, CubeBuilder};

    #[test]
    fn test_two_islands() {
        let mut mesh: Mesh = CubeBuilder::default().build().unwrap();
        let cone: Mesh = ConeBuilder::default().build().unwrap();
        mesh.merge(&cone);

        let cube_vertex = VertexId::new(0);
        let cone_vertex = VertexId::new(8);

        let cube_part = find_connected(&mesh, [cube_vertex]);
        assert_eq!(cube_part.len(), 8);
        assert!(cube_part.iter().all(|v| v.index() < 8));

        let cone_part = find_connected(&mesh, [cone_vertex]);
        assert_eq!(cone_part.len(), 17);

        let both = find_connected(&mesh, [cube_vertex, cone_vertex, cone_vertex]);
        assert_eq!(both.len(), mesh.num_vertices());
    }

    #[test]
    fn test_removed_edges_disconnect() {
        let mut mesh: Mesh = CubeBuilder::default().build().unwrap();
        let v = VertexId::new(0);
        let edges: Vec<_> = mesh.vertex_edges(v).collect();
        for e in edges {
            mesh.remove_edge(e);
        }

        let alone = find_connected(&mesh, [v]);
        assert_eq!(alone.len(), 1);
        assert_eq!(find_connected(&mesh, [VertexId::new(7)]).len(), 7);
    }
}
