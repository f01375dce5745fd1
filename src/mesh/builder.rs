//! Conversion between face-vertex index lists and [`Mesh`].
//!
//! File formats usually store a list of positions and a list of polygons
//! indexing into it. These helpers turn such data into a mesh (one UV point
//! per vertex) and back.

use std::collections::HashSet;

use nalgebra::{Point2, Point3};

use super::handle::{MaterialId, MeshIndex, UvPointId};
use super::polygon::Mesh;
use crate::error::{MeshError, Result};

/// Build a mesh from vertex positions and polygon index lists.
///
/// Every vertex gets exactly one UV point, placed at `uvs[i]` when texture
/// coordinates are supplied and at the origin otherwise. All faces use the
/// default material.
///
/// # Example
/// ```
/// use polyforge::mesh::{build_from_polygons, Mesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: Mesh = build_from_polygons(&vertices, None, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_edges(), 4);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    uvs: Option<&[Point2<f64>]>,
    faces: &[Vec<usize>],
) -> Result<Mesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    if let Some(uvs) = uvs {
        if uvs.len() != vertices.len() {
            return Err(MeshError::LengthMismatch {
                field: "uv",
                expected: vertices.len(),
                actual: uvs.len(),
            });
        }
    }

    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for (k, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[..k].contains(&vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    let max = I::MAX.to_usize();
    let edge_count = faces
        .iter()
        .flat_map(|face| {
            (0..face.len()).map(move |k| {
                let (a, b) = (face[k], face[(k + 1) % face.len()]);
                (a.min(b), a.max(b))
            })
        })
        .collect::<HashSet<_>>()
        .len();
    for (field, count) in [
        ("vertex", vertices.len()),
        ("edge", edge_count),
        ("face", faces.len()),
    ] {
        if count > max {
            return Err(MeshError::TooManyEntities { field, count, max });
        }
    }

    let mut mesh = Mesh::new();
    let uv_ids: Vec<UvPointId<I>> = vertices
        .iter()
        .enumerate()
        .map(|(i, &pos)| {
            let v = mesh.add_vertex(pos);
            let uv = uvs.map_or_else(Point2::origin, |uvs| uvs[i]);
            mesh.add_uv_point(v, uv)
        })
        .collect();

    for face in faces {
        let loop_uvs: Vec<UvPointId<I>> = face.iter().map(|&vi| uv_ids[vi]).collect();
        mesh.add_face(&loop_uvs, MaterialId::default());
    }

    Ok(mesh)
}

/// Extract positions and polygon index lists from a mesh.
///
/// The mesh is compacted first, so the returned indices are dense. UV seams
/// are dropped: polygons index vertices, not UV points.
pub fn to_face_vertex<I: MeshIndex>(mesh: &Mesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let mesh = mesh.collect_garbage();

    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_lists() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let faces = vec![
            vec![0, 4, 6, 2],
            vec![1, 3, 7, 5],
            vec![0, 1, 5, 4],
            vec![2, 6, 7, 3],
            vec![0, 2, 3, 1],
            vec![4, 5, 7, 6],
        ];
        (vertices, faces)
    }

    #[test]
    fn test_build_cube() {
        let (vertices, faces) = cube_lists();
        let mesh: Mesh = build_from_polygons(&vertices, None, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_uv_points(), 8);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_faces(), 6);
        assert!(mesh.is_valid());

        for e in mesh.edge_ids() {
            assert_eq!(mesh.edge_faces(e).count(), 2);
        }
    }

    #[test]
    fn test_round_trip_face_vertex() {
        let (vertices, faces) = cube_lists();
        let mesh: Mesh = build_from_polygons(&vertices, None, &faces).unwrap();
        let (out_vertices, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_vertices, vertices);
        assert_eq!(out_faces, faces);
    }

    #[test]
    fn test_uvs_are_attached() {
        let (vertices, faces) = cube_lists();
        let uvs: Vec<Point2<f64>> = (0..8).map(|i| Point2::new(i as f64, 0.5)).collect();
        let mesh: Mesh = build_from_polygons(&vertices, Some(&uvs), &faces).unwrap();
        for uv in mesh.uv_point_ids() {
            let v = mesh.uv_point_vertex(uv);
            assert_eq!(mesh.uv_position(uv).x, v.index() as f64);
        }
    }

    #[test]
    fn test_invalid_input() {
        let (vertices, _) = cube_lists();

        let empty: Result<Mesh> = build_from_polygons(&vertices, None, &[]);
        assert!(matches!(empty, Err(MeshError::EmptyMesh)));

        let out_of_range: Result<Mesh> = build_from_polygons(&vertices, None, &[vec![0, 1, 9]]);
        assert!(matches!(
            out_of_range,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 9 })
        ));

        let repeated: Result<Mesh> = build_from_polygons(&vertices, None, &[vec![0, 1, 0]]);
        assert!(matches!(repeated, Err(MeshError::DegenerateFace { face: 0 })));

        let too_short: Result<Mesh> = build_from_polygons(&vertices, None, &[vec![0, 1]]);
        assert!(matches!(too_short, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_too_many_vertices_for_index_type() {
        let vertices = vec![Point3::origin(); 70_000];
        let faces = vec![vec![0, 1, 69_999]];

        let small: Result<Mesh<u16>> = build_from_polygons(&vertices, None, &faces);
        assert!(matches!(
            small,
            Err(MeshError::TooManyEntities { field: "vertex", count: 70_000, .. })
        ));

        let wide: Mesh<u32> = build_from_polygons(&vertices, None, &faces).unwrap();
        assert_eq!(wide.num_vertices(), 70_000);
        assert_eq!(wide.num_faces(), 1);
    }
}
