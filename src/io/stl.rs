//! STL (stereolithography) format support.
//!
//! STL stores an unindexed triangle soup. Loading welds corners with
//! bit-identical positions back into shared vertices; saving fan-triangulates
//! every polygon and writes binary STL.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, Mesh, MeshIndex};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse
/// after welding are skipped.
///
/// # Example
///
/// ```no_run
/// use polyforge::io::stl;
/// use polyforge::mesh::Mesh;
///
/// let mesh: Mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut welded: HashMap<[u32; 3], usize> = HashMap::new();
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(stl.faces.len());

    for tri in &stl.faces {
        let corners: Vec<usize> = tri
            .vertices
            .iter()
            .map(|&i| {
                let p = &stl.vertices[i];
                let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
                *welded.entry(key).or_insert_with(|| {
                    vertices.push(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
                    vertices.len() - 1
                })
            })
            .collect();

        if corners[0] != corners[1] && corners[1] != corners[2] && corners[0] != corners[2] {
            faces.push(corners);
        }
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_polygons(&vertices, None, &faces)
}

/// Save a mesh to a binary STL file.
///
/// Each polygon is split into a fan around its first corner; every triangle
/// of the fan carries the polygon's normal.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let to_vertex = |p: &Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let mut triangles: Vec<stl_io::Triangle> = Vec::new();
    for f in mesh.face_ids() {
        let n = mesh.calculate_normal(f);
        let normal = [n.x as f32, n.y as f32, n.z as f32];
        let corners: Vec<&Point3<f64>> = mesh.face_vertices(f).map(|v| mesh.position(v)).collect();

        for pair in corners[1..].windows(2) {
            triangles.push(stl_io::Triangle {
                normal: stl_io::Normal::new(normal),
                vertices: [to_vertex(corners[0]), to_vertex(pair[0]), to_vertex(pair[1])],
            });
        }
    }

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
