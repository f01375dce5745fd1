//! Native JSON format, holding a [`MeshData`] envelope.
//!
//! This is the only format that keeps every attribute: UV seams, selection,
//! corner and crease weights, sharp flags and materials.

use std::fs;
use std::path::Path;

use super::mesh_data::MeshData;
use crate::error::Result;
use crate::mesh::{Mesh, MeshIndex};

/// Load a mesh from a JSON file.
///
/// # Example
///
/// ```no_run
/// use polyforge::io::json;
/// use polyforge::mesh::Mesh;
///
/// let mesh: Mesh = json::load("model.json").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let text = fs::read_to_string(path)?;
    MeshData::from_json(&text)?.to_mesh()
}

/// Save a mesh to a JSON file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let text = MeshData::from_mesh(mesh).to_json()?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::split_sharp_edges;
    use crate::primitive::CubeBuilder;

    #[test]
    fn test_json_file_keeps_attributes() {
        let mut mesh: Mesh = CubeBuilder::default().with_material(2).build().unwrap();
        for e in mesh.edge_ids().collect::<Vec<_>>() {
            mesh.set_sharp(e, true);
            mesh.set_crease(e, 0.25);
        }
        split_sharp_edges(&mut mesh);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.json");
        save(&mesh, &path).unwrap();
        let loaded: Mesh = load(&path).unwrap();

        assert_eq!(loaded.num_vertices(), 24);
        assert_eq!(loaded.num_uv_points(), 24);
        assert_eq!(loaded.num_faces(), 6);
        assert!(loaded.edge_ids().all(|e| loaded.is_sharp(e) && loaded.crease(e) == 0.25));
        assert!(loaded.face_ids().all(|f| loaded.material(f).index() == 2));
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"vertex\": 3 }").unwrap();
        assert!(load::<_, u32>(&path).is_err());
    }
}
