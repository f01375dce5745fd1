//! Mesh file I/O.
//!
//! This module provides functions for loading and saving meshes in various formats.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | polyforge JSON | `.json` | ✓ | ✓ | Lossless [`MeshData`] envelope |
//! | PLY | `.ply` | ✓ | ✓ | Polygons, optional `s`/`t` or `u`/`v` |
//! | STL | `.stl` | ✓ | ✓ | Triangles only; binary and ASCII load |
//!
//! # Usage
//!
//! ```no_run
//! use polyforge::io::{load, save};
//! use polyforge::mesh::Mesh;
//!
//! // Load with automatic format detection
//! let mesh: Mesh = load("model.ply").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.json").unwrap();
//! ```

pub mod json;
mod mesh_data;
pub mod ply;
pub mod stl;

pub use mesh_data::MeshData;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Native JSON envelope.
    Json,
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn detect(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let mesh = match Format::detect(path)? {
        Format::Json => json::load(path)?,
        Format::Ply => ply::load(path)?,
        Format::Stl => stl::load(path)?,
    };
    log::debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Json => json::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::ConeBuilder;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/model.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.json"), Some(Format::Json));
        assert_eq!(Format::from_path("mesh.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("mesh.obj"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unknown_extension() {
        let mesh: Mesh = ConeBuilder::default().build().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = save(&mesh, dir.path().join("cone.obj"));
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "obj"
        ));
        assert!(matches!(
            load::<_, u32>(dir.path().join("cone")),
            Err(MeshError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_dispatch_round_trip() {
        let mesh: Mesh = ConeBuilder::default().with_segment_count(5).build().unwrap();
        let dir = tempfile::tempdir().unwrap();

        for name in ["cone.json", "cone.ply"] {
            let path = dir.path().join(name);
            save(&mesh, &path).unwrap();
            let loaded: Mesh = load(&path).unwrap();
            assert_eq!(loaded.num_vertices(), 6, "{}", name);
            assert_eq!(loaded.num_faces(), 6, "{}", name);
        }

        let path = dir.path().join("cone.stl");
        save(&mesh, &path).unwrap();
        let loaded: Mesh = load(&path).unwrap();
        assert_eq!(loaded.num_vertices(), 6);
        assert_eq!(loaded.num_faces(), 8);
    }
}
