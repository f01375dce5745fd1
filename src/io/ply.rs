//! PLY (Stanford polygon) format support.
//!
//! Faces are loaded as arbitrary polygons. Per-vertex texture coordinates
//! named `s`/`t` or `u`/`v` become the position of each vertex's UV point.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, Mesh, MeshIndex};

/// Load a mesh from a PLY file (ASCII or binary).
///
/// # Example
///
/// ```no_run
/// use polyforge::io::ply;
/// use polyforge::mesh::Mesh;
///
/// let mesh: Mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    let mut uvs: Vec<Point2<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x").ok_or_else(|| load_error("vertex missing x"))?;
        let y = get_float_property(vertex, "y").ok_or_else(|| load_error("vertex missing y"))?;
        let z = get_float_property(vertex, "z").ok_or_else(|| load_error("vertex missing z"))?;
        vertices.push(Point3::new(x, y, z));

        let uv = get_float_property(vertex, "s")
            .zip(get_float_property(vertex, "t"))
            .or_else(|| get_float_property(vertex, "u").zip(get_float_property(vertex, "v")));
        if let Some((s, t)) = uv {
            uvs.push(Point2::new(s, t));
        }
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        faces.push(indices);
    }

    // Texture coordinates only count when every vertex has them.
    let uvs = (!uvs.is_empty() && uvs.len() == vertices.len()).then_some(uvs.as_slice());
    log::debug!(
        "read {} vertices and {} faces from {}",
        vertices.len(),
        faces.len(),
        path.display()
    );
    build_from_polygons(&vertices, uvs, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to an ASCII PLY file.
///
/// Each vertex is written with the position of its first UV point as `s`/`t`.
/// Faces keep their full polygon.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mesh = mesh.collect_garbage();
    let (vertices, faces) = to_face_vertex(&mesh);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by polyforge")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "property double s")?;
    writeln!(writer, "property double t")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for (v, p) in mesh.vertex_ids().zip(&vertices) {
        let uv = mesh
            .vertex_uv_points(v)
            .next()
            .map_or_else(Point2::origin, |uv| *mesh.uv_position(uv));
        writeln!(writer, "{} {} {} {} {}", p.x, p.y, p.z, uv.x, uv.y)?;
    }

    for face in &faces {
        if face.len() > u8::MAX as usize {
            return Err(MeshError::SaveError {
                path: path.to_path_buf(),
                message: format!("face with {} corners does not fit a uchar count", face.len()),
            });
        }
        write!(writer, "{}", face.len())?;
        for i in face {
            write!(writer, " {}", i)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
