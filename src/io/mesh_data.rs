//! Column-oriented mesh snapshot.
//!
//! [`MeshData`] flattens a compacted mesh into eleven parallel arrays, one per
//! attribute, which is the layout used for persistence. The JSON form nests
//! the columns under `vertex`, `uvPoint`, `edge` and `face`, and stores each
//! column as the base64 encoding of its in-memory bytes:
//!
//! ```json
//! {
//!   "vertex":  { "position": "...", "selected": "...", "corner": "..." },
//!   "uvPoint": { "position": "...", "vertex": "..." },
//!   "edge":    { "sharp": "...", "vertices": "...", "crease": "..." },
//!   "face":    { "material": "...", "vertexCount": "...", "uvPoint": "..." }
//! }
//! ```

use std::collections::HashSet;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytemuck::Pod;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::mesh::{MaterialId, Mesh, MeshIndex, UvPointId, VertexId};

/// A mesh flattened into parallel attribute columns.
///
/// Entity `i` of each kind owns element `i` of that kind's columns. Faces are
/// stored as a run-length list: face `i` owns `face_vertex_counts[i]`
/// consecutive entries of `face_uv_points`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Envelope", into = "Envelope")]
pub struct MeshData {
    /// Vertex positions.
    pub vertex_positions: Vec<[f64; 3]>,
    /// Vertex selection flags (0 or 1).
    pub vertex_selected: Vec<u8>,
    /// Vertex corner weights.
    pub vertex_corners: Vec<f64>,

    /// UV point positions.
    pub uv_positions: Vec<[f64; 2]>,
    /// Index of the vertex owning each UV point.
    pub uv_vertices: Vec<i32>,

    /// Vertex indices at both ends of each edge.
    pub edge_vertices: Vec<[i32; 2]>,
    /// Edge sharp flags (0 or 1).
    pub edge_sharp: Vec<u8>,
    /// Edge crease weights.
    pub edge_creases: Vec<f64>,

    /// Material index of each face.
    pub face_materials: Vec<i32>,
    /// Number of corners of each face.
    pub face_vertex_counts: Vec<i32>,
    /// UV point indices of every face, concatenated.
    pub face_uv_points: Vec<i32>,
}

impl MeshData {
    /// Flatten `mesh`. Tombstoned entities are dropped by compacting first.
    pub fn from_mesh<I: MeshIndex>(mesh: &Mesh<I>) -> Self {
        let mesh = mesh.collect_garbage();
        let mut data = MeshData::default();

        for v in mesh.vertex_ids() {
            data.vertex_positions.push(mesh.position(v).coords.into());
            data.vertex_selected.push(u8::from(mesh.is_selected(v)));
            data.vertex_corners.push(mesh.corner(v));
        }
        for uv in mesh.uv_point_ids() {
            data.uv_positions.push(mesh.uv_position(uv).coords.into());
            data.uv_vertices.push(mesh.uv_point_vertex(uv).index() as i32);
        }
        for e in mesh.edge_ids() {
            let [v0, v1] = mesh.edge_vertices(e);
            data.edge_vertices.push([v0.index() as i32, v1.index() as i32]);
            data.edge_sharp.push(u8::from(mesh.is_sharp(e)));
            data.edge_creases.push(mesh.crease(e));
        }
        for f in mesh.face_ids() {
            let uv_points = mesh.face_uv_points(f);
            data.face_materials.push(mesh.material(f).index() as i32);
            data.face_vertex_counts.push(uv_points.len() as i32);
            data.face_uv_points.extend(uv_points.iter().map(|uv| uv.index() as i32));
        }

        data
    }

    /// Rebuild a mesh from the columns.
    ///
    /// Every column is checked before anything is built, so malformed data is
    /// reported as an error rather than tripping a panic in the mesh API. That
    /// includes entity counts the index type `I` cannot address.
    pub fn to_mesh<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        self.validate::<I>()?;

        let mut mesh = Mesh::new();

        for (i, p) in self.vertex_positions.iter().enumerate() {
            let v = mesh.add_vertex(Point3::from(*p));
            mesh.set_selected(v, self.vertex_selected[i] != 0);
            mesh.set_corner(v, self.vertex_corners[i]);
        }

        for (p, &v) in self.uv_positions.iter().zip(&self.uv_vertices) {
            mesh.add_uv_point(VertexId::new(v as usize), Point2::from(*p));
        }

        for (i, &[v0, v1]) in self.edge_vertices.iter().enumerate() {
            let e = mesh.add_edge(VertexId::new(v0 as usize), VertexId::new(v1 as usize));
            mesh.set_sharp(e, self.edge_sharp[i] != 0);
            mesh.set_crease(e, self.edge_creases[i]);
        }

        let mut offset = 0;
        for (&count, &material) in self.face_vertex_counts.iter().zip(&self.face_materials) {
            let count = count as usize;
            let uv_points: Vec<UvPointId<I>> = self.face_uv_points[offset..offset + count]
                .iter()
                .map(|&uv| UvPointId::new(uv as usize))
                .collect();
            offset += count;
            mesh.add_face(&uv_points, MaterialId::new(material as usize));
        }

        Ok(mesh)
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the JSON envelope.
    ///
    /// Unlike going through `serde_json` directly, a column that fails to
    /// decode is reported as [`MeshError::MalformedBuffer`].
    pub fn from_json(json: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(json)?;
        MeshData::try_from(envelope)
    }

    fn validate<I: MeshIndex>(&self) -> Result<()> {
        let max = I::MAX.to_usize();
        let vertex_count = self.vertex_positions.len();
        check_capacity("vertex.position", vertex_count, max)?;
        expect_len("vertex.selected", vertex_count, self.vertex_selected.len())?;
        expect_len("vertex.corner", vertex_count, self.vertex_corners.len())?;

        let uv_count = self.uv_positions.len();
        check_capacity("uvPoint.position", uv_count, max)?;
        expect_len("uvPoint.vertex", uv_count, self.uv_vertices.len())?;
        for &v in &self.uv_vertices {
            check_index("uvPoint.vertex", v, vertex_count)?;
        }

        let edge_count = self.edge_vertices.len();
        expect_len("edge.sharp", edge_count, self.edge_sharp.len())?;
        expect_len("edge.crease", edge_count, self.edge_creases.len())?;
        for (i, &[v0, v1]) in self.edge_vertices.iter().enumerate() {
            check_index("edge.vertices", v0, vertex_count)?;
            check_index("edge.vertices", v1, vertex_count)?;
            if v0 == v1 {
                return Err(MeshError::MalformedBuffer {
                    field: "edge.vertices",
                    message: format!("edge {} joins vertex {} to itself", i, v0),
                });
            }
        }

        expect_len(
            "face.material",
            self.face_vertex_counts.len(),
            self.face_materials.len(),
        )?;
        check_capacity("face.vertexCount", self.face_vertex_counts.len(), max)?;
        if let Some(&m) = self.face_materials.iter().find(|&&m| m < 0) {
            return Err(MeshError::MalformedBuffer {
                field: "face.material",
                message: format!("negative material index {}", m),
            });
        }
        if let Some(&m) = self.face_materials.iter().find(|&&m| m as usize > max) {
            return Err(MeshError::TooManyEntities {
                field: "face.material",
                count: m as usize + 1,
                max,
            });
        }

        // Faces may need edges the edge column lacks, so count distinct pairs.
        let mut pairs: HashSet<(i32, i32)> = self
            .edge_vertices
            .iter()
            .map(|&[v0, v1]| (v0.min(v1), v0.max(v1)))
            .collect();

        let mut offset = 0usize;
        for (face, &count) in self.face_vertex_counts.iter().enumerate() {
            if count < 3 {
                return Err(MeshError::DegenerateFace { face });
            }
            let end = offset + count as usize;
            let corners = self
                .face_uv_points
                .get(offset..end)
                .ok_or(MeshError::LengthMismatch {
                    field: "face.uvPoint",
                    expected: end,
                    actual: self.face_uv_points.len(),
                })?;

            for &uv in corners {
                check_index("face.uvPoint", uv, uv_count)?;
            }
            // Neighbouring corners on one vertex would need an edge to itself.
            for (i, &uv) in corners.iter().enumerate() {
                let v0 = self.uv_vertices[uv as usize];
                let v1 = self.uv_vertices[corners[(i + 1) % corners.len()] as usize];
                if v0 == v1 {
                    return Err(MeshError::DegenerateFace { face });
                }
                pairs.insert((v0.min(v1), v0.max(v1)));
            }
            offset = end;
        }
        expect_len("face.uvPoint", offset, self.face_uv_points.len())?;
        check_capacity("edge.vertices", pairs.len(), max)
    }
}

fn expect_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MeshError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

fn check_capacity(field: &'static str, count: usize, max: usize) -> Result<()> {
    if count <= max {
        Ok(())
    } else {
        Err(MeshError::TooManyEntities { field, count, max })
    }
}

fn check_index(field: &'static str, index: i32, len: usize) -> Result<()> {
    if index >= 0 && (index as usize) < len {
        Ok(())
    } else {
        Err(MeshError::InvalidIndex {
            field,
            index: i64::from(index),
            len,
        })
    }
}

// ==================== JSON envelope ====================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    vertex: VertexColumns,
    uv_point: UvPointColumns,
    edge: EdgeColumns,
    face: FaceColumns,
}

#[derive(Serialize, Deserialize)]
struct VertexColumns {
    position: String,
    selected: String,
    corner: String,
}

#[derive(Serialize, Deserialize)]
struct UvPointColumns {
    position: String,
    vertex: String,
}

#[derive(Serialize, Deserialize)]
struct EdgeColumns {
    sharp: String,
    vertices: String,
    crease: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaceColumns {
    material: String,
    vertex_count: String,
    uv_point: String,
}

fn encode<T: Pod>(column: &[T]) -> String {
    BASE64.encode(bytemuck::cast_slice::<T, u8>(column))
}

fn decode<T: Pod>(field: &'static str, text: &str) -> Result<Vec<T>> {
    let bytes = BASE64
        .decode(text)
        .map_err(|e| MeshError::MalformedBuffer {
            field,
            message: e.to_string(),
        })?;

    let width = std::mem::size_of::<T>();
    if bytes.len() % width != 0 {
        return Err(MeshError::MalformedBuffer {
            field,
            message: format!("{} bytes is not a multiple of {}", bytes.len(), width),
        });
    }

    Ok(bytes
        .chunks_exact(width)
        .map(bytemuck::pod_read_unaligned::<T>)
        .collect())
}

impl From<MeshData> for Envelope {
    fn from(data: MeshData) -> Self {
        Envelope {
            vertex: VertexColumns {
                position: encode(&data.vertex_positions),
                selected: encode(&data.vertex_selected),
                corner: encode(&data.vertex_corners),
            },
            uv_point: UvPointColumns {
                position: encode(&data.uv_positions),
                vertex: encode(&data.uv_vertices),
            },
            edge: EdgeColumns {
                sharp: encode(&data.edge_sharp),
                vertices: encode(&data.edge_vertices),
                crease: encode(&data.edge_creases),
            },
            face: FaceColumns {
                material: encode(&data.face_materials),
                vertex_count: encode(&data.face_vertex_counts),
                uv_point: encode(&data.face_uv_points),
            },
        }
    }
}

impl TryFrom<Envelope> for MeshData {
    type Error = MeshError;

    fn try_from(json: Envelope) -> Result<Self> {
        Ok(MeshData {
            vertex_positions: decode("vertex.position", &json.vertex.position)?,
            vertex_selected: decode("vertex.selected", &json.vertex.selected)?,
            vertex_corners: decode("vertex.corner", &json.vertex.corner)?,
            uv_positions: decode("uvPoint.position", &json.uv_point.position)?,
            uv_vertices: decode("uvPoint.vertex", &json.uv_point.vertex)?,
            edge_vertices: decode("edge.vertices", &json.edge.vertices)?,
            edge_sharp: decode("edge.sharp", &json.edge.sharp)?,
            edge_creases: decode("edge.crease", &json.edge.crease)?,
            face_materials: decode("face.material", &json.face.material)?,
            face_vertex_counts: decode("face.vertexCount", &json.face.vertex_count)?,
            face_uv_points: decode("face.uvPoint", &json.face.uv_point)?,
        })
    }
}
