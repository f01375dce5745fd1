use nalgebra::{Point2, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::{MaterialId, Mesh, MeshIndex, UvPointId};

/// An axis-aligned box made of six outward-facing quads.
#[derive(Debug, Clone)]
pub struct CubeBuilder {
    /// Minimum corner.
    pub min: Point3<f64>,

    /// Maximum corner.
    pub max: Point3<f64>,

    /// Material index of every face.
    pub material: usize,
}

impl Default for CubeBuilder {
    fn default() -> Self {
        Self {
            min: Point3::new(-1.0, -1.0, -1.0),
            max: Point3::new(1.0, 1.0, 1.0),
            material: 0,
        }
    }
}

impl CubeBuilder {
    /// Set both corners.
    pub fn with_bounds(mut self, min: Point3<f64>, max: Point3<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the material index.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = material;
        self
    }

    /// Build the box.
    pub fn build<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        for i in 0..3 {
            if !(self.min[i].is_finite() && self.max[i].is_finite() && self.min[i] < self.max[i]) {
                return Err(MeshError::invalid_param(
                    "max",
                    format!("{:?}", self.max),
                    "must exceed min on every axis",
                ));
            }
        }

        let mut mesh = Mesh::new();

        //   2    3
        // 6    7
        //   0    1
        // 4    5
        let uv: Vec<UvPointId<I>> = (0..8)
            .map(|i| {
                let pick = |bit: usize, axis: usize| {
                    if i & bit == 0 {
                        self.min[axis]
                    } else {
                        self.max[axis]
                    }
                };
                let v = mesh.add_vertex(Point3::new(pick(1, 0), pick(2, 1), pick(4, 2)));
                mesh.add_uv_point(v, Point2::origin())
            })
            .collect();

        let material = MaterialId::new(self.material);
        mesh.add_face(&[uv[0], uv[4], uv[6], uv[2]], material);
        mesh.add_face(&[uv[1], uv[3], uv[7], uv[5]], material);
        mesh.add_face(&[uv[0], uv[1], uv[5], uv[4]], material);
        mesh.add_face(&[uv[2], uv[6], uv[7], uv[3]], material);
        mesh.add_face(&[uv[0], uv[2], uv[3], uv[1]], material);
        mesh.add_face(&[uv[4], uv[5], uv[7], uv[6]], material);

        Ok(mesh)
    }
}
