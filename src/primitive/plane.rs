use nalgebra::{Point2, Point3, Vector2};

use super::{check_axis, check_length};
use crate::error::Result;
use crate::mesh::{MaterialId, Mesh, MeshIndex, UvPointId};

/// A single rectangular quad.
///
/// The quad lies in the plane perpendicular to `normal_axis`, faces along it,
/// and has UV points at the corners of the unit square.
#[derive(Debug, Clone)]
pub struct PlaneBuilder {
    /// Centre of the quad.
    pub center: Point3<f64>,

    /// Extent along `(normal_axis + 1) % 3` and `(normal_axis + 2) % 3`.
    pub size: Vector2<f64>,

    /// Axis the quad faces along.
    pub normal_axis: usize,

    /// Material index of the face.
    pub material: usize,
}

impl Default for PlaneBuilder {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            size: Vector2::new(1.0, 1.0),
            normal_axis: 0,
            material: 0,
        }
    }
}

impl PlaneBuilder {
    /// Set the centre.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Set the extent.
    pub fn with_size(mut self, size: Vector2<f64>) -> Self {
        self.size = size;
        self
    }

    /// Set the axis the quad faces along.
    pub fn with_normal_axis(mut self, axis: usize) -> Self {
        self.normal_axis = axis;
        self
    }

    /// Set the material index.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = material;
        self
    }

    /// Build the quad.
    pub fn build<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        check_axis("normal_axis", self.normal_axis)?;
        check_length("size.x", self.size.x)?;
        check_length("size.y", self.size.y)?;

        let mut mesh = Mesh::new();
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let uv_points: Vec<UvPointId<I>> = corners
            .iter()
            .map(|&uv| {
                let mut pos = self.center;
                pos[(self.normal_axis + 1) % 3] += self.size.x * (uv.x - 0.5);
                pos[(self.normal_axis + 2) % 3] += self.size.y * (uv.y - 0.5);
                let v = mesh.add_vertex(pos);
                mesh.add_uv_point(v, uv)
            })
            .collect();

        mesh.add_face(&uv_points, MaterialId::new(self.material));
        Ok(mesh)
    }
}
