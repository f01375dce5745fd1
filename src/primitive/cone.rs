use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};

use super::{axis_direction, check_axis, check_length, check_segments, ring_direction};
use crate::error::Result;
use crate::mesh::{MaterialId, Mesh, MeshIndex, UvPointId};

/// A cone: an n-gon base and a fan of triangles meeting at the apex.
///
/// The base is centred on `center`; the apex sits `height` along `axis`.
#[derive(Debug, Clone)]
pub struct ConeBuilder {
    /// Centre of the base.
    pub center: Point3<f64>,

    /// Base radius.
    pub radius: f64,

    /// Distance from the base to the apex.
    pub height: f64,

    /// Number of base corners.
    pub segment_count: usize,

    /// Axis pointing from the base to the apex.
    pub axis: usize,

    /// Material index of every face.
    pub material: usize,
}

impl Default for ConeBuilder {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 1.0,
            height: 1.0,
            segment_count: 16,
            axis: 0,
            material: 0,
        }
    }
}

impl ConeBuilder {
    /// Set the base centre.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Set the base radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set the number of base corners.
    pub fn with_segment_count(mut self, segment_count: usize) -> Self {
        self.segment_count = segment_count;
        self
    }

    /// Set the axis.
    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = axis;
        self
    }

    /// Set the material index.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = material;
        self
    }

    /// Build the cone.
    pub fn build<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        check_axis("axis", self.axis)?;
        check_segments(self.segment_count)?;
        check_length("radius", self.radius)?;
        check_length("height", self.height)?;

        let mut mesh = Mesh::new();
        let material = MaterialId::new(self.material);
        let n = self.segment_count;

        let ring: Vec<UvPointId<I>> = (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                let pos = self.center + ring_direction(self.axis, angle) * self.radius;
                let v = mesh.add_vertex(pos);
                mesh.add_uv_point(v, Point2::origin())
            })
            .collect();

        let base: Vec<UvPointId<I>> = ring.iter().rev().copied().collect();
        mesh.add_face(&base, material);

        let apex_position = self.center + axis_direction(self.axis) * self.height;
        let apex_vertex = mesh.add_vertex(apex_position);
        let apex = mesh.add_uv_point(apex_vertex, Point2::origin());

        for i in 0..n {
            mesh.add_face(&[ring[i], ring[(i + 1) % n], apex], material);
        }

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_counts() {
        let mesh: Mesh = ConeBuilder::default().with_segment_count(8).build().unwrap();
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_edges(), 16);
        assert_eq!(mesh.num_faces(), 9);
        assert!(mesh.is_valid());
        for e in mesh.edge_ids() {
            assert_eq!(mesh.edge_faces(e).count(), 2);
        }
    }

    #[test]
    fn test_cone_normals_point_outward() {
        let cone = ConeBuilder::default().with_axis(1).with_height(2.0);
        let mesh: Mesh = cone.build().unwrap();
        let inside = Point3::new(0.0, 0.5, 0.0);
        for (f, n) in mesh.face_normals(false) {
            assert!(n.dot(&(mesh.face_centroid(f) - inside)) > 0.0);
        }

        let apex = mesh.vertex_ids().last().unwrap();
        assert_eq!(*mesh.position(apex), Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_cone_rejects_bad_parameters() {
        assert!(ConeBuilder::default().with_segment_count(2).build::<u32>().is_err());
        assert!(ConeBuilder::default().with_axis(3).build::<u32>().is_err());
        assert!(ConeBuilder::default().with_height(-1.0).build::<u32>().is_err());
    }
}
