use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};

use super::{axis_direction, check_axis, check_length, check_segments, ring_direction};
use crate::algo::extrude;
use crate::error::Result;
use crate::mesh::{MaterialId, Mesh, MeshIndex, UvPointId, VertexId};

/// A flat regular polygon facing along `normal_axis`.
#[derive(Debug, Clone)]
pub struct CircleBuilder {
    /// Centre of the circle.
    pub center: Point3<f64>,

    /// Circumradius.
    pub radius: f64,

    /// Number of corners.
    pub segment_count: usize,

    /// Axis the face points along.
    pub normal_axis: usize,

    /// Material index of the face.
    pub material: usize,
}

impl Default for CircleBuilder {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 1.0,
            segment_count: 16,
            normal_axis: 0,
            material: 0,
        }
    }
}

impl CircleBuilder {
    /// Set the centre.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Set the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the number of corners.
    pub fn with_segment_count(mut self, segment_count: usize) -> Self {
        self.segment_count = segment_count;
        self
    }

    /// Set the axis the face points along.
    pub fn with_normal_axis(mut self, axis: usize) -> Self {
        self.normal_axis = axis;
        self
    }

    /// Set the material index.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = material;
        self
    }

    /// Build the polygon.
    pub fn build<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        check_axis("normal_axis", self.normal_axis)?;
        check_segments(self.segment_count)?;
        check_length("radius", self.radius)?;

        let mut mesh = Mesh::new();
        let n = self.segment_count;
        let uv_points: Vec<UvPointId<I>> = (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                let pos = self.center + ring_direction(self.normal_axis, angle) * self.radius;
                let v = mesh.add_vertex(pos);
                mesh.add_uv_point(v, Point2::origin())
            })
            .collect();

        mesh.add_face(&uv_points, MaterialId::new(self.material));
        Ok(mesh)
    }
}

/// A closed prism over a regular polygon.
///
/// Built by extruding a [`CircleBuilder`] disc (keeping a flipped copy as the
/// bottom cap) and moving the extruded ring `height` along `axis`.
#[derive(Debug, Clone)]
pub struct CylinderBuilder {
    /// Centre of the bottom cap.
    pub center: Point3<f64>,

    /// Radius.
    pub radius: f64,

    /// Distance between the caps.
    pub height: f64,

    /// Number of side quads.
    pub segment_count: usize,

    /// Axis from the bottom cap to the top cap.
    pub axis: usize,

    /// Material index of every face.
    pub material: usize,
}

impl Default for CylinderBuilder {
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

impl CylinderBuilder {
    /// Set the centre of the bottom cap.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Set the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set the number of side quads.
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

    /// Build the cylinder.
    pub fn build<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        check_length("height", self.height)?;

        let mut mesh = CircleBuilder {
            center: self.center,
            radius: self.radius,
            segment_count: self.segment_count,
            normal_axis: self.axis,
            material: self.material,
        }
        .build()?;

        let ring: Vec<VertexId<I>> = mesh.vertex_ids().collect();
        let offset = axis_direction(self.axis) * self.height;
        for v in extrude(&mut mesh, &ring, true) {
            let pos = *mesh.position(v) + offset;
            mesh.set_position(v, pos);
        }

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;
    use nalgebra::Vector3;

    #[test]
    fn test_circle() {
        let mesh: Mesh = CircleBuilder::default().with_normal_axis(2).build().unwrap();
        assert_eq!(mesh.num_vertices(), 16);
        assert_eq!(mesh.num_edges(), 16);
        assert_eq!(mesh.num_faces(), 1);

        let f = mesh.face_ids().next().unwrap();
        assert!((mesh.calculate_normal(f) - Vector3::z()).norm() < 1e-12);
        for v in mesh.vertex_ids() {
            assert!((mesh.position(v).coords.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cylinder_counts() {
        let mesh: Mesh = CylinderBuilder::default().with_segment_count(8).build().unwrap();
        assert_eq!(mesh.num_vertices(), 16);
        assert_eq!(mesh.num_edges(), 24);
        assert_eq!(mesh.num_faces(), 10);
        assert!(mesh.is_valid());
        for e in mesh.edge_ids() {
            assert_eq!(mesh.edge_faces(e).count(), 2);
        }
    }

    #[test]
    fn test_cylinder_normals_point_outward() {
        for axis in 0..3 {
            let builder = CylinderBuilder::default()
                .with_segment_count(8)
                .with_axis(axis)
                .with_height(2.0)
                .with_center(Point3::new(1.0, 1.0, 1.0));
            let mesh: Mesh = builder.build().unwrap();

            let mut direction = Vector3::zeros();
            direction[axis] = 1.0;
            let middle = builder.center + direction;

            let mut caps: Vec<FaceId> = Vec::new();
            for (f, n) in mesh.face_normals(false) {
                let centroid = mesh.face_centroid(f);
                assert!(n.dot(&(centroid - middle)) > 0.0, "axis {} {:?}", axis, f);
                if mesh.face(f).len() == 8 {
                    caps.push(f);
                }
            }
            assert_eq!(caps.len(), 2);
        }
    }

    #[test]
    fn test_side_normals_point_away_from_axis() {
        let mesh: Mesh = CylinderBuilder::default().with_segment_count(8).build().unwrap();
        for (f, n) in mesh.face_normals(false) {
            if mesh.face(f).len() != 4 {
                continue;
            }
            let c = mesh.face_centroid(f);
            let radial = Vector3::new(0.0, c.y, c.z);
            assert!(n.dot(&radial) > 0.0);
            assert!(n.x.abs() < 1e-12);
        }
    }
}
