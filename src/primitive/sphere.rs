use std::f64::consts::{PI, TAU};

use nalgebra::{Point2, Point3};

use super::{axis_direction, check_axis, check_length, check_segments};
use crate::error::{MeshError, Result};
use crate::mesh::{MaterialId, Mesh, MeshIndex, UvPointId};

/// A UV sphere: latitude rings joined by quads, closed by triangle fans at
/// the two poles on `axis`.
#[derive(Debug, Clone)]
pub struct SphereBuilder {
    /// Centre of the sphere.
    pub center: Point3<f64>,

    /// Radius.
    pub radius: f64,

    /// Number of vertices per ring.
    pub segment_count: usize,

    /// Number of bands from pole to pole; there are `ring_count - 1` rings.
    pub ring_count: usize,

    /// Pole axis.
    pub axis: usize,

    /// Material index of every face.
    pub material: usize,
}

impl Default for SphereBuilder {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 1.0,
            segment_count: 16,
            ring_count: 8,
            axis: 0,
            material: 0,
        }
    }
}

impl SphereBuilder {
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

    /// Set the number of vertices per ring.
    pub fn with_segment_count(mut self, segment_count: usize) -> Self {
        self.segment_count = segment_count;
        self
    }

    /// Set the number of bands.
    pub fn with_ring_count(mut self, ring_count: usize) -> Self {
        self.ring_count = ring_count;
        self
    }

    /// Set the pole axis.
    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = axis;
        self
    }

    /// Set the material index.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = material;
        self
    }

    /// Build the sphere.
    pub fn build<I: MeshIndex>(&self) -> Result<Mesh<I>> {
        check_axis("axis", self.axis)?;
        check_segments(self.segment_count)?;
        check_length("radius", self.radius)?;
        if self.ring_count < 2 {
            return Err(MeshError::invalid_param(
                "ring_count",
                self.ring_count,
                "must be at least 2",
            ));
        }

        let mut mesh = Mesh::new();
        let material = MaterialId::new(self.material);
        let (segments, rings) = (self.segment_count, self.ring_count);
        let (a0, a1, a2) = (self.axis, (self.axis + 1) % 3, (self.axis + 2) % 3);

        let mut grid: Vec<Vec<UvPointId<I>>> = Vec::with_capacity(rings - 1);
        for ring in 0..rings - 1 {
            let longitude = PI * (ring as f64 + 1.0 - rings as f64 * 0.5) / rings as f64;
            let row = (0..segments)
                .map(|i| {
                    let latitude = TAU * i as f64 / segments as f64;
                    let mut pos = self.center;
                    pos[a0] += self.radius * longitude.sin();
                    pos[a1] += self.radius * latitude.cos() * longitude.cos();
                    pos[a2] += self.radius * latitude.sin() * longitude.cos();
                    let v = mesh.add_vertex(pos);
                    mesh.add_uv_point(v, Point2::origin())
                })
                .collect();
            grid.push(row);
        }

        let pole = axis_direction(self.axis) * self.radius;
        let bottom_vertex = mesh.add_vertex(self.center - pole);
        let bottom = mesh.add_uv_point(bottom_vertex, Point2::origin());
        let top_vertex = mesh.add_vertex(self.center + pole);
        let top = mesh.add_uv_point(top_vertex, Point2::origin());

        let last = rings - 2;
        for i in 0..segments {
            let next = (i + 1) % segments;
            mesh.add_face(&[bottom, grid[0][next], grid[0][i]], material);
            for ring in 0..last {
                mesh.add_face(
                    &[
                        grid[ring][i],
                        grid[ring][next],
                        grid[ring + 1][next],
                        grid[ring + 1][i],
                    ],
                    material,
                );
            }
            mesh.add_face(&[grid[last][i], grid[last][next], top], material);
        }

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sphere_counts() {
        let mesh: Mesh = SphereBuilder::default().build().unwrap();
        assert_eq!(mesh.num_vertices(), 114);
        assert_eq!(mesh.num_edges(), 240);
        assert_eq!(mesh.num_faces(), 128);
        assert!(mesh.is_valid());

        // Closed surface: V - E + F = 2.
        let euler = mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64;
        assert_eq!(euler, 2);
    }

    #[test]
    fn test_sphere_on_every_axis() {
        for axis in 0..3 {
            let center = Point3::new(0.5, -1.0, 2.0);
            let mesh: Mesh = SphereBuilder::default()
                .with_axis(axis)
                .with_center(center)
                .with_radius(2.0)
                .with_segment_count(6)
                .with_ring_count(4)
                .build()
                .unwrap();

            for v in mesh.vertex_ids() {
                let r = (mesh.position(v) - center).norm();
                assert!((r - 2.0).abs() < 1e-12);
            }
            for (f, n) in mesh.face_normals(true) {
                assert!(n.dot(&(mesh.face_centroid(f) - center)) > 0.0);
            }
        }
    }

    #[test]
    fn test_two_bands_is_a_bipyramid() {
        let mesh: Mesh = SphereBuilder::default()
            .with_segment_count(4)
            .with_ring_count(2)
            .build()
            .unwrap();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 8);
    }

    #[test]
    fn test_sphere_rejects_single_band() {
        let result: Result<Mesh> = SphereBuilder::default().with_ring_count(1).build();
        assert!(result.is_err());
    }
}
