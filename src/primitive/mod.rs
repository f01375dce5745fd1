//! Parametric primitive builders.
//!
//! Each builder is a plain configuration struct with public fields, sensible
//! defaults and `with_*` setters. [`build`](CubeBuilder::build) validates the
//! parameters and produces a fresh mesh whose faces all carry the configured
//! material.
//!
//! # Example
//!
//! ```
//! use polyforge::prelude::*;
//! use nalgebra::Point3;
//!
//! let sphere: Mesh = SphereBuilder::default()
//!     .with_center(Point3::new(0.0, 2.0, 0.0))
//!     .with_radius(0.5)
//!     .with_segment_count(8)
//!     .with_ring_count(4)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sphere.num_vertices(), 3 * 8 + 2);
//! ```
//!
//! Axes are given as indices: 0 for X, 1 for Y, 2 for Z. Circles, cones,
//! cylinders and spheres run their rings in the plane spanned by the two other
//! axes, starting on `(axis + 1) % 3` and turning towards `(axis + 2) % 3`.

mod cone;
mod cube;
mod cylinder;
mod plane;
mod sphere;

pub use cone::ConeBuilder;
pub use cube::CubeBuilder;
pub use cylinder::{CircleBuilder, CylinderBuilder};
pub use plane::PlaneBuilder;
pub use sphere::SphereBuilder;

use nalgebra::Vector3;

use crate::error::{MeshError, Result};

/// Reject axis indices outside 0..3.
pub(crate) fn check_axis(name: &'static str, axis: usize) -> Result<()> {
    if axis > 2 {
        return Err(MeshError::invalid_param(name, axis, "must be 0, 1 or 2"));
    }
    Ok(())
}

/// Reject rings with fewer than three segments.
pub(crate) fn check_segments(segment_count: usize) -> Result<()> {
    if segment_count < 3 {
        return Err(MeshError::invalid_param(
            "segment_count",
            segment_count,
            "must be at least 3",
        ));
    }
    Ok(())
}

/// Reject lengths that are not finite and positive.
pub(crate) fn check_length(name: &'static str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(MeshError::invalid_param(name, value, "must be finite and positive"));
    }
    Ok(())
}

/// Unit vector at `angle` in the plane perpendicular to `axis`.
pub(crate) fn ring_direction(axis: usize, angle: f64) -> Vector3<f64> {
    let mut offset = Vector3::zeros();
    offset[(axis + 1) % 3] = angle.cos();
    offset[(axis + 2) % 3] = angle.sin();
    offset
}

/// Unit vector along `axis`.
pub(crate) fn axis_direction(axis: usize) -> Vector3<f64> {
    let mut direction = Vector3::zeros();
    direction[axis] = 1.0;
    direction
}
