//! Face orientation.

use crate::mesh::{FaceId, Mesh, MeshIndex, UvPointId};

/// Reverse the winding of a face.
///
/// The face is replaced by a new face over the reversed UV loop with the same
/// material. Returns the new face.
pub fn flip_face<I: MeshIndex>(mesh: &mut Mesh<I>, face: FaceId<I>) -> FaceId<I> {
    let reversed: Vec<UvPointId<I>> = mesh.face_uv_points(face).iter().rev().copied().collect();
    let material = mesh.material(face);
    let flipped = mesh.add_face(&reversed, material);
    mesh.remove_face(face);
    flipped
}
