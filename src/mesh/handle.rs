//! Typed handles for mesh entities.
//!
//! Every entity kind (vertex, UV point, edge, face, material) has its own
//! handle type so they cannot be mixed up. A handle is only an index into the
//! table of the [`Mesh`](super::Mesh) that produced it; comparing handles from
//! different meshes is meaningless.
//!
//! The handles are generic over the underlying integer type, so small meshes
//! can use `u16` and very large meshes `u64`. The default is `u32`.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for integer types that can back a mesh handle.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The maximum valid index value.
    const MAX: Self;

    /// A sentinel value representing an invalid/null index.
    const INVALID: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= <Self as MeshIndex>::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// Handle of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Handle of a UV point.
///
/// A UV point belongs to exactly one vertex. A vertex with several UV points
/// sits on a UV seam.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct UvPointId<I: MeshIndex = u32>(I);

/// Handle of an (undirected) edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId<I: MeshIndex = u32>(I);

/// Handle of a polygonal face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

/// Handle of a material slot.
///
/// Materials are not stored in the mesh; the handle is an opaque tag carried
/// by each face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct MaterialId<I: MeshIndex = u32>(I);

macro_rules! impl_handle_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new handle from a raw index.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Create an invalid/null handle.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Get the raw value of the underlying type.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Check if this is a valid (non-null) handle.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_handle_type!(VertexId, "V");
impl_handle_type!(UvPointId, "UV");
impl_handle_type!(EdgeId, "E");
impl_handle_type!(FaceId, "F");
impl_handle_type!(MaterialId, "M");

macro_rules! impl_invalid_default {
    ($($name:ident),*) => {
        $(
            impl<I: MeshIndex> Default for $name<I> {
                fn default() -> Self {
                    Self::invalid()
                }
            }
        )*
    };
}

impl_invalid_default!(VertexId, UvPointId, EdgeId, FaceId);

// Materials are tags, not table slots, so merging never shifts them.
macro_rules! impl_offset {
    ($($name:ident),*) => {
        $(
            impl<I: MeshIndex> $name<I> {
                /// Shift the handle by `offset` slots; invalid handles stay invalid.
                #[inline]
                pub(crate) fn offset(self, offset: usize) -> Self {
                    if self.is_valid() {
                        Self::new(self.index() + offset)
                    } else {
                        self
                    }
                }
            }
        )*
    };
}

impl_offset!(VertexId, UvPointId, EdgeId, FaceId);

/// The default material is slot 0, so faces built without an explicit
/// material still carry a usable handle.
impl<I: MeshIndex> Default for MaterialId<I> {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v: VertexId = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());

        let invalid: VertexId = VertexId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(VertexId::<u32>::default(), invalid);
    }

    #[test]
    fn test_material_default_is_slot_zero() {
        let m: MaterialId = MaterialId::default();
        assert!(m.is_valid());
        assert_eq!(m.index(), 0);
    }

    #[test]
    fn test_offset_keeps_invalid() {
        let e: EdgeId = EdgeId::new(3);
        assert_eq!(e.offset(10).index(), 13);

        let invalid: EdgeId = EdgeId::invalid();
        assert!(!invalid.offset(10).is_valid());
    }

    #[test]
    fn test_sentinel_is_never_handed_out() {
        assert_eq!(<u16 as MeshIndex>::MAX, 65_534);
        let last: VertexId<u16> = VertexId::new(65_534);
        assert!(last.is_valid());
        assert_eq!(last.index(), 65_534);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "index 65535 too large for u16")]
    fn test_sentinel_index_panics() {
        let _: VertexId<u16> = VertexId::new(65_535);
    }

    #[test]
    fn test_small_indices() {
        let uv: UvPointId<u16> = UvPointId::new(1000);
        assert_eq!(uv.index(), 1000);
        assert_eq!(uv.raw(), 1000u16);
    }

    #[test]
    fn test_debug_format() {
        let v: VertexId = VertexId::new(42);
        assert_eq!(format!("{:?}", v), "V(42)");

        let uv: UvPointId = UvPointId::new(7);
        assert_eq!(format!("{:?}", uv), "UV(7)");

        let invalid: FaceId = FaceId::invalid();
        assert_eq!(format!("{:?}", invalid), "F(INVALID)");
    }
}
