//! Mesh mutation: adding and removing entities, compaction and merging.
//!
//! Removal never frees a slot. It sets a tombstone flag and cascades towards
//! the entities that reference the removed one (vertex → UV points and edges →
//! faces), so no live face ever points at a removed entity.
//! [`Mesh::collect_garbage`] then produces a compact copy.

use nalgebra::{Point2, Point3};

use super::handle::{EdgeId, FaceId, MaterialId, MeshIndex, UvPointId, VertexId};
use super::polygon::{Edge, Face, Mesh, UvPoint, Vertex};

/// An entity waiting to be tombstoned by a cascading removal.
#[derive(Debug, Clone, Copy)]
enum Removal<I: MeshIndex> {
    Vertex(VertexId<I>),
    UvPoint(UvPointId<I>),
    Edge(EdgeId<I>),
    Face(FaceId<I>),
}

/// A face queued to be cut in two by a newly inserted edge.
struct FaceSplit<I: MeshIndex> {
    face: FaceId<I>,
    halves: [Vec<UvPointId<I>>; 2],
    material: MaterialId<I>,
}

impl<I: MeshIndex> Mesh<I> {
    // ==================== Construction ====================

    /// Add a new vertex and return its handle.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add a UV point owned by `vertex`.
    ///
    /// # Panics
    /// Panics if `vertex` is not a handle of this mesh.
    pub fn add_uv_point(&mut self, vertex: VertexId<I>, position: Point2<f64>) -> UvPointId<I> {
        let id = UvPointId::new(self.uv_points.len());
        self.vertex_mut(vertex).uv_points.push(id);
        self.uv_points.push(UvPoint::new(vertex, position));
        id
    }

    /// Find the live edge joining `v0` and `v1`, in either direction.
    pub fn find_edge(&self, v0: VertexId<I>, v1: VertexId<I>) -> Option<EdgeId<I>> {
        self.vertex_edges(v0).find(|&e| {
            let vertices = self.edge_vertices(e);
            vertices == [v0, v1] || vertices == [v1, v0]
        })
    }

    /// Add an edge between `v0` and `v1`.
    ///
    /// If the two vertices are already connected the existing edge is returned
    /// unchanged. Otherwise the new edge is registered on both vertices and
    /// every face that contains both vertices (but not as neighbours) is split
    /// in two along the new edge.
    ///
    /// # Panics
    /// Panics if `v0` and `v1` are the same vertex. A face whose neighbouring
    /// corners share a vertex panics here too.
    pub fn add_edge(&mut self, v0: VertexId<I>, v1: VertexId<I>) -> EdgeId<I> {
        assert_ne!(v0, v1, "an edge cannot join a vertex to itself");
        if let Some(existing) = self.find_edge(v0, v1) {
            return existing;
        }

        let edge = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new([v0, v1]));
        self.vertex_mut(v0).edges.push(edge);
        self.vertex_mut(v1).edges.push(edge);

        // Collect every split before touching the face tables.
        let mut candidates: Vec<FaceId<I>> = Vec::new();
        for v in [v0, v1] {
            for f in self.vertex_faces(v) {
                if !candidates.contains(&f) {
                    candidates.push(f);
                }
            }
        }

        let splits: Vec<FaceSplit<I>> = candidates
            .into_iter()
            .filter_map(|f| self.plan_split(f, v0, v1))
            .collect();

        for split in &splits {
            log::trace!("splitting {:?} along {:?}", split.face, edge);
            let [first, second] = &split.halves;
            self.add_face(first, split.material);
            self.add_face(second, split.material);
        }
        for split in &splits {
            self.remove_face(split.face);
        }

        edge
    }

    /// Work out how `face` is cut by an edge from `v0` to `v1`, if at all.
    fn plan_split(&self, face: FaceId<I>, v0: VertexId<I>, v1: VertexId<I>) -> Option<FaceSplit<I>> {
        let loop_uvs = self.face_uv_points(face);
        let i0 = loop_uvs.iter().position(|&uv| self.uv_point_vertex(uv) == v0)?;
        let i1 = loop_uvs.iter().position(|&uv| self.uv_point_vertex(uv) == v1)?;
        let (lo, hi) = if i0 < i1 { (i0, i1) } else { (i1, i0) };

        let wrapped: Vec<UvPointId<I>> = loop_uvs[hi..]
            .iter()
            .chain(&loop_uvs[..=lo])
            .copied()
            .collect();
        let inner: Vec<UvPointId<I>> = loop_uvs[lo..=hi].to_vec();

        // Neighbouring corners would leave a two-corner half.
        if wrapped.len() < 3 || inner.len() < 3 {
            return None;
        }

        Some(FaceSplit {
            face,
            halves: [wrapped, inner],
            material: self.material(face),
        })
    }

    /// Add a face over a loop of UV points.
    ///
    /// If a live face already has the same loop (up to rotation) it is
    /// returned instead. A face with the reversed loop is a different face.
    /// Missing edges are created with [`add_edge`](Self::add_edge), which may
    /// split other faces.
    ///
    /// # Panics
    /// Panics if fewer than three UV points are given.
    pub fn add_face(&mut self, uv_points: &[UvPointId<I>], material: MaterialId<I>) -> FaceId<I> {
        assert!(
            uv_points.len() >= 3,
            "a face needs at least 3 UV points, got {}",
            uv_points.len()
        );

        if let Some(existing) = self.find_face(uv_points) {
            return existing;
        }

        let n = uv_points.len();
        let edges: Vec<EdgeId<I>> = (0..n)
            .map(|i| {
                let v0 = self.uv_point_vertex(uv_points[i]);
                let v1 = self.uv_point_vertex(uv_points[(i + 1) % n]);
                self.add_edge(v0, v1)
            })
            .collect();

        let face = FaceId::new(self.faces.len());
        for &uv in uv_points {
            self.uv_point_mut(uv).faces.push(face);
        }
        for &e in &edges {
            self.edge_mut(e).faces.push(face);
        }
        self.faces.push(Face {
            material,
            uv_points: uv_points.to_vec(),
            edges,
            deleted: false,
        });
        face
    }

    /// Find a live face whose UV loop is a rotation of `uv_points`.
    pub fn find_face(&self, uv_points: &[UvPointId<I>]) -> Option<FaceId<I>> {
        let first = *uv_points.first()?;
        let n = uv_points.len();

        self.uv_point_faces(first).find(|&f| {
            let existing = self.face_uv_points(f);
            existing.len() == n
                && (0..n).any(|offset| (0..n).all(|i| existing[(i + offset) % n] == uv_points[i]))
        })
    }

    // ==================== Removal ====================

    /// Remove a vertex together with its UV points, edges and their faces.
    pub fn remove_vertex(&mut self, v: VertexId<I>) {
        self.remove_cascading(Removal::Vertex(v));
    }

    /// Remove a UV point together with the faces that use it.
    pub fn remove_uv_point(&mut self, uv: UvPointId<I>) {
        self.remove_cascading(Removal::UvPoint(uv));
    }

    /// Remove an edge together with its faces.
    pub fn remove_edge(&mut self, e: EdgeId<I>) {
        self.remove_cascading(Removal::Edge(e));
    }

    /// Remove a single face. Its UV points and edges stay in place.
    pub fn remove_face(&mut self, f: FaceId<I>) {
        self.face_mut(f).deleted = true;
    }

    fn remove_cascading(&mut self, root: Removal<I>) {
        let mut pending = vec![root];

        while let Some(next) = pending.pop() {
            match next {
                Removal::Vertex(v) => {
                    if self.vertex(v).deleted {
                        continue;
                    }
                    self.vertex_mut(v).deleted = true;
                    pending.extend(self.vertex_uv_points(v).map(Removal::UvPoint));
                    pending.extend(self.vertex_edges(v).map(Removal::Edge));
                }
                Removal::UvPoint(uv) => {
                    if self.uv_point(uv).deleted {
                        continue;
                    }
                    self.uv_point_mut(uv).deleted = true;
                    pending.extend(self.uv_point_faces(uv).map(Removal::Face));
                }
                Removal::Edge(e) => {
                    if self.edge(e).deleted {
                        continue;
                    }
                    self.edge_mut(e).deleted = true;
                    pending.extend(self.edge_faces(e).map(Removal::Face));
                }
                Removal::Face(f) => self.remove_face(f),
            }
        }
    }

    /// Remove every entity, tombstones included.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uv_points.clear();
        self.edges.clear();
        self.faces.clear();
    }

    // ==================== Compaction ====================

    /// Build a compacted copy of this mesh without removed entities.
    ///
    /// Live entities keep their relative order and are renumbered densely;
    /// every handle stored in the copy is translated. `self` is left untouched.
    pub fn collect_garbage(&self) -> Mesh<I> {
        let vertex_map = compaction_map(self.vertices.iter().map(|v| v.deleted), VertexId::new);
        let uv_map = compaction_map(self.uv_points.iter().map(|uv| uv.deleted), UvPointId::new);
        let edge_map = compaction_map(self.edges.iter().map(|e| e.deleted), EdgeId::new);
        let face_map = compaction_map(self.faces.iter().map(|f| f.deleted), FaceId::new);

        let vertices = self
            .vertices
            .iter()
            .filter(|v| !v.deleted)
            .map(|v| Vertex {
                uv_points: translate_live(&v.uv_points, &uv_map),
                edges: translate_live(&v.edges, &edge_map),
                ..v.clone()
            })
            .collect();

        let uv_points = self
            .uv_points
            .iter()
            .filter(|uv| !uv.deleted)
            .map(|uv| UvPoint {
                vertex: vertex_map[uv.vertex.index()],
                faces: translate_live(&uv.faces, &face_map),
                ..uv.clone()
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .filter(|e| !e.deleted)
            .map(|e| Edge {
                vertices: e.vertices.map(|v| vertex_map[v.index()]),
                faces: translate_live(&e.faces, &face_map),
                ..e.clone()
            })
            .collect();

        let faces = self
            .faces
            .iter()
            .filter(|f| !f.deleted)
            .map(|f| Face {
                material: f.material,
                uv_points: f.uv_points.iter().map(|uv| uv_map[uv.index()]).collect(),
                edges: f.edges.iter().map(|e| edge_map[e.index()]).collect(),
                deleted: false,
            })
            .collect();

        Mesh {
            vertices,
            uv_points,
            edges,
            faces,
        }
    }

    // ==================== Merging ====================

    /// Append every entity of `other`, tombstones included.
    ///
    /// Handles of `other` become valid in `self` after adding the slot counts
    /// `self` had before the call. Nothing is deduplicated or connected.
    pub fn merge(&mut self, other: &Mesh<I>) {
        let vertex_offset = self.vertices.len();
        let uv_offset = self.uv_points.len();
        let edge_offset = self.edges.len();
        let face_offset = self.faces.len();

        self.vertices.extend(other.vertices.iter().map(|v| Vertex {
            uv_points: v.uv_points.iter().map(|uv| uv.offset(uv_offset)).collect(),
            edges: v.edges.iter().map(|e| e.offset(edge_offset)).collect(),
            ..v.clone()
        }));

        self.uv_points.extend(other.uv_points.iter().map(|uv| UvPoint {
            vertex: uv.vertex.offset(vertex_offset),
            faces: uv.faces.iter().map(|f| f.offset(face_offset)).collect(),
            ..uv.clone()
        }));

        self.edges.extend(other.edges.iter().map(|e| Edge {
            vertices: e.vertices.map(|v| v.offset(vertex_offset)),
            faces: e.faces.iter().map(|f| f.offset(face_offset)).collect(),
            ..e.clone()
        }));

        self.faces.extend(other.faces.iter().map(|f| Face {
            uv_points: f.uv_points.iter().map(|uv| uv.offset(uv_offset)).collect(),
            edges: f.edges.iter().map(|e| e.offset(edge_offset)).collect(),
            ..f.clone()
        }));
    }
}

/// Map every old slot to its compacted handle; removed slots map to invalid.
fn compaction_map<H: Copy + Default>(
    deleted: impl Iterator<Item = bool>,
    make: impl Fn(usize) -> H,
) -> Vec<H> {
    let mut next = 0;
    deleted
        .map(|is_deleted| {
            if is_deleted {
                H::default()
            } else {
                next += 1;
                make(next - 1)
            }
        })
        .collect()
}

/// Translate a handle list, dropping handles of removed entities.
fn translate_live<H>(handles: &[H], map: &[H]) -> Vec<H>
where
    H: Copy + HandleValidity,
{
    handles
        .iter()
        .map(|h| map[h.slot()])
        .filter(|h| h.is_live_handle())
        .collect()
}

/// Minimal view of a handle shared by the compaction helpers.
trait HandleValidity {
    fn slot(self) -> usize;
    fn is_live_handle(self) -> bool;
}

macro_rules! impl_handle_validity {
    ($($name:ident),*) => {
        $(
            impl<I: MeshIndex> HandleValidity for $name<I> {
                fn slot(self) -> usize {
                    self.index()
                }
                fn is_live_handle(self) -> bool {
                    self.is_valid()
                }
            }
        )*
    };
}

impl_handle_validity!(VertexId, UvPointId, EdgeId, FaceId);

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(mesh: &mut Mesh) -> (Vec<VertexId>, Vec<UvPointId>, FaceId) {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let vertices: Vec<VertexId> = corners.iter().map(|&p| mesh.add_vertex(p)).collect();
        let uvs: Vec<UvPointId> = vertices
            .iter()
            .map(|&v| mesh.add_uv_point(v, Point2::origin()))
            .collect();
        let f = mesh.add_face(&uvs, MaterialId::new(3));
        (vertices, uvs, f)
    }

    #[test]
    fn test_add_edge_reuses_existing() {
        let mut mesh: Mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::origin());
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));

        let e0 = mesh.add_edge(a, b);
        let e1 = mesh.add_edge(a, b);
        let e2 = mesh.add_edge(b, a);

        assert_eq!(e0, e1);
        assert_eq!(e0, e2);
        assert_eq!(mesh.num_edges(), 1);
        assert_eq!(mesh.find_edge(b, a), Some(e0));
    }

    #[test]
    fn test_add_face_dedups_rotations_only() {
        let mut mesh: Mesh = Mesh::new();
        let (_, uvs, f) = quad(&mut mesh);

        let rotated = [uvs[2], uvs[3], uvs[0], uvs[1]];
        assert_eq!(mesh.add_face(&rotated, MaterialId::default()), f);
        assert_eq!(mesh.num_faces(), 1);

        let reversed: Vec<UvPointId> = uvs.iter().rev().copied().collect();
        let flipped = mesh.add_face(&reversed, MaterialId::default());
        assert_ne!(flipped, f);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 4);
        assert!(mesh.is_valid());
    }

    #[test]
    #[should_panic(expected = "at least 3 UV points")]
    fn test_add_face_rejects_degenerate() {
        let mut mesh: Mesh = Mesh::new();
        let (_, uvs, _) = quad(&mut mesh);
        mesh.add_face(&uvs[..2], MaterialId::default());
    }

    #[test]
    #[should_panic(expected = "cannot join a vertex to itself")]
    fn test_add_edge_rejects_self_loop() {
        let mut mesh: Mesh = Mesh::new();
        let v = mesh.add_vertex(Point3::origin());
        mesh.add_edge(v, v);
    }

    #[test]
    fn test_add_edge_splits_face() {
        let mut mesh: Mesh = Mesh::new();
        let (v, uvs, f) = quad(&mut mesh);

        let diagonal = mesh.add_edge(v[0], v[2]);

        assert!(mesh.face(f).is_deleted());
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());

        let halves: Vec<Vec<UvPointId>> = mesh
            .face_ids()
            .map(|f| mesh.face_uv_points(f).to_vec())
            .collect();
        assert_eq!(halves[0], vec![uvs[2], uvs[3], uvs[0]]);
        assert_eq!(halves[1], vec![uvs[0], uvs[1], uvs[2]]);

        for face in mesh.face_ids() {
            assert_eq!(mesh.material(face), MaterialId::new(3));
            assert!(mesh.face_edges(face).contains(&diagonal));
        }
        assert_eq!(mesh.edge_faces(diagonal).count(), 2);
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut mesh: Mesh = Mesh::new();
        let (v, _, f) = quad(&mut mesh);

        mesh.remove_vertex(v[1]);

        assert!(mesh.vertex(v[1]).is_deleted());
        assert!(mesh.face(f).is_deleted());
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_uv_points(), 3);
        assert_eq!(mesh.num_edges(), 2);
        assert_eq!(mesh.num_faces(), 0);

        for e in mesh.edge_ids() {
            assert!(!mesh.edge_vertices(e).contains(&v[1]));
        }
        for uv in mesh.uv_point_ids() {
            assert_ne!(mesh.uv_point_vertex(uv), v[1]);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_edge_and_uv_point_cascade_to_faces() {
        let mut mesh: Mesh = Mesh::new();
        let (_, uvs, f) = quad(&mut mesh);
        let e = mesh.face_edges(f)[0];

        mesh.remove_edge(e);
        assert!(mesh.face(f).is_deleted());
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_uv_points(), 4);

        let g = mesh.add_face(&uvs, MaterialId::default());
        assert_ne!(f, g);
        mesh.remove_uv_point(uvs[0]);
        assert!(mesh.face(g).is_deleted());
        assert_eq!(mesh.num_vertices(), 4);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_collect_garbage_compacts() {
        let mut mesh: Mesh = Mesh::new();
        let (v, _, _) = quad(&mut mesh);
        let extra = mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        mesh.set_selected(extra, true);
        mesh.add_edge(v[3], extra);
        mesh.remove_vertex(v[0]);

        let compact = mesh.collect_garbage();

        assert_eq!(compact.vertex_slots(), 4);
        assert_eq!(compact.uv_point_slots(), 3);
        assert_eq!(compact.edge_slots(), 3);
        assert_eq!(compact.face_slots(), 0);
        assert!(compact.all_vertex_ids().all(|v| !compact.vertex(v).is_deleted()));
        assert!(compact.all_edge_ids().all(|e| !compact.edge(e).is_deleted()));
        assert!(compact.is_valid());

        // Relative order is kept and attributes travel with the entity.
        assert_eq!(*compact.position(VertexId::new(0)), Point3::new(1.0, 0.0, 0.0));
        assert!(compact.is_selected(VertexId::new(3)));

        // The source mesh is unaffected.
        assert_eq!(mesh.vertex_slots(), 5);
        assert!(mesh.vertex(v[0]).is_deleted());
    }

    #[test]
    fn test_merge_offsets_handles() {
        let mut a: Mesh = Mesh::new();
        quad(&mut a);
        let mut b: Mesh = Mesh::new();
        let (bv, _, bf) = quad(&mut b);
        b.remove_face(bf);

        a.merge(&b);

        assert_eq!(a.vertex_slots(), 8);
        assert_eq!(a.uv_point_slots(), 8);
        assert_eq!(a.edge_slots(), 8);
        assert_eq!(a.face_slots(), 2);
        assert_eq!(a.num_faces(), 1);
        assert!(a.face(FaceId::new(1)).is_deleted());

        let moved = bv[2].offset(4);
        assert_eq!(*a.position(moved), Point3::new(1.0, 1.0, 0.0));
        assert_eq!(a.vertex_edges(moved).count(), 2);
        for e in a.vertex_edges(moved) {
            assert!(e.index() >= 4);
        }
        assert!(a.is_valid());
    }

    #[test]
    fn test_clear() {
        let mut mesh: Mesh = Mesh::new();
        quad(&mut mesh);
        mesh.clear();
        assert_eq!(mesh.vertex_slots(), 0);
        assert_eq!(mesh.face_slots(), 0);
    }
}
