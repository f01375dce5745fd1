//! Polygon mesh storage and read-only queries.
//!
//! A [`Mesh`] owns four entity tables (vertices, UV points, edges and faces)
//! with full adjacency in both directions:
//!
//! - a **vertex** knows its UV points and incident edges,
//! - a **UV point** knows its owning vertex and the faces using it,
//! - an **edge** knows its two vertices and incident faces,
//! - a **face** stores its loop of UV points and the parallel loop of edges,
//!   where `edges[i]` joins the vertices of `uv_points[i]` and
//!   `uv_points[(i + 1) % n]`.
//!
//! Adjacency lists are kept in insertion order; they are not sorted around the
//! vertex. Deleted entities stay in their table with a tombstone flag until
//! [`Mesh::collect_garbage`] compacts the mesh, so handles remain stable across
//! edits. All views on this type skip tombstoned entities unless their name
//! starts with `all_`.
//!
//! Mutation lives in the `edit` module.

use std::collections::{HashMap, HashSet};

use nalgebra::{Point2, Point3, Vector3};
use rayon::prelude::*;

use super::handle::{EdgeId, FaceId, MaterialId, MeshIndex, UvPointId, VertexId};

/// A vertex of the mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Selection flag, used by selection-driven operations such as extrusion.
    pub selected: bool,

    /// Subdivision corner weight.
    pub corner: f64,

    pub(crate) uv_points: Vec<UvPointId<I>>,
    pub(crate) edges: Vec<EdgeId<I>>,
    pub(crate) deleted: bool,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new unconnected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            selected: false,
            corner: 0.0,
            uv_points: Vec::new(),
            edges: Vec::new(),
            deleted: false,
        }
    }

    /// Whether the vertex has been removed.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A UV point: a texture coordinate attached to exactly one vertex.
#[derive(Debug, Clone)]
pub struct UvPoint<I: MeshIndex = u32> {
    /// The 2D texture coordinate.
    pub position: Point2<f64>,

    pub(crate) vertex: VertexId<I>,
    pub(crate) faces: Vec<FaceId<I>>,
    pub(crate) deleted: bool,
}

impl<I: MeshIndex> UvPoint<I> {
    pub(crate) fn new(vertex: VertexId<I>, position: Point2<f64>) -> Self {
        Self {
            position,
            vertex,
            faces: Vec::new(),
            deleted: false,
        }
    }

    /// Whether the UV point has been removed.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// An undirected edge between two vertices.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    /// Sharp flag used by shading and [`split_sharp_edges`](crate::algo::split_sharp_edges).
    pub sharp: bool,

    /// Subdivision crease weight.
    pub crease: f64,

    pub(crate) vertices: [VertexId<I>; 2],
    pub(crate) faces: Vec<FaceId<I>>,
    pub(crate) deleted: bool,
}

impl<I: MeshIndex> Edge<I> {
    pub(crate) fn new(vertices: [VertexId<I>; 2]) -> Self {
        Self {
            sharp: false,
            crease: 0.0,
            vertices,
            faces: Vec::new(),
            deleted: false,
        }
    }

    /// Whether the edge has been removed.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A polygonal face.
///
/// The order of the UV point loop defines the winding of the face.
#[derive(Debug, Clone)]
pub struct Face<I: MeshIndex = u32> {
    /// Material tag of this face.
    pub material: MaterialId<I>,

    pub(crate) uv_points: Vec<UvPointId<I>>,
    pub(crate) edges: Vec<EdgeId<I>>,
    pub(crate) deleted: bool,
}

impl<I: MeshIndex> Face<I> {
    /// Number of corners of this face.
    #[inline]
    pub fn len(&self) -> usize {
        self.uv_points.len()
    }

    /// Faces always have at least three corners; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uv_points.is_empty()
    }

    /// Whether the face has been removed.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A polygon mesh with vertices, UV points, edges and faces.
///
/// The mesh is a plain owned value: cloning it copies every table, and
/// handles from one mesh are only meaningful for that mesh (or for a mesh that
/// [`merge`](Mesh::merge)d it, after offsetting).
#[derive(Debug, Clone)]
pub struct Mesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) uv_points: Vec<UvPoint<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> Default for Mesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> Mesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            uv_points: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    // ==================== Counts ====================

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.iter().filter(|v| !v.deleted).count()
    }

    /// Number of live UV points.
    pub fn num_uv_points(&self) -> usize {
        self.uv_points.iter().filter(|uv| !uv.deleted).count()
    }

    /// Number of live edges.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().filter(|e| !e.deleted).count()
    }

    /// Number of live faces.
    pub fn num_faces(&self) -> usize {
        self.faces.iter().filter(|f| !f.deleted).count()
    }

    /// Length of the vertex table, tombstones included.
    #[inline]
    pub fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    /// Length of the UV point table, tombstones included.
    #[inline]
    pub fn uv_point_slots(&self) -> usize {
        self.uv_points.len()
    }

    /// Length of the edge table, tombstones included.
    #[inline]
    pub fn edge_slots(&self) -> usize {
        self.edges.len()
    }

    /// Length of the face table, tombstones included.
    #[inline]
    pub fn face_slots(&self) -> usize {
        self.faces.len()
    }

    // ==================== Entity access ====================

    /// Get a vertex by handle.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a UV point by handle.
    #[inline]
    pub fn uv_point(&self, id: UvPointId<I>) -> &UvPoint<I> {
        &self.uv_points[id.index()]
    }

    #[inline]
    pub(crate) fn uv_point_mut(&mut self, id: UvPointId<I>) -> &mut UvPoint<I> {
        &mut self.uv_points[id.index()]
    }

    /// Get an edge by handle.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    #[inline]
    pub(crate) fn edge_mut(&mut self, id: EdgeId<I>) -> &mut Edge<I> {
        &mut self.edges[id.index()]
    }

    /// Get a face by handle.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    // ==================== Attributes ====================

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Whether a vertex is selected.
    #[inline]
    pub fn is_selected(&self, v: VertexId<I>) -> bool {
        self.vertex(v).selected
    }

    /// Set the selection flag of a vertex.
    #[inline]
    pub fn set_selected(&mut self, v: VertexId<I>, selected: bool) {
        self.vertex_mut(v).selected = selected;
    }

    /// Corner weight of a vertex.
    #[inline]
    pub fn corner(&self, v: VertexId<I>) -> f64 {
        self.vertex(v).corner
    }

    /// Set the corner weight of a vertex.
    #[inline]
    pub fn set_corner(&mut self, v: VertexId<I>, corner: f64) {
        self.vertex_mut(v).corner = corner;
    }

    /// Texture coordinate of a UV point.
    #[inline]
    pub fn uv_position(&self, uv: UvPointId<I>) -> &Point2<f64> {
        &self.uv_point(uv).position
    }

    /// Set the texture coordinate of a UV point.
    #[inline]
    pub fn set_uv_position(&mut self, uv: UvPointId<I>, pos: Point2<f64>) {
        self.uv_point_mut(uv).position = pos;
    }

    /// Whether an edge is marked sharp.
    #[inline]
    pub fn is_sharp(&self, e: EdgeId<I>) -> bool {
        self.edge(e).sharp
    }

    /// Mark or unmark an edge as sharp.
    #[inline]
    pub fn set_sharp(&mut self, e: EdgeId<I>, sharp: bool) {
        self.edge_mut(e).sharp = sharp;
    }

    /// Crease weight of an edge.
    #[inline]
    pub fn crease(&self, e: EdgeId<I>) -> f64 {
        self.edge(e).crease
    }

    /// Set the crease weight of an edge.
    #[inline]
    pub fn set_crease(&mut self, e: EdgeId<I>, crease: f64) {
        self.edge_mut(e).crease = crease;
    }

    /// Material of a face.
    #[inline]
    pub fn material(&self, f: FaceId<I>) -> MaterialId<I> {
        self.face(f).material
    }

    /// Set the material of a face.
    #[inline]
    pub fn set_material(&mut self, f: FaceId<I>, material: MaterialId<I>) {
        self.face_mut(f).material = material;
    }

    /// Positions of the two endpoints of an edge.
    pub fn edge_positions(&self, e: EdgeId<I>) -> [Point3<f64>; 2] {
        let [v0, v1] = self.edge_vertices(e);
        [*self.position(v0), *self.position(v1)]
    }

    // ==================== Table views ====================

    /// Every vertex handle, including removed ones.
    pub fn all_vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Every UV point handle, including removed ones.
    pub fn all_uv_point_ids(&self) -> impl Iterator<Item = UvPointId<I>> + '_ {
        (0..self.uv_points.len()).map(UvPointId::new)
    }

    /// Every edge handle, including removed ones.
    pub fn all_edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Every face handle, including removed ones.
    pub fn all_face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Live vertex handles.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.all_vertex_ids().filter(move |&v| !self.vertex(v).deleted)
    }

    /// Live UV point handles.
    pub fn uv_point_ids(&self) -> impl Iterator<Item = UvPointId<I>> + '_ {
        self.all_uv_point_ids().filter(move |&uv| !self.uv_point(uv).deleted)
    }

    /// Live edge handles.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.all_edge_ids().filter(move |&e| !self.edge(e).deleted)
    }

    /// Live face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.all_face_ids().filter(move |&f| !self.face(f).deleted)
    }

    // ==================== Incidence ====================

    /// Live UV points owned by a vertex, in creation order.
    pub fn vertex_uv_points(&self, v: VertexId<I>) -> impl Iterator<Item = UvPointId<I>> + '_ {
        self.vertex(v)
            .uv_points
            .iter()
            .copied()
            .filter(move |&uv| !self.uv_point(uv).deleted)
    }

    /// Live edges incident to a vertex, in creation order.
    pub fn vertex_edges(&self, v: VertexId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.vertex(v)
            .edges
            .iter()
            .copied()
            .filter(move |&e| !self.edge(e).deleted)
    }

    /// Live faces around a vertex, gathered through its UV points.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_uv_points(v)
            .flat_map(move |uv| self.uv_point_faces(uv))
    }

    /// The vertex owning a UV point.
    #[inline]
    pub fn uv_point_vertex(&self, uv: UvPointId<I>) -> VertexId<I> {
        self.uv_point(uv).vertex
    }

    /// Live faces using a UV point.
    pub fn uv_point_faces(&self, uv: UvPointId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.uv_point(uv)
            .faces
            .iter()
            .copied()
            .filter(move |&f| !self.face(f).deleted)
    }

    /// The two endpoints of an edge, in the order they were given on creation.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        self.edge(e).vertices
    }

    /// The endpoint of `e` that is not `v`.
    #[inline]
    pub fn opposite_vertex(&self, e: EdgeId<I>, v: VertexId<I>) -> VertexId<I> {
        let [v0, v1] = self.edge_vertices(e);
        if v0 == v {
            v1
        } else {
            v0
        }
    }

    /// Live faces incident to an edge.
    pub fn edge_faces(&self, e: EdgeId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.edge(e)
            .faces
            .iter()
            .copied()
            .filter(move |&f| !self.face(f).deleted)
    }

    /// The UV point loop of a face.
    #[inline]
    pub fn face_uv_points(&self, f: FaceId<I>) -> &[UvPointId<I>] {
        &self.face(f).uv_points
    }

    /// The edge loop of a face, parallel to [`face_uv_points`](Self::face_uv_points).
    #[inline]
    pub fn face_edges(&self, f: FaceId<I>) -> &[EdgeId<I>] {
        &self.face(f).edges
    }

    /// The vertices of a face, in winding order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl ExactSizeIterator<Item = VertexId<I>> + '_ {
        self.face(f)
            .uv_points
            .iter()
            .map(move |&uv| self.uv_point_vertex(uv))
    }

    // ==================== Aggregate queries ====================

    /// Edges whose two endpoints are both in `vertices`.
    ///
    /// The result is in first-encounter order; repeated input vertices are
    /// ignored.
    pub fn edges_within<V>(&self, vertices: V) -> Vec<EdgeId<I>>
    where
        V: IntoIterator<Item = VertexId<I>>,
    {
        let mut seen = HashSet::new();
        let mut counts: HashMap<EdgeId<I>, usize> = HashMap::new();
        let mut order = Vec::new();

        for v in vertices {
            if !seen.insert(v) {
                continue;
            }
            for e in self.vertex_edges(v) {
                let count = counts.entry(e).or_insert(0);
                if *count == 0 {
                    order.push(e);
                }
                *count += 1;
            }
        }

        order.into_iter().filter(|e| counts[e] == 2).collect()
    }

    /// Faces whose vertices are all in `vertices`.
    ///
    /// Partial overlap is not enough: every corner of the face must be in the
    /// set. The result is in first-encounter order.
    pub fn faces_within<V>(&self, vertices: V) -> Vec<FaceId<I>>
    where
        V: IntoIterator<Item = VertexId<I>>,
    {
        let mut seen = HashSet::new();
        let mut counts: HashMap<FaceId<I>, usize> = HashMap::new();
        let mut order = Vec::new();

        for v in vertices {
            if !seen.insert(v) {
                continue;
            }
            for f in self.vertex_faces(v) {
                let count = counts.entry(f).or_insert(0);
                if *count == 0 {
                    order.push(f);
                }
                *count += 1;
            }
        }

        order
            .into_iter()
            .filter(|f| counts[f] == self.face(*f).len())
            .collect()
    }

    /// Live vertices with the selection flag set.
    pub fn selected_vertices(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_ids().filter(move |&v| self.is_selected(v))
    }

    /// Edges with both endpoints selected.
    pub fn selected_edges(&self) -> Vec<EdgeId<I>> {
        self.edges_within(self.selected_vertices())
    }

    /// Faces with every corner selected.
    pub fn selected_faces(&self) -> Vec<FaceId<I>> {
        self.faces_within(self.selected_vertices())
    }

    /// Select every live vertex.
    pub fn select_all(&mut self) {
        for vertex in self.vertices.iter_mut().filter(|v| !v.deleted) {
            vertex.selected = true;
        }
    }

    /// Deselect every live vertex.
    pub fn deselect_all(&mut self) {
        for vertex in self.vertices.iter_mut().filter(|v| !v.deleted) {
            vertex.selected = false;
        }
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a face.
    ///
    /// Triangles use the cross product of the two edges leaving the first
    /// corner. Larger polygons average the normals of every corner (previous,
    /// current, next), skipping collinear corners. A fully degenerate face
    /// yields the zero vector.
    pub fn calculate_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let positions: Vec<Point3<f64>> = self.face_vertices(f).map(|v| *self.position(v)).collect();
        let count = positions.len();

        if count == 3 {
            let n = (positions[1] - positions[0]).cross(&(positions[2] - positions[0]));
            return n.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        }

        let mut normal_sum = Vector3::zeros();
        let mut sum_count = 0;

        for i in 0..count {
            let prev = positions[i];
            let curr = positions[(i + 1) % count];
            let next = positions[(i + 2) % count];
            let cross = (next - curr).cross(&(prev - curr));
            if cross == Vector3::zeros() {
                continue;
            }
            normal_sum += cross.normalize();
            sum_count += 1;
        }

        if sum_count == 0 {
            return Vector3::zeros();
        }
        normal_sum.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// Compute the normal of every live face.
    ///
    /// With `parallel` set the work is spread over the rayon thread pool; the
    /// mesh is only read.
    pub fn face_normals(&self, parallel: bool) -> Vec<(FaceId<I>, Vector3<f64>)> {
        let faces: Vec<FaceId<I>> = self.face_ids().collect();
        if parallel {
            faces
                .par_iter()
                .map(|&f| (f, self.calculate_normal(f)))
                .collect()
        } else {
            faces
                .iter()
                .map(|&f| (f, self.calculate_normal(f)))
                .collect()
        }
    }

    /// Compute the centroid (vertex average) of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let count = self.face(f).len() as f64;
        let sum: Vector3<f64> = self.face_vertices(f).map(|v| self.position(v).coords).sum();
        Point3::from(sum / count)
    }

    /// Compute the bounding box of the live vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut live = self.vertices.iter().filter(|v| !v.deleted);
        let first = live.next()?;

        let mut min = first.position;
        let mut max = first.position;

        for v in live {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Validation ====================

    /// Check that every live entity is consistently connected.
    ///
    /// Live entities must only reference live entities, every reference must be
    /// mirrored on the other side, face edge loops must match their UV loops,
    /// and no two live edges may join the same pair of vertices.
    pub fn is_valid(&self) -> bool {
        for v in self.vertex_ids() {
            let vertex = self.vertex(v);
            for &uv in &vertex.uv_points {
                if uv.index() >= self.uv_points.len() || self.uv_point(uv).vertex != v {
                    return false;
                }
            }
            for &e in &vertex.edges {
                if e.index() >= self.edges.len() || !self.edge(e).vertices.contains(&v) {
                    return false;
                }
            }
        }

        for uv in self.uv_point_ids() {
            let point = self.uv_point(uv);
            if point.vertex.index() >= self.vertices.len() {
                return false;
            }
            let owner = self.vertex(point.vertex);
            if owner.deleted || !owner.uv_points.contains(&uv) {
                return false;
            }
        }

        let mut vertex_pairs = HashSet::new();
        for e in self.edge_ids() {
            let [v0, v1] = self.edge_vertices(e);
            for v in [v0, v1] {
                if v.index() >= self.vertices.len() {
                    return false;
                }
                let vertex = self.vertex(v);
                if vertex.deleted || !vertex.edges.contains(&e) {
                    return false;
                }
            }
            let key = if v0 <= v1 { (v0, v1) } else { (v1, v0) };
            if !vertex_pairs.insert(key) {
                return false;
            }
        }

        for f in self.face_ids() {
            let face = self.face(f);
            let n = face.uv_points.len();
            if n < 3 || face.edges.len() != n {
                return false;
            }
            for i in 0..n {
                let uv = face.uv_points[i];
                let e = face.edges[i];
                if uv.index() >= self.uv_points.len() || e.index() >= self.edges.len() {
                    return false;
                }
                let point = self.uv_point(uv);
                let edge = self.edge(e);
                if point.deleted || edge.deleted {
                    return false;
                }
                if !point.faces.contains(&f) || !edge.faces.contains(&f) {
                    return false;
                }
                let a = point.vertex;
                let b = self.uv_point_vertex(face.uv_points[(i + 1) % n]);
                if edge.vertices != [a, b] && edge.vertices != [b, a] {
                    return false;
                }
            }
        }

        true
    }
}
