//! `EdgeMesh`: the half-edge mesh arena and its topology-preserving
//! operations.
//!
//! Corresponds to the teacher's `HalfEdgeMesh` (`half_edge_mesh.rs`), but
//! replaces the `HashMap<u32, Rc<RefCell<_>>>` pools with `Arena<T>`
//! slot storage (see `crate::arena`) and drops the triangle-only
//! assumptions (`from_tetrahedron_pts`, `triangulate_face`,
//! `attach_point_for_faces`) in favor of arbitrary convex/concave
//! polygonal faces.

use crate::arena::Arena;
use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::geom::{Polygon, Pt2, Rect};
use crate::ids::{EdgeId, FaceId, VertId};
use crate::quadtree::QuadTree;
use crate::vert::Vert;

pub struct EdgeMesh {
    pub(crate) verts: Arena<Vert>,
    pub(crate) edges: Arena<Edge>,
    pub(crate) faces: Arena<Face>,
    bbox: Option<Rect>,
    quadtree: QuadTree,
}

impl EdgeMesh {
    pub fn empty() -> Self {
        EdgeMesh { verts: Arena::new(), edges: Arena::new(), faces: Arena::new(), bbox: None, quadtree: QuadTree::empty() }
    }

    // -- Accessors --------------------------------------------------

    pub fn vert(&self, id: VertId) -> Option<&Vert> {
        self.verts.get(id.0)
    }

    pub fn vert_mut(&mut self, id: VertId) -> Option<&mut Vert> {
        self.verts.get_mut(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.0)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    pub fn face_mut(&mut self, id: FaceId) -> Option<&mut Face> {
        self.faces.get_mut(id.0)
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces.iter().map(|(i, f)| (FaceId(i), f))
    }

    pub fn verts(&self) -> impl Iterator<Item = (VertId, &Vert)> {
        self.verts.iter().map(|(i, v)| (VertId(i), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn bbox(&self) -> Option<Rect> {
        self.bbox
    }

    // -- Stack-like arena primitives ----------------------------------

    /// Creates and appends a vert; no topology change.
    pub fn add_vert(&mut self, pos: Pt2) -> VertId {
        let id = VertId(self.verts.slot_count());
        let v = Vert::new(id, pos);
        self.push_vert(v)
    }

    pub fn push_vert(&mut self, vert: Vert) -> VertId {
        log::trace!("push_vert {:?}", vert.pos);
        VertId(self.verts.push(vert))
    }

    pub fn pop_vert(&mut self) -> Option<(Vert, VertId)> {
        self.verts.pop().map(|(v, i)| (v, VertId(i)))
    }

    pub fn remove_vert(&mut self, id: VertId) -> Option<(Vert, VertId)> {
        self.verts.remove(id.0).map(|v| (v, id))
    }

    pub fn insert_vert(&mut self, id: VertId, vert: Vert) {
        self.verts.insert(id.0, vert);
    }

    pub fn push_face(&mut self, face: Face) -> FaceId {
        log::trace!("push_face {} edges", face.num_edges());
        FaceId(self.faces.push(face))
    }

    pub fn pop_face(&mut self) -> Option<(Face, FaceId)> {
        self.faces.pop().map(|(f, i)| (f, FaceId(i)))
    }

    pub fn remove_face(&mut self, id: FaceId) -> Option<Face> {
        self.faces.remove(id.0)
    }

    pub fn insert_face(&mut self, id: FaceId, face: Face) {
        self.faces.insert(id.0, face);
    }

    pub fn push_edge(&mut self, edge: Edge) -> EdgeId {
        EdgeId(self.edges.push(edge))
    }

    pub fn pop_edge(&mut self) -> Option<(Edge, EdgeId)> {
        self.edges.pop().map(|(e, i)| (e, EdgeId(i)))
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        self.edges.remove(id.0)
    }

    pub fn insert_edge(&mut self, id: EdgeId, edge: Edge) {
        self.edges.insert(id.0, edge);
    }

    /// Unlinks and destroys a face. Caller must have already ensured no
    /// edge still references it.
    pub fn delete_face(&mut self, id: FaceId) -> MeshResult<Face> {
        self.remove_face(id).ok_or_else(|| MeshError::Precondition(format!("{} does not exist", id)))
    }

    // -- Topology helpers --------------------------------------------

    /// Walks `next` from `start` and collects the face loop.
    pub fn edge_loop(&self, start: EdgeId) -> Vec<EdgeId> {
        crate::iterators::EdgeLoop::new(self, start).collect()
    }

    pub fn line_loop(&self, start: EdgeId) -> Vec<(Pt2, Pt2)> {
        crate::iterators::line_loop(self, crate::iterators::EdgeLoop::new(self, start)).collect()
    }

    pub fn point_loop(&self, start: EdgeId) -> Vec<Pt2> {
        crate::iterators::point_loop(self, crate::iterators::EdgeLoop::new(self, start)).collect()
    }

    /// Rotate around `vert` through `prev.twin` until a twin-less edge is
    /// found (an outer edge), starting the search from `start`.
    pub fn outer_edge_loop(&self, start: EdgeId) -> Vec<EdgeId> {
        crate::iterators::OuterEdgeLoop::new(self, start).collect()
    }

    /// `SharedEdges(e)`: CW fan of edges sharing `e.vert`, stepping
    /// `e ← e.prev.twin` until cycled back or a twin-less boundary halts
    /// the fan.
    pub fn shared_edges(&self, start: EdgeId) -> Vec<EdgeId> {
        crate::iterators::SharedEdges::new(self, start).collect()
    }

    pub fn find_outer_edge(&self) -> Option<EdgeId> {
        self.edges().find(|(_, e)| e.is_outer()).map(|(id, _)| id)
    }

    pub fn find_outer_edge_with_vert(&self, vert: VertId) -> Option<EdgeId> {
        self.edges().find(|(_, e)| e.is_outer() && e.vert == vert).map(|(id, _)| id)
    }

    pub fn find_edge_with_vert(&self, vert: VertId) -> Option<EdgeId> {
        self.edges().find(|(_, e)| e.vert == vert).map(|(id, _)| id)
    }

    pub fn get_outer_edges(&self) -> Vec<EdgeId> {
        match self.find_outer_edge() {
            Some(start) => self.outer_edge_loop(start),
            None => Vec::new(),
        }
    }

    pub fn get_outer_polygon(&self) -> Polygon {
        let edges = self.get_outer_edges();
        Polygon::new(edges.into_iter().map(|e| self.vert(self.edge(e).unwrap().vert).unwrap().pos).collect())
    }

    /// `OuterEdgeLoop` step rule, exposed standalone for
    /// `AddOuterFace`, which needs to walk the boundary without
    /// collecting a whole loop.
    pub fn next_outer_edge(&self, edge: EdgeId) -> EdgeId {
        let e = self.edge(edge).expect("next_outer_edge: missing edge");
        debug_assert!(e.is_outer());
        let mut cur = e.next;
        loop {
            let c = self.edge(cur).expect("next_outer_edge: broken chain");
            match c.twin {
                None => return cur,
                Some(twin) => cur = self.edge(twin).expect("next_outer_edge: broken twin").next,
            }
        }
    }

    /// Builds the new face of `AddOuterFace`: the boundary
    /// walk from `end_outer` up to (not including) `start_outer` is
    /// reused as twins (those edges stop being outer), and a fresh
    /// twin-less chain through `interior_positions` becomes the new
    /// outer boundary. Returns the new face, the newly created interior
    /// verts, and the new twin edges (for `Undo` bookkeeping); the
    /// original face bordering the reused chain is left untouched.
    pub fn add_outer_face(&mut self, start_outer: EdgeId, end_outer: EdgeId, interior_positions: &[Pt2]) -> MeshResult<(FaceId, Vec<VertId>, Vec<EdgeId>)> {
        if !self.edge(start_outer).ok_or_else(|| MeshError::Precondition("add_outer_face: start_outer missing".into()))?.is_outer() {
            return Err(MeshError::Precondition("add_outer_face: start_outer is not an outer edge".into()));
        }
        if !self.edge(end_outer).ok_or_else(|| MeshError::Precondition("add_outer_face: end_outer missing".into()))?.is_outer() {
            return Err(MeshError::Precondition("add_outer_face: end_outer is not an outer edge".into()));
        }

        let mut chain = vec![end_outer];
        let mut cur = end_outer;
        loop {
            let nxt = self.next_outer_edge(cur);
            if nxt == start_outer {
                break;
            }
            if chain.contains(&nxt) {
                return Err(MeshError::Precondition("add_outer_face: start/end not on a shared outer loop".into()));
            }
            chain.push(nxt);
            cur = nxt;
        }

        let new_face_id = FaceId(self.faces.slot_count());

        let interior_verts: Vec<VertId> = interior_positions.iter().map(|&p| self.add_vert(p)).collect();

        let chain_len = chain.len();
        let base = self.edges.slot_count();
        let twin_ids: Vec<EdgeId> = (0..chain_len).map(|i| EdgeId(base + i)).collect();
        let int_len = interior_verts.len() + 1;
        let int_base = base + chain_len;
        let int_ids: Vec<EdgeId> = (0..int_len).map(|i| EdgeId(int_base + i)).collect();

        let start_vert = self.edge(chain[0]).unwrap().vert;
        let end_vert = self.edge(start_outer).unwrap().vert;
        let int_chain_verts: Vec<VertId> = std::iter::once(start_vert).chain(interior_verts.iter().copied()).chain(std::iter::once(end_vert)).collect();

        for i in 0..chain_len {
            let oi = chain[i];
            let far_vert = self.edge(self.edge(oi).unwrap().next).unwrap().vert;
            let next = if i == 0 { int_ids[0] } else { twin_ids[i - 1] };
            let prev = if i == chain_len - 1 { *int_ids.last().unwrap() } else { twin_ids[i + 1] };
            self.push_edge(Edge { id: twin_ids[i], vert: far_vert, face: new_face_id, prev, next, twin: Some(oi) });
            self.edge_mut(oi).unwrap().twin = Some(twin_ids[i]);
        }
        for i in 0..int_len {
            let prev = if i == 0 { *twin_ids.last().unwrap() } else { int_ids[i - 1] };
            let next = if i == int_len - 1 { twin_ids[0] } else { int_ids[i + 1] };
            self.push_edge(Edge { id: int_ids[i], vert: int_chain_verts[i], face: new_face_id, prev, next, twin: None });
        }

        let new_loop: Vec<EdgeId> = twin_ids.iter().rev().copied().chain(int_ids.iter().copied()).collect();
        self.push_face(Face::new(new_face_id, new_loop[0], new_loop));

        for (i, &v) in interior_verts.iter().enumerate() {
            self.vert_mut(v).unwrap().edge = Some(int_ids[i + 1]);
        }

        Ok((new_face_id, interior_verts, twin_ids))
    }

    pub fn find_nearest_vert(&self, point: Pt2, tolerance: f64) -> Option<VertId> {
        use cgmath::MetricSpace;
        let enabled = tolerance > 0.0;
        self.verts()
            .map(|(id, v)| (id, v.pos.distance2(point)))
            .filter(|(_, d2)| !enabled || *d2 <= tolerance * tolerance)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .map(|(id, _)| id)
    }

    pub fn hit_test(&self, point: Pt2) -> Option<FaceId> {
        self.quadtree.hit_test(self, point)
    }

    /// Recomputes every face's bbox, the mesh bbox, and rebuilds the
    /// quadtree. The only place these caches are refreshed.
    pub fn update(&mut self) {
        log::debug!("EdgeMesh::update: {} faces, {} verts", self.faces.len(), self.verts.len());
        let face_ids: Vec<FaceId> = self.faces().map(|(id, _)| id).collect();
        let mut mesh_bbox: Option<Rect> = None;
        for id in face_ids {
            let points = self.point_loop(self.face(id).unwrap().edge);
            let bbox = Rect::from_points(points);
            mesh_bbox = match (mesh_bbox, bbox) {
                (None, b) => b,
                (Some(a), Some(b)) => Some(a.union(&b)),
                (Some(a), None) => Some(a),
            };
            self.face_mut(id).unwrap().bbox = bbox;
        }
        self.bbox = mesh_bbox;
        self.quadtree = QuadTree::build(self, mesh_bbox);
        self.debug_assert_valid();
    }

    // -- Face mutation internals, used by commands --------------------

    /// General bridge: wires a chain of twin edge pairs from `e0.vert`
    /// through `interior` (already-created verts, in order) to `e1.vert`,
    /// splicing the chain into the loop between `e0`/`e1`. The forward
    /// chain takes over `e0`'s old slot in the loop that keeps `e1`; the
    /// reverse chain (twins, walked the other way) carries the other
    /// loop, picking `e0` back up once it lands on `e0.vert` again --
    /// `e0`/`e1` each keep their own `vert` and stay live, just on
    /// opposite sides of the new bridge. Both chains are returned so
    /// commands can record them for `Undo`. `e0` and `e1` may border the
    /// same face (`Split`) or different faces (`Bridge`, after the
    /// caller has adopted the other face's loop into this one) -- this
    /// method only wires edges, it does not touch face ownership.
    fn wire_bridge_chain(&mut self, face_id: FaceId, e0: EdgeId, e1: EdgeId, interior: &[VertId]) -> (Vec<EdgeId>, Vec<EdgeId>) {
        let edge0 = *self.edge(e0).unwrap();
        let edge1 = *self.edge(e1).unwrap();
        let chain_verts: Vec<VertId> = std::iter::once(edge0.vert).chain(interior.iter().copied()).chain(std::iter::once(edge1.vert)).collect();
        let m = chain_verts.len();

        let base = self.edges.slot_count();
        let fwd: Vec<EdgeId> = (0..m - 1).map(|i| EdgeId(base + i)).collect();
        let rev: Vec<EdgeId> = (0..m - 1).map(|j| EdgeId(base + (m - 1) + j)).collect();

        // `e0`/`e1` keep their own `vert`, so they stay live edges at the
        // bridge's two endpoints rather than being spliced out -- `e0`
        // moves to the far loop (it already points from `e0.vert` onward
        // into what becomes that loop's interior), picked up right after
        // the reverse chain lands back on `e0.vert`. The forward chain
        // takes over `e0`'s old slot in the near loop.
        let old_e0_prev = edge0.prev;

        for i in 0..m - 1 {
            let twin = rev[m - 2 - i];
            let prev = if i == 0 { old_e0_prev } else { fwd[i - 1] };
            let next = if i == m - 2 { e1 } else { fwd[i + 1] };
            self.push_edge(Edge { id: fwd[i], vert: chain_verts[i], face: face_id, prev, next, twin: Some(twin) });
        }
        for j in 0..m - 1 {
            let twin = fwd[m - 2 - j];
            let prev = if j == 0 { edge1.prev } else { rev[j - 1] };
            let next = if j == m - 2 { e0 } else { rev[j + 1] };
            self.push_edge(Edge { id: rev[j], vert: chain_verts[m - 1 - j], face: face_id, prev, next, twin: Some(twin) });
        }

        self.edge_mut(old_e0_prev).unwrap().next = fwd[0];
        self.edge_mut(e1).unwrap().prev = *fwd.last().unwrap();
        let old_e1_prev = edge1.prev;
        self.edge_mut(old_e1_prev).unwrap().next = rev[0];
        self.edge_mut(e0).unwrap().prev = *rev.last().unwrap();

        for (i, &v) in interior.iter().enumerate() {
            self.vert_mut(v).unwrap().edge = Some(fwd[i + 1]);
        }

        (fwd, rev)
    }

    /// `Split(e0, e1)`: e0 and e1 must both border the same face and not
    /// be adjacent. Creates a twin pair of new half-edges between
    /// `e0.vert` and `e1.vert`, splitting the face's loop in two. The
    /// loop containing `e1` stays with the original face; the other
    /// becomes a new face, whose id is returned.
    pub fn split_face(&mut self, face_id: FaceId, e0: EdgeId, e1: EdgeId) -> MeshResult<FaceId> {
        self.split_face_with_verts(face_id, e0, e1, &[]).map(|(f, _, _)| f)
    }

    /// As `split_face`, but threads the bridge through already-created
    /// `interior` verts in order, matching `SplitFace`'s interior
    /// polyline. Returns the new face plus the forward and
    /// reverse edge chains so the caller can record them for `Undo`.
    pub fn split_face_with_verts(&mut self, face_id: FaceId, e0: EdgeId, e1: EdgeId, interior: &[VertId]) -> MeshResult<(FaceId, Vec<EdgeId>, Vec<EdgeId>)> {
        let (edge0, edge1) = (*self.edge(e0).ok_or_else(|| MeshError::Precondition("split_face: e0 missing".into()))?, *self.edge(e1).ok_or_else(|| MeshError::Precondition("split_face: e1 missing".into()))?);
        if edge0.face != face_id || edge1.face != face_id {
            return Err(MeshError::Precondition("split_face: edges must border the target face".into()));
        }
        if e0 == e1 || (interior.is_empty() && (edge0.next == e1 || edge1.next == e0)) {
            return Err(MeshError::Precondition("split_face: edges must not be adjacent".into()));
        }

        let (fwd, rev) = self.wire_bridge_chain(face_id, e0, e1, interior);

        let new_loop = self.edge_loop(*rev.last().unwrap());
        let new_face_id = FaceId(self.faces.slot_count());
        for &e in &new_loop {
            self.edge_mut(e).unwrap().face = new_face_id;
        }
        self.push_face(Face::new(new_face_id, *rev.last().unwrap(), new_loop));

        let kept_loop = self.edge_loop(fwd[0]);
        let f = self.face_mut(face_id).unwrap();
        f.edge = fwd[0];
        f.edges = kept_loop;

        Ok((new_face_id, fwd, rev))
    }

    /// `Bridge(e0, e1)`: like `split_face` but `e1` borders a different
    /// face `other`; `other`'s loop is first adopted into `this`, then
    /// the two loops are pinched together with a twin pair running from
    /// `e0.vert` to `e1.vert` and back -- `e0` and `e1` each keep their
    /// own `vert` and stay live, just swapping which side of the pinch
    /// they're on, the same scheme `wire_bridge_chain` uses. Used to
    /// attach a hole polygon to its containing face.
    pub fn bridge_faces(&mut self, this_face: FaceId, e0: EdgeId, other_face: FaceId, e1: EdgeId) -> MeshResult<()> {
        if self.edge(e0).unwrap().face != this_face {
            return Err(MeshError::Precondition("bridge_faces: e0 must border this_face".into()));
        }
        if self.edge(e1).unwrap().face != other_face {
            return Err(MeshError::Precondition("bridge_faces: e1 must border other_face".into()));
        }

        let other = self.remove_face(other_face).ok_or_else(|| MeshError::Precondition("other_face missing".into()))?;
        for &e in &other.edges {
            self.edge_mut(e).unwrap().face = this_face;
        }

        let edge0 = self.edge(e0).unwrap().clone();
        let edge1 = self.edge(e1).unwrap().clone();

        let bridge_a_id = EdgeId(self.edges.slot_count());
        let bridge_b_id = EdgeId(bridge_a_id.0 + 1);
        // `e0` keeps its own `vert` and slots back in right after
        // `bridge_b` lands on it, rather than sitting in front of
        // `bridge_a` -- otherwise it and `bridge_a` would both originate
        // at `e0.vert` back to back, a zero-length edge.
        let old_e0_prev = edge0.prev;
        let bridge_a = Edge { id: bridge_a_id, vert: edge0.vert, face: this_face, prev: old_e0_prev, next: e1, twin: Some(bridge_b_id) };
        let bridge_b = Edge { id: bridge_b_id, vert: edge1.vert, face: this_face, prev: edge1.prev, next: e0, twin: Some(bridge_a_id) };
        self.push_edge(bridge_a);
        self.push_edge(bridge_b);

        self.edge_mut(old_e0_prev).unwrap().next = bridge_a_id;
        self.edge_mut(e1).unwrap().prev = bridge_a_id;
        let old_e1_prev = edge1.prev;
        self.edge_mut(old_e1_prev).unwrap().next = bridge_b_id;
        self.edge_mut(e0).unwrap().prev = bridge_b_id;

        let whole_loop = self.edge_loop(bridge_a_id);
        let f = self.face_mut(this_face).unwrap();
        f.edge = bridge_a_id;
        let mut merged: Vec<EdgeId> = f.edges.clone();
        merged.extend(other.edges);
        merged.push(bridge_a_id);
        merged.push(bridge_b_id);
        f.edges = merged;
        debug_assert_eq!(whole_loop.len(), self.face(this_face).unwrap().edges.len());

        Ok(())
    }

    /// An edge is redundant iff it has a twin and dissolving
    /// it leaves both joined corners convex.
    pub fn is_redundant(&self, edge: EdgeId) -> bool {
        let e = match self.edge(edge) {
            Some(e) => e,
            None => return false,
        };
        let twin = match e.twin {
            Some(t) => t,
            None => return false,
        };
        let t = self.edge(twin).unwrap();

        let corner_convex = |prev: EdgeId, next: EdgeId| -> bool {
            let a = self.vert(self.edge(prev).unwrap().vert).unwrap().pos;
            let b = self.vert(self.edge(next).unwrap().vert).unwrap().pos;
            let c = self.vert(self.edge(self.edge(next).unwrap().next).unwrap().vert).unwrap().pos;
            crate::geom::turn_sign(a, b, c) >= -crate::geom::EPSILON
        };

        corner_convex(e.prev, t.next) && corner_convex(t.prev, e.next)
    }

    /// `DissolveEdge(edge, newHoles?)`.
    ///
    /// If the edge's twin borders the *same* face (a pinch), removing it
    /// splits that face; the larger lobe stays as `this`, the smaller is
    /// reported through `new_holes` (oriented CW) rather than discarded.
    /// Otherwise the twin's face
    /// is merged into this one and returned for the caller to delete.
    pub fn dissolve_edge(&mut self, edge: EdgeId, new_holes: &mut Vec<Polygon>) -> MeshResult<Option<FaceId>> {
        let e = *self.edge(edge).ok_or_else(|| MeshError::Precondition("dissolve_edge: missing edge".into()))?;
        let twin = e.twin.ok_or_else(|| MeshError::Precondition("dissolve_edge: edge has no twin".into()))?;
        let t = *self.edge(twin).unwrap();

        if t.face == e.face {
            // Pinch: the single face loop splits into two disjoint loops
            // once `edge`/`twin` are cut out.
            self.unlink_twin_pair(edge, twin);
            let loop_a = self.edge_loop(e.prev);
            let loop_b = self.edge_loop(t.prev);
            let (kept, dropped) = if loop_a.len() >= loop_b.len() { (loop_a, loop_b) } else { (loop_b, loop_a) };

            for &e in &dropped {
                self.edge_mut(e).unwrap().face = FaceId(usize::MAX); // orphaned, reclaimed below
            }
            let hole_points: Vec<Pt2> = dropped.iter().map(|&e| self.vert(self.edge(e).unwrap().vert).unwrap().pos).collect();
            let mut hole_poly = Polygon::new(hole_points);
            if !hole_poly.is_cw() {
                hole_poly.reverse();
            }
            new_holes.push(hole_poly);
            for &e in &dropped {
                self.remove_edge(e);
            }

            let f = self.face_mut(e.face).unwrap();
            f.edge = kept[0];
            f.edges = kept;
            self.remove_edge(edge);
            self.remove_edge(twin);
            Ok(None)
        } else {
            // Merge: adopt the twin's loop into this face and report the
            // twin's face as now-empty for the caller to delete.
            self.unlink_twin_pair(edge, twin);
            for &oe in &self.face(t.face).unwrap().edges.clone() {
                if oe != twin {
                    self.edge_mut(oe).unwrap().face = e.face;
                }
            }
            let new_start = if e.next != twin { e.next } else { t.next };
            let whole = self.edge_loop(new_start);
            let f = self.face_mut(e.face).unwrap();
            f.edge = new_start;
            f.edges = whole;
            self.remove_edge(edge);
            self.remove_edge(twin);
            Ok(Some(t.face))
        }
    }

    /// Splices `edge`/`twin` out of their respective loops, leaving both
    /// sides' `prev`/`next` pointing at each other directly.
    fn unlink_twin_pair(&mut self, edge: EdgeId, twin: EdgeId) {
        let e = *self.edge(edge).unwrap();
        let t = *self.edge(twin).unwrap();
        self.edge_mut(e.prev).unwrap().next = t.next;
        self.edge_mut(t.next).unwrap().prev = e.prev;
        self.edge_mut(t.prev).unwrap().next = e.next;
        self.edge_mut(e.next).unwrap().prev = t.prev;
        // Re-home verts whose `edge` back-pointer used the edge being removed.
        let ev = e.vert;
        if self.vert(ev).unwrap().edge == Some(edge) {
            self.vert_mut(ev).unwrap().edge = Some(t.next);
        }
        let tv = t.vert;
        if self.vert(tv).unwrap().edge == Some(twin) {
            self.vert_mut(tv).unwrap().edge = Some(e.next);
        }
    }

    /// `DissolveToFit(face, polyline, deletedFaces, newHoles)`:
    /// greedily enlarges `face` until none of its boundary edges
    /// cross `polyline`, dissolving one crossing edge per iteration.
    /// Each dissolve either merges a neighbour face into `face` (pushed
    /// to `deleted_faces` once reclaimed) or pinches `face` itself,
    /// producing a hole polygon (pushed to `new_holes`). Terminates
    /// because each iteration strictly reduces `face`'s edge count.
    /// Assumes, as the original does, that `polyline`'s first point is
    /// already inside `face` -- not enforced here.
    pub fn dissolve_to_fit(&mut self, face: FaceId, polyline: &[Pt2], deleted_faces: &mut Vec<FaceId>, new_holes: &mut Vec<Polygon>) -> MeshResult<()> {
        if polyline.len() < 2 {
            return Ok(());
        }
        let segments: Vec<(Pt2, Pt2)> = polyline.windows(2).map(|w| (w[0], w[1])).collect();

        loop {
            let f = self.face(face).ok_or_else(|| MeshError::Precondition("dissolve_to_fit: face missing".into()))?;
            let crossing = f.edges.iter().copied().find(|&e| {
                let edge = self.edge(e).unwrap();
                if edge.twin.is_none() {
                    return false;
                }
                let a = self.vert(edge.vert).unwrap().pos;
                let b = self.vert(self.edge(edge.next).unwrap().vert).unwrap().pos;
                let seg = crate::geom::Line2::new(a, b);
                segments.iter().any(|&(p0, p1)| seg.intersect(&crate::geom::Line2::new(p0, p1)).is_some())
            });

            let edge = match crossing {
                Some(e) => e,
                None => return Ok(()),
            };

            match self.dissolve_edge(edge, new_holes)? {
                Some(dead_face) => {
                    self.delete_face(dead_face)?;
                    deleted_faces.push(dead_face);
                }
                None => {}
            }
        }
    }

    /// Iteratively dissolves every redundant edge until a fixed point.
    pub fn dissolve_redundant_edges(&mut self) {
        loop {
            let candidate = self.edges().find(|(id, _)| self.is_redundant(*id)).map(|(id, _)| id);
            match candidate {
                Some(id) => {
                    let mut holes = Vec::new();
                    if let Ok(Some(dead_face)) = self.dissolve_edge(id, &mut holes) {
                        let _ = self.delete_face(dead_face);
                    }
                }
                None => break,
            }
        }
    }

    /// Walks every face's loop and every edge's twin pairing, checking
    /// the topological invariants this crate relies on: `e.prev.next==e`
    /// and `e.next.prev==e`, a face's `edges` list matches the loop
    /// reached by walking `next` from `face.edge`, every edge in that
    /// loop points back at the face, twin symmetry (`e.twin.twin==e`),
    /// and at least three edges per face. `e.twin.face == e.face` is not
    /// flagged: `bridge_faces` deliberately produces that ("a single-loop
    /// face with a pinched boundary", §4.2) when attaching a hole, and
    /// `dissolve_edge`'s pinch branch operates on exactly such edges.
    /// Corresponds to `Jig::Face::IsValid`.
    pub fn check_valid(&self) -> MeshResult<()> {
        for (face_id, face) in self.faces() {
            if face.edges.len() < 3 {
                return Err(MeshError::InvariantBreach(format!("{:?}: fewer than 3 edges", face_id)));
            }
            let mut cur = face.edge;
            for _ in 0..face.edges.len() {
                let e = self.edge(cur).ok_or_else(|| MeshError::InvariantBreach(format!("{:?}: dangling edge {:?}", face_id, cur)))?;
                if e.face != face_id {
                    return Err(MeshError::InvariantBreach(format!("{:?}: edge {:?} points at {:?}", face_id, cur, e.face)));
                }
                let prev = self.edge(e.prev).ok_or_else(|| MeshError::InvariantBreach(format!("{:?}: dangling prev", face_id)))?;
                if prev.next != cur {
                    return Err(MeshError::InvariantBreach(format!("{:?}.prev.next != {:?}", cur, cur)));
                }
                let next = self.edge(e.next).ok_or_else(|| MeshError::InvariantBreach(format!("{:?}: dangling next", face_id)))?;
                if next.prev != cur {
                    return Err(MeshError::InvariantBreach(format!("{:?}.next.prev != {:?}", cur, cur)));
                }
                if let Some(twin) = e.twin {
                    let t = self.edge(twin).ok_or_else(|| MeshError::InvariantBreach(format!("{:?}: dangling twin", cur)))?;
                    if t.twin != Some(cur) {
                        return Err(MeshError::InvariantBreach(format!("{:?}.twin.twin != {:?}", cur, cur)));
                    }
                }
                cur = e.next;
            }
            if cur != face.edge {
                return Err(MeshError::InvariantBreach(format!("{:?}: edge loop doesn't close after {} steps", face_id, face.edges.len())));
            }
        }
        Ok(())
    }

    /// `debug_assert!`-gated form of `check_valid`, called at the start
    /// and end of every mutation. Panics in debug builds on breach; a
    /// no-op in release.
    pub fn debug_assert_valid(&self) {
        debug_assert!(self.check_valid().is_ok(), "{:?}", self.check_valid().err());
    }
}

impl Default for EdgeMesh {
    fn default() -> Self {
        Self::empty()
    }
}
