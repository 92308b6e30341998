//! `DeleteVert(vert)`: removes a vertex from every face it
//! corners, splicing each face's loop straight across the gap.
//!
//! Permitted only when every touched face has >= 4 edges, and no face
//! would be left bordering the same neighbour face on two consecutive
//! edges (an "only twin" collapse that would pinch two faces together
//! along a zero-length seam). When exactly two faces meet at `vert`
//! across a matching twin pair -- the common case of deleting a
//! redundant mid-chain vertex, the inverse of `InsertVerts` -- the two
//! surviving edges are re-twinned with each other. Otherwise the
//! surviving edges are de-twinned: the faces that used to meet at
//! `vert` still meet there, just at a single point rather than along a
//! shared edge.

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;
use crate::vert::Vert;

use super::Command;

pub struct DeleteVert {
    vert: VertId,

    out_edges: Vec<EdgeId>,
    orig_out_edges: Vec<(EdgeId, Edge)>,
    orig_in_edges: Vec<(EdgeId, Edge)>,
    orig_after_edges: Vec<(EdgeId, Edge)>,
    orig_faces: Vec<(FaceId, Face)>,
    retwinned: Vec<(EdgeId, Option<EdgeId>)>,
    removed_vert: Option<Vert>,
}

impl DeleteVert {
    pub fn new(vert: VertId) -> Self {
        DeleteVert {
            vert,
            out_edges: Vec::new(),
            orig_out_edges: Vec::new(),
            orig_in_edges: Vec::new(),
            orig_after_edges: Vec::new(),
            orig_faces: Vec::new(),
            retwinned: Vec::new(),
            removed_vert: None,
        }
    }

    fn out_edges_of(mesh: &EdgeMesh, vert: VertId) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = mesh.edges().filter(|(_, e)| e.vert == vert).map(|(id, _)| id).collect();
        edges.sort_by_key(|e| e.0);
        edges
    }
}

impl Command for DeleteVert {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        if mesh.vert(self.vert).is_none() {
            return false;
        }
        let out_edges = Self::out_edges_of(mesh, self.vert);
        if out_edges.is_empty() {
            return false;
        }
        for &oe in &out_edges {
            let e = *mesh.edge(oe).unwrap();
            let f = match mesh.face(e.face) {
                Some(f) => f,
                None => return false,
            };
            if f.num_edges() < 4 {
                return false;
            }
            let in_e = mesh.edge(e.prev).unwrap();
            let after_e = mesh.edge(e.next).unwrap();
            if let (Some(it), Some(at)) = (in_e.twin, after_e.twin) {
                if mesh.edge(it).unwrap().face == mesh.edge(at).unwrap().face {
                    return false;
                }
            }
        }
        true
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        if !self.can_do(mesh) {
            return Err(MeshError::Precondition("DeleteVert: preconditions not met".into()));
        }
        let out_edges = Self::out_edges_of(mesh, self.vert);

        // Capture everything `Undo` needs before splicing anything.
        let mut in_after: Vec<(EdgeId, EdgeId)> = Vec::with_capacity(out_edges.len());
        for &oe in &out_edges {
            let e = *mesh.edge(oe).unwrap();
            self.orig_out_edges.push((oe, e));
            self.orig_in_edges.push((e.prev, *mesh.edge(e.prev).unwrap()));
            self.orig_after_edges.push((e.next, *mesh.edge(e.next).unwrap()));
            self.orig_faces.push((e.face, mesh.face(e.face).unwrap().clone()));
            in_after.push((e.prev, e.next));
        }

        // Splice the corner out of each touched face's loop.
        for (i, &oe) in out_edges.iter().enumerate() {
            let (in_id, after_id) = in_after[i];
            mesh.edge_mut(in_id).unwrap().next = after_id;
            mesh.edge_mut(after_id).unwrap().prev = in_id;
            let face_id = self.orig_out_edges[i].1.face;
            let new_loop = mesh.edge_loop(in_id);
            let f = mesh.face_mut(face_id).unwrap();
            f.edge = in_id;
            f.edges = new_loop;
            let _ = oe;
        }

        // Twin bookkeeping. Use the *original* (pre-splice) records --
        // `in`/`after`'s own `twin` fields are untouched by the splice
        // above, so these are still accurate.
        let mut retwin_applied = [false, false];
        if out_edges.len() == 2 {
            let (in_a, _) = in_after[0];
            let (in_b, _) = in_after[1];
            let out_a_twin = self.orig_out_edges[0].1.twin;
            let out_b_twin = self.orig_out_edges[1].1.twin;
            if out_a_twin == Some(in_b) && out_b_twin == Some(in_a) {
                self.retwinned.push((in_a, mesh.edge(in_a).unwrap().twin));
                self.retwinned.push((in_b, mesh.edge(in_b).unwrap().twin));
                mesh.edge_mut(in_a).unwrap().twin = Some(in_b);
                mesh.edge_mut(in_b).unwrap().twin = Some(in_a);
                retwin_applied = [true, true];
            }
        }

        for (i, _) in out_edges.iter().enumerate() {
            if retwin_applied.get(i).copied().unwrap_or(false) {
                continue;
            }
            if let Some(t) = self.orig_out_edges[i].1.twin {
                self.retwinned.push((t, mesh.edge(t).unwrap().twin));
                mesh.edge_mut(t).unwrap().twin = None;
            }
        }

        // Finally remove the now-unreferenced out-edges and the vert.
        for &oe in &out_edges {
            mesh.remove_edge(oe);
        }
        if let Some((vert, _)) = mesh.remove_vert(self.vert) {
            self.removed_vert = Some(vert);
        }

        self.out_edges = out_edges;
        log::debug!("DeleteVert: removed {}, touching {} faces", self.vert, self.orig_faces.len());
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        let vert = self.removed_vert.take().expect("DeleteVert::undo: not done");
        mesh.insert_vert(self.vert, vert);

        for &(id, ref edge) in self.orig_out_edges.iter().rev() {
            mesh.insert_edge(id, *edge);
        }

        for &(id, prior_twin) in self.retwinned.iter().rev() {
            mesh.edge_mut(id).unwrap().twin = prior_twin;
        }
        self.retwinned.clear();

        for &(id, ref edge) in &self.orig_in_edges {
            *mesh.edge_mut(id).unwrap() = *edge;
        }
        for &(id, ref edge) in &self.orig_after_edges {
            *mesh.edge_mut(id).unwrap() = *edge;
        }

        for &(id, ref face) in &self.orig_faces {
            *mesh.face_mut(id).unwrap() = face.clone();
        }

        self.out_edges.clear();
        self.orig_out_edges.clear();
        self.orig_in_edges.clear();
        self.orig_after_edges.clear();
        self.orig_faces.clear();
        mesh.debug_assert_valid();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::pt;

    /// A single pentagonal face with an extra, removable corner at
    /// (10,5) along what would otherwise be a straight right edge. No
    /// twins are involved -- the simplest case (one face, no re/de-twin
    /// decision to make).
    fn pentagon_with_redundant_corner() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(10.0, 10.0), pt(0.0, 10.0)];
        let verts: Vec<_> = pts.iter().map(|&p| mesh.add_vert(p)).collect();
        let n = verts.len();
        let ids: Vec<EdgeId> = (0..n).map(EdgeId).collect();
        for i in 0..n {
            let prev = ids[(i + n - 1) % n];
            let next = ids[(i + 1) % n];
            mesh.push_edge(Edge { id: ids[i], vert: verts[i], face: FaceId(0), prev, next, twin: None });
        }
        mesh.push_face(Face::new(FaceId(0), ids[0], ids.clone()));
        mesh.update();
        mesh
    }

    #[test]
    fn delete_single_face_corner_then_undo() {
        let mut mesh = pentagon_with_redundant_corner();
        let v_mid = mesh.verts().find(|(_, v)| v.pos == pt(10.0, 5.0)).unwrap().0;
        let mut cmd = DeleteVert::new(v_mid);
        assert!(cmd.can_do(&mesh));
        cmd.do_cmd(&mut mesh).unwrap();
        assert_eq!(mesh.face(FaceId(0)).unwrap().edges.len(), 4);
        assert_eq!(mesh.verts().count(), 4);

        cmd.undo(&mut mesh);
        assert_eq!(mesh.face(FaceId(0)).unwrap().edges.len(), 5);
        assert_eq!(mesh.verts().count(), 5);
    }

    /// Two rectangles sharing a vertical boundary that's been split at
    /// its midpoint: deleting that midpoint vert should re-twin the two
    /// surviving edges into a single shared edge, the inverse of
    /// `InsertVerts`.
    fn two_rects_with_split_shared_edge() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let p00 = mesh.add_vert(pt(0.0, 0.0));
        let p50 = mesh.add_vert(pt(5.0, 0.0));
        let p55 = mesh.add_vert(pt(5.0, 5.0));
        let p510 = mesh.add_vert(pt(5.0, 10.0));
        let p010 = mesh.add_vert(pt(0.0, 10.0));
        let p100 = mesh.add_vert(pt(10.0, 0.0));
        let p1010 = mesh.add_vert(pt(10.0, 10.0));

        // Face A (left): (0,0) -> (5,0) -> (5,5) -> (5,10) -> (0,10) -> back.
        let a: Vec<EdgeId> = (0..5).map(EdgeId).collect();
        let a_verts = [p00, p50, p55, p510, p010];
        for i in 0..5 {
            let prev = a[(i + 4) % 5];
            let next = a[(i + 1) % 5];
            mesh.push_edge(Edge { id: a[i], vert: a_verts[i], face: FaceId(0), prev, next, twin: None });
        }
        mesh.push_face(Face::new(FaceId(0), a[0], a.clone()));

        // Face B (right): (5,0) -> (10,0) -> (10,10) -> (5,10) -> (5,5) -> back.
        let b: Vec<EdgeId> = (5..10).map(EdgeId).collect();
        let b_verts = [p50, p100, p1010, p510, p55];
        for i in 0..5 {
            let prev = b[(i + 4) % 5];
            let next = b[(i + 1) % 5];
            mesh.push_edge(Edge { id: b[i], vert: b_verts[i], face: FaceId(1), prev, next, twin: None });
        }
        mesh.push_face(Face::new(FaceId(1), b[0], b.clone()));

        // a[1] = (5,0)->(5,5); a[2] = (5,5)->(5,10); b[3] = (5,10)->(5,5); b[4] = (5,5)->(5,0).
        mesh.edge_mut(a[1]).unwrap().twin = Some(b[4]);
        mesh.edge_mut(b[4]).unwrap().twin = Some(a[1]);
        mesh.edge_mut(a[2]).unwrap().twin = Some(b[3]);
        mesh.edge_mut(b[3]).unwrap().twin = Some(a[2]);

        mesh.update();
        mesh
    }

    #[test]
    fn delete_shared_midpoint_vert_retwins_survivors() {
        let mut mesh = two_rects_with_split_shared_edge();
        let v_mid = mesh.verts().find(|(_, v)| v.pos == pt(5.0, 5.0)).unwrap().0;
        let mut cmd = DeleteVert::new(v_mid);
        assert!(cmd.can_do(&mesh));
        cmd.do_cmd(&mut mesh).unwrap();

        assert_eq!(mesh.face(FaceId(0)).unwrap().edges.len(), 4);
        assert_eq!(mesh.face(FaceId(1)).unwrap().edges.len(), 4);
        assert_eq!(mesh.verts().count(), 6);

        // The two surviving edges along the old shared boundary are
        // now twins of each other.
        let survivor_a = mesh.find_edge_with_vert(mesh.verts().find(|(_, v)| v.pos == pt(5.0, 0.0)).unwrap().0).unwrap();
        let survivor_b = mesh.edge(survivor_a).unwrap().twin;
        assert!(survivor_b.is_some());

        cmd.undo(&mut mesh);
        assert_eq!(mesh.face(FaceId(0)).unwrap().edges.len(), 5);
        assert_eq!(mesh.face(FaceId(1)).unwrap().edges.len(), 5);
        assert_eq!(mesh.verts().count(), 7);
    }
}
