//! `InsertVerts(edge, positions)`: subdivides `edge`'s
//! segment by splicing new verts into its face loop between `edge.vert`
//! and `edge.next.vert`. When `edge` has a twin, the same split is
//! mirrored on the twin's loop in reverse, and the new edges are
//! re-paired as twins across the two loops.

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::geom::Pt2;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;

use super::Command;

pub struct InsertVerts {
    edge: EdgeId,
    positions: Vec<Pt2>,

    new_verts: Vec<VertId>,
    fwd_new: Vec<EdgeId>,
    rev_new: Vec<EdgeId>,
    orig_edge: Option<Edge>,
    orig_nx: Option<Edge>,
    orig_twin: Option<Edge>,
    orig_tx: Option<Edge>,
    orig_face_edges: Option<(FaceId, Vec<EdgeId>)>,
    orig_twin_face_edges: Option<(FaceId, Vec<EdgeId>)>,
}

impl InsertVerts {
    pub fn new(edge: EdgeId, positions: Vec<Pt2>) -> Self {
        InsertVerts {
            edge,
            positions,
            new_verts: Vec::new(),
            fwd_new: Vec::new(),
            rev_new: Vec::new(),
            orig_edge: None,
            orig_nx: None,
            orig_twin: None,
            orig_tx: None,
            orig_face_edges: None,
            orig_twin_face_edges: None,
        }
    }
}

impl Command for InsertVerts {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        !self.positions.is_empty() && mesh.edge(self.edge).is_some()
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        let e = *mesh.edge(self.edge).ok_or_else(|| MeshError::Precondition("InsertVerts: edge missing".into()))?;
        let nx = *mesh.edge(e.next).unwrap();
        self.orig_edge = Some(e);
        self.orig_nx = Some(nx);

        let n = self.positions.len();
        let new_verts: Vec<VertId> = self.positions.iter().map(|&p| mesh.add_vert(p)).collect();

        let twin_edge = e.twin.map(|t| (*mesh.edge(t).unwrap(), *mesh.edge(mesh.edge(t).unwrap().next).unwrap()));
        self.orig_twin = twin_edge.map(|(t, _)| t);
        self.orig_tx = twin_edge.map(|(_, tx)| tx);

        // F[0] = e (reused), F[1..=n] freshly pushed; vert of F[i] is
        // `new_verts[i-1]` for i in 1..=n.
        let fwd_base = mesh.edges.slot_count();
        let fwd: Vec<EdgeId> = (0..n).map(|i| EdgeId(fwd_base + i)).collect();
        for i in 0..n {
            let prev = if i == 0 { self.edge } else { fwd[i - 1] };
            let next = if i == n - 1 { e.next } else { fwd[i + 1] };
            mesh.push_edge(Edge { id: fwd[i], vert: new_verts[i], face: e.face, prev, next, twin: None });
        }
        mesh.edge_mut(self.edge).unwrap().next = fwd[0];
        mesh.edge_mut(e.next).unwrap().prev = *fwd.last().unwrap();
        for (i, &v) in new_verts.iter().enumerate() {
            mesh.vert_mut(v).unwrap().edge = Some(fwd[i]);
        }

        let mut rev = Vec::new();
        if let Some(t) = e.twin {
            let t_edge = *mesh.edge(t).unwrap();
            let tx = t_edge.next;
            let rev_base = mesh.edges.slot_count();
            rev = (0..n).map(|j| EdgeId(rev_base + j)).collect();
            for j in 0..n {
                let prev = if j == 0 { t } else { rev[j - 1] };
                let next = if j == n - 1 { tx } else { rev[j + 1] };
                mesh.push_edge(Edge { id: rev[j], vert: new_verts[n - 1 - j], face: t_edge.face, prev, next, twin: None });
            }
            mesh.edge_mut(t).unwrap().next = rev[0];
            mesh.edge_mut(tx).unwrap().prev = *rev.last().unwrap();

            // `new_i` (fwd, 1-indexed i=1..n via fwd[i-1]) pairs with
            // `newt_{n-i}` (rev[n-i-1], with rev[-1] meaning `t` itself).
            mesh.edge_mut(self.edge).unwrap().twin = Some(*rev.last().unwrap());
            mesh.edge_mut(*rev.last().unwrap()).unwrap().twin = Some(self.edge);
            mesh.edge_mut(t).unwrap().twin = Some(*fwd.last().unwrap());
            mesh.edge_mut(*fwd.last().unwrap()).unwrap().twin = Some(t);
            for i in 0..n - 1 {
                let f = fwd[i];
                let r = rev[n - 2 - i];
                mesh.edge_mut(f).unwrap().twin = Some(r);
                mesh.edge_mut(r).unwrap().twin = Some(f);
            }
        }

        let face_loop = mesh.edge_loop(mesh.face(e.face).unwrap().edge);
        self.orig_face_edges = Some((e.face, mesh.face(e.face).unwrap().edges.clone()));
        mesh.face_mut(e.face).unwrap().edges = face_loop;

        if let Some(t) = e.twin {
            let t_face = mesh.edge(t).unwrap().face;
            if t_face != e.face {
                let t_loop = mesh.edge_loop(mesh.face(t_face).unwrap().edge);
                self.orig_twin_face_edges = Some((t_face, mesh.face(t_face).unwrap().edges.clone()));
                mesh.face_mut(t_face).unwrap().edges = t_loop;
            }
        }

        self.new_verts = new_verts;
        self.fwd_new = fwd;
        self.rev_new = rev;
        log::debug!("InsertVerts: {} new verts on {}", n, self.edge);
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        if let Some((face, edges)) = self.orig_twin_face_edges.take() {
            mesh.face_mut(face).unwrap().edges = edges;
        }
        if let Some((face, edges)) = self.orig_face_edges.take() {
            mesh.face_mut(face).unwrap().edges = edges;
        }

        for _ in 0..self.rev_new.len() {
            mesh.pop_edge();
        }
        for _ in 0..self.fwd_new.len() {
            mesh.pop_edge();
        }
        self.fwd_new.clear();
        self.rev_new.clear();

        if let Some(t_edge) = self.orig_twin.take() {
            *mesh.edge_mut(t_edge.id).unwrap() = t_edge;
        }
        if let Some(tx) = self.orig_tx.take() {
            *mesh.edge_mut(tx.id).unwrap() = tx;
        }
        *mesh.edge_mut(self.edge).unwrap() = self.orig_edge.take().unwrap();
        let nx = self.orig_nx.take().unwrap();
        *mesh.edge_mut(nx.id).unwrap() = nx;

        for &v in self.new_verts.iter().rev() {
            mesh.pop_vert();
        }
        self.new_verts.clear();
        mesh.debug_assert_valid();
    }
}
