//! `SplitFace(startEdge, endEdge, interiorPolyline)`: bridges
//! two edges of the same face through a freshly created interior vert
//! chain, producing a new face. Wraps `EdgeMesh::split_face_with_verts`.

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::geom::Pt2;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;

use super::Command;

pub struct SplitFace {
    face: FaceId,
    start_edge: EdgeId,
    end_edge: EdgeId,
    interior_positions: Vec<Pt2>,

    interior_verts: Vec<VertId>,
    new_face: Option<FaceId>,
    new_edge_count: usize,
    orig_face: Option<Face>,
    orig_start: Option<Edge>,
    orig_end: Option<Edge>,
    orig_start_prev: Option<Edge>,
    orig_end_next: Option<Edge>,
    /// Every edge adopted into the new face's loop besides the bridge
    /// chain itself -- the far-side pass-through edges, plus `start_edge`
    /// itself (its loop position moves to the far side even though its
    /// identity is restored separately below) -- reassigned to `new_face`
    /// by `split_face_with_verts` and restored to `self.face` on `Undo`.
    reassigned_edges: Vec<EdgeId>,
}

impl SplitFace {
    pub fn new(face: FaceId, start_edge: EdgeId, end_edge: EdgeId, interior_positions: Vec<Pt2>) -> Self {
        SplitFace {
            face,
            start_edge,
            end_edge,
            interior_positions,
            interior_verts: Vec::new(),
            new_face: None,
            new_edge_count: 0,
            orig_face: None,
            orig_start: None,
            orig_end: None,
            orig_start_prev: None,
            orig_end_next: None,
            reassigned_edges: Vec::new(),
        }
    }
}

impl Command for SplitFace {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        mesh.face(self.face).is_some() && mesh.edge(self.start_edge).is_some() && mesh.edge(self.end_edge).is_some()
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        let face_before = mesh.face(self.face).cloned().ok_or_else(|| MeshError::Precondition("SplitFace: face missing".into()))?;
        let start_before = *mesh.edge(self.start_edge).ok_or_else(|| MeshError::Precondition("SplitFace: start_edge missing".into()))?;
        let end_before = *mesh.edge(self.end_edge).ok_or_else(|| MeshError::Precondition("SplitFace: end_edge missing".into()))?;
        let start_prev_before = *mesh.edge(end_before.prev).unwrap();
        let end_next_before = *mesh.edge(start_before.next).unwrap();

        let interior: Vec<VertId> = self.interior_positions.iter().map(|&p| mesh.add_vert(p)).collect();
        let (new_face, fwd, rev) = mesh.split_face_with_verts(self.face, self.start_edge, self.end_edge, &interior)?;

        let rev_set: std::collections::HashSet<EdgeId> = rev.iter().copied().collect();
        let reassigned: Vec<EdgeId> = mesh.face(new_face).unwrap().edges.iter().copied().filter(|e| !rev_set.contains(e)).collect();

        self.interior_verts = interior;
        self.new_face = Some(new_face);
        self.new_edge_count = fwd.len() + rev.len();
        self.orig_face = Some(face_before);
        self.orig_start = Some(start_before);
        self.orig_end = Some(end_before);
        self.orig_start_prev = Some(start_prev_before);
        self.orig_end_next = Some(end_next_before);
        self.reassigned_edges = reassigned;

        log::debug!("SplitFace: {} -> {} + {}", self.face, self.face, new_face);
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        let new_face = self.new_face.take().expect("SplitFace::undo: not done");
        mesh.remove_face(new_face);
        for _ in 0..self.new_edge_count {
            mesh.pop_edge();
        }

        *mesh.edge_mut(self.start_edge).unwrap() = self.orig_start.take().unwrap();
        *mesh.edge_mut(self.end_edge).unwrap() = self.orig_end.take().unwrap();
        let start_prev = mesh.edge(self.end_edge).unwrap().prev;
        *mesh.edge_mut(start_prev).unwrap() = self.orig_start_prev.take().unwrap();
        let end_next = mesh.edge(self.start_edge).unwrap().next;
        *mesh.edge_mut(end_next).unwrap() = self.orig_end_next.take().unwrap();

        for e in self.reassigned_edges.drain(..) {
            mesh.edge_mut(e).unwrap().face = self.face;
        }

        *mesh.face_mut(self.face).unwrap() = self.orig_face.take().unwrap();

        for &v in self.interior_verts.iter().rev() {
            let popped = mesh.pop_vert();
            debug_assert_eq!(popped.map(|(_, id)| id), Some(v));
        }
        self.interior_verts.clear();
        mesh.debug_assert_valid();
    }
}
