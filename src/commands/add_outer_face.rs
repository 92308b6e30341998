//! `AddOuterFace(startOuterEdge, endOuterEdge, interiorPolyline)`:
//! grows the mesh's boundary by attaching a new face along a run
//! of existing outer edges plus a fresh interior polyline. Wraps
//! `EdgeMesh::add_outer_face`, which does the mechanical edge wiring but
//! leaves orientation to the caller.

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::geom::Pt2;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;

use super::Command;

pub struct AddOuterFace {
    start_outer: EdgeId,
    end_outer: EdgeId,
    interior_positions: Vec<Pt2>,

    new_face: Option<FaceId>,
    new_verts: Vec<VertId>,
    retwinned: Vec<(EdgeId, Option<EdgeId>)>,
    new_edge_count: usize,
}

impl AddOuterFace {
    pub fn new(start_outer: EdgeId, end_outer: EdgeId, interior_positions: Vec<Pt2>) -> Self {
        AddOuterFace { start_outer, end_outer, interior_positions, new_face: None, new_verts: Vec::new(), retwinned: Vec::new(), new_edge_count: 0 }
    }
}

impl Command for AddOuterFace {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        mesh.edge(self.start_outer).map_or(false, Edge::is_outer) && mesh.edge(self.end_outer).map_or(false, Edge::is_outer)
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        // The boundary walk from `end_outer` to `start_outer` becomes the
        // reused chain (see `EdgeMesh::add_outer_face`); record each
        // reused edge's prior (null) twin before the call overwrites it.
        let mut chain = vec![self.end_outer];
        let mut cur = self.end_outer;
        loop {
            let nxt = mesh.next_outer_edge(cur);
            if nxt == self.start_outer {
                break;
            }
            chain.push(nxt);
            cur = nxt;
        }
        self.retwinned = chain.iter().map(|&e| (e, mesh.edge(e).unwrap().twin)).collect();

        let (new_face, new_verts, twins) = mesh.add_outer_face(self.start_outer, self.end_outer, &self.interior_positions)?;
        self.new_face = Some(new_face);
        self.new_verts = new_verts;
        self.new_edge_count = twins.len() + (self.interior_positions.len() + 1);

        log::debug!("AddOuterFace: added {} bordering {} reused outer edges", new_face, chain.len());
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        let new_face = self.new_face.take().expect("AddOuterFace::undo: not done");
        mesh.remove_face(new_face);
        for _ in 0..self.new_edge_count {
            mesh.pop_edge();
        }
        for &(e, prior_twin) in &self.retwinned {
            mesh.edge_mut(e).unwrap().twin = prior_twin;
        }
        for &v in self.new_verts.iter().rev() {
            mesh.pop_vert();
        }
        self.new_verts.clear();
        self.retwinned.clear();
        mesh.debug_assert_valid();
    }
}

impl AddOuterFace {
    /// Builds the command with `start`/`end` in whichever order keeps the
    /// polyline-then-boundary-walk CW, swapping if given the other way
    /// round.
    pub fn oriented(mesh: &EdgeMesh, a: EdgeId, b: EdgeId, interior_positions: Vec<Pt2>) -> MeshResult<Self> {
        let edge_a = mesh.edge(a).ok_or_else(|| MeshError::Precondition("AddOuterFace: edge missing".into()))?;
        let edge_b = mesh.edge(b).ok_or_else(|| MeshError::Precondition("AddOuterFace: edge missing".into()))?;
        if !edge_a.is_outer() || !edge_b.is_outer() {
            return Err(MeshError::Precondition("AddOuterFace: both edges must be outer".into()));
        }

        // Try `a` as start/`b` as end; if the boundary walk from `b`
        // never reaches `a`, the pair is backwards -- swap.
        let mut cur = b;
        loop {
            let nxt = mesh.next_outer_edge(cur);
            if nxt == a {
                return Ok(AddOuterFace::new(a, b, interior_positions));
            }
            if nxt == b {
                break;
            }
            cur = nxt;
        }
        Ok(AddOuterFace::new(b, a, interior_positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::Face;
    use crate::geom::pt;

    fn square_boundary() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let v00 = mesh.add_vert(pt(0.0, 0.0));
        let v10 = mesh.add_vert(pt(10.0, 0.0));
        let v11 = mesh.add_vert(pt(10.0, 10.0));
        let v01 = mesh.add_vert(pt(0.0, 10.0));
        let e0 = EdgeId(0);
        let e1 = EdgeId(1);
        let e2 = EdgeId(2);
        let e3 = EdgeId(3);
        mesh.push_edge(Edge { id: e0, vert: v00, face: FaceId(0), prev: e3, next: e1, twin: None });
        mesh.push_edge(Edge { id: e1, vert: v10, face: FaceId(0), prev: e0, next: e2, twin: None });
        mesh.push_edge(Edge { id: e2, vert: v11, face: FaceId(0), prev: e1, next: e3, twin: None });
        mesh.push_edge(Edge { id: e3, vert: v01, face: FaceId(0), prev: e2, next: e0, twin: None });
        mesh.push_face(Face::new(FaceId(0), e0, vec![e0, e1, e2, e3]));
        mesh.update();
        mesh
    }

    #[test]
    fn add_outer_face_then_undo_restores_square() {
        let mut mesh = square_boundary();
        // Grow a triangle off the top edge (e2: (10,10)->(0,10)) through a
        // new apex at (5,15).
        let mut cmd = AddOuterFace::new(EdgeId(3), EdgeId(2), vec![pt(5.0, 15.0)]);
        cmd.do_cmd(&mut mesh).unwrap();
        assert_eq!(mesh.faces().count(), 2);
        cmd.undo(&mut mesh);
        assert_eq!(mesh.faces().count(), 1);
        assert_eq!(mesh.verts().count(), 4);
    }
}
