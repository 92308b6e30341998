//! `DeleteFace(face)`: detaches a face entirely. Every edge
//! bordering it that had a twin is de-twinned (the neighbour becomes
//! outer on that side); every vert whose only incidence was this face
//! is removed along with it. `Undo` restores the face, its edges, the
//! detwinned neighbours, and the orphaned verts at their original
//! arena slots.

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;
use crate::vert::Vert;

use super::Command;

pub struct DeleteFace {
    face: FaceId,

    removed_face: Option<Face>,
    removed_edges: Vec<(EdgeId, Edge)>,
    detwinned: Vec<(EdgeId, EdgeId)>, // (neighbour edge, this edge it used to point to)
    removed_verts: Vec<(VertId, Vert)>,
}

impl DeleteFace {
    pub fn new(face: FaceId) -> Self {
        DeleteFace { face, removed_face: None, removed_edges: Vec::new(), detwinned: Vec::new(), removed_verts: Vec::new() }
    }
}

impl Command for DeleteFace {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        mesh.face(self.face).is_some()
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        let face = mesh.face(self.face).cloned().ok_or_else(|| MeshError::Precondition("DeleteFace: face missing".into()))?;

        for &e in &face.edges {
            if let Some(twin) = mesh.edge(e).unwrap().twin {
                self.detwinned.push((twin, e));
                mesh.edge_mut(twin).unwrap().twin = None;
            }
        }

        // A vert is orphaned if no edge outside this face still
        // originates from it once the face's own edges are gone.
        let face_verts: Vec<VertId> = face.edges.iter().map(|&e| mesh.edge(e).unwrap().vert).collect();
        for &v in &face_verts {
            let still_used = mesh.edges().any(|(id, edge)| edge.vert == v && !face.edges.contains(&id));
            if !still_used {
                if let Some((vert, id)) = mesh.remove_vert(v) {
                    self.removed_verts.push((id, vert));
                }
            }
        }

        for &e in &face.edges {
            if let Some(edge) = mesh.remove_edge(e) {
                self.removed_edges.push((e, edge));
            }
        }
        mesh.delete_face(self.face)?;
        self.removed_face = Some(face);

        log::debug!("DeleteFace: removed {}", self.face);
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        for &(id, ref vert) in self.removed_verts.iter().rev() {
            mesh.insert_vert(id, vert.clone());
        }

        for &(id, edge) in &self.removed_edges {
            mesh.insert_edge(id, edge);
        }
        self.removed_edges.clear();

        let face = self.removed_face.take().expect("DeleteFace::undo: not done");
        mesh.insert_face(self.face, face);

        for &(twin, pointee) in self.detwinned.iter().rev() {
            mesh.edge_mut(twin).unwrap().twin = Some(pointee);
        }
        self.removed_verts.clear();
        self.detwinned.clear();
        mesh.debug_assert_valid();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::pt;
    use crate::ids::FaceId;

    fn isolated_triangle() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let v0 = mesh.add_vert(pt(0.0, 0.0));
        let v1 = mesh.add_vert(pt(10.0, 0.0));
        let v2 = mesh.add_vert(pt(0.0, 10.0));
        let e0 = EdgeId(0);
        let e1 = EdgeId(1);
        let e2 = EdgeId(2);
        mesh.push_edge(Edge { id: e0, vert: v0, face: FaceId(0), prev: e2, next: e1, twin: None });
        mesh.push_edge(Edge { id: e1, vert: v1, face: FaceId(0), prev: e0, next: e2, twin: None });
        mesh.push_edge(Edge { id: e2, vert: v2, face: FaceId(0), prev: e1, next: e0, twin: None });
        mesh.push_face(Face::new(FaceId(0), e0, vec![e0, e1, e2]));
        mesh.update();
        mesh
    }

    #[test]
    fn delete_then_undo_restores_isolated_triangle() {
        let mut mesh = isolated_triangle();
        let mut cmd = DeleteFace::new(FaceId(0));
        cmd.do_cmd(&mut mesh).unwrap();
        assert_eq!(mesh.faces().count(), 0);
        assert_eq!(mesh.verts().count(), 0);
        cmd.undo(&mut mesh);
        assert_eq!(mesh.faces().count(), 1);
        assert_eq!(mesh.verts().count(), 3);
        assert_eq!(mesh.face(FaceId(0)).unwrap().edges.len(), 3);
    }
}
