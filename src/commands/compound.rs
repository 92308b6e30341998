//! `Compound`: bundles several commands into one undoable unit, e.g.
//! `Convexify`'s worklist of `SplitFace` calls, or a multi-step editor
//! gesture that should undo as a single step.

use crate::error::MeshResult;
use crate::mesh::EdgeMesh;

use super::Command;

#[derive(Default)]
pub struct Compound {
    children: Vec<Box<dyn Command>>,
    done: usize,
}

impl Compound {
    pub fn new() -> Self {
        Compound { children: Vec::new(), done: 0 }
    }

    pub fn push(&mut self, cmd: Box<dyn Command>) {
        self.children.push(cmd);
    }

    pub fn with(mut self, cmd: Box<dyn Command>) -> Self {
        self.push(cmd);
        self
    }
}

impl Command for Compound {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        self.children.iter().all(|c| c.can_do(mesh))
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        for (i, cmd) in self.children.iter_mut().enumerate() {
            if let Err(e) = cmd.do_cmd(mesh) {
                self.done = i;
                for prior in self.children[..i].iter_mut().rev() {
                    prior.undo(mesh);
                }
                return Err(e);
            }
        }
        self.done = self.children.len();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        for cmd in self.children[..self.done].iter_mut().rev() {
            cmd.undo(mesh);
        }
        self.done = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MoveVert;
    use crate::edge::Edge;
    use crate::face::Face;
    use crate::geom::pt;
    use crate::ids::{EdgeId, FaceId};

    fn triangle_mesh() -> EdgeMesh {
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
    fn compound_runs_children_forward_and_undoes_in_reverse() {
        let mut mesh = triangle_mesh();
        let v0 = mesh.verts().find(|(_, v)| v.pos == pt(0.0, 0.0)).unwrap().0;
        let v1 = mesh.verts().find(|(_, v)| v.pos == pt(10.0, 0.0)).unwrap().0;

        let mut cmd = Compound::new().with(Box::new(MoveVert::new(v0, pt(1.0, 1.0)))).with(Box::new(MoveVert::new(v1, pt(11.0, 1.0))));
        cmd.do_cmd(&mut mesh).unwrap();
        assert_eq!(mesh.vert(v0).unwrap().pos, pt(1.0, 1.0));
        assert_eq!(mesh.vert(v1).unwrap().pos, pt(11.0, 1.0));

        cmd.undo(&mut mesh);
        assert_eq!(mesh.vert(v0).unwrap().pos, pt(0.0, 0.0));
        assert_eq!(mesh.vert(v1).unwrap().pos, pt(10.0, 0.0));
    }
}
