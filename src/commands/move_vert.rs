//! `MoveVert(vert, newPos)`: swaps a vert's position; `Undo` is the same
//! operation (an involution).

use crate::error::MeshResult;
use crate::geom::Pt2;
use crate::ids::VertId;
use crate::mesh::EdgeMesh;

use super::Command;

pub struct MoveVert {
    vert: VertId,
    new_pos: Pt2,
    prior_pos: Option<Pt2>,
}

impl MoveVert {
    pub fn new(vert: VertId, new_pos: Pt2) -> Self {
        MoveVert { vert, new_pos, prior_pos: None }
    }
}

impl Command for MoveVert {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        mesh.vert(self.vert).is_some()
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        let v = mesh.vert_mut(self.vert).ok_or_else(|| crate::error::MeshError::Precondition("MoveVert: vert missing".into()))?;
        self.prior_pos = Some(v.pos);
        v.move_to(self.new_pos);
        log::trace!("MoveVert {} -> {:?}", self.vert, self.new_pos);
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        if let Some(prior) = self.prior_pos.take() {
            mesh.vert_mut(self.vert).expect("MoveVert::undo: vert missing").move_to(prior);
        }
        mesh.debug_assert_valid();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::pt;

    #[test]
    fn move_then_undo_restores_position() {
        let mut mesh = EdgeMesh::empty();
        let v = mesh.add_vert(pt(0.0, 0.0));
        let mut cmd = MoveVert::new(v, pt(5.0, 5.0));
        cmd.do_cmd(&mut mesh).unwrap();
        assert_eq!(mesh.vert(v).unwrap().pos, pt(5.0, 5.0));
        cmd.undo(&mut mesh);
        assert_eq!(mesh.vert(v).unwrap().pos, pt(0.0, 0.0));
    }
}
