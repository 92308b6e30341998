//! Reversible mutation commands.
//!
//! Dispatched through the `Command` trait (an interface-abstraction
//! option for command polymorphism, as opposed to a tagged variant) --
//! `Compound` holds a `Vec<Box<dyn Command>>` and runs them
//! forward/reversed. Every command owns whatever state its `Undo` needs;
//! removed mesh records are held inside the command between `Do` and
//! `Undo`, released only if the command itself is dropped without a
//! matching call.

mod add_outer_face;
mod compound;
mod delete_face;
mod delete_vert;
mod dissolve_edge;
mod insert_verts;
mod merge_face;
mod move_vert;
mod split_face;

pub use add_outer_face::AddOuterFace;
pub use compound::Compound;
pub use delete_face::DeleteFace;
pub use delete_vert::DeleteVert;
pub use dissolve_edge::DissolveEdge;
pub use insert_verts::InsertVerts;
pub use merge_face::MergeFace;
pub use move_vert::MoveVert;
pub use split_face::SplitFace;

use crate::error::MeshResult;
use crate::mesh::EdgeMesh;

/// Every public edit is packaged as one of these.
pub trait Command {
    /// Fails when preconditions are violated. Default true.
    fn can_do(&self, _mesh: &EdgeMesh) -> bool {
        true
    }

    /// Applies the mutation; must leave every touched face valid.
    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()>;

    /// Restores byte-identical topology, including ownership indices used
    /// for stack-like pop/push symmetry. Never fails.
    fn undo(&mut self, mesh: &mut EdgeMesh);
}

/// Runs `cmd.do_cmd` only if `cmd.can_do` passes, matching the
/// `CanDo()`-then-`Do()` contract described for every concrete command.
pub fn try_do(cmd: &mut dyn Command, mesh: &mut EdgeMesh) -> MeshResult<()> {
    if !cmd.can_do(mesh) {
        return Err(crate::error::MeshError::Precondition("command precondition failed".into()));
    }
    log::debug!("command: do");
    cmd.do_cmd(mesh)
}
