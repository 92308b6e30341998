//! Error kinds for the mesh core.
//!
//! `Undo` never fails: once a command's `Do` has completed, restoring the
//! prior graph is guaranteed to succeed, so only `CanDo`/`Do` and the
//! geometry layer return `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    /// A command's preconditions were not met (non-adjacent edges passed to
    /// `SplitFace`, deleting a vertex that would collapse a face, etc).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A geometric degeneracy was detected (zero-length segment, coincident
    /// verts, self-intersecting polyline).
    #[error("geometric degeneracy: {0}")]
    Degenerate(String),

    /// An internal invariant was found broken by an `assert_valid` pass.
    /// Should never happen outside of a bug; kept distinct from
    /// `Precondition` so callers can tell "you asked for something invalid"
    /// from "the mesh is corrupt".
    #[error("invariant breach: {0}")]
    InvariantBreach(String),
}

pub type MeshResult<T> = Result<T, MeshError>;
