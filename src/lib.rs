//! A half-edge data structure for 2D planar subdivisions: convex
//! decomposition, reversible edit commands, per-vertex visibility, and
//! A* pathfinding over the resulting navigable region.
//!
//! Module layout: `geom` is the leaf layer, `arena`/`ids` back the mesh's
//! flat storage, `edge`/`vert`/`face`/`mesh` are the half-edge data model
//! and its topological iterators, `shape_splitter` is convex
//! decomposition, `commands` are the reversible mutations, and
//! `visibility`/`path_finder` are the two query subsystems built on top.
//! `quadtree` and `triangulator` are support components the mesh and its
//! adapter use internally but that callers may also reach for directly.

pub mod arena;
pub mod commands;
pub mod edge;
pub mod error;
pub mod face;
pub mod geom;
pub mod ids;
pub mod iterators;
pub mod mesh;
pub mod persist;
pub mod quadtree;
pub mod shape_splitter;
pub mod triangulator;
pub mod vert;
pub mod visibility;

pub mod path_finder;

pub use self::edge::Edge;
pub use self::error::{MeshError, MeshResult};
pub use self::face::Face;
pub use self::ids::{EdgeId, FaceId, VertId};
pub use self::mesh::EdgeMesh;
pub use self::path_finder::PathFinder;
pub use self::vert::{Vert, VertPayload};
pub use self::visibility::EdgeMeshVisibility;
