//! In-memory persistence contract: a `serde`-derived flat
//! record of every live vert/edge/face, preserving arena slot indices
//! so a round trip restores tombstones at their original positions too.
//! No file format or codec is specified here -- any serializer applied
//! to `MeshRecord` that preserves `vert_id`/`prev_id`/`next_id`/
//! `twin_id` round-trips the mesh.

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::face::Face;
use crate::geom::pt;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;
use crate::vert::{Vert, VertPayload};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VertPayloadRecord {
    None,
    Tag(String),
    Data(Vec<u8>),
}

impl From<&VertPayload> for VertPayloadRecord {
    fn from(p: &VertPayload) -> Self {
        match p {
            VertPayload::None => VertPayloadRecord::None,
            VertPayload::Tag(s) => VertPayloadRecord::Tag(s.clone()),
            VertPayload::Data(d) => VertPayloadRecord::Data(d.clone()),
        }
    }
}

impl From<VertPayloadRecord> for VertPayload {
    fn from(p: VertPayloadRecord) -> Self {
        match p {
            VertPayloadRecord::None => VertPayload::None,
            VertPayloadRecord::Tag(s) => VertPayload::Tag(s),
            VertPayloadRecord::Data(d) => VertPayload::Data(d),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VertRecord {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub edge_id: Option<usize>,
    pub payload: VertPayloadRecord,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: usize,
    pub vert_id: usize,
    pub face_id: usize,
    pub prev_id: usize,
    pub next_id: usize,
    pub twin_id: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaceRecord {
    pub id: usize,
    pub edge_id: usize,
    pub edge_ids: Vec<usize>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeshRecord {
    pub verts: Vec<VertRecord>,
    pub edges: Vec<EdgeRecord>,
    pub faces: Vec<FaceRecord>,
}

/// Flattens every live vert/edge/face into a serializable snapshot.
/// Tombstoned arena slots are simply absent -- `from_record` relies on
/// `Arena::insert`'s grow-with-tombstones behaviour to reproduce the
/// same gaps.
pub fn to_record(mesh: &EdgeMesh) -> MeshRecord {
    let verts = mesh.verts().map(|(id, v)| VertRecord { id: id.0, x: v.pos.x, y: v.pos.y, edge_id: v.edge.map(|e| e.0), payload: VertPayloadRecord::from(&v.payload) }).collect();
    let edges = mesh.edges().map(|(id, e)| EdgeRecord { id: id.0, vert_id: e.vert.0, face_id: e.face.0, prev_id: e.prev.0, next_id: e.next.0, twin_id: e.twin.map(|t| t.0) }).collect();
    let faces = mesh.faces().map(|(id, f)| FaceRecord { id: id.0, edge_id: f.edge.0, edge_ids: f.edges.iter().map(|e| e.0).collect() }).collect();
    MeshRecord { verts, edges, faces }
}

/// Rebuilds an `EdgeMesh` from a snapshot, reinstating every vert/edge/
/// face at its original arena slot, then refreshes the derived bbox and
/// quadtree caches via `EdgeMesh::update`.
pub fn from_record(record: &MeshRecord) -> EdgeMesh {
    let mut mesh = EdgeMesh::empty();
    for vr in &record.verts {
        let mut vert = Vert::new(VertId(vr.id), pt(vr.x, vr.y));
        vert.edge = vr.edge_id.map(EdgeId);
        vert.payload = VertPayload::from(vr.payload.clone());
        mesh.insert_vert(VertId(vr.id), vert);
    }
    for er in &record.edges {
        let edge = Edge { id: EdgeId(er.id), vert: VertId(er.vert_id), face: FaceId(er.face_id), prev: EdgeId(er.prev_id), next: EdgeId(er.next_id), twin: er.twin_id.map(EdgeId) };
        mesh.insert_edge(EdgeId(er.id), edge);
    }
    for fr in &record.faces {
        let face = Face::new(FaceId(fr.id), EdgeId(fr.edge_id), fr.edge_ids.iter().map(|&e| EdgeId(e)).collect());
        mesh.insert_face(FaceId(fr.id), face);
    }
    mesh.update();
    mesh
}
