//! Builds an initial `EdgeMesh` from a boundary polygon and optional
//! hole polygons via constrained Delaunay triangulation.
//!
//! Grounded on `Jig::Triangulator` (`original_source/Jig/Triangulator.cpp`),
//! which drove `poly2tri`; no `poly2tri` binding exists for Rust, so
//! this uses `spade`'s `ConstrainedDelaunayTriangulation` instead, kept
//! constrained along every boundary/hole edge so the triangulation
//! never crosses them. Twins are paired the same way the original did:
//! a `(fromVert, toVert) -> edge` map, where inserting the reverse pair
//! of an already-seen directed edge links the two as twins.

use std::collections::HashMap;

use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint, Triangulation};

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::geom::{point_in_polygon_ray_test, pt, Polygon, Pt2};
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint<f64>>;

fn insert_point(cdt: &mut Cdt, p: Pt2) -> MeshResult<FixedVertexHandle> {
    cdt.insert(SpadePoint::new(p.x, p.y)).map_err(|e| MeshError::Degenerate(format!("triangulate: {:?}", e)))
}

fn constrain_loop(cdt: &mut Cdt, handles: &[FixedVertexHandle]) {
    let n = handles.len();
    for i in 0..n {
        if !cdt.add_constraint(handles[i], handles[(i + 1) % n]) {
            log::debug!("triangulate: boundary segment {}..{} already constrained", i, (i + 1) % n);
        }
    }
}

/// Triangulates `outer` (CCW) minus `holes` (each CW, per the rest of
/// the crate's convention) into a fresh, fully-twinned `EdgeMesh`.
pub fn triangulate(outer: &Polygon, holes: &[Polygon]) -> MeshResult<EdgeMesh> {
    if outer.points.len() < 3 {
        return Err(MeshError::Degenerate("triangulate: outer polygon needs at least 3 points".into()));
    }

    let mut cdt = Cdt::new();

    let outer_handles: Vec<FixedVertexHandle> = outer.points.iter().map(|&p| insert_point(&mut cdt, p)).collect::<MeshResult<_>>()?;
    constrain_loop(&mut cdt, &outer_handles);

    for hole in holes {
        if hole.points.len() < 3 {
            return Err(MeshError::Degenerate("triangulate: hole polygon needs at least 3 points".into()));
        }
        let handles: Vec<FixedVertexHandle> = hole.points.iter().map(|&p| insert_point(&mut cdt, p)).collect::<MeshResult<_>>()?;
        constrain_loop(&mut cdt, &handles);
    }

    let mut mesh = EdgeMesh::empty();
    let mut vert_for: HashMap<FixedVertexHandle, VertId> = HashMap::new();
    for v in cdt.vertices() {
        let p = v.position();
        let id = mesh.add_vert(pt(p.x, p.y));
        vert_for.insert(v.fix(), id);
    }

    let mut vert_pair_to_edge: HashMap<(VertId, VertId), EdgeId> = HashMap::new();
    let mut face_count = 0;

    for face in cdt.inner_faces() {
        let handles = face.vertices();
        let tri: Vec<Pt2> = handles.iter().map(|h| { let p = h.position(); pt(p.x, p.y) }).collect();
        let centroid = pt((tri[0].x + tri[1].x + tri[2].x) / 3.0, (tri[0].y + tri[1].y + tri[2].y) / 3.0);

        if !point_in_polygon_ray_test(centroid, &outer.points) {
            continue;
        }
        if holes.iter().any(|h| point_in_polygon_ray_test(centroid, &h.points)) {
            continue;
        }

        let mut mesh_verts: Vec<VertId> = handles.iter().map(|h| vert_for[&h.fix()]).collect();
        if crate::geom::turn_sign(tri[0], tri[1], tri[2]) < 0.0 {
            mesh_verts.reverse();
        }
        let face_id = FaceId(mesh.faces.slot_count());
        let base = mesh.edges.slot_count();
        let ids = [EdgeId(base), EdgeId(base + 1), EdgeId(base + 2)];
        for i in 0..3 {
            let prev = ids[(i + 2) % 3];
            let next = ids[(i + 1) % 3];
            mesh.push_edge(Edge { id: ids[i], vert: mesh_verts[i], face: face_id, prev, next, twin: None });
        }
        mesh.push_face(Face::new(face_id, ids[0], ids.to_vec()));
        face_count += 1;

        for i in 0..3 {
            let a = mesh_verts[i];
            let b = mesh_verts[(i + 1) % 3];
            let this_edge = ids[i];
            if let Some(twin) = vert_pair_to_edge.remove(&(b, a)) {
                mesh.edge_mut(this_edge).unwrap().twin = Some(twin);
                mesh.edge_mut(twin).unwrap().twin = Some(this_edge);
            } else {
                vert_pair_to_edge.insert((a, b), this_edge);
            }
        }
    }

    if face_count == 0 {
        return Err(MeshError::Degenerate("triangulate: no triangle fell inside the given boundary".into()));
    }

    mesh.update();
    log::debug!("triangulate: {} faces from {} boundary/hole verts", face_count, outer.points.len() + holes.iter().map(|h| h.points.len()).sum::<usize>());
    Ok(mesh)
}
