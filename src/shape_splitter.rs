//! Convex decomposition and hole attachment.
//!
//! Grounded on `Jig::ShapeSplitter` (`original_source/Jig/ShapeSplitter.cpp`):
//! `DeviantAngleFinder` computes the interior bisector and angular range
//! at a concave corner; `Convexify` repeatedly splits concave corners
//! until none remain; `AddHole` bridges a detached hole face into its
//! container before convexifying the result.

use crate::edge::Edge;
use crate::error::MeshResult;
use crate::geom::{signed_angle, turn_sign, Line2};
use crate::ids::{EdgeId, FaceId};
use crate::mesh::EdgeMesh;

/// Interior bisector and admissible bearing range at a concave corner,
/// mirroring `Jig::DeviantAngleFinder`.
struct DeviantAngleFinder {
    bisector: crate::geom::Vec2,
    from_prev: f64,
    from_next: f64,
}

impl DeviantAngleFinder {
    fn at(mesh: &EdgeMesh, corner_edge: EdgeId) -> Option<Self> {
        let e = mesh.edge(corner_edge)?;
        let prev = mesh.edge(e.prev)?;
        let pivot = mesh.vert(e.vert)?.pos;
        let from = mesh.vert(prev.vert)?.pos;
        let to = mesh.vert(mesh.edge(e.next)?.vert)?.pos;

        let in_dir = crate::geom::try_normalise(pivot - from)?;
        let out_dir = crate::geom::try_normalise(to - pivot)?;
        // Reflex interior bisector: average of the incoming direction and
        // the reversed outgoing direction, pointing into the face.
        let bisector = crate::geom::try_normalise(in_dir - out_dir)?;

        let from_prev = signed_angle(bisector, -in_dir).abs();
        let from_next = signed_angle(bisector, out_dir).abs();

        Some(DeviantAngleFinder { bisector, from_prev, from_next })
    }

    /// True when the bearing from the corner to a candidate target falls
    /// within the admissible cone around the bisector.
    fn admits(&self, bearing: crate::geom::Vec2) -> bool {
        let dev = signed_angle(self.bisector, bearing);
        -self.from_prev - crate::geom::EPSILON <= dev && dev <= self.from_next + crate::geom::EPSILON
    }

    fn deviation(&self, bearing: crate::geom::Vec2) -> f64 {
        signed_angle(self.bisector, bearing).abs()
    }
}

/// Whether the straight segment from `a.vert` to `b.vert` lies interior
/// to `face` -- no other face edge intersects it (`CanConnect`).
fn can_connect(mesh: &EdgeMesh, face: FaceId, a: EdgeId, b: EdgeId) -> bool {
    let p0 = mesh.vert(mesh.edge(a).unwrap().vert).unwrap().pos;
    let p1 = mesh.vert(mesh.edge(b).unwrap().vert).unwrap().pos;
    let candidate = Line2::new(p0, p1);

    let f = mesh.face(face).unwrap();
    for &e in &f.edges {
        if e == a || e == b {
            continue;
        }
        let edge = mesh.edge(e).unwrap();
        // Skip edges adjacent to either endpoint -- they share a vertex,
        // not a proper crossing.
        if edge.vert == mesh.edge(a).unwrap().vert || edge.vert == mesh.edge(b).unwrap().vert {
            continue;
        }
        let next_vert = mesh.edge(edge.next).unwrap().vert;
        if next_vert == mesh.edge(a).unwrap().vert || next_vert == mesh.edge(b).unwrap().vert {
            continue;
        }
        let seg = Line2::new(mesh.vert(edge.vert).unwrap().pos, mesh.vert(next_vert).unwrap().pos);
        if candidate.intersect(&seg).is_some() {
            return false;
        }
    }
    true
}

/// Finds the best bridge target for the concave corner at `corner_edge`:
/// a non-adjacent edge of `face` whose origin lies in the deviation cone
/// and minimises deviation from the bisector, subject to `can_connect`.
fn find_bridge_target(mesh: &EdgeMesh, face: FaceId, corner_edge: EdgeId) -> Option<EdgeId> {
    let finder = DeviantAngleFinder::at(mesh, corner_edge)?;
    let pivot_edge = mesh.edge(corner_edge)?;
    let pivot = mesh.vert(pivot_edge.vert)?.pos;

    let f = mesh.face(face)?;
    let mut best: Option<(EdgeId, f64)> = None;
    for &cand in &f.edges {
        if cand == corner_edge || cand == pivot_edge.prev || cand == pivot_edge.next {
            continue;
        }
        let cand_vert = mesh.edge(cand)?.vert;
        let target = mesh.vert(cand_vert)?.pos;
        let bearing = match crate::geom::try_normalise(target - pivot) {
            Some(b) => b,
            None => continue,
        };
        if !finder.admits(bearing) {
            continue;
        }
        if !can_connect(mesh, face, corner_edge, cand) {
            continue;
        }
        let dev = finder.deviation(bearing);
        if best.map_or(true, |(_, d)| dev < d) {
            best = Some((cand, dev));
        }
    }
    best.map(|(e, _)| e)
}

fn interior_angle_sign(mesh: &EdgeMesh, corner_edge: EdgeId) -> f64 {
    let e = mesh.edge(corner_edge).unwrap();
    let prev = mesh.edge(e.prev).unwrap();
    let a = mesh.vert(prev.vert).unwrap().pos;
    let b = mesh.vert(e.vert).unwrap().pos;
    let c = mesh.vert(mesh.edge(e.next).unwrap().vert).unwrap().pos;
    turn_sign(a, b, c)
}

/// Reduces `face` to convex pieces by repeated splitting.
/// Leaves the face concave (returns `Ok(())` without further splitting)
/// if no valid bridge exists from some concave corner, matching the
/// "abort for that face" design choice.
pub fn convexify(mesh: &mut EdgeMesh, face: FaceId) -> MeshResult<()> {
    let mut stack = vec![face];
    while let Some(f) = stack.pop() {
        let edges = mesh.face(f).unwrap().edges.clone();
        if edges.len() < 4 {
            continue;
        }
        let concave = edges.iter().copied().find(|&e| interior_angle_sign(mesh, e) < -crate::geom::EPSILON);
        let corner = match concave {
            Some(c) => c,
            None => continue, // already convex
        };
        match find_bridge_target(mesh, f, corner) {
            Some(target) => {
                let new_face = mesh.split_face(f, corner, target)?;
                stack.push(f);
                stack.push(new_face);
            }
            None => {
                log::debug!("convexify: no valid bridge from corner {:?} in {:?}, leaving concave", corner, f);
            }
        }
    }
    Ok(())
}

/// Bridges a detached, CCW hole face into its containing face, then
/// convexifies the result (`AddHole`). Picks the pair `(e in outer, h in
/// hole)` minimising the summed bisector deviation at both ends subject
/// to `can_connect` on both sides.
pub fn add_hole(mesh: &mut EdgeMesh, outer_face: FaceId, hole_face: FaceId) -> MeshResult<()> {
    let outer_edges = mesh.face(outer_face).unwrap().edges.clone();
    let hole_edges = mesh.face(hole_face).unwrap().edges.clone();

    let mut best: Option<(EdgeId, EdgeId, f64)> = None;
    for &oe in &outer_edges {
        let o_pivot = mesh.vert(mesh.edge(oe).unwrap().vert).unwrap().pos;
        let o_finder = match DeviantAngleFinder::at(mesh, oe) {
            Some(f) => f,
            None => continue,
        };
        for &he in &hole_edges {
            let h_pivot = mesh.vert(mesh.edge(he).unwrap().vert).unwrap().pos;
            let bearing_o_to_h = match crate::geom::try_normalise(h_pivot - o_pivot) {
                Some(b) => b,
                None => continue,
            };
            let h_finder = match DeviantAngleFinder::at(mesh, he) {
                Some(f) => f,
                None => continue,
            };
            let bearing_h_to_o = match crate::geom::try_normalise(o_pivot - h_pivot) {
                Some(b) => b,
                None => continue,
            };
            if !o_finder.admits(bearing_o_to_h) || !h_finder.admits(bearing_h_to_o) {
                continue;
            }
            let dev = o_finder.deviation(bearing_o_to_h) + h_finder.deviation(bearing_h_to_o);
            if best.map_or(true, |(_, _, d)| dev < d) {
                best = Some((oe, he, dev));
            }
        }
    }

    let (oe, he, _) = best.ok_or_else(|| crate::error::MeshError::Precondition("add_hole: no admissible bridge pair found".into()))?;
    mesh.bridge_faces(outer_face, oe, hole_face, he)?;
    convexify(mesh, outer_face)
}
