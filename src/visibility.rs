//! Per-point visibility over a convex-decomposed mesh.
//!
//! Grounded on `Jig::GetVisiblePoints`/`Jig::IsVisible`
//! (`original_source/Jig/GetVisiblePoints.cpp`): a point's visible set is
//! built by walking outward from its containing face through twin
//! links, narrowing an angular cone at each crossing so that only the
//! portion of a neighbouring face actually visible through the shared
//! edge contributes further vertices. The original recurses face to
//! face; here the walk is an explicit stack of `(face, entering edge,
//! cone)` frames, since the mesh has no bound on decomposition depth.

use std::collections::{HashMap, HashSet};

use crate::geom::{signed_angle, try_normalise, Pt2, Vec2, EPSILON};
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;

/// An angular window swept counterclockwise from `lo` to `hi`, assumed
/// never to exceed a half turn -- true of any edge's span as seen from
/// a point inside the convex face that owns it.
#[derive(Clone, Copy)]
struct Window {
    lo: Vec2,
    hi: Vec2,
    sweep: f64,
}

impl Window {
    fn from_bearings(b0: Vec2, b1: Vec2) -> Self {
        let angle = signed_angle(b0, b1);
        if angle >= 0.0 {
            Window { lo: b0, hi: b1, sweep: angle }
        } else {
            Window { lo: b1, hi: b0, sweep: -angle }
        }
    }

    fn contains(&self, b: Vec2) -> bool {
        let a = signed_angle(self.lo, b);
        a >= -EPSILON && a <= self.sweep + EPSILON
    }

    /// Narrows `self` to the part also covered by `other`, or `None` if
    /// they don't overlap.
    fn intersect(&self, other: &Window) -> Option<Window> {
        let lo_off = signed_angle(self.lo, other.lo).max(0.0);
        let hi_off = signed_angle(self.lo, other.hi).min(self.sweep);
        if lo_off > hi_off + EPSILON {
            return None;
        }
        Some(Window { lo: rotate(self.lo, lo_off), hi: rotate(self.lo, hi_off), sweep: hi_off - lo_off })
    }
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    crate::geom::vec2(v.x * c - v.y * s, v.x * s + v.y * c)
}

struct Frame {
    face: FaceId,
    entering: Option<EdgeId>,
    window: Option<Window>,
}

/// `GetVisiblePoints(point)`: every vert reachable in a straight,
/// unobstructed line from `point`, starting from the face that contains
/// it.
pub fn get_visible_points(mesh: &EdgeMesh, point: Pt2) -> Vec<VertId> {
    let start_face = match mesh.hit_test(point) {
        Some(f) => f,
        None => return Vec::new(),
    };

    let mut visible: HashSet<VertId> = HashSet::new();
    let mut crossed: HashSet<EdgeId> = HashSet::new();
    let mut stack = vec![Frame { face: start_face, entering: None, window: None }];

    while let Some(frame) = stack.pop() {
        let edges = match mesh.face(frame.face) {
            Some(f) => f.edges.clone(),
            None => continue,
        };
        for e in edges {
            if Some(e) == frame.entering {
                continue;
            }
            let edge = *mesh.edge(e).unwrap();
            let v0 = edge.vert;
            let v1 = mesh.edge(edge.next).unwrap().vert;
            let p0 = mesh.vert(v0).unwrap().pos;
            let p1 = mesh.vert(v1).unwrap().pos;

            let (b0, b1) = match (try_normalise(p0 - point), try_normalise(p1 - point)) {
                (Some(a), Some(b)) => (a, b),
                // `point` coincides with one endpoint: that vert is
                // trivially visible, but there's no cone to narrow
                // through this edge.
                (None, Some(_)) => {
                    visible.insert(v0);
                    continue;
                }
                (Some(_), None) => {
                    visible.insert(v1);
                    continue;
                }
                (None, None) => continue,
            };

            let edge_window = Window::from_bearings(b0, b1);
            let effective = match &frame.window {
                None => edge_window,
                Some(w) => match edge_window.intersect(w) {
                    Some(w) => w,
                    None => continue,
                },
            };

            if frame.window.is_none() || effective.contains(b0) {
                visible.insert(v0);
            }
            if frame.window.is_none() || effective.contains(b1) {
                visible.insert(v1);
            }

            if let Some(twin) = edge.twin {
                if !crossed.contains(&e) {
                    crossed.insert(e);
                    crossed.insert(twin);
                    let twin_face = mesh.edge(twin).unwrap().face;
                    stack.push(Frame { face: twin_face, entering: Some(twin), window: Some(effective) });
                }
            }
        }
    }

    visible.into_iter().collect()
}

/// `IsVisible(p0, p1)`: true if the straight segment from `p0` to `p1`
/// never leaves the mesh. Walks face to face from `p0`'s containing
/// face, crossing an edge whenever its span (as seen from `p0`)
/// contains the bearing toward `p1`, until the face containing `p1` is
/// reached or no further edge admits the target bearing.
pub fn is_visible(mesh: &EdgeMesh, p0: Pt2, p1: Pt2) -> bool {
    let target = match try_normalise(p1 - p0) {
        Some(t) => t,
        None => return true,
    };
    let mut face = match mesh.hit_test(p0) {
        Some(f) => f,
        None => return false,
    };
    let dest_face = match mesh.hit_test(p1) {
        Some(f) => f,
        None => return false,
    };
    if face == dest_face {
        return true;
    }

    let mut visited: HashSet<FaceId> = HashSet::new();
    loop {
        if face == dest_face {
            return true;
        }
        if !visited.insert(face) {
            return false;
        }
        let edges = mesh.face(face).unwrap().edges.clone();
        let mut advanced = false;
        for e in edges {
            let edge = *mesh.edge(e).unwrap();
            let twin = match edge.twin {
                Some(t) => t,
                None => continue,
            };
            let pa = mesh.vert(edge.vert).unwrap().pos;
            let pb = mesh.vert(mesh.edge(edge.next).unwrap().vert).unwrap().pos;
            let (ba, bb) = match (try_normalise(pa - p0), try_normalise(pb - p0)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            if Window::from_bearings(ba, bb).contains(target) {
                face = mesh.edge(twin).unwrap().face;
                advanced = true;
                break;
            }
        }
        if !advanced {
            return false;
        }
    }
}

/// Per-vert visible-set cache (`Jig::EdgeMeshVisibility`). Recomputed
/// wholesale after a batch of mesh edits; kept outside `Vert`'s payload
/// since it's derived data, not part of the vert's own identity.
#[derive(Default)]
pub struct EdgeMeshVisibility {
    visible: HashMap<VertId, Vec<VertId>>,
}

impl EdgeMeshVisibility {
    pub fn new() -> Self {
        EdgeMeshVisibility { visible: HashMap::new() }
    }

    pub fn update(&mut self, mesh: &EdgeMesh) {
        self.visible.clear();
        for (id, vert) in mesh.verts() {
            let vis: Vec<VertId> = get_visible_points(mesh, vert.pos).into_iter().filter(|&v| v != id).collect();
            self.visible.insert(id, vis);
        }
        log::debug!("EdgeMeshVisibility::update: {} verts", self.visible.len());
    }

    pub fn visible_from(&self, vert: VertId) -> &[VertId] {
        self.visible.get(&vert).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::face::Face;
    use crate::geom::pt;
    use crate::ids::FaceId;
    use crate::shape_splitter::convexify;

    /// Two triangles sharing the diagonal of a unit square (convex as a
    /// whole): every vert should see every other vert.
    fn square_mesh() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let v00 = mesh.add_vert(pt(0.0, 0.0));
        let v10 = mesh.add_vert(pt(10.0, 0.0));
        let v11 = mesh.add_vert(pt(10.0, 10.0));
        let v01 = mesh.add_vert(pt(0.0, 10.0));

        let a0 = EdgeId(0);
        let a1 = EdgeId(1);
        let a2 = EdgeId(2);
        mesh.push_edge(Edge { id: a0, vert: v00, face: FaceId(0), prev: a2, next: a1, twin: None });
        mesh.push_edge(Edge { id: a1, vert: v10, face: FaceId(0), prev: a0, next: a2, twin: None });
        mesh.push_edge(Edge { id: a2, vert: v11, face: FaceId(0), prev: a1, next: a0, twin: Some(EdgeId(3)) });
        mesh.push_face(Face::new(FaceId(0), a0, vec![a0, a1, a2]));

        let b0 = EdgeId(3);
        let b1 = EdgeId(4);
        let b2 = EdgeId(5);
        mesh.push_edge(Edge { id: b0, vert: v00, face: FaceId(1), prev: b2, next: b1, twin: Some(a2) });
        mesh.push_edge(Edge { id: b1, vert: v11, face: FaceId(1), prev: b0, next: b2, twin: None });
        mesh.push_edge(Edge { id: b2, vert: v01, face: FaceId(1), prev: b1, next: b0, twin: None });
        mesh.push_face(Face::new(FaceId(1), b0, vec![b0, b1, b2]));

        mesh.update();
        mesh
    }

    fn l_shape_mesh() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let pts = [pt(0.0, 0.0), pt(20.0, 0.0), pt(20.0, 10.0), pt(10.0, 10.0), pt(10.0, 20.0), pt(0.0, 20.0)];
        let verts: Vec<_> = pts.iter().map(|&p| mesh.add_vert(p)).collect();
        let n = verts.len();
        let ids: Vec<EdgeId> = (0..n).map(EdgeId).collect();
        for i in 0..n {
            let prev = ids[(i + n - 1) % n];
            let next = ids[(i + 1) % n];
            mesh.push_edge(Edge { id: ids[i], vert: verts[i], face: FaceId(0), prev, next, twin: None });
        }
        mesh.push_face(Face::new(FaceId(0), ids[0], ids.clone()));
        mesh.update();
        convexify(&mut mesh, FaceId(0)).unwrap();
        mesh.update();
        mesh
    }

    #[test]
    fn square_is_fully_visible_from_the_centre() {
        let mesh = square_mesh();
        let visible = get_visible_points(&mesh, pt(5.0, 5.0));
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn is_visible_true_across_the_diagonal_of_a_convex_square() {
        let mesh = square_mesh();
        assert!(is_visible(&mesh, pt(1.0, 1.0), pt(9.0, 9.0)));
    }

    #[test]
    fn is_visible_false_through_the_l_shapes_concave_notch() {
        let mesh = l_shape_mesh();
        assert!(!is_visible(&mesh, pt(19.0, 9.0), pt(9.0, 19.0)));
        assert!(is_visible(&mesh, pt(5.0, 5.0), pt(15.0, 2.0)));
    }

    #[test]
    fn visibility_cache_excludes_self() {
        let mesh = square_mesh();
        let mut cache = EdgeMeshVisibility::new();
        cache.update(&mesh);
        let v00 = mesh.verts().find(|(_, v)| v.pos == pt(0.0, 0.0)).unwrap().0;
        assert!(!cache.visible_from(v00).contains(&v00));
        assert_eq!(cache.visible_from(v00).len(), 3);
    }
}
