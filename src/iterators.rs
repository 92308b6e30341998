//! Lazy topological iterators over the half-edge structure.
//!
//! The teacher's `iterators.rs` walked `Rc<RefCell<Edge>>` pointers
//! directly; these walk `EdgeId`s against a borrowed `&EdgeMesh`, since
//! the arena model has nothing for a standalone edge to hold a live
//! reference to. `EdgeMesh::edge_loop`/`outer_edge_loop`/`shared_edges`
//! collect these into `Vec`s for callers that want a snapshot; use the
//! iterators directly to stop early or avoid the allocation.

use crate::geom::Pt2;
use crate::ids::EdgeId;
use crate::mesh::EdgeMesh;

/// `EdgeLoop(start)`: steps `e <- e.next`, stopping once back at `start`.
pub struct EdgeLoop<'a> {
    mesh: &'a EdgeMesh,
    start: EdgeId,
    next: Option<EdgeId>,
}

impl<'a> EdgeLoop<'a> {
    pub fn new(mesh: &'a EdgeMesh, start: EdgeId) -> Self {
        EdgeLoop { mesh, start, next: Some(start) }
    }
}

impl<'a> Iterator for EdgeLoop<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let cur = self.next?;
        let advance = self.mesh.edge(cur)?.next;
        self.next = if advance == self.start { None } else { Some(advance) };
        Some(cur)
    }
}

/// `OuterEdgeLoop(start)`: advances to the next outer edge by rotating
/// through twins around the far vert until a twin-less edge turns up.
pub struct OuterEdgeLoop<'a> {
    mesh: &'a EdgeMesh,
    start: EdgeId,
    next: Option<EdgeId>,
}

impl<'a> OuterEdgeLoop<'a> {
    pub fn new(mesh: &'a EdgeMesh, start: EdgeId) -> Self {
        OuterEdgeLoop { mesh, start, next: Some(start) }
    }

    fn step(&self, from: EdgeId) -> EdgeId {
        let mut cur = self.mesh.edge(from).expect("OuterEdgeLoop: missing edge").next;
        loop {
            let e = self.mesh.edge(cur).expect("OuterEdgeLoop: broken chain");
            match e.twin {
                None => return cur,
                Some(twin) => cur = self.mesh.edge(twin).expect("OuterEdgeLoop: broken twin").next,
            }
        }
    }
}

impl<'a> Iterator for OuterEdgeLoop<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let cur = self.next?;
        let advance = self.step(cur);
        self.next = if advance == self.start { None } else { Some(advance) };
        Some(cur)
    }
}

/// `SharedEdges(e)`: CW fan of half-edges sharing `e.vert`, stepping
/// `e <- e.prev.twin` until cycled back to `start` or a twin-less
/// boundary halts the fan.
pub struct SharedEdges<'a> {
    mesh: &'a EdgeMesh,
    start: EdgeId,
    next: Option<EdgeId>,
}

impl<'a> SharedEdges<'a> {
    pub fn new(mesh: &'a EdgeMesh, start: EdgeId) -> Self {
        SharedEdges { mesh, start, next: Some(start) }
    }
}

impl<'a> Iterator for SharedEdges<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let cur = self.next?;
        let e = self.mesh.edge(cur)?;
        let prev = self.mesh.edge(e.prev)?;
        self.next = match prev.twin {
            None => None,
            Some(twin) if twin == self.start => None,
            Some(twin) => Some(twin),
        };
        Some(cur)
    }
}

/// Maps an `EdgeId` sequence onto the line segment `(origin, next.origin)`.
pub fn line_loop<'a, I: Iterator<Item = EdgeId> + 'a>(mesh: &'a EdgeMesh, edges: I) -> impl Iterator<Item = (Pt2, Pt2)> + 'a {
    edges.map(move |e| {
        let edge = mesh.edge(e).unwrap();
        let next = mesh.edge(edge.next).unwrap();
        (mesh.vert(edge.vert).unwrap().pos, mesh.vert(next.vert).unwrap().pos)
    })
}

/// Maps an `EdgeId` sequence onto each edge's origin point.
pub fn point_loop<'a, I: Iterator<Item = EdgeId> + 'a>(mesh: &'a EdgeMesh, edges: I) -> impl Iterator<Item = Pt2> + 'a {
    edges.map(move |e| mesh.vert(mesh.edge(e).unwrap().vert).unwrap().pos)
}

/// Maps an `EdgeId` sequence onto `(origin, next.origin)` vert-id pairs.
pub fn point_pair_loop<'a, I: Iterator<Item = EdgeId> + 'a>(mesh: &'a EdgeMesh, edges: I) -> impl Iterator<Item = (crate::ids::VertId, crate::ids::VertId)> + 'a {
    edges.map(move |e| {
        let edge = mesh.edge(e).unwrap();
        let next = mesh.edge(edge.next).unwrap();
        (edge.vert, next.vert)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::face::Face;
    use crate::geom::pt;
    use crate::ids::FaceId;

    fn triangle_mesh() -> EdgeMesh {
        let mut mesh = EdgeMesh::empty();
        let v0 = mesh.add_vert(pt(0.0, 0.0));
        let v1 = mesh.add_vert(pt(1.0, 0.0));
        let v2 = mesh.add_vert(pt(0.0, 1.0));
        let e0 = EdgeId(0);
        let e1 = EdgeId(1);
        let e2 = EdgeId(2);
        mesh.push_edge(Edge { id: e0, vert: v0, face: FaceId(0), prev: e2, next: e1, twin: None });
        mesh.push_edge(Edge { id: e1, vert: v1, face: FaceId(0), prev: e0, next: e2, twin: None });
        mesh.push_edge(Edge { id: e2, vert: v2, face: FaceId(0), prev: e1, next: e0, twin: None });
        mesh.push_face(Face::new(FaceId(0), e0, vec![e0, e1, e2]));
        mesh
    }

    #[test]
    fn edge_loop_visits_three_edges_once() {
        let mesh = triangle_mesh();
        let visited: Vec<EdgeId> = EdgeLoop::new(&mesh, EdgeId(0)).collect();
        assert_eq!(visited, vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
    }

    #[test]
    fn shared_edges_of_isolated_triangle_is_just_itself() {
        let mesh = triangle_mesh();
        let visited: Vec<EdgeId> = SharedEdges::new(&mesh, EdgeId(0)).collect();
        assert_eq!(visited, vec![EdgeId(0)]);
    }

    #[test]
    fn point_loop_yields_triangle_corners() {
        let mesh = triangle_mesh();
        let pts: Vec<Pt2> = point_loop(&mesh, EdgeLoop::new(&mesh, EdgeId(0))).collect();
        assert_eq!(pts, vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 1.0)]);
    }
}
