//! Bounded quadtree keyed by face bounding boxes.
//!
//! Grounded on `Jig::QuadTree` (`original_source/Jig/QuadTree.h`): a
//! node owns up to four children, one per quadrant around its centre,
//! created on demand; a face is stored at the shallowest node whose
//! quadrant fully contains its bbox, and `HitTest` searches children
//! before testing items at the current level.

use crate::geom::{Pt2, Rect};
use crate::ids::FaceId;
use crate::mesh::EdgeMesh;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

const CORNERS: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Se, Corner::Sw];

struct Node {
    bbox: Rect,
    items: Vec<(FaceId, Rect)>,
    children: [Option<Box<Node>>; 4],
}

impl Node {
    fn new(bbox: Rect) -> Self {
        Node { bbox, items: Vec::new(), children: [None, None, None, None] }
    }

    fn quadrant_bbox(&self, corner: Corner) -> Rect {
        let c = self.bbox.centre();
        match corner {
            Corner::Nw => Rect::new(crate::geom::pt(self.bbox.p0.x, c.y), crate::geom::pt(c.x, self.bbox.p1.y)),
            Corner::Ne => Rect::new(c, self.bbox.p1),
            Corner::Se => Rect::new(crate::geom::pt(c.x, self.bbox.p0.y), crate::geom::pt(self.bbox.p1.x, c.y)),
            Corner::Sw => Rect::new(self.bbox.p0, c),
        }
    }

    fn corner_index(corner: Corner) -> usize {
        match corner {
            Corner::Nw => 0,
            Corner::Ne => 1,
            Corner::Se => 2,
            Corner::Sw => 3,
        }
    }

    fn insert(&mut self, face: FaceId, r: Rect, min_size: f64) {
        if self.bbox.width() > min_size && self.bbox.height() > min_size {
            for corner in CORNERS {
                let qb = self.quadrant_bbox(corner);
                if qb.contains(r.p0) && qb.contains(r.p1) {
                    let idx = Self::corner_index(corner);
                    let child = self.children[idx].get_or_insert_with(|| Box::new(Node::new(qb)));
                    child.insert(face, r, min_size);
                    return;
                }
            }
        }
        self.items.push((face, r));
    }

    fn hit_test(&self, mesh: &EdgeMesh, point: Pt2) -> Option<FaceId> {
        if !self.bbox.contains(point) {
            return None;
        }
        for child in self.children.iter().flatten() {
            if let Some(f) = child.hit_test(mesh, point) {
                return Some(f);
            }
        }
        for &(face, bbox) in &self.items {
            if bbox.contains(point) {
                if let Some(f) = mesh.face(face) {
                    let poly_points = mesh.point_loop(f.edge);
                    if crate::geom::point_in_polygon_ray_test(point, &poly_points) {
                        return Some(face);
                    }
                }
            }
        }
        None
    }
}

pub struct QuadTree {
    root: Option<Node>,
}

impl QuadTree {
    pub fn empty() -> Self {
        QuadTree { root: None }
    }

    /// Rebuilt wholesale by `EdgeMesh::update`.
    pub fn build(mesh: &EdgeMesh, bbox: Option<Rect>) -> Self {
        let bbox = match bbox {
            Some(b) => b,
            None => return QuadTree::empty(),
        };
        let min_size = (bbox.width().max(bbox.height()) / 64.0).max(crate::geom::EPSILON);
        let mut root = Node::new(bbox);
        for (id, face) in mesh.faces() {
            if let Some(r) = face.bbox {
                root.insert(id, r, min_size);
            }
        }
        QuadTree { root: Some(root) }
    }

    pub fn hit_test(&self, mesh: &EdgeMesh, point: Pt2) -> Option<FaceId> {
        self.root.as_ref().and_then(|r| r.hit_test(mesh, point))
    }
}
