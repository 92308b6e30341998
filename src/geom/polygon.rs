//! Ordered vertex loops: closed `Polygon` and open `PolyLine`, with CW
//! test, self-intersection test, and bounding box.
//!
//! `PolyLine` additionally tracks a degeneracy flag refreshed by
//! `update()`: geometric degeneracy is surfaced to the caller as a flag
//! on the polyline rather than a panic.

use super::{cross2, Line2, Pt2, Rect};

pub type PointPair = (Pt2, Pt2);

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<Pt2>,
}

impl Polygon {
    pub fn new(points: Vec<Pt2>) -> Self {
        Polygon { points }
    }

    pub fn edges(&self) -> impl Iterator<Item = PointPair> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn bbox(&self) -> Option<Rect> {
        Rect::from_points(self.points.iter().copied())
    }

    /// Signed area, positive for CCW loops (shoelace formula).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }

    pub fn is_cw(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn contains_point(&self, p: Pt2) -> bool {
        super::point_in_polygon_ray_test(p, &self.points)
    }

    /// O(n^2) self-intersection test over non-adjacent edges.
    pub fn is_self_intersecting(&self) -> bool {
        let edges: Vec<PointPair> = self.edges().collect();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue; // adjacent edges share a vertex, not an intersection
                }
                let (a0, a1) = edges[i];
                let (b0, b1) = edges[j];
                if Line2::new(a0, a1).intersect(&Line2::new(b0, b1)).is_some() {
                    return true;
                }
            }
        }
        false
    }
}

/// An open, ordered chain of points -- the "interior polyline" passed to
/// `SplitFace`/`AddOuterFace` commands to thread new verts between two
/// existing edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyLine {
    pub points: Vec<Pt2>,
    self_intersecting: bool,
}

impl PolyLine {
    pub fn new(points: Vec<Pt2>) -> Self {
        let mut p = PolyLine { points, self_intersecting: false };
        p.update();
        p
    }

    pub fn push(&mut self, p: Pt2) {
        self.points.push(p);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recomputes the self-intersection flag. Must be called (or the
    /// constructor used) before a command consults `is_self_intersecting`.
    pub fn update(&mut self) {
        self.self_intersecting = self.compute_self_intersecting();
    }

    pub fn is_self_intersecting(&self) -> bool {
        self.self_intersecting
    }

    fn compute_self_intersecting(&self) -> bool {
        let n = self.points.len();
        if n < 4 {
            return false;
        }
        for i in 0..n - 1 {
            for j in (i + 1)..n - 1 {
                if j == i + 1 {
                    continue;
                }
                let a = Line2::new(self.points[i], self.points[i + 1]);
                let b = Line2::new(self.points[j], self.points[j + 1]);
                if a.intersect(&b).is_some() {
                    return true;
                }
            }
        }
        false
    }

    pub fn point_pairs(&self) -> impl Iterator<Item = PointPair> + '_ {
        let n = self.points.len();
        (0..n.saturating_sub(1)).map(move |i| (self.points[i], self.points[i + 1]))
    }

    pub fn length(&self) -> f64 {
        self.point_pairs().map(|(a, b)| Line2::new(a, b).length()).sum()
    }
}

/// CCW-signed turn at `b` given the incoming/outgoing legs `a->b->c`.
/// Positive means convex (left turn) under the "walking `next` keeps the
/// face on the left" convention.
pub fn turn_sign(a: Pt2, b: Pt2, c: Pt2) -> f64 {
    cross2(b - a, c - b)
}
