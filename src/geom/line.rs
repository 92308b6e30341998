//! Finite line segments: intersection and perpendicular distance.
//! Grounded on `Jig::Line2` (original_source/Jig/Line2.h): a finite
//! segment tested against another as infinite lines, clipped to both
//! segments' parameter ranges.

use super::{try_normalise, Pt2, Vec2, EPSILON};
use cgmath::{InnerSpace, MetricSpace};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2 {
    pub p0: Pt2,
    pub p1: Pt2,
}

impl Line2 {
    pub fn new(p0: Pt2, p1: Pt2) -> Self {
        Line2 { p0, p1 }
    }

    pub fn vector(&self) -> Vec2 {
        self.p1 - self.p0
    }

    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }

    /// Intersection of the two segments as *finite* segments: returns the
    /// point only if it falls within both `[0, 1]` parameter ranges.
    pub fn intersect(&self, other: &Line2) -> Option<Pt2> {
        let p = self.p0;
        let r = self.vector();
        let q = other.p0;
        let s = other.vector();

        let rxs = super::cross2(r, s);
        if rxs.abs() < EPSILON {
            return None; // Parallel or collinear -- no robust intersection (non-goal).
        }

        let qp = q - p;
        let t = super::cross2(qp, s) / rxs;
        let u = super::cross2(qp, r) / rxs;

        if t >= -EPSILON && t <= 1.0 + EPSILON && u >= -EPSILON && u <= 1.0 + EPSILON {
            Some(p + r * t)
        } else {
            None
        }
    }

    /// Perpendicular distance from `point` to the line. When `finite` is
    /// true, the segment's endpoints bound the projection (clamped), so
    /// points beyond either end measure straight-line distance to that
    /// endpoint instead of to the infinite line.
    pub fn distance_to(&self, point: Pt2, finite: bool) -> f64 {
        let seg = self.vector();
        let len2 = seg.magnitude2();
        if len2 < EPSILON * EPSILON {
            return self.p0.distance(point);
        }
        let t = (point - self.p0).dot(seg) / len2;
        let t_clamped = if finite { t.max(0.0).min(1.0) } else { t };
        let closest = self.p0 + seg * t_clamped;
        closest.distance(point)
    }

    pub fn perp_bisector(&self) -> Line2 {
        let mid = cgmath::EuclideanSpace::midpoint(self.p0, self.p1);
        let dir = self.vector();
        let perp = super::vec2(-dir.y, dir.x);
        Line2::new(mid - perp * 0.5, mid + perp * 0.5)
    }

    pub fn direction(&self) -> Option<Vec2> {
        try_normalise(self.vector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::pt;

    #[test]
    fn crossing_segments_intersect_at_centre() {
        let a = Line2::new(pt(0.0, 0.0), pt(10.0, 10.0));
        let b = Line2::new(pt(0.0, 10.0), pt(10.0, 0.0));
        let p = a.intersect(&b).unwrap();
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!((p.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn non_crossing_segments_do_not_intersect() {
        let a = Line2::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let b = Line2::new(pt(0.0, 5.0), pt(1.0, 5.0));
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = Line2::new(pt(0.0, 0.0), pt(10.0, 0.0));
        let b = Line2::new(pt(0.0, 1.0), pt(10.0, 1.0));
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn distance_to_finite_clamps_to_endpoint() {
        let l = Line2::new(pt(0.0, 0.0), pt(10.0, 0.0));
        let d = l.distance_to(pt(15.0, 0.0), true);
        assert!((d - 5.0).abs() < 1e-9);
        let d_inf = l.distance_to(pt(15.0, 0.0), false);
        assert!((d_inf - 0.0).abs() < 1e-9);
    }
}
