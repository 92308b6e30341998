//! Axis-aligned rectangles. Grounded on `Jig::Rect`.

use super::Pt2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub p0: Pt2,
    pub p1: Pt2,
}

impl Rect {
    pub fn new(p0: Pt2, p1: Pt2) -> Self {
        let mut r = Rect { p0, p1 };
        r.normalise();
        r
    }

    pub fn from_points<I: IntoIterator<Item = Pt2>>(points: I) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut r = Rect::new(first, first);
        for p in iter {
            r.grow_to_include(p);
        }
        Some(r)
    }

    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    pub fn centre(&self) -> Pt2 {
        cgmath::EuclideanSpace::midpoint(self.p0, self.p1)
    }

    pub fn contains(&self, point: Pt2) -> bool {
        point.x >= self.p0.x && point.x <= self.p1.x && point.y >= self.p0.y && point.y <= self.p1.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.p0.x <= other.p1.x && self.p1.x >= other.p0.x && self.p0.y <= other.p1.y && self.p1.y >= other.p0.y
    }

    pub fn normalise(&mut self) {
        if self.p0.x > self.p1.x {
            std::mem::swap(&mut self.p0.x, &mut self.p1.x);
        }
        if self.p0.y > self.p1.y {
            std::mem::swap(&mut self.p0.y, &mut self.p1.y);
        }
    }

    pub fn grow_to_include(&mut self, point: Pt2) {
        self.p0.x = self.p0.x.min(point.x);
        self.p0.y = self.p0.y.min(point.y);
        self.p1.x = self.p1.x.max(point.x);
        self.p1.y = self.p1.y.max(point.y);
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let mut r = *self;
        r.grow_to_include(other.p0);
        r.grow_to_include(other.p1);
        r
    }
}
