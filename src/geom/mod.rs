//! 2D geometric primitives: vectors, finite line segments, rectangles,
//! and point/ordered-vertex-loop utilities.
//!
//! Built on `cgmath`'s `Vector2`/`Point2`, the same crate the teacher
//! library used for its 3D points -- here narrowed to two dimensions.

mod line;
mod polygon;
mod rect;

pub use self::line::Line2;
pub use self::polygon::{turn_sign, PointPair, PolyLine, Polygon};
pub use self::rect::Rect;

use cgmath::{InnerSpace, Point2, Vector2};

/// 2D position / displacement vector.
pub type Vec2 = Vector2<f64>;
/// 2D point, used where "this is a location, not a direction" matters.
pub type Pt2 = Point2<f64>;

/// Tolerance used throughout the core for zero-length checks, coincidence
/// tests, and angle-sign comparisons. Mirrors the original `Jig::Epsilon`.
pub const EPSILON: f64 = 1e-6;

pub fn pt(x: f64, y: f64) -> Pt2 {
    Point2::new(x, y)
}

pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vector2::new(x, y)
}

/// Signed "sine" of the angle from `a` to `b`: positive when `b` is
/// counterclockwise from `a`. Used as the cheap winding/orientation test
/// throughout the mesh (concavity, CW tests, deviation cones).
pub fn cross2(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed angle from `a` to `b`, both assumed normalised, in `(-pi, pi]`.
/// Positive means `b` is counterclockwise from `a`. Mirrors the original
/// `Vec2::GetAngle`.
pub fn signed_angle(a: Vec2, b: Vec2) -> f64 {
    debug_assert!((a.magnitude2() - 1.0).abs() < 1e-3, "a must be normalised");
    debug_assert!((b.magnitude2() - 1.0).abs() < 1e-3, "b must be normalised");
    let dot = a.dot(b).min(1.0).max(-1.0);
    dot.acos().copysign(cross2(a, b))
}

/// Normalise in place; returns `false` (leaving the vector unchanged) if it
/// is shorter than `EPSILON`, matching the original `Vec2::Normalise`
/// returning a success flag instead of producing NaNs.
pub fn try_normalise(v: Vec2) -> Option<Vec2> {
    let len = v.magnitude();
    if len < EPSILON {
        None
    } else {
        Some(v / len)
    }
}

pub fn point_in_polygon_ray_test(point: Pt2, verts: &[Pt2]) -> bool {
    // Standard even-odd ray casting test, casting to +x.
    let mut inside = false;
    let n = verts.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let vi = verts[i];
        let vj = verts[j];
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
