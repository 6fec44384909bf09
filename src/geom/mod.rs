//! Geometry kernel: vector algebra and orientation/intersection predicates.
//!
//! Orientation tests run on integer vertex coordinates (`Vertex`) and are
//! exact for the supported domain. Intersection tests and any predicate
//! that needs an actual (possibly non-integer) hit point work on `glam::Vec2`
//! through a relative+absolute tolerance, because the segments involved may
//! come from a triangle centroid or a portal midpoint rather than a raw
//! input vertex.

use glam::Vec2;
use std::ops::{Add, Sub};

/// A 2-D point with integer coordinates.
///
/// Chosen so that `orient`'s cross-product determinant is exact within a
/// 64-bit signed range for any coordinate pair that fits in `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Vertex { x, y }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl From<(i32, i32)> for Vertex {
    fn from(value: (i32, i32)) -> Self {
        Vertex::new(value.0, value.1)
    }
}

impl Add for Vertex {
    type Output = Vertex;
    #[inline]
    fn add(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vertex {
    type Output = Vertex;
    #[inline]
    fn sub(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Tolerance used by the floating-point comparators, expressed relative to
/// the larger of the two magnitudes being compared (plus a small absolute
/// floor so comparisons against zero are still meaningful).
pub const TOLERANCE: f32 = 1e-4;

/// Compares two floats for equality within [`TOLERANCE`] of the larger
/// magnitude.
#[inline]
pub fn approx_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Compares a float against zero within [`TOLERANCE`].
#[inline]
pub fn approx_equal_zero(a: f32) -> bool {
    a.abs() <= TOLERANCE
}

/// `true` iff `a` is strictly less than `b`, outside the noise floor that
/// [`approx_equal`] would consider equal.
#[inline]
pub fn strictly_less(a: f32, b: f32) -> bool {
    (b - a) > TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// 2-D cross product (the z-component of the 3-D cross product).
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Signed area of the triangle `(a, b, c)`, doubled. Positive when
/// `a, b, c` are in counter-clockwise order.
#[inline]
pub fn orient(a: Vertex, b: Vertex, c: Vertex) -> i64 {
    let ab_x = (b.x - a.x) as i64;
    let ab_y = (b.y - a.y) as i64;
    let ac_x = (c.x - a.x) as i64;
    let ac_y = (c.y - a.y) as i64;
    ab_x * ac_y - ab_y * ac_x
}

/// Floating-point variant of [`orient`], used when one or more operands is
/// not an exact input vertex (e.g. a centroid or a portal point).
#[inline]
pub fn orient_f(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    cross(b - a, c - a)
}

/// `true` iff `v_query, v1, v2` are in counter-clockwise (or collinear)
/// order.
#[inline]
pub fn is_counter_clockwise(v_query: Vertex, v1: Vertex, v2: Vertex) -> bool {
    orient(v_query, v1, v2) >= 0
}

/// Inclusive point-in-triangle test by three sign tests (the "r is not on
/// the wrong side of any edge" formulation). Edge-inclusive: a point lying
/// exactly on an edge or corner counts as inside.
pub fn in_triangle(p: Vec2, tri_verts: &[Vec2; 3]) -> bool {
    let d1 = orient_f(p, tri_verts[0], tri_verts[1]);
    let d2 = orient_f(p, tri_verts[1], tri_verts[2]);
    let d3 = orient_f(p, tri_verts[2], tri_verts[0]);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// `true` iff the open segments `ab` and `cd` properly cross (a bare touch
/// at an endpoint does not count). See [`segments_intersect_or_touch`] for
/// the inclusive variant.
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let oa = orient_f(c, d, a);
    let ob = orient_f(c, d, b);
    let oc = orient_f(a, b, c);
    let od = orient_f(a, b, d);

    let ab_cond = strictly_less(oa * ob, 0.0);
    let cd_cond = strictly_less(oc * od, 0.0);
    ab_cond && cd_cond
}

/// Like [`segments_intersect`] but also returns `true` when the segments
/// merely touch (share an endpoint or one grazes the other).
pub fn segments_intersect_or_touch(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let oa = orient_f(c, d, a);
    let ob = orient_f(c, d, b);
    let oc = orient_f(a, b, c);
    let od = orient_f(a, b, d);

    let ab_cond = strictly_less(oa * ob, 0.0) || approx_equal_zero(oa) || approx_equal_zero(ob);
    let cd_cond = strictly_less(oc * od, 0.0) || approx_equal_zero(oc) || approx_equal_zero(od);
    ab_cond && cd_cond
}

/// Intersection point of segments `ab` and `cd`, assuming they properly
/// cross. Caller must have already checked with [`segments_intersect`] or
/// [`segments_intersect_or_touch`].
pub fn segment_intersection_point(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Vec2 {
    let oa = orient_f(c, d, a);
    let ob = orient_f(c, d, b);
    (a * ob - b * oa) / (ob - oa)
}

/// `true` iff the quadrilateral `v1, v2, v3, v4` is convex, i.e. its two
/// diagonals (`v1-v3` and `v2-v4`) properly intersect.
pub fn is_convex(v1: Vertex, v2: Vertex, v3: Vertex, v4: Vertex) -> bool {
    segments_intersect(v1.as_vec2(), v3.as_vec2(), v2.as_vec2(), v4.as_vec2())
}

/// Next corner index within a triangle, cycling `0 -> 1 -> 2 -> 0`.
#[inline]
pub fn next(i: usize) -> usize {
    debug_assert!(i < 3);
    if i == 2 {
        0
    } else {
        i + 1
    }
}

/// Previous corner index within a triangle, cycling `0 -> 2 -> 1 -> 0`.
#[inline]
pub fn prev(i: usize) -> usize {
    debug_assert!(i < 3);
    if i == 0 {
        2
    } else {
        i - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orient_detects_ccw_and_cw() {
        let a = Vertex::new(0, 0);
        let b = Vertex::new(10, 0);
        let c = Vertex::new(0, 10);
        assert!(orient(a, b, c) > 0);
        assert!(orient(a, c, b) < 0);
    }

    #[test]
    fn orient_is_zero_for_collinear_points() {
        let a = Vertex::new(0, 0);
        let b = Vertex::new(5, 5);
        let c = Vertex::new(10, 10);
        assert_eq!(orient(a, b, c), 0);
    }

    #[test]
    fn in_triangle_is_edge_inclusive() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(in_triangle(Vec2::new(5.0, 0.0), &tri));
        assert!(in_triangle(Vec2::new(0.0, 0.0), &tri));
        assert!(in_triangle(Vec2::new(1.0, 1.0), &tri));
        assert!(!in_triangle(Vec2::new(-1.0, -1.0), &tri));
    }

    #[test]
    fn segments_intersect_requires_proper_crossing() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 10.0);
        let c = Vec2::new(0.0, 10.0);
        let d = Vec2::new(10.0, 0.0);
        assert!(segments_intersect(a, b, c, d));
        // touching at a shared endpoint is not a proper crossing
        assert!(!segments_intersect(a, b, b, Vec2::new(20.0, 0.0)));
        assert!(segments_intersect_or_touch(a, b, b, Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn segment_intersection_point_lands_on_both_segments() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 10.0);
        let c = Vec2::new(0.0, 10.0);
        let d = Vec2::new(10.0, 0.0);
        let p = segment_intersection_point(a, b, c, d);
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn is_convex_true_for_a_square() {
        let v1 = Vertex::new(0, 0);
        let v2 = Vertex::new(10, 0);
        let v3 = Vertex::new(10, 10);
        let v4 = Vertex::new(0, 10);
        assert!(is_convex(v1, v2, v3, v4));
    }

    #[test]
    fn is_convex_false_for_a_dart() {
        // v1,v2,v3,v4 in order but v3 dents inward -> diagonals don't cross
        let v1 = Vertex::new(0, 0);
        let v2 = Vertex::new(10, 0);
        let v3 = Vertex::new(3, 3);
        let v4 = Vertex::new(0, 10);
        assert!(!is_convex(v1, v2, v3, v4));
    }
}
