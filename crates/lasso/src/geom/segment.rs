use nalgebra::Vector2;

use crate::cfg::ORIENT_EPS;

/// Turn direction of the ordered triple `(p, q, r)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation with an explicit collinearity tolerance.
#[inline]
pub fn orientation_eps(p: Vector2<f64>, q: Vector2<f64>, r: Vector2<f64>, eps: f64) -> Orientation {
    let v = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if v.abs() < eps {
        Orientation::Collinear
    } else if v > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Shorthand for `orientation_eps(p, q, r, ORIENT_EPS)`.
#[inline]
pub fn orientation(p: Vector2<f64>, q: Vector2<f64>, r: Vector2<f64>) -> Orientation {
    orientation_eps(p, q, r, ORIENT_EPS)
}

/// For collinear `p, q, r`: does `q` lie within the bounding box of segment `pr`?
#[inline]
pub fn on_segment(p: Vector2<f64>, q: Vector2<f64>, r: Vector2<f64>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Closed-segment intersection test for `p1q1` and `p2q2`.
///
/// Proper crossings are decided by orientation signs; touching and overlapping
/// collinear configurations fall back to `on_segment`.
pub fn segments_intersect_eps(
    p1: Vector2<f64>,
    q1: Vector2<f64>,
    p2: Vector2<f64>,
    q2: Vector2<f64>,
    eps: f64,
) -> bool {
    use Orientation::Collinear;
    let o1 = orientation_eps(p1, q1, p2, eps);
    let o2 = orientation_eps(p1, q1, q2, eps);
    let o3 = orientation_eps(p2, q2, p1, eps);
    let o4 = orientation_eps(p2, q2, q1, eps);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == Collinear && on_segment(p1, p2, q1))
        || (o2 == Collinear && on_segment(p1, q2, q1))
        || (o3 == Collinear && on_segment(p2, p1, q2))
        || (o4 == Collinear && on_segment(p2, q1, q2))
}

/// Shorthand for `segments_intersect_eps(.., ORIENT_EPS)`.
#[inline]
pub fn segments_intersect(
    p1: Vector2<f64>,
    q1: Vector2<f64>,
    p2: Vector2<f64>,
    q2: Vector2<f64>,
) -> bool {
    segments_intersect_eps(p1, q1, p2, q2, ORIENT_EPS)
}
