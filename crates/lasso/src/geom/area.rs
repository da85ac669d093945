use nalgebra::Vector2;

/// Signed shoelace area of the closed polygon (last point wraps to first).
/// Positive for counterclockwise order; 0 for fewer than 3 points.
pub fn signed_area(points: &[Vector2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for k in 0..n {
        let a = points[k];
        let b = points[(k + 1) % n];
        acc += a.x * b.y - b.x * a.y;
    }
    0.5 * acc
}

/// Unsigned enclosed area.
#[inline]
pub fn area(points: &[Vector2<f64>]) -> f64 {
    signed_area(points).abs()
}

/// Minimum-area gate: strictly greater than `min_area`.
#[inline]
pub fn is_valid_loop(points: &[Vector2<f64>], min_area: f64) -> bool {
    area(points) > min_area
}
