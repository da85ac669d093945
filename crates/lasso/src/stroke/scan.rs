//! Incremental self-intersection scan for the newest stroke segment.

use nalgebra::Vector2;

use crate::cfg::{MIN_POINTS_FOR_SCAN, SCAN_TAIL_SKIP};
use crate::geom::segments_intersect;

/// Find the earlier segment crossed by `(points[n-1], points[n-2])`.
///
/// Candidates `i` run from `n - 14` down to `1` and name segment
/// `(points[i], points[i-1])`; the first hit wins. A retired candidate
/// (`valid[i] == false`) ends the scan with `None`. Strokes shorter than 15
/// points never report a crossing.
pub fn find_crossing(points: &[Vector2<f64>], valid: &[bool]) -> Option<usize> {
    find_crossing_with(
        points.len(),
        |i| points[i],
        |i| valid.get(i).copied().unwrap_or(false),
    )
}

pub(crate) fn find_crossing_with<P, V>(count: usize, pos: P, valid: V) -> Option<usize>
where
    P: Fn(usize) -> Vector2<f64>,
    V: Fn(usize) -> bool,
{
    if count < MIN_POINTS_FOR_SCAN {
        return None;
    }
    let head = pos(count - 1);
    let prev = pos(count - 2);
    for i in (1..=count - SCAN_TAIL_SKIP).rev() {
        if !valid(i) {
            return None;
        }
        if segments_intersect(head, prev, pos(i), pos(i - 1)) {
            return Some(i);
        }
    }
    None
}
