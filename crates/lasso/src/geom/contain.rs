use nalgebra::Vector2;

/// Even-odd ray casting toward +x.
///
/// Boundary points are not treated specially; the answer for a fixed polygon
/// and point is deterministic but may go either way on an edge.
pub fn contains_point(polygon: &[Vector2<f64>], p: Vector2<f64>) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        // Half-open rule on y so a vertex shared by two edges is counted once.
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Keys of all candidates whose position lies inside `polygon`, in input order.
pub fn select_inside<K, I>(polygon: &[Vector2<f64>], candidates: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, Vector2<f64>)>,
{
    if polygon.len() < 3 {
        return Vec::new();
    }
    candidates
        .into_iter()
        .filter(|(_, pos)| contains_point(polygon, *pos))
        .map(|(k, _)| k)
        .collect()
}
