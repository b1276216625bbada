//! Waypoint simplification.
//!
//! Collapses consecutive collinear waypoints with a cross-product test so a
//! long straight run becomes a single segment. The traversed geometry is
//! unchanged; only redundant intermediate points are dropped.

use crate::geometry::Point;

/// Cross-product magnitude below which three points count as collinear.
pub const COLLINEARITY_TOLERANCE: f64 = 0.01;

/// Drop interior waypoints that are collinear with their neighbors.
/// Re-running on an already-simplified path returns the same path.
pub fn simplify_path(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut simplified = vec![points[0]];
    for i in 1..points.len() - 1 {
        let a = simplified[simplified.len() - 1];
        let b = points[i];
        let c = points[i + 1];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross.abs() > COLLINEARITY_TOLERANCE {
            simplified.push(b);
        }
    }
    simplified.push(points[points.len() - 1]);
    simplified
}
