//! Mapping between source space and the unit square.

use kurbo::{Point, Rect};

/// Map `points` from `frame` into [0,1]², componentwise
/// `(p - origin) / size`. Y keeps its downward sense.
///
/// Returns an empty list for a frame with non-positive width or height.
pub fn to_unit(points: &[Point], frame: Rect) -> Vec<Point> {
    let (w, h) = (frame.width(), frame.height());
    if !(w > 0.0 && h > 0.0) {
        return Vec::new();
    }
    points
        .iter()
        .map(|p| Point::new((p.x - frame.x0) / w, (p.y - frame.y0) / h))
        .filter(|p| p.is_finite())
        .collect()
}

/// Inverse of [`to_unit`].
pub fn from_unit(points: &[Point], frame: Rect) -> Vec<Point> {
    points
        .iter()
        .map(|p| {
            Point::new(
                frame.x0 + p.x * frame.width(),
                frame.y0 + p.y * frame.height(),
            )
        })
        .collect()
}
