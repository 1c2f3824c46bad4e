//! Douglas-Peucker polyline simplification.
//!
//! Splits recursively at the point of maximum perpendicular deviation from
//! the chord, keeping only points that deviate by more than the tolerance.

use geo::{LineString, Simplify};
use kurbo::Point;

/// RDP polyline simplification. Endpoints are always kept.
pub fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 || !(tolerance > 0.0) {
        return points.to_vec();
    }
    let line: LineString<f64> = points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>().into();
    line.simplify(&tolerance)
        .into_inner()
        .into_iter()
        .map(|c| Point::new(c.x, c.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn drops_point_within_tolerance() {
        let line = pts(&[(0.0, 0.0), (0.5, 0.001), (1.0, 0.0)]);
        assert_eq!(douglas_peucker(&line, 0.01), pts(&[(0.0, 0.0), (1.0, 0.0)]));
    }

    #[test]
    fn keeps_point_beyond_tolerance() {
        let line = pts(&[(0.0, 0.0), (0.5, 0.001), (1.0, 0.0)]);
        assert_eq!(douglas_peucker(&line, 0.0001), line);
    }

    #[test]
    fn keeps_corners_of_a_staircase() {
        let line = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (3.0, 2.0),
        ]);
        let simplified = douglas_peucker(&line, 0.1);
        assert_eq!(
            simplified,
            pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (3.0, 2.0)])
        );
    }

    #[test]
    fn short_or_zero_tolerance_input_is_untouched() {
        let two = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(douglas_peucker(&two, 5.0), two);
        let three = pts(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        assert_eq!(douglas_peucker(&three, 0.0), three);
    }
}
