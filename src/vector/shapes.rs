//! Shape primitives converted to point lists in source space.

use std::f64::consts::TAU;

use kurbo::Point;

/// Fewest samples taken around a circle or ellipse.
pub const MIN_ELLIPSE_SAMPLES: usize = 24;

/// Rectangle as a closed 5-point loop, clockwise from the top-left in a y-down frame.
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
        Point::new(x, y),
    ]
}

/// Ellipse sampled uniformly in parameter space. The loop is closed by
/// repeating the first sample.
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, samples: usize) -> Vec<Point> {
    let n = samples.max(MIN_ELLIPSE_SAMPLES);
    (0..=n)
        .map(|i| {
            let theta = TAU * (i % n) as f64 / n as f64;
            Point::new(cx + rx * theta.cos(), cy + ry * theta.sin())
        })
        .collect()
}

/// Polygon vertices followed by a repeat of the first.
pub fn polygon(vertices: &[Point]) -> Vec<Point> {
    let mut points = vertices.to_vec();
    if let Some(&first) = vertices.first() {
        points.push(first);
    }
    points
}

/// Parse a `points` attribute ("x1,y1 x2,y2 ...") into vertices.
/// Unparseable numbers are skipped and an odd trailing number is dropped.
pub fn parse_points(text: &str) -> Vec<Point> {
    let numbers: Vec<f64> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_closes_loop() {
        let pts = rect(0.0, 0.0, 10.0, 5.0);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
        assert_eq!(pts[2], Point::new(10.0, 5.0));
    }

    #[test]
    fn ellipse_has_minimum_samples_on_the_curve() {
        let pts = ellipse(5.0, 5.0, 4.0, 2.0, 3);
        assert_eq!(pts.len(), MIN_ELLIPSE_SAMPLES + 1);
        assert_eq!(pts.first(), pts.last());
        for p in &pts {
            let u = (p.x - 5.0) / 4.0;
            let v = (p.y - 5.0) / 2.0;
            assert!((u * u + v * v - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn polygon_repeats_first_vertex() {
        let verts = parse_points("0,0 4,0 4,3");
        let pts = polygon(&verts);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[3], Point::new(0.0, 0.0));
        assert!(polygon(&[]).is_empty());
    }

    #[test]
    fn points_attribute_is_lenient() {
        let pts = parse_points(" 1,2 3 4,abc 5,6 7");
        assert_eq!(pts, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 6.0)]);
    }
}
