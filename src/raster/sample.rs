use image::GrayImage;
use kurbo::Point;

use super::bitmap::Threshold;

/// Dark pixels collected on a regular grid.
#[derive(Debug, Clone)]
pub struct Samples {
    pub points: Vec<Point>,
    pub stride: u32,
}

/// Collect dark pixel coordinates at an adaptive stride.
///
/// Starts coarse (longest side / `divisions`) and halves the stride until
/// at least `min_points` are found or every pixel has been visited.
/// Returns `None` only when no pixel at all is dark.
pub fn dense_sample(
    gray: &GrayImage,
    threshold: Threshold,
    divisions: u32,
    min_points: usize,
) -> Option<Samples> {
    let (w, h) = gray.dimensions();
    let mut stride = (w.max(h) / divisions.max(1)).max(1);
    loop {
        let points = sample_at(gray, threshold, stride);
        if points.len() >= min_points || stride == 1 {
            if points.is_empty() {
                return None;
            }
            return Some(Samples { points, stride });
        }
        stride = (stride / 2).max(1);
    }
}

fn sample_at(gray: &GrayImage, threshold: Threshold, stride: u32) -> Vec<Point> {
    let (w, h) = gray.dimensions();
    let mut points = Vec::new();
    for y in (0..h).step_by(stride as usize) {
        for x in (0..w).step_by(stride as usize) {
            if threshold.is_dark(gray.get_pixel(x, y).0[0]) {
                points.push(Point::new(x as f64, y as f64));
            }
        }
    }
    points
}
