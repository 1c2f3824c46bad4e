//! Raster images → normalized points.
//!
//! 1. Grayscale with transparent pixels forced to background
//! 2. Percentile threshold adapted to the image's contrast
//! 3. Sobel edge walk, retried once at half threshold, else dense sampling
//! 4. Douglas-Peucker simplification in pixel units
//! 5. Division by image size into the unit square

pub mod bitmap;
pub mod edges;
pub mod sample;

use std::path::Path;

use image::RgbaImage;
use kurbo::{Point, Rect};
use log::{debug, info};

use crate::config::{RasterMode, TraceConfig};
use crate::error::{ExtractError, Stage};
use crate::normalize;
use crate::simplify::douglas_peucker;

use self::bitmap::Threshold;
use self::edges::WalkEnd;

/// How the points of a [`RasterShape`] were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Ordered boundary from the edge walk.
    Contour(WalkEnd),
    /// Spatially sampled dark pixels at the given stride.
    Dense { stride: u32 },
}

/// A shape extracted from a raster image.
#[derive(Debug, Clone)]
pub struct RasterShape {
    /// Points in the unit square, y down.
    pub points: Vec<Point>,
    pub method: Method,
    pub width: u32,
    pub height: u32,
}

impl RasterShape {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Load an image file and extract its shape.
pub fn extract_file(path: &Path, config: &TraceConfig) -> Result<RasterShape, ExtractError> {
    let img = bitmap::load(path)?;
    extract(&img, config)
}

/// Extract the dark-on-light shape from a decoded bitmap.
///
/// An image without a single dark pixel is [`ExtractError::NoShape`].
pub fn extract(img: &RgbaImage, config: &TraceConfig) -> Result<RasterShape, ExtractError> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(ExtractError::NoShape(Stage::Raster));
    }

    let gray = bitmap::grayscale(img, config.min_alpha);
    let threshold = Threshold::percentile(&gray, config.threshold_percentile);
    let dark = threshold.count_dark(&gray);
    info!(
        "Load        {}x{} px, cutoff {} (p{}), {} dark px",
        w, h, threshold.cutoff, config.threshold_percentile, dark
    );
    if dark == 0 {
        return Err(ExtractError::NoShape(Stage::Raster));
    }

    let contour = match config.raster_mode {
        RasterMode::Contour => trace_contour(&gray, config),
        RasterMode::Dense => None,
    };
    let (raw, method) = match contour {
        Some(found) => found,
        None => {
            let samples = sample::dense_sample(
                &gray,
                threshold,
                config.dense_sample_divisions,
                config.min_contour_points,
            )
            .ok_or(ExtractError::NoShape(Stage::Raster))?;
            debug!("dense sampling at stride {}", samples.stride);
            let stride = samples.stride;
            (samples.points, Method::Dense { stride })
        }
    };

    let simplified = douglas_peucker(&raw, config.simplify_tolerance);
    info!(
        "Simplify    {} \u{2192} {} points ({:?})",
        raw.len(),
        simplified.len(),
        method
    );

    let points = normalize::to_unit(&simplified, Rect::new(0.0, 0.0, w as f64, h as f64));
    if points.is_empty() {
        return Err(ExtractError::NoShape(Stage::Raster));
    }
    Ok(RasterShape {
        points,
        method,
        width: w,
        height: h,
    })
}

/// Edge walk at the configured threshold, then once more at half of it.
fn trace_contour(gray: &image::GrayImage, config: &TraceConfig) -> Option<(Vec<Point>, Method)> {
    let mag = edges::magnitude(gray);
    let mut threshold = config.edge_threshold;
    for attempt in 0..2 {
        match edges::walk_boundary(&mag, threshold, config.max_walk_steps) {
            Some(walk) if walk.points.len() >= config.min_contour_points => {
                debug!(
                    "edge walk: {} points, {:?} (attempt {})",
                    walk.points.len(),
                    walk.end,
                    attempt + 1
                );
                return Some((walk.points, Method::Contour(walk.end)));
            }
            Some(walk) => debug!(
                "edge walk too short at threshold {}: {} points",
                threshold,
                walk.points.len()
            ),
            None => debug!("no edge above threshold {}", threshold),
        }
        threshold /= 2.0;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn square_image(size: u32, lo: u32, hi: u32) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(size, size, WHITE);
        for y in lo..hi {
            for x in lo..hi {
                img.put_pixel(x, y, BLACK);
            }
        }
        img
    }

    #[test]
    fn traces_outline_of_a_square() {
        let img = square_image(64, 16, 48);
        let shape = extract(&img, &TraceConfig::default()).unwrap();
        assert!(matches!(shape.method, Method::Contour(_)));
        assert!(shape.points.len() >= 4);
        for p in &shape.points {
            assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
            // Outline hugs the square's border, not its interior.
            let inside = (0.3..0.7).contains(&p.x) && (0.3..0.7).contains(&p.y);
            assert!(!inside, "{p:?}");
        }
    }

    #[test]
    fn dense_mode_samples_interior() {
        let img = square_image(64, 16, 48);
        let config = TraceConfig {
            raster_mode: RasterMode::Dense,
            simplify_tolerance: 0.0,
            ..TraceConfig::default()
        };
        let shape = extract(&img, &config).unwrap();
        assert!(matches!(shape.method, Method::Dense { .. }));
        assert!(shape
            .points
            .iter()
            .any(|p| (0.4..0.6).contains(&p.x) && (0.4..0.6).contains(&p.y)));
    }

    #[test]
    fn blank_and_transparent_images_have_no_shape() {
        let blank = RgbaImage::from_pixel(20, 20, WHITE);
        let err = extract(&blank, &TraceConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::NoShape(Stage::Raster)));

        let clear = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        let err = extract(&clear, &TraceConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::NoShape(Stage::Raster)));
    }

    #[test]
    fn tiny_speck_falls_back_to_dense_sampling() {
        let mut img = RgbaImage::from_pixel(40, 40, WHITE);
        img.put_pixel(20, 20, BLACK);
        let shape = extract(&img, &TraceConfig::default()).unwrap();
        assert_eq!(shape.method, Method::Dense { stride: 1 });
        assert_eq!(shape.points, vec![Point::new(0.5, 0.5)]);
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let err = bitmap::decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ExtractError::ImageLoad(_)));
    }

    #[test]
    fn off_white_page_traces_only_the_ink() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([250, 250, 250, 255]));
        for y in 18..22 {
            for x in 18..22 {
                img.put_pixel(x, y, BLACK);
            }
        }
        let shape = extract(&img, &TraceConfig::default()).unwrap();
        for p in &shape.points {
            assert!((0.4..=0.6).contains(&p.x) && (0.4..=0.6).contains(&p.y), "{p:?}");
        }

        let dense = TraceConfig {
            raster_mode: RasterMode::Dense,
            ..TraceConfig::default()
        };
        let shape = extract(&img, &dense).unwrap();
        assert!(!shape.points.contains(&Point::ZERO));
    }

    #[test]
    fn blank_off_white_page_has_no_shape() {
        let paper = RgbaImage::from_pixel(40, 40, Rgba([250, 250, 250, 255]));
        let err = extract(&paper, &TraceConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::NoShape(Stage::Raster)));
    }

    #[test]
    fn faint_outline_is_found_at_half_threshold() {
        // Straight edges of a 205-on-255 square peak at exactly 200, so the
        // default threshold only catches isolated corner pixels.
        let mut img = RgbaImage::from_pixel(64, 64, WHITE);
        for y in 16..48 {
            for x in 16..48 {
                img.put_pixel(x, y, Rgba([205, 205, 205, 255]));
            }
        }
        let config = TraceConfig::default();
        let mag = edges::magnitude(&bitmap::grayscale(&img, config.min_alpha));
        let first = edges::walk_boundary(&mag, config.edge_threshold, config.max_walk_steps).unwrap();
        assert!(first.points.len() < config.min_contour_points);

        let shape = extract(&img, &config).unwrap();
        assert_eq!(shape.method, Method::Contour(WalkEnd::ClosedLoop));
        for p in &shape.points {
            let inside = (0.3..0.7).contains(&p.x) && (0.3..0.7).contains(&p.y);
            assert!(!inside, "{p:?}");
            assert!((0.2..=0.8).contains(&p.x) && (0.2..=0.8).contains(&p.y), "{p:?}");
        }
    }

    #[test]
    fn dense_mode_with_default_tolerance_keeps_row_ends() {
        let img = square_image(64, 16, 48);
        let config = TraceConfig {
            raster_mode: RasterMode::Dense,
            ..TraceConfig::default()
        };
        let shape = extract(&img, &config).unwrap();
        assert_eq!(shape.method, Method::Dense { stride: 1 });
        // Raster-ordered rows are straight runs, so simplification keeps
        // little more than their ends.
        assert!(shape.points.len() >= 2 && shape.points.len() < 32 * 32);
        assert_eq!(shape.points.first(), Some(&Point::new(0.25, 0.25)));
        assert_eq!(shape.points.last(), Some(&Point::new(47.0 / 64.0, 47.0 / 64.0)));
        for p in &shape.points {
            assert!((0.25..=47.0 / 64.0).contains(&p.x) && (0.25..=47.0 / 64.0).contains(&p.y));
        }
    }
}
