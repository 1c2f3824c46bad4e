//! shape2route: drawings and images → road-following GPS routes.
//!
//! Traces a vector outline or raster image into points in the unit
//! square, places them in a geographic box, scales the result to a target
//! distance and optionally snaps it to real streets.
//!
//! # Example
//!
//! ```no_run
//! use shape2route::{trace, GeoBounds, RouteConfig, TraceConfig};
//! use std::path::Path;
//!
//! let shape = trace(Path::new("heart.svg"), &TraceConfig::default())?;
//! let bounds = GeoBounds::new(40.70, -74.02, 40.72, -73.99).unwrap();
//! let config = RouteConfig { target_miles: Some(3.1), ..RouteConfig::default() };
//! let route = shape2route::compose::compose(&shape.points, &bounds, &config);
//! # Ok::<(), shape2route::ExtractError>(())
//! ```

#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod error;
pub mod geom;
pub mod gpx;
pub mod normalize;
pub mod overlay;
pub mod raster;
pub mod services;
pub mod simplify;
pub mod sketch;
pub mod snap;
pub mod vector;

// Re-export kurbo so callers can build normalized points with the same version.
pub use kurbo;

pub use compose::Route;
pub use config::{Preset, RasterMode, RouteConfig, TraceConfig};
pub use error::{ExtractError, ServiceError, Stage};
pub use geom::{GeoBounds, GeoPoint};
pub use overlay::{BoundsEvent, Handle, OverlayTransform, ResizeMode};

use std::path::Path;
use std::time::Instant;

use kurbo::Point;
use log::info;

/// Where a traced shape came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    Vector,
    Raster(raster::Method),
}

/// A traced shape in the unit square (y down).
#[derive(Debug, Clone)]
pub struct Shape {
    pub points: Vec<Point>,
    /// Width/height of the source, for sizing an overlay.
    pub aspect_ratio: f64,
    pub source: Source,
}

/// Trace an SVG or raster image file into normalized points.
///
/// Files ending in `.svg` are read as vector documents, everything else
/// is decoded as an image.
pub fn trace(path: &Path, config: &TraceConfig) -> Result<Shape, ExtractError> {
    let t_start = Instant::now();
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let shape = if is_svg {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => ExtractError::Document(e.to_string()),
            _ => ExtractError::Io(e),
        })?;
        trace_svg(&text, config)?
    } else {
        let found = raster::extract_file(path, config)?;
        Shape {
            aspect_ratio: found.aspect_ratio(),
            source: Source::Raster(found.method),
            points: found.points,
        }
    };

    info!(
        "Result      {} points \u{00b7} aspect {:.3}  ({}ms)",
        shape.points.len(),
        shape.aspect_ratio,
        t_start.elapsed().as_millis()
    );
    Ok(shape)
}

/// Trace an in-memory SVG document.
pub fn trace_svg(text: &str, config: &TraceConfig) -> Result<Shape, ExtractError> {
    let found = vector::extract_document(text, config)?;
    Ok(Shape {
        aspect_ratio: found.aspect_ratio(),
        source: Source::Vector,
        points: found.points,
    })
}
