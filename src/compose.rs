//! Normalized shapes → geographic routes.
//!
//! Scaling treats latitude/longitude as locally Cartesian: offsets from
//! the arithmetic centroid are multiplied uniformly in degrees. This is
//! only accurate for routes spanning a few miles, away from the poles.

use kurbo::Point;
use log::debug;

use crate::config::RouteConfig;
use crate::geom::{path_length_miles, GeoBounds, GeoPoint};

/// Anything with two raw coordinates, so pruning works in either space.
pub trait Planar: Copy {
    fn flat_distance(&self, other: &Self) -> f64;
}

impl Planar for Point {
    fn flat_distance(&self, other: &Self) -> f64 {
        self.distance(*other)
    }
}

impl Planar for GeoPoint {
    fn flat_distance(&self, other: &Self) -> f64 {
        GeoPoint::flat_distance(self, *other)
    }
}

/// Place unit-square points into `bounds`. Normalized y grows downward,
/// latitude grows upward, so `lat = north - v * height`.
///
/// Results with a non-finite component are dropped.
pub fn map_normalized_to_geo(points: &[Point], bounds: &GeoBounds) -> Vec<GeoPoint> {
    points
        .iter()
        .map(|p| {
            GeoPoint::new(
                bounds.north() - p.y * bounds.height(),
                bounds.west() + p.x * bounds.width(),
            )
        })
        .filter(GeoPoint::is_finite)
        .collect()
}

/// Drop points within `min_distance` of the last kept point.
/// The first point is always kept.
pub fn prune_near_duplicates<P: Planar>(points: &[P], min_distance: f64) -> Vec<P> {
    let mut kept: Vec<P> = Vec::with_capacity(points.len());
    for &p in points {
        match kept.last() {
            Some(last) if p.flat_distance(last) <= min_distance => {}
            _ => kept.push(p),
        }
    }
    kept
}

/// Arithmetic mean of latitudes and longitudes.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(GeoPoint::new(lat / n, lng / n))
}

/// Scale a route about its centroid so its haversine length is `target_miles`.
///
/// Routes with zero length, or a non-positive target, come back unchanged.
pub fn scale_to_target_distance(points: &[GeoPoint], target_miles: f64) -> Vec<GeoPoint> {
    let current = path_length_miles(points);
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    if !(current > 0.0 && target_miles > 0.0 && target_miles.is_finite()) {
        return points.to_vec();
    }
    let factor = target_miles / current;
    debug!("scaling {:.3} mi \u{2192} {:.3} mi (\u{00d7}{:.4})", current, target_miles, factor);
    points
        .iter()
        .map(|p| {
            GeoPoint::new(
                center.lat + (p.lat - center.lat) * factor,
                center.lng + (p.lng - center.lng) * factor,
            )
        })
        .collect()
}

/// Normalized shape → pruned, optionally distance-scaled route points.
pub fn compose(points: &[Point], bounds: &GeoBounds, config: &RouteConfig) -> Vec<GeoPoint> {
    let placed = map_normalized_to_geo(points, bounds);
    let pruned = prune_near_duplicates(&placed, config.min_point_distance);
    match config.target_miles {
        Some(miles) => scale_to_target_distance(&pruned, miles),
        None => pruned,
    }
}

/// An ordered sequence of waypoints in travel order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    points: Vec<GeoPoint>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Click-to-add. Non-finite points are ignored.
    pub fn push(&mut self, point: GeoPoint) {
        if point.is_finite() {
            self.points.push(point);
        }
    }

    pub fn pop(&mut self) -> Option<GeoPoint> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Bulk replace from an import, a sketch conversion, or a snap result.
    pub fn replace(&mut self, points: Vec<GeoPoint>) {
        self.points = points;
        self.points.retain(GeoPoint::is_finite);
    }

    pub fn length_miles(&self) -> f64 {
        path_length_miles(&self.points)
    }
}

impl From<Vec<GeoPoint>> for Route {
    fn from(points: Vec<GeoPoint>) -> Self {
        let mut route = Route::new();
        route.replace(points);
        route
    }
}
