//! External collaborators: routing, geocoding and the map view.
//!
//! The core only sees these traits. HTTP implementations for OSRM and
//! Nominatim live behind the `http` feature.

#[cfg(feature = "http")]
pub mod nominatim;
#[cfg(feature = "http")]
pub mod osrm;

use crate::error::ServiceError;
use crate::geom::{GeoBounds, GeoPoint};

/// Point-to-point routing along real streets.
///
/// An `Ok` with an empty path counts as a failed segment.
#[allow(async_fn_in_trait)]
pub trait RoutingService {
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, ServiceError>;
}

impl<T: RoutingService> RoutingService for &T {
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, ServiceError> {
        (**self).route(from, to).await
    }
}

/// Best match for a free-text place search.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub point: GeoPoint,
    pub name: String,
}

/// Free-text place search.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// `Ok(None)` when nothing matches.
    async fn search(&self, query: &str) -> Result<Option<Place>, ServiceError>;
}

/// Look up `query`, turning "no match" into [`ServiceError::NotFound`].
/// Geocoding has no offline fallback.
pub async fn locate<G: Geocoder>(geocoder: &G, query: &str) -> Result<Place, ServiceError> {
    geocoder.search(query).await?.ok_or(ServiceError::NotFound)
}

/// The map widget as the core sees it. Passed explicitly wherever a
/// viewport is needed.
pub trait MapView {
    /// Currently visible area.
    fn viewport(&self) -> GeoBounds;
}

/// Default placement for a freshly loaded overlay: the shape's aspect
/// ratio, filling most of the visible map.
pub fn place_overlay(map: &dyn MapView, aspect: f64) -> Option<GeoBounds> {
    GeoBounds::centered_in(&map.viewport(), aspect, OVERLAY_FILL)
}

/// Fraction of the viewport a new overlay covers.
pub const OVERLAY_FILL: f64 = 0.6;
