use log::debug;
use serde::Deserialize;

use super::RoutingService;
use crate::error::ServiceError;
use crate::geom::GeoPoint;

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Routing via an OSRM `route` endpoint.
#[derive(Debug, Clone)]
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
        }
    }

    fn url(&self, from: GeoPoint, to: GeoPoint) -> String {
        // OSRM takes lng,lat order.
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, self.profile, from.lng, from.lat, to.lng, to.lat
        )
    }
}

impl Default for OsrmRouter {
    fn default() -> Self {
        Self::new(DEFAULT_OSRM_URL, "foot")
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Decode an OSRM route response body into points.
fn parse_route(body: &str) -> Result<Vec<GeoPoint>, ServiceError> {
    let response: RouteResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    if response.code != "Ok" {
        return Err(ServiceError::Malformed(format!("OSRM code {}", response.code)));
    }
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Malformed("no routes".into()))?;
    Ok(route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| GeoPoint::new(lat, lng))
        .filter(GeoPoint::is_finite)
        .collect())
}

impl RoutingService for OsrmRouter {
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, ServiceError> {
        let url = self.url(from, to);
        debug!("GET {}", url);
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_route(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_swapped_to_lat_lng() {
        let body = r#"{"code":"Ok","routes":[{"geometry":{"type":"LineString",
            "coordinates":[[13.38,52.51],[13.39,52.52]]},"distance":1200.5}]}"#;
        let pts = parse_route(body).unwrap();
        assert_eq!(pts, vec![GeoPoint::new(52.51, 13.38), GeoPoint::new(52.52, 13.39)]);
    }

    #[test]
    fn error_codes_and_garbage_are_malformed() {
        assert!(matches!(
            parse_route(r#"{"code":"NoRoute","routes":[]}"#),
            Err(ServiceError::Malformed(_))
        ));
        assert!(matches!(parse_route("<html>"), Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn url_uses_lng_lat_order() {
        let router = OsrmRouter::new("http://localhost:5000/", "bike");
        let url = router.url(GeoPoint::new(1.5, 2.5), GeoPoint::new(3.5, 4.5));
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/bike/2.5,1.5;4.5,3.5?overview=full&geometries=geojson"
        );
    }
}
