use log::debug;
use serde::Deserialize;

use super::{Geocoder, Place};
use crate::error::ServiceError;
use crate::geom::GeoPoint;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim requires an identifying user agent.
const USER_AGENT: &str = concat!("shape2route/", env!("CARGO_PKG_VERSION"));

/// Place search via Nominatim's `search` endpoint.
#[derive(Debug, Clone)]
pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
}

impl Nominatim {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

fn parse_search(body: &str) -> Result<Option<Place>, ServiceError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };
    let coord = |raw: &str| {
        raw.parse::<f64>()
            .map_err(|e| ServiceError::Malformed(format!("bad coordinate {raw:?}: {e}")))
    };
    let point = GeoPoint::new(coord(&hit.lat)?, coord(&hit.lon)?);
    Ok(Some(Place {
        point,
        name: hit.display_name,
    }))
}

impl Geocoder for Nominatim {
    async fn search(&self, query: &str) -> Result<Option<Place>, ServiceError> {
        let url = format!("{}/search", self.base_url);
        debug!("GET {} q={:?}", url, query);
        let body = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_search(&body)
    }
}
