//! Shared geometry utilities.
//!
//! Source and normalized space use `kurbo::Point` (y grows downward).
//! Geographic space uses [`GeoPoint`] so the two are never mixed up.

use kurbo::{Line, ParamCurveNearest, Point, Rect};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Smallest width or height (degrees) a bounding box may have.
pub const MIN_SPAN: f64 = 1e-6;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Euclidean distance in raw degrees, treating lat/lng as locally flat.
    pub fn flat_distance(&self, other: GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }
}

/// Great-circle distance in miles via the haversine formula.
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Summed haversine length of a polyline, in miles.
pub fn path_length_miles(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_miles(pair[0], pair[1]))
        .sum()
}

/// Axis-aligned bounds of a point set, or `None` when empty.
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
    )
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return p.distance(a);
    }
    Line::new(a, b).nearest(p, 1e-9).distance_sq.sqrt()
}

/// An axis-aligned latitude/longitude rectangle.
///
/// Always satisfies `south < north` and `west < east`, with both spans
/// at least [`MIN_SPAN`]. Constructors reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl GeoBounds {
    /// Build a box from its sides, rejecting inverted or degenerate input.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Option<Self> {
        let finite = [south, west, north, east].iter().all(|v| v.is_finite());
        if !finite || north - south < MIN_SPAN || east - west < MIN_SPAN {
            return None;
        }
        Some(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Build a box from its south-west and north-east corners.
    pub fn from_corners(south_west: GeoPoint, north_east: GeoPoint) -> Option<Self> {
        Self::new(south_west.lat, south_west.lng, north_east.lat, north_east.lng)
    }

    /// Build a box from a center and half-extents.
    pub fn from_center(center: GeoPoint, half_height: f64, half_width: f64) -> Option<Self> {
        Self::new(
            center.lat - half_height,
            center.lng - half_width,
            center.lat + half_height,
            center.lng + half_width,
        )
    }

    /// Smallest box containing every point (min/max reduction).
    pub fn enclosing(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (mut s, mut w, mut n, mut e) = (first.lat, first.lng, first.lat, first.lng);
        for p in rest {
            s = s.min(p.lat);
            n = n.max(p.lat);
            w = w.min(p.lng);
            e = e.max(p.lng);
        }
        Self::new(s, w, n, e)
    }

    /// Box of aspect ratio `aspect` (width/height) centered in `viewport`,
    /// filling `fill` (0-1] of the viewport along its limiting axis.
    pub fn centered_in(viewport: &GeoBounds, aspect: f64, fill: f64) -> Option<Self> {
        if !(aspect.is_finite() && aspect > 0.0) {
            return None;
        }
        let fill = fill.clamp(f64::EPSILON, 1.0);
        let mut half_height = viewport.height() * fill / 2.0;
        let mut half_width = half_height * aspect;
        let max_half_width = viewport.width() * fill / 2.0;
        if half_width > max_half_width {
            half_width = max_half_width;
            half_height = half_width / aspect;
        }
        Self::from_center(viewport.center(), half_height, half_width)
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.south, self.west)
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.north, self.east)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    /// The four corners: south-west, south-east, north-east, north-west.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.south, self.west),
            GeoPoint::new(self.south, self.east),
            GeoPoint::new(self.north, self.east),
            GeoPoint::new(self.north, self.west),
        ]
    }
}

impl<'de> Deserialize<'de> for GeoBounds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            south: f64,
            west: f64,
            north: f64,
            east: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        GeoBounds::new(raw.south, raw.west, raw.north, raw.east)
            .ok_or_else(|| serde::de::Error::custom("inverted or degenerate bounds"))
    }
}
