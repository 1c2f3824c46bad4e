use serde::{Deserialize, Serialize};

/// All shape extraction parameters in one struct.
/// Serializable so presets can be saved and loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    // -- Raster stage --
    /// How to turn dark pixels into points.
    pub raster_mode: RasterMode,
    /// Grayscale percentile used as the dark/light cutoff (0-100).
    /// The extractor adapts to the image's own contrast instead of a fixed level.
    pub threshold_percentile: f64,
    /// Minimum alpha (0-255) for a pixel to count as visible.
    /// Anything more transparent is forced to background.
    pub min_alpha: u8,
    /// Sobel gradient magnitude a pixel must exceed to seed or continue a contour.
    pub edge_threshold: f64,
    /// A contour walk that collects fewer points than this is considered failed.
    /// Tunable: the right cutoff depends on image size and detail.
    pub min_contour_points: usize,
    /// Maximum number of steps for one boundary walk.
    pub max_walk_steps: usize,
    /// Longest image side divided by this gives the coarse sampling stride.
    pub dense_sample_divisions: u32,

    // -- Vector stage --
    /// Samples per cubic/quadratic segment (at least 4).
    pub curve_steps: usize,
    /// Samples around a circle or ellipse (at least 24).
    pub ellipse_samples: usize,

    // -- Simplification --
    /// Douglas-Peucker tolerance in pixel units, applied before normalizing.
    pub simplify_tolerance: f64,
}

/// Raster extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterMode {
    /// Walk the Sobel edge boundary, falling back to dense sampling.
    Contour,
    /// Collect every dark pixel on an adaptive grid.
    Dense,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            raster_mode: RasterMode::Contour,
            threshold_percentile: 25.0,
            min_alpha: 128,
            edge_threshold: 200.0,
            min_contour_points: 20,
            max_walk_steps: 5000,
            dense_sample_divisions: 100,
            curve_steps: 8,
            ellipse_samples: 36,
            simplify_tolerance: 1.0,
        }
    }
}

/// Parameters for turning a normalized shape into a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Adjacent points closer than this (in degrees) are pruned.
    pub min_point_distance: f64,
    /// Waypoint budget for road snapping.
    pub max_waypoints: usize,
    /// Desired route length in miles. `None` keeps the shape's natural size.
    pub target_miles: Option<f64>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            min_point_distance: 1e-5,
            max_waypoints: 25,
            target_miles: None,
        }
    }
}

/// A saved preset: both halves of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub trace: TraceConfig,
    pub route: RouteConfig,
}

impl Preset {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_preset_keeps_defaults() {
        let preset = Preset::from_toml(
            "[trace]\nraster_mode = \"dense\"\n\n[route]\ntarget_miles = 3.1\n",
        )
        .unwrap();
        assert_eq!(preset.trace.raster_mode, RasterMode::Dense);
        assert_eq!(preset.trace.curve_steps, TraceConfig::default().curve_steps);
        assert_eq!(preset.route.target_miles, Some(3.1));
        assert_eq!(preset.route.max_waypoints, 25);
    }
}
