use std::path::PathBuf;

use clap::Parser;
use shape2route::compose::{compose, Route};
use shape2route::geom::{GeoBounds, GeoPoint};
use shape2route::services::nominatim::{Nominatim, DEFAULT_NOMINATIM_URL};
use shape2route::services::osrm::{OsrmRouter, DEFAULT_OSRM_URL};
use shape2route::snap::Snapper;
use shape2route::{gpx, services, Preset, RasterMode};

/// Miles per degree of latitude.
const MILES_PER_DEGREE: f64 = 69.09;

#[derive(Parser)]
#[command(name = "shape2route", about = "Vector outline or raster image to a GPX route")]
struct Cli {
    /// Input file (SVG, PNG, JPEG, ...)
    #[arg(short, long)]
    input: PathBuf,

    /// Output GPX path
    #[arg(short, long)]
    output: PathBuf,

    /// Track name written into the GPX file
    #[arg(short, long, default_value = "Route")]
    name: String,

    /// TOML preset with [trace] and [route] tables
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Target box as "south,west,north,east" in degrees
    #[arg(long, value_parser = parse_bounds, conflicts_with = "near")]
    bounds: Option<GeoBounds>,

    /// Place to center the route on (geocoded)
    #[arg(long)]
    near: Option<String>,

    /// Height of the box around --near, in miles
    #[arg(long, default_value = "1.0")]
    span: f64,

    /// Scale the route to this many miles
    #[arg(short, long)]
    miles: Option<f64>,

    /// Use dense dark-pixel sampling instead of edge walking
    #[arg(long)]
    dense: bool,

    /// Snap the route to streets via OSRM
    #[arg(long)]
    snap: bool,

    /// OSRM base URL
    #[arg(long, default_value = DEFAULT_OSRM_URL)]
    osrm: String,

    /// OSRM profile
    #[arg(long, default_value = "foot")]
    profile: String,
}

fn parse_bounds(raw: &str) -> Result<GeoBounds, String> {
    let values: Vec<f64> = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match values[..] {
        [s, w, n, e] => GeoBounds::new(s, w, n, e)
            .ok_or_else(|| "bounds must have south < north and west < east".to_string()),
        _ => Err("expected four comma-separated numbers".to_string()),
    }
}

/// Box of the shape's aspect ratio, `span` miles tall, centered on `center`.
fn box_around(center: GeoPoint, span: f64, aspect: f64) -> Option<GeoBounds> {
    let half_height = span / MILES_PER_DEGREE / 2.0;
    GeoBounds::from_center(center, half_height, half_height * aspect)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();
    let cli = Cli::parse();

    let mut preset = match &cli.preset {
        Some(path) => Preset::from_toml(&std::fs::read_to_string(path)?)?,
        None => Preset::default(),
    };
    if cli.dense {
        preset.trace.raster_mode = RasterMode::Dense;
    }
    if cli.miles.is_some() {
        preset.route.target_miles = cli.miles;
    }

    let shape = shape2route::trace(&cli.input, &preset.trace)?;

    let bounds = match (&cli.bounds, &cli.near) {
        (Some(bounds), _) => *bounds,
        (None, Some(query)) => {
            let geocoder = Nominatim::new(DEFAULT_NOMINATIM_URL)?;
            let place = services::locate(&geocoder, query).await?;
            log::info!("Place       {}", place.name);
            box_around(place.point, cli.span, shape.aspect_ratio)
                .ok_or("span too small for a usable box")?
        }
        (None, None) => return Err("either --bounds or --near is required".into()),
    };

    let mut route = Route::from(compose(&shape.points, &bounds, &preset.route));

    if cli.snap {
        let snapper = Snapper::new(OsrmRouter::new(&cli.osrm, &cli.profile), preset.route.max_waypoints);
        let snapped = snapper.snap(route.points()).await?;
        route.replace(snapped.points);
    }

    gpx::write_gpx(&cli.output, &cli.name, route.points())?;
    log::info!(
        "Route       {} points \u{00b7} {:.2} mi",
        route.len(),
        route.length_miles()
    );
    log::info!("\u{2713} {}", cli.output.display());

    Ok(())
}
