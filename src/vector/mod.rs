//! Vector documents → normalized points.
//!
//! 1. Walk path and shape elements in document order
//! 2. Sample each into source-space points
//! 3. Concatenate everything into one list (grouping is not preserved)
//! 4. Normalize by the document's viewBox into the unit square

pub mod path;
pub mod shapes;

use kurbo::{Point, Rect};
use log::{debug, info};
use roxmltree::{Document, Node};

use crate::config::TraceConfig;
use crate::error::{ExtractError, Stage};
use crate::geom::bounding_rect;
use crate::normalize;

/// Elements whose children are never rendered directly.
const NON_RENDERED: &[&str] = &["defs", "clipPath", "mask", "symbol", "pattern", "marker"];

/// A shape extracted from a vector document.
#[derive(Debug, Clone)]
pub struct VectorShape {
    /// Points in the unit square, y down.
    pub points: Vec<Point>,
    /// Source-space frame used for normalization.
    pub view_box: Rect,
}

impl VectorShape {
    /// Width/height of the source frame.
    pub fn aspect_ratio(&self) -> f64 {
        self.view_box.width() / self.view_box.height()
    }
}

/// Sample a single path's data and normalize it by `view_box`
/// (x-min, y-min, width, height).
///
/// A view box with zero or negative size yields no points.
pub fn normalize_path(data: &str, view_box: [f64; 4], config: &TraceConfig) -> Vec<Point> {
    let [x, y, w, h] = view_box;
    let points = path::sample_path(data, config.curve_steps);
    normalize::to_unit(&points, Rect::new(x, y, x + w, y + h))
}

/// Parse a vector document and extract its combined, normalized outline.
pub fn extract_document(text: &str, config: &TraceConfig) -> Result<VectorShape, ExtractError> {
    let doc = Document::parse(text).map_err(|e| ExtractError::Document(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ExtractError::Document(format!(
            "expected <svg> root, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut points = Vec::new();
    let mut elements = 0usize;
    collect(root, config, &mut points, &mut elements);
    info!("Sample      {} elements \u{2192} {} points", elements, points.len());

    let view_box = match declared_frame(root) {
        Some(frame) => frame,
        None => {
            debug!("no viewBox or size declared, framing by point bounds");
            bounding_rect(&points).ok_or(ExtractError::NoShape(Stage::Vector))?
        }
    };

    let normalized = normalize::to_unit(&points, view_box);
    if normalized.is_empty() {
        return Err(ExtractError::NoShape(Stage::Vector));
    }
    Ok(VectorShape {
        points: normalized,
        view_box,
    })
}

fn collect(node: Node, config: &TraceConfig, out: &mut Vec<Point>, elements: &mut usize) {
    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        if NON_RENDERED.contains(&name) {
            continue;
        }
        let before = out.len();
        match name {
            "path" => {
                if let Some(d) = child.attribute("d") {
                    out.extend(path::sample_path(d, config.curve_steps));
                }
            }
            "rect" => {
                if let (Some(w), Some(h)) = (length(child, "width"), length(child, "height")) {
                    let x = length(child, "x").unwrap_or(0.0);
                    let y = length(child, "y").unwrap_or(0.0);
                    out.extend(shapes::rect(x, y, w, h));
                }
            }
            "circle" => {
                if let Some(r) = length(child, "r") {
                    let (cx, cy) = center(child);
                    out.extend(shapes::ellipse(cx, cy, r, r, config.ellipse_samples));
                }
            }
            "ellipse" => {
                if let (Some(rx), Some(ry)) = (length(child, "rx"), length(child, "ry")) {
                    let (cx, cy) = center(child);
                    out.extend(shapes::ellipse(cx, cy, rx, ry, config.ellipse_samples));
                }
            }
            "polygon" => {
                let vertices = shapes::parse_points(child.attribute("points").unwrap_or(""));
                out.extend(shapes::polygon(&vertices));
            }
            "polyline" => {
                out.extend(shapes::parse_points(child.attribute("points").unwrap_or("")));
            }
            "line" => {
                let coord = |name| length(child, name).unwrap_or(0.0);
                out.push(Point::new(coord("x1"), coord("y1")));
                out.push(Point::new(coord("x2"), coord("y2")));
            }
            _ => collect(child, config, out, elements),
        }
        if out.len() > before {
            *elements += 1;
        }
    }
}

fn center(node: Node) -> (f64, f64) {
    (
        length(node, "cx").unwrap_or(0.0),
        length(node, "cy").unwrap_or(0.0),
    )
}

/// Read a numeric attribute, ignoring a trailing unit such as `px`.
/// Percentages are not resolved and read as absent.
fn length(node: Node, name: &str) -> Option<f64> {
    let raw = node.attribute(name)?.trim();
    if raw.ends_with('%') {
        return None;
    }
    let end = raw
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(raw.len());
    raw[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The frame declared by `viewBox`, else by `width`/`height` at the origin.
fn declared_frame(root: Node) -> Option<Rect> {
    if let Some(raw) = root.attribute("viewBox") {
        let values: Vec<f64> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if let [x, y, w, h] = values[..] {
            return Some(Rect::new(x, y, x + w, y + h));
        }
    }
    let w = length(root, "width")?;
    let h = length(root, "height")?;
    Some(Rect::new(0.0, 0.0, w, h))
}
