//! GPX 1.1 track export.

use std::fmt::Write;
use std::path::Path;

use crate::geom::GeoPoint;

/// Render `points` as a single-track, single-segment GPX 1.1 document.
/// No elevation or time is written.
pub fn to_gpx(name: &str, points: &[GeoPoint]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<gpx version=\"1.1\" creator=\"shape2route\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
    );
    out.push_str("  <trk>\n");
    let _ = writeln!(out, "    <name>{}</name>", escape(name));
    out.push_str("    <trkseg>\n");
    for p in points {
        let _ = writeln!(out, "      <trkpt lat=\"{}\" lon=\"{}\"></trkpt>", p.lat, p.lng);
    }
    out.push_str("    </trkseg>\n");
    out.push_str("  </trk>\n");
    out.push_str("</gpx>\n");
    out
}

/// Write a GPX file. The route itself is not modified.
pub fn write_gpx(path: &Path, name: &str, points: &[GeoPoint]) -> std::io::Result<()> {
    std::fs::write(path, to_gpx(name, points))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_document() {
        let gpx = to_gpx("Loop & back", &[GeoPoint::new(40.5, -74.25), GeoPoint::new(40.75, -74.0)]);
        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<gpx version=\"1.1\" creator=\"shape2route\" xmlns=\"http://www.topografix.com/GPX/1/1\">
  <trk>
    <name>Loop &amp; back</name>
    <trkseg>
      <trkpt lat=\"40.5\" lon=\"-74.25\"></trkpt>
      <trkpt lat=\"40.75\" lon=\"-74\"></trkpt>
    </trkseg>
  </trk>
</gpx>
";
        assert_eq!(gpx, expected);
    }

    #[test]
    fn empty_route_has_empty_segment() {
        let gpx = to_gpx("", &[]);
        assert!(gpx.contains("<trkseg>\n    </trkseg>"));
        assert!(!gpx.contains("<trkpt"));
    }
}
