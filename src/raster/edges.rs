//! Sobel edge seeding and 8-connected boundary walking.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::gradients::sobel_gradients;
use kurbo::Point;

/// Gradient magnitude per pixel.
pub type Magnitude = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Neighbor offsets in clockwise order (y down), starting east.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Index of east in [`DIRECTIONS`]. A raster scan reaches the seed moving east.
const EAST: usize = 0;

/// 3x3 Sobel gradient magnitude.
pub fn magnitude(gray: &GrayImage) -> Magnitude {
    sobel_gradients(gray)
}

/// Why a boundary walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// Came back around to the seed.
    ClosedLoop,
    /// Took the maximum number of steps.
    HitCap,
    /// No unvisited edge neighbor left.
    DeadEnd,
}

/// An ordered boundary in pixel coordinates.
#[derive(Debug, Clone)]
pub struct Walk {
    pub points: Vec<Point>,
    pub end: WalkEnd,
}

/// First pixel in raster order whose magnitude exceeds `threshold`.
pub fn find_seed(mag: &Magnitude, threshold: f64) -> Option<(u32, u32)> {
    mag.enumerate_pixels()
        .find(|(_, _, p)| p.0[0] as f64 > threshold)
        .map(|(x, y, _)| (x, y))
}

/// Walk the edge boundary from the first seed above `threshold`.
///
/// Each step scans the eight neighbors clockwise, starting just past the
/// direction we came from, so the walk keeps to the same side of the edge.
/// Returns `None` when no pixel exceeds the threshold.
pub fn walk_boundary(mag: &Magnitude, threshold: f64, max_steps: usize) -> Option<Walk> {
    let seed = find_seed(mag, threshold)?;
    let (w, h) = mag.dimensions();
    let is_edge = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && (x as u32) < w
            && (y as u32) < h
            && mag.get_pixel(x as u32, y as u32).0[0] as f64 > threshold
    };
    let index = |x: i32, y: i32| y as usize * w as usize + x as usize;

    let mut visited = vec![false; w as usize * h as usize];
    let (sx, sy) = (seed.0 as i32, seed.1 as i32);
    visited[index(sx, sy)] = true;
    let mut points = vec![Point::new(sx as f64, sy as f64)];
    let (mut x, mut y) = (sx, sy);
    let mut heading = EAST;

    for _ in 0..max_steps {
        let back = (heading + 4) % 8;
        let mut next = None;
        for k in 1..8 {
            let dir = (back + k) % 8;
            let (dx, dy) = DIRECTIONS[dir];
            let (nx, ny) = (x + dx, y + dy);
            if !is_edge(nx, ny) {
                continue;
            }
            if (nx, ny) == (sx, sy) && points.len() > 2 {
                points.push(Point::new(sx as f64, sy as f64));
                return Some(Walk {
                    points,
                    end: WalkEnd::ClosedLoop,
                });
            }
            if !visited[index(nx, ny)] {
                next = Some((nx, ny, dir));
                break;
            }
        }
        let Some((nx, ny, dir)) = next else {
            return Some(Walk {
                points,
                end: WalkEnd::DeadEnd,
            });
        };
        visited[index(nx, ny)] = true;
        points.push(Point::new(nx as f64, ny as f64));
        (x, y, heading) = (nx, ny, dir);
    }

    Some(Walk {
        points,
        end: WalkEnd::HitCap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(size: u32, lo: u32, hi: u32) -> Magnitude {
        let mut mag = Magnitude::new(size, size);
        for i in lo..=hi {
            for (x, y) in [(i, lo), (i, hi), (lo, i), (hi, i)] {
                mag.put_pixel(x, y, Luma([1000]));
            }
        }
        mag
    }

    #[test]
    fn walks_a_one_pixel_ring_back_to_seed() {
        let mag = ring(12, 2, 8);
        let walk = walk_boundary(&mag, 100.0, 1000).unwrap();
        assert_eq!(walk.end, WalkEnd::ClosedLoop);
        assert_eq!(walk.points.first(), Some(&Point::new(2.0, 2.0)));
        assert_eq!(walk.points.first(), walk.points.last());
        // Perimeter of a 7x7 ring is 24 pixels, plus the closing repeat.
        assert_eq!(walk.points.len(), 25);
    }

    #[test]
    fn step_cap_stops_the_walk() {
        let mag = ring(12, 2, 8);
        let walk = walk_boundary(&mag, 100.0, 5).unwrap();
        assert_eq!(walk.end, WalkEnd::HitCap);
        assert_eq!(walk.points.len(), 6);
    }

    #[test]
    fn open_stroke_dead_ends() {
        let mut mag = Magnitude::new(10, 10);
        for x in 1..6 {
            mag.put_pixel(x, 4, Luma([500]));
        }
        let walk = walk_boundary(&mag, 100.0, 1000).unwrap();
        assert_eq!(walk.end, WalkEnd::DeadEnd);
        assert_eq!(walk.points.len(), 5);
    }

    #[test]
    fn no_seed_below_threshold() {
        let mag = ring(12, 2, 8);
        assert!(walk_boundary(&mag, 5000.0, 1000).is_none());
    }

    #[test]
    fn sobel_finds_edge_of_dark_square() {
        let mut gray = GrayImage::from_pixel(10, 10, Luma([255]));
        for y in 3..7 {
            for x in 3..7 {
                gray.put_pixel(x, y, Luma([0]));
            }
        }
        let mag = magnitude(&gray);
        assert_eq!(mag.get_pixel(0, 0).0[0], 0);
        let seed = find_seed(&mag, 200.0).unwrap();
        assert_eq!(seed, (2, 2));
    }
}
