use std::path::Path;

use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

use crate::error::ExtractError;

/// Gray level used for transparent and background pixels.
pub const BACKGROUND: u8 = 255;

/// Load an image file as RGBA.
pub fn load(path: &Path) -> Result<RgbaImage, ExtractError> {
    let img = image::ImageReader::open(path)
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?
        .decode()
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?;
    Ok(img.into_rgba8())
}

/// Decode an in-memory image as RGBA.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, ExtractError> {
    image::load_from_memory(bytes)
        .map(|img| img.into_rgba8())
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))
}

/// Average RGB to gray. Pixels with alpha below `min_alpha` become
/// [`BACKGROUND`] so transparent regions never read as shape.
pub fn grayscale(img: &RgbaImage, min_alpha: u8) -> GrayImage {
    let (w, h) = img.dimensions();
    let mut gray = GrayImage::new(w, h);
    if w == 0 || h == 0 {
        return gray;
    }
    gray.par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let [r, g, b, a] = img.get_pixel(x as u32, y as u32).0;
                *out = if a < min_alpha {
                    BACKGROUND
                } else {
                    ((r as u16 + g as u16 + b as u16) / 3) as u8
                };
            }
        });
    gray
}

/// Minimum gap between the cutoff and the lightest level for the cutoff
/// level itself to count as ink.
pub const MIN_CONTRAST: u8 = 32;

/// Dark/light cutoff derived from the image's own gray-level distribution.
///
/// Levels strictly below `cutoff` are dark. When nothing is, `inclusive`
/// marks the cutoff level itself as dark, which happens only for heavy ink
/// on a clearly lighter background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub cutoff: u8,
    pub inclusive: bool,
}

impl Threshold {
    /// Gray level at `percentile` (0-100) of the sorted pixel values.
    pub fn percentile(gray: &GrayImage, percentile: f64) -> Self {
        let mut histogram = [0usize; 256];
        for p in gray.pixels() {
            histogram[p.0[0] as usize] += 1;
        }
        let total = gray.pixels().len();
        let rank = ((percentile.clamp(0.0, 100.0) / 100.0) * total as f64).ceil() as usize;
        let rank = rank.max(1);
        let mut seen = 0usize;
        let mut cutoff = BACKGROUND;
        for (level, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen >= rank {
                cutoff = level as u8;
                break;
            }
        }

        let below = histogram[..cutoff as usize].iter().sum::<usize>();
        let lightest = histogram.iter().rposition(|&count| count > 0).unwrap_or(0);
        let inclusive = below == 0 && lightest >= cutoff as usize + MIN_CONTRAST as usize;
        Self { cutoff, inclusive }
    }

    pub fn is_dark(&self, level: u8) -> bool {
        level < self.cutoff || (self.inclusive && level == self.cutoff)
    }

    pub fn count_dark(&self, gray: &GrayImage) -> usize {
        gray.pixels().filter(|p| self.is_dark(p.0[0])).count()
    }
}
