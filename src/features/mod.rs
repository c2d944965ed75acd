//! Turns glyph images into fixed-length 0/1 input vectors.

pub mod ptile;

use std::path::Path;

use image::{imageops::FilterType, GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::math::vector::Vector;

pub use ptile::ptile_threshold;

/// Size of the sampling grid; one input per cell, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureWindow {
    pub width: u32,
    pub height: u32,
}

impl FeatureWindow {
    pub fn new(width: u32, height: u32) -> FeatureWindow {
        FeatureWindow { width, height }
    }

    /// Number of inputs this window produces.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const INK: u8 = 255;

/// Marks pixels at or below `threshold` as ink (255), the rest as paper (0).
pub fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        if img.get_pixel(x, y).0[0] <= threshold { Luma([INK]) } else { Luma([0]) }
    })
}

/// Binarizes `img` with a P-tile threshold, scales it onto `window` and
/// reads it out row-major as 1.0 for ink and 0.0 for paper.
pub fn feature_vector(img: &GrayImage, window: FeatureWindow, ink_fraction: f64) -> Result<Vector> {
    if window.is_empty() {
        return Err(NnError::InvalidConfiguration(format!(
            "feature window {}x{} is empty",
            window.width, window.height
        )));
    }
    let threshold = ptile_threshold(img, ink_fraction)?;
    let binary = binarize(img, threshold);
    let sampled = image::imageops::resize(&binary, window.width, window.height, FilterType::Nearest);

    Ok(Vector::from_vec(
        sampled.pixels().map(|p| if p.0[0] == INK { 1.0 } else { 0.0 }).collect(),
    ))
}

/// Loads any supported image format and extracts its feature vector.
pub fn feature_vector_from_path<P: AsRef<Path>>(
    path: P,
    window: FeatureWindow,
    ink_fraction: f64,
) -> Result<Vector> {
    let img = image::open(path)?.to_luma8();
    feature_vector(&img, window, ink_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 8x8 white page with a dark vertical bar in columns 2..4.
    fn bar() -> GrayImage {
        GrayImage::from_fn(8, 8, |x, _| if (2..4).contains(&x) { Luma([10]) } else { Luma([240]) })
    }

    #[test]
    fn samples_window_row_major() {
        let v = feature_vector(&bar(), FeatureWindow::new(4, 2), 0.25).unwrap();
        assert_eq!(v.len(), 8);
        assert_eq!(v.as_slice(), &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn identity_window_keeps_every_pixel() {
        let v = feature_vector(&bar(), FeatureWindow::new(8, 8), 0.25).unwrap();
        assert_eq!(v.iter().filter(|x| **x == 1.0).count(), 16);
        assert!(v.iter().all(|x| *x == 0.0 || *x == 1.0));
    }

    #[test]
    fn empty_window_rejected() {
        assert!(feature_vector(&bar(), FeatureWindow::new(0, 3), 0.25).is_err());
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("ferrite-ocr-bar-{}.png", std::process::id()));
        bar().save(&path).unwrap();
        let v = feature_vector_from_path(&path, FeatureWindow::new(8, 1), 0.25).unwrap();
        assert_eq!(v.as_slice(), &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        std::fs::remove_file(path).unwrap();
        assert!(matches!(
            feature_vector_from_path("/nonexistent/glyph.png", FeatureWindow::new(2, 2), 0.2),
            Err(NnError::Image(_))
        ));
    }
}
