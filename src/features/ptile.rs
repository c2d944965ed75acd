use image::GrayImage;

use crate::error::{NnError, Result};

/// P-tile threshold: the smallest gray level `t` such that at least
/// `ink_fraction` of all pixels are `<= t`.
///
/// Glyphs are dark on a light page, so the darkest `ink_fraction` of the
/// image is taken as ink.
pub fn ptile_threshold(img: &GrayImage, ink_fraction: f64) -> Result<u8> {
    if !(ink_fraction > 0.0 && ink_fraction <= 1.0) {
        return Err(NnError::InvalidConfiguration(format!(
            "ink fraction must be in (0, 1], got {ink_fraction}"
        )));
    }
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return Err(NnError::InvalidConfiguration("cannot threshold an empty image".into()));
    }

    let mut histogram = [0u64; 256];
    for p in img.pixels() {
        histogram[p.0[0] as usize] += 1;
    }

    let wanted = ((total as f64) * ink_fraction).ceil() as u64;
    let mut seen = 0;
    for (level, count) in histogram.iter().enumerate() {
        seen += count;
        if seen >= wanted {
            return Ok(level as u8);
        }
    }
    Ok(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    // 10 pixels with gray levels 0, 25, 50, ..., 225.
    fn ramp() -> GrayImage {
        GrayImage::from_fn(10, 1, |x, _| Luma([(x * 25) as u8]))
    }

    #[test]
    fn picks_level_covering_fraction() {
        assert_eq!(ptile_threshold(&ramp(), 0.1).unwrap(), 0);
        assert_eq!(ptile_threshold(&ramp(), 0.25).unwrap(), 50);
        assert_eq!(ptile_threshold(&ramp(), 0.35).unwrap(), 75);
        assert_eq!(ptile_threshold(&ramp(), 1.0).unwrap(), 225);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ptile_threshold(&ramp(), 0.0).is_err());
        assert!(ptile_threshold(&ramp(), 1.5).is_err());
        assert!(ptile_threshold(&ramp(), f64::NAN).is_err());
        assert!(ptile_threshold(&GrayImage::new(0, 0), 0.5).is_err());
    }
}
