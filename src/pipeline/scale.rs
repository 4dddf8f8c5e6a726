//! Stepwise aspect-preserving scaling toward a target resolution.

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Dimension the scaling loop watches. The longer side of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracked {
    Height,
    Width,
}

impl Tracked {
    fn of(img: &RgbImage) -> Self {
        if img.height() > img.width() {
            Self::Height
        } else {
            Self::Width
        }
    }

    fn current(self, img: &RgbImage) -> u32 {
        match self {
            Self::Height => img.height(),
            Self::Width => img.width(),
        }
    }

    const fn target(self, width: u32, height: u32) -> u32 {
        match self {
            Self::Height => height,
            Self::Width => width,
        }
    }
}

/// Whether the image already fits inside `width` x `height`.
#[must_use]
pub fn fits_within(img: &RgbImage, width: u32, height: u32) -> bool {
    img.height() <= height && img.width() <= width
}

/// Grow or shrink `img` by repeated `1 ± factor` steps until its longer side
/// is just past the target, then crop the top-left `width` x `height` window.
///
/// Images that fit grow until the tracked side reaches its target. Images that
/// do not fit shrink until the tracked side is within its target, then always
/// take one growth step back, even if the tracked side never had to shrink.
/// The other side may still be short afterwards; padding deals with that.
///
/// A zero `width` or `height` returns the image unchanged.
///
/// # Arguments
///
/// * `img` - Source image
/// * `width` - Target width
/// * `height` - Target height
/// * `factor` - Step size in (0, 1)
#[must_use]
pub fn scale_to_fit(img: RgbImage, width: u32, height: u32, factor: f32) -> RgbImage {
    if width == 0 || height == 0 {
        return img;
    }

    let tracked = Tracked::of(&img);
    let target = tracked.target(width, height);
    let mut img = img;

    if fits_within(&img, width, height) {
        while tracked.current(&img) < target {
            img = step(&img, 1.0 + factor);
        }
    } else {
        while tracked.current(&img) > target {
            img = step(&img, 1.0 - factor);
        }

        img = step(&img, 1.0 + factor);
    }

    let (w, h) = img.dimensions();
    if w <= width && h <= height {
        return img;
    }

    imageops::crop_imm(&img, 0, 0, w.min(width), h.min(height)).to_image()
}

/// Resize both sides by `factor` with bilinear filtering.
///
/// Each side moves by at least one pixel so the scaling loops terminate for
/// tiny images and tiny factors.
fn step(img: &RgbImage, factor: f32) -> RgbImage {
    let (w, h) = img.dimensions();
    let new_w = ensure_progress(w, scaled(w, factor), factor);
    let new_h = ensure_progress(h, scaled(h, factor), factor);

    tracing::trace!("step x{factor:.3}: {w}x{h} -> {new_w}x{new_h}");

    imageops::resize(img, new_w, new_h, FilterType::Triangle)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scaled(dim: u32, factor: f32) -> u32 {
    // Safe: factor is positive, result clamped to at least one pixel
    ((dim as f32 * factor).round() as u32).max(1)
}

fn ensure_progress(old: u32, new: u32, factor: f32) -> u32 {
    if factor > 1.0 && new <= old {
        old + 1
    } else if factor < 1.0 && new >= old {
        old.saturating_sub(1).max(1)
    } else {
        new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_landscape_grows_then_crops() {
        let img = RgbImage::new(50, 30);
        let out = scale_to_fit(img, 100, 100, 0.1);

        // Width is tracked and overshoots 100; height stays short of 100.
        assert_eq!(out.width(), 100);
        assert!(out.height() < 100);
    }

    #[test]
    fn test_large_portrait_shrinks_then_covers_height() {
        let img = RgbImage::new(300, 900);
        let out = scale_to_fit(img, 200, 200, 0.1);

        assert_eq!(out.height(), 200);
        assert!(out.width() <= 200);
    }

    #[test]
    fn test_exact_fit_unchanged() {
        let img = RgbImage::new(64, 64);
        let out = scale_to_fit(img, 64, 64, 0.1);

        assert_eq!(out.dimensions(), (64, 64));
    }

    #[test]
    fn test_tiny_image_terminates() {
        let img = RgbImage::new(1, 1);
        let out = scale_to_fit(img, 32, 32, 0.01);

        assert_eq!(out.dimensions(), (32, 32));
    }

    #[test]
    fn test_growth_step_even_without_shrink() {
        // Portrait image whose height fits but width does not: the tracked
        // side never shrinks, yet one growth step still runs (132x165).
        let img = RgbImage::new(120, 150);
        let out = scale_to_fit(img, 100, 200, 0.1);

        assert_eq!(out.dimensions(), (100, 165));
    }

    #[test]
    fn test_growth_step_keeps_short_side_within_pad_limit() {
        // 300x100 -> 330x110 -> crop 330x50; width padding is then 17.5%.
        let out = scale_to_fit(RgbImage::new(300, 100), 400, 50, 0.1);

        assert_eq!(out.dimensions(), (330, 50));
    }

    #[test]
    fn test_zero_target_returns_input() {
        let out = scale_to_fit(RgbImage::new(30, 10), 0, 10, 0.1);
        assert_eq!(out.dimensions(), (30, 10));
    }

    #[test]
    fn test_ensure_progress() {
        assert_eq!(ensure_progress(1, 1, 1.1), 2);
        assert_eq!(ensure_progress(10, 11, 1.1), 11);
        assert_eq!(ensure_progress(2, 2, 0.9), 1);
        assert_eq!(ensure_progress(1, 1, 0.9), 1);
        assert_eq!(ensure_progress(100, 90, 0.9), 90);
    }

    #[test]
    fn test_fits_within() {
        let img = RgbImage::new(10, 20);
        assert!(fits_within(&img, 10, 20));
        assert!(!fits_within(&img, 9, 20));
        assert!(!fits_within(&img, 10, 19));
    }
}
