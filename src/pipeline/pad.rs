//! Center cropping and bottom/right zero padding.

use image::imageops;
use image::RgbImage;

/// Cut every side longer than its target down to the target, keeping the
/// centered window. Shorter sides are left as they are.
#[must_use]
pub fn center_crop(img: RgbImage, width: u32, height: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w <= width && h <= height {
        return img;
    }

    let (x, crop_w) = centered_window(w, width);
    let (y, crop_h) = centered_window(h, height);

    imageops::crop_imm(&img, x, y, crop_w, crop_h).to_image()
}

fn centered_window(dim: u32, target: u32) -> (u32, u32) {
    if dim > target {
        ((dim - target) / 2, target)
    } else {
        (0, dim)
    }
}

/// Fraction of `target` that would be padding if a side of length `dim` were
/// extended to it. Negative when the side is already longer.
#[must_use]
pub fn pad_fraction(dim: u32, target: u32) -> f64 {
    1.0 - f64::from(dim) / f64::from(target)
}

/// Extend `img` with black pixels on the bottom and right to exactly
/// `width` x `height`.
///
/// Returns `None` when either side would need more than `limit` of its
/// target filled with padding. Images already at least as large as the
/// target are returned unchanged.
#[must_use]
pub fn zero_pad(img: RgbImage, width: u32, height: u32, limit: f32) -> Option<RgbImage> {
    let (w, h) = img.dimensions();
    if w >= width && h >= height {
        return Some(img);
    }

    let limit = f64::from(limit);
    if pad_fraction(h, height) > limit || pad_fraction(w, width) > limit {
        tracing::debug!(
            "{w}x{h} exceeds zero pad limit {limit} for {width}x{height}, skipping"
        );
        return None;
    }

    let mut canvas = RgbImage::new(width, height);
    imageops::replace(&mut canvas, &img, 0, 0);
    Some(canvas)
}
