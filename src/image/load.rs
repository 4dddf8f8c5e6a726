//! Image loading utilities.

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// Load an image from disk as 8-bit RGB.
///
/// Grayscale, alpha and 16-bit inputs are converted so every image entering
/// the resize pipeline has the same pixel layout.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.into_rgb8())
}

/// Read `(width, height)` from the image header without decoding pixels.
///
/// # Errors
///
/// Returns an error if the format is unknown or the header is unreadable.
pub fn image_dimensions<P: AsRef<Path>>(path: P) -> Result<(u32, u32)> {
    let path = path.as_ref();

    image::image_dimensions(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}
