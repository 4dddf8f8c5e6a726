//! Image saving utilities.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::{Error, Result};

/// Save an RGB image. The format is inferred from the extension.
///
/// # Arguments
///
/// * `img` - Image to write
/// * `path` - Output file path
/// * `quality` - JPEG quality (1-100), ignored for other formats
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoded.
pub fn save_image<P: AsRef<Path>>(img: &RgbImage, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            let mut output = BufWriter::new(File::create(path)?);
            let encoder = JpegEncoder::new_with_quality(&mut output, quality);
            img.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
            output.flush()?;
        }
        _ => {
            img.save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.JPG");
        let img = RgbImage::from_pixel(17, 9, Rgb([10, 120, 240]));

        save_image(&img, &path, 90).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (17, 9));
    }

    #[test]
    fn test_jpeg_is_complete_on_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let img = RgbImage::from_pixel(64, 64, Rgb([200, 40, 40]));

        save_image(&img, &path, 95).unwrap();

        // Decoding the last row fails if the tail of the stream is missing.
        let back = image::open(&path).unwrap().into_rgb8();
        let px = back.get_pixel(63, 63);
        assert!(px[0] > 150 && px[1] < 90, "unexpected pixel {px:?}");
    }

    #[test]
    fn test_jpeg_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jpg");

        assert!(matches!(
            save_image(&RgbImage::new(2, 2), &path, 95),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));

        save_image(&img, &path, 50).unwrap();

        let back = image::open(&path).unwrap().into_rgb8();
        assert_eq!(back, img);
    }

    #[test]
    fn test_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.notaformat");
        let img = RgbImage::new(2, 2);

        assert!(matches!(
            save_image(&img, &path, 95),
            Err(Error::ImageSave { .. })
        ));
    }
}
