//! End-to-end runs of the batch resize over a synthetic category tree.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imgprep::{batch, ResizeConfig};

/// Lay out `<root>/experiments/data/raw/{cats,dogs}` plus a config file and
/// return the config path.
fn create_dataset(root: &Path, crop: bool, png: bool) -> anyhow::Result<PathBuf> {
    let raw = root.join("experiments").join("data").join("raw");
    let cats = raw.join("cats");
    let dogs = raw.join("dogs");
    fs::create_dir_all(&cats)?;
    fs::create_dir_all(&dogs)?;
    fs::write(raw.join("attributions.json"), b"{}")?;
    fs::write(cats.join("attributions.json"), b"{}")?;

    RgbImage::from_pixel(120, 90, Rgb([200, 10, 10])).save(cats.join("large.jpg"))?;
    RgbImage::from_pixel(40, 50, Rgb([10, 200, 10])).save(cats.join("small.png"))?;
    // Far too thin for either mode; always rejected by the pad limit.
    RgbImage::from_pixel(200, 8, Rgb([10, 10, 200])).save(dogs.join("banner.png"))?;
    fs::write(dogs.join("corrupt.png"), b"not an image")?;

    let config = serde_json::json!({
        "input_dir": "raw",
        "output_dir": "resized",
        "width": 64,
        "height": 64,
        "crop": crop,
        "png": png,
        "resize_factor": 0.1,
        "zero_pad_limit": 0.5
    });
    let path = root.join("resize_config.json");
    fs::write(&path, serde_json::to_vec_pretty(&config)?)?;
    Ok(path)
}

#[test]
fn scale_mode_writes_uniform_pngs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ResizeConfig::from_path(create_dataset(dir.path(), false, true)?)?;

    let report = batch::resize_dataset(&config)?;

    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 1);

    let out = config.output_path();
    assert!(out.join("cats").join("large.png").is_file());
    assert!(out.join("cats").join("small.png").is_file());
    assert!(!out.join("dogs").join("banner.png").exists());
    assert!(!out.join("attributions.json").exists());
    assert!(!out.join("cats").join("attributions.json").exists());

    let check = batch::verify_output(&out, 64, 64)?;
    assert_eq!(check.checked, 2);
    assert!(check.is_clean());
    Ok(())
}

#[test]
fn crop_mode_rejects_small_images() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ResizeConfig::from_path(create_dataset(dir.path(), true, false)?)?;

    let report = batch::resize_dataset(&config)?;

    // 40x50 needs 37.5% width padding: kept. 200x8 needs 87.5%: skipped.
    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 1);

    let large = config.output_path().join("cats").join("large.jpg");
    assert_eq!(image::image_dimensions(&large)?, (64, 64));

    // Cropped from the center of a uniform red image, so no padding shows.
    let decoded = image::open(&large)?.into_rgb8();
    let px = decoded.get_pixel(63, 63);
    assert!(px[0] > 150, "expected red corner, got {px:?}");
    Ok(())
}

#[test]
fn verify_flags_foreign_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ResizeConfig::from_path(create_dataset(dir.path(), false, true)?)?;
    batch::resize_dataset(&config)?;

    let out = config.output_path();
    RgbImage::new(10, 10).save(out.join("dogs").join("stray.png"))?;

    let check = batch::verify_output(&out, 64, 64)?;
    assert_eq!(check.checked, 3);
    assert_eq!(check.invalid, vec![out.join("dogs").join("stray.png")]);
    Ok(())
}

#[test]
fn rerun_overwrites_in_place() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ResizeConfig::from_path(create_dataset(dir.path(), false, true)?)?;

    let first = batch::resize_dataset(&config)?;
    let second = batch::resize_dataset(&config)?;

    assert_eq!(first, second);
    Ok(())
}
