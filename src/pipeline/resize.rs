//! Per-image resize driver.

use std::path::PathBuf;

use ::image::RgbImage;

use crate::error::{Error, Result};
use crate::image;

use super::pad::{center_crop, zero_pad};
use super::scale::scale_to_fit;

/// Configuration for resizing one image to the target resolution.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target width in pixels.
    pub width: u32,

    /// Target height in pixels.
    pub height: u32,

    /// Center-crop oversized sides instead of stepwise scaling.
    pub crop: bool,

    /// Per-step grow/shrink factor (0.0-1.0, exclusive).
    pub resize_factor: f32,

    /// Largest fraction of a side that may be filled with padding (0.0-1.0).
    pub zero_pad_limit: f32,

    /// Output JPEG quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            crop: false,
            resize_factor: 0.1,
            zero_pad_limit: 0.5,
            jpeg_quality: image::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::invalid("width", "must be greater than 0"));
        }

        if self.height == 0 {
            return Err(Error::invalid("height", "must be greater than 0"));
        }

        if !(self.resize_factor > 0.0 && self.resize_factor < 1.0) {
            return Err(Error::invalid(
                "resize_factor",
                "must be between 0.0 and 1.0 (exclusive)",
            ));
        }

        if !(0.0..=1.0).contains(&self.zero_pad_limit) {
            return Err(Error::invalid(
                "zero_pad_limit",
                "must be between 0.0 and 1.0",
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::invalid("jpeg_quality", "must be between 1 and 100"));
        }

        Ok(())
    }
}

/// One source image and where its resized copy goes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResizeJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// What happened to a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Output written at the target resolution.
    Written,
    /// Image would have needed more padding than allowed; nothing written.
    Skipped,
}

/// Resizes images to one fixed resolution.
#[derive(Debug, Clone)]
pub struct Resizer {
    config: Config,
}

impl Resizer {
    /// Create a resizer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Bring an in-memory image to the target resolution.
    ///
    /// Returns `None` if the image has to be rejected by the zero pad limit.
    #[must_use]
    pub fn transform(&self, img: RgbImage) -> Option<RgbImage> {
        let Config {
            width,
            height,
            crop,
            resize_factor,
            zero_pad_limit,
            ..
        } = self.config;

        let img = if crop {
            center_crop(img, width, height)
        } else {
            scale_to_fit(img, width, height, resize_factor)
        };

        zero_pad(img, width, height, zero_pad_limit)
    }

    /// Load, transform and save one image.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be decoded or the output cannot be
    /// written. A rejected image is not an error.
    pub fn process(&self, job: &ResizeJob) -> Result<Outcome> {
        let img = image::load_image(&job.input)?;
        let (w, h) = img.dimensions();

        let Some(resized) = self.transform(img) else {
            tracing::debug!("Skipping {} ({w}x{h})", job.input.display());
            return Ok(Outcome::Skipped);
        };

        image::save_image(&resized, &job.output, self.config.jpeg_quality)?;

        tracing::debug!(
            "Resized {} ({w}x{h}) -> {}",
            job.input.display(),
            job.output.display()
        );
        Ok(Outcome::Written)
    }
}
