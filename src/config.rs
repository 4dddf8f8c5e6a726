//! JSON configuration for the resize tool and the dataset catalog.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::pipeline;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_RESIZE_CONFIG: &str = "resize_config.json";

/// Data root used when the config does not name one.
pub const DEFAULT_DATA_ROOT: &str = "experiments/data";

/// File that sits next to category directories and is never an image.
pub const ATTRIBUTIONS_FILE: &str = "attributions.json";

/// Settings for a batch resize run, as stored in `resize_config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResizeConfig {
    /// Dataset directory under the data root.
    pub input_dir: String,

    /// Output directory under the data root.
    pub output_dir: String,

    /// Target width in pixels.
    pub width: u32,

    /// Target height in pixels.
    pub height: u32,

    /// Center-crop instead of scaling.
    #[serde(default)]
    pub crop: bool,

    /// Write every output as PNG.
    #[serde(default)]
    pub png: bool,

    /// Per-step grow/shrink factor used while scaling.
    #[serde(default = "default_resize_factor")]
    pub resize_factor: f32,

    /// Largest fraction of either dimension that may be zero padding.
    #[serde(default = "default_zero_pad_limit")]
    pub zero_pad_limit: f32,

    /// Root that `input_dir` and `output_dir` live under.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// JPEG quality for `.jpg`/`.jpeg` outputs.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    #[serde(skip)]
    base_dir: PathBuf,
}

const fn default_resize_factor() -> f32 {
    0.1
}

const fn default_zero_pad_limit() -> f32 {
    0.5
}

fn default_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_ROOT)
}

const fn default_jpeg_quality() -> u8 {
    crate::image::DEFAULT_JPEG_QUALITY
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeOverrides {
    /// Replaces `data_root`. A relative root resolves against the working
    /// directory, not against the config file's directory.
    pub data_root: Option<PathBuf>,
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeConfig {
    /// Load a config file, apply `overrides` on top and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the merged
    /// config is invalid.
    pub fn load_with_overrides<P: AsRef<Path>>(
        path: P,
        overrides: &ResizeOverrides,
    ) -> Result<Self> {
        let mut config = Self::from_path(path)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Replace every field that `overrides` sets.
    pub fn apply_overrides(&mut self, overrides: &ResizeOverrides) {
        if let Some(root) = &overrides.data_root {
            self.set_data_root(root.clone());
        }
        if let Some(dir) = &overrides.input_dir {
            self.input_dir.clone_from(dir);
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
    }

    /// Load a config file. Relative paths inside it resolve against the
    /// directory holding the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Self = read_json(path)?;
        config.base_dir = parent_dir(path);
        Ok(config)
    }

    /// Parse a config from a JSON string, resolving relative paths against
    /// the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the schema.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| Error::ConfigParse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Replace the data root. Relative roots resolve against the working directory.
    pub fn set_data_root(&mut self, root: PathBuf) {
        self.data_root = root;
        self.base_dir = PathBuf::new();
    }

    /// Absolute or working-directory-relative data root.
    #[must_use]
    pub fn data_root(&self) -> PathBuf {
        resolve(&self.base_dir, &self.data_root)
    }

    /// Directory holding the raw category folders.
    #[must_use]
    pub fn input_path(&self) -> PathBuf {
        self.data_root().join(&self.input_dir)
    }

    /// Directory the resized category folders are written to.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.data_root().join(&self.output_dir)
    }

    /// Settings for a single-image [`pipeline::Resizer`].
    #[must_use]
    pub fn pipeline_config(&self) -> pipeline::Config {
        pipeline::Config {
            width: self.width,
            height: self.height,
            crop: self.crop,
            resize_factor: self.resize_factor,
            zero_pad_limit: self.zero_pad_limit,
            jpeg_quality: self.jpeg_quality,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.input_dir.trim().is_empty() {
            return Err(Error::invalid("input_dir", "must not be empty"));
        }
        if self.output_dir.trim().is_empty() {
            return Err(Error::invalid("output_dir", "must not be empty"));
        }
        if self.input_path() == self.output_path() {
            return Err(Error::invalid(
                "output_dir",
                "must differ from input_dir",
            ));
        }
        self.pipeline_config().validate()
    }
}

/// Pixel layout a dataset is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Grayscale,
    #[default]
    Rgb,
    Rgba,
}

impl ColorMode {
    /// Number of channels per pixel.
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// One named dataset in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSpec {
    /// Image root on this machine.
    pub local: PathBuf,

    /// Image root on a hosted notebook runtime.
    #[serde(default)]
    pub colab: Option<PathBuf>,

    #[serde(default)]
    pub color_mode: ColorMode,

    pub height: u32,

    pub width: u32,

    /// Multiplier applied to raw `[0, 255]` pixel values when normalizing.
    #[serde(default = "default_normalization_factor")]
    pub normalization_factor: f32,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_normalization_factor() -> f32 {
    1.0 / 255.0
}

const fn default_batch_size() -> usize {
    32
}

impl DatasetSpec {
    /// Validate the dataset entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension or the batch size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid("width/height", "must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(Error::invalid("batch_size", "must be greater than 0"));
        }
        if !self.normalization_factor.is_finite() {
            return Err(Error::invalid("normalization_factor", "must be finite"));
        }
        Ok(())
    }
}

/// Shared seed plus every named dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetCatalog {
    pub random_seed: u64,

    #[serde(flatten)]
    pub datasets: BTreeMap<String, DatasetSpec>,
}

impl DatasetCatalog {
    /// Load a catalog file. Relative dataset roots resolve against the
    /// directory holding the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut catalog: Self = read_json(path)?;
        let base = parent_dir(path);
        for spec in catalog.datasets.values_mut() {
            spec.local = resolve(&base, &spec.local);
            spec.colab = spec.colab.as_deref().map(|p| resolve(&base, p));
        }
        Ok(catalog)
    }

    /// Look up a dataset by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDataset`] when the name is not in the catalog.
    pub fn get(&self, name: &str) -> Result<&DatasetSpec> {
        self.datasets.get(name).ok_or_else(|| Error::UnknownDataset {
            name: name.to_string(),
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
