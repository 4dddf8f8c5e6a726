//! Loading directory-structured image collections into tensors.
//!
//! Images are decoded, converted to the dataset's color mode and resized to
//! its resolution, giving HWC `f32` arrays with values in `[0, 255]`. File
//! order is shuffled deterministically from the catalog seed.

mod index;

pub use index::{index_images, is_image_file, IMAGE_EXTENSIONS};

use std::path::Path;

use image::imageops::FilterType;
use ndarray::{Array3, Array4, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::batch::progress_bar;
use crate::config::{ColorMode, DatasetCatalog, DatasetSpec};
use crate::error::{Error, Result};

/// One decoded image in height x width x channels layout.
pub type ImageArray = Array3<f32>;

/// A stack of images in batch x height x width x channels layout.
pub type BatchArray = Array4<f32>;

/// Switches applied on top of the catalog entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Multiply pixel values by the dataset's normalization factor.
    pub normalize: bool,

    /// Group samples into batches of the dataset's batch size.
    pub batch: bool,

    /// Read from the hosted-runtime root instead of the local one.
    pub colab: bool,
}

/// A loaded dataset, either as single samples or as batches.
#[derive(Debug, Clone)]
pub enum Dataset {
    Samples(Vec<ImageArray>),
    Batches(Vec<BatchArray>),
}

impl Dataset {
    /// Number of elements: samples or batches depending on the variant.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Samples(samples) => samples.len(),
            Self::Batches(batches) => batches.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of images, regardless of batching.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Samples(samples) => samples.len(),
            Self::Batches(batches) => batches.iter().map(|b| b.len_of(Axis(0))).sum(),
        }
    }
}

/// Load the named dataset from a catalog.
///
/// # Errors
///
/// Returns an error if the name is unknown, the entry is invalid, no images
/// are found or any image fails to decode.
pub fn load_dataset(catalog: &DatasetCatalog, name: &str, options: LoadOptions) -> Result<Dataset> {
    let spec = catalog.get(name)?;
    tracing::info!("Loading dataset {name}");
    load_from_spec(spec, catalog.random_seed, options)
}

/// Load a dataset described by `spec`, shuffling with `seed`.
///
/// # Errors
///
/// See [`load_dataset`].
pub fn load_from_spec(spec: &DatasetSpec, seed: u64, options: LoadOptions) -> Result<Dataset> {
    spec.validate()?;

    let root = if options.colab {
        spec.colab.as_deref().ok_or_else(|| {
            Error::invalid("colab", "dataset has no hosted-runtime root configured")
        })?
    } else {
        spec.local.as_path()
    };

    let mut paths = index_images(root)?;
    if paths.is_empty() {
        return Err(Error::EmptyDataset {
            path: root.to_path_buf(),
        });
    }
    tracing::info!("Found {} images in {}", paths.len(), root.display());

    let mut rng = StdRng::seed_from_u64(seed);
    paths.shuffle(&mut rng);

    let pb = progress_bar(paths.len(), "Decoding");
    let mut samples = paths
        .par_iter()
        .map(|path| {
            let sample = decode(path, spec.width, spec.height, spec.color_mode);
            pb.inc(1);
            sample
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    if options.normalize {
        let factor = spec.normalization_factor;
        for sample in &mut samples {
            sample.mapv_inplace(|v| v * factor);
        }
    }

    if options.batch {
        Ok(Dataset::Batches(into_batches(&samples, spec.batch_size)?))
    } else {
        Ok(Dataset::Samples(samples))
    }
}

/// Decode one image into an HWC array at `width` x `height`.
///
/// # Errors
///
/// Returns an error if the image cannot be opened or decoded.
pub fn decode(path: &Path, width: u32, height: u32, mode: ColorMode) -> Result<ImageArray> {
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    // Bilinear, no aspect preservation
    let resized = img.resize_exact(width, height, FilterType::Triangle);

    let raw = match mode {
        ColorMode::Grayscale => resized.into_luma8().into_raw(),
        ColorMode::Rgb => resized.into_rgb8().into_raw(),
        ColorMode::Rgba => resized.into_rgba8().into_raw(),
    };

    let shape = (height as usize, width as usize, mode.channels());
    let data: Vec<f32> = raw.into_iter().map(f32::from).collect();

    Array3::from_shape_vec(shape, data).map_err(|_| Error::ShapeMismatch {
        expected: format!("{shape:?}"),
        actual: "decoded buffer of a different length".to_string(),
    })
}

/// Stack samples into batches of `batch_size`; the last batch may be short.
///
/// # Errors
///
/// Returns an error if samples in one batch differ in shape.
pub fn into_batches(samples: &[ImageArray], batch_size: usize) -> Result<Vec<BatchArray>> {
    if batch_size == 0 {
        return Err(Error::invalid("batch_size", "must be greater than 0"));
    }

    samples
        .chunks(batch_size)
        .map(|chunk| {
            let views: Vec<ArrayView3<'_, f32>> = chunk.iter().map(Array3::view).collect();
            ndarray::stack(Axis(0), &views).map_err(|err| Error::ShapeMismatch {
                expected: "equal sample shapes within a batch".to_string(),
                actual: err.to_string(),
            })
        })
        .collect()
}
