//! # imgprep
//!
//! Prepares image datasets for machine-learning experiments.
//!
//! Two entry points:
//!
//! - **Batch resizing** of a `category/image` tree to one uniform resolution.
//!   Images are scaled stepwise (or center-cropped), zero padded within a
//!   limit, and written to a mirrored output tree in parallel.
//! - **Dataset loading** of an image directory into shuffled, optionally
//!   normalized and batched `ndarray` tensors.
//!
//! ## Example
//!
//! ```no_run
//! use imgprep::{batch, ResizeConfig};
//!
//! # fn main() -> imgprep::Result<()> {
//! let config = ResizeConfig::from_path("resize_config.json")?;
//! let report = batch::resize_dataset(&config)?;
//! let check = batch::verify_output(&config.output_path(), config.width, config.height)?;
//!
//! println!("{} written, {} invalid", report.written, check.invalid_count());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod image;
pub mod pipeline;

pub use config::{ColorMode, DatasetCatalog, DatasetSpec, ResizeConfig, ResizeOverrides};
pub use dataset::{load_dataset, Dataset, LoadOptions};
pub use error::{Error, Result};
pub use pipeline::{Config, Resizer};
