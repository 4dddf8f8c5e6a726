//! Single-image resize pipeline: scale or crop, then zero pad.

mod pad;
mod resize;
mod scale;

pub use pad::{center_crop, pad_fraction, zero_pad};
pub use resize::{Config, Outcome, ResizeJob, Resizer};
pub use scale::{fits_within, scale_to_fit};
