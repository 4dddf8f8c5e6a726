//! Image decoding and encoding helpers.

mod load;
mod save;

pub use load::{image_dimensions, load_image};
pub use save::save_image;

/// Default JPEG quality for `.jpg`/`.jpeg` outputs.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;
