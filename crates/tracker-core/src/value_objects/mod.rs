//! Value objects - immutable types that represent domain concepts

mod image;
mod page;

pub use image::{ImagePolicy, ValidatedImage, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_MAX_IMAGE_BYTES};
pub use page::PageRequest;
