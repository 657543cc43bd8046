//! Vision and image handling for species identification.
//!
//! This module owns everything about the photo the user picks: the MIME
//! allow-list, the size ceiling, magic-byte detection for files read from
//! disk, and conversion to Gemini's `InlineData` format.
//!
//! # Submodules
//!
//! - `models`: Image upload type and validation constraints.
//! - `encoding`: Base64 encoding of an upload into an inline data part.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod encoding;
pub mod models;

pub use encoding::to_inline_data;
pub use models::{ImageFormat, ImageUpload, SelectedImage, MAX_IMAGE_SIZE_BYTES};
