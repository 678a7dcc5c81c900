//! Image decoding and orientation metadata.
//!
//! This module provides functionality for:
//! - Reading the EXIF orientation code from raw file bytes
//! - Decoding JPEG, PNG and WebP files into RGB pixels
//! - Optionally applying the EXIF orientation while decoding
//!
//! # Examples
//!
//! ```ignore
//! use uprighter_core::decode::{decode_image, read_orientation};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let orientation = read_orientation(&bytes);
//! let image = decode_image(&bytes).unwrap();
//! println!("{}x{} stored, orientation {}", image.width, image.height, orientation.code());
//! ```

mod decoder;
mod orientation;
mod types;

pub use decoder::{decode_image, decode_oriented, ImageDecoder, OrientingDecoder, RawDecoder};
pub use orientation::read_orientation;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};

#[cfg(test)]
pub(crate) use decoder::apply_orientation;
#[cfg(test)]
pub(crate) use orientation::test_support;
