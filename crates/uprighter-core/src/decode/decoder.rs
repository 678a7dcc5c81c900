//! File-to-pixels decoding, with or without EXIF orientation applied.
//!
//! Whether the decoding environment already orients pixels is a property of
//! the decoder, reported by [`ImageDecoder::applies_orientation`]. The render
//! pipeline picks its draw mode from that flag instead of probing anything.

use std::io::Cursor;

use image::{DynamicImage, ImageReader};

use super::{read_orientation, DecodeError, DecodedImage, Orientation};

/// Decodes an encoded file into RGB pixels.
pub trait ImageDecoder: Send + Sync {
    /// Decode one file.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;

    /// True when the returned pixels are already rotated/flipped according
    /// to the file's EXIF orientation.
    fn applies_orientation(&self) -> bool;
}

/// Decoder that returns the pixel grid exactly as stored in the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl ImageDecoder for RawDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        decode_image(bytes)
    }

    fn applies_orientation(&self) -> bool {
        false
    }
}

/// Decoder that applies the EXIF orientation while decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientingDecoder;

impl ImageDecoder for OrientingDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        decode_oriented(bytes)
    }

    fn applies_orientation(&self) -> bool {
        true
    }
}

/// Decode an image from bytes without applying EXIF orientation.
///
/// Supports every format enabled on the `image` crate (JPEG, PNG, WebP).
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized,
/// `DecodeError::CorruptedFile` if decoding fails and
/// `DecodeError::EmptyImage` if the image has a zero-length side.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = decode_dynamic(bytes)?;
    finish(img)
}

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The returned dimensions are the display dimensions, i.e. swapped for
/// orientations 5-8.
pub fn decode_oriented(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    // Extract orientation before decoding
    let orientation = read_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    finish(apply_orientation(img, orientation))
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn finish(img: DynamicImage) -> Result<DecodedImage, DecodeError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }
    Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
}

/// Apply EXIF orientation transformation to an image.
pub(crate) fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
