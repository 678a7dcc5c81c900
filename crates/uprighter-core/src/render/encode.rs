//! Surface serialization: RGB8 to baseline JPEG to `data:` URL.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

/// JPEG quality used when none is configured.
pub const DEFAULT_QUALITY: u8 = 92;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Reasons a pixel buffer cannot be encoded.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Pixel buffer holds {actual} bytes, {expected} needed for RGB8")]
    InvalidPixelData { expected: usize, actual: usize },

    #[error("Cannot encode a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("JPEG encoder failed: {0}")]
    EncodingFailed(String),
}

/// Encode a packed RGB8 buffer as JPEG.
///
/// `quality` is clamped to 1-100.
///
/// # Errors
///
/// Fails on a zero-sized image, a buffer whose length is not
/// `width * height * 3`, or an encoder error.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut jpeg = Vec::with_capacity(expected / 8);
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(jpeg)
}

/// Wrap JPEG bytes as a `data:image/jpeg;base64,` URL.
pub fn to_data_url(jpeg: &[u8]) -> String {
    let mut url = String::with_capacity(DATA_URL_PREFIX.len() + jpeg.len().div_ceil(3) * 4);
    url.push_str(DATA_URL_PREFIX);
    STANDARD.encode_string(jpeg, &mut url);
    url
}

/// JPEG bytes of a URL produced by [`to_data_url`]; `None` for anything else.
pub fn from_data_url(url: &str) -> Option<Vec<u8>> {
    let payload = url.strip_prefix(DATA_URL_PREFIX)?;
    STANDARD.decode(payload).ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_any_valid_buffer_encodes(
            width in 1u32..=40,
            height in 1u32..=40,
            quality in any::<u8>(),
            value in any::<u8>(),
        ) {
            let pixels = vec![value; (width * height * 3) as usize];
            let jpeg = encode_jpeg(&pixels, width, height, quality).unwrap();
            prop_assert!(jpeg.starts_with(&[0xFF, 0xD8]));

            let decoded = image::load_from_memory(&jpeg).unwrap();
            prop_assert_eq!((decoded.width(), decoded.height()), (width, height));
        }

        #[test]
        fn prop_length_mismatch_is_an_error(
            width in 1u32..=30,
            height in 1u32..=30,
            delta in prop_oneof![-9i64..=-1, 1i64..=9],
        ) {
            let expected = (width * height * 3) as i64;
            let len = (expected + delta).max(0) as usize;
            prop_assume!(len as i64 != expected);

            let result = encode_jpeg(&vec![0u8; len], width, height, 80);
            let is_length_error = matches!(result, Err(EncodeError::InvalidPixelData { .. }));
            prop_assert!(is_length_error);
        }
    }
}
