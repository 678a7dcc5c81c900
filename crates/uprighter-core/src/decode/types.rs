//! Decoded pixels, orientation codes and decode errors.

use image::imageops::FilterType as ResizeFilter;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a file cannot be turned into pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No enabled codec recognizes the bytes.
    #[error("Unrecognized image format")]
    InvalidFormat,

    /// The codec recognized the format but failed partway.
    #[error("Image data could not be decoded: {0}")]
    CorruptedFile(String),

    /// The file decoded to zero pixels.
    #[error("Image has no pixels")]
    EmptyImage,
}

/// Resampling filter used when an image is drawn at a different size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    /// The matching `image::imageops` filter.
    pub fn to_image_filter(self) -> ResizeFilter {
        match self {
            Self::Nearest => ResizeFilter::Nearest,
            Self::Bilinear => ResizeFilter::Triangle,
            Self::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

/// The eight EXIF orientation states, by tag value.
///
/// The name describes what must be done to the stored grid to display it.
/// Codes 5-8 store the grid a quarter turn away from its display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirror across the main diagonal.
    Transpose = 5,
    Rotate90CW = 6,
    /// Mirror across the anti-diagonal.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Every orientation, ordered by tag value.
    pub const ALL: [Orientation; 8] = [
        Self::Normal,
        Self::FlipHorizontal,
        Self::Rotate180,
        Self::FlipVertical,
        Self::Transpose,
        Self::Rotate90CW,
        Self::Transverse,
        Self::Rotate270CW,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a tag value; `None` outside 1-8.
    pub fn from_code(value: u32) -> Option<Self> {
        let index = usize::try_from(value.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Whether display width and height are the stored height and width.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        self.code() > 4
    }
}

impl From<u32> for Orientation {
    /// Lenient lookup: unknown tag values display as stored.
    fn from(value: u32) -> Self {
        Self::from_code(value).unwrap_or_default()
    }
}

/// Tightly packed RGB8 pixels, row-major, `width * height * 3` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), Self::byte_len(width, height));
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        }
    }

    /// Copy into an `RgbImage`; `None` if the buffer length is inconsistent.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// RGB triple at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let start = (y as usize * self.width as usize + x as usize) * 3;
        let mut rgb = [0u8; 3];
        rgb.copy_from_slice(&self.pixels[start..start + 3]);
        rgb
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty() || self.width == 0 || self.height == 0
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mapping() {
        assert_eq!(FilterType::default(), FilterType::Bilinear);
        assert!(matches!(FilterType::Bilinear.to_image_filter(), ResizeFilter::Triangle));
        assert!(matches!(FilterType::Lanczos3.to_image_filter(), ResizeFilter::Lanczos3));
    }

    #[test]
    fn test_tag_values_map_in_order() {
        for (i, orientation) in Orientation::ALL.into_iter().enumerate() {
            let value = i as u32 + 1;
            assert_eq!(orientation.code() as u32, value);
            assert_eq!(Orientation::from_code(value), Some(orientation));
        }
    }

    #[test]
    fn test_out_of_range_tags() {
        for value in [0, 9, 255, u32::MAX] {
            assert_eq!(Orientation::from_code(value), None);
            assert_eq!(Orientation::from(value), Orientation::Normal);
        }
    }

    #[test]
    fn test_quarter_turn_codes_swap() {
        let swapping: Vec<u8> = Orientation::ALL
            .into_iter()
            .filter(|o| o.swaps_dimensions())
            .map(Orientation::code)
            .collect();
        assert_eq!(swapping, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_pixel_lookup() {
        let img = DecodedImage::new(2, 2, (0..12).collect());
        assert_eq!(img.pixel(0, 0), [0, 1, 2]);
        assert_eq!(img.pixel(1, 1), [9, 10, 11]);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_empty_image() {
        assert!(DecodedImage::new(0, 5, vec![]).is_empty());
    }

    #[test]
    fn test_rgb_image_conversion_keeps_layout() {
        let img = DecodedImage::new(3, 1, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let rgb = img.to_rgb_image().unwrap();
        assert_eq!(rgb.get_pixel(2, 0).0, [7, 8, 9]);
        assert_eq!(DecodedImage::from_rgb_image(rgb), img);

        let broken = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0; 3],
        };
        assert!(broken.to_rgb_image().is_none());
    }

    #[test]
    fn test_decode_error_messages() {
        assert_eq!(
            DecodeError::CorruptedFile("eof".into()).to_string(),
            "Image data could not be decoded: eof"
        );
        assert_eq!(DecodeError::EmptyImage.to_string(), "Image has no pixels");
    }
}
