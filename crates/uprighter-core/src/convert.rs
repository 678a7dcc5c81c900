//! Batch conversion of encoded files into orientation-corrected data URLs.
//!
//! All inputs are decoded first (on the rayon pool with the `parallel`
//! feature), then rendered one after another on a single surface. The first
//! failure aborts the batch; there are no partial results.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::{
    read_orientation, DecodeError, DecodedImage, FilterType, ImageDecoder, Orientation, RawDecoder,
};
use crate::geometry::resolve_geometry;
use crate::render::{render, DrawMode, RenderError, Surface, DEFAULT_QUALITY};

/// Options for a conversion batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Cap on the longer output side. `None` or 0 keeps the natural size.
    pub max_size: Option<u32>,
    /// JPEG quality (1-100).
    pub quality: u8,
    /// Resampling filter used when scaling.
    pub filter: FilterType,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_size: None,
            quality: DEFAULT_QUALITY,
            filter: FilterType::default(),
        }
    }
}

impl ConvertOptions {
    /// Options with a longest-edge cap and defaults otherwise.
    pub fn with_max_size(max_size: u32) -> Self {
        Self {
            max_size: Some(max_size),
            ..Self::default()
        }
    }
}

/// Errors that abort a conversion batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An input could not be decoded.
    #[error("Failed to decode input {index}: {source}")]
    Decode { index: usize, source: DecodeError },

    /// An input could not be drawn or encoded.
    #[error("Failed to render input {index}: {source}")]
    Render { index: usize, source: RenderError },
}

impl ConvertError {
    /// Position of the failing input in the batch.
    pub fn index(&self) -> usize {
        match self {
            ConvertError::Decode { index, .. } | ConvertError::Render { index, .. } => *index,
        }
    }
}

/// Convert encoded image files into JPEG data URLs.
///
/// Output `i` corresponds to input `i`. Pixels are decoded in stored order and
/// orientation is corrected while drawing.
///
/// # Errors
///
/// Returns the first decode or render failure, tagged with the input index.
/// Without a `max_size`, an image whose output side exceeds
/// [`DEFAULT_MAX_SIDE`](crate::render::DEFAULT_MAX_SIDE) fails with
/// `RenderError::SurfaceUnavailable`.
pub fn convert<B>(files: &[B], options: &ConvertOptions) -> Result<Vec<String>, ConvertError>
where
    B: AsRef<[u8]> + Sync,
{
    let mut surface = Surface::new();
    convert_with(files, options, &RawDecoder, &mut surface)
}

/// Convert with an explicit decoder and drawing surface.
///
/// The draw mode follows [`ImageDecoder::applies_orientation`]: pixels that
/// come out of the decoder already oriented are only scaled.
pub fn convert_with<B, D>(
    files: &[B],
    options: &ConvertOptions,
    decoder: &D,
    surface: &mut Surface,
) -> Result<Vec<String>, ConvertError>
where
    B: AsRef<[u8]> + Sync,
    D: ImageDecoder + ?Sized,
{
    let mode = DrawMode::from_auto_orientation(decoder.applies_orientation());
    surface.set_filter(options.filter);

    let images = decode_all(files, decoder)?;

    files
        .iter()
        .zip(&images)
        .enumerate()
        .map(|(index, (bytes, image))| {
            let orientation = match mode {
                DrawMode::Auto => Orientation::Normal,
                DrawMode::Manual => read_orientation(bytes.as_ref()),
            };
            let geometry =
                resolve_geometry(image.width, image.height, orientation, options.max_size);

            debug!(
                index,
                raw_width = image.width,
                raw_height = image.height,
                target_width = geometry.target.width,
                target_height = geometry.target.height,
                orientation = orientation.code(),
                ?mode,
                "rendering image"
            );

            render(surface, image, &geometry, mode, options.quality)
                .map_err(|source| ConvertError::Render { index, source })
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn decode_all<B, D>(files: &[B], decoder: &D) -> Result<Vec<DecodedImage>, ConvertError>
where
    B: AsRef<[u8]> + Sync,
    D: ImageDecoder + ?Sized,
{
    use rayon::prelude::*;

    files
        .par_iter()
        .enumerate()
        .map(|(index, bytes)| {
            decoder
                .decode(bytes.as_ref())
                .map_err(|source| ConvertError::Decode { index, source })
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_all<B, D>(files: &[B], decoder: &D) -> Result<Vec<DecodedImage>, ConvertError>
where
    B: AsRef<[u8]> + Sync,
    D: ImageDecoder + ?Sized,
{
    files
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            decoder
                .decode(bytes.as_ref())
                .map_err(|source| ConvertError::Decode { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::test_support::with_orientation;
    use crate::decode::OrientingDecoder;
    use crate::render::{encode_jpeg, from_data_url};

    /// Encode a gradient JPEG of the given size.
    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        encode_jpeg(&pixels, width, height, 90).unwrap()
    }

    fn output_dims(url: &str) -> (u32, u32) {
        let bytes = from_data_url(url).expect("data URL");
        let img = image::load_from_memory(&bytes).expect("decodable JPEG");
        (img.width(), img.height())
    }

    #[test]
    fn test_empty_batch() {
        let files: Vec<Vec<u8>> = Vec::new();
        assert!(convert(&files, &ConvertOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_natural_size_without_cap() {
        let files = [jpeg(80, 60)];
        let out = convert(&files, &ConvertOptions::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("data:image/jpeg;base64,"));
        assert_eq!(output_dims(&out[0]), (80, 60));
    }

    #[test]
    fn test_small_image_under_cap_unchanged() {
        let files = [jpeg(800, 600)];
        let out = convert(&files, &ConvertOptions::with_max_size(1200)).unwrap();
        assert_eq!(output_dims(&out[0]), (800, 600));
    }

    #[test]
    fn test_rotated_input_is_swapped_and_capped() {
        // 40x30 stored, orientation 6 => displayed 30x40 => capped to 8x10
        let files = [with_orientation(&jpeg(40, 30), 6)];
        let out = convert(&files, &ConvertOptions::with_max_size(10)).unwrap();
        assert_eq!(output_dims(&out[0]), (8, 10));
    }

    #[test]
    fn test_order_preserved() {
        let files = vec![jpeg(20, 10), with_orientation(&jpeg(20, 10), 8), jpeg(5, 7)];
        let out = convert(&files, &ConvertOptions::default()).unwrap();
        let dims: Vec<_> = out.iter().map(|url| output_dims(url)).collect();
        assert_eq!(dims, vec![(20, 10), (10, 20), (5, 7)]);
    }

    #[test]
    fn test_orienting_decoder_gives_same_sizes() {
        let files = vec![with_orientation(&jpeg(40, 30), 6), jpeg(40, 30)];
        let options = ConvertOptions::with_max_size(20);

        let manual = convert(&files, &options).unwrap();
        let mut surface = Surface::new();
        let auto = convert_with(&files, &options, &OrientingDecoder, &mut surface).unwrap();

        for (m, a) in manual.iter().zip(&auto) {
            assert_eq!(output_dims(m), output_dims(a));
        }
        assert_eq!(output_dims(&manual[0]), (15, 20));
    }

    #[test]
    fn test_repeat_conversion_is_stable() {
        let files = vec![with_orientation(&jpeg(30, 20), 3), jpeg(64, 48)];
        let options = ConvertOptions::with_max_size(32);

        let first = convert(&files, &options).unwrap();
        let second = convert(&files, &options).unwrap();

        let first_dims: Vec<_> = first.iter().map(|url| output_dims(url)).collect();
        let second_dims: Vec<_> = second.iter().map(|url| output_dims(url)).collect();
        assert_eq!(first_dims, second_dims);
        assert_eq!(first_dims, vec![(30, 20), (32, 24)]);
    }

    #[test]
    fn test_surface_reused_across_batch() {
        let files = vec![jpeg(50, 40), jpeg(10, 10)];
        let mut surface = Surface::new();
        let out =
            convert_with(&files, &ConvertOptions::default(), &RawDecoder, &mut surface).unwrap();

        assert_eq!(output_dims(&out[1]), (10, 10));
        // The surface keeps the size of the last image
        assert_eq!((surface.width(), surface.height()), (10, 10));
    }

    #[test]
    fn test_decode_failure_aborts_batch() {
        let files = vec![jpeg(10, 10), vec![0x00, 0x01, 0x02], jpeg(10, 10)];
        let err = convert(&files, &ConvertOptions::default()).unwrap_err();

        assert!(matches!(err, ConvertError::Decode { index: 1, .. }));
        assert_eq!(err.index(), 1);
    }

    #[test]
    fn test_surface_failure_aborts_batch() {
        let files = vec![jpeg(4, 4), jpeg(64, 64)];
        let mut surface = Surface::with_limit(16);
        let options = ConvertOptions::default();
        let err = convert_with(&files, &options, &RawDecoder, &mut surface).unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Render {
                index: 1,
                source: RenderError::SurfaceUnavailable { .. }
            }
        ));
    }

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert_eq!(options.max_size, None);
        assert_eq!(options.quality, DEFAULT_QUALITY);
        assert_eq!(options.filter, FilterType::Bilinear);
    }

    #[test]
    fn test_error_display() {
        let err = ConvertError::Decode {
            index: 2,
            source: DecodeError::InvalidFormat,
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode input 2: Unrecognized image format"
        );
    }
}
