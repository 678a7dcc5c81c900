//! Uprighter Core - orientation-correcting image conversion
//!
//! This crate turns encoded image files into JPEG `data:` URLs that display
//! upright and fit within an optional longest-edge cap.
//!
//! # Module Structure
//!
//! - `decode` - Pixel decoding and EXIF orientation reading
//! - `geometry` - Target size and orientation transform resolution
//! - `render` - Software drawing surface, draw pipeline and JPEG encoding
//!
//! # Example
//!
//! ```ignore
//! use uprighter_core::{convert, ConvertOptions};
//!
//! let files = vec![std::fs::read("photo.jpg")?];
//! let urls = convert(&files, &ConvertOptions::with_max_size(1024))?;
//! assert!(urls[0].starts_with("data:image/jpeg;base64,"));
//! ```

pub mod decode;
pub mod geometry;
pub mod render;

mod convert;

pub use convert::{convert, convert_with, ConvertError, ConvertOptions};
pub use decode::{
    read_orientation, DecodeError, DecodedImage, FilterType, ImageDecoder, Orientation,
    OrientingDecoder, RawDecoder,
};
pub use geometry::{
    resolve_affine, resolve_geometry, resolve_target_size, AffineParameters, Dimensions, Geometry,
    Matrix,
};
pub use render::{render, DrawMode, RenderError, Surface, DEFAULT_QUALITY};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let geometry = resolve_geometry(4000, 3000, Orientation::Rotate90CW, Some(1000));
        assert_eq!(geometry.target, resolve_target_size(3000, 4000, Some(1000)));
        assert_eq!(
            geometry.affine.matrix(),
            resolve_affine(750, 1000, Orientation::Rotate90CW).matrix()
        );
    }

    #[test]
    fn test_unreadable_input_reads_as_normal() {
        assert_eq!(read_orientation(b"not an image"), Orientation::Normal);
    }
}
