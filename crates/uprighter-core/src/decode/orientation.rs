//! EXIF orientation extraction from raw file bytes.
//!
//! The metadata block is located with `kamadak-exif`'s container reader, which
//! understands JPEG APP1 segments, bare TIFF, PNG `eXIf` chunks, WebP and HEIF.
//! The Orientation tag is then looked up in the primary IFD.
//!
//! Missing, truncated or malformed metadata resolves to
//! [`Orientation::Normal`]; nothing here returns an error.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use tracing::{trace, warn};

use super::Orientation;

/// Read the EXIF orientation of an encoded image.
///
/// Returns `Orientation::Normal` when the buffer has no metadata block, the
/// block has no Orientation tag, or the tag value is outside 1-8.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    match read_tag_value(bytes) {
        Some(value) => Orientation::from_code(value).unwrap_or_else(|| {
            warn!(value, "EXIF orientation out of range, using identity");
            Orientation::Normal
        }),
        None => Orientation::Normal,
    }
}

/// Raw Orientation tag value from the primary IFD, if any.
fn read_tag_value(bytes: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(bytes);

    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(e) => {
            trace!(error = %e, "no readable EXIF data");
            return None;
        }
    };

    let field = exif.get_field(Tag::Orientation, In::PRIMARY);
    if field.is_none() {
        trace!("EXIF data without an Orientation tag");
    }
    field.and_then(|field| field.value.get_uint(0))
}
