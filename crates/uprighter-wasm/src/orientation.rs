//! Orientation and geometry bindings.
//!
//! - [`read_orientation`] - EXIF orientation code of an encoded file
//! - [`target_size`] - Output size for stored dimensions and a size cap
//! - [`orientation_matrix`] - Canvas transform coefficients for a code

use uprighter_core::{decode, geometry, Orientation};
use wasm_bindgen::prelude::*;

/// Read the EXIF orientation code (1-8) of an encoded image.
///
/// Files without readable orientation metadata report 1.
#[wasm_bindgen]
pub fn read_orientation(bytes: &[u8]) -> u8 {
    decode::read_orientation(bytes).code()
}

/// Compute the upright output size as `[width, height]`.
///
/// `code` is the EXIF orientation; codes 5-8 swap the stored dimensions.
/// A missing or zero `max_size` keeps the natural size.
#[wasm_bindgen]
pub fn target_size(width: u32, height: u32, code: u8, max_size: Option<u32>) -> Vec<u32> {
    let orientation = Orientation::from(code as u32);
    let resolved = geometry::resolve_geometry(width, height, orientation, max_size);
    vec![resolved.target.width, resolved.target.height]
}

/// Orientation matrix `[a, b, c, d, e, f]` for a target of `width` x `height`.
///
/// Out-of-range codes give the identity.
#[wasm_bindgen]
pub fn orientation_matrix(width: u32, height: u32, code: u8) -> Vec<f64> {
    let orientation = Orientation::from(code as u32);
    let (a, b, c, d, e, f) = geometry::resolve_affine(width, height, orientation)
        .matrix()
        .as_tuple();
    vec![a, b, c, d, e, f]
}
