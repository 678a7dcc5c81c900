//! Batch conversion bindings.
//!
//! # Example
//!
//! ```typescript
//! import { convert } from '@uprighter/wasm';
//!
//! // Options are optional; all fields default
//! const urls = convert([bytesA, bytesB], { maxSize: 1600, quality: 85 });
//! ```

use js_sys::{Array, Uint8Array};
use uprighter_core::ConvertOptions;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Convert image files into upright JPEG data URLs.
///
/// # Arguments
///
/// * `files` - Array of `Uint8Array`, one per encoded image
/// * `options` - `{ maxSize?: number, quality?: number, filter?: string }` or
///   `undefined`; `filter` is one of `'nearest'`, `'bilinear'`, `'lanczos3'`
///
/// # Returns
///
/// An array of `data:image/jpeg;base64,` strings in input order.
///
/// # Errors
///
/// Throws if an entry is not a `Uint8Array`, if the options object is
/// malformed, or if any input fails to decode or render. No partial results
/// are returned.
#[wasm_bindgen]
pub fn convert(files: Array, options: JsValue) -> Result<Array, JsValue> {
    let options = parse_options(options)?;

    let files = files
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .dyn_into::<Uint8Array>()
                .map(|bytes| bytes.to_vec())
                .map_err(|_| JsValue::from_str(&format!("Input {} is not a Uint8Array", index)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let urls = convert_files(&files, &options).map_err(|e| JsValue::from_str(&e))?;
    Ok(urls.into_iter().map(JsValue::from).collect())
}

fn parse_options(options: JsValue) -> Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ConvertOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

fn convert_files(files: &[Vec<u8>], options: &ConvertOptions) -> Result<Vec<String>, String> {
    uprighter_core::convert(files, options).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uprighter_core::render::{encode_jpeg, from_data_url};

    fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
        encode_jpeg(&vec![128u8; (width * height * 3) as usize], width, height, 90).unwrap()
    }

    #[test]
    fn test_convert_files_caps_size() {
        let files = vec![gray_jpeg(64, 32)];
        let urls = convert_files(&files, &ConvertOptions::with_max_size(16)).unwrap();

        let jpeg = from_data_url(&urls[0]).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_convert_files_reports_failing_index() {
        let files = vec![gray_jpeg(8, 8), b"garbage".to_vec()];
        let err = convert_files(&files, &ConvertOptions::default()).unwrap_err();
        assert!(err.contains("input 1"), "unexpected message: {}", err);
    }
}
