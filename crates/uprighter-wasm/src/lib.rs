//! Uprighter WASM - WebAssembly bindings for Uprighter
//!
//! This crate exposes the uprighter-core conversion to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `convert` - Batch conversion of files into JPEG data URLs
//! - `orientation` - Orientation tag reading and geometry helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { convert } from '@uprighter/wasm';
//!
//! await init();
//!
//! const files = await Promise.all(
//!   inputs.map(async (f) => new Uint8Array(await f.arrayBuffer())),
//! );
//! const urls = convert(files, { maxSize: 1024 });
//! img.src = urls[0];
//! ```

use wasm_bindgen::prelude::*;

mod convert;
mod orientation;

pub use convert::convert;
pub use orientation::{orientation_matrix, read_orientation, target_size};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
