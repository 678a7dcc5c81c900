//! Drawing and encoding pipeline.
//!
//! This module provides functionality for:
//! - A reusable software drawing surface with a canvas-style transform stack
//! - Drawing a decoded image onto the surface, correcting orientation on the way
//! - Encoding the surface as a JPEG `data:` URL
//!
//! # Architecture
//!
//! The surface is an explicit handle owned by the caller. Each render resets
//! it (size, pixels, transform) before drawing, so one surface can be reused
//! across a batch. Rendering borrows the surface mutably, which serializes
//! renders on the same surface.

mod encode;
mod pipeline;
mod surface;

pub use encode::{encode_jpeg, from_data_url, to_data_url, EncodeError, DEFAULT_QUALITY};
pub use pipeline::{draw, render, DrawMode};
pub use surface::{Surface, DEFAULT_MAX_SIDE};

use thiserror::Error;

/// Errors that can occur while drawing or encoding.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface cannot provide a pixel buffer of the requested size.
    #[error("Drawing surface unavailable for {width}x{height}: {reason}")]
    SurfaceUnavailable {
        width: u32,
        height: u32,
        reason: String,
    },

    /// The current transform collapses the drawing box.
    #[error("Surface transform is not invertible")]
    NonInvertibleTransform,

    /// The source image cannot be read.
    #[error("Invalid source image: {0}")]
    InvalidSource(String),

    /// Encoding the surface failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
