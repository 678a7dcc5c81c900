//! Bounded target size computation.

use serde::{Deserialize, Serialize};

/// Pixel extent of a raw grid or a display target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The same extent with width and height exchanged.
    pub const fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn longest_edge(self) -> u32 {
        self.width.max(self.height)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Compute the target size for an image under an optional longest-edge cap.
///
/// `None` or `Some(0)` means no cap. Images already within the cap keep their
/// natural size (no upscaling). Otherwise both sides are scaled by
/// `max_size / longest_edge` and rounded to the nearest integer, so the longer
/// side equals `max_size` exactly and the shorter side is at least 1.
///
/// Zero-sized input is invalid and yields `(0, 0)`.
pub fn resolve_target_size(width: u32, height: u32, max_size: Option<u32>) -> Dimensions {
    if width == 0 || height == 0 {
        return Dimensions::default();
    }

    let max_size = match max_size {
        Some(max) if max > 0 && max < width.max(height) => max,
        _ => return Dimensions::new(width, height),
    };

    if width >= height {
        // Landscape or square: constrain by width
        Dimensions::new(max_size, scale_edge(height, max_size, width))
    } else {
        // Portrait: constrain by height
        Dimensions::new(scale_edge(width, max_size, height), max_size)
    }
}

/// `edge * max_size / longest`, rounded half away from zero, never below 1.
fn scale_edge(edge: u32, max_size: u32, longest: u32) -> u32 {
    let scaled = (edge as u64 * max_size as u64) as f64 / longest as f64;
    (scaled.round() as u32).max(1)
}
