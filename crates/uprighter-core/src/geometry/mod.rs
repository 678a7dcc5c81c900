//! Target size and orientation transform resolution.
//!
//! Given the stored pixel dimensions, the EXIF orientation and an optional
//! longest-edge cap, this module computes:
//! - the display target size (aspect preserved, never upscaled)
//! - the affine transform that maps the stored grid onto the target
//! - the box the stored grid is drawn into before that transform
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - Orientations 5-8 store the grid rotated by a quarter turn, so the target
//!   is resolved against the swapped `(height, width)` and the grid is drawn
//!   into a `(target height, target width)` box

mod affine;
mod matrix;
mod size;

pub use affine::{
    resolve_affine, AffineParameters, CanvasOps, Coefficient, OrientationRow, ORIENTATION_TABLE,
};
pub use matrix::Matrix;
pub use size::{resolve_target_size, Dimensions};

use crate::decode::Orientation;

/// Everything the render step needs for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Surface size, i.e. the displayed output size.
    pub target: Dimensions,
    /// Box the stored grid is drawn into, in pre-transform coordinates.
    pub draw_box: Dimensions,
    /// Orientation correction for `target`.
    pub affine: AffineParameters,
}

/// Resolve target size, draw box and transform for a stored grid.
pub fn resolve_geometry(
    raw_width: u32,
    raw_height: u32,
    orientation: Orientation,
    max_size: Option<u32>,
) -> Geometry {
    let swap = orientation.swaps_dimensions();
    let displayed = if swap {
        Dimensions::new(raw_height, raw_width)
    } else {
        Dimensions::new(raw_width, raw_height)
    };

    let target = resolve_target_size(displayed.width, displayed.height, max_size);
    let draw_box = if swap { target.swapped() } else { target };

    Geometry {
        target,
        draw_box,
        affine: resolve_affine(target.width, target.height, orientation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_photo_scenario() {
        let geometry = resolve_geometry(4000, 3000, Orientation::Rotate90CW, Some(1000));

        assert_eq!(geometry.target, Dimensions::new(750, 1000));
        assert_eq!(geometry.draw_box, Dimensions::new(1000, 750));
        assert_eq!(
            geometry.affine.matrix().as_tuple(),
            (0.0, 1.0, -1.0, 0.0, 1000.0, 0.0)
        );
    }

    #[test]
    fn test_unrotated_small_photo_scenario() {
        let geometry = resolve_geometry(800, 600, Orientation::Normal, Some(1200));

        assert_eq!(geometry.target, Dimensions::new(800, 600));
        assert_eq!(geometry.draw_box, Dimensions::new(800, 600));
        assert!(geometry.affine.matrix().is_identity());
    }

    #[test]
    fn test_flip_does_not_swap() {
        let geometry = resolve_geometry(4000, 3000, Orientation::Rotate180, Some(1000));
        assert_eq!(geometry.target, Dimensions::new(1000, 750));
        assert_eq!(geometry.draw_box, Dimensions::new(1000, 750));
    }

    #[test]
    fn test_swap_for_all_transposed_codes() {
        for orientation in Orientation::ALL {
            let geometry = resolve_geometry(40, 30, orientation, None);
            if orientation.code() > 4 {
                assert_eq!(geometry.target, Dimensions::new(30, 40));
                assert_eq!(geometry.draw_box, Dimensions::new(40, 30));
            } else {
                assert_eq!(geometry.target, Dimensions::new(40, 30));
                assert_eq!(geometry.draw_box, Dimensions::new(40, 30));
            }
            assert_eq!(geometry.affine.target(), geometry.target);
            assert_eq!(geometry.affine.orientation(), orientation);
        }
    }
}
