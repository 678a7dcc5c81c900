//! Orientation correction transforms.
//!
//! Each EXIF orientation maps to one row of [`ORIENTATION_TABLE`]. A row holds
//! symbolic coefficients; the translation terms refer to the target width `W`
//! and height `H` and are resolved once the target size is known.
//!
//! ```text
//! code |  a   b   c   d   e   f
//! -----+------------------------
//!   1  |  1   0   0   1   0   0
//!   2  | -1   0   0   1   W   0
//!   3  | -1   0   0  -1   W   H
//!   4  |  1   0   0  -1   0   H
//!   5  |  0   1   1   0   0   0
//!   6  |  0   1  -1   0   H   0
//!   7  |  0  -1  -1   0   H   W
//!   8  |  0  -1   1   0   0   W
//! ```
//!
//! For codes 6-8 the table's translation is expressed against the target
//! height/width where the draw box actually needs the width/height; the
//! pre-matrix translate in [`CanvasOps`] carries the difference, so the
//! composed transform lands the draw box exactly on the `W x H` surface.

use serde::{Deserialize, Serialize};

use super::{Dimensions, Matrix};
use crate::decode::Orientation;

/// A symbolic matrix coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    Zero,
    One,
    MinusOne,
    /// The target width.
    Width,
    /// The target height.
    Height,
}

impl Coefficient {
    fn resolve(self, target: Dimensions) -> f64 {
        match self {
            Coefficient::Zero => 0.0,
            Coefficient::One => 1.0,
            Coefficient::MinusOne => -1.0,
            Coefficient::Width => target.width as f64,
            Coefficient::Height => target.height as f64,
        }
    }
}

/// One row of the orientation table.
#[derive(Debug, Clone, Copy)]
pub struct OrientationRow {
    pub code: u8,
    pub coefficients: [Coefficient; 6],
}

use Coefficient::{Height as H, MinusOne as N, One as I, Width as W, Zero as O};

/// Correction matrices indexed by `code - 1`.
#[rustfmt::skip]
pub const ORIENTATION_TABLE: [OrientationRow; 8] = [
    OrientationRow { code: 1, coefficients: [I, O, O, I, O, O] },
    OrientationRow { code: 2, coefficients: [N, O, O, I, W, O] },
    OrientationRow { code: 3, coefficients: [N, O, O, N, W, H] },
    OrientationRow { code: 4, coefficients: [I, O, O, N, O, H] },
    OrientationRow { code: 5, coefficients: [O, I, I, O, O, O] },
    OrientationRow { code: 6, coefficients: [O, I, N, O, H, O] },
    OrientationRow { code: 7, coefficients: [O, N, N, O, H, W] },
    OrientationRow { code: 8, coefficients: [O, N, I, O, O, W] },
];

/// Rows must cover exactly codes 1-8, in order.
const fn table_is_complete(table: &[OrientationRow]) -> bool {
    if table.len() != 8 {
        return false;
    }
    let mut i = 0;
    while i < table.len() {
        if table[i].code as usize != i + 1 {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(table_is_complete(&ORIENTATION_TABLE));

/// The translate/scale/rotate steps applied before the orientation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasOps {
    pub translate: (f64, f64),
    pub scale: (f64, f64),
    /// Rotation in radians.
    pub rotate: f64,
}

impl Default for CanvasOps {
    fn default() -> Self {
        Self {
            translate: (0.0, 0.0),
            scale: (1.0, 1.0),
            rotate: 0.0,
        }
    }
}

impl CanvasOps {
    /// translate, then scale, then rotate.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::translation(self.translate.0, self.translate.1)
            .multiply(&Matrix::scaling(self.scale.0, self.scale.1))
            .multiply(&Matrix::rotation(self.rotate))
    }
}

/// Orientation correction for one target size.
///
/// The canonical value is the (orientation, target) pair; [`matrix`] and
/// [`canvas_ops`] are two views derived from it on demand.
///
/// [`matrix`]: AffineParameters::matrix
/// [`canvas_ops`]: AffineParameters::canvas_ops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineParameters {
    orientation: Orientation,
    target: Dimensions,
}

impl AffineParameters {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn target(&self) -> Dimensions {
        self.target
    }

    /// The table row for this orientation, resolved against the target size.
    pub fn matrix(&self) -> Matrix {
        let row = &ORIENTATION_TABLE[self.orientation.code() as usize - 1];
        let [a, b, c, d, e, f] = row.coefficients.map(|coef| coef.resolve(self.target));
        Matrix::new(a, b, c, d, e, f)
    }

    /// Steps applied to the drawing context before [`Self::matrix`].
    pub fn canvas_ops(&self) -> CanvasOps {
        let w = self.target.width as f64;
        let h = self.target.height as f64;
        let translate = match self.orientation {
            Orientation::Rotate90CW => (w - h, 0.0),
            Orientation::Transverse => (w - h, h - w),
            Orientation::Rotate270CW => (0.0, h - w),
            _ => (0.0, 0.0),
        };
        CanvasOps {
            translate,
            ..CanvasOps::default()
        }
    }

    /// `canvas_ops` followed by `matrix`: maps draw-box coordinates onto the
    /// target surface.
    pub fn composed(&self) -> Matrix {
        self.canvas_ops().to_matrix().multiply(&self.matrix())
    }
}

/// Resolve the correction for an orientation drawn onto a target surface.
pub fn resolve_affine(
    target_width: u32,
    target_height: u32,
    orientation: Orientation,
) -> AffineParameters {
    AffineParameters {
        orientation,
        target: Dimensions::new(target_width, target_height),
    }
}
