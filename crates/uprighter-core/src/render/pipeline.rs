//! Drawing one image onto the surface and serializing it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{RenderError, Surface};
use crate::decode::DecodedImage;
use crate::geometry::Geometry;

/// How orientation is handled when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Pixels are already oriented; draw them scaled to the target.
    Auto,
    /// Pixels are in stored order; correct orientation while drawing.
    #[default]
    Manual,
}

impl DrawMode {
    /// Pick the mode from whether decoding already applied orientation.
    pub fn from_auto_orientation(applies_orientation: bool) -> Self {
        if applies_orientation {
            DrawMode::Auto
        } else {
            DrawMode::Manual
        }
    }
}

/// Size the surface for `geometry` and draw `image` onto it.
///
/// In `Manual` mode the surface transform is built as translate, scale,
/// rotate, then the orientation matrix, and the image is drawn into the
/// geometry's draw box. In `Auto` mode the image is drawn straight into the
/// target box.
pub fn draw(
    surface: &mut Surface,
    image: &DecodedImage,
    geometry: &Geometry,
    mode: DrawMode,
) -> Result<(), RenderError> {
    let target = geometry.target;
    surface.reset(target.width, target.height)?;

    match mode {
        DrawMode::Auto => surface.draw_image(
            image,
            0.0,
            0.0,
            target.width as f64,
            target.height as f64,
        ),
        DrawMode::Manual => {
            let ops = geometry.affine.canvas_ops();
            surface.translate(ops.translate.0, ops.translate.1);
            surface.scale(ops.scale.0, ops.scale.1);
            surface.rotate(ops.rotate);
            surface.transform(&geometry.affine.matrix());
            trace!(transform = ?surface.current_transform(), "surface transform");

            let draw_box = geometry.draw_box;
            surface.draw_image(
                image,
                0.0,
                0.0,
                draw_box.width as f64,
                draw_box.height as f64,
            )
        }
    }
}

/// Draw `image` and encode the surface as a JPEG data URL.
pub fn render(
    surface: &mut Surface,
    image: &DecodedImage,
    geometry: &Geometry,
    mode: DrawMode,
    quality: u8,
) -> Result<String, RenderError> {
    draw(surface, image, geometry, mode)?;
    surface.to_data_url(quality)
}
