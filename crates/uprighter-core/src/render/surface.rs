//! Software drawing surface with a transformable coordinate system.
//!
//! The surface mirrors the subset of a 2D canvas context the render pipeline
//! needs: a resizable RGB pixel buffer, a current transform that
//! `translate` / `scale` / `rotate` / `transform` post-multiply, and
//! `draw_image` which paints a source image into a destination box under that
//! transform.
//!
//! # Algorithm
//!
//! `draw_image` first resamples the source to the destination box size with
//! the `image` crate's filters when the box is integral. The remaining mapping
//! is then a pure rotate/flip/translate, applied by inverse mapping: for each
//! surface pixel centre the inverse transform gives a source position, which
//! is sampled bilinearly. Quarter-turn transforms therefore land exactly on
//! source pixel centres and copy pixels without blending.

use std::borrow::Cow;

use super::encode::{encode_jpeg, to_data_url};
use super::RenderError;
use crate::decode::{DecodedImage, FilterType};
use crate::geometry::{Dimensions, Matrix};

/// Largest side length a surface accepts by default.
pub const DEFAULT_MAX_SIDE: u32 = 32_767;

/// A reusable RGB drawing surface.
///
/// A new surface is 0x0; [`Surface::reset`] must size it before drawing.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    transform: Matrix,
    filter: FilterType,
    max_side: u32,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Create an empty surface with the default size limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SIDE)
    }

    /// Create an empty surface that refuses sides longer than `max_side`.
    pub fn with_limit(max_side: u32) -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            transform: Matrix::IDENTITY,
            filter: FilterType::default(),
            max_side,
        }
    }

    /// Set the filter used when resampling images during `draw_image`.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        self.filter = filter;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Resize the surface, clear it to black and reset the transform.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::SurfaceUnavailable` for zero or oversized
    /// dimensions, or if the pixel buffer cannot be allocated.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let unavailable = |reason: String| RenderError::SurfaceUnavailable {
            width,
            height,
            reason,
        };

        if width == 0 || height == 0 {
            return Err(unavailable("dimensions must be non-zero".to_string()));
        }
        if width > self.max_side || height > self.max_side {
            return Err(unavailable(format!(
                "exceeds the {} pixel side limit",
                self.max_side
            )));
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| unavailable("pixel buffer size overflows".to_string()))?;

        self.pixels.clear();
        self.pixels
            .try_reserve_exact(len)
            .map_err(|e| unavailable(e.to_string()))?;
        self.pixels.resize(len, 0);

        self.width = width;
        self.height = height;
        self.transform = Matrix::IDENTITY;
        Ok(())
    }

    pub fn current_transform(&self) -> Matrix {
        self.transform
    }

    pub fn set_transform(&mut self, matrix: Matrix) {
        self.transform = matrix;
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.transform(&Matrix::translation(x, y));
    }

    pub fn scale(&mut self, x: f64, y: f64) {
        self.transform(&Matrix::scaling(x, y));
    }

    /// Rotate the coordinate system by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.transform(&Matrix::rotation(angle));
    }

    /// Post-multiply the current transform by `matrix`.
    pub fn transform(&mut self, matrix: &Matrix) {
        self.transform = self.transform.multiply(matrix);
    }

    /// Paint `image` into the box `(dx, dy, dw, dh)` of the current
    /// coordinate system.
    ///
    /// Parts of the box falling outside the surface are clipped. An empty
    /// image, box or surface draws nothing.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidSource` if the image buffer does not hold
    /// `width * height * 3` bytes, and `RenderError::NonInvertibleTransform`
    /// if the current transform collapses the box.
    pub fn draw_image(
        &mut self,
        image: &DecodedImage,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<(), RenderError> {
        let expected = image.width as usize * image.height as usize * 3;
        if image.pixels.len() != expected {
            return Err(RenderError::InvalidSource(format!(
                "{}x{} image holds {} bytes, expected {}",
                image.width,
                image.height,
                image.pixels.len(),
                expected
            )));
        }

        if image.is_empty() || self.pixels.is_empty() || dw <= 0.0 || dh <= 0.0 {
            return Ok(());
        }

        let source = self.resample_for_box(image, dw, dh)?;

        // Fills the whole surface 1:1, nothing to map
        if self.transform.is_identity()
            && dx == 0.0
            && dy == 0.0
            && source.width == self.width
            && source.height == self.height
            && dw == self.width as f64
            && dh == self.height as f64
        {
            self.pixels.copy_from_slice(&source.pixels);
            return Ok(());
        }

        // Source pixel space -> surface space
        let to_surface = self.transform.multiply(&Matrix::new(
            dw / source.width as f64,
            0.0,
            0.0,
            dh / source.height as f64,
            dx,
            dy,
        ));
        let to_source = to_surface
            .invert()
            .ok_or(RenderError::NonInvertibleTransform)?;

        let (x_range, y_range) = match self.covered_pixels(&to_surface, &source) {
            Some(ranges) => ranges,
            None => return Ok(()),
        };

        let (src_w, src_h) = (source.width as f64, source.height as f64);
        let row_stride = self.width as usize * 3;

        for py in y_range {
            for px in x_range.clone() {
                let (sx, sy) = to_source.apply(px as f64 + 0.5, py as f64 + 0.5);
                if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
                    continue;
                }

                let pixel = match self.filter {
                    FilterType::Nearest => source.pixel(sx as u32, sy as u32),
                    FilterType::Bilinear | FilterType::Lanczos3 => {
                        sample_bilinear(&source, sx - 0.5, sy - 0.5)
                    }
                };

                let idx = py as usize * row_stride + px as usize * 3;
                self.pixels[idx..idx + 3].copy_from_slice(&pixel);
            }
        }

        Ok(())
    }

    /// Raw RGB pixel buffer, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy the surface contents out as an image.
    pub fn snapshot(&self) -> DecodedImage {
        DecodedImage::new(self.width, self.height, self.pixels.clone())
    }

    /// Encode the surface as a JPEG data URL.
    pub fn to_data_url(&self, quality: u8) -> Result<String, RenderError> {
        let jpeg = encode_jpeg(&self.pixels, self.width, self.height, quality)?;
        Ok(to_data_url(&jpeg))
    }

    /// Resample `image` to the box size when the box is integral and differs
    /// from the image size; otherwise borrow it unchanged.
    fn resample_for_box<'a>(
        &self,
        image: &'a DecodedImage,
        dw: f64,
        dh: f64,
    ) -> Result<Cow<'a, DecodedImage>, RenderError> {
        let integral = dw.fract() == 0.0 && dh.fract() == 0.0;
        if !integral || (dw as u32 == image.width && dh as u32 == image.height) {
            return Ok(Cow::Borrowed(image));
        }

        let rgb = image
            .to_rgb_image()
            .ok_or_else(|| RenderError::InvalidSource("pixel buffer size mismatch".into()))?;
        let resized =
            image::imageops::resize(&rgb, dw as u32, dh as u32, self.filter.to_image_filter());
        Ok(Cow::Owned(DecodedImage::from_rgb_image(resized)))
    }

    /// Surface pixel ranges touched by the source rectangle, or `None` when it
    /// lies entirely outside the surface.
    fn covered_pixels(
        &self,
        to_surface: &Matrix,
        source: &DecodedImage,
    ) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let (w, h) = (source.width as f64, source.height as f64);
        let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)].map(|(x, y)| to_surface.apply(x, y));

        let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        let x0 = min_x.floor().clamp(0.0, self.width as f64) as u32;
        let x1 = max_x.ceil().clamp(0.0, self.width as f64) as u32;
        let y0 = min_y.floor().clamp(0.0, self.height as f64) as u32;
        let y1 = max_y.ceil().clamp(0.0, self.height as f64) as u32;

        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0..x1, y0..y1))
    }
}

/// Sample a pixel using bilinear interpolation.
///
/// Coordinates are in pixel-index space (pixel `i` is centred on `i`) and are
/// clamped to the image edges.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
