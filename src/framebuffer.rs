//! RGBA pixel buffer for raster export.
//!
//! Rows are padded to a 64-byte stride so each row starts on a cache-line
//! boundary; encoders read the tightly packed copy from
//! [`Framebuffer::to_compact_pixels`].

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 1 << 16;

/// Raster canvas with straight (non-premultiplied) RGBA pixels.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order, `stride` bytes per row.
    pixels: Vec<u8>,
    /// Stride in bytes (row bytes plus alignment padding).
    stride: usize,
    /// Active clip as `[x0, y0, x1, y1)` in pixels.
    clip: Option<[u32; 4]>,
}

impl Framebuffer {
    /// Create a transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero or larger than
    /// [`MAX_DIMENSION`].
    ///
    /// # Example
    ///
    /// ```
    /// use journal_style::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let invalid = Error::InvalidDimensions { width, height };
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(invalid);
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        let len = stride.checked_mul(height as usize).ok_or(invalid)?;

        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
            stride,
            clip: None,
        })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Restrict blending to the pixel rectangle `[x0, x1) x [y0, y1)`.
    ///
    /// `None` removes the clip. [`Framebuffer::set_pixel`] and
    /// [`Framebuffer::clear`] ignore it.
    pub fn set_clip(&mut self, clip: Option<[u32; 4]>) {
        self.clip = clip;
    }

    /// Current clip rectangle.
    #[must_use]
    pub const fn clip(&self) -> Option<[u32; 4]> {
        self.clip
    }

    /// Fill the whole buffer with one color (no blending).
    pub fn clear(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_array();
        let row_bytes = (self.width as usize) * 4;
        for row in self.pixels.chunks_exact_mut(self.stride) {
            for px in row[..row_bytes].chunks_exact_mut(4) {
                px.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Blend a color over the pixels `x0..x1` of row `y`, scaled by
    /// `coverage` (0.0-1.0).
    pub fn blend_span(&mut self, y: i32, x0: i32, x1: i32, color: Rgba, coverage: f32) {
        if y < 0 || y >= self.height as i32 || coverage <= 0.0 {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width as i32);
        let color = color.with_opacity(coverage);
        for x in start..end {
            self.blend_pixel(x as u32, y as u32, color);
        }
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(Rgba::from_array(px))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Blend a color at a specific pixel coordinate.
    ///
    /// Uses the "over" compositing operation:
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height || color.a == 0 {
            return;
        }
        if let Some([x0, y0, x1, y1]) = self.clip {
            if x < x0 || x >= x1 || y < y0 || y >= y1 {
                return;
            }
        }
        if color.a == 255 {
            self.set_pixel(x, y, color);
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = color.opacity();
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a > 0.0 {
            let blend = |src: u8, dst: u8| -> u8 {
                let src_f = f32::from(src) / 255.0;
                let dst_f = f32::from(dst) / 255.0;
                let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
                (out * 255.0).round() as u8
            };

            self.pixels[idx] = blend(color.r, self.pixels[idx]);
            self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
            self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
            self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
        }
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Pixel data without stride padding, as PNG/TIFF encoders expect.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;
        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }
}
