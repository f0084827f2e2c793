//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate. The resolution is recorded
//! in the `pHYs` chunk so page-layout tools place the image at its physical
//! size.

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::units::MM_PER_INCH;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// PNG encoder for framebuffer output.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a framebuffer to a PNG file, tagging it with `dpi` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P, dpi: Option<f32>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::encode(fb, &mut writer, dpi)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode a framebuffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer, dpi: Option<f32>) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        Self::encode(fb, &mut buffer, dpi)?;
        Ok(buffer)
    }

    fn encode<W: Write>(fb: &Framebuffer, sink: W, dpi: Option<f32>) -> Result<()> {
        let mut encoder = png::Encoder::new(sink, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(dpi) = dpi {
            let ppm = pixels_per_metre(dpi);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = encoder.write_header()?;
        // Use compact pixels to handle stride padding
        writer.write_image_data(&fb.to_compact_pixels())?;
        writer.finish()?;
        Ok(())
    }
}

/// `pHYs` stores pixels per metre.
fn pixels_per_metre(dpi: f32) -> u32 {
    (f64::from(dpi) * 1000.0 / f64::from(MM_PER_INCH)).round() as u32
}
