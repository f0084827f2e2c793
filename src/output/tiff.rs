//! TIFF output encoder.
//!
//! Writes uncompressed RGBA strips. When a DPI is given it is recorded in
//! `XResolution`/`YResolution` with `ResolutionUnit = inch`, the TIFF
//! counterpart of the PNG `pHYs` chunk.

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tiff::encoder::{colortype, Rational, TiffEncoder as Writer};
use tiff::tags::ResolutionUnit;

/// Denominator used for fractional DPI values.
const DPI_DENOMINATOR: u32 = 100;

/// TIFF encoder for framebuffer output.
pub struct TiffEncoder;

impl TiffEncoder {
    /// Write a framebuffer to a TIFF file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or TIFF encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P, dpi: Option<f32>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::encode(fb, &mut writer, dpi)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode a framebuffer to TIFF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if TIFF encoding fails.
    pub fn to_bytes(fb: &Framebuffer, dpi: Option<f32>) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::encode(fb, &mut cursor, dpi)?;
        Ok(cursor.into_inner())
    }

    fn encode<W: Write + Seek>(fb: &Framebuffer, sink: &mut W, dpi: Option<f32>) -> Result<()> {
        let mut writer = Writer::new(sink)?;
        let mut image = writer.new_image::<colortype::RGBA8>(fb.width(), fb.height())?;
        if let Some(dpi) = dpi {
            image.resolution(ResolutionUnit::Inch, dpi_rational(dpi));
        }
        image.write_data(&fb.to_compact_pixels())?;
        Ok(())
    }
}

/// DPI as a TIFF rational, exact for whole numbers.
fn dpi_rational(dpi: f32) -> Rational {
    if dpi.fract() == 0.0 {
        Rational {
            n: dpi as u32,
            d: 1,
        }
    } else {
        Rational {
            n: (dpi * DPI_DENOMINATOR as f32).round() as u32,
            d: DPI_DENOMINATOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use tiff::decoder::{ifd::Value, Decoder};
    use tiff::tags::Tag;

    #[test]
    fn test_tiff_to_bytes() {
        let mut fb = Framebuffer::new(6, 4).unwrap();
        fb.clear(Rgba::BLUE);
        let bytes = TiffEncoder::to_bytes(&fb, None).unwrap();
        // Little- or big-endian TIFF header.
        assert!(bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*"));
    }

    #[test]
    fn test_tiff_round_trip_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fig.tiff");
        let fb = Framebuffer::new(7, 5).unwrap();
        TiffEncoder::write_to_file(&fb, &path, Some(300.0)).unwrap();

        let mut decoder = Decoder::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (7, 5));
    }

    #[test]
    fn test_resolution_tags() {
        let fb = Framebuffer::new(3, 3).unwrap();
        let bytes = TiffEncoder::to_bytes(&fb, Some(600.0)).unwrap();

        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        for tag in [Tag::XResolution, Tag::YResolution] {
            match decoder.get_tag(tag).unwrap() {
                Value::Rational(n, d) => assert_eq!((n, d), (600, 1)),
                other => panic!("unexpected {tag:?}: {other:?}"),
            }
        }
        // 2 = inch
        assert_eq!(decoder.get_tag_u32(Tag::ResolutionUnit).unwrap(), 2);
    }

    #[test]
    fn test_fractional_dpi() {
        let r = dpi_rational(72.5);
        assert_eq!((r.n, r.d), (7250, 100));
        let r = dpi_rational(300.0);
        assert_eq!((r.n, r.d), (300, 1));
    }
}
