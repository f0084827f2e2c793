//! Writing figures to disk.
//!
//! [`save`] picks the format from [`SaveOptions::format`] or the file
//! extension, lowers the figure to a scene, optionally crops it to the drawn
//! content, and hands it to the matching encoder. Unset options fall back to
//! the figure style's export defaults (600 dpi, tight box with 0.01 in pad).

use crate::error::{Error, Result};
use crate::figure::{Figure, Target};
use crate::geometry::Rect;
use crate::output::{PdfEncoder, PngEncoder, SvgEncoder, TiffEncoder};
use crate::render::{rasterize, Scene};
use crate::style::SaveParams;
use crate::units::inches_to_points;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Scalable Vector Graphics.
    Svg,
    /// Portable Document Format.
    Pdf,
    /// Portable Network Graphics.
    Png,
    /// Tagged Image File Format.
    Tiff,
}

impl ExportFormat {
    /// Format for a file extension, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything other than `svg`,
    /// `pdf`, `png`, `tif` or `tiff`.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            "tif" | "tiff" => Ok(Self::Tiff),
            _ => Err(Error::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Format implied by a path; PNG when the path has no extension.
    ///
    /// # Errors
    ///
    /// See [`ExportFormat::from_extension`].
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension() {
            None => Ok(Self::Png),
            Some(ext) => Self::from_extension(&ext.to_string_lossy()),
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }

    /// Whether the format stores shapes rather than pixels.
    #[must_use]
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Svg | Self::Pdf)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim_start_matches('.'))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which part of the page to export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BBox {
    /// The whole figure at its nominal size.
    Full,
    /// The drawn content plus `pad_inches` on every side.
    Tight {
        /// Padding in inches.
        pad_inches: f32,
    },
}

impl BBox {
    /// The tight box with the default 0.01 in pad.
    #[must_use]
    pub fn tight() -> Self {
        Self::Tight { pad_inches: 0.01 }
    }
}

/// Per-call export settings; `None` fields use the figure style's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaveOptions {
    /// Raster resolution in dots per inch.
    pub dpi: Option<f32>,
    /// Output format; inferred from the extension when `None`.
    pub format: Option<ExportFormat>,
    /// Page box.
    pub bbox: Option<BBox>,
}

impl SaveOptions {
    /// All defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resolution.
    #[must_use]
    pub fn dpi(mut self, dpi: f32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    /// Force a format regardless of extension.
    #[must_use]
    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the page box.
    #[must_use]
    pub fn bbox(mut self, bbox: BBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Settings with every default filled in and checked.
    fn resolve(&self, defaults: &SaveParams) -> Result<(f32, BBox)> {
        let dpi = self.dpi.unwrap_or(defaults.dpi);
        if !(dpi.is_finite() && dpi > 0.0) {
            return Err(Error::invalid("dpi", dpi, "must be a positive number"));
        }
        let bbox = self.bbox.unwrap_or(if defaults.bbox_tight {
            BBox::Tight {
                pad_inches: defaults.pad_inches,
            }
        } else {
            BBox::Full
        });
        if let BBox::Tight { pad_inches } = bbox {
            if !(pad_inches.is_finite() && pad_inches >= 0.0) {
                return Err(Error::invalid(
                    "pad_inches",
                    pad_inches,
                    "must be zero or a positive number",
                ));
            }
        }
        Ok((dpi, bbox))
    }
}

/// Save a figure.
///
/// # Errors
///
/// - [`Error::UnsupportedFormat`] for an unknown extension.
/// - [`Error::InvalidParameter`] for a non-positive `dpi` or negative pad.
/// - [`Error::Io`] when the file cannot be written.
/// - Encoder errors ([`Error::PngEncoding`], [`Error::Tiff`]).
///
/// # Example
///
/// ```no_run
/// use journal_style::{make_figure, save, BBox, FigureSpec, SaveOptions};
///
/// let fig = make_figure(&FigureSpec::for_journal("nature_single")?.aspect_ratio(0.8))?;
/// save(&fig, "figure.pdf", &SaveOptions::new())?;
/// save(&fig, "figure.png", &SaveOptions::new().dpi(300.0).bbox(BBox::Full))?;
/// # Ok::<(), journal_style::Error>(())
/// ```
pub fn save(figure: &Figure, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
    let path = path.as_ref();
    let format = match options.format {
        Some(format) => format,
        None => ExportFormat::from_path(path)?,
    };
    log::debug!("{}: writing as {format}", path.display());

    let (scene, dpi) = prepare(figure, format, options)?;
    match format {
        ExportFormat::Svg => SvgEncoder::new(&scene).write_to_file(path)?,
        ExportFormat::Pdf => PdfEncoder::new(&scene).write_to_file(path)?,
        ExportFormat::Png => PngEncoder::write_to_file(&rasterize(&scene, dpi)?, path, Some(dpi))?,
        ExportFormat::Tiff => TiffEncoder::write_to_file(&rasterize(&scene, dpi)?, path, Some(dpi))?,
    }

    log::info!("saved {}", path.display());
    Ok(())
}

/// Encode a figure in memory.
///
/// # Errors
///
/// As [`save`], minus the I/O failures.
pub fn render_to_bytes(figure: &Figure, format: ExportFormat, options: &SaveOptions) -> Result<Vec<u8>> {
    let (scene, dpi) = prepare(figure, format, options)?;
    match format {
        ExportFormat::Svg => Ok(SvgEncoder::new(&scene).render().into_bytes()),
        ExportFormat::Pdf => Ok(PdfEncoder::new(&scene).to_bytes()),
        ExportFormat::Png => PngEncoder::to_bytes(&rasterize(&scene, dpi)?, Some(dpi)),
        ExportFormat::Tiff => TiffEncoder::to_bytes(&rasterize(&scene, dpi)?, Some(dpi)),
    }
}

/// Lower the figure for `format` and apply the page box.
fn prepare(figure: &Figure, format: ExportFormat, options: &SaveOptions) -> Result<(Scene, f32)> {
    let (dpi, bbox) = options.resolve(&figure.style().save)?;
    let target = if format.is_vector() {
        Target::Vector { dpi }
    } else {
        Target::Raster
    };
    let scene = figure.lower(target)?;

    let scene = match bbox {
        BBox::Full => scene,
        BBox::Tight { pad_inches } => {
            let page = Rect::new(0.0, 0.0, scene.width, scene.height);
            // Content hanging off the page is cut, as it is for the full box.
            match scene.content_bounds().and_then(|c| c.intersection(&page)) {
                Some(content) => {
                    let frame = content.expand(inches_to_points(pad_inches));
                    log::debug!(
                        "tight box {:.1}x{:.1}pt of {:.1}x{:.1}pt",
                        frame.width,
                        frame.height,
                        scene.width,
                        scene.height
                    );
                    scene.cropped(frame)
                }
                None => scene,
            }
        }
    };
    Ok((scene, dpi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{make_figure, FigureSpec, LineSeries};
    use crate::style::StyleParams;
    use approx::assert_relative_eq;

    fn figure() -> Figure {
        let mut fig = make_figure(
            &FigureSpec::new()
                .width_mm(89.0)
                .aspect_ratio(0.8)
                .style(StyleParams::default()),
        )
        .unwrap();
        fig.panels_mut()[(0, 0)]
            .plot(LineSeries::new(&[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0]).label("trace"))
            .unwrap();
        fig.panels_mut()[(0, 0)].set_xlabel("Time (s)");
        fig
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("SVG").unwrap(), ExportFormat::Svg);
        assert_eq!(ExportFormat::from_extension("tif").unwrap(), ExportFormat::Tiff);
        assert_eq!(ExportFormat::from_extension("Tiff").unwrap(), ExportFormat::Tiff);
        assert!(matches!(
            ExportFormat::from_extension("jpg"),
            Err(Error::UnsupportedFormat(ext)) if ext == "jpg"
        ));
        assert_eq!(".pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn test_no_extension_is_png() {
        assert_eq!(ExportFormat::from_path(Path::new("figure")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a/b.PDF")).unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn test_resolve_uses_style_defaults() {
        let defaults = StyleParams::default().save;
        let (dpi, bbox) = SaveOptions::new().resolve(&defaults).unwrap();
        assert_relative_eq!(dpi, 600.0);
        assert_eq!(bbox, BBox::tight());

        let (dpi, bbox) = SaveOptions::new().dpi(150.0).bbox(BBox::Full).resolve(&defaults).unwrap();
        assert_relative_eq!(dpi, 150.0);
        assert_eq!(bbox, BBox::Full);
    }

    #[test]
    fn test_bad_dpi_and_pad() {
        let defaults = StyleParams::default().save;
        for dpi in [0.0, -72.0, f32::NAN] {
            assert!(matches!(
                SaveOptions::new().dpi(dpi).resolve(&defaults),
                Err(Error::InvalidParameter { name: "dpi", .. })
            ));
        }
        let negative = SaveOptions::new().bbox(BBox::Tight { pad_inches: -0.1 });
        assert!(matches!(
            negative.resolve(&defaults),
            Err(Error::InvalidParameter { name: "pad_inches", .. })
        ));
    }

    #[test]
    fn test_full_png_size() {
        let fig = figure();
        let options = SaveOptions::new().dpi(100.0).bbox(BBox::Full);
        let png = render_to_bytes(&fig, ExportFormat::Png, &options).unwrap();
        let width = u32::from_be_bytes(png[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(png[20..24].try_into().unwrap());
        assert_eq!(width, (89.0_f32 / 25.4 * 100.0).round() as u32);
        assert_eq!(height, (89.0_f32 / 25.4 * 0.8 * 100.0).round() as u32);
    }

    #[test]
    fn test_tight_is_within_page_plus_pad() {
        let fig = figure();
        let pad = 0.05;
        let (scene, _) = prepare(
            &fig,
            ExportFormat::Svg,
            &SaveOptions::new().bbox(BBox::Tight { pad_inches: pad }),
        )
        .unwrap();
        let (w, h) = fig.size_pt();
        assert!(scene.width <= w + 2.0 * pad * 72.0 + 1e-3);
        assert!(scene.height <= h + 2.0 * pad * 72.0 + 1e-3);
        assert!(scene.width > 0.0 && scene.height > 0.0);
    }

    #[test]
    fn test_save_writes_each_format() {
        let fig = figure();
        let dir = tempfile::tempdir().unwrap();
        for name in ["f.svg", "f.pdf", "f.png", "f.tif"] {
            let path = dir.path().join(name);
            save(&fig, &path, &SaveOptions::new().dpi(72.0)).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0, "{name} is empty");
        }
    }

    #[test]
    fn test_explicit_format_overrides_extension() {
        let fig = figure();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.dat");
        save(&fig, &path, &SaveOptions::new().format(ExportFormat::Svg)).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_unknown_extension_writes_nothing() {
        let fig = figure();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.bmp");
        assert!(matches!(
            save(&fig, &path, &SaveOptions::new()),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let fig = figure();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("figure.svg");
        assert!(matches!(save(&fig, &path, &SaveOptions::new()), Err(Error::Io(_))));
    }
}
