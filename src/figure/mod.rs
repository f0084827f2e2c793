//! Figures at exact physical sizes.
//!
//! A [`FigureSpec`] names a width in millimetres and an aspect ratio;
//! [`make_figure`] turns it into a [`Figure`] measured in inches that owns a
//! [`PanelGrid`] of `rows x cols` panels.

mod artist;
mod draw;
mod grid;
mod layout;
mod options;
mod panel;

pub use artist::{
    BarSeries, BinStrategy, FillBetween, HistSeries, LineSeries, PanelText, ScatterSeries,
};
pub use grid::PanelGrid;
pub use options::{PanelOptions, ShareAxes};
pub use panel::Panel;

pub(crate) use draw::Target;

use crate::error::{Error, Result};
use crate::export::{save, SaveOptions};
use crate::journal::lookup_journal_width;
use crate::render::Scene;
use crate::style::{current_style, StyleParams};
use crate::units::{inches_to_points, mm_to_inches};
use std::path::Path;

/// Default figure width: a full-width column for Cell and most Elsevier titles.
pub const DEFAULT_WIDTH_MM: f32 = 178.0;
/// Default height-to-width ratio.
pub const DEFAULT_ASPECT_RATIO: f32 = 0.25;

/// What figure to make.
///
/// ```
/// use journal_style::FigureSpec;
///
/// let spec = FigureSpec::for_journal("nature_single").unwrap().aspect_ratio(0.8);
/// assert_eq!(spec.width_mm, 89.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    /// Width in millimetres.
    pub width_mm: f32,
    /// Height divided by width.
    pub aspect_ratio: f32,
    /// Panel rows.
    pub rows: usize,
    /// Panel columns.
    pub cols: usize,
    /// Grid options.
    pub options: PanelOptions,
    /// Style to render with; the process-wide style when `None`.
    pub style: Option<StyleParams>,
}

impl Default for FigureSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl FigureSpec {
    /// 178 mm wide, aspect 0.25, one panel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width_mm: DEFAULT_WIDTH_MM,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            rows: 1,
            cols: 1,
            options: PanelOptions::default(),
            style: None,
        }
    }

    /// Start from a journal column width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown identifier.
    pub fn for_journal(identifier: &str) -> Result<Self> {
        Ok(Self::new().width_mm(lookup_journal_width(identifier)?))
    }

    /// Set the width in millimetres.
    #[must_use]
    pub fn width_mm(mut self, width_mm: f32) -> Self {
        self.width_mm = width_mm;
        self
    }

    /// Set the height-to-width ratio.
    #[must_use]
    pub fn aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Set the panel grid shape.
    #[must_use]
    pub fn grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the grid options.
    #[must_use]
    pub fn options(mut self, options: PanelOptions) -> Self {
        self.options = options;
        self
    }

    /// Render with an explicit style instead of the process-wide one.
    #[must_use]
    pub fn style(mut self, style: StyleParams) -> Self {
        self.style = Some(style);
        self
    }

    /// Check sizes, grid shape and options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a non-positive or non-finite
    /// size or an empty grid, and [`Error::Layout`] for bad options.
    pub fn validate(&self) -> Result<()> {
        if !(self.width_mm.is_finite() && self.width_mm > 0.0) {
            return Err(Error::invalid("width_mm", self.width_mm, "must be a positive number"));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(Error::invalid(
                "aspect_ratio",
                self.aspect_ratio,
                "must be a positive number",
            ));
        }
        if self.rows == 0 {
            return Err(Error::invalid("rows", self.rows, "need at least one row"));
        }
        if self.cols == 0 {
            return Err(Error::invalid("cols", self.cols, "need at least one column"));
        }
        self.options.validate(self.rows, self.cols)
    }
}

/// A figure with a physical size, a style snapshot and its panels.
#[derive(Debug, Clone)]
pub struct Figure {
    width_in: f32,
    height_in: f32,
    style: StyleParams,
    options: PanelOptions,
    panels: PanelGrid,
}

impl Figure {
    /// Width in inches.
    #[must_use]
    pub fn width_in(&self) -> f32 {
        self.width_in
    }

    /// Height in inches.
    #[must_use]
    pub fn height_in(&self) -> f32 {
        self.height_in
    }

    /// `(width, height)` in inches.
    #[must_use]
    pub fn size_in(&self) -> (f32, f32) {
        (self.width_in, self.height_in)
    }

    /// `(width, height)` in points.
    #[must_use]
    pub fn size_pt(&self) -> (f32, f32) {
        (inches_to_points(self.width_in), inches_to_points(self.height_in))
    }

    /// The style this figure renders with.
    #[must_use]
    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    /// The grid options.
    #[must_use]
    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    /// The panels.
    #[must_use]
    pub fn panels(&self) -> &PanelGrid {
        &self.panels
    }

    /// The panels, for drawing into.
    pub fn panels_mut(&mut self) -> &mut PanelGrid {
        &mut self.panels
    }

    /// The figure as a display list in points, as raster output draws it.
    ///
    /// # Errors
    ///
    /// Returns an error if a panel cannot be laid out.
    pub fn to_scene(&self) -> Result<Scene> {
        draw::lower(self, Target::Raster)
    }

    pub(crate) fn lower(&self, target: Target) -> Result<Scene> {
        draw::lower(self, target)
    }

    /// Shorthand for [`save`].
    ///
    /// # Errors
    ///
    /// See [`save`].
    pub fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        save(self, path, options)
    }
}

/// Create a figure.
///
/// Width in inches is `width_mm / 25.4`; height is `width x aspect_ratio`.
/// The figure renders with `spec.style` when set, otherwise with a snapshot
/// of the process-wide style taken now.
///
/// # Errors
///
/// See [`FigureSpec::validate`].
///
/// # Example
///
/// ```
/// use journal_style::{make_figure, FigureSpec};
///
/// let fig = make_figure(&FigureSpec::new().width_mm(89.0).aspect_ratio(0.8).grid(2, 2)).unwrap();
/// assert!((fig.width_in() - 89.0 / 25.4).abs() < 1e-5);
/// assert!((fig.height_in() - fig.width_in() * 0.8).abs() < 1e-5);
/// assert_eq!(fig.panels().shape(), (2, 2));
/// ```
pub fn make_figure(spec: &FigureSpec) -> Result<Figure> {
    spec.validate()?;
    let width_in = mm_to_inches(spec.width_mm);
    let height_in = width_in * spec.aspect_ratio;
    let style = spec.style.clone().unwrap_or_else(current_style);
    let palette = style.palette.clone();

    log::debug!(
        "figure {:.1}mm x {:.3} -> {width_in:.3}x{height_in:.3}in, {}x{} panels",
        spec.width_mm,
        spec.aspect_ratio,
        spec.rows,
        spec.cols
    );

    Ok(Figure {
        width_in,
        height_in,
        style,
        options: spec.options.clone(),
        panels: PanelGrid::new(spec.rows, spec.cols, || Panel::new(palette.clone())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::test_support::registry_lock;
    use crate::style::{reset_style, set_style, StyleConfig};
    use approx::assert_relative_eq;

    #[test]
    fn test_default_spec() {
        let fig = make_figure(&FigureSpec::new().style(StyleParams::default())).unwrap();
        assert_relative_eq!(fig.width_in(), 178.0 / 25.4);
        assert_relative_eq!(fig.height_in(), 178.0 / 25.4 * 0.25);
        assert_eq!(fig.panels().shape(), (1, 1));
    }

    #[test]
    fn test_size_in_points() {
        let fig = make_figure(&FigureSpec::new().width_mm(25.4).aspect_ratio(2.0)).unwrap();
        let (w, h) = fig.size_pt();
        assert_relative_eq!(w, 72.0, epsilon = 1e-4);
        assert_relative_eq!(h, 144.0, epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_specs() {
        for spec in [
            FigureSpec::new().width_mm(0.0),
            FigureSpec::new().width_mm(-5.0),
            FigureSpec::new().width_mm(f32::INFINITY),
            FigureSpec::new().aspect_ratio(0.0),
            FigureSpec::new().aspect_ratio(f32::NAN),
            FigureSpec::new().grid(0, 1),
            FigureSpec::new().grid(1, 0),
        ] {
            assert!(
                matches!(make_figure(&spec), Err(Error::InvalidParameter { .. })),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_bad_options_are_layout_errors() {
        let spec = FigureSpec::new()
            .grid(1, 2)
            .options(PanelOptions::new().width_ratios([1.0]));
        assert!(matches!(make_figure(&spec), Err(Error::Layout(_))));
    }

    #[test]
    fn test_for_journal() {
        let spec = FigureSpec::for_journal("science_single").unwrap();
        assert_eq!(spec.width_mm, 57.0);
        assert!(matches!(FigureSpec::for_journal("arxiv"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_registry_snapshot_at_creation() {
        let _guard = registry_lock();
        set_style(&StyleConfig::new().base_font_size(9.0)).unwrap();
        let fig = make_figure(&FigureSpec::new()).unwrap();
        reset_style();
        assert_relative_eq!(fig.style().font.size, 9.0);
        assert_relative_eq!(current_style().font.size, 7.0);
    }

    #[test]
    fn test_explicit_style_ignores_registry() {
        let style = StyleParams::from_config(&StyleConfig::new().base_font_size(12.0)).unwrap();
        let fig = make_figure(&FigureSpec::new().style(style)).unwrap();
        assert_relative_eq!(fig.style().xtick.label_size, 10.8, epsilon = 1e-5);
    }
}
