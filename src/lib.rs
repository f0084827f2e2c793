//! # journal-style
//!
//! Publication-ready figures at exact journal column widths.
//!
//! Scientific journals ask for figures at fixed printed widths (89 mm for a
//! Nature column, 183 mm for a full Nature page, and so on) with legible,
//! consistent type. This crate covers the three steps between data and a
//! submission-ready file:
//!
//! 1. **Style**: [`set_style`] derives every font size, line width and tick
//!    dimension from a base font size and line width using fixed ratios.
//! 2. **Size**: [`make_figure`] creates a figure at a width in millimetres and
//!    a height-to-width ratio, holding a 2-D grid of panels.
//! 3. **Export**: [`save`] writes SVG, PDF, PNG or TIFF at a chosen DPI,
//!    cropped to the drawn content by default.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use journal_style::prelude::*;
//!
//! set_journal_style()?;
//! let spec = FigureSpec::for_journal("nature_single")?.aspect_ratio(0.8);
//! let mut fig = make_figure(&spec)?;
//!
//! let panel = &mut fig.panels_mut()[(0, 0)];
//! panel.plot(LineSeries::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 0.8, 0.9, 0.1]).label("signal"))?;
//! panel.set_xlabel("Time (s)");
//! panel.set_ylabel("Amplitude");
//! panel.legend();
//!
//! save(&fig, "figure.pdf", &SaveOptions::new())?;
//! save(&fig, "figure.png", &SaveOptions::new().dpi(300.0))?;
//! # Ok::<(), journal_style::Error>(())
//! ```
//!
//! ## Output
//!
//! - **SVG**: `width`/`height` in inches, `viewBox` in points, text kept as
//!   `<text>` so it stays editable.
//! - **PDF**: single page, `MediaBox` in points, base-14 fonts.
//! - **PNG**: pixel size `round(inches x dpi)`, resolution stored in `pHYs`.
//! - **TIFF**: same pixels as PNG, resolution stored in `XResolution` /
//!   `YResolution`.
//!
//! Raster text is drawn with bundled DejaVu faces. Raster sides are capped at
//! [`framebuffer::MAX_DIMENSION`] pixels.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color type and parsing.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Length conversions between millimetres, inches, points and pixels.
pub mod units;

/// Scale functions and tick placement.
pub mod scale;

// ============================================================================
// Figure Modules
// ============================================================================

pub mod journal;

pub mod style;

pub mod figure;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Display list, text metrics and rasterization.
pub mod render;

/// Output encoders (SVG, PDF, PNG, TIFF).
pub mod output;

pub mod export;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for journal-style operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Re-exports
// ============================================================================

pub use color::Rgba;
pub use export::{render_to_bytes, save, BBox, ExportFormat, SaveOptions};
pub use figure::{
    make_figure, BarSeries, BinStrategy, Figure, FigureSpec, FillBetween, HistSeries, LineSeries,
    Panel, PanelGrid, PanelOptions, PanelText, ScatterSeries, ShareAxes,
};
pub use journal::{journal_widths, lookup_journal_width, JournalWidth};
pub use style::{
    current_style, reset_style, set_journal_style, set_style, Palette, StyleConfig, StyleParams,
    StyleValue,
};
pub use units::{inches_to_mm, mm_to_inches};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust
/// use journal_style::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::error::{Error, Result};
    pub use crate::export::{save, BBox, ExportFormat, SaveOptions};
    pub use crate::figure::{
        make_figure, BarSeries, BinStrategy, Figure, FigureSpec, FillBetween, HistSeries,
        LineSeries, Panel, PanelGrid, PanelOptions, PanelText, ScatterSeries, ShareAxes,
    };
    pub use crate::journal::{lookup_journal_width, JournalWidth};
    pub use crate::render::Baseline;
    pub use crate::style::{
        current_style, reset_style, set_journal_style, set_style, StyleConfig, StyleParams,
    };
    pub use crate::units::{inches_to_mm, mm_to_inches};
}
