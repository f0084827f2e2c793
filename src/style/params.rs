//! Derived style parameters.
//!
//! [`StyleParams`] is the full parameter set figures render with. It is
//! derived from a [`StyleConfig`] with fixed ratios so the same handful of
//! inputs always produces the same look:
//!
//! - tick labels and legend text are 0.9x the base font size
//! - minor ticks are 0.75x as wide and 0.6x as long as major ticks
//! - plotted lines are 1.5x the base line width, grid lines 0.75x
//!
//! Every value can also be read back by its dotted key (`"xtick.labelsize"`)
//! through [`StyleParams::get`].

use super::config::StyleConfig;
use super::palette::Palette;
use crate::color::Rgba;
use crate::error::Result;
use std::fmt;

/// Tick label font size relative to the base font size.
pub const TICK_LABEL_RATIO: f32 = 0.9;
/// Legend font size relative to the base font size.
pub const LEGEND_FONT_RATIO: f32 = 0.9;
/// Minor tick width relative to major tick width.
pub const MINOR_TICK_WIDTH_RATIO: f32 = 0.75;
/// Minor tick length relative to major tick length.
pub const MINOR_TICK_SIZE_RATIO: f32 = 0.6;
/// Plotted line width relative to the base line width.
pub const PLOT_LINE_RATIO: f32 = 1.5;
/// Grid line width relative to the base line width.
pub const GRID_LINE_RATIO: f32 = 0.75;

/// Which side of the spine ticks are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickDirection {
    /// Outside the axes box.
    #[default]
    Out,
    /// Inside the axes box.
    In,
    /// Straddling the spine.
    InOut,
}

impl TickDirection {
    /// Keyword used in style keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::In => "in",
            Self::InOut => "inout",
        }
    }
}

/// Font settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FontParams {
    /// Font family name or generic family.
    pub family: String,
    /// Base size (`font.size`).
    pub size: f32,
    /// Panel title size.
    pub title_size: f32,
    /// Axis label size.
    pub label_size: f32,
    /// Legend entry size.
    pub legend_size: f32,
    /// Legend title size.
    pub legend_title_size: f32,
}

/// Line width settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineParams {
    /// Spine width.
    pub axes_width: f32,
    /// Grid line width.
    pub grid_width: f32,
    /// Width of plotted lines.
    pub plot_width: f32,
    /// Edge width of bars and other patches.
    pub patch_width: f32,
    /// Marker size in points.
    pub marker_size: f32,
}

/// Tick settings for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickParams {
    /// Tick label font size.
    pub label_size: f32,
    /// Major tick width.
    pub major_width: f32,
    /// Minor tick width.
    pub minor_width: f32,
    /// Major tick length.
    pub major_size: f32,
    /// Minor tick length.
    pub minor_size: f32,
    /// Tick and tick label color.
    pub color: Rgba,
    /// Tick direction.
    pub direction: TickDirection,
}

/// Spine visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpineParams {
    /// Left spine.
    pub left: bool,
    /// Bottom spine.
    pub bottom: bool,
    /// Top spine.
    pub top: bool,
    /// Right spine.
    pub right: bool,
}

/// Legend settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendParams {
    /// Draw a frame around the legend.
    pub frame_on: bool,
    /// Handle length in font-size units.
    pub handle_length: f32,
    /// Handle height in font-size units.
    pub handle_height: f32,
}

/// Export defaults used when a save call leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveParams {
    /// Raster resolution.
    pub dpi: f32,
    /// Crop to the drawn content.
    pub bbox_tight: bool,
    /// Padding around tight crops, in inches.
    pub pad_inches: f32,
}

/// The full set of derived style values.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    /// Fonts.
    pub font: FontParams,
    /// Line widths.
    pub lines: LineParams,
    /// X axis ticks.
    pub xtick: TickParams,
    /// Y axis ticks.
    pub ytick: TickParams,
    /// General text color.
    pub text_color: Rgba,
    /// Axis label color.
    pub label_color: Rgba,
    /// Series color cycle.
    pub palette: Palette,
    /// Spine visibility.
    pub spines: SpineParams,
    /// Legend.
    pub legend: LegendParams,
    /// Use constrained layout.
    pub constrained_layout: bool,
    /// Export defaults.
    pub save: SaveParams,
}

/// A single style value, as returned by [`StyleParams::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// A size or width in points (or a dimensionless number).
    Float(f32),
    /// A flag.
    Bool(bool),
    /// A keyword or name.
    Text(String),
    /// A color.
    Color(Rgba),
    /// A color cycle.
    Colors(Vec<Rgba>),
}

impl StyleValue {
    /// The numeric value, if this is a float.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The flag, if this is a bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Color(c) => write!(f, "{c}"),
            Self::Colors(cs) => {
                let hex: Vec<String> = cs.iter().map(|c| c.to_hex()).collect();
                write!(f, "[{}]", hex.join(", "))
            }
        }
    }
}

/// Every key [`StyleParams::get`] answers, in a stable order.
pub const STYLE_KEYS: &[&str] = &[
    "font.family",
    "font.size",
    "axes.titlesize",
    "axes.labelsize",
    "xtick.labelsize",
    "ytick.labelsize",
    "legend.fontsize",
    "legend.title_fontsize",
    "axes.linewidth",
    "grid.linewidth",
    "lines.linewidth",
    "patch.linewidth",
    "xtick.major.width",
    "ytick.major.width",
    "xtick.minor.width",
    "ytick.minor.width",
    "xtick.major.size",
    "ytick.major.size",
    "xtick.minor.size",
    "ytick.minor.size",
    "xtick.direction",
    "ytick.direction",
    "lines.markersize",
    "text.color",
    "axes.labelcolor",
    "xtick.color",
    "ytick.color",
    "axes.prop_cycle",
    "axes.spines.left",
    "axes.spines.bottom",
    "axes.spines.top",
    "axes.spines.right",
    "legend.frameon",
    "legend.handlelength",
    "legend.handleheight",
    "figure.constrained_layout.use",
    "savefig.dpi",
    "savefig.bbox",
    "savefig.pad_inches",
    "svg.fonttype",
];

impl Default for StyleParams {
    fn default() -> Self {
        Self::derive(7.0, 0.5, 2.5, Rgba::BLACK, "sans-serif".to_string(), Palette::wong())
    }
}

impl StyleParams {
    /// Validate a configuration and derive the full parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter) for
    /// out-of-range sizes and [`Error::InvalidColor`](crate::Error::InvalidColor)
    /// for unparseable colors.
    pub fn from_config(config: &StyleConfig) -> Result<Self> {
        config.validate()?;
        let text_color = Rgba::parse(&config.text_color)?;
        let palette = match &config.palette {
            Some(colors) => Palette::parse(colors.as_slice())?,
            None => Palette::wong(),
        };
        Ok(Self::derive(
            config.base_font_size,
            config.line_width,
            config.tick_length,
            text_color,
            config.font_family.clone(),
            palette,
        ))
    }

    fn derive(
        base_font_size: f32,
        line_width: f32,
        tick_length: f32,
        color: Rgba,
        family: String,
        palette: Palette,
    ) -> Self {
        let ticks = TickParams {
            label_size: base_font_size * TICK_LABEL_RATIO,
            major_width: line_width,
            minor_width: line_width * MINOR_TICK_WIDTH_RATIO,
            major_size: tick_length,
            minor_size: tick_length * MINOR_TICK_SIZE_RATIO,
            color,
            direction: TickDirection::Out,
        };

        Self {
            font: FontParams {
                family,
                size: base_font_size,
                title_size: base_font_size,
                label_size: base_font_size,
                legend_size: base_font_size * LEGEND_FONT_RATIO,
                legend_title_size: base_font_size,
            },
            lines: LineParams {
                axes_width: line_width,
                grid_width: line_width * GRID_LINE_RATIO,
                plot_width: line_width * PLOT_LINE_RATIO,
                patch_width: line_width,
                marker_size: 2.5,
            },
            xtick: ticks,
            ytick: ticks,
            text_color: color,
            label_color: color,
            palette,
            spines: SpineParams {
                left: true,
                bottom: true,
                top: false,
                right: false,
            },
            legend: LegendParams {
                frame_on: false,
                handle_length: 1.0,
                handle_height: 0.7,
            },
            constrained_layout: true,
            save: SaveParams {
                dpi: 600.0,
                bbox_tight: true,
                pad_inches: 0.01,
            },
        }
    }

    /// Read a value by its dotted key.
    ///
    /// Returns `None` for keys not in [`STYLE_KEYS`].
    ///
    /// # Example
    ///
    /// ```
    /// use journal_style::{StyleConfig, StyleParams, StyleValue};
    ///
    /// let params = StyleParams::from_config(&StyleConfig::new().base_font_size(10.0)).unwrap();
    /// assert_eq!(params.get("axes.labelsize"), Some(StyleValue::Float(10.0)));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<StyleValue> {
        use StyleValue::{Bool, Color, Colors, Float, Text};

        let value = match key {
            "font.family" => Text(self.font.family.clone()),
            "font.size" => Float(self.font.size),
            "axes.titlesize" => Float(self.font.title_size),
            "axes.labelsize" => Float(self.font.label_size),
            "xtick.labelsize" => Float(self.xtick.label_size),
            "ytick.labelsize" => Float(self.ytick.label_size),
            "legend.fontsize" => Float(self.font.legend_size),
            "legend.title_fontsize" => Float(self.font.legend_title_size),
            "axes.linewidth" => Float(self.lines.axes_width),
            "grid.linewidth" => Float(self.lines.grid_width),
            "lines.linewidth" => Float(self.lines.plot_width),
            "patch.linewidth" => Float(self.lines.patch_width),
            "xtick.major.width" => Float(self.xtick.major_width),
            "ytick.major.width" => Float(self.ytick.major_width),
            "xtick.minor.width" => Float(self.xtick.minor_width),
            "ytick.minor.width" => Float(self.ytick.minor_width),
            "xtick.major.size" => Float(self.xtick.major_size),
            "ytick.major.size" => Float(self.ytick.major_size),
            "xtick.minor.size" => Float(self.xtick.minor_size),
            "ytick.minor.size" => Float(self.ytick.minor_size),
            "xtick.direction" => Text(self.xtick.direction.as_str().to_string()),
            "ytick.direction" => Text(self.ytick.direction.as_str().to_string()),
            "lines.markersize" => Float(self.lines.marker_size),
            "text.color" => Color(self.text_color),
            "axes.labelcolor" => Color(self.label_color),
            "xtick.color" => Color(self.xtick.color),
            "ytick.color" => Color(self.ytick.color),
            "axes.prop_cycle" => Colors(self.palette.colors().to_vec()),
            "axes.spines.left" => Bool(self.spines.left),
            "axes.spines.bottom" => Bool(self.spines.bottom),
            "axes.spines.top" => Bool(self.spines.top),
            "axes.spines.right" => Bool(self.spines.right),
            "legend.frameon" => Bool(self.legend.frame_on),
            "legend.handlelength" => Float(self.legend.handle_length),
            "legend.handleheight" => Float(self.legend.handle_height),
            "figure.constrained_layout.use" => Bool(self.constrained_layout),
            "savefig.dpi" => Float(self.save.dpi),
            "savefig.bbox" => {
                Text(if self.save.bbox_tight { "tight" } else { "standard" }.to_string())
            }
            "savefig.pad_inches" => Float(self.save.pad_inches),
            // SVG output always keeps text as text.
            "svg.fonttype" => Text("none".to_string()),
            _ => return None,
        };
        Some(value)
    }

    /// All `(key, value)` pairs in [`STYLE_KEYS`] order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, StyleValue)> + '_ {
        STYLE_KEYS
            .iter()
            .filter_map(move |key| self.get(key).map(|v| (*key, v)))
    }
}
