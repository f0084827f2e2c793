//! Journal style configuration.
//!
//! A style is derived once from a few primary inputs ([`StyleConfig`]) and then
//! read by every figure created afterwards. Two ways to supply it:
//!
//! - process-wide: [`set_style`] replaces the registry, [`current_style`]
//!   snapshots it, [`reset_style`] restores the defaults;
//! - explicit: pass a [`StyleParams`] to
//!   [`FigureSpec::style`](crate::FigureSpec::style), which never touches the
//!   registry and is safe to use from parallel tests.

mod config;
mod palette;
mod params;

pub use config::StyleConfig;
pub use palette::{Palette, WONG_HEX};
pub use params::{
    FontParams, LegendParams, LineParams, SaveParams, SpineParams, StyleParams, StyleValue,
    TickDirection, TickParams, GRID_LINE_RATIO, LEGEND_FONT_RATIO, MINOR_TICK_SIZE_RATIO,
    MINOR_TICK_WIDTH_RATIO, PLOT_LINE_RATIO, STYLE_KEYS, TICK_LABEL_RATIO,
};

use crate::error::Result;
use std::sync::{PoisonError, RwLock};

/// `None` means the defaults are in effect.
static REGISTRY: RwLock<Option<StyleParams>> = RwLock::new(None);

/// Validate `config`, derive the full style and make it the process-wide
/// style for figures created from now on.
///
/// The previous style is replaced wholesale.
///
/// # Errors
///
/// Returns an error if `config` fails validation; the registry is left
/// unchanged in that case.
///
/// # Example
///
/// ```
/// use journal_style::{current_style, reset_style, set_style, StyleConfig};
///
/// set_style(&StyleConfig::new().base_font_size(8.0)).unwrap();
/// assert!((current_style().xtick.label_size - 7.2).abs() < 1e-5);
/// reset_style();
/// ```
pub fn set_style(config: &StyleConfig) -> Result<StyleParams> {
    let params = StyleParams::from_config(config)?;
    *REGISTRY.write().unwrap_or_else(PoisonError::into_inner) = Some(params.clone());
    log::info!(
        "journal style set: {}pt font, {}pt lines",
        config.base_font_size,
        config.line_width
    );
    Ok(params)
}

/// Apply the default journal style (7 pt text, 0.5 pt lines).
pub fn set_journal_style() -> Result<StyleParams> {
    set_style(&StyleConfig::default())
}

/// Snapshot of the process-wide style.
#[must_use]
pub fn current_style() -> StyleParams {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_default()
}

/// Restore the default style.
pub fn reset_style() {
    *REGISTRY.write().unwrap_or_else(PoisonError::into_inner) = None;
    log::debug!("journal style reset to defaults");
}
