//! Grid options forwarded to panel layout.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which panels share an axis range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareAxes {
    /// Every panel keeps its own range.
    #[default]
    None,
    /// All panels share one range.
    All,
    /// Panels in the same row share a range.
    Row,
    /// Panels in the same column share a range.
    #[serde(alias = "col")]
    Column,
}

/// Options for the panel grid: shared axes, relative sizes and spacing.
///
/// Deserializable so a YAML profile can carry them:
///
/// ```
/// use journal_style::{PanelOptions, ShareAxes};
///
/// let opts: PanelOptions = serde_yaml_ng::from_str("share_x: col\nwidth_ratios: [2, 1]").unwrap();
/// assert_eq!(opts.share_x, ShareAxes::Column);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelOptions {
    /// Share the x range.
    pub share_x: ShareAxes,
    /// Share the y range.
    pub share_y: ShareAxes,
    /// Relative column widths; one entry per column.
    pub width_ratios: Option<Vec<f32>>,
    /// Relative row heights; one entry per row.
    pub height_ratios: Option<Vec<f32>>,
    /// Horizontal gap between panels as a fraction of the mean panel width.
    pub wspace: Option<f32>,
    /// Vertical gap between panels as a fraction of the mean panel height.
    pub hspace: Option<f32>,
}

impl PanelOptions {
    /// Options with every value unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set x sharing.
    #[must_use]
    pub fn share_x(mut self, share: ShareAxes) -> Self {
        self.share_x = share;
        self
    }

    /// Set y sharing.
    #[must_use]
    pub fn share_y(mut self, share: ShareAxes) -> Self {
        self.share_y = share;
        self
    }

    /// Set relative column widths.
    #[must_use]
    pub fn width_ratios(mut self, ratios: impl Into<Vec<f32>>) -> Self {
        self.width_ratios = Some(ratios.into());
        self
    }

    /// Set relative row heights.
    #[must_use]
    pub fn height_ratios(mut self, ratios: impl Into<Vec<f32>>) -> Self {
        self.height_ratios = Some(ratios.into());
        self
    }

    /// Set the horizontal gap.
    #[must_use]
    pub fn wspace(mut self, wspace: f32) -> Self {
        self.wspace = Some(wspace);
        self
    }

    /// Set the vertical gap.
    #[must_use]
    pub fn hspace(mut self, hspace: f32) -> Self {
        self.hspace = Some(hspace);
        self
    }

    /// Check the options against a `rows x cols` grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Layout`] when a ratio list has the wrong length or a
    /// non-positive entry, or a spacing is negative.
    pub fn validate(&self, rows: usize, cols: usize) -> Result<()> {
        check_ratios("width_ratios", self.width_ratios.as_deref(), cols)?;
        check_ratios("height_ratios", self.height_ratios.as_deref(), rows)?;
        check_space("wspace", self.wspace)?;
        check_space("hspace", self.hspace)
    }

    /// Column weights, all 1.0 when unset.
    pub(crate) fn column_weights(&self, cols: usize) -> Vec<f32> {
        self.width_ratios.clone().unwrap_or_else(|| vec![1.0; cols])
    }

    /// Row weights, all 1.0 when unset.
    pub(crate) fn row_weights(&self, rows: usize) -> Vec<f32> {
        self.height_ratios.clone().unwrap_or_else(|| vec![1.0; rows])
    }
}

fn check_ratios(name: &str, ratios: Option<&[f32]>, expected: usize) -> Result<()> {
    let Some(ratios) = ratios else {
        return Ok(());
    };
    if ratios.len() != expected {
        return Err(Error::Layout(format!(
            "{name} has {} entries but the grid has {expected}",
            ratios.len()
        )));
    }
    if let Some(bad) = ratios.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
        return Err(Error::Layout(format!("{name} entries must be positive, got {bad}")));
    }
    Ok(())
}

fn check_space(name: &str, space: Option<f32>) -> Result<()> {
    match space {
        Some(s) if !(s.is_finite() && s >= 0.0) => Err(Error::Layout(format!(
            "{name} must be a non-negative number, got {s}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PanelOptions::new().validate(3, 4).is_ok());
    }

    #[test]
    fn test_ratio_length_mismatch() {
        let opts = PanelOptions::new().width_ratios([1.0, 2.0, 1.0]);
        let err = opts.validate(1, 2).unwrap_err();
        assert!(matches!(err, Error::Layout(msg) if msg.contains("width_ratios")));
    }

    #[test]
    fn test_non_positive_ratio() {
        let opts = PanelOptions::new().height_ratios([1.0, 0.0]);
        assert!(matches!(opts.validate(2, 1), Err(Error::Layout(_))));
    }

    #[test]
    fn test_negative_spacing() {
        assert!(PanelOptions::new().wspace(-0.1).validate(1, 2).is_err());
        assert!(PanelOptions::new().hspace(f32::NAN).validate(2, 1).is_err());
        assert!(PanelOptions::new().hspace(0.0).validate(2, 1).is_ok());
    }

    #[test]
    fn test_weights_default_to_one() {
        let opts = PanelOptions::new().width_ratios([3.0, 1.0]);
        assert_eq!(opts.column_weights(2), vec![3.0, 1.0]);
        assert_eq!(opts.row_weights(3), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_yaml_keywords() {
        let opts: PanelOptions =
            serde_yaml_ng::from_str("share_x: all\nshare_y: row\nhspace: 0.3").unwrap();
        assert_eq!(opts.share_x, ShareAxes::All);
        assert_eq!(opts.share_y, ShareAxes::Row);
        assert_eq!(opts.hspace, Some(0.3));

        assert!(serde_yaml_ng::from_str::<PanelOptions>("sharex: all").is_err());
    }
}
