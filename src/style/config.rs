//! Primary style inputs.
//!
//! Supports YAML files; missing keys take the journal defaults, unknown keys
//! are rejected.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The handful of primary values every derived style parameter comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Base font size in points. 6-8 pt is typical for journals.
    pub base_font_size: f32,
    /// Base line width in points (axes, ticks, bar edges).
    pub line_width: f32,
    /// Major tick length in points.
    pub tick_length: f32,
    /// Text, tick and axis label color.
    pub text_color: String,
    /// Font family (`sans-serif`, `serif`, `monospace` or a family name).
    pub font_family: String,
    /// Color cycle; the built-in colour-blind-safe palette when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            base_font_size: 7.0,
            line_width: 0.5,
            tick_length: 2.5,
            text_color: "black".to_string(),
            font_family: "sans-serif".to_string(),
            palette: None,
        }
    }
}

impl StyleConfig {
    /// Creates a configuration with the journal defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base font size.
    #[must_use]
    pub fn base_font_size(mut self, size: f32) -> Self {
        self.base_font_size = size;
        self
    }

    /// Set the base line width.
    #[must_use]
    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Set the major tick length.
    #[must_use]
    pub fn tick_length(mut self, length: f32) -> Self {
        self.tick_length = length;
        self
    }

    /// Set the text color.
    #[must_use]
    pub fn text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Set the font family.
    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the color cycle.
    #[must_use]
    pub fn palette<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.palette = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    /// Check numeric constraints.
    ///
    /// Colors are checked when the configuration is derived into
    /// [`StyleParams`](super::StyleParams).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] on a non-positive font size or
    /// line width, a negative tick length, or an empty palette.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_font_size.is_finite() && self.base_font_size > 0.0) {
            return Err(Error::invalid(
                "base_font_size",
                self.base_font_size,
                "must be a positive number",
            ));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(Error::invalid(
                "line_width",
                self.line_width,
                "must be a positive number",
            ));
        }
        if !(self.tick_length.is_finite() && self.tick_length >= 0.0) {
            return Err(Error::invalid(
                "tick_length",
                self.tick_length,
                "must be zero or positive",
            ));
        }
        if matches!(&self.palette, Some(colors) if colors.is_empty()) {
            return Err(Error::invalid("palette", "[]", "must contain at least one color"));
        }
        Ok(())
    }

    /// Loads a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with the line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serializes to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
