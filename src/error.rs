//! Error types for journal-style operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while styling, building or exporting figures.
#[derive(Error, Debug)]
pub enum Error {
    /// A size, ratio or count is outside its valid range.
    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value, formatted.
        value: String,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// Unknown journal identifier.
    #[error("Unknown journal identifier: {0}")]
    NotFound(String),

    /// Panel options that cannot be combined with the requested grid.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Output format not supported (by extension or by explicit request).
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Style configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid dimensions for a framebuffer.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// TIFF encoding error.
    #[error("TIFF encoding error: {0}")]
    Tiff(#[from] tiff::TiffError),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

impl From<serde_yaml_ng::Error> for Error {
    fn from(err: serde_yaml_ng::Error) -> Self {
        match err.location() {
            Some(loc) => Self::Config(format!("line {}: {err}", loc.line())),
            None => Self::Config(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = Error::invalid("width_mm", -1.0, "must be positive");
        let msg = err.to_string();
        assert!(msg.contains("width_mm"));
        assert!(msg.contains("-1"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound("plos_single".to_string());
        assert!(err.to_string().contains("plos_single"));
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch {
            x_len: 10,
            y_len: 20,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
