//! Color cycles.
//!
//! # References
//!
//! - Wong, B. (2011). "Points of view: Color blindness." *Nature Methods*, 8, 441.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// The Wong (2011) colour-blind-safe palette as hex strings.
pub const WONG_HEX: [&str; 8] = [
    "#0072B2", // blue
    "#D55E00", // vermillion
    "#009E73", // bluish green
    "#CC79A7", // reddish purple
    "#E69F00", // orange
    "#56B4E9", // sky blue
    "#F0E442", // yellow
    "#000000", // black
];

const WONG: [Rgba; 8] = [
    Rgba::rgb(0x00, 0x72, 0xB2),
    Rgba::rgb(0xD5, 0x5E, 0x00),
    Rgba::rgb(0x00, 0x9E, 0x73),
    Rgba::rgb(0xCC, 0x79, 0xA7),
    Rgba::rgb(0xE6, 0x9F, 0x00),
    Rgba::rgb(0x56, 0xB4, 0xE9),
    Rgba::rgb(0xF0, 0xE4, 0x42),
    Rgba::rgb(0x00, 0x00, 0x00),
];

/// An ordered, non-empty color cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::wong()
    }
}

impl Palette {
    /// The built-in 8-color colour-blind-safe cycle.
    #[must_use]
    pub fn wong() -> Self {
        Self {
            colors: WONG.to_vec(),
        }
    }

    /// Create a palette from colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `colors` is empty.
    pub fn new(colors: Vec<Rgba>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::invalid("palette", "[]", "must contain at least one color"));
        }
        Ok(Self { colors })
    }

    /// Parse a palette from color specifications (see [`Rgba::parse`]).
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let colors = specs
            .iter()
            .map(|s| Rgba::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    /// Color for the `index`-th series, wrapping around the cycle.
    #[must_use]
    pub fn get(&self, index: usize) -> Rgba {
        self.colors[index % self.colors.len()]
    }

    /// Number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The colors in cycle order.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wong_matches_hex() {
        let parsed = Palette::parse(&WONG_HEX).unwrap();
        assert_eq!(parsed, Palette::wong());
        assert_eq!(parsed.len(), 8);
    }

    #[test]
    fn test_cycle_wraps() {
        let p = Palette::wong();
        assert_eq!(p.get(0), p.get(8));
        assert_eq!(p.get(3), p.get(11));
        assert_eq!(p.get(7), Rgba::BLACK);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Palette::new(vec![]), Err(Error::InvalidParameter { .. })));
        let empty: [&str; 0] = [];
        assert!(Palette::parse(&empty).is_err());
    }

    #[test]
    fn test_parse_bad_color() {
        assert!(matches!(
            Palette::parse(&["#0072B2", "not-a-color"]),
            Err(Error::InvalidColor(_))
        ));
    }
}
