//! Color types and color parsing.
//!
//! Colors in style configuration are written the way journal style sheets
//! write them: hex strings (`#0072B2`) or a small set of CSS/matplotlib names.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

/// Named colors accepted by [`Rgba::parse`], including matplotlib's
/// single-letter shorthands.
const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", Rgba::BLACK),
    ("k", Rgba::BLACK),
    ("white", Rgba::WHITE),
    ("w", Rgba::WHITE),
    ("red", Rgba::RED),
    ("r", Rgba::RED),
    ("green", Rgba::rgb(0, 128, 0)),
    ("g", Rgba::rgb(0, 128, 0)),
    ("blue", Rgba::BLUE),
    ("b", Rgba::BLUE),
    ("cyan", Rgba::rgb(0, 255, 255)),
    ("c", Rgba::rgb(0, 191, 191)),
    ("magenta", Rgba::rgb(255, 0, 255)),
    ("m", Rgba::rgb(191, 0, 191)),
    ("yellow", Rgba::rgb(255, 255, 0)),
    ("y", Rgba::rgb(191, 191, 0)),
    ("gray", Rgba::rgb(128, 128, 128)),
    ("grey", Rgba::rgb(128, 128, 128)),
    ("darkgray", Rgba::rgb(169, 169, 169)),
    ("darkgrey", Rgba::rgb(169, 169, 169)),
    ("lightgray", Rgba::rgb(211, 211, 211)),
    ("lightgrey", Rgba::rgb(211, 211, 211)),
    ("dimgray", Rgba::rgb(105, 105, 105)),
    ("dimgrey", Rgba::rgb(105, 105, 105)),
    ("orange", Rgba::rgb(255, 165, 0)),
    ("purple", Rgba::rgb(128, 0, 128)),
    ("brown", Rgba::rgb(165, 42, 42)),
    ("navy", Rgba::rgb(0, 0, 128)),
    ("none", Rgba::TRANSPARENT),
    ("transparent", Rgba::TRANSPARENT),
];

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Scale the existing alpha by an opacity in `0.0..=1.0`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        self.with_alpha((f32::from(self.a) * opacity).round() as u8)
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Parse a color specification.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and the names in a small
    /// built-in table (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use journal_style::color::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#0072B2").unwrap(), Rgba::rgb(0x00, 0x72, 0xB2));
    /// assert_eq!(Rgba::parse("black").unwrap(), Rgba::BLACK);
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::InvalidColor(spec.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| Error::InvalidColor(spec.to_string()))
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not opaque).
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
            Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
