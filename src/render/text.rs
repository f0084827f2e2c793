//! Text measurement.
//!
//! Layout needs extents before any output exists. Advance widths approximate
//! Helvetica, the face SVG and PDF viewers substitute; serif and monospace
//! families get their own factors. Raster output aligns on the measured
//! advance of the bundled faces instead.

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Ascent above the baseline, as a fraction of the font size.
pub const ASCENT: f32 = 0.72;
/// Descent below the baseline, as a fraction of the font size.
pub const DESCENT: f32 = 0.21;

/// Advance width of one character in em units (Helvetica-like).
fn advance(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.24,
        'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '-' => 0.31,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.85,
        '0'..='9' | 'a'..='z' => 0.556,
        'A'..='Z' => 0.68,
        _ => 0.6,
    }
}

/// Typeface class of a family name: 0 sans, 1 serif, 2 monospace.
fn family_class(family: &str) -> usize {
    let lower = family.to_ascii_lowercase();
    if lower.contains("mono") || lower.contains("courier") {
        2
    } else if (lower.contains("serif") && !lower.contains("sans")) || lower.contains("times") {
        1
    } else {
        0
    }
}

/// Index of the face for `family` and `weight` in sans, serif, monospace
/// order, regular before bold. PDF font resources and the bundled raster
/// faces share this order.
pub(crate) fn face_index(family: &str, weight: FontWeight) -> usize {
    family_class(family) * 2 + usize::from(weight == FontWeight::Bold)
}

/// Family-specific width factor relative to Helvetica.
fn family_factor(family: &str) -> f32 {
    match family_class(family) {
        2 => 1.08,
        1 => 0.92,
        _ => 1.0,
    }
}

/// Estimated width of a single line of text in points.
#[must_use]
pub fn text_width(text: &str, size: f32, family: &str, weight: FontWeight) -> f32 {
    let ems: f32 = text.chars().map(advance).sum();
    let bold = if weight == FontWeight::Bold { 1.06 } else { 1.0 };
    ems * size * family_factor(family) * bold
}

/// Height of a line (ascent + descent) in points.
#[must_use]
pub fn text_height(size: f32) -> f32 {
    (ASCENT + DESCENT) * size
}
