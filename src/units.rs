//! Physical unit conversions.
//!
//! Journals specify widths in millimetres, figure sizes are carried in inches,
//! and every style size (fonts, line widths, tick lengths) is in points.

/// Millimetres per inch.
pub const MM_PER_INCH: f32 = 25.4;

/// Typographic points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimetres to inches.
///
/// ```
/// use journal_style::units::mm_to_inches;
///
/// assert!((mm_to_inches(25.4) - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn mm_to_inches(mm: f32) -> f32 {
    mm / MM_PER_INCH
}

/// Convert inches to millimetres.
#[must_use]
pub fn inches_to_mm(inches: f32) -> f32 {
    inches * MM_PER_INCH
}

/// Convert inches to points.
#[must_use]
pub fn inches_to_points(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches.
#[must_use]
pub fn points_to_inches(points: f32) -> f32 {
    points / POINTS_PER_INCH
}

/// Device pixels per point at a given resolution.
#[must_use]
pub fn pixels_per_point(dpi: f32) -> f32 {
    dpi / POINTS_PER_INCH
}

/// Pixel count covering `inches` at `dpi`, rounded to the nearest pixel and
/// never zero.
#[must_use]
pub fn inches_to_pixels(inches: f32, dpi: f32) -> u32 {
    ((inches * dpi).round() as u32).max(1)
}
