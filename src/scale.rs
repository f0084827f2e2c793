//! Scale functions for data-to-panel mappings.
//!
//! Scales transform data values to positions inside a panel. Tick placement
//! follows the "nice numbers" approach: steps of 1, 2, 2.5 or 5 times a
//! power of ten.
//!
//! # References
//!
//! - Heckbert, P. S. (1990). "Nice numbers for graph labels." *Graphics Gems*.

use crate::error::{Error, Result};
use trueno::Vector;

/// Fraction of the data span added on each side when autoscaling.
pub const AUTOSCALE_MARGIN: f32 = 0.05;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::invalid(
                "domain",
                format!("({}, {})", domain.0, domain.1),
                "min and max cannot be equal",
            ));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }
}

/// Minimum and maximum of the finite values, using trueno's SIMD reductions.
///
/// Returns `None` when there is no finite value.
#[must_use]
pub fn data_extent(values: &[f32]) -> Option<(f32, f32)> {
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    let vec = Vector::from_vec(finite);
    let min = vec.min().unwrap_or(f32::NAN);
    let max = vec.max().unwrap_or(f32::NAN);

    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Pad an extent by `margin` of its span on each side.
///
/// A degenerate extent (a single value) is widened to a unit-ish interval so
/// the scale never collapses.
#[must_use]
pub fn expand_extent((min, max): (f32, f32), margin: f32) -> (f32, f32) {
    let span = max - min;
    if span.abs() <= f32::EPSILON * min.abs().max(1.0) {
        let half = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
        return (min - half, max + half);
    }
    (min - span * margin, max + span * margin)
}

/// Tick positions inside `[min, max]` at a nice step, aiming for at most
/// `max_ticks` intervals.
#[must_use]
pub fn nice_ticks(min: f32, max: f32, max_ticks: usize) -> Vec<f32> {
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return vec![min];
    }

    let step = nice_step((max - min) / max_ticks.max(1) as f32);
    let tolerance = step * 1e-4;
    let first = (min / step - 1e-4).ceil() * step;

    let mut ticks = Vec::new();
    let mut i = 0u32;
    loop {
        let value = first + step * i as f32;
        if value > max + tolerance {
            break;
        }
        // Snap values like -1.1e-8 to zero.
        ticks.push(if value.abs() < tolerance { 0.0 } else { value });
        i += 1;
    }
    ticks
}

/// Smallest step of the form {1, 2, 2.5, 5, 10} x 10^k that is >= `raw`.
#[must_use]
pub fn nice_step(raw: f32) -> f32 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f32.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|f| *f >= residual - 1e-6)
        .unwrap_or(10.0);
    factor * magnitude
}

/// Format a tick value with just enough decimals for the given step.
#[must_use]
pub fn format_tick(value: f32, step: f32) -> String {
    let mut decimals = 0usize;
    let mut scaled = step.abs();
    while decimals < 6 && (scaled - scaled.round()).abs() > 1e-3 * scaled.max(1.0) {
        scaled *= 10.0;
        decimals += 1;
    }
    let text = format!("{value:.decimals$}");
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
