//! Series builders and the resolved artists a panel draws.
//!
//! Builders are infallible and cheap; validation happens when a series is
//! added to a [`Panel`](super::Panel).

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::render::Baseline;
use crate::scale::data_extent;

/// Binning strategy for histograms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BinStrategy {
    /// Sturges' rule: ceil(log2(n) + 1)
    #[default]
    Sturges,
    /// Scott's rule: 3.5 * std / n^(1/3)
    Scott,
    /// Freedman-Diaconis rule: 2 * IQR / n^(1/3)
    FreedmanDiaconis,
    /// Fixed number of bins
    Fixed(usize),
}

/// A connected line through `(x, y)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) label: Option<String>,
    pub(crate) color: Option<Rgba>,
    pub(crate) width: Option<f32>,
    pub(crate) alpha: f32,
}

impl LineSeries {
    /// Line through the given points.
    #[must_use]
    pub fn new(x: &[f32], y: &[f32]) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            label: None,
            color: None,
            width: None,
            alpha: 1.0,
        }
    }

    /// Legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Line color; the next palette color when unset.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Line width in points; `lines.linewidth` when unset.
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Opacity in `0.0..=1.0`.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Unconnected circular markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) label: Option<String>,
    pub(crate) color: Option<Rgba>,
    pub(crate) size: Option<f32>,
    pub(crate) alpha: f32,
}

impl ScatterSeries {
    /// Markers at the given points.
    #[must_use]
    pub fn new(x: &[f32], y: &[f32]) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            label: None,
            color: None,
            size: None,
            alpha: 1.0,
        }
    }

    /// Legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marker color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Marker diameter in points; `lines.markersize` when unset.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Bars over named categories.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub(crate) categories: Vec<String>,
    pub(crate) values: Vec<f32>,
    pub(crate) label: Option<String>,
    pub(crate) color: Option<Rgba>,
    pub(crate) bar_width: f32,
    pub(crate) alpha: f32,
}

impl BarSeries {
    /// One bar per category.
    #[must_use]
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>, values: &[f32]) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            values: values.to_vec(),
            label: None,
            color: None,
            bar_width: 0.8,
            alpha: 1.0,
        }
    }

    /// Legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Bar color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Bar width as a fraction of the category spacing.
    #[must_use]
    pub fn bar_width(mut self, width: f32) -> Self {
        self.bar_width = width;
        self
    }

    /// Opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Histogram of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct HistSeries {
    pub(crate) data: Vec<f32>,
    pub(crate) bins: BinStrategy,
    pub(crate) density: bool,
    pub(crate) label: Option<String>,
    pub(crate) color: Option<Rgba>,
    pub(crate) alpha: f32,
}

impl HistSeries {
    /// Histogram of `data` with Sturges binning.
    #[must_use]
    pub fn new(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
            bins: BinStrategy::default(),
            density: false,
            label: None,
            color: None,
            alpha: 1.0,
        }
    }

    /// Binning strategy.
    #[must_use]
    pub fn bins(mut self, bins: BinStrategy) -> Self {
        self.bins = bins;
        self
    }

    /// Normalize so the bar areas sum to one.
    #[must_use]
    pub fn density(mut self, density: bool) -> Self {
        self.density = density;
        self
    }

    /// Legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Bar color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Shaded band between two curves.
#[derive(Debug, Clone, PartialEq)]
pub struct FillBetween {
    pub(crate) x: Vec<f32>,
    pub(crate) lower: Vec<f32>,
    pub(crate) upper: Vec<f32>,
    pub(crate) label: Option<String>,
    pub(crate) color: Option<Rgba>,
    pub(crate) alpha: f32,
}

impl FillBetween {
    /// Band between `lower` and `upper` along `x`.
    #[must_use]
    pub fn new(x: &[f32], lower: &[f32], upper: &[f32]) -> Self {
        Self {
            x: x.to_vec(),
            lower: lower.to_vec(),
            upper: upper.to_vec(),
            label: None,
            color: None,
            alpha: 1.0,
        }
    }

    /// Legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fill color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Text placed in axes-fraction coordinates: `(0, 0)` is the lower-left
/// corner of the axes box and `(1, 1)` the upper-right. Values outside that
/// range place text beside the box, as panel labels usually are.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelText {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) text: String,
    pub(crate) size: Option<f32>,
    pub(crate) bold: bool,
    pub(crate) color: Option<Rgba>,
    pub(crate) baseline: Baseline,
}

impl PanelText {
    /// Text anchored at `(x, y)` in axes fractions.
    #[must_use]
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            size: None,
            bold: false,
            color: None,
            baseline: Baseline::Alphabetic,
        }
    }

    /// Font size in points; `font.size` when unset.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Bold weight.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Text color; `text.color` when unset.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Vertical alignment of the anchor.
    #[must_use]
    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Bars in data coordinates, shared by bar charts and histograms.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bars {
    /// Left edges.
    pub(crate) left: Vec<f32>,
    pub(crate) width: Vec<f32>,
    pub(crate) height: Vec<f32>,
    pub(crate) color: Rgba,
    pub(crate) label: Option<String>,
}

/// A series after validation, with its color resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Artist {
    Line(LineSeries),
    Scatter(ScatterSeries),
    Bars(Bars),
    Band(FillBetween),
    Text(PanelText),
}

/// What a legend entry draws as its handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HandleKind {
    Line { width: Option<f32> },
    Marker,
    Patch,
}

impl Artist {
    pub(crate) fn label(&self) -> Option<&str> {
        match self {
            Self::Line(s) => s.label.as_deref(),
            Self::Scatter(s) => s.label.as_deref(),
            Self::Bars(b) => b.label.as_deref(),
            Self::Band(b) => b.label.as_deref(),
            Self::Text(_) => None,
        }
    }

    /// Legend entry, when labelled.
    pub(crate) fn legend_entry(&self) -> Option<(&str, HandleKind, Rgba)> {
        let label = self.label()?;
        let entry = match self {
            Self::Line(s) => (HandleKind::Line { width: s.width }, s.color?.with_opacity(s.alpha)),
            Self::Scatter(s) => (HandleKind::Marker, s.color?.with_opacity(s.alpha)),
            Self::Bars(b) => (HandleKind::Patch, b.color),
            Self::Band(b) => (HandleKind::Patch, b.color?.with_opacity(b.alpha)),
            Self::Text(_) => return None,
        };
        Some((label, entry.0, entry.1))
    }

    /// `(x extent, y extent)` of the finite data.
    pub(crate) fn extents(&self) -> (Option<(f32, f32)>, Option<(f32, f32)>) {
        match self {
            Self::Line(LineSeries { x, y, .. }) | Self::Scatter(ScatterSeries { x, y, .. }) => {
                (data_extent(x), data_extent(y))
            }
            Self::Bars(b) => {
                let edges: Vec<f32> = b
                    .left
                    .iter()
                    .zip(&b.width)
                    .flat_map(|(l, w)| [*l, l + w])
                    .collect();
                let mut heights = b.height.clone();
                heights.push(0.0);
                (data_extent(&edges), data_extent(&heights))
            }
            Self::Band(b) => {
                let ys: Vec<f32> = b.lower.iter().chain(&b.upper).copied().collect();
                (data_extent(&b.x), data_extent(&ys))
            }
            Self::Text(_) => (None, None),
        }
    }
}

/// Reject empty or mismatched `x`/`y` data.
pub(crate) fn check_xy(x: &[f32], y: &[f32]) -> Result<()> {
    if x.is_empty() {
        return Err(Error::EmptyData);
    }
    if x.len() != y.len() {
        return Err(Error::DataLengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(())
}

/// Reject opacities outside `0..=1`.
pub(crate) fn check_alpha(alpha: f32) -> Result<()> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(Error::invalid("alpha", alpha, "must be within 0..=1"))
    }
}

/// Bin `data` into `(edges, heights)`; `edges` has one more entry than
/// `heights`. Non-finite values are ignored.
pub(crate) fn histogram(
    data: &[f32],
    strategy: BinStrategy,
    density: bool,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let values: Vec<f32> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let (mut min, mut max) = data_extent(&values).ok_or(Error::EmptyData)?;
    if max - min <= f32::EPSILON * min.abs().max(1.0) {
        min -= 0.5;
        max += 0.5;
    }

    let bins = bin_count(&values, strategy, max - min);
    let bin_width = (max - min) / bins as f32;

    let mut counts = vec![0usize; bins];
    for &value in &values {
        let bin = ((value - min) / bin_width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }

    let edges = (0..=bins).map(|i| min + bin_width * i as f32).collect();
    let scale = if density {
        1.0 / (values.len() as f32 * bin_width)
    } else {
        1.0
    };
    let heights = counts.iter().map(|&c| c as f32 * scale).collect();
    Ok((edges, heights))
}

fn bin_count(values: &[f32], strategy: BinStrategy, range: f32) -> usize {
    let n = values.len() as f32;
    let sturges = (n.log2().ceil() + 1.0) as usize;
    let from_width = |width: f32| {
        if width > 0.0 {
            (range / width).ceil() as usize
        } else {
            sturges
        }
    };

    match strategy {
        BinStrategy::Sturges => sturges,
        BinStrategy::Scott => from_width(3.5 * std_dev(values) / n.cbrt()),
        BinStrategy::FreedmanDiaconis => from_width(2.0 * iqr(values) / n.cbrt()),
        BinStrategy::Fixed(bins) => bins,
    }
    .clamp(1, 10_000)
}

fn std_dev(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance =
        values.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / (values.len() - 1) as f32;
    variance.sqrt()
}

fn iqr(values: &[f32]) -> f32 {
    if values.len() < 4 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    sorted[3 * sorted.len() / 4] - sorted[sorted.len() / 4]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(n: usize) -> Vec<f32> {
        (0..n).map(|i| (i as f32 * 0.37).sin() * 3.0 + 5.0).collect()
    }

    #[test]
    fn test_sturges_bins() {
        let (edges, heights) = histogram(&sample(100), BinStrategy::Sturges, false).unwrap();
        assert_eq!(heights.len(), 8);
        assert_eq!(edges.len(), 9);
        assert_relative_eq!(heights.iter().sum::<f32>(), 100.0);
    }

    #[test]
    fn test_fixed_bins_cover_range() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0];
        let (edges, heights) = histogram(&data, BinStrategy::Fixed(4), false).unwrap();
        assert_relative_eq!(edges[0], 0.0);
        assert_relative_eq!(edges[4], 4.0);
        // Max lands in the last bin.
        assert_eq!(heights, vec![1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let (edges, heights) = histogram(&sample(300), BinStrategy::Fixed(20), true).unwrap();
        let area: f32 = heights
            .iter()
            .zip(edges.windows(2))
            .map(|(h, e)| h * (e[1] - e[0]))
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_scott_and_fd_produce_bins() {
        let data = sample(500);
        let (_, scott) = histogram(&data, BinStrategy::Scott, false).unwrap();
        let (_, fd) = histogram(&data, BinStrategy::FreedmanDiaconis, false).unwrap();
        assert!(scott.len() > 1);
        assert!(fd.len() > 1);
    }

    #[test]
    fn test_constant_data() {
        let (edges, heights) = histogram(&[2.0; 10], BinStrategy::Fixed(2), false).unwrap();
        assert_relative_eq!(edges[0], 1.5);
        assert_relative_eq!(edges[2], 2.5);
        assert_relative_eq!(heights.iter().sum::<f32>(), 10.0);
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert!(matches!(
            histogram(&[], BinStrategy::Sturges, false),
            Err(Error::EmptyData)
        ));
        assert!(matches!(
            histogram(&[f32::NAN], BinStrategy::Sturges, false),
            Err(Error::EmptyData)
        ));
        let (_, heights) = histogram(&[1.0, f32::NAN, 2.0], BinStrategy::Fixed(1), false).unwrap();
        assert_eq!(heights, vec![2.0]);
    }

    #[test]
    fn test_check_xy() {
        assert!(check_xy(&[1.0], &[2.0]).is_ok());
        assert!(matches!(check_xy(&[], &[]), Err(Error::EmptyData)));
        assert!(matches!(
            check_xy(&[1.0, 2.0], &[1.0]),
            Err(Error::DataLengthMismatch { x_len: 2, y_len: 1 })
        ));
    }

    #[test]
    fn test_bar_extents_include_zero() {
        let bars = Artist::Bars(Bars {
            left: vec![0.6, 1.6],
            width: vec![0.8, 0.8],
            height: vec![3.0, 5.0],
            color: Rgba::BLUE,
            label: None,
        });
        let (x, y) = bars.extents();
        let (x0, x1) = x.unwrap();
        assert_relative_eq!(x0, 0.6);
        assert_relative_eq!(x1, 2.4);
        assert_eq!(y, Some((0.0, 5.0)));
    }
}
