//! A single set of axes.

use super::artist::{
    check_alpha, check_xy, histogram, Artist, BarSeries, Bars, FillBetween, HistSeries,
    LineSeries, PanelText, ScatterSeries,
};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::scale::{expand_extent, AUTOSCALE_MARGIN};
use crate::style::Palette;

/// One panel of a figure: its series, labels and axis limits.
///
/// Series without an explicit color take the next color of the style's
/// palette, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct Panel {
    artists: Vec<Artist>,
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    xlim: Option<(f32, f32)>,
    ylim: Option<(f32, f32)>,
    categories: Option<Vec<String>>,
    legend: bool,
    rasterized: bool,
    palette: Palette,
    next_color: usize,
}

impl Panel {
    pub(crate) fn new(palette: Palette) -> Self {
        Self {
            artists: Vec::new(),
            title: None,
            xlabel: None,
            ylabel: None,
            xlim: None,
            ylim: None,
            categories: None,
            legend: false,
            rasterized: false,
            palette,
            next_color: 0,
        }
    }

    fn take_color(&mut self, explicit: Option<Rgba>) -> Rgba {
        explicit.unwrap_or_else(|| {
            let color = self.palette.get(self.next_color);
            self.next_color += 1;
            color
        })
    }

    /// Draw a line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] or [`Error::DataLengthMismatch`] for bad
    /// data and [`Error::InvalidParameter`] for a bad width or alpha.
    ///
    /// # Example
    ///
    /// ```
    /// use journal_style::{make_figure, FigureSpec, LineSeries};
    ///
    /// let mut fig = make_figure(&FigureSpec::new()).unwrap();
    /// let t: Vec<f32> = (0..50).map(|i| i as f32 * 0.1).collect();
    /// let y: Vec<f32> = t.iter().map(|v| v.sin()).collect();
    /// fig.panels_mut()[(0, 0)].plot(LineSeries::new(&t, &y).label("sin")).unwrap();
    /// ```
    pub fn plot(&mut self, mut series: LineSeries) -> Result<()> {
        check_xy(&series.x, &series.y)?;
        check_alpha(series.alpha)?;
        if let Some(width) = series.width {
            check_size("width", width)?;
        }
        series.color = Some(self.take_color(series.color));
        self.artists.push(Artist::Line(series));
        Ok(())
    }

    /// Draw markers.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Panel::plot`].
    pub fn scatter(&mut self, mut series: ScatterSeries) -> Result<()> {
        check_xy(&series.x, &series.y)?;
        check_alpha(series.alpha)?;
        if let Some(size) = series.size {
            check_size("size", size)?;
        }
        series.color = Some(self.take_color(series.color));
        self.artists.push(Artist::Scatter(series));
        Ok(())
    }

    /// Draw a categorical bar chart. Categories are placed at 0, 1, 2, ...
    /// and label the x axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] or [`Error::DataLengthMismatch`] when
    /// categories and values disagree, and [`Error::InvalidParameter`] for a
    /// bar width outside `(0, 1]`.
    pub fn bar(&mut self, series: BarSeries) -> Result<()> {
        if series.values.is_empty() {
            return Err(Error::EmptyData);
        }
        if series.categories.len() != series.values.len() {
            return Err(Error::DataLengthMismatch {
                x_len: series.categories.len(),
                y_len: series.values.len(),
            });
        }
        if !(series.bar_width > 0.0 && series.bar_width <= 1.0) {
            return Err(Error::invalid(
                "bar_width",
                series.bar_width,
                "must be within (0, 1]",
            ));
        }
        check_alpha(series.alpha)?;

        let color = self.take_color(series.color).with_opacity(series.alpha);
        let n = series.values.len();
        self.artists.push(Artist::Bars(Bars {
            left: (0..n)
                .map(|i| i as f32 - series.bar_width / 2.0)
                .collect(),
            width: vec![series.bar_width; n],
            height: series.values,
            color,
            label: series.label,
        }));
        self.categories = Some(series.categories);
        Ok(())
    }

    /// Draw a histogram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] when there is no finite value and
    /// [`Error::InvalidParameter`] for a bad alpha.
    pub fn hist(&mut self, series: HistSeries) -> Result<()> {
        check_alpha(series.alpha)?;
        let (edges, heights) = histogram(&series.data, series.bins, series.density)?;
        log::debug!("histogram: {} bins over {} values", heights.len(), series.data.len());

        let color = self.take_color(series.color).with_opacity(series.alpha);
        self.artists.push(Artist::Bars(Bars {
            left: edges[..edges.len() - 1].to_vec(),
            width: edges.windows(2).map(|e| e[1] - e[0]).collect(),
            height: heights,
            color,
            label: series.label,
        }));
        Ok(())
    }

    /// Shade the band between two curves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] or [`Error::DataLengthMismatch`] when the
    /// three arrays differ in length.
    pub fn fill_between(&mut self, mut band: FillBetween) -> Result<()> {
        check_xy(&band.x, &band.lower)?;
        check_xy(&band.x, &band.upper)?;
        check_alpha(band.alpha)?;
        band.color = Some(self.take_color(band.color));
        self.artists.push(Artist::Band(band));
        Ok(())
    }

    /// Place text in axes-fraction coordinates.
    pub fn text(&mut self, text: PanelText) {
        self.artists.push(Artist::Text(text));
    }

    /// Set the panel title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set the x axis label.
    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = Some(label.into());
    }

    /// Set the y axis label.
    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = Some(label.into());
    }

    /// Fix the x range instead of autoscaling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `min < max`, both finite.
    pub fn set_xlim(&mut self, min: f32, max: f32) -> Result<()> {
        self.xlim = Some(check_limits("xlim", min, max)?);
        Ok(())
    }

    /// Fix the y range instead of autoscaling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `min < max`, both finite.
    pub fn set_ylim(&mut self, min: f32, max: f32) -> Result<()> {
        self.ylim = Some(check_limits("ylim", min, max)?);
        Ok(())
    }

    /// Show a legend of the labelled series.
    pub fn legend(&mut self) {
        self.legend = true;
    }

    /// Render this panel's data as an embedded image in vector output.
    /// Axes, ticks and text stay vector.
    pub fn set_rasterized(&mut self, rasterized: bool) {
        self.rasterized = rasterized;
    }

    /// Panel title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// X axis label.
    #[must_use]
    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    /// Y axis label.
    #[must_use]
    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    /// Whether the legend is shown.
    #[must_use]
    pub fn has_legend(&self) -> bool {
        self.legend
    }

    /// Whether data is rasterized in vector output.
    #[must_use]
    pub fn is_rasterized(&self) -> bool {
        self.rasterized
    }

    /// Number of series and text items.
    #[must_use]
    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub(crate) fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Whether any series contributes to autoscaling.
    pub(crate) fn has_data(&self) -> bool {
        self.artists.iter().any(|a| !matches!(a, Artist::Text(_)))
    }

    pub(crate) fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    /// Effective x range: the explicit limits, else the data range plus a
    /// 5% margin, else `(0, 1)`.
    #[must_use]
    pub fn xlim(&self) -> (f32, f32) {
        self.xlim.unwrap_or_else(|| self.autoscale(|a| a.extents().0))
    }

    /// Effective y range, like [`Panel::xlim`]. Bars stick to zero.
    #[must_use]
    pub fn ylim(&self) -> (f32, f32) {
        self.ylim.unwrap_or_else(|| {
            let (lo, hi) = self.autoscale(|a| a.extents().1);
            let has_bars = self.artists.iter().any(|a| matches!(a, Artist::Bars(_)));
            if has_bars && lo < 0.0 && self.data_min_y().is_some_and(|m| m >= 0.0) {
                (0.0, hi)
            } else {
                (lo, hi)
            }
        })
    }

    pub(crate) fn explicit_xlim(&self) -> Option<(f32, f32)> {
        self.xlim
    }

    pub(crate) fn explicit_ylim(&self) -> Option<(f32, f32)> {
        self.ylim
    }

    fn data_min_y(&self) -> Option<f32> {
        self.artists
            .iter()
            .filter_map(|a| a.extents().1)
            .map(|(lo, _)| lo)
            .reduce(f32::min)
    }

    fn autoscale(&self, extent: impl Fn(&Artist) -> Option<(f32, f32)>) -> (f32, f32) {
        self.artists
            .iter()
            .filter_map(extent)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
            .map_or((0.0, 1.0), |e| expand_extent(e, AUTOSCALE_MARGIN))
    }
}

fn check_size(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must be a positive number"))
    }
}

fn check_limits(name: &'static str, min: f32, max: f32) -> Result<(f32, f32)> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok((min, max))
    } else {
        Err(Error::invalid(
            name,
            format!("({min}, {max})"),
            "need finite min < max",
        ))
    }
}
