//! Lowering a figure to a [`Scene`].
//!
//! Order of work: resolve axis limits (with sharing), pick ticks, measure the
//! decorations every panel needs, lay out the axes boxes, then emit shapes.

use super::artist::{Artist, HandleKind, PanelText};
use super::layout::{self, Grid, Margins};
use super::options::ShareAxes;
use super::panel::Panel;
use super::Figure;
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::output::PngEncoder;
use crate::render::{
    rasterize, text_height, text_width, Baseline, FontWeight, Scene, Shape, Stroke, TextAnchor,
    TextShape, DESCENT,
};
use crate::scale::{format_tick, nice_ticks, LinearScale, Scale};
use crate::style::{StyleParams, TickDirection, TickParams};
use std::collections::BTreeMap;

/// Gap between tick marks and tick labels, in points.
const TICK_PAD: f32 = 3.5;
/// Gap between tick labels and the axis label.
const LABEL_PAD: f32 = 4.0;
/// Gap between the axes box and the title.
const TITLE_PAD: f32 = 6.0;
/// Upper bound on tick intervals per axis.
const MAX_TICKS: usize = 5;

// Legend geometry in units of the legend font size.
const LEGEND_BORDER_PAD: f32 = 0.4;
const LEGEND_AXES_PAD: f32 = 0.5;
const LEGEND_LABEL_SPACING: f32 = 0.5;
const LEGEND_TEXT_PAD: f32 = 0.8;

/// What the scene is for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Target {
    /// Pixels: rasterized panels are drawn like any other.
    Raster,
    /// SVG/PDF: rasterized panels become embedded images at `dpi`.
    Vector { dpi: f32 },
}

/// One axis after limits and ticks are settled.
#[derive(Debug, Clone)]
struct Axis {
    limits: (f32, f32),
    ticks: Vec<f32>,
    labels: Vec<String>,
    show_labels: bool,
}

impl Axis {
    fn numeric(limits: (f32, f32), show_labels: bool) -> Self {
        let ticks = nice_ticks(limits.0, limits.1, MAX_TICKS);
        let step = match ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => 1.0,
        };
        let labels = ticks.iter().map(|t| format_tick(*t, step)).collect();
        Self {
            limits,
            ticks,
            labels,
            show_labels,
        }
    }

    fn categorical(limits: (f32, f32), categories: &[String], show_labels: bool) -> Self {
        let (ticks, labels) = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f32, c.clone()))
            .filter(|(t, _)| *t >= limits.0 && *t <= limits.1)
            .unzip();
        Self {
            limits,
            ticks,
            labels,
            show_labels,
        }
    }
}

/// Length of the part of a tick that sticks out of the axes box.
fn outward(ticks: &TickParams) -> f32 {
    match ticks.direction {
        TickDirection::Out => ticks.major_size,
        TickDirection::InOut => ticks.major_size / 2.0,
        TickDirection::In => 0.0,
    }
}

/// `(start, end)` offsets of a tick mark measured outward from the spine.
fn tick_span(ticks: &TickParams) -> (f32, f32) {
    match ticks.direction {
        TickDirection::Out => (0.0, ticks.major_size),
        TickDirection::InOut => (-ticks.major_size / 2.0, ticks.major_size / 2.0),
        TickDirection::In => (-ticks.major_size, 0.0),
    }
}

fn share_group(share: ShareAxes, index: usize, cols: usize) -> Option<usize> {
    match share {
        ShareAxes::None => None,
        ShareAxes::All => Some(0),
        ShareAxes::Row => Some(index / cols),
        ShareAxes::Column => Some(index % cols),
    }
}

/// Unify limits inside each share group. An explicit limit on any member
/// wins; otherwise the union of the members that hold data.
fn share_limits(
    limits: &mut [(f32, f32)],
    explicit: &[Option<(f32, f32)>],
    has_data: &[bool],
    share: ShareAxes,
    cols: usize,
) {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..limits.len() {
        if let Some(group) = share_group(share, i, cols) {
            groups.entry(group).or_default().push(i);
        }
    }
    for members in groups.values() {
        let unified = members.iter().find_map(|&i| explicit[i]).or_else(|| {
            members
                .iter()
                .filter(|&&i| has_data[i])
                .map(|&i| limits[i])
                .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
        });
        if let Some(unified) = unified {
            for &i in members {
                limits[i] = unified;
            }
        }
    }
}

/// Text run with the style's family and default alignment.
fn label(style: &StyleParams, position: Point, text: &str, size: f32, color: Rgba) -> TextShape {
    TextShape {
        position,
        text: text.to_string(),
        size,
        color,
        family: style.font.family.clone(),
        weight: FontWeight::Normal,
        anchor: TextAnchor::Start,
        baseline: Baseline::Alphabetic,
        rotation: 0.0,
    }
}

/// Per-panel state between the layout and drawing passes.
struct Frame<'a> {
    panel: &'a Panel,
    x: Axis,
    y: Axis,
}

impl Frame<'_> {
    fn ytick_label_width(&self, style: &StyleParams) -> f32 {
        if !self.y.show_labels {
            return 0.0;
        }
        self.y
            .labels
            .iter()
            .map(|l| text_width(l, style.ytick.label_size, &style.font.family, FontWeight::Normal))
            .fold(0.0, f32::max)
    }

    /// Extent of the free-standing panel texts once `axes` is known.
    fn text_bounds(&self, style: &StyleParams, axes: Rect) -> Option<Rect> {
        self.panel
            .artists()
            .iter()
            .filter_map(|artist| match artist {
                Artist::Text(text) => panel_text(style, text, axes).bounds(),
                _ => None,
            })
            .reduce(|a, b| a.union(&b))
    }

    fn margins(&self, style: &StyleParams) -> Margins {
        let mut left = outward(&style.ytick);
        if self.y.show_labels && !self.y.labels.is_empty() {
            left += TICK_PAD + self.ytick_label_width(style);
        }
        if self.panel.ylabel().is_some() {
            left += LABEL_PAD + text_height(style.font.label_size);
        }

        let mut bottom = outward(&style.xtick);
        if self.x.show_labels && !self.x.labels.is_empty() {
            bottom += TICK_PAD + text_height(style.xtick.label_size);
        }
        if self.panel.xlabel().is_some() {
            bottom += LABEL_PAD + text_height(style.font.label_size);
        }

        let top = if self.panel.title().is_some() {
            TITLE_PAD + text_height(style.font.title_size)
        } else if self.y.show_labels {
            text_height(style.ytick.label_size) / 2.0
        } else {
            0.0
        };

        // The last x tick label may hang past the right spine.
        let right = if self.x.show_labels {
            self.x
                .labels
                .last()
                .map_or(0.0, |l| {
                    text_width(l, style.xtick.label_size, &style.font.family, FontWeight::Normal)
                        / 2.0
                })
        } else {
            0.0
        };

        Margins {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Build the scene for `figure`.
pub(crate) fn lower(figure: &Figure, target: Target) -> Result<Scene> {
    let style = figure.style();
    let grid = figure.panels();
    let options = figure.options();
    let (rows, cols) = grid.shape();
    let panels: Vec<&Panel> = grid.iter().collect();
    let has_data: Vec<bool> = panels.iter().map(|p| p.has_data()).collect();

    let mut xlims: Vec<_> = panels.iter().map(|p| p.xlim()).collect();
    let mut ylims: Vec<_> = panels.iter().map(|p| p.ylim()).collect();
    let explicit_x: Vec<_> = panels.iter().map(|p| p.explicit_xlim()).collect();
    let explicit_y: Vec<_> = panels.iter().map(|p| p.explicit_ylim()).collect();
    share_limits(&mut xlims, &explicit_x, &has_data, options.share_x, cols);
    share_limits(&mut ylims, &explicit_y, &has_data, options.share_y, cols);

    let frames: Vec<Frame<'_>> = panels
        .iter()
        .enumerate()
        .map(|(i, &panel)| {
            let (row, col) = (i / cols, i % cols);
            let show_x = !matches!(options.share_x, ShareAxes::All | ShareAxes::Column)
                || row + 1 == rows;
            let show_y = !matches!(options.share_y, ShareAxes::All | ShareAxes::Row) || col == 0;
            let x = match panel.categories() {
                Some(categories) => Axis::categorical(xlims[i], categories, show_x),
                None => Axis::numeric(xlims[i], show_x),
            };
            Frame {
                panel,
                x,
                y: Axis::numeric(ylims[i], show_y),
            }
        })
        .collect();

    let (width, height) = figure.size_pt();
    let layout_grid = Grid {
        rows,
        cols,
        width,
        height,
        options,
    };
    let boxes = if style.constrained_layout {
        let mut margins: Vec<Margins> = frames.iter().map(|f| f.margins(style)).collect();
        let first = layout::constrained(layout_grid, &margins);
        // Panel texts sit at axes fractions, so a second pass makes room for them.
        let mut grew = false;
        for ((m, frame), axes) in margins.iter_mut().zip(&frames).zip(&first) {
            if let Some(content) = frame.text_bounds(style, *axes) {
                m.cover(content, *axes);
                grew = true;
            }
        }
        if grew {
            layout::constrained(layout_grid, &margins)
        } else {
            first
        }
    } else {
        layout::fixed(layout_grid)
    };

    let mut scene = Scene::new(width, height);
    for (frame, axes) in frames.iter().zip(&boxes) {
        draw_panel(&mut scene, style, frame, *axes, target)?;
    }
    log::debug!(
        "lowered {rows}x{cols} figure to {} shapes ({width:.1}x{height:.1}pt)",
        scene.shapes.len()
    );
    Ok(scene)
}

fn draw_panel(
    scene: &mut Scene,
    style: &StyleParams,
    frame: &Frame<'_>,
    axes: Rect,
    target: Target,
) -> Result<()> {
    let sx = LinearScale::new(frame.x.limits, (axes.x, axes.right()))?;
    let sy = LinearScale::new(frame.y.limits, (axes.bottom(), axes.y))?;

    let data = data_shapes(style, frame.panel, &sx, &sy);
    let clipped = Shape::Group {
        clip: Some(axes),
        shapes: data,
    };
    match target {
        Target::Vector { dpi } if frame.panel.is_rasterized() => {
            scene.push(embed_raster(clipped, axes, dpi)?);
        }
        _ => scene.push(clipped),
    }

    draw_spines(scene, style, axes);
    draw_x_axis(scene, style, frame, axes, &sx);
    draw_y_axis(scene, style, frame, axes, &sy);

    if let Some(title) = frame.panel.title() {
        scene.push(Shape::Text(TextShape {
            anchor: TextAnchor::Middle,
            ..label(
                style,
                Point::new(axes.center().x, axes.y - TITLE_PAD),
                title,
                style.font.title_size,
                style.text_color,
            )
        }));
    }

    if frame.panel.has_legend() {
        draw_legend(scene, style, frame.panel, axes);
    }

    for artist in frame.panel.artists() {
        if let Artist::Text(text) = artist {
            scene.push(panel_text(style, text, axes));
        }
    }
    Ok(())
}

fn data_shapes(
    style: &StyleParams,
    panel: &Panel,
    sx: &LinearScale,
    sy: &LinearScale,
) -> Vec<Shape> {
    let to_page = |x: f32, y: f32| Point::new(sx.scale(x), sy.scale(y));
    let finite = |x: f32, y: f32| x.is_finite() && y.is_finite();
    let mut shapes = Vec::new();

    for artist in panel.artists() {
        match artist {
            Artist::Line(series) => {
                let stroke = Stroke::new(
                    series.color.unwrap_or(style.text_color).with_opacity(series.alpha),
                    series.width.unwrap_or(style.lines.plot_width),
                );
                // Non-finite values break the line.
                let mut run = Vec::new();
                for (x, y) in series.x.iter().zip(&series.y) {
                    if finite(*x, *y) {
                        run.push(to_page(*x, *y));
                    } else if !run.is_empty() {
                        push_run(&mut shapes, std::mem::take(&mut run), stroke);
                    }
                }
                push_run(&mut shapes, run, stroke);
            }
            Artist::Scatter(series) => {
                let fill = series.color.unwrap_or(style.text_color).with_opacity(series.alpha);
                let radius = series.size.unwrap_or(style.lines.marker_size) / 2.0;
                shapes.extend(
                    series
                        .x
                        .iter()
                        .zip(&series.y)
                        .filter(|(x, y)| finite(**x, **y))
                        .map(|(x, y)| Shape::Circle {
                            center: to_page(*x, *y),
                            radius,
                            fill,
                        }),
                );
            }
            Artist::Bars(bars) => {
                for ((left, width), height) in bars.left.iter().zip(&bars.width).zip(&bars.height) {
                    if !finite(*left, *height) {
                        continue;
                    }
                    let a = to_page(*left, 0.0);
                    let b = to_page(left + width, *height);
                    let rect = Rect::from_corners(
                        Point::new(a.x.min(b.x), a.y.min(b.y)),
                        Point::new(a.x.max(b.x), a.y.max(b.y)),
                    );
                    shapes.push(Shape::Rect {
                        rect,
                        fill: Some(bars.color),
                        stroke: None,
                    });
                }
            }
            Artist::Band(band) => {
                let fill = band.color.unwrap_or(style.text_color).with_opacity(band.alpha);
                let upper = band
                    .x
                    .iter()
                    .zip(&band.upper)
                    .filter(|(x, y)| finite(**x, **y))
                    .map(|(x, y)| to_page(*x, *y));
                let lower = band
                    .x
                    .iter()
                    .zip(&band.lower)
                    .rev()
                    .filter(|(x, y)| finite(**x, **y))
                    .map(|(x, y)| to_page(*x, *y));
                let points: Vec<Point> = upper.chain(lower).collect();
                if points.len() >= 3 {
                    shapes.push(Shape::Polygon {
                        points,
                        fill,
                        stroke: None,
                    });
                }
            }
            Artist::Text(_) => {}
        }
    }
    shapes
}

fn push_run(shapes: &mut Vec<Shape>, points: Vec<Point>, stroke: Stroke) {
    if points.len() >= 2 {
        shapes.push(Shape::Polyline { points, stroke });
    }
}

/// Replace a clipped data group by an image rendered at `dpi`, keeping the
/// vector shapes as the source.
fn embed_raster(group: Shape, axes: Rect, dpi: f32) -> Result<Shape> {
    let mut local = group.clone();
    local.translate(-axes.x, -axes.y);
    let tile = Scene {
        width: axes.width,
        height: axes.height,
        background: None,
        shapes: vec![local],
    };
    let png = PngEncoder::to_bytes(&rasterize(&tile, dpi)?, Some(dpi))?;
    log::debug!("rasterized panel data into {} byte PNG at {dpi} dpi", png.len());
    Ok(Shape::Image {
        rect: axes,
        png,
        source: vec![group],
    })
}

fn draw_spines(scene: &mut Scene, style: &StyleParams, axes: Rect) {
    let stroke = Stroke::new(style.text_color, style.lines.axes_width);
    let (l, r, t, b) = (axes.x, axes.right(), axes.y, axes.bottom());
    let sides = [
        (style.spines.left, (l, t), (l, b)),
        (style.spines.bottom, (l, b), (r, b)),
        (style.spines.top, (l, t), (r, t)),
        (style.spines.right, (r, t), (r, b)),
    ];
    for (visible, from, to) in sides {
        if visible {
            scene.push(Shape::Line {
                from: Point::new(from.0, from.1),
                to: Point::new(to.0, to.1),
                stroke,
            });
        }
    }
}

fn draw_x_axis(
    scene: &mut Scene,
    style: &StyleParams,
    frame: &Frame<'_>,
    axes: Rect,
    sx: &LinearScale,
) {
    let ticks = &style.xtick;
    let stroke = Stroke::new(ticks.color, ticks.major_width);
    let (start, end) = tick_span(ticks);
    let base = axes.bottom();

    for (value, text) in frame.x.ticks.iter().zip(&frame.x.labels) {
        let x = sx.scale(*value);
        scene.push(Shape::Line {
            from: Point::new(x, base + start),
            to: Point::new(x, base + end),
            stroke,
        });
        if frame.x.show_labels {
            scene.push(Shape::Text(TextShape {
                anchor: TextAnchor::Middle,
                baseline: Baseline::Hanging,
                ..label(
                    style,
                    Point::new(x, base + outward(ticks) + TICK_PAD),
                    text,
                    ticks.label_size,
                    ticks.color,
                )
            }));
        }
    }

    if let Some(xlabel) = frame.panel.xlabel() {
        let mut y = base + outward(ticks) + LABEL_PAD;
        if frame.x.show_labels && !frame.x.labels.is_empty() {
            y += TICK_PAD + text_height(ticks.label_size);
        }
        scene.push(Shape::Text(TextShape {
            anchor: TextAnchor::Middle,
            baseline: Baseline::Hanging,
            ..label(
                style,
                Point::new(axes.center().x, y),
                xlabel,
                style.font.label_size,
                style.label_color,
            )
        }));
    }
}

fn draw_y_axis(
    scene: &mut Scene,
    style: &StyleParams,
    frame: &Frame<'_>,
    axes: Rect,
    sy: &LinearScale,
) {
    let ticks = &style.ytick;
    let stroke = Stroke::new(ticks.color, ticks.major_width);
    let (start, end) = tick_span(ticks);
    let base = axes.x;

    for (value, text) in frame.y.ticks.iter().zip(&frame.y.labels) {
        let y = sy.scale(*value);
        scene.push(Shape::Line {
            from: Point::new(base - start, y),
            to: Point::new(base - end, y),
            stroke,
        });
        if frame.y.show_labels {
            scene.push(Shape::Text(TextShape {
                anchor: TextAnchor::End,
                baseline: Baseline::Middle,
                ..label(
                    style,
                    Point::new(base - outward(ticks) - TICK_PAD, y),
                    text,
                    ticks.label_size,
                    ticks.color,
                )
            }));
        }
    }

    if let Some(ylabel) = frame.panel.ylabel() {
        let mut x = base - outward(ticks) - LABEL_PAD;
        if frame.y.show_labels && !frame.y.labels.is_empty() {
            x -= TICK_PAD + frame.ytick_label_width(style);
        }
        // Rotated a quarter turn: the descent faces the tick labels.
        x -= DESCENT * style.font.label_size;
        scene.push(Shape::Text(TextShape {
            anchor: TextAnchor::Middle,
            rotation: 90.0,
            ..label(
                style,
                Point::new(x, axes.center().y),
                ylabel,
                style.font.label_size,
                style.label_color,
            )
        }));
    }
}

fn draw_legend(scene: &mut Scene, style: &StyleParams, panel: &Panel, axes: Rect) {
    let entries: Vec<_> = panel
        .artists()
        .iter()
        .filter_map(Artist::legend_entry)
        .collect();
    if entries.is_empty() {
        log::debug!("legend requested on a panel without labelled series");
        return;
    }

    let fs = style.font.legend_size;
    let family = &style.font.family;
    let handle_length = style.legend.handle_length * fs;
    let handle_height = style.legend.handle_height * fs;
    let row = text_height(fs);
    let widest = entries
        .iter()
        .map(|(text, ..)| text_width(text, fs, family, FontWeight::Normal))
        .fold(0.0, f32::max);

    let n = entries.len() as f32;
    let width = 2.0 * LEGEND_BORDER_PAD * fs + handle_length + LEGEND_TEXT_PAD * fs + widest;
    let height = 2.0 * LEGEND_BORDER_PAD * fs + n * row + (n - 1.0) * LEGEND_LABEL_SPACING * fs;
    let frame = Rect::new(
        axes.right() - LEGEND_AXES_PAD * fs - width,
        axes.y + LEGEND_AXES_PAD * fs,
        width,
        height,
    );

    if style.legend.frame_on {
        scene.push(Shape::Rect {
            rect: frame,
            fill: Some(Rgba::WHITE.with_opacity(0.8)),
            stroke: Some(Stroke::new(Rgba::rgb(204, 204, 204), style.lines.axes_width)),
        });
    }

    let handle_x = frame.x + LEGEND_BORDER_PAD * fs;
    for (i, (text, kind, color)) in entries.into_iter().enumerate() {
        let cy = frame.y
            + LEGEND_BORDER_PAD * fs
            + i as f32 * (row + LEGEND_LABEL_SPACING * fs)
            + row / 2.0;
        let handle = match kind {
            HandleKind::Line { width } => Shape::Line {
                from: Point::new(handle_x, cy),
                to: Point::new(handle_x + handle_length, cy),
                stroke: Stroke::new(color, width.unwrap_or(style.lines.plot_width)),
            },
            HandleKind::Marker => Shape::Circle {
                center: Point::new(handle_x + handle_length / 2.0, cy),
                radius: style.lines.marker_size / 2.0,
                fill: color,
            },
            HandleKind::Patch => Shape::Rect {
                rect: Rect::new(handle_x, cy - handle_height / 2.0, handle_length, handle_height),
                fill: Some(color),
                stroke: None,
            },
        };
        scene.push(handle);
        scene.push(Shape::Text(TextShape {
            baseline: Baseline::Middle,
            ..label(
                style,
                Point::new(handle_x + handle_length + LEGEND_TEXT_PAD * fs, cy),
                text,
                fs,
                style.text_color,
            )
        }));
    }
}

fn panel_text(style: &StyleParams, text: &PanelText, axes: Rect) -> Shape {
    let position = Point::new(
        axes.x + text.x * axes.width,
        axes.bottom() - text.y * axes.height,
    );
    Shape::Text(TextShape {
        weight: if text.bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        },
        baseline: text.baseline,
        ..label(
            style,
            position,
            &text.text,
            text.size.unwrap_or(style.font.size),
            text.color.unwrap_or(style.text_color),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{make_figure, FigureSpec, PanelOptions};
    use crate::{BarSeries, LineSeries, ScatterSeries};

    fn texts(scene: &Scene) -> Vec<&TextShape> {
        scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn spec() -> FigureSpec {
        FigureSpec::new().style(StyleParams::default())
    }

    #[test]
    fn test_share_limits_union() {
        let mut limits = vec![(0.0, 1.0), (2.0, 5.0), (-1.0, 0.5), (0.0, 1.0)];
        let explicit = vec![None; 4];
        share_limits(&mut limits, &explicit, &[true; 4], ShareAxes::Column, 2);
        assert_eq!(limits, vec![(-1.0, 1.0), (0.0, 5.0), (-1.0, 1.0), (0.0, 5.0)]);
    }

    #[test]
    fn test_share_limits_explicit_wins_and_empty_ignored() {
        let mut limits = vec![(0.0, 1.0), (2.0, 5.0), (0.0, 1.0)];
        let explicit = vec![None, Some((3.0, 4.0)), None];
        share_limits(&mut limits, &explicit, &[true, true, false], ShareAxes::All, 3);
        assert!(limits.iter().all(|l| *l == (3.0, 4.0)));

        let mut limits = vec![(2.0, 5.0), (0.0, 1.0)];
        share_limits(&mut limits, &[None, None], &[true, false], ShareAxes::Row, 2);
        assert_eq!(limits, vec![(2.0, 5.0), (2.0, 5.0)]);
    }

    #[test]
    fn test_axes_inside_page() {
        let mut fig = make_figure(&spec().grid(2, 2)).unwrap();
        for panel in fig.panels_mut() {
            panel.plot(LineSeries::new(&[0.0, 1.0], &[0.0, 100.0])).unwrap();
            panel.set_xlabel("x");
            panel.set_ylabel("y");
            panel.set_title("t");
        }
        let scene = lower(&fig, Target::Raster).unwrap();
        let bounds = scene.content_bounds().unwrap();
        assert!(bounds.x >= -0.5 && bounds.y >= -0.5);
        assert!(bounds.right() <= scene.width + 0.5);
        assert!(bounds.bottom() <= scene.height + 0.5);
    }

    #[test]
    fn test_panel_labels_make_room() {
        let mut fig = make_figure(&spec().grid(2, 2)).unwrap();
        for panel in fig.panels_mut() {
            panel.plot(LineSeries::new(&[0.0, 1.0], &[0.0, 100.0])).unwrap();
            panel.set_ylabel("y");
            panel.text(PanelText::new(-0.15, 1.05, "A").bold());
        }
        let scene = lower(&fig, Target::Raster).unwrap();
        let label = texts(&scene)
            .into_iter()
            .find(|t| t.text == "A")
            .unwrap()
            .bounds();
        assert!(label.x >= -0.5 && label.y >= -0.5);
    }

    #[test]
    fn test_shared_x_hides_inner_labels() {
        let options = PanelOptions::new().share_x(ShareAxes::All);
        let mut fig = make_figure(&spec().grid(2, 1).options(options)).unwrap();
        fig.panels_mut()[(0, 0)]
            .plot(LineSeries::new(&[0.0, 10.0], &[0.0, 1.0]))
            .unwrap();
        fig.panels_mut()[(1, 0)]
            .plot(LineSeries::new(&[0.0, 1.0], &[0.0, 1.0]))
            .unwrap();
        let scene = lower(&fig, Target::Raster).unwrap();
        // Only the bottom panel labels x, with the shared range.
        let tens = texts(&scene).iter().filter(|t| t.text == "10.0").count();
        assert_eq!(tens, 1);
    }

    #[test]
    fn test_categories_label_axis() {
        let mut fig = make_figure(&spec()).unwrap();
        fig.panels_mut()[(0, 0)]
            .bar(BarSeries::new(["A", "B", "C"], &[1.0, 2.0, 3.0]))
            .unwrap();
        let scene = lower(&fig, Target::Raster).unwrap();
        let labels: Vec<_> = texts(&scene).iter().map(|t| t.text.clone()).collect();
        for c in ["A", "B", "C"] {
            assert!(labels.iter().any(|l| l == c));
        }
    }

    #[test]
    fn test_legend_lists_labelled_series() {
        let mut fig = make_figure(&spec()).unwrap();
        let panel = &mut fig.panels_mut()[(0, 0)];
        panel.plot(LineSeries::new(&[0.0, 1.0], &[0.0, 1.0]).label("True signal")).unwrap();
        panel.scatter(ScatterSeries::new(&[0.5], &[0.5])).unwrap();
        panel.legend();
        let scene = lower(&fig, Target::Raster).unwrap();
        assert_eq!(
            texts(&scene).iter().filter(|t| t.text == "True signal").count(),
            1
        );
    }

    #[test]
    fn test_rasterized_panel_embeds_png() {
        let mut fig = make_figure(&spec()).unwrap();
        let panel = &mut fig.panels_mut()[(0, 0)];
        panel.scatter(ScatterSeries::new(&[0.0, 1.0], &[0.0, 1.0])).unwrap();
        panel.set_rasterized(true);

        let vector = lower(&fig, Target::Vector { dpi: 150.0 }).unwrap();
        let image = vector.shapes.iter().find_map(|s| match s {
            Shape::Image { png, source, .. } => Some((png, source)),
            _ => None,
        });
        let (png, source) = image.expect("rasterized panel becomes an image");
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(source.len(), 1);

        let raster = lower(&fig, Target::Raster).unwrap();
        assert!(!raster.shapes.iter().any(|s| matches!(s, Shape::Image { .. })));
    }

    #[test]
    fn test_fixed_layout_when_constrained_off() {
        let mut style = StyleParams::default();
        style.constrained_layout = false;
        let fig = make_figure(&FigureSpec::new().style(style)).unwrap();
        let scene = lower(&fig, Target::Raster).unwrap();
        let left_spine = scene.shapes.iter().find_map(|s| match s {
            Shape::Line { from, to, .. } if (from.x - to.x).abs() < 1e-6 => Some(from.x),
            _ => None,
        });
        let expected = 0.125 * scene.width;
        assert!((left_spine.unwrap() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_line_breaks_at_nan() {
        let mut fig = make_figure(&spec()).unwrap();
        fig.panels_mut()[(0, 0)]
            .plot(LineSeries::new(
                &[0.0, 1.0, 2.0, 3.0, 4.0],
                &[0.0, 1.0, f32::NAN, 1.0, 0.0],
            ))
            .unwrap();
        let scene = lower(&fig, Target::Raster).unwrap();
        let Shape::Group { shapes, .. } = &scene.shapes[0] else {
            panic!("first shape is the data group");
        };
        assert_eq!(shapes.len(), 2);
    }
}
