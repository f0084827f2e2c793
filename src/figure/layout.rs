//! Placement of the axes boxes on the page.
//!
//! Two strategies:
//!
//! - **constrained**: every column is as wide as its widest left and right
//!   decorations require (tick labels, axis labels), every row as tall as its
//!   titles and x labels require, and the remaining space is split among the
//!   axes by the width/height ratios. Axes in the same column therefore share
//!   their left edge.
//! - **fixed**: the classic subplot parameters (axes span 12.5%..90% of the
//!   width and 11%..88% of the height, 20% gaps), independent of content.

use super::options::PanelOptions;
use crate::geometry::Rect;

/// Padding between decorations and the page edge or a neighbouring panel,
/// in points.
pub(crate) const LAYOUT_PAD: f32 = 3.0;

/// Smallest share of the page an axes box is clamped to when decorations
/// leave no room.
const MIN_AXES_FRACTION: f32 = 0.05;

/// Space a panel needs outside its axes box, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Margins {
    pub(crate) left: f32,
    pub(crate) right: f32,
    pub(crate) top: f32,
    pub(crate) bottom: f32,
}

impl Margins {
    /// Grow the margins so `content` fits around `axes`.
    pub(crate) fn cover(&mut self, content: Rect, axes: Rect) {
        self.left = self.left.max(axes.x - content.x);
        self.top = self.top.max(axes.y - content.y);
        self.right = self.right.max(content.right() - axes.right());
        self.bottom = self.bottom.max(content.bottom() - axes.bottom());
    }
}

/// Grid description shared by both strategies.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grid<'a> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) options: &'a PanelOptions,
}

/// One axis of the grid: where each track starts and how long it is.
struct Tracks {
    starts: Vec<f32>,
    sizes: Vec<f32>,
}

/// Axes boxes in row-major order, sized around the given per-panel margins.
pub(crate) fn constrained(grid: Grid<'_>, margins: &[Margins]) -> Vec<Rect> {
    let column = |c: usize| (0..grid.rows).map(move |r| margins[r * grid.cols + c]);
    let row = |r: usize| (0..grid.cols).map(move |c| margins[r * grid.cols + c]);

    let lead_x: Vec<f32> = (0..grid.cols)
        .map(|c| column(c).map(|m| m.left).fold(0.0, f32::max))
        .collect();
    let trail_x: Vec<f32> = (0..grid.cols)
        .map(|c| column(c).map(|m| m.right).fold(0.0, f32::max))
        .collect();
    let lead_y: Vec<f32> = (0..grid.rows)
        .map(|r| row(r).map(|m| m.top).fold(0.0, f32::max))
        .collect();
    let trail_y: Vec<f32> = (0..grid.rows)
        .map(|r| row(r).map(|m| m.bottom).fold(0.0, f32::max))
        .collect();

    let xs = constrained_tracks(
        grid.width,
        &lead_x,
        &trail_x,
        &grid.options.column_weights(grid.cols),
        grid.options.wspace.unwrap_or(0.0),
    );
    let ys = constrained_tracks(
        grid.height,
        &lead_y,
        &trail_y,
        &grid.options.row_weights(grid.rows),
        grid.options.hspace.unwrap_or(0.0),
    );
    log::debug!(
        "constrained layout: columns {:?}pt wide, rows {:?}pt tall",
        xs.sizes,
        ys.sizes
    );
    assemble(&xs, &ys)
}

/// Axes boxes in row-major order from fixed subplot parameters.
pub(crate) fn fixed(grid: Grid<'_>) -> Vec<Rect> {
    let xs = subplot_tracks(
        0.125 * grid.width,
        0.9 * grid.width,
        &grid.options.column_weights(grid.cols),
        grid.options.wspace.unwrap_or(0.2),
    );
    // Rows run top to bottom: top = 0.88 of the height from the bottom.
    let ys = subplot_tracks(
        (1.0 - 0.88) * grid.height,
        (1.0 - 0.11) * grid.height,
        &grid.options.row_weights(grid.rows),
        grid.options.hspace.unwrap_or(0.2),
    );
    assemble(&xs, &ys)
}

fn assemble(xs: &Tracks, ys: &Tracks) -> Vec<Rect> {
    ys.starts
        .iter()
        .zip(&ys.sizes)
        .flat_map(|(y, h)| {
            xs.starts
                .iter()
                .zip(&xs.sizes)
                .map(move |(x, w)| Rect::new(*x, *y, *w, *h))
        })
        .collect()
}

fn constrained_tracks(
    length: f32,
    lead: &[f32],
    trail: &[f32],
    weights: &[f32],
    space: f32,
) -> Tracks {
    let n = weights.len();
    let decorations: f32 = lead.iter().chain(trail).sum();
    let pads = LAYOUT_PAD * (n + 1) as f32;
    let available = length - decorations - pads;

    // Gaps are `space` times the mean track size.
    let mut total = available / (1.0 + (n - 1) as f32 * space / n as f32);
    let floor = MIN_AXES_FRACTION * length * n as f32;
    if total < floor {
        log::warn!(
            "figure too small for its decorations: {total:.1}pt left for {n} panel(s) \
             along a {length:.1}pt side, clamping to {floor:.1}pt"
        );
        total = floor;
    }

    let weight_sum: f32 = weights.iter().sum();
    let sizes: Vec<f32> = weights.iter().map(|w| total * w / weight_sum).collect();
    let gap = space * total / n as f32;

    let mut starts = Vec::with_capacity(n);
    let mut cursor = LAYOUT_PAD;
    for i in 0..n {
        cursor += lead[i];
        starts.push(cursor);
        cursor += sizes[i] + trail[i] + LAYOUT_PAD + gap;
    }
    Tracks { starts, sizes }
}

fn subplot_tracks(start: f32, end: f32, weights: &[f32], space: f32) -> Tracks {
    let n = weights.len() as f32;
    let mean = (end - start) / (n + space * (n - 1.0));
    let gap = space * mean;
    let weight_sum: f32 = weights.iter().sum();

    let sizes: Vec<f32> = weights.iter().map(|w| mean * n * w / weight_sum).collect();
    let mut starts = Vec::with_capacity(sizes.len());
    let mut cursor = start;
    for size in &sizes {
        starts.push(cursor);
        cursor += size + gap;
    }
    Tracks { starts, sizes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(rows: usize, cols: usize, options: &PanelOptions) -> Grid<'_> {
        Grid {
            rows,
            cols,
            width: 500.0,
            height: 300.0,
            options,
        }
    }

    fn uniform(n: usize, m: Margins) -> Vec<Margins> {
        vec![m; n]
    }

    #[test]
    fn test_cover_only_grows() {
        let axes = Rect::new(50.0, 20.0, 100.0, 80.0);
        let mut m = Margins {
            left: 10.0,
            right: 0.0,
            top: 4.0,
            bottom: 8.0,
        };
        m.cover(Rect::new(30.0, 10.0, 20.0, 5.0), axes);
        assert_relative_eq!(m.left, 20.0);
        assert_relative_eq!(m.top, 10.0);
        assert_relative_eq!(m.right, 0.0);
        assert_relative_eq!(m.bottom, 8.0);
    }

    #[test]
    fn test_single_panel_fills_page() {
        let opts = PanelOptions::new();
        let margins = Margins {
            left: 30.0,
            right: 5.0,
            top: 12.0,
            bottom: 25.0,
        };
        let rects = constrained(grid(1, 1, &opts), &uniform(1, margins));
        assert_eq!(rects.len(), 1);
        let r = rects[0];
        assert_relative_eq!(r.x, 33.0);
        assert_relative_eq!(r.right(), 500.0 - 3.0 - 5.0);
        assert_relative_eq!(r.y, 15.0);
        assert_relative_eq!(r.bottom(), 300.0 - 3.0 - 25.0);
    }

    #[test]
    fn test_columns_align_on_widest_label() {
        let opts = PanelOptions::new();
        let narrow = Margins {
            left: 10.0,
            ..Margins::default()
        };
        let wide = Margins {
            left: 40.0,
            ..Margins::default()
        };
        // Column 0 has one wide label; both rows must share its left edge.
        let rects = constrained(grid(2, 2, &opts), &[narrow, narrow, wide, narrow]);
        assert_relative_eq!(rects[0].x, rects[2].x);
        assert_relative_eq!(rects[0].x, 43.0);
        assert_relative_eq!(rects[1].x, rects[3].x);
        assert_relative_eq!(rects[0].width, rects[1].width);
    }

    #[test]
    fn test_width_ratios() {
        let opts = PanelOptions::new().width_ratios([2.0, 1.0]);
        let rects = constrained(grid(1, 2, &opts), &uniform(2, Margins::default()));
        assert_relative_eq!(rects[0].width, 2.0 * rects[1].width, epsilon = 1e-3);
        assert!(rects[0].right() < rects[1].x);
    }

    #[test]
    fn test_wspace_widens_gap() {
        let tight = PanelOptions::new();
        let loose = PanelOptions::new().wspace(0.5);
        let a = constrained(grid(1, 2, &tight), &uniform(2, Margins::default()));
        let b = constrained(grid(1, 2, &loose), &uniform(2, Margins::default()));
        assert!(b[1].x - b[0].right() > a[1].x - a[0].right());
        assert_relative_eq!(b[1].right(), 497.0, epsilon = 1e-3);
    }

    #[test]
    fn test_too_small_is_clamped() {
        let opts = PanelOptions::new();
        let huge = Margins {
            left: 400.0,
            right: 200.0,
            top: 0.0,
            bottom: 0.0,
        };
        let rects = constrained(grid(1, 1, &opts), &uniform(1, huge));
        assert_relative_eq!(rects[0].width, 25.0);
    }

    #[test]
    fn test_fixed_subplot_params() {
        let opts = PanelOptions::new();
        let rects = fixed(grid(1, 1, &opts));
        let r = rects[0];
        assert_relative_eq!(r.x, 62.5);
        assert_relative_eq!(r.right(), 450.0);
        assert_relative_eq!(r.y, 36.0, epsilon = 1e-3);
        assert_relative_eq!(r.bottom(), 267.0, epsilon = 1e-3);
    }

    #[test]
    fn test_fixed_gap_is_fraction_of_mean() {
        let opts = PanelOptions::new();
        let rects = fixed(grid(1, 2, &opts));
        let gap = rects[1].x - rects[0].right();
        assert_relative_eq!(gap, 0.2 * rects[0].width, epsilon = 1e-3);
        assert_relative_eq!(rects[1].right(), 450.0, epsilon = 1e-3);
    }

    #[test]
    fn test_row_major_order() {
        let opts = PanelOptions::new();
        let rects = fixed(grid(2, 2, &opts));
        assert!(rects[1].x > rects[0].x);
        assert!(rects[2].y > rects[0].y);
        assert_relative_eq!(rects[2].x, rects[0].x);
    }
}
