//! Primitive rasterization.
//!
//! Everything is drawn in device pixels. Hairlines use Wu's algorithm; thicker
//! strokes, markers and fills go through the scanline polygon filler, which
//! samples each pixel row several times for anti-aliased edges.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// Sub-scanlines sampled per pixel row.
const SUBSAMPLES: usize = 4;

/// Strokes at or below this width (pixels) are drawn with Wu's algorithm.
const HAIRLINE: f32 = 1.0;

/// Draw an anti-aliased line using Wu's algorithm.
///
/// `intensity` scales the coverage, which lets sub-pixel strokes fade instead
/// of snapping to a full pixel.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(
    fb: &mut Framebuffer,
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
    color: Rgba,
    intensity: f32,
) {
    let bounds = (fb.width() as f32 + 1.0, fb.height() as f32 + 1.0);
    let Some(((x0, y0), (x1, y1))) = clip_segment((x0, y0), (x1, y1), bounds) else {
        return;
    };
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };

    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |major: i32, minor: i32, coverage: f32| {
        if steep {
            plot(fb, minor, major, color, coverage * intensity);
        } else {
            plot(fb, major, minor, color, coverage * intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    put(xpxl2, ypxl2, rfpart(yend) * xgap);
    put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Liang-Barsky clip of a segment to `[-1, max.0] x [-1, max.1]`.
fn clip_segment(
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
    max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-dx, x0 + 1.0),
        (dx, max.0 - x0),
        (-dy, y0 + 1.0),
        (dy, max.1 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    (t0 <= t1).then(|| {
        (
            (x0 + t0 * dx, y0 + t0 * dy),
            (x0 + t1 * dx, y0 + t1 * dy),
        )
    })
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        fb.blend_pixel(x as u32, y as u32, color.with_opacity(intensity));
    }
}

/// Fractional part of a float.
#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

/// Reverse fractional part.
#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

/// Fill a closed polygon (even-odd rule) with anti-aliased edges.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[(f32, f32)], color: Rgba) {
    if points.len() < 3 || color.a == 0 {
        return;
    }
    if points.iter().any(|p| !(p.0.is_finite() && p.1.is_finite())) {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.1), hi.max(p.1))
        });

    let row_start = (min_y.floor() as i32).max(0);
    let row_end = (max_y.ceil() as i32).min(fb.height() as i32);
    let width = fb.width() as usize;
    let weight = 1.0 / SUBSAMPLES as f32;

    let mut coverage = vec![0.0f32; width];
    let mut crossings = Vec::with_capacity(8);

    for row in row_start..row_end {
        coverage.fill(0.0);
        let mut touched = false;

        for sample in 0..SUBSAMPLES {
            let sy = row as f32 + (sample as f32 + 0.5) * weight;
            crossings.clear();
            for (i, &(x0, y0)) in points.iter().enumerate() {
                let (x1, y1) = points[(i + 1) % points.len()];
                if (y0 <= sy && y1 > sy) || (y1 <= sy && y0 > sy) {
                    let t = (sy - y0) / (y1 - y0);
                    crossings.push(x0 + t * (x1 - x0));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                touched |= accumulate_span(&mut coverage, span[0], span[1], weight);
            }
        }

        if touched {
            for (x, &c) in coverage.iter().enumerate() {
                if c > 0.0 {
                    fb.blend_pixel(x as u32, row as u32, color.with_opacity(c));
                }
            }
        }
    }
}

/// Add `weight` times the covered fraction of each pixel in `[x0, x1)`.
///
/// Returns whether any pixel was touched.
fn accumulate_span(coverage: &mut [f32], x0: f32, x1: f32, weight: f32) -> bool {
    let x0 = x0.max(0.0);
    let x1 = x1.min(coverage.len() as f32);
    if x1 <= x0 {
        return false;
    }

    let first = x0.floor() as usize;
    let last = x1.floor() as usize;
    if first == last {
        coverage[first] += (x1 - x0) * weight;
        return true;
    }

    coverage[first] += (first as f32 + 1.0 - x0) * weight;
    for c in &mut coverage[first + 1..last] {
        *c += weight;
    }
    if last < coverage.len() {
        coverage[last] += (x1 - last as f32) * weight;
    }
    true
}

/// Stroke a segment `width` pixels wide with butt caps.
pub fn stroke_segment(
    fb: &mut Framebuffer,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Rgba,
) {
    if width <= HAIRLINE {
        draw_line_aa(fb, from, to, color, width.max(0.0));
        return;
    }
    if let Some(quad) = segment_quad(from, to, width, 0.0) {
        fill_polygon(fb, &quad, color);
    }
}

/// Stroke connected segments. Interior joints get square caps so thick lines
/// do not show notches at corners.
pub fn stroke_polyline(fb: &mut Framebuffer, points: &[(f32, f32)], width: f32, color: Rgba) {
    if width <= HAIRLINE {
        for pair in points.windows(2) {
            draw_line_aa(fb, pair[0], pair[1], color, width.max(0.0));
        }
        return;
    }
    let last = points.len().saturating_sub(2);
    for (i, pair) in points.windows(2).enumerate() {
        let extend = if i < last { width / 2.0 } else { 0.0 };
        if let Some(quad) = segment_quad(pair[0], pair[1], width, extend) {
            fill_polygon(fb, &quad, color);
        }
    }
}

/// The rectangle covering a stroked segment, extended past `to` by `extend`.
fn segment_quad(
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
    width: f32,
    extend: f32,
) -> Option<[(f32, f32); 4]> {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len = dx.hypot(dy);
    if len < f32::EPSILON {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let (nx, ny) = (-uy * width / 2.0, ux * width / 2.0);
    let (ex, ey) = (x1 + ux * extend, y1 + uy * extend);
    Some([
        (x0 + nx, y0 + ny),
        (ex + nx, ey + ny),
        (ex - nx, ey - ny),
        (x0 - nx, y0 - ny),
    ])
}

/// Vertices approximating a circle, dense enough that facets stay below a
/// pixel.
#[must_use]
pub fn circle_points(cx: f32, cy: f32, radius: f32) -> Vec<(f32, f32)> {
    let segments = ((std::f32::consts::TAU * radius / 2.0).ceil() as usize).clamp(12, 256);
    (0..segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Fill a circle.
pub fn fill_circle(fb: &mut Framebuffer, cx: f32, cy: f32, radius: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }
    fill_polygon(fb, &circle_points(cx, cy, radius), color);
}
