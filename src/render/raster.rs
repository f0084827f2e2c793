//! Scene rasterization.
//!
//! Geometry goes through the anti-aliased primitives; text runs through the
//! bundled glyph faces.

use super::glyphs::draw_text;
use super::primitives::{fill_circle, fill_polygon, stroke_polyline, stroke_segment};
use super::scene::{Scene, Shape, Stroke};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::units::{inches_to_pixels, pixels_per_point, points_to_inches};

/// Render `scene` at `dpi` pixels per inch.
///
/// The canvas is `round(width_in * dpi) x round(height_in * dpi)` pixels.
///
/// # Errors
///
/// Returns an error if the resulting canvas would be empty.
pub fn rasterize(scene: &Scene, dpi: f32) -> Result<Framebuffer> {
    let width = inches_to_pixels(points_to_inches(scene.width), dpi);
    let height = inches_to_pixels(points_to_inches(scene.height), dpi);
    let mut fb = Framebuffer::new(width, height)?;
    fb.clear(scene.background.unwrap_or(Rgba::TRANSPARENT));

    let mut painter = Painter {
        fb: &mut fb,
        scale: pixels_per_point(dpi),
    };
    painter.draw_all(&scene.shapes);
    log::trace!("rasterized {} shapes into {width}x{height} px", scene.shapes.len());
    Ok(fb)
}

struct Painter<'a> {
    fb: &'a mut Framebuffer,
    scale: f32,
}

impl Painter<'_> {
    fn px(&self, p: Point) -> (f32, f32) {
        (p.x * self.scale, p.y * self.scale)
    }

    fn corners(&self, rect: &Rect) -> Vec<(f32, f32)> {
        [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ]
        .into_iter()
        .map(|p| self.px(p))
        .collect()
    }

    fn outline(&mut self, mut points: Vec<(f32, f32)>, stroke: &Stroke) {
        if let Some(first) = points.first().copied() {
            points.push(first);
            stroke_polyline(self.fb, &points, stroke.width * self.scale, stroke.color);
        }
    }

    fn draw_all(&mut self, shapes: &[Shape]) {
        for shape in shapes {
            self.draw(shape);
        }
    }

    fn draw(&mut self, shape: &Shape) {
        match shape {
            Shape::Line { from, to, stroke } => {
                let (from, to) = (self.px(*from), self.px(*to));
                stroke_segment(self.fb, from, to, stroke.width * self.scale, stroke.color);
            }
            Shape::Polyline { points, stroke } => {
                let points: Vec<_> = points.iter().map(|p| self.px(*p)).collect();
                stroke_polyline(self.fb, &points, stroke.width * self.scale, stroke.color);
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                let points: Vec<_> = points.iter().map(|p| self.px(*p)).collect();
                fill_polygon(self.fb, &points, *fill);
                if let Some(stroke) = stroke {
                    self.outline(points, stroke);
                }
            }
            Shape::Rect { rect, fill, stroke } => {
                let corners = self.corners(rect);
                if let Some(fill) = fill {
                    fill_polygon(self.fb, &corners, *fill);
                }
                if let Some(stroke) = stroke {
                    self.outline(corners, stroke);
                }
            }
            Shape::Circle {
                center,
                radius,
                fill,
            } => {
                let (cx, cy) = self.px(*center);
                fill_circle(self.fb, cx, cy, radius * self.scale, *fill);
            }
            Shape::Text(text) => draw_text(self.fb, text, self.scale),
            Shape::Group { clip, shapes } => {
                let saved = self.fb.clip();
                if let Some(rect) = clip {
                    let clip = self.intersect_clip(rect, saved);
                    self.fb.set_clip(Some(clip));
                }
                self.draw_all(shapes);
                self.fb.set_clip(saved);
            }
            // Same pixels either way; drawing the source avoids resampling.
            Shape::Image { source, .. } => self.draw_all(source),
        }
    }

    fn intersect_clip(&self, rect: &Rect, current: Option<[u32; 4]>) -> [u32; 4] {
        let to_px = |v: f32| (v * self.scale).round().max(0.0) as u32;
        let mut clip = [
            to_px(rect.x),
            to_px(rect.y),
            to_px(rect.right()),
            to_px(rect.bottom()),
        ];
        if let Some([x0, y0, x1, y1]) = current {
            clip = [
                clip[0].max(x0),
                clip[1].max(y0),
                clip[2].min(x1),
                clip[3].min(y1),
            ];
        }
        clip
    }
}
