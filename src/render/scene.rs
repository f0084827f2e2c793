//! Display list shared by every output format.
//!
//! A figure is lowered once into a [`Scene`]: shapes in points, origin at the
//! top-left. The SVG and PDF encoders serialise the shapes; the rasteriser
//! fills pixels from them. Cropping to a tight bounding box is a translation
//! of the whole scene.

use super::text::{text_height, text_width, FontWeight, ASCENT, DESCENT};
use crate::color::Rgba;
use crate::geometry::{Point, Rect};

/// Stroke style for outlines and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Rgba,
    /// Width in points.
    pub width: f32,
}

impl Stroke {
    /// Create a stroke.
    #[must_use]
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    /// Anchor sits on the alphabetic baseline.
    #[default]
    Alphabetic,
    /// Anchor is at the vertical center of the glyph box.
    Middle,
    /// Anchor is at the top of the glyph box.
    Hanging,
}

/// A run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    /// Anchor position.
    pub position: Point,
    /// Content (single line).
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Fill color.
    pub color: Rgba,
    /// Font family.
    pub family: String,
    /// Font weight.
    pub weight: FontWeight,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: Baseline,
    /// Rotation in degrees, counter-clockwise as seen on the page.
    pub rotation: f32,
}

impl TextShape {
    /// Estimated width in points.
    #[must_use]
    pub fn width(&self) -> f32 {
        text_width(&self.text, self.size, &self.family, self.weight)
    }

    /// Offset from the anchor to the left end of the alphabetic baseline, in
    /// the text's own (unrotated) frame.
    #[must_use]
    pub fn baseline_offset(&self) -> (f32, f32) {
        let dx = match self.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -self.width() / 2.0,
            TextAnchor::End => -self.width(),
        };
        let dy = match self.baseline {
            Baseline::Alphabetic => 0.0,
            Baseline::Middle => (ASCENT - DESCENT) * self.size / 2.0,
            Baseline::Hanging => ASCENT * self.size,
        };
        (dx, dy)
    }

    /// Estimated extent on the page.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let (dx, dy) = self.baseline_offset();
        let top = dy - ASCENT * self.size;
        let local = [
            Point::new(dx, top),
            Point::new(dx + self.width(), top),
            Point::new(dx, top + text_height(self.size)),
            Point::new(dx + self.width(), top + text_height(self.size)),
        ];
        let (sin, cos) = (-self.rotation.to_radians()).sin_cos();
        let page: Vec<Point> = local
            .iter()
            .map(|p| {
                Point::new(
                    self.position.x + p.x * cos - p.y * sin,
                    self.position.y + p.x * sin + p.y * cos,
                )
            })
            .collect();
        Rect::bounding(&page).unwrap_or_default()
    }
}

/// A drawable element.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Straight segment.
    Line {
        /// Start.
        from: Point,
        /// End.
        to: Point,
        /// Stroke.
        stroke: Stroke,
    },
    /// Open connected segments.
    Polyline {
        /// Vertices.
        points: Vec<Point>,
        /// Stroke.
        stroke: Stroke,
    },
    /// Closed filled polygon.
    Polygon {
        /// Vertices.
        points: Vec<Point>,
        /// Fill color.
        fill: Rgba,
        /// Optional outline.
        stroke: Option<Stroke>,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Geometry.
        rect: Rect,
        /// Fill color.
        fill: Option<Rgba>,
        /// Optional outline.
        stroke: Option<Stroke>,
    },
    /// Filled circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius in points.
        radius: f32,
        /// Fill color.
        fill: Rgba,
    },
    /// Text run.
    Text(TextShape),
    /// Shapes drawn with an optional clip rectangle.
    Group {
        /// Clip rectangle.
        clip: Option<Rect>,
        /// Children.
        shapes: Vec<Shape>,
    },
    /// Pre-rendered PNG; vector encoders that cannot embed it draw `source`.
    Image {
        /// Placement.
        rect: Rect,
        /// Encoded PNG bytes.
        png: Vec<u8>,
        /// The shapes the image was rendered from.
        source: Vec<Shape>,
    },
}

fn stroke_pad(stroke: Option<&Stroke>) -> f32 {
    stroke.map_or(0.0, |s| s.width / 2.0)
}

impl Shape {
    /// Extent on the page including stroke width; `None` for invisible or
    /// empty shapes.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Line { from, to, stroke } => {
                Rect::bounding(&[*from, *to]).map(|r| r.expand(stroke.width / 2.0))
            }
            Self::Polyline { points, stroke } => {
                Rect::bounding(points).map(|r| r.expand(stroke.width / 2.0))
            }
            Self::Polygon { points, stroke, .. } => {
                Rect::bounding(points).map(|r| r.expand(stroke_pad(stroke.as_ref())))
            }
            Self::Rect { rect, stroke, .. } => Some(rect.expand(stroke_pad(stroke.as_ref()))),
            Self::Circle { center, radius, .. } => Some(Rect::new(
                center.x - radius,
                center.y - radius,
                2.0 * radius,
                2.0 * radius,
            )),
            Self::Text(text) => (!text.text.is_empty()).then(|| text.bounds()),
            Self::Group { clip, shapes } => {
                let content = union_bounds(shapes)?;
                match clip {
                    Some(c) => content.intersection(c),
                    None => Some(content),
                }
            }
            Self::Image { rect, .. } => Some(*rect),
        }
    }

    /// Move by `(dx, dy)` points.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        let shift = |p: &mut Point| *p = p.offset(dx, dy);
        let shift_rect = |r: &mut Rect| {
            r.x += dx;
            r.y += dy;
        };
        match self {
            Self::Line { from, to, .. } => {
                shift(from);
                shift(to);
            }
            Self::Polyline { points, .. } | Self::Polygon { points, .. } => {
                points.iter_mut().for_each(shift);
            }
            Self::Rect { rect, .. } => shift_rect(rect),
            Self::Circle { center, .. } => shift(center),
            Self::Text(text) => shift(&mut text.position),
            Self::Group { clip, shapes } => {
                if let Some(c) = clip {
                    shift_rect(c);
                }
                shapes.iter_mut().for_each(|s| s.translate(dx, dy));
            }
            Self::Image { rect, source, .. } => {
                shift_rect(rect);
                source.iter_mut().for_each(|s| s.translate(dx, dy));
            }
        }
    }
}

fn union_bounds(shapes: &[Shape]) -> Option<Rect> {
    shapes
        .iter()
        .filter_map(Shape::bounds)
        .reduce(|acc, r| acc.union(&r))
}

/// A page of shapes with a physical size in points.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Page background (`None` = transparent).
    pub background: Option<Rgba>,
    /// Shapes in paint order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            shapes: Vec::new(),
        }
    }

    /// Append a shape.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Union of every shape's extent.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Rect> {
        union_bounds(&self.shapes)
    }

    /// Re-frame the page to `frame`: shapes are translated so `frame`'s
    /// top-left becomes the origin and the page takes `frame`'s size.
    #[must_use]
    pub fn cropped(mut self, frame: Rect) -> Self {
        for shape in &mut self.shapes {
            shape.translate(-frame.x, -frame.y);
        }
        self.width = frame.width;
        self.height = frame.height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str, anchor: TextAnchor, baseline: Baseline, rotation: f32) -> TextShape {
        TextShape {
            position: Point::new(100.0, 100.0),
            text: text.to_string(),
            size: 10.0,
            color: Rgba::BLACK,
            family: "sans-serif".to_string(),
            weight: FontWeight::Normal,
            anchor,
            baseline,
            rotation,
        }
    }

    #[test]
    fn test_text_bounds_anchor() {
        let start = label("Time", TextAnchor::Start, Baseline::Alphabetic, 0.0).bounds();
        let end = label("Time", TextAnchor::End, Baseline::Alphabetic, 0.0).bounds();
        assert!((start.x - 100.0).abs() < 1e-4);
        assert!((end.right() - 100.0).abs() < 1e-4);
        assert!(start.y < 100.0 && start.bottom() > 100.0);
    }

    #[test]
    fn test_text_bounds_hanging() {
        let b = label("x", TextAnchor::Middle, Baseline::Hanging, 0.0).bounds();
        assert!((b.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotated_text_is_tall() {
        let b = label("Amplitude", TextAnchor::Middle, Baseline::Alphabetic, 90.0).bounds();
        assert!(b.height > b.width);
        assert!((b.center().y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_line_bounds_include_stroke() {
        let line = Shape::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            stroke: Stroke::new(Rgba::BLACK, 2.0),
        };
        assert_eq!(line.bounds(), Some(Rect::new(-1.0, -1.0, 12.0, 2.0)));
    }

    #[test]
    fn test_group_bounds_clipped() {
        let group = Shape::Group {
            clip: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            shapes: vec![Shape::Circle {
                center: Point::new(10.0, 10.0),
                radius: 5.0,
                fill: Rgba::RED,
            }],
        };
        assert_eq!(group.bounds(), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn test_crop_translates() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(Shape::Rect {
            rect: Rect::new(20.0, 30.0, 10.0, 10.0),
            fill: Some(Rgba::BLUE),
            stroke: None,
        });
        let bounds = scene.content_bounds().unwrap();
        let cropped = scene.cropped(bounds.expand(1.0));
        assert!((cropped.width - 12.0).abs() < 1e-4);
        assert_eq!(cropped.content_bounds(), Some(Rect::new(1.0, 1.0, 10.0, 10.0)));
    }

    #[test]
    fn test_empty_text_has_no_bounds() {
        let shape = Shape::Text(label("", TextAnchor::Start, Baseline::Alphabetic, 0.0));
        assert!(shape.bounds().is_none());
    }
}
