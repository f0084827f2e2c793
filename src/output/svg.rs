//! SVG output encoder.
//!
//! Serialises a [`Scene`] as vector SVG. The document declares its physical
//! size in inches and a `viewBox` in points, so one user unit is one point.
//! Text stays as `<text>` elements, editable in vector tools; rasterized
//! panels are embedded as base64 PNG images.

use super::num;
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::render::{FontWeight, Scene, Shape, Stroke, TextAnchor, TextShape};
use crate::units::points_to_inches;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for a scene.
#[derive(Debug, Clone, Copy)]
pub struct SvgEncoder<'a> {
    scene: &'a Scene,
}

/// Output buffer plus the running clip-path counter.
struct Document {
    svg: String,
    next_clip: usize,
}

impl<'a> SvgEncoder<'a> {
    /// Create an encoder for `scene`.
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let scene = self.scene;
        let mut doc = Document {
            svg: String::with_capacity(4096),
            next_clip: 0,
        };

        let _ = writeln!(doc.svg, r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#);
        let _ = writeln!(
            doc.svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="{}in" height="{}in" viewBox="0 0 {} {}">"#,
            num(points_to_inches(scene.width)),
            num(points_to_inches(scene.height)),
            num(scene.width),
            num(scene.height)
        );

        if let Some(bg) = scene.background {
            let _ = writeln!(
                doc.svg,
                r#"  <rect width="100%" height="100%"{}/>"#,
                paint("fill", bg)
            );
        }

        for shape in &scene.shapes {
            doc.shape(shape, 1);
        }

        doc.svg.push_str("</svg>\n");
        doc.svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

impl Document {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.svg.push_str("  ");
        }
    }

    fn shape(&mut self, shape: &Shape, depth: usize) {
        match shape {
            Shape::Group { clip, shapes } => self.group(clip.as_ref(), shapes, depth),
            Shape::Image { rect, png, .. } => {
                self.indent(depth);
                let _ = writeln!(
                    self.svg,
                    r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="data:image/png;base64,{}"/>"#,
                    num(rect.x),
                    num(rect.y),
                    num(rect.width),
                    num(rect.height),
                    STANDARD.encode(png)
                );
            }
            _ => {
                if let Some(element) = element_to_svg(shape) {
                    self.indent(depth);
                    let _ = writeln!(self.svg, "{element}");
                }
            }
        }
    }

    fn group(&mut self, clip: Option<&Rect>, shapes: &[Shape], depth: usize) {
        self.indent(depth);
        match clip {
            Some(rect) => {
                let id = format!("clip{}", self.next_clip);
                self.next_clip += 1;
                let _ = writeln!(
                    self.svg,
                    r#"<defs><clipPath id="{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
                    num(rect.x),
                    num(rect.y),
                    num(rect.width),
                    num(rect.height)
                );
                self.indent(depth);
                let _ = writeln!(self.svg, r#"<g clip-path="url(#{id})">"#);
            }
            None => self.svg.push_str("<g>\n"),
        }
        for child in shapes {
            self.shape(child, depth + 1);
        }
        self.indent(depth);
        self.svg.push_str("</g>\n");
    }
}

/// Convert RGBA to a CSS color string.
fn rgba_to_css(color: Rgba) -> String {
    format!("rgb({},{},{})", color.r, color.g, color.b)
}

/// A paint attribute plus its opacity when the color is translucent.
fn paint(attr: &str, color: Rgba) -> String {
    if color.a == 255 {
        format!(r#" {attr}="{}""#, rgba_to_css(color))
    } else {
        format!(
            r#" {attr}="{}" {attr}-opacity="{}""#,
            rgba_to_css(color),
            num(color.opacity())
        )
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    match stroke {
        Some(s) => format!(r#"{} stroke-width="{}""#, paint("stroke", s.color), num(s.width)),
        None => r#" stroke="none""#.to_string(),
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert a leaf shape to an SVG element string.
fn element_to_svg(shape: &Shape) -> Option<String> {
    let element = match shape {
        Shape::Line { from, to, stroke } => format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(Some(stroke))
        ),
        Shape::Polyline { points, stroke } => {
            if points.len() < 2 {
                return None;
            }
            format!(
                r#"<polyline points="{}" fill="none"{} stroke-linejoin="round"/>"#,
                points_attr(points),
                stroke_attrs(Some(stroke))
            )
        }
        Shape::Polygon {
            points,
            fill,
            stroke,
        } => {
            if points.len() < 3 {
                return None;
            }
            format!(
                r#"<polygon points="{}"{}{}/>"#,
                points_attr(points),
                paint("fill", *fill),
                stroke_attrs(stroke.as_ref())
            )
        }
        Shape::Rect { rect, fill, stroke } => {
            let fill_attr = fill.map_or_else(|| r#" fill="none""#.to_string(), |f| paint("fill", f));
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}"{fill_attr}{}/>"#,
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height),
                stroke_attrs(stroke.as_ref())
            )
        }
        Shape::Circle {
            center,
            radius,
            fill,
        } => format!(
            r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
            num(center.x),
            num(center.y),
            num(*radius),
            paint("fill", *fill)
        ),
        Shape::Text(text) => {
            if text.text.is_empty() {
                return None;
            }
            text_to_svg(text)
        }
        Shape::Group { .. } | Shape::Image { .. } => return None,
    };
    Some(element)
}

fn text_to_svg(text: &TextShape) -> String {
    let anchor = match text.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let (x, y) = (text.position.x, text.position.y);

    let mut attrs = format!(
        r#"x="{}" y="{}" font-family="{}" font-size="{}"{} text-anchor="{anchor}""#,
        num(x),
        num(y),
        escape_xml(&text.family),
        num(text.size),
        paint("fill", text.color)
    );
    if text.weight == FontWeight::Bold {
        attrs.push_str(r#" font-weight="bold""#);
    }
    // Shift to the alphabetic baseline in the text's own frame.
    let (_, dy) = text.baseline_offset();
    if dy != 0.0 {
        let _ = write!(attrs, r#" dy="{}""#, num(dy));
    }
    if text.rotation != 0.0 {
        let _ = write!(
            attrs,
            r#" transform="rotate({} {} {})""#,
            num(-text.rotation),
            num(x),
            num(y)
        );
    }
    format!("<text {attrs}>{}</text>", escape_xml(&text.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Baseline;

    fn label(text: &str) -> TextShape {
        TextShape {
            position: Point::new(10.0, 20.0),
            text: text.to_string(),
            size: 8.0,
            color: Rgba::BLACK,
            family: "Arial".to_string(),
            weight: FontWeight::Normal,
            anchor: TextAnchor::Middle,
            baseline: Baseline::Alphabetic,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_header_in_inches_and_points() {
        let scene = Scene::new(252.0, 126.0);
        let svg = SvgEncoder::new(&scene).render();

        assert!(svg.contains(r#"width="3.5in""#));
        assert!(svg.contains(r#"height="1.75in""#));
        assert!(svg.contains(r#"viewBox="0 0 252 126""#));
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_transparent_background_is_omitted() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.background = None;
        let svg = SvgEncoder::new(&scene).render();
        assert!(!svg.contains("100%"));
    }

    #[test]
    fn test_text_kept_as_text() {
        let mut scene = Scene::new(100.0, 100.0);
        let mut rotated = label("Amplitude & <phase>");
        rotated.rotation = 90.0;
        rotated.weight = FontWeight::Bold;
        scene.push(Shape::Text(rotated));
        let svg = SvgEncoder::new(&scene).render();

        assert!(svg.contains("<text "));
        assert!(svg.contains("Amplitude &amp; &lt;phase&gt;"));
        assert!(svg.contains(r#"font-family="Arial""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"transform="rotate(-90 10 20)""#));
    }

    #[test]
    fn test_hanging_text_shifts_baseline() {
        let mut scene = Scene::new(100.0, 100.0);
        let mut hanging = label("A");
        hanging.baseline = Baseline::Hanging;
        scene.push(Shape::Text(hanging));
        let svg = SvgEncoder::new(&scene).render();
        assert!(svg.contains(r#"dy="5.76""#));
    }

    #[test]
    fn test_translucent_fill_uses_opacity() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(Shape::Circle {
            center: Point::new(5.0, 5.0),
            radius: 2.0,
            fill: Rgba::BLUE.with_opacity(0.5),
        });
        let svg = SvgEncoder::new(&scene).render();
        assert!(svg.contains(r#"fill="rgb(0,0,255)" fill-opacity="0.502""#));
    }

    #[test]
    fn test_clip_groups_get_unique_ids() {
        let mut scene = Scene::new(100.0, 100.0);
        for _ in 0..2 {
            scene.push(Shape::Group {
                clip: Some(Rect::new(0.0, 0.0, 50.0, 50.0)),
                shapes: vec![Shape::Line {
                    from: Point::new(0.0, 0.0),
                    to: Point::new(80.0, 80.0),
                    stroke: Stroke::new(Rgba::BLACK, 0.5),
                }],
            });
        }
        let svg = SvgEncoder::new(&scene).render();
        assert!(svg.contains(r#"clip-path="url(#clip0)""#));
        assert!(svg.contains(r#"clip-path="url(#clip1)""#));
        assert_eq!(svg.matches("</g>").count(), 2);
    }

    #[test]
    fn test_image_is_data_uri() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(Shape::Image {
            rect: Rect::new(1.0, 2.0, 30.0, 40.0),
            png: vec![137, 80, 78, 71],
            source: Vec::new(),
        });
        let svg = SvgEncoder::new(&scene).render();
        assert!(svg.contains("xlink:href=\"data:image/png;base64,iVBORw==\""));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fig.svg");
        SvgEncoder::new(&Scene::new(72.0, 72.0)).write_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#"width="1in""#));
    }
}
