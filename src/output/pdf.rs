//! PDF output encoder.
//!
//! Writes a single-page PDF 1.4 document whose `MediaBox` is the scene size in
//! points. Text uses the standard base-14 fonts (Helvetica, Times, Courier and
//! their bold faces), so nothing is embedded and text stays selectable.
//! Base-14 text is limited to `WinAnsiEncoding`: characters outside Latin-1
//! (other than the minus sign) are written as `?` and a warning is logged.
//! Use SVG when labels need other scripts or symbols.
//! Translucency goes through `ExtGState` dictionaries. Rasterized panels are
//! drawn from their vector source.

use super::num;
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::render::{face_index, Scene, Shape, Stroke, TextShape};
use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Base-14 fonts in resource order (`/F1` .. `/F6`).
const FONTS: [&str; 6] = [
    "Helvetica",
    "Helvetica-Bold",
    "Times-Roman",
    "Times-Bold",
    "Courier",
    "Courier-Bold",
];

/// PDF encoder for a scene.
#[derive(Debug, Clone, Copy)]
pub struct PdfEncoder<'a> {
    scene: &'a Scene,
}

impl<'a> PdfEncoder<'a> {
    /// Create an encoder for `scene`.
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Encode to PDF bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let scene = self.scene;
        let mut content = Content {
            ops: String::with_capacity(8192),
            page_height: scene.height,
            fill_alphas: BTreeSet::new(),
            stroke_alphas: BTreeSet::new(),
        };
        if let Some(bg) = scene.background {
            content.leaf(|c| {
                c.fill_color(bg);
                let _ = writeln!(c.ops, "0 0 {} {} re f", num(scene.width), num(scene.height));
            });
        }
        for shape in &scene.shapes {
            content.shape(shape);
        }

        let mut objects: Vec<String> = Vec::with_capacity(5 + FONTS.len());
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        objects.push("<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string());

        let fonts: String = (0..FONTS.len())
            .map(|i| format!("/F{} {} 0 R", i + 1, i + 6))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << {fonts} >> /ExtGState << {} >> >> /Contents 4 0 R >>",
            num(scene.width),
            num(scene.height),
            content.graphics_states()
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.ops.len(),
            content.ops
        ));
        objects.push(format!(
            "<< /Producer (journal-style {}) >>",
            env!("CARGO_PKG_VERSION")
        ));
        for font in FONTS {
            objects.push(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{font} /Encoding /WinAnsiEncoding >>"
            ));
        }

        assemble(&objects)
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(&self.to_bytes())?;
        Ok(())
    }
}

/// Number the objects from 1, then append the cross-reference table and
/// trailer. Object 5 is the info dictionary.
fn assemble(objects: &[String]) -> Vec<u8> {
    let mut out = String::with_capacity(objects.iter().map(String::len).sum::<usize>() + 1024);
    // Binary marker comment so transfer tools treat the file as binary.
    out.push_str("%PDF-1.4\n%\u{e2}\u{e3}\u{cf}\u{d3}\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", i + 1);
    }

    let xref = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    );
    out.into_bytes()
}

/// Content stream under construction.
struct Content {
    ops: String,
    page_height: f32,
    fill_alphas: BTreeSet<u8>,
    stroke_alphas: BTreeSet<u8>,
}

impl Content {
    /// Scene coordinates run down from the top; PDF runs up from the bottom.
    fn y(&self, y: f32) -> f32 {
        self.page_height - y
    }

    /// Run `draw` inside a saved graphics state.
    fn leaf(&mut self, draw: impl FnOnce(&mut Self)) {
        self.ops.push_str("q\n");
        draw(self);
        self.ops.push_str("Q\n");
    }

    fn fill_color(&mut self, color: Rgba) {
        let _ = writeln!(self.ops, "{} rg", rgb(color));
        if color.a < 255 {
            self.fill_alphas.insert(color.a);
            let _ = writeln!(self.ops, "/Gf{} gs", color.a);
        }
    }

    fn stroke_style(&mut self, stroke: &Stroke) {
        let _ = writeln!(self.ops, "{} RG {} w", rgb(stroke.color), num(stroke.width));
        if stroke.color.a < 255 {
            self.stroke_alphas.insert(stroke.color.a);
            let _ = writeln!(self.ops, "/Gs{} gs", stroke.color.a);
        }
    }

    fn path(&mut self, points: &[Point], close: bool) {
        for (i, p) in points.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let _ = writeln!(self.ops, "{} {} {op}", num(p.x), num(self.y(p.y)));
        }
        if close {
            self.ops.push_str("h\n");
        }
    }

    fn rect_path(&mut self, rect: &Rect) {
        let _ = writeln!(
            self.ops,
            "{} {} {} {} re",
            num(rect.x),
            num(self.y(rect.bottom())),
            num(rect.width),
            num(rect.height)
        );
    }

    fn circle_path(&mut self, center: Point, r: f32) {
        let (cx, cy) = (center.x, self.y(center.y));
        let k = KAPPA * r;
        let _ = writeln!(self.ops, "{} {} m", num(cx + r), num(cy));
        let arcs = [
            [(cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)],
            [(cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)],
            [(cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)],
            [(cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)],
        ];
        for [a, b, c] in arcs {
            let _ = writeln!(
                self.ops,
                "{} {} {} {} {} {} c",
                num(a.0),
                num(a.1),
                num(b.0),
                num(b.1),
                num(c.0),
                num(c.1)
            );
        }
        self.ops.push_str("h\n");
    }

    fn shape(&mut self, shape: &Shape) {
        match shape {
            Shape::Line { from, to, stroke } => self.leaf(|c| {
                c.stroke_style(stroke);
                c.path(&[*from, *to], false);
                c.ops.push_str("S\n");
            }),
            Shape::Polyline { points, stroke } => {
                if points.len() < 2 {
                    return;
                }
                self.leaf(|c| {
                    c.stroke_style(stroke);
                    c.ops.push_str("1 j\n");
                    c.path(points, false);
                    c.ops.push_str("S\n");
                });
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                if points.len() < 3 {
                    return;
                }
                self.leaf(|c| {
                    c.fill_color(*fill);
                    if let Some(s) = stroke {
                        c.stroke_style(s);
                    }
                    c.path(points, true);
                    c.ops.push_str(if stroke.is_some() { "B*\n" } else { "f*\n" });
                });
            }
            Shape::Rect { rect, fill, stroke } => {
                let op = match (fill, stroke) {
                    (Some(_), Some(_)) => "B",
                    (Some(_), None) => "f",
                    (None, Some(_)) => "S",
                    (None, None) => return,
                };
                self.leaf(|c| {
                    if let Some(f) = fill {
                        c.fill_color(*f);
                    }
                    if let Some(s) = stroke {
                        c.stroke_style(s);
                    }
                    c.rect_path(rect);
                    let _ = writeln!(c.ops, "{op}");
                });
            }
            Shape::Circle {
                center,
                radius,
                fill,
            } => self.leaf(|c| {
                c.fill_color(*fill);
                c.circle_path(*center, *radius);
                c.ops.push_str("f\n");
            }),
            Shape::Text(text) => {
                if !text.text.is_empty() {
                    self.leaf(|c| c.text(text));
                }
            }
            Shape::Group { clip, shapes } => self.leaf(|c| {
                if let Some(rect) = clip {
                    c.rect_path(rect);
                    c.ops.push_str("W n\n");
                }
                for child in shapes {
                    c.shape(child);
                }
            }),
            Shape::Image { source, .. } => {
                for child in source {
                    self.shape(child);
                }
            }
        }
    }

    fn text(&mut self, text: &TextShape) {
        let (dx, dy) = text.baseline_offset();
        // Baseline start on the page, y down.
        let (sin, cos) = (-text.rotation.to_radians()).sin_cos();
        let bx = text.position.x + dx * cos - dy * sin;
        let by = text.position.y + dx * sin + dy * cos;
        let (s, c) = text.rotation.to_radians().sin_cos();

        if !text.text.chars().all(encodable) {
            log::warn!("PDF text {:?} has characters outside Latin-1; written as '?'", text.text);
        }
        self.fill_color(text.color);
        let _ = writeln!(
            self.ops,
            "BT /F{} {} Tf {} {} {} {} {} {} Tm ({}) Tj ET",
            face_index(&text.family, text.weight) + 1,
            num(text.size),
            num(c),
            num(s),
            num(-s),
            num(c),
            num(bx),
            num(self.y(by)),
            pdf_string(&text.text)
        );
    }

    fn graphics_states(&self) -> String {
        let fills = self
            .fill_alphas
            .iter()
            .map(|a| format!("/Gf{a} << /Type /ExtGState /ca {} >>", num(f32::from(*a) / 255.0)));
        let strokes = self
            .stroke_alphas
            .iter()
            .map(|a| format!("/Gs{a} << /Type /ExtGState /CA {} >>", num(f32::from(*a) / 255.0)));
        fills.chain(strokes).collect::<Vec<_>>().join(" ")
    }
}

fn rgb(color: Rgba) -> String {
    format!(
        "{} {} {}",
        num(f32::from(color.r) / 255.0),
        num(f32::from(color.g) / 255.0),
        num(f32::from(color.b) / 255.0)
    )
}

/// Whether `ch` survives [`pdf_string`] unchanged in meaning.
fn encodable(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{a0}'..='\u{ff}' | '\u{2212}')
}

/// A literal string in `WinAnsiEncoding`; characters outside Latin-1 become `?`.
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\u{2212}' => out.push('-'),
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", u32::from(ch));
            }
            _ => out.push('?'),
        }
    }
    out
}
