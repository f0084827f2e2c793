//! Glyph rasterization for PNG/TIFF output.
//!
//! Text is drawn with bundled DejaVu faces (sans, serif and monospace, each
//! regular and bold), picked from the family name in the same order as the
//! PDF font resources. Glyphs are laid out at their em size, aligned on the
//! measured advance width, then rotated about the anchor.

use super::scene::{TextAnchor, TextShape};
use super::text::face_index;
use crate::framebuffer::Framebuffer;
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::sync::OnceLock;

static FACE_DATA: [&[u8]; 6] = [
    include_bytes!("../../fonts/DejaVuSans.ttf"),
    include_bytes!("../../fonts/DejaVuSans-Bold.ttf"),
    include_bytes!("../../fonts/DejaVuSerif.ttf"),
    include_bytes!("../../fonts/DejaVuSerif-Bold.ttf"),
    include_bytes!("../../fonts/DejaVuSansMono.ttf"),
    include_bytes!("../../fonts/DejaVuSansMono-Bold.ttf"),
];

static FACES: OnceLock<Vec<Option<Font<'static>>>> = OnceLock::new();

fn face(index: usize) -> Option<&'static Font<'static>> {
    FACES
        .get_or_init(|| FACE_DATA.iter().map(|data| Font::try_from_bytes(data)).collect())
        .get(index)?
        .as_ref()
}

/// Rusttype scale for an em size of `px` pixels.
fn em_scale(font: &Font<'_>, px: f32) -> Scale {
    let v = font.v_metrics_unscaled();
    let units_per_em = f32::from(font.units_per_em().max(1));
    Scale::uniform(px * (v.ascent - v.descent) / units_per_em)
}

/// Glyph coverage of one text run, in the run's own frame.
struct Coverage {
    width: usize,
    height: usize,
    alpha: Vec<f32>,
    /// Text-frame position of the buffer's top-left corner, relative to the
    /// anchor, in pixels.
    origin: (f32, f32),
}

impl Coverage {
    fn sample(&self, x: f32, y: f32) -> f32 {
        let (bx, by) = (x - self.origin.0, y - self.origin.1);
        if bx < 0.0 || by < 0.0 {
            return 0.0;
        }
        let (bx, by) = (bx as usize, by as usize);
        if bx >= self.width || by >= self.height {
            return 0.0;
        }
        self.alpha[by * self.width + bx]
    }
}

fn coverage(font: &Font<'_>, text: &TextShape, scale: f32) -> Option<Coverage> {
    let glyph_scale = em_scale(font, text.size * scale);
    let ascent = font.v_metrics(glyph_scale).ascent;
    let descent = font.v_metrics(glyph_scale).descent;
    let glyphs: Vec<PositionedGlyph<'_>> = font
        .layout(&text.text, glyph_scale, point(0.0, ascent))
        .collect();
    let advance = glyphs.last().map_or(0.0, |g| {
        g.position().x + g.unpositioned().h_metrics().advance_width
    });
    if advance <= 0.0 {
        return None;
    }

    let width = advance.ceil() as usize + 1;
    let height = (ascent - descent).ceil() as usize + 1;
    let mut alpha = vec![0.0; width * height];
    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let x = bb.min.x + gx as i32;
            let y = bb.min.y + gy as i32;
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                let cell = &mut alpha[y as usize * width + x as usize];
                *cell = (*cell + v).min(1.0);
            }
        });
    }

    let dx = match text.anchor {
        TextAnchor::Start => 0.0,
        TextAnchor::Middle => -advance / 2.0,
        TextAnchor::End => -advance,
    };
    let (_, dy) = text.baseline_offset();
    Some(Coverage {
        width,
        height,
        alpha,
        origin: (dx, dy * scale - ascent),
    })
}

/// Draw `text` into `fb` at `scale` pixels per point.
pub(crate) fn draw_text(fb: &mut Framebuffer, text: &TextShape, scale: f32) {
    if text.text.is_empty() || text.size * scale <= 0.0 {
        return;
    }
    let Some(font) = face(face_index(&text.family, text.weight)) else {
        log::warn!("no face for {:?}; text skipped", text.family);
        return;
    };
    let Some(run) = coverage(font, text, scale) else {
        return;
    };

    let (sin, cos) = text.rotation.to_radians().sin_cos();
    let anchor = (text.position.x * scale, text.position.y * scale);
    // Text frame to page: x along the run, y down, turned counter-clockwise.
    let to_page = |x: f32, y: f32| (anchor.0 + x * cos + y * sin, anchor.1 - x * sin + y * cos);

    let (ox, oy) = run.origin;
    let (w, h) = (run.width as f32, run.height as f32);
    let corners = [
        to_page(ox, oy),
        to_page(ox + w, oy),
        to_page(ox, oy + h),
        to_page(ox + w, oy + h),
    ];
    let xs = corners.map(|c| c.0);
    let ys = corners.map(|c| c.1);
    let low = |v: [f32; 4]| v.into_iter().fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let high = |v: [f32; 4]| v.into_iter().fold(f32::NEG_INFINITY, f32::max).ceil().max(0.0) as u32;
    let (x0, y0) = (low(xs), low(ys));
    let (x1, y1) = (high(xs).min(fb.width()), high(ys).min(fb.height()));

    for py in y0..y1 {
        for px in x0..x1 {
            // Page to text frame for the pixel center.
            let (dx, dy) = (px as f32 + 0.5 - anchor.0, py as f32 + 0.5 - anchor.1);
            let value = run.sample(dx * cos - dy * sin, dx * sin + dy * cos);
            if value > 0.0 {
                fb.blend_pixel(px, py, text.color.with_opacity(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::geometry::Point;
    use crate::render::scene::Baseline;
    use crate::render::text::FontWeight;

    fn run(text: &str, anchor: TextAnchor, rotation: f32) -> TextShape {
        TextShape {
            position: Point::new(50.0, 50.0),
            text: text.into(),
            size: 20.0,
            color: Rgba::BLACK,
            family: "sans-serif".into(),
            weight: FontWeight::Normal,
            anchor,
            baseline: Baseline::Middle,
            rotation,
        }
    }

    /// Inked pixel extent as `(x0, y0, x1, y1)`.
    fn ink(fb: &Framebuffer) -> Option<(u32, u32, u32, u32)> {
        let mut extent: Option<(u32, u32, u32, u32)> = None;
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.get_pixel(x, y).is_some_and(|p| p.r < 128) {
                    let e = extent.get_or_insert((x, y, x, y));
                    *e = (e.0.min(x), e.1.min(y), e.2.max(x), e.3.max(y));
                }
            }
        }
        extent
    }

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_every_face_loads() {
        for index in 0..FACE_DATA.len() {
            assert!(face(index).is_some(), "face {index}");
        }
    }

    #[test]
    fn test_start_anchor_inks_right_of_anchor() {
        let mut fb = canvas();
        draw_text(&mut fb, &run("Hx", TextAnchor::Start, 0.0), 1.0);
        let (x0, y0, x1, y1) = ink(&fb).unwrap();
        assert!(x0 >= 49 && x1 > 60);
        // Vertically centered on the anchor.
        assert!(y0 < 50 && y1 > 50);
    }

    #[test]
    fn test_middle_anchor_centers() {
        let mut fb = canvas();
        draw_text(&mut fb, &run("HHHH", TextAnchor::Middle, 0.0), 1.0);
        let (x0, _, x1, _) = ink(&fb).unwrap();
        let center = (x0 + x1) as f32 / 2.0;
        assert!((center - 50.0).abs() <= 2.0, "center {center}");
    }

    #[test]
    fn test_quarter_turn_runs_upward() {
        let mut fb = canvas();
        draw_text(&mut fb, &run("HHHH", TextAnchor::Start, 90.0), 1.0);
        let (x0, y0, x1, y1) = ink(&fb).unwrap();
        // Tall and narrow, extending up from the anchor.
        assert!(y1 - y0 > x1 - x0);
        assert!(y1 <= 51 && y0 < 30);
    }

    #[test]
    fn test_clip_is_respected() {
        let mut fb = canvas();
        fb.set_clip(Some([0, 0, 50, 100]));
        draw_text(&mut fb, &run("HHHH", TextAnchor::Start, 0.0), 1.0);
        assert!(ink(&fb).is_none());
    }
}
