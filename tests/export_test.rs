//! Export round trips: every format written to disk and read back.
//!
//! Run: cargo test --test export_test

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use journal_style::render::Shape;
use journal_style::{
    make_figure, render_to_bytes, save, BBox, Error, ExportFormat, Figure, FigureSpec,
    HistSeries, LineSeries, PanelText, SaveOptions, ScatterSeries, StyleParams,
};
use std::path::Path;

/// A 2x2 figure with data, labels and a legend in every corner.
fn populated_figure(width_mm: f32, aspect: f32) -> Figure {
    let spec = FigureSpec::new()
        .width_mm(width_mm)
        .aspect_ratio(aspect)
        .grid(2, 2)
        .style(StyleParams::default());
    let mut fig = make_figure(&spec).unwrap();

    let x: Vec<f32> = (0..50).map(|i| i as f32 * 0.2).collect();
    let y: Vec<f32> = x.iter().map(|v| v.sin()).collect();
    let noise: Vec<f32> = (0..200).map(|i| ((i * 37) % 101) as f32 / 10.0).collect();

    for (i, panel) in fig.panels_mut().iter_mut().enumerate() {
        panel.plot(LineSeries::new(&x, &y).label("sin")).unwrap();
        panel
            .scatter(ScatterSeries::new(&x, &y).size(3.0).alpha(0.5))
            .unwrap();
        panel.set_xlabel("Time (s)");
        panel.set_ylabel("Signal");
        panel.set_title(format!("Panel {i}"));
        panel.text(PanelText::new(-0.15, 1.05, "A").bold());
        panel.legend();
    }
    fig.panels_mut()[(1, 1)]
        .hist(HistSeries::new(&noise).alpha(0.7))
        .unwrap();
    fig
}

fn attr(svg: &str, name: &str) -> String {
    let key = format!(" {name}=\"");
    let start = svg.find(&key).unwrap() + key.len();
    let end = svg[start..].find('"').unwrap();
    svg[start..start + end].to_string()
}

fn media_box(pdf: &[u8]) -> (f32, f32) {
    let text = String::from_utf8_lossy(pdf);
    let start = text.find("/MediaBox [").unwrap() + "/MediaBox [".len();
    let end = text[start..].find(']').unwrap();
    let nums: Vec<f32> = text[start..start + end]
        .split_whitespace()
        .map(|n| n.parse().unwrap())
        .collect();
    (nums[2] - nums[0], nums[3] - nums[1])
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let w = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let h = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (w, h)
}

// ============================================================================
// Vector round trips
// ============================================================================

#[test]
fn svg_declares_physical_size() {
    let fig = populated_figure(89.0, 0.8);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.svg");
    save(&fig, &path, &SaveOptions::new().bbox(BBox::Full)).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    let width: f32 = attr(&svg, "width").trim_end_matches("in").parse().unwrap();
    let height: f32 = attr(&svg, "height").trim_end_matches("in").parse().unwrap();
    assert_relative_eq!(width, fig.width_in(), epsilon = 1e-3);
    assert_relative_eq!(height, fig.height_in(), epsilon = 1e-3);

    let view_box = attr(&svg, "viewBox");
    let parts: Vec<f32> = view_box.split(' ').map(|n| n.parse().unwrap()).collect();
    assert_relative_eq!(parts[2], fig.width_in() * 72.0, epsilon = 1e-2);
}

#[test]
fn svg_keeps_text_as_text() {
    let fig = populated_figure(89.0, 0.8);
    let bytes = render_to_bytes(&fig, ExportFormat::Svg, &SaveOptions::new()).unwrap();
    let svg = String::from_utf8(bytes).unwrap();
    assert!(svg.contains(">Time (s)</text>"));
    assert!(svg.contains(">Panel 3</text>"));
    assert!(svg.contains(r#"font-weight="bold""#));
}

#[test]
fn pdf_media_box_matches_figure() {
    let fig = populated_figure(183.0, 0.5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.pdf");
    save(&fig, &path, &SaveOptions::new().bbox(BBox::Full)).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let (w, h) = media_box(&bytes);
    assert_relative_eq!(w / 72.0, fig.width_in(), epsilon = 1e-3);
    assert_relative_eq!(h / 72.0, fig.height_in(), epsilon = 1e-3);
}

// ============================================================================
// Raster sizes
// ============================================================================

#[test]
fn png_pixels_follow_dpi() {
    let fig = populated_figure(89.0, 0.8);
    for dpi in [72.0, 150.0, 300.0] {
        let options = SaveOptions::new().dpi(dpi).bbox(BBox::Full);
        let bytes = render_to_bytes(&fig, ExportFormat::Png, &options).unwrap();
        let (w, h) = png_size(&bytes);
        assert_eq!(w, (fig.width_in() * dpi).round() as u32);
        assert_eq!(h, (fig.height_in() * dpi).round() as u32);
    }
}

#[test]
fn tight_png_is_bounded_by_full_plus_pad() {
    let fig = populated_figure(89.0, 0.8);
    let dpi = 100.0;
    let pad = 0.1;
    let options = SaveOptions::new()
        .dpi(dpi)
        .bbox(BBox::Tight { pad_inches: pad });
    let (w, h) = png_size(&render_to_bytes(&fig, ExportFormat::Png, &options).unwrap());
    assert!(w as f32 <= (fig.width_in() + 2.0 * pad) * dpi + 1.0);
    assert!(h as f32 <= (fig.height_in() + 2.0 * pad) * dpi + 1.0);
}

/// Decode an RGBA PNG into `(width, pixels)`.
fn decode_png(bytes: &[u8]) -> (usize, Vec<u8>) {
    let mut reader = png::Decoder::new(bytes).read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgba);
    buf.truncate(info.buffer_size());
    (info.width as usize, buf)
}

#[test]
fn png_draws_labels() {
    let spec = FigureSpec::new()
        .width_mm(89.0)
        .aspect_ratio(0.8)
        .style(StyleParams::default());
    let mut fig = make_figure(&spec).unwrap();
    let panel = &mut fig.panels_mut()[(0, 0)];
    panel.plot(LineSeries::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0])).unwrap();
    panel.set_xlabel("Frequency (Hz)");

    let dpi = 200.0;
    let scale = dpi / 72.0;
    let scene = fig.to_scene().unwrap();
    let options = SaveOptions::new().dpi(dpi).bbox(BBox::Full);
    let bytes = render_to_bytes(&fig, ExportFormat::Png, &options).unwrap();
    let (width, pixels) = decode_png(&bytes);

    let inked = |text: &str| {
        let shape = scene
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Text(t) if t.text == text => Some(t),
                _ => None,
            })
            .unwrap();
        let b = shape.bounds();
        let (x0, x1) = ((b.x * scale) as usize, (b.right() * scale) as usize);
        let (y0, y1) = ((b.y * scale) as usize, (b.bottom() * scale) as usize);
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (y * width + x) * 4))
            .filter(|&i| pixels[i] < 128)
            .count()
    };
    assert!(inked("Frequency (Hz)") > 100);
    // Tick labels along x.
    assert!(inked("0.0") > 10);
    assert!(inked("2.0") > 10);
}

#[test]
fn tiff_matches_png_size_and_dpi() {
    let fig = populated_figure(57.0, 1.0);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.TIF");
    let options = SaveOptions::new().dpi(120.0).bbox(BBox::Full);
    save(&fig, &path, &options).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let mut decoder = tiff::decoder::Decoder::new(file).unwrap();
    let png = render_to_bytes(&fig, ExportFormat::Png, &options).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), png_size(&png));
    match decoder.get_tag(tiff::tags::Tag::XResolution).unwrap() {
        tiff::decoder::ifd::Value::Rational(n, d) => assert_eq!((n, d), (120, 1)),
        other => panic!("unexpected XResolution {other:?}"),
    }
}

#[test]
fn default_format_is_png() {
    let fig = populated_figure(89.0, 0.5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure");
    save(&fig, &path, &SaveOptions::new().dpi(50.0)).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn unsupported_extension() {
    let fig = populated_figure(89.0, 0.8);
    let err = save(&fig, Path::new("figure.jpeg"), &SaveOptions::new()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "jpeg"));
}

#[test]
fn unwritable_path_is_io_error() {
    let fig = populated_figure(89.0, 0.8);
    let dir = tempfile::tempdir().unwrap();
    // A regular file cannot be used as a directory.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    for name in ["f.svg", "f.pdf", "f.png", "f.tiff"] {
        let err = save(&fig, blocker.join(name), &SaveOptions::new().dpi(30.0)).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{name}: {err}");
    }
}

#[test]
fn non_positive_dpi_is_rejected() {
    let fig = populated_figure(89.0, 0.8);
    let err = render_to_bytes(&fig, ExportFormat::Png, &SaveOptions::new().dpi(0.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "dpi", .. }));
}

#[test]
fn oversized_raster_is_rejected() {
    let fig = populated_figure(89.0, 0.8);
    let options = SaveOptions::new().dpi(1.0e6).bbox(BBox::Full);
    for format in [ExportFormat::Png, ExportFormat::Tiff] {
        let err = render_to_bytes(&fig, format, &options).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }), "{format}: {err}");
    }
}
