#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Multi-Panel Example
//!
//! A 2x2 figure at full page width with a different plot in each panel,
//! addressed as `panels[(row, col)]`, and bold panel labels A to D.
//!
//! Run with: `cargo run --example multi_panel`
//!
//! Produces: multi_panel.svg, multi_panel.png

use journal_style::prelude::*;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

fn main() {
    env_logger::init();

    set_journal_style().expect("default style is valid");
    let mut rng = Pcg64Mcg::seed_from_u64(0);

    // Elsevier / Cell full width
    let spec = FigureSpec::new()
        .width_mm(178.0)
        .aspect_ratio(0.8)
        .grid(2, 2);
    let mut fig = make_figure(&spec).expect("Failed to create figure");
    let panels = fig.panels_mut();

    // Panel A: scatter
    let standard = Normal::new(0.0_f32, 1.0).expect("valid normal");
    let scatter_noise = Normal::new(0.0_f32, 0.5).expect("valid normal");
    let x: Vec<f32> = (0..80).map(|_| standard.sample(&mut rng)).collect();
    let y: Vec<f32> = x.iter().map(|v| 0.6 * v + scatter_noise.sample(&mut rng)).collect();
    let ax = &mut panels[(0, 0)];
    ax.scatter(ScatterSeries::new(&x, &y).alpha(0.6))
        .expect("Failed to add scatter");
    ax.set_xlabel("X");
    ax.set_ylabel("Y");
    ax.set_title("Scatter");

    // Panel B: lines
    let t: Vec<f32> = (0..200)
        .map(|i| i as f32 * 4.0 * std::f32::consts::PI / 199.0)
        .collect();
    let sin: Vec<f32> = t.iter().map(|v| v.sin()).collect();
    let cos: Vec<f32> = t.iter().map(|v| v.cos()).collect();
    let ax = &mut panels[(0, 1)];
    ax.plot(LineSeries::new(&t, &sin).label("sin"))
        .expect("Failed to add line");
    ax.plot(LineSeries::new(&t, &cos).label("cos"))
        .expect("Failed to add line");
    ax.set_xlabel("t");
    ax.set_ylabel("Amplitude");
    ax.set_title("Line plot");
    ax.legend();

    // Panel C: histogram
    let normal = Normal::new(5.0_f32, 1.5).expect("valid normal");
    let data: Vec<f32> = (0..300).map(|_| normal.sample(&mut rng)).collect();
    let ax = &mut panels[(1, 0)];
    ax.hist(HistSeries::new(&data).bins(BinStrategy::Fixed(20)).alpha(0.7))
        .expect("Failed to add histogram");
    ax.set_xlabel("Value");
    ax.set_ylabel("Count");
    ax.set_title("Histogram");

    // Panel D: bars
    let categories = ["A", "B", "C", "D", "E"];
    let values: Vec<f32> = categories
        .iter()
        .map(|_| rng.gen_range(3..15) as f32)
        .collect();
    let ax = &mut panels[(1, 1)];
    ax.bar(BarSeries::new(categories, &values).alpha(0.7))
        .expect("Failed to add bars");
    ax.set_xlabel("Category");
    ax.set_ylabel("Value");
    ax.set_title("Bar chart");

    // Panel labels in the top-left corner of each panel
    for (idx, ax) in panels.iter_mut().enumerate() {
        let label = char::from(b'A' + idx as u8).to_string();
        ax.text(
            PanelText::new(-0.15, 1.05, label)
                .size(10.0)
                .bold()
                .baseline(Baseline::Alphabetic),
        );
    }

    for path in ["multi_panel.svg", "multi_panel.png"] {
        save(&fig, path, &SaveOptions::new()).expect("Failed to save figure");
        println!("Saved: {path}");
    }
}
