#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Line Plot Example
//!
//! Mean and standard-deviation bands over simulated replicates, with a
//! customised style (8 pt text, 0.7 pt lines) and a landscape figure.
//!
//! Run with: `cargo run --example line_plot`
//!
//! Produces: line_plot.svg, line_plot.png

use journal_style::prelude::*;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

const REPLICATES: usize = 20;

/// Per-timepoint mean and population standard deviation across replicates.
fn mean_std(replicates: &[Vec<f32>]) -> (Vec<f32>, Vec<f32>) {
    let n = replicates.len() as f32;
    let len = replicates[0].len();
    let mean: Vec<f32> = (0..len)
        .map(|i| replicates.iter().map(|r| r[i]).sum::<f32>() / n)
        .collect();
    let std = (0..len)
        .map(|i| {
            let var = replicates.iter().map(|r| (r[i] - mean[i]).powi(2)).sum::<f32>() / n;
            var.sqrt()
        })
        .collect();
    (mean, std)
}

fn main() {
    env_logger::init();

    // Slightly larger text and thicker lines
    set_style(&StyleConfig::new().base_font_size(8.0).line_width(0.7)).expect("valid style");

    let mut rng = Pcg64Mcg::seed_from_u64(99);
    let noise = Normal::new(0.0_f32, 0.08).expect("valid normal");
    let time: Vec<f32> = (0..100).map(|i| i as f32 * 10.0 / 99.0).collect();

    let conditions: [(&str, fn(f32) -> f32, &str); 3] = [
        ("Control", |t| (-0.15 * t).exp(), "#4c72b0"),
        ("Treatment A", |t| (-0.30 * t).exp(), "#dd8452"),
        ("Treatment B", |t| (-0.05 * t).exp() * (0.8 * t).cos(), "#55a868"),
    ];

    // Landscape figure: wider than tall
    let spec = FigureSpec::new().width_mm(120.0).aspect_ratio(0.55);
    let mut fig = make_figure(&spec).expect("Failed to create figure");
    let ax = &mut fig.panels_mut()[(0, 0)];

    for (label, signal, hex) in conditions {
        let color = Rgba::parse(hex).expect("valid color");
        let replicates: Vec<Vec<f32>> = (0..REPLICATES)
            .map(|_| time.iter().map(|&t| signal(t) + noise.sample(&mut rng)).collect())
            .collect();
        let (mean, std) = mean_std(&replicates);
        let lower: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| m - s).collect();
        let upper: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| m + s).collect();

        ax.plot(LineSeries::new(&time, &mean).label(label).color(color))
            .expect("Failed to add line");
        ax.fill_between(FillBetween::new(&time, &lower, &upper).alpha(0.2).color(color))
            .expect("Failed to add band");
    }

    ax.set_xlabel("Time (s)");
    ax.set_ylabel("Signal intensity (a.u.)");
    ax.set_title("Simulated experimental time-series");
    ax.legend();

    for path in ["line_plot.svg", "line_plot.png"] {
        save(&fig, path, &SaveOptions::new()).expect("Failed to save figure");
        println!("Saved: {path}");
    }
}
