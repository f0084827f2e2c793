#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Basic Figure Example
//!
//! The three-step workflow: apply the journal style, create a figure at a
//! column width, save it.
//!
//! Run with: `cargo run --example basic_figure`
//!
//! Produces: basic_figure.svg, basic_figure.png

use journal_style::prelude::*;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use rand_pcg::Pcg64Mcg;

fn main() {
    env_logger::init();

    // Step 1: apply journal defaults
    set_journal_style().expect("default style is valid");

    // Synthetic data
    let mut rng = Pcg64Mcg::seed_from_u64(42);
    let uniform = Uniform::new(0.0_f32, 10.0);
    let noise = Normal::new(0.0_f32, 3.0).expect("valid normal");
    let x: Vec<f32> = (0..60).map(|_| uniform.sample(&mut rng)).collect();
    let y: Vec<f32> = x.iter().map(|v| 2.5 * v + noise.sample(&mut rng)).collect();

    // Step 2: a single panel at Nature single-column width
    let spec = FigureSpec::new().width_mm(89.0).aspect_ratio(0.8);
    let mut fig = make_figure(&spec).expect("Failed to create figure");
    let ax = &mut fig.panels_mut()[(0, 0)];

    ax.scatter(ScatterSeries::new(&x, &y).alpha(0.7))
        .expect("Failed to add scatter");
    ax.set_xlabel("X variable");
    ax.set_ylabel("Y variable");
    ax.set_title("Basic scatter plot");

    // Step 3: save
    for path in ["basic_figure.svg", "basic_figure.png"] {
        save(&fig, path, &SaveOptions::new()).expect("Failed to save figure");
        println!("Saved: {path}");
    }
}
