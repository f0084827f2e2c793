#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Journal Widths Example
//!
//! Renders the same plot at several column widths so the physical sizes can
//! be compared side by side.
//!
//! Run with: `cargo run --example journal_widths`
//!
//! Produces: journal_width_nature_single.svg, journal_width_elsevier_single.svg,
//! journal_width_elsevier_full.svg

use journal_style::prelude::*;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

fn main() {
    env_logger::init();

    set_journal_style().expect("default style is valid");

    // Synthetic data shared by every figure
    let mut rng = Pcg64Mcg::seed_from_u64(7);
    let noise = Normal::new(0.0_f32, 0.15).expect("valid normal");
    let x: Vec<f32> = (0..80).map(|i| i as f32 * 6.0 / 79.0).collect();
    let truth: Vec<f32> = x.iter().map(|v| v.sin()).collect();
    let y: Vec<f32> = truth.iter().map(|v| v + noise.sample(&mut rng)).collect();

    for name in ["nature_single", "elsevier_single", "elsevier_full"] {
        let width_mm = lookup_journal_width(name).expect("known journal");
        let spec = FigureSpec::new().width_mm(width_mm).aspect_ratio(0.6);
        let mut fig = make_figure(&spec).expect("Failed to create figure");
        let ax = &mut fig.panels_mut()[(0, 0)];

        ax.plot(LineSeries::new(&x, &truth).label("True signal"))
            .expect("Failed to add line");
        ax.scatter(
            ScatterSeries::new(&x, &y)
                .size(6.0_f32.sqrt())
                .alpha(0.5)
                .label("Noisy data"),
        )
        .expect("Failed to add scatter");
        ax.set_xlabel("Time (s)");
        ax.set_ylabel("Amplitude");
        ax.set_title(format!("{name}  ({width_mm} mm)"));
        ax.legend();

        let path = format!("journal_width_{name}.svg");
        save(&fig, &path, &SaveOptions::new()).expect("Failed to save figure");
        println!("Saved: {path} ({:.2} in wide)", fig.width_in());
    }

    println!("Compare the SVG files to see how column width affects the figure.");
}
