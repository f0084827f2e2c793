//! Figure sizing: millimetre conversion, journal widths and panel grids.
//!
//! Run: cargo test --test figure_sizing_test

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use journal_style::{
    inches_to_mm, journal_widths, lookup_journal_width, make_figure, mm_to_inches, Error,
    FigureSpec, JournalWidth, PanelOptions, ShareAxes, StyleParams,
};
use proptest::prelude::*;

fn spec(width_mm: f32, aspect: f32) -> FigureSpec {
    FigureSpec::new()
        .width_mm(width_mm)
        .aspect_ratio(aspect)
        .style(StyleParams::default())
}

// ============================================================================
// Journal widths
// ============================================================================

#[test]
fn journal_table_lookups() {
    assert_relative_eq!(lookup_journal_width("nature_single").unwrap(), 89.0);
    assert_relative_eq!(lookup_journal_width("nature_full").unwrap(), 183.0);
    assert_relative_eq!(lookup_journal_width("elsevier_single").unwrap(), 90.0);
    assert_relative_eq!(lookup_journal_width("science_full").unwrap(), 120.0);
    assert_eq!(journal_widths().count(), JournalWidth::ALL.len());
}

#[test]
fn unknown_journal_is_not_found() {
    match lookup_journal_width("plos_single") {
        Err(Error::NotFound(id)) => assert_eq!(id, "plos_single"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// ============================================================================
// Figure creation
// ============================================================================

#[test]
fn nature_single_figure_size() {
    let fig = make_figure(&spec(89.0, 0.8)).unwrap();
    assert_relative_eq!(fig.width_in(), 3.503_937, epsilon = 1e-5);
    assert_relative_eq!(fig.height_in(), 3.503_937 * 0.8, epsilon = 1e-5);
}

#[test]
fn one_by_one_grid_is_two_dimensional() {
    let mut fig = make_figure(&spec(89.0, 0.8)).unwrap();
    assert_eq!(fig.panels().shape(), (1, 1));
    assert_eq!(fig.panels().len(), 1);
    fig.panels_mut()[(0, 0)].set_title("only");
    assert_eq!(fig.panels()[(0, 0)].title(), Some("only"));
    assert!(fig.panels().get(0, 1).is_none());
}

#[test]
fn grid_rows_are_row_major() {
    let mut fig = make_figure(&spec(178.0, 0.5).grid(2, 3)).unwrap();
    fig.panels_mut()[(1, 2)].set_xlabel("last");
    let row = fig.panels().row(1).unwrap();
    assert_eq!(row.len(), 3);
    assert_eq!(row[2].xlabel(), Some("last"));
    assert_eq!(fig.panels().iter().count(), 6);
}

#[test]
fn invalid_dimensions_are_rejected() {
    for bad in [spec(0.0, 0.8), spec(89.0, -1.0), spec(f32::NAN, 0.8)] {
        assert!(matches!(make_figure(&bad), Err(Error::InvalidParameter { .. })));
    }
}

#[test]
fn share_and_ratio_options_are_checked() {
    let ok = spec(178.0, 0.5).grid(2, 2).options(
        PanelOptions::new()
            .share_x(ShareAxes::Column)
            .share_y(ShareAxes::Row)
            .width_ratios([2.0, 1.0])
            .height_ratios([1.0, 1.0]),
    );
    assert!(make_figure(&ok).is_ok());

    let bad = spec(178.0, 0.5)
        .grid(2, 2)
        .options(PanelOptions::new().height_ratios([1.0, 0.0]));
    assert!(matches!(make_figure(&bad), Err(Error::Layout(_))));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_mm_inches_round_trip(mm in 0.1f32..1000.0) {
        let back = inches_to_mm(mm_to_inches(mm));
        prop_assert!((back - mm).abs() <= mm * 1e-5);
    }

    #[test]
    fn prop_figure_size_follows_inputs(mm in 10.0f32..400.0, aspect in 0.05f32..3.0) {
        let fig = make_figure(&spec(mm, aspect)).unwrap();
        prop_assert!((fig.width_in() - mm / 25.4).abs() < 1e-4);
        prop_assert!((fig.height_in() - fig.width_in() * aspect).abs() < 1e-4);
    }

    #[test]
    fn prop_grid_has_rows_times_cols(rows in 1usize..6, cols in 1usize..6) {
        let fig = make_figure(&spec(178.0, 0.6).grid(rows, cols)).unwrap();
        prop_assert_eq!(fig.panels().shape(), (rows, cols));
        prop_assert_eq!(fig.panels().len(), rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                prop_assert!(fig.panels().get(r, c).is_some());
            }
        }
    }
}
