//! Two-dimensional panel container.

use super::panel::Panel;
use std::ops::{Index, IndexMut};

/// Panels of a figure laid out in rows and columns.
///
/// Always two-dimensional, even for a single panel: index with
/// `grid[(row, col)]`.
///
/// ```
/// use journal_style::{make_figure, FigureSpec};
///
/// let mut fig = make_figure(&FigureSpec::new().grid(2, 3)).unwrap();
/// let grid = fig.panels_mut();
/// assert_eq!(grid.shape(), (2, 3));
/// grid[(1, 2)].set_title("C");
/// assert_eq!(grid.iter().count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct PanelGrid {
    rows: usize,
    cols: usize,
    /// Row-major.
    panels: Vec<Panel>,
}

impl PanelGrid {
    pub(crate) fn new(rows: usize, cols: usize, mut make: impl FnMut() -> Panel) -> Self {
        Self {
            rows,
            cols,
            panels: (0..rows * cols).map(|_| make()).collect(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Always `false`: a grid holds at least one panel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panel at `(row, col)`, if in range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Panel> {
        (row < self.rows && col < self.cols).then(|| &self.panels[row * self.cols + col])
    }

    /// Mutable panel at `(row, col)`, if in range.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Panel> {
        if row < self.rows && col < self.cols {
            Some(&mut self.panels[row * self.cols + col])
        } else {
            None
        }
    }

    /// The panels of one row, left to right.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[Panel]> {
        (row < self.rows).then(|| &self.panels[row * self.cols..(row + 1) * self.cols])
    }

    /// All panels in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, Panel> {
        self.panels.iter()
    }

    /// All panels in row-major order, mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Panel> {
        self.panels.iter_mut()
    }

    /// Panels with their `(row, col)` position.
    pub fn indexed(&self) -> impl Iterator<Item = ((usize, usize), &Panel)> {
        let cols = self.cols;
        self.panels
            .iter()
            .enumerate()
            .map(move |(i, p)| ((i / cols, i % cols), p))
    }

    fn offset(&self, (row, col): (usize, usize)) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "panel ({row}, {col}) out of range for a {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl Index<(usize, usize)> for PanelGrid {
    type Output = Panel;

    fn index(&self, index: (usize, usize)) -> &Panel {
        &self.panels[self.offset(index)]
    }
}

impl IndexMut<(usize, usize)> for PanelGrid {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Panel {
        let offset = self.offset(index);
        &mut self.panels[offset]
    }
}

impl<'a> IntoIterator for &'a PanelGrid {
    type Item = &'a Panel;
    type IntoIter = std::slice::Iter<'a, Panel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut PanelGrid {
    type Item = &'a mut Panel;
    type IntoIter = std::slice::IterMut<'a, Panel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
