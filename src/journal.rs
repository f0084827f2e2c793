//! Journal column widths.
//!
//! Widths are the printable figure widths publishers ask for, in millimetres.
//! Single-column widths fit one text column; full widths span the page.

use crate::error::{Error, Result};
use crate::units::mm_to_inches;
use std::fmt;
use std::str::FromStr;

/// A known journal column width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalWidth {
    /// Elsevier single column.
    ElsevierSingle,
    /// Elsevier full page width (about 177 mm usable).
    ElsevierFull,
    /// Science single column.
    ScienceSingle,
    /// Science full width.
    ScienceFull,
    /// Cell single column.
    CellSingle,
    /// Cell full width.
    CellFull,
    /// Nature single column.
    NatureSingle,
    /// Nature full width.
    NatureFull,
}

impl JournalWidth {
    /// Every entry of the table, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::ElsevierSingle,
        Self::ElsevierFull,
        Self::ScienceSingle,
        Self::ScienceFull,
        Self::CellSingle,
        Self::CellFull,
        Self::NatureSingle,
        Self::NatureFull,
    ];

    /// Identifier used for lookup, e.g. `"nature_single"`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ElsevierSingle => "elsevier_single",
            Self::ElsevierFull => "elsevier_full",
            Self::ScienceSingle => "science_single",
            Self::ScienceFull => "science_full",
            Self::CellSingle => "cell_single",
            Self::CellFull => "cell_full",
            Self::NatureSingle => "nature_single",
            Self::NatureFull => "nature_full",
        }
    }

    /// Width in millimetres.
    #[must_use]
    pub const fn mm(self) -> f32 {
        match self {
            Self::ElsevierSingle => 90.0,
            Self::ElsevierFull => 190.0,
            Self::ScienceSingle => 57.0,
            Self::ScienceFull => 120.0,
            Self::CellSingle => 85.0,
            Self::CellFull => 178.0,
            Self::NatureSingle => 89.0,
            Self::NatureFull => 183.0,
        }
    }

    /// Width in inches.
    #[must_use]
    pub fn inches(self) -> f32 {
        mm_to_inches(self.mm())
    }
}

impl FromStr for JournalWidth {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.id() == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

impl fmt::Display for JournalWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} mm)", self.id(), self.mm())
    }
}

/// Look up a journal width in millimetres by identifier.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the identifier is not in the table.
///
/// # Example
///
/// ```
/// use journal_style::lookup_journal_width;
///
/// assert_eq!(lookup_journal_width("nature_single").unwrap(), 89.0);
/// assert!(lookup_journal_width("unknown_id").is_err());
/// ```
pub fn lookup_journal_width(id: &str) -> Result<f32> {
    id.parse::<JournalWidth>().map(JournalWidth::mm)
}

/// Iterate `(identifier, millimetres)` over the whole table.
pub fn journal_widths() -> impl Iterator<Item = (&'static str, f32)> {
    JournalWidth::ALL.into_iter().map(|w| (w.id(), w.mm()))
}
