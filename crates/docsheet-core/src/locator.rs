//! Declarative descriptions of where a logical field lives in a grid.
//!
//! Locators are static configuration owned by the variant that uses them.
use std::ops::RangeInclusive;

use crate::grid::{Cell, SourceGrid};
use crate::normalize::extract_labeled_value;

/// Where to read one field from a [`SourceGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLocator {
    /// An absolute cell.
    Cell {
        /// 1-based row.
        row: u32,
        /// 1-based column.
        column: u32,
    },
    /// The first text cell in `rows` containing `"<label>:"`, reduced to
    /// the token that follows the label.
    Labeled {
        /// Rows to scan, top to bottom.
        rows: RangeInclusive<u32>,
        /// Label without the trailing colon.
        label: &'static str,
    },
    /// The first non-empty cell among `columns` on the data row being read.
    FirstNonEmpty {
        /// Candidate columns, scanned left to right.
        columns: RangeInclusive<u32>,
    },
}

impl FieldLocator {
    /// Reads the field as trimmed text, `""` when nothing matches.
    ///
    /// `row` is the data row for [`FieldLocator::FirstNonEmpty`]; the
    /// absolute shapes ignore it.
    pub fn read(&self, grid: &SourceGrid, row: u32) -> String {
        match self {
            Self::Cell { row, column } => grid.text(*row, *column),
            Self::Labeled { rows, label } => read_labeled(grid, rows.clone(), label),
            Self::FirstNonEmpty { columns } => {
                grid.first_non_empty(row, columns.clone()).unwrap_or_default()
            }
        }
    }
}

fn read_labeled(grid: &SourceGrid, rows: RangeInclusive<u32>, label: &str) -> String {
    let needle = format!("{label}:");
    rows.flat_map(|r| grid.row(r).iter())
        .filter_map(Cell::as_str)
        .find(|text| text.contains(&needle))
        .map(|text| extract_labeled_value(text, label))
        .unwrap_or_default()
}

/// A fixed-length all-digit predicate.
///
/// Box numbers are 8 digits and EAN codes 13 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitShape {
    digits: usize,
}

impl DigitShape {
    /// A shape matching exactly `digits` ASCII digits.
    pub const fn digits(digits: usize) -> Self {
        Self { digits }
    }

    /// Returns `true` if `value` is exactly this many ASCII digits.
    pub fn matches(&self, value: &str) -> bool {
        value.len() == self.digits && value.bytes().all(|b| b.is_ascii_digit())
    }
}

/// 8-digit box (carton) number.
pub const BOX_NUMBER: DigitShape = DigitShape::digits(8);

/// 13-digit EAN barcode.
pub const EAN13: DigitShape = DigitShape::digits(13);
