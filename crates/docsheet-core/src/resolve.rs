//! Cross-reference indexes built by scanning one grid top to bottom.
//!
//! Packing lists do not repeat the carton number on every line: a box row
//! carries the 8-digit box number and the EAN rows below it belong to that
//! box until the next box row. [`build_group_index`] folds over the rows with
//! the active group as explicit state, so a code is only ever associated
//! with a group that appears above it.
use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::debug;

use crate::grid::SourceGrid;
use crate::locator::DigitShape;
use crate::normalize::parse_locale_number;

/// Configuration for [`build_group_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupScan {
    /// First row to scan (1-based).
    pub first_row: u32,
    /// Column holding group ids.
    pub group_column: u32,
    /// Shape a group id must have.
    pub group_shape: DigitShape,
    /// Candidate code columns, scanned left to right.
    pub code_columns: RangeInclusive<u32>,
    /// Shape a code must have.
    pub code_shape: DigitShape,
}

/// Code -> active group at the time the code was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    entries: HashMap<String, Option<String>>,
}

impl GroupIndex {
    /// Returns the group for `code`, `None` when the code was never seen or
    /// appeared before any group row.
    pub fn group_of(&self, code: &str) -> Option<&str> {
        self.entries.get(code).and_then(|g| g.as_deref())
    }

    /// Returns `true` if `code` was seen during the scan.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Number of distinct codes seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no code was seen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`GroupIndex`] in one forward pass.
///
/// A row whose group column matches the group shape becomes the active
/// group and is not inspected for codes. Any other row contributes its first
/// shape-matching code, mapped to the active group. A later occurrence of
/// the same code overwrites the earlier one.
pub fn build_group_index(grid: &SourceGrid, scan: &GroupScan) -> GroupIndex {
    let (_, entries) = grid.rows_from(scan.first_row).fold(
        (None::<String>, HashMap::new()),
        |(active, mut entries), (row, _)| {
            let group = grid.text(row, scan.group_column);
            if scan.group_shape.matches(&group) {
                debug!(row, group = %group, "box number");
                return (Some(group), entries);
            }
            if let Some((_, code)) = first_code(grid, row, &scan.code_columns, scan.code_shape) {
                debug!(row, code = %code, group = ?active, "code mapped to box");
                entries.insert(code, active.clone());
            }
            (active, entries)
        },
    );
    GroupIndex { entries }
}

/// Configuration for [`build_quantity_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityScan {
    /// First row to scan (1-based).
    pub first_row: u32,
    /// Candidate code columns, scanned left to right.
    pub code_columns: RangeInclusive<u32>,
    /// Shape a code must have.
    pub code_shape: DigitShape,
    /// Column distance from the matched code cell to its quantity cell.
    pub quantity_offset: i32,
}

/// Code -> quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityIndex {
    entries: HashMap<String, f64>,
}

impl QuantityIndex {
    /// Returns the quantity recorded for `code`.
    pub fn quantity_of(&self, code: &str) -> Option<f64> {
        self.entries.get(code).copied()
    }

    /// Number of distinct codes with a quantity.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no quantity was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`QuantityIndex`] by scanning every row from `first_row`.
///
/// Each row contributes its first shape-matching code when the cell at
/// `quantity_offset` from it is non-empty. Later rows overwrite earlier ones
/// for the same code (last write wins).
pub fn build_quantity_index(grid: &SourceGrid, scan: &QuantityScan) -> QuantityIndex {
    let entries = grid
        .rows_from(scan.first_row)
        .filter_map(|(row, _)| {
            let (column, code) = first_code(grid, row, &scan.code_columns, scan.code_shape)?;
            let quantity_column = column.checked_add_signed(scan.quantity_offset)?;
            let cell = grid.cell(row, quantity_column);
            if cell.is_empty() {
                return None;
            }
            Some((code, parse_locale_number(&cell.text())))
        })
        .fold(HashMap::new(), |mut entries, (code, quantity)| {
            if let Some(previous) = entries.insert(code.clone(), quantity) {
                debug!(code = %code, previous, quantity, "quantity overwritten");
            }
            entries
        });
    QuantityIndex { entries }
}

/// Returns `(column, code)` for the first cell on `row` matching `shape`.
fn first_code(
    grid: &SourceGrid,
    row: u32,
    columns: &RangeInclusive<u32>,
    shape: DigitShape,
) -> Option<(u32, String)> {
    columns.clone().find_map(|column| {
        let text = grid.text(row, column);
        shape.matches(&text).then_some((column, text))
    })
}
