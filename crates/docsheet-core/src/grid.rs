//! The addressable representation of one parsed tabular upload.
//!
//! Coordinates are 1-based to match what a person sees in a spreadsheet:
//! row 1 is the first row, column 1 is `A`. Reading outside the populated
//! area yields [`Cell::Empty`], never an error.
use std::ops::RangeInclusive;

/// One cell value as read from a spreadsheet or CSV record.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A string cell.
    Text(String),
    /// A numeric cell (integers are stored as whole floats).
    Number(f64),
    /// A blank or missing cell.
    Empty,
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Renders the cell as trimmed text.
    ///
    /// Whole numbers below 1e15 render without a fractional part so that
    /// EANs and box numbers stored as numbers read back as their digits.
    pub fn text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_owned(),
            Self::Number(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{f:.0}")
                } else {
                    f.to_string()
                }
            }
            Self::Empty => String::new(),
        }
    }

    /// Returns `true` for empty cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
            Self::Empty => true,
        }
    }

    /// Returns the raw string for text cells, `None` otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_owned())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() { Self::Empty } else { Self::Text(s) }
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Self::Number(f)
    }
}

/// An immutable row/column grid with 1-based addressing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceGrid {
    rows: Vec<Vec<Cell>>,
}

impl SourceGrid {
    /// Builds a grid whose first element is row 1.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a grid from rows that start at `first_row`/`first_column`.
    ///
    /// Spreadsheet readers report the used range, which need not start at
    /// `A1`. Padding keeps the absolute coordinates intact.
    pub fn from_offset_rows(first_row: u32, first_column: u32, rows: Vec<Vec<Cell>>) -> Self {
        let row_pad = first_row.saturating_sub(1) as usize;
        let col_pad = first_column.saturating_sub(1) as usize;
        let mut padded: Vec<Vec<Cell>> = vec![Vec::new(); row_pad];
        padded.extend(rows.into_iter().map(|row| {
            if col_pad == 0 {
                row
            } else {
                let mut cells = vec![Cell::Empty; col_pad];
                cells.extend(row);
                cells
            }
        }));
        Self { rows: padded }
    }

    /// Returns the cell at (`row`, `column`), or [`Cell::Empty`].
    pub fn cell(&self, row: u32, column: u32) -> &Cell {
        if row == 0 || column == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(column as usize - 1))
            .unwrap_or(&EMPTY)
    }

    /// Shorthand for `self.cell(row, column).text()`.
    pub fn text(&self, row: u32, column: u32) -> String {
        self.cell(row, column).text()
    }

    /// Returns the cells of `row`, or an empty slice when out of range.
    pub fn row(&self, row: u32) -> &[Cell] {
        if row == 0 {
            return &[];
        }
        self.rows
            .get(row as usize - 1)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of the last populated row (0 for an empty grid).
    pub fn last_row(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Returns `true` if the grid holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates `(row number, cells)` from `start_row` to the last row.
    pub fn rows_from(&self, start_row: u32) -> impl Iterator<Item = (u32, &[Cell])> + '_ {
        let start = start_row.max(1);
        (start..=self.last_row()).map(move |r| (r, self.row(r)))
    }

    /// Returns the first non-empty cell text among `columns` on `row`.
    pub fn first_non_empty(&self, row: u32, columns: RangeInclusive<u32>) -> Option<String> {
        columns
            .map(|c| self.cell(row, c))
            .find(|cell| !cell.is_empty())
            .map(Cell::text)
    }
}

/// Converts spreadsheet column letters to a 1-based column number.
///
/// Intended for constant configuration; letters must be uppercase ASCII.
///
/// ```
/// use docsheet_core::grid::column_number;
///
/// const AJ: u32 = column_number("AJ");
/// assert_eq!(AJ, 36);
/// ```
pub const fn column_number(letters: &str) -> u32 {
    let bytes = letters.as_bytes();
    let mut n = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        n = n * 26 + (bytes[i] - b'A' + 1) as u32;
        i += 1;
    }
    n
}

/// Parses user-supplied column letters (case-insensitive).
pub fn parse_column(letters: &str) -> Option<u32> {
    let trimmed = letters.trim();
    if trimmed.is_empty() || trimmed.len() > 3 {
        return None;
    }
    trimmed.chars().try_fold(0u32, |acc, ch| {
        let upper = ch.to_ascii_uppercase();
        upper
            .is_ascii_uppercase()
            .then(|| acc * 26 + (u32::from(upper) - u32::from('A') + 1))
    })
}

/// Converts a 1-based column number to its letters (`1` -> `"A"`).
pub fn column_letters(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}
