//! Parsers that turn uploaded bytes into [`SourceGrid`]s and text lines.
//!
//! Every parser reads from memory and reports failures as
//! [`ConvertError::ParseFailure`] carrying the reader's own message.
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::debug;

use docsheet_core::{Cell, ConvertError, CsvFraming, SourceGrid};

/// Reads the first worksheet of an `xls`/`xlsx` workbook.
///
/// The format is detected from the bytes. Cells keep their absolute
/// coordinates even when the used range does not start at `A1`.
///
/// # Errors
///
/// Returns [`ConvertError::ParseFailure`] if the bytes are not a workbook or
/// the workbook has no worksheet.
pub fn read_spreadsheet(field: &str, bytes: &[u8]) -> Result<SourceGrid, ConvertError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::Error| parse_failure(field, &e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::ParseFailure {
            field: field.to_owned(),
            detail: "workbook has no worksheets".to_owned(),
        })?
        .map_err(|e: calamine::Error| parse_failure(field, &e))?;

    let grid = range_to_grid(&range);
    debug!(field, rows = grid.last_row(), "spreadsheet parsed");
    Ok(grid)
}

/// Converts a calamine range into a [`SourceGrid`] with 1-based coordinates.
pub fn range_to_grid(range: &Range<Data>) -> SourceGrid {
    let Some((first_row, first_column)) = range.start() else {
        return SourceGrid::default();
    };
    let rows = range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();
    SourceGrid::from_offset_rows(first_row + 1, first_column + 1, rows)
}

/// Converts one calamine cell.
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::from(s.as_str()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

/// Reads CSV records into a grid, applying `framing`.
///
/// Quoting follows RFC 4180 and records may have different lengths. Empty
/// lines are skipped before framing is applied, but delimiter-only records
/// such as `,,` count towards the framing. Bytes that are not valid UTF-8 are
/// replaced rather than rejected.
///
/// # Errors
///
/// Returns [`ConvertError::ParseFailure`] on malformed CSV.
pub fn read_csv(field: &str, bytes: &[u8], framing: CsvFraming) -> Result<SourceGrid, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records: Vec<Vec<Cell>> = Vec::new();
    for result in reader.byte_records() {
        let record = result.map_err(|e| parse_failure(field, &e))?;
        if record.len() == 1 && record.as_slice().is_empty() {
            continue;
        }
        records.push(
            record
                .iter()
                .map(|raw| Cell::from(String::from_utf8_lossy(raw).into_owned()))
                .collect(),
        );
    }

    let total = records.len();
    let end = total.saturating_sub(framing.drop_trailing);
    let rows: Vec<Vec<Cell>> = records
        .into_iter()
        .take(end)
        .skip(framing.skip_leading)
        .collect();
    debug!(field, total, kept = rows.len(), "csv parsed");
    Ok(SourceGrid::from_rows(rows))
}

/// Extracts the PDF text layer as trimmed, non-empty lines.
///
/// # Errors
///
/// Returns [`ConvertError::ParseFailure`] if the PDF cannot be read.
pub fn read_pdf_lines(field: &str, bytes: &[u8]) -> Result<Vec<String>, ConvertError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| parse_failure(field, &e))?;
    let lines = text_lines(&text);
    debug!(field, lines = lines.len(), "pdf text extracted");
    Ok(lines)
}

/// Splits text on line breaks, trims each line and drops empty ones.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_failure(field: &str, err: &dyn std::fmt::Display) -> ConvertError {
    ConvertError::ParseFailure {
        field: field.to_owned(),
        detail: err.to_string(),
    }
}
