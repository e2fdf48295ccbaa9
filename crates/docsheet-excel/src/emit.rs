//! Renders [`Transformed`] sheets into an in-memory `.xlsx` workbook.
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use docsheet_core::{ConvertError, OutputRow, Sheet, SheetLayout, Transformed, Value};

use crate::style::{emit_error, number_format, set_column_widths, write_header_row};

/// Builds the workbook and returns its bytes.
///
/// Sheets are written in order. Nothing touches the filesystem.
///
/// # Errors
///
/// Returns [`ConvertError::Emit`] if a sheet cannot be written or the
/// workbook cannot be serialized.
pub fn emit_workbook(transformed: &Transformed) -> Result<Vec<u8>, ConvertError> {
    let mut wb = Workbook::new();
    for sheet in &transformed.sheets {
        let ws = wb.add_worksheet();
        ws.set_name(&sheet.layout.name).map_err(emit_error)?;
        write_sheet(ws, sheet)?;
        debug!(sheet = %sheet.layout.name, rows = sheet.rows.len(), "sheet written");
    }
    wb.save_to_buffer().map_err(emit_error)
}

fn write_sheet(ws: &mut Worksheet, sheet: &Sheet) -> Result<(), ConvertError> {
    let layout = &sheet.layout;
    for cell in &layout.metadata {
        write_value(
            ws,
            cell.row.saturating_sub(1),
            to_col(cell.column.saturating_sub(1))?,
            &cell.value,
            None,
        )?;
    }
    if !layout.headers.is_empty() {
        write_header_row(
            ws,
            layout.header_row.saturating_sub(1),
            &layout.headers,
            layout.header_style,
        )?;
    }
    set_column_widths(ws, &layout.widths)?;

    let formats = column_formats(layout);
    let first = layout.first_data_row().saturating_sub(1);
    for (row, output) in (first..).zip(&sheet.rows) {
        write_row(ws, row, output, layout, &formats)?;
    }
    Ok(())
}

/// Per-column number formats, indexed by position.
fn column_formats(layout: &SheetLayout) -> Vec<Option<Format>> {
    (0..layout.headers.len())
        .map(|i| layout.format_for(i).map(number_format))
        .collect()
}

/// Writes one row in the layout's header order. Headerless layouts are
/// written positionally.
fn write_row(
    ws: &mut Worksheet,
    row: u32,
    output: &OutputRow,
    layout: &SheetLayout,
    formats: &[Option<Format>],
) -> Result<(), ConvertError> {
    if layout.headers.is_empty() {
        for (i, value) in output.values().enumerate() {
            write_value(ws, row, to_col(i)?, value, None)?;
        }
        return Ok(());
    }
    for (i, header) in layout.headers.iter().enumerate() {
        let Some(value) = output.get(header) else {
            continue;
        };
        let format = formats.get(i).and_then(Option::as_ref);
        write_value(ws, row, to_col(i)?, value, format)?;
    }
    Ok(())
}

fn write_value(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    format: Option<&Format>,
) -> Result<(), ConvertError> {
    let result = match (value, format) {
        (Value::Text(s), _) if s.is_empty() => return Ok(()),
        (Value::Text(s), _) => ws.write_string(row, col, s),
        (Value::Integer(i), Some(f)) => ws.write_number_with_format(row, col, *i as f64, f),
        (Value::Integer(i), None) => ws.write_number(row, col, *i as f64),
        (Value::Number(n), Some(f)) => ws.write_number_with_format(row, col, *n, f),
        (Value::Number(n), None) => ws.write_number(row, col, *n),
    };
    result.map(|_| ()).map_err(emit_error)
}

fn to_col<T>(index: T) -> Result<u16, ConvertError>
where
    T: TryInto<u16> + Copy + std::fmt::Display,
{
    index.try_into().map_err(|_| ConvertError::Emit {
        detail: format!("column index {index} out of range"),
    })
}
