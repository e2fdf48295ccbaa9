//! Header formats and column widths shared by all output sheets.
use rust_xlsxwriter::{Color, Format, FormatAlign, Worksheet, XlsxError};

use docsheet_core::{ConvertError, HeaderStyle, NumberFormat};

/// Header fill for [`HeaderStyle::Highlighted`].
pub const HEADER_FILL: u32 = 0xFF_FF00;

/// Returns the format for a header cell, `None` for plain headers.
pub fn header_format(style: HeaderStyle) -> Option<Format> {
    match style {
        HeaderStyle::Highlighted => Some(
            Format::new()
                .set_bold()
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center),
        ),
        HeaderStyle::LeftAligned => Some(Format::new().set_align(FormatAlign::Left)),
        HeaderStyle::Plain => None,
    }
}

/// Returns the cell format for a numeric column.
pub fn number_format(format: NumberFormat) -> Format {
    Format::new().set_num_format(format.pattern())
}

/// Writes `headers` on `row` (0-based) with the given style.
///
/// # Errors
///
/// Returns [`ConvertError::Emit`] if a cell cannot be written.
pub fn write_header_row(
    ws: &mut Worksheet,
    row: u32,
    headers: &[String],
    style: HeaderStyle,
) -> Result<(), ConvertError> {
    let format = header_format(style);
    for (col, header) in (0u16..).zip(headers) {
        match &format {
            Some(f) => ws.write_string_with_format(row, col, header, f),
            None => ws.write_string(row, col, header),
        }
        .map_err(emit_error)?;
    }
    Ok(())
}

/// Applies column widths by position.
///
/// # Errors
///
/// Returns [`ConvertError::Emit`] if a width is rejected.
pub fn set_column_widths(ws: &mut Worksheet, widths: &[f64]) -> Result<(), ConvertError> {
    for (col, width) in (0u16..).zip(widths) {
        ws.set_column_width(col, *width).map_err(emit_error)?;
    }
    Ok(())
}

/// Maps a writer error onto [`ConvertError::Emit`].
pub(crate) fn emit_error(e: XlsxError) -> ConvertError {
    ConvertError::Emit {
        detail: e.to_string(),
    }
}
