//! Supplier invoice workbook reformatted for the Boozt invoice import.
use tracing::info;

use crate::error::ConvertError;
use crate::grid::column_number;
use crate::locator::FieldLocator;
use crate::output::{HeaderStyle, OutputRow, SheetLayout, Transformed};
use crate::upload::Params;
use crate::variant::dispatch::dispatch_advice_number;
use crate::variant::{ConversionContext, DISPATCH_SUFFIX, INVOICE_FILE, INVOICE_NUMBER, Inputs};

/// First data row; row 1 is the source header.
const FIRST_ROW: u32 = 2;

const SUPPLIER_ORDER: u32 = column_number("A");
const EAN: u32 = column_number("B");
const QUANTITY: u32 = column_number("C");
const BOOZT_ORDER: u32 = column_number("E");

const SHEET_NAME: &str = "Converted Invoice";
const FALLBACK_FILENAME: &str = "converted-invoice";

const HEADERS: [&str; 5] = [
    "Dispatch advice number",
    "Supplier order number",
    "Boozt order number",
    "EAN code",
    "Quantity",
];

const WIDTHS: [f64; 5] = [20.0, 20.0, 20.0, 15.0, 10.0];

fn layout() -> SheetLayout {
    SheetLayout::new(SHEET_NAME, &HEADERS)
        .widths(&WIDTHS)
        .header_style(HeaderStyle::LeftAligned)
}

/// Reformats the first sheet of an invoice workbook.
///
/// The filename is `{invoiceNumber}-{booztOrderNumber}` when an invoice
/// number is given, using the first row's Boozt order number. Otherwise it
/// is the first row's dispatch advice number, or `converted-invoice`.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] if the invoice grid is absent.
pub fn reformat(
    inputs: &Inputs,
    params: &Params,
    _ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let grid = inputs.grid(INVOICE_FILE)?;
    let suffix = params.get(DISPATCH_SUFFIX);
    let cell = |row: u32, column: u32| FieldLocator::Cell { row, column }.read(grid, row);

    let rows: Vec<OutputRow> = grid
        .rows_from(FIRST_ROW)
        .filter(|(row, _)| grid.first_non_empty(*row, SUPPLIER_ORDER..=BOOZT_ORDER).is_some())
        .map(|(row, _)| {
            let supplier_order = cell(row, SUPPLIER_ORDER);
            OutputRow::new()
                .with(HEADERS[0], dispatch_advice_number(&supplier_order, suffix))
                .with(HEADERS[1], supplier_order)
                .with(HEADERS[2], cell(row, BOOZT_ORDER))
                .with(HEADERS[3], cell(row, EAN))
                .with(HEADERS[4], cell(row, QUANTITY))
        })
        .collect();

    let first = rows.first();
    let filename_stem = match params.get(INVOICE_NUMBER) {
        Some(invoice_number) => {
            let boozt_order = first.map(|r| r.text(HEADERS[2])).unwrap_or_default();
            format!("{invoice_number}-{boozt_order}")
        }
        None => first
            .map(|r| r.text(HEADERS[0]))
            .filter(|advice| !advice.is_empty())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_owned()),
    };
    info!(rows = rows.len(), filename = %filename_stem, "invoice reformatted");

    Ok(Transformed::single(layout(), rows, filename_stem))
}
