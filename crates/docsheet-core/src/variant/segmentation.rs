//! Invoice CSV export split into purchase lines with segmented item numbers.
//!
//! The vendor item number is an 8-character item number followed by a
//! variant code, e.g. `12345678-RED`. The unit price is derived from the net
//! sales amount and depends on the vendor number's first digit.
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::grid::{SourceGrid, column_number};
use crate::normalize::{parse_locale_number, round_to};
use crate::output::{NumberFormat, OutputRow, SheetLayout, Transformed, Value};
use crate::upload::Params;
use crate::variant::{ConversionContext, DOCUMENT_NO, FILE, Inputs, STORE};

const VENDOR_ITEM: u32 = column_number("B");
const QUANTITY: u32 = column_number("F");
const NET_SALES: u32 = column_number("I");

const ITEM_NUMBER_LEN: usize = 8;
const LINE_NO_STEP: i64 = 10_000;

const SHEET_NAME: &str = "Sheet1";
const FILENAME: &str = "converted_invoice";

const HEADERS: [&str; 10] = [
    "Document Type",
    "Document No.",
    "Line No.",
    "Type",
    "No.",
    "Variant Code",
    "Location Code",
    "Quantity",
    "Unit Price",
    "Drop shipment",
];

fn layout() -> SheetLayout {
    SheetLayout::new(SHEET_NAME, &HEADERS)
        .header_row(3)
        .metadata(1, 1, "ILLUM BOLIGHUS")
        .metadata(1, 3, "37")
        .number_format("Unit Price", NumberFormat::TwoDecimals)
}

/// Splits a vendor item number into `(item number, variant code)`.
///
/// The item number is the first 8 characters. The variant code is the rest
/// with one leading `-` or `_` removed.
pub fn split_vendor_item(vendor_item: &str) -> (String, String) {
    let split = vendor_item
        .char_indices()
        .nth(ITEM_NUMBER_LEN)
        .map_or(vendor_item.len(), |(i, _)| i);
    let (item, rest) = vendor_item.split_at(split);
    let variant = rest.strip_prefix(['-', '_']).unwrap_or(rest);
    (item.to_owned(), variant.to_owned())
}

/// Unit price per piece, rounded to 2 decimals.
///
/// Net sales are divided by the absolute quantity, then halved for vendor
/// numbers starting with `1` and scaled by 0.446 for those starting with
/// `2`. Any other prefix, or a zero quantity, prices at 0.
pub fn unit_price(vendor_item: &str, quantity: f64, net_sales: f64) -> f64 {
    if quantity == 0.0 {
        return 0.0;
    }
    let base = net_sales / quantity.abs();
    let price = match vendor_item.chars().next() {
        Some('1') => base / 2.0,
        Some('2') => base * 0.446,
        Some(_) | None => 0.0,
    };
    round_to(price, 2)
}

fn line(
    grid: &SourceGrid,
    row: u32,
    index: usize,
    document_no: &str,
    store: &str,
) -> OutputRow {
    let vendor_item = grid.text(row, VENDOR_ITEM);
    let quantity = parse_locale_number(&grid.text(row, QUANTITY));
    let net_sales = parse_locale_number(&grid.text(row, NET_SALES));
    let (item_no, variant_code) = split_vendor_item(&vendor_item);
    let price = unit_price(&vendor_item, quantity, net_sales);
    debug!(row, vendor_item = %vendor_item, quantity, net_sales, price, "segmented line");

    let line_no = i64::try_from(index + 1).unwrap_or(i64::MAX / LINE_NO_STEP) * LINE_NO_STEP;
    OutputRow::new()
        .with(HEADERS[0], "Invoice")
        .with(HEADERS[1], document_no)
        .with(HEADERS[2], Value::Integer(line_no))
        .with(HEADERS[3], "Item")
        .with(HEADERS[4], item_no)
        .with(HEADERS[5], variant_code)
        .with(HEADERS[6], store)
        .with(HEADERS[7], quantity)
        .with(HEADERS[8], price)
        .with(HEADERS[9], "False")
}

/// Converts the framed CSV records into purchase lines.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] when the CSV grid, `documentNo`
/// or `store` is absent.
pub fn segment(
    inputs: &Inputs,
    params: &Params,
    _ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let grid = inputs.grid(FILE)?;
    let document_no = params
        .get(DOCUMENT_NO)
        .ok_or_else(|| ConvertError::missing(DOCUMENT_NO))?;
    let store = params.get(STORE).ok_or_else(|| ConvertError::missing(STORE))?;

    let rows: Vec<OutputRow> = grid
        .rows_from(1)
        .enumerate()
        .map(|(index, (row, _))| line(grid, row, index, document_no, store))
        .collect();
    info!(rows = rows.len(), document_no = %document_no, store = %store, "invoice segmented");

    Ok(Transformed::single(layout(), rows, FILENAME.to_owned()))
}
