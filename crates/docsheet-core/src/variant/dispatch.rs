//! Dispatch advice built from a packing list and an order confirmation.
//!
//! The order confirmation carries the order number (row 21) and the Boozt
//! purchase reference (row 23) in labeled free-text cells. The packing list
//! carries one EAN line per article from row 18 on, with the carton (box)
//! number on a row of its own above each group of EAN lines.
use std::ops::RangeInclusive;

use tracing::{debug, info};

use crate::error::ConvertError;
use crate::grid::{SourceGrid, column_number};
use crate::locator::{BOX_NUMBER, EAN13, FieldLocator};
use crate::normalize::{format_iso_date, next_working_day};
use crate::output::{HeaderStyle, OutputRow, SheetLayout, Transformed, Value};
use crate::resolve::{
    GroupIndex, GroupScan, QuantityIndex, QuantityScan, build_group_index, build_quantity_index,
};
use crate::upload::Params;
use crate::variant::{
    ConversionContext, DISPATCH_SUFFIX, Inputs, ORDER_FILE, PACKING_FILE, QUANTITY_FILE,
};

/// Order number cell on the order confirmation.
pub const ORDER_NUMBER: FieldLocator = FieldLocator::Labeled {
    rows: 21..=21,
    label: "Customer order no",
};

/// Boozt purchase reference cell on the order confirmation.
pub const BOOZT_PURCHASE_NUMBER: FieldLocator = FieldLocator::Labeled {
    rows: 23..=23,
    label: "Customer order ref",
};

/// First data row of the packing list.
pub const PACKING_FIRST_ROW: u32 = 18;

const EAN_COLUMNS: RangeInclusive<u32> = column_number("AJ")..=column_number("AP");

/// EAN of a packing line: first non-empty cell in `AJ..AP`.
pub const PACKING_EAN: FieldLocator = FieldLocator::FirstNonEmpty {
    columns: EAN_COLUMNS,
};

/// Quantity of a packing line: first non-empty cell in `AQ..AS`.
pub const PACKING_QUANTITY: FieldLocator = FieldLocator::FirstNonEmpty {
    columns: column_number("AQ")..=column_number("AS"),
};

const SHEET_NAME: &str = "Converted Data";

const HEADERS: [&str; 8] = [
    "Dispatch Advice form",
    "EAN Code",
    "Quantity dispatched",
    "Purchase order number",
    "Boozt Purchase number",
    "Dispatch Date",
    "Scheduled Arrival Date",
    "Box No.",
];

const WIDTHS: [f64; 8] = [20.0, 20.0, 15.0, 20.0, 20.0, 15.0, 15.0, 12.0];

/// Box scan over the whole packing list: box numbers in `J`, EANs in
/// `AJ..AP`.
pub fn box_scan() -> GroupScan {
    GroupScan {
        first_row: 2,
        group_column: column_number("J"),
        group_shape: BOX_NUMBER,
        code_columns: EAN_COLUMNS,
        code_shape: EAN13,
    }
}

/// Quantity file scan: EAN in `A..H`, quantity in the next column.
pub fn quantity_scan() -> QuantityScan {
    QuantityScan {
        first_row: 1,
        code_columns: column_number("A")..=column_number("H"),
        code_shape: EAN13,
        quantity_offset: 1,
    }
}

/// The output sheet layout shared by both dispatch variants.
pub fn layout() -> SheetLayout {
    SheetLayout::new(SHEET_NAME, &HEADERS)
        .widths(&WIDTHS)
        .header_style(HeaderStyle::Highlighted)
}

/// Appends `-suffix` to `base` unless the suffix is blank or numerically zero.
///
/// ```
/// use docsheet_core::variant::dispatch::dispatch_advice_number;
///
/// assert_eq!(dispatch_advice_number("4500771", Some("2")), "4500771-2");
/// assert_eq!(dispatch_advice_number("4500771", Some("00")), "4500771");
/// assert_eq!(dispatch_advice_number("4500771", None), "4500771");
/// ```
pub fn dispatch_advice_number(base: &str, suffix: Option<&str>) -> String {
    match suffix.map(str::trim) {
        Some(s) if !s.is_empty() && !is_zero(s) => format!("{base}-{s}"),
        Some(_) | None => base.to_owned(),
    }
}

fn is_zero(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(|n| n == 0.0)
}

/// Identifiers and dates repeated on every output row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AdviceHeader {
    advice_number: String,
    purchase_number: String,
    dispatch_date: String,
    arrival_date: String,
}

impl AdviceHeader {
    fn read(order: &SourceGrid, suffix: Option<&str>, ctx: &ConversionContext) -> Self {
        let order_number = ORDER_NUMBER.read(order, 0);
        let purchase_number = BOOZT_PURCHASE_NUMBER.read(order, 0);
        debug!(order_number = %order_number, purchase_number = %purchase_number, "order numbers");
        Self {
            advice_number: dispatch_advice_number(&order_number, suffix),
            purchase_number,
            dispatch_date: format_iso_date(ctx.today),
            arrival_date: format_iso_date(next_working_day(ctx.today)),
        }
    }

    fn row(&self, ean: &str, quantity: Value, boxes: &GroupIndex) -> OutputRow {
        OutputRow::new()
            .with(HEADERS[0], self.advice_number.as_str())
            .with(HEADERS[1], ean)
            .with(HEADERS[2], quantity)
            .with(HEADERS[3], self.advice_number.as_str())
            .with(HEADERS[4], self.purchase_number.as_str())
            .with(HEADERS[5], self.dispatch_date.as_str())
            .with(HEADERS[6], self.arrival_date.as_str())
            .with(HEADERS[7], boxes.group_of(ean).unwrap_or_default())
    }
}

/// Maps every qualifying packing line to an output row.
///
/// A line qualifies when its EAN cell holds a 13-digit code and `quantity`
/// yields a value for it.
fn packing_rows<F>(packing: &SourceGrid, header: &AdviceHeader, quantity: F) -> Vec<OutputRow>
where
    F: Fn(u32, &str) -> Option<Value>,
{
    let boxes = build_group_index(packing, &box_scan());
    packing
        .rows_from(PACKING_FIRST_ROW)
        .filter_map(|(row, _)| {
            let ean = PACKING_EAN.read(packing, row);
            if !EAN13.matches(&ean) {
                if !ean.is_empty() {
                    debug!(row, ean = %ean, "skipping row without a valid EAN");
                }
                return None;
            }
            let Some(qty) = quantity(row, &ean) else {
                debug!(row, ean = %ean, "skipping row without quantity");
                return None;
            };
            Some(header.row(&ean, qty, &boxes))
        })
        .collect()
}

/// Packing list + order confirmation.
///
/// Quantities come from the packing list itself.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] if either grid is absent.
pub fn packing_order(
    inputs: &Inputs,
    _params: &Params,
    ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let packing = inputs.grid(PACKING_FILE)?;
    let order = inputs.grid(ORDER_FILE)?;
    let header = AdviceHeader::read(order, None, ctx);

    let rows = packing_rows(packing, &header, |row, _| {
        let text = PACKING_QUANTITY.read(packing, row);
        (!text.is_empty()).then(|| Value::Text(text))
    });
    info!(rows = rows.len(), advice = %header.advice_number, "dispatch advice built");

    Ok(Transformed::single(
        layout(),
        rows,
        format!("converted_{}", header.dispatch_date),
    ))
}

/// Packing list + order confirmation + quantity file.
///
/// Quantities come from the quantity file; an EAN it does not list gets 0.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] if any grid is absent.
pub fn packing_order_quantity(
    inputs: &Inputs,
    params: &Params,
    ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let packing = inputs.grid(PACKING_FILE)?;
    let order = inputs.grid(ORDER_FILE)?;
    let quantities: QuantityIndex =
        build_quantity_index(inputs.grid(QUANTITY_FILE)?, &quantity_scan());
    let header = AdviceHeader::read(order, params.get(DISPATCH_SUFFIX), ctx);

    let rows = packing_rows(packing, &header, |_, ean| {
        Some(Value::Number(quantities.quantity_of(ean).unwrap_or(0.0)))
    });
    info!(
        rows = rows.len(),
        quantities = quantities.len(),
        advice = %header.advice_number,
        "dispatch advice built"
    );

    let filename_stem = if header.advice_number.is_empty() {
        format!("converted_{}", header.dispatch_date)
    } else {
        header.advice_number.clone()
    };
    Ok(Transformed::single(layout(), rows, filename_stem))
}
