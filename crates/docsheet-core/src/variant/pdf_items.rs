//! Heuristic line-item extraction from a supplier PDF invoice.
//!
//! The text layer of these invoices runs the numeric columns together, e.g.
//! `PCS 12,50040500,0060x40` is unit price `12,500`, quantity `40`, amount
//! `500,00` and size `60x40`. Unit price and size have fixed shapes and are
//! cut from the ends first. Quantity and amount are then separated by trying
//! every split point and keeping the first one where `amount / quantity`
//! reproduces the unit price within tolerance.
//!
//! Lines that do not yield every field are dropped.
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::normalize::{literal_regex, parse_float_prefix, parse_int_prefix};
use crate::output::{OutputRow, SheetLayout, Transformed, Value};
use crate::upload::Params;
use crate::variant::{ConversionContext, FILE, Inputs};

/// Token that marks an item line.
const UNIT_TOKEN: &str = "PCS";

/// How many lines after the item line are searched for the item code.
const ITEM_CODE_LOOKAHEAD: usize = 5;

/// Unit prices below this use the wide tolerance.
const SMALL_PRICE: f64 = 5.0;
const SMALL_PRICE_TOLERANCE: f64 = 0.05;
const PRICE_TOLERANCE: f64 = 0.001;

static ITEM_CODE_RE: LazyLock<Regex> = LazyLock::new(|| literal_regex(r"^\d{8}-\d{4}-[A-Z0-9]+"));
static UNIT_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| literal_regex(r"^\d+[.,]\d{3}"));
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| literal_regex(r"[1-9]\d{1,2}x\d{2,3}$"));

const SHEET_NAME: &str = "Faktura";
const FILENAME: &str = "konverterad_faktura";
const HEADERS: [&str; 5] = ["ItemCode", "Quantity", "UnitPrice", "Amount", "Size"];
const WIDTHS: [f64; 5] = [20.0, 10.0, 15.0, 15.0, 10.0];

/// A fully resolved invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// `\d{8}-\d{4}-[A-Z0-9]+`.
    pub item_code: String,
    /// Pieces.
    pub quantity: i64,
    /// Unit price as printed, e.g. `12,500`.
    pub unit_price: String,
    /// Line amount with two decimals and `,`, e.g. `500,00`.
    pub amount: String,
    /// Size such as `60x40`.
    pub size: String,
}

/// Whatever could be parsed from one item line, resolved or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Item code, empty when not found.
    pub item_code: String,
    /// Unit price, empty when not found.
    pub unit_price: String,
    /// Quantity text of the accepted split, empty when none.
    pub quantity: String,
    /// Amount of the accepted split, empty when none.
    pub amount: String,
    /// Size, empty when not found.
    pub size: String,
    /// Whether a split within tolerance was found.
    pub valid: bool,
}

impl Candidate {
    fn resolve(&self) -> Option<LineItem> {
        let complete = self.valid
            && !self.item_code.is_empty()
            && !self.unit_price.is_empty()
            && !self.amount.is_empty()
            && !self.size.is_empty();
        if !complete {
            return None;
        }
        Some(LineItem {
            item_code: self.item_code.clone(),
            quantity: parse_int_prefix(&self.quantity)?,
            unit_price: self.unit_price.clone(),
            amount: self.amount.clone(),
            size: self.size.clone(),
        })
    }
}

/// Everything the extraction saw, for troubleshooting a supplier layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    /// Trimmed, non-empty text lines.
    pub lines: Vec<String>,
    /// The numeric remainder of each item line.
    pub debug_rest: Vec<String>,
    /// Accepted items.
    pub items: Vec<LineItem>,
    /// One candidate per item line.
    pub debug_items: Vec<Candidate>,
}

/// Splits `rest` into `(quantity, amount)` so that `amount / quantity`
/// reproduces `unit_price`.
///
/// Split points are tried from the end of the string towards the start.
/// A split is considered only if the amount part contains `,` or `.`.
/// Returns the quantity text and the amount value of the first accepted
/// split.
pub fn find_split(rest: &str, unit_price: f64) -> Option<(String, f64)> {
    let ratio = if unit_price < SMALL_PRICE {
        SMALL_PRICE_TOLERANCE
    } else {
        PRICE_TOLERANCE
    };
    let tolerance = ratio * unit_price.abs();

    let bounds: Vec<usize> = rest.char_indices().skip(1).map(|(i, _)| i).collect();
    bounds.into_iter().rev().find_map(|i| {
        let (quantity_text, amount_text) = rest.split_at(i);
        if !amount_text.contains([',', '.']) {
            return None;
        }
        let quantity = parse_int_prefix(quantity_text).filter(|q| *q > 0)?;
        let amount = parse_float_prefix(&amount_text.replacen(',', ".", 1))?;
        let reconstructed = amount / quantity as f64;
        ((reconstructed - unit_price).abs() <= tolerance).then(|| (quantity_text.to_owned(), amount))
    })
}

/// Parses the numeric remainder of an item line.
pub fn parse_rest(rest: &str) -> Candidate {
    let mut candidate = Candidate::default();
    let mut remaining = rest;

    if let Some(m) = UNIT_PRICE_RE.find(remaining) {
        candidate.unit_price = m.as_str().to_owned();
        remaining = &remaining[m.end()..];
    }
    let mut remaining = remaining.to_owned();
    if let Some(m) = SIZE_RE.find(&remaining) {
        candidate.size = m.as_str().to_owned();
        remaining = remaining[..m.start()].trim().to_owned();
    }

    if candidate.unit_price.is_empty() {
        return candidate;
    }
    let unit = parse_float_prefix(&candidate.unit_price.replacen(',', ".", 1)).unwrap_or(0.0);
    if let Some((quantity, amount)) = find_split(&remaining, unit) {
        candidate.quantity = quantity;
        candidate.amount = format_amount(amount);
        candidate.valid = true;
    }
    candidate
}

fn format_amount(amount: f64) -> String {
    format!("{amount:.2}").replace('.', ",")
}

/// Finds the item code in the lines following an item line.
fn item_code_after(lines: &[String]) -> Option<String> {
    lines.iter().take(ITEM_CODE_LOOKAHEAD).find_map(|line| {
        let (_, tail) = line.split_once(',')?;
        ITEM_CODE_RE.find(tail.trim()).map(|m| m.as_str().to_owned())
    })
}

/// Runs the extraction over trimmed, non-empty text lines.
pub fn extract(lines: &[String]) -> DebugReport {
    let mut report = DebugReport {
        lines: lines.to_vec(),
        ..DebugReport::default()
    };

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        let Some(pcs) = line.find(UNIT_TOKEN) else {
            i += 1;
            continue;
        };
        let item_code = item_code_after(lines.get(i + 1..).unwrap_or_default()).unwrap_or_default();

        let mut rest = line[pcs + UNIT_TOKEN.len()..].trim_start().to_owned();
        if !rest.bytes().any(|b| b.is_ascii_digit()) {
            rest = lines.get(i + 1).cloned().unwrap_or_default();
            i += 1;
        }

        let candidate = Candidate {
            item_code,
            ..parse_rest(&rest)
        };
        match candidate.resolve() {
            Some(item) => report.items.push(item),
            None => debug!(line = i, rest = %rest, ?candidate, "item line dropped"),
        }
        report.debug_rest.push(rest);
        report.debug_items.push(candidate);
        i += 1;
    }
    report
}

/// Line items from the PDF text layer.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] if the PDF lines are absent.
pub fn line_items(
    inputs: &Inputs,
    _params: &Params,
    _ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let report = extract(inputs.lines(FILE)?);
    info!(
        lines = report.lines.len(),
        candidates = report.debug_items.len(),
        items = report.items.len(),
        "pdf line items extracted"
    );

    let rows = report
        .items
        .into_iter()
        .map(|item| {
            OutputRow::new()
                .with(HEADERS[0], item.item_code)
                .with(HEADERS[1], Value::Integer(item.quantity))
                .with(HEADERS[2], item.unit_price)
                .with(HEADERS[3], item.amount)
                .with(HEADERS[4], item.size)
        })
        .collect();
    let layout = SheetLayout::new(SHEET_NAME, &HEADERS).widths(&WIDTHS);
    Ok(Transformed::single(layout, rows, FILENAME.to_owned()))
}
