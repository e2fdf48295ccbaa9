//! One row per invoice from PDFs that print labeled fields.
use tracing::info;

use crate::error::ConvertError;
use crate::output::{OutputRow, SheetLayout, Transformed};
use crate::upload::Params;
use crate::variant::{ConversionContext, FILE, Inputs};

const SHEET_NAME: &str = "Faktura";
const FILENAME: &str = "konverterad_faktura";

/// Labels in output column order. The last one closes a record.
const LABELS: [&str; 4] = ["Fakturanummer", "Datum", "Belopp", "Beskrivning"];

/// A partially filled invoice record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Record {
    fields: [String; 4],
}

impl Record {
    fn into_row(self) -> OutputRow {
        LABELS
            .iter()
            .zip(self.fields)
            .fold(OutputRow::new(), |row, (label, value)| row.with(label, value))
    }
}

/// Returns the label index and trimmed value for a labeled line.
///
/// A line is matched against the labels in order, so a line holding two
/// labels counts for the first one only.
fn labeled_field(line: &str) -> Option<(usize, String)> {
    LABELS.iter().enumerate().find_map(|(index, label)| {
        let marker = format!("{label}:");
        line.split_once(&marker)
            .map(|(_, value)| (index, value.trim().to_owned()))
    })
}

/// Collects invoices from labeled lines.
///
/// `Fakturanummer:`, `Datum:` and `Belopp:` fill the current record;
/// `Beskrivning:` fills the last field and closes it. A record that is never
/// closed is discarded.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] if the PDF lines are absent.
pub fn summarize(
    inputs: &Inputs,
    _params: &Params,
    _ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let lines = inputs.lines(FILE)?;
    let closing = LABELS.len() - 1;

    let (rows, _) = lines.iter().filter_map(|line| labeled_field(line)).fold(
        (Vec::new(), Record::default()),
        |(mut rows, mut current), (index, value)| {
            current.fields[index] = value;
            if index == closing {
                rows.push(std::mem::take(&mut current).into_row());
            }
            (rows, current)
        },
    );
    info!(invoices = rows.len(), "pdf invoice summary built");

    let layout = SheetLayout::new(SHEET_NAME, &LABELS);
    Ok(Transformed::single(layout, rows, FILENAME.to_owned()))
}
