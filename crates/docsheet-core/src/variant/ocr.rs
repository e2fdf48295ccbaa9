//! OCR layout export: recognised lines and tables, written as they come.
use tracing::info;

use crate::error::ConvertError;
use crate::grid::column_letters;
use crate::output::{OutputRow, Sheet, SheetLayout, Transformed};
use crate::upload::Params;
use crate::variant::{ConversionContext, FILE, Inputs};

const TEXT_SHEET: &str = "All Text";
const LINE_HEADER: &str = "Line";
const LINE_WIDTH: f64 = 120.0;
const FILENAME: &str = "lexington_invoice_ocr";

/// Builds the "All Text" sheet plus one headerless `TableN` sheet per table.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] if no layout analysis is present.
pub fn layout_sheets(
    inputs: &Inputs,
    _params: &Params,
    _ctx: &ConversionContext,
) -> Result<Transformed, ConvertError> {
    let analysis = inputs.layout(FILE)?;

    let text = Sheet {
        layout: SheetLayout::new(TEXT_SHEET, &[LINE_HEADER]).widths(&[LINE_WIDTH]),
        rows: analysis
            .lines
            .iter()
            .map(|line| OutputRow::new().with(LINE_HEADER, line.as_str()))
            .collect(),
    };

    let tables = analysis.tables.iter().enumerate().map(|(index, table)| Sheet {
        layout: SheetLayout::new(&format!("Table{}", index + 1), &[]),
        rows: table
            .iter()
            .map(|cells| {
                cells.iter().zip(1u32..).fold(OutputRow::new(), |row, (cell, column)| {
                    row.with(&column_letters(column), cell.as_str())
                })
            })
            .collect(),
    });

    let sheets: Vec<Sheet> = std::iter::once(text).chain(tables).collect();
    info!(
        lines = analysis.lines.len(),
        tables = analysis.tables.len(),
        "ocr layout exported"
    );
    Ok(Transformed {
        sheets,
        filename_stem: FILENAME.to_owned(),
    })
}
