/// Implementations of `docsheet pdf-items` and `docsheet pdf-summary`.
use std::path::Path;

use docsheet_core::variant::FILE;
use docsheet_core::{ConversionRequest, VariantKind};
use docsheet_excel::pdf_debug_report;

use crate::cmd::{Settings, convert_and_write, print_line};
use crate::error::CliError;

/// Runs the `pdf-items` command.
///
/// With `debug`, the extraction report is printed as pretty JSON and no
/// workbook is written.
///
/// # Errors
///
/// Returns [`CliError`] on I/O failures, conversion errors or if the report
/// cannot be serialized.
pub fn run_items(file: &Path, debug: bool, settings: &Settings) -> Result<(), CliError> {
    let request = ConversionRequest::new().upload(settings.upload(file, FILE)?);
    if !debug {
        return convert_and_write(VariantKind::PdfLineItems, &request, settings, None);
    }
    let report = pdf_debug_report(&request)?;
    let json = serde_json::to_string_pretty(&report).map_err(|e| CliError::Report {
        detail: e.to_string(),
    })?;
    print_line(&json)
}

/// Runs the `pdf-summary` command.
///
/// # Errors
///
/// Returns [`CliError`] on I/O failures or conversion errors.
pub fn run_summary(file: &Path, settings: &Settings) -> Result<(), CliError> {
    let request = ConversionRequest::new().upload(settings.upload(file, FILE)?);
    convert_and_write(VariantKind::PdfInvoiceSummary, &request, settings, None)
}
