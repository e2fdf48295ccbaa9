/// Implementation of `docsheet invoice`.
use std::path::Path;

use docsheet_core::variant::{DISPATCH_SUFFIX, INVOICE_FILE, INVOICE_NUMBER};
use docsheet_core::{ConversionRequest, VariantKind};

use crate::cmd::{Settings, convert_and_write};
use crate::error::CliError;

/// Runs the `invoice` command.
///
/// # Errors
///
/// Returns [`CliError`] on I/O failures or conversion errors.
pub fn run(
    file: &Path,
    invoice_number: Option<&str>,
    suffix: Option<&str>,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut request = ConversionRequest::new().upload(settings.upload(file, INVOICE_FILE)?);
    if let Some(number) = invoice_number {
        request = request.param(INVOICE_NUMBER, number);
    }
    if let Some(suffix) = suffix {
        request = request.param(DISPATCH_SUFFIX, suffix);
    }
    convert_and_write(VariantKind::InvoiceReformat, &request, settings, None)
}
