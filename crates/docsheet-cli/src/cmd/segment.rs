/// Implementation of `docsheet segment`.
use std::path::Path;

use docsheet_core::variant::{DOCUMENT_NO, FILE, STORE};
use docsheet_core::{ConversionRequest, VariantKind};

use crate::cmd::{Settings, convert_and_write};
use crate::error::CliError;

/// Runs the `segment` command.
///
/// # Errors
///
/// Returns [`CliError`] on I/O failures or conversion errors, including a
/// blank `--document-no` or `--store`.
pub fn run(file: &Path, document_no: &str, store: &str, settings: &Settings) -> Result<(), CliError> {
    let request = ConversionRequest::new()
        .upload(settings.upload(file, FILE)?)
        .param(DOCUMENT_NO, document_no)
        .param(STORE, store);
    convert_and_write(VariantKind::CsvSegmentation, &request, settings, None)
}
