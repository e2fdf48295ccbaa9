/// Implementation of `docsheet ocr`.
///
/// Requires the `azure` feature (on by default) and both the endpoint and
/// the key, from flags, the environment or `.env`.
use std::path::Path;

use docsheet_core::variant::FILE;
use docsheet_core::{ConversionRequest, VariantKind};

use crate::cmd::{Settings, convert_and_write};
use crate::error::CliError;

/// Runs the `ocr` command.
///
/// The configuration is checked before the file is read.
///
/// # Errors
///
/// Returns [`CliError::AnalyzerNotConfigured`] without an endpoint or key,
/// otherwise [`CliError`] on I/O failures or conversion errors.
pub fn run(
    file: &Path,
    endpoint: Option<&str>,
    key: Option<&str>,
    settings: &Settings,
) -> Result<(), CliError> {
    let endpoint = required(endpoint, "AZURE_FORM_RECOGNIZER_ENDPOINT")?;
    let key = required(key, "AZURE_FORM_RECOGNIZER_KEY")?;
    let request = ConversionRequest::new().upload(settings.upload(file, FILE)?);
    analyze_and_write(&request, endpoint, key, settings)
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, CliError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CliError::AnalyzerNotConfigured {
            detail: format!("{name} is not set"),
        })
}

#[cfg(feature = "azure")]
fn analyze_and_write(
    request: &ConversionRequest,
    endpoint: &str,
    key: &str,
    settings: &Settings,
) -> Result<(), CliError> {
    let client = crate::azure::AzureLayoutClient::new(endpoint, key)?;
    convert_and_write(VariantKind::OcrLayout, request, settings, Some(&client))
}

#[cfg(not(feature = "azure"))]
fn analyze_and_write(
    request: &ConversionRequest,
    _endpoint: &str,
    _key: &str,
    settings: &Settings,
) -> Result<(), CliError> {
    convert_and_write(VariantKind::OcrLayout, request, settings, None)
}
