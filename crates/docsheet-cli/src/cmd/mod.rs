/// Command modules for the `docsheet` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments plus the shared [`Settings`] and returns
/// `Ok(())` on success or a [`CliError`] on failure.
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use docsheet_core::{
    ConversionContext, ConversionRequest, DocumentAnalyzer, Upload, VariantKind,
};

use crate::error::CliError;
use crate::io::{read_upload, write_result};

pub mod dispatch;
pub mod invoice;
pub mod ocr;
pub mod pdf;
pub mod segment;

/// Settings shared by every subcommand, taken from the global flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory the workbook is written to.
    pub output_dir: PathBuf,
    /// Conversion date.
    pub context: ConversionContext,
    /// Upload size limit in bytes.
    pub max_file_size: u64,
}

impl Settings {
    /// Reads `path` as the upload for `field`.
    ///
    /// # Errors
    ///
    /// See [`read_upload`].
    pub fn upload(&self, path: &Path, field: &str) -> Result<Upload, CliError> {
        read_upload(path, field, self.max_file_size)
    }
}

/// Runs `kind` on `request`, writes the workbook and prints its path.
///
/// # Errors
///
/// Returns [`CliError::Conversion`] if the conversion fails and an I/O
/// variant if the workbook cannot be written.
pub fn convert_and_write(
    kind: VariantKind,
    request: &ConversionRequest,
    settings: &Settings,
    analyzer: Option<&dyn DocumentAnalyzer>,
) -> Result<(), CliError> {
    let result = docsheet_excel::convert(kind, request, &settings.context, analyzer)?;
    let path = write_result(&settings.output_dir, &result)?;
    print_line(&path.display().to_string())
}

/// Writes one line to stdout.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stdout is closed.
pub fn print_line(line: &str) -> Result<(), CliError> {
    writeln!(io::stdout().lock(), "{line}").map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}
