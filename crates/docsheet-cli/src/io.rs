/// File reading with size enforcement, and workbook writing.
///
/// This module is the single place the `docsheet` binary touches the
/// filesystem. The library crates only ever see bytes.
///
/// - Uploads: size checked via `std::fs::metadata` before any read; the
///   MIME type is inferred from the file extension.
/// - Outputs: written to the output directory under the derived filename.
/// - All I/O errors are converted to [`CliError`] variants with exit code 2.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use docsheet_core::upload::{CSV_MIME, PDF_MIME, XLS_MIME, XLSX_MIME};
use docsheet_core::{ConversionResult, Upload};
use tracing::{debug, info};

use crate::error::CliError;

/// MIME type reported for unknown extensions; no variant accepts it.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Reads `path` into an [`Upload`] for `field`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) if the file is missing, unreadable or
/// larger than `max_size`.
pub fn read_upload(path: &Path, field: &str, max_size: u64) -> Result<Upload, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: file_size,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    let content_type = content_type_for(path);
    debug!(path = %path.display(), field, content_type, size = bytes.len(), "upload read");
    Ok(Upload::new(field, content_type, bytes))
}

/// Infers the MIME type from the file extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xls") => XLS_MIME,
        Some("xlsx") => XLSX_MIME,
        Some("pdf") => PDF_MIME,
        Some("csv") => CSV_MIME,
        Some(_) | None => UNKNOWN_MIME,
    }
}

/// Writes the workbook into `dir` and returns the written path.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) if the directory cannot be created or
/// the file cannot be written.
pub fn write_result(dir: &Path, result: &ConversionResult) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error_to_cli(&e, dir))?;
    let path = dir.join(&result.filename);
    std::fs::write(&path, &result.bytes).map_err(|e| io_error_to_cli(&e, &path))?;
    info!(path = %path.display(), bytes = result.bytes.len(), "workbook written");
    Ok(path)
}

/// Maps a `std::io::Error` arising from a file operation to a [`CliError`].
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        ErrorKind::ConnectionRefused
        | ErrorKind::ConnectionReset
        | ErrorKind::HostUnreachable
        | ErrorKind::NetworkUnreachable
        | ErrorKind::ConnectionAborted
        | ErrorKind::NotConnected
        | ErrorKind::AddrInUse
        | ErrorKind::AddrNotAvailable
        | ErrorKind::NetworkDown
        | ErrorKind::BrokenPipe
        | ErrorKind::AlreadyExists
        | ErrorKind::WouldBlock
        | ErrorKind::NotADirectory
        | ErrorKind::IsADirectory
        | ErrorKind::DirectoryNotEmpty
        | ErrorKind::ReadOnlyFilesystem
        | ErrorKind::StaleNetworkFileHandle
        | ErrorKind::InvalidInput
        | ErrorKind::InvalidData
        | ErrorKind::TimedOut
        | ErrorKind::WriteZero
        | ErrorKind::StorageFull
        | ErrorKind::NotSeekable
        | ErrorKind::QuotaExceeded
        | ErrorKind::FileTooLarge
        | ErrorKind::ResourceBusy
        | ErrorKind::ExecutableFileBusy
        | ErrorKind::Deadlock
        | ErrorKind::CrossesDevices
        | ErrorKind::TooManyLinks
        | ErrorKind::ArgumentListTooLong
        | ErrorKind::Interrupted
        | ErrorKind::Unsupported
        | ErrorKind::UnexpectedEof
        | ErrorKind::OutOfMemory
        | ErrorKind::Other
        | _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}
