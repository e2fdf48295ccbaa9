/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `docsheet` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. A file could not be read or written, or
///   the document-analysis service is not configured. Nothing was converted.
/// - Exit code **1**: conversion failure. The files were read but the
///   conversion itself was rejected or failed.
use std::fmt;
use std::path::PathBuf;

use docsheet_core::ConvertError;

/// All error conditions that the `docsheet` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a file.
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// The offending path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes.
        actual: u64,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the path involved.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// `ocr` was run without an endpoint or key.
    AnalyzerNotConfigured {
        /// Which setting is missing.
        detail: String,
    },

    // --- Exit code 1: conversion failures ---
    /// The conversion was rejected or failed.
    Conversion(ConvertError),

    /// The debug report could not be serialized.
    Report {
        /// The serializer message.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::IoError { .. }
            | Self::AnalyzerNotConfigured { .. } => 2,

            Self::Conversion(_) | Self::Report { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual,
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::AnalyzerNotConfigured { detail } => {
                format!("error: document analysis is not configured: {detail}")
            }
            Self::Conversion(e) => {
                format!("error: {e}\n{}", e.user_message())
            }
            Self::Report { detail } => {
                format!("error: failed to serialize debug report: {detail}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        Self::Conversion(e)
    }
}
