//! Errors produced by a conversion request.
//!
//! Every variant is terminal for the request: no partial output is ever
//! returned. Rows that cannot be resolved are not errors; transformers drop
//! them and log at `debug`.
use thiserror::Error;

/// All error conditions a conversion can end in.
///
/// [`ConvertError::status_code`] maps each variant onto the HTTP status the
/// upload boundary answers with, and [`ConvertError::user_message`] returns
/// the text shown to the person who uploaded the files.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required upload field or scalar parameter is absent or blank.
    #[error("missing required input {field:?}")]
    MissingInput {
        /// Multipart field or parameter name, e.g. `packingFile`.
        field: String,
    },

    /// The uploaded file's MIME type is not accepted for its field.
    #[error("unsupported format for {field:?}: {content_type:?} (expected one of {expected})")]
    UnsupportedFormat {
        /// Multipart field name.
        field: String,
        /// MIME type that was supplied.
        content_type: String,
        /// Comma-separated list of accepted MIME types.
        expected: String,
    },

    /// The file could not be opened as a spreadsheet, CSV or PDF.
    #[error("failed to parse {field:?}: {detail}")]
    ParseFailure {
        /// Multipart field name.
        field: String,
        /// Message from the underlying reader.
        detail: String,
    },

    /// The external document-analysis provider failed.
    #[error("document analysis failed: {detail}")]
    UpstreamService {
        /// Provider error message.
        detail: String,
    },

    /// Building or serializing the output workbook failed.
    #[error("failed to build workbook: {detail}")]
    Emit {
        /// Message from the workbook writer.
        detail: String,
    },
}

impl ConvertError {
    /// Returns the HTTP status for this error.
    ///
    /// - `400` for input problems the caller can fix by resubmitting.
    /// - `500` for failures while reading, analysing or writing documents.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingInput { .. } | Self::UnsupportedFormat { .. } => 400,
            Self::ParseFailure { .. } | Self::UpstreamService { .. } | Self::Emit { .. } => 500,
        }
    }

    /// Returns the end-user message (Swedish, as shown by the upload pages).
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput { field } => format!("Obligatoriskt fält saknas: {field}"),
            Self::UnsupportedFormat { expected, .. } if expected.contains("pdf") => {
                "Filen måste vara en PDF".to_owned()
            }
            Self::UnsupportedFormat { expected, .. } if expected.contains("csv") => {
                "Filen måste vara en CSV-fil".to_owned()
            }
            Self::UnsupportedFormat { .. } => {
                "Var god välj en giltig Excel-fil (.xls eller .xlsx)".to_owned()
            }
            Self::ParseFailure { detail, .. } => {
                format!("Ett fel uppstod vid konvertering av filen: {detail}")
            }
            Self::UpstreamService { .. } => "Kunde inte konvertera PDF-filen".to_owned(),
            Self::Emit { .. } => "Ett fel uppstod vid konvertering av filen".to_owned(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingInput {
            field: field.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_client_errors() {
        assert_eq!(ConvertError::missing("orderFile").status_code(), 400);
        let e = ConvertError::UnsupportedFormat {
            field: "file".to_owned(),
            content_type: "image/png".to_owned(),
            expected: "application/pdf".to_owned(),
        };
        assert_eq!(e.status_code(), 400);
    }

    #[test]
    fn processing_errors_are_server_errors() {
        let e = ConvertError::ParseFailure {
            field: "packingFile".to_owned(),
            detail: "not a zip".to_owned(),
        };
        assert_eq!(e.status_code(), 500);
        let e = ConvertError::UpstreamService {
            detail: "timeout".to_owned(),
        };
        assert_eq!(e.status_code(), 500);
    }

    #[test]
    fn parse_failure_surfaces_upstream_detail() {
        let e = ConvertError::ParseFailure {
            field: "invoiceFile".to_owned(),
            detail: "invalid zip header".to_owned(),
        };
        assert!(e.to_string().contains("invalid zip header"));
        assert!(e.user_message().contains("invalid zip header"));
    }

    #[test]
    fn pdf_format_error_uses_pdf_message() {
        let e = ConvertError::UnsupportedFormat {
            field: "file".to_owned(),
            content_type: "text/plain".to_owned(),
            expected: "application/pdf".to_owned(),
        };
        assert_eq!(e.user_message(), "Filen måste vara en PDF");
    }

    #[test]
    fn missing_input_names_the_field() {
        let msg = ConvertError::missing("quantityFile").to_string();
        assert!(msg.contains("quantityFile"), "message: {msg}");
    }
}
