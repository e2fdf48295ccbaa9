//! Request-side types: uploaded files, scalar parameters and accepted formats.
use std::collections::BTreeMap;

/// MIME type of legacy `.xls` workbooks (also used by browsers for `.csv`).
pub const XLS_MIME: &str = "application/vnd.ms-excel";
/// MIME type of `.xlsx` workbooks.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// MIME type of PDF documents.
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of CSV text.
pub const CSV_MIME: &str = "text/csv";

/// One uploaded file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Multipart field name.
    pub field: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload part.
    pub fn new(field: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            field: field.to_owned(),
            content_type: content_type.to_owned(),
            bytes,
        }
    }
}

/// Record framing for CSV inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFraming {
    /// Non-blank records dropped from the start.
    pub skip_leading: usize,
    /// Non-blank records dropped from the end.
    pub drop_trailing: usize,
}

/// How an upload is parsed before the transform sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// First worksheet of an `xls`/`xlsx` workbook.
    Spreadsheet,
    /// CSV records with the given framing.
    Csv(CsvFraming),
    /// Text layer of a PDF, as trimmed non-empty lines.
    PdfText,
    /// PDF handed to the document-analysis provider.
    PdfDocument,
}

impl InputFormat {
    /// MIME types accepted for this format.
    pub fn accepted_types(self) -> &'static [&'static str] {
        match self {
            Self::Spreadsheet => &[XLS_MIME, XLSX_MIME],
            Self::Csv(_) => &[CSV_MIME, XLS_MIME],
            Self::PdfText | Self::PdfDocument => &[PDF_MIME],
        }
    }

    /// Returns `true` if `content_type` is accepted.
    ///
    /// Comparison ignores case and any `;` parameters such as `charset`.
    pub fn accepts(self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.accepted_types().contains(&essence.as_str())
    }
}

/// Scalar form fields, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value` and returns the set.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_owned(), value.to_owned());
    }

    /// Returns the trimmed value of `name`, `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Everything submitted with one conversion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Uploaded files.
    pub uploads: Vec<Upload>,
    /// Scalar form fields.
    pub params: Params,
}

impl ConversionRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an upload and returns the request.
    #[must_use]
    pub fn upload(mut self, upload: Upload) -> Self {
        self.uploads.push(upload);
        self
    }

    /// Sets a scalar parameter and returns the request.
    #[must_use]
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Returns the upload for `field`, ignoring empty files.
    pub fn file(&self, field: &str) -> Option<&Upload> {
        self.uploads
            .iter()
            .find(|u| u.field == field && !u.bytes.is_empty())
    }
}
