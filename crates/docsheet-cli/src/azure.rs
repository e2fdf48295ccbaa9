//! Azure Form Recognizer `prebuilt-layout` client.
//!
//! The analyze call is asynchronous on the service side: the POST answers
//! `202 Accepted` with an `Operation-Location` header, which is polled until
//! the operation succeeds or fails.
use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, info};

use docsheet_core::upload::PDF_MIME;
use docsheet_core::{ConvertError, DocumentAnalyzer, LayoutAnalysis, dense_table};

const API_VERSION: &str = "2023-07-31";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION: &str = "Operation-Location";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLLS: u32 = 120;

/// Blocking client for the layout model.
#[derive(Debug, Clone)]
pub struct AzureLayoutClient {
    endpoint: String,
    key: String,
    http: Client,
}

impl AzureLayoutClient {
    /// Creates a client for `endpoint` authenticated with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UpstreamService`] if the HTTP client cannot be
    /// built.
    pub fn new(endpoint: &str, key: &str) -> Result<Self, ConvertError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(upstream)?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            key: key.to_owned(),
            http,
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/prebuilt-layout:analyze?api-version={API_VERSION}",
            self.endpoint
        )
    }

    fn submit(&self, document: &[u8]) -> Result<String, ConvertError> {
        let response = self
            .http
            .post(self.analyze_url())
            .header(KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, PDF_MIME)
            .body(document.to_vec())
            .send()
            .map_err(upstream)?;
        let response = ensure_success(response)?;
        response
            .headers()
            .get(OPERATION_LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| ConvertError::UpstreamService {
                detail: format!("analyze response has no {OPERATION_LOCATION} header"),
            })
    }

    fn poll(&self, location: &str) -> Result<AnalyzeResult, ConvertError> {
        for attempt in 1..=MAX_POLLS {
            let response = self
                .http
                .get(location)
                .header(KEY_HEADER, &self.key)
                .send()
                .map_err(upstream)?;
            let operation: AnalyzeOperation = ensure_success(response)?.json().map_err(upstream)?;
            debug!(attempt, status = %operation.status, "analyze operation polled");
            match operation.status.as_str() {
                "succeeded" => return Ok(operation.analyze_result.unwrap_or_default()),
                "failed" => {
                    let detail = operation
                        .error
                        .map_or_else(|| "analysis failed".to_owned(), |e| e.message);
                    return Err(ConvertError::UpstreamService { detail });
                }
                _ => thread::sleep(POLL_INTERVAL),
            }
        }
        Err(ConvertError::UpstreamService {
            detail: format!("analysis did not finish after {MAX_POLLS} polls"),
        })
    }
}

impl DocumentAnalyzer for AzureLayoutClient {
    fn analyze(&self, document: &[u8]) -> Result<LayoutAnalysis, ConvertError> {
        let location = self.submit(document)?;
        let result = self.poll(&location)?;
        let layout = layout_from_result(result);
        info!(
            lines = layout.lines.len(),
            tables = layout.tables.len(),
            "document analyzed"
        );
        Ok(layout)
    }
}

/// Polled operation body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    /// `notStarted`, `running`, `succeeded` or `failed`.
    pub status: String,
    /// Present once the operation succeeded.
    pub analyze_result: Option<AnalyzeResult>,
    /// Present when the operation failed.
    pub error: Option<ServiceError>,
}

/// Error body of a failed operation.
#[derive(Debug, Deserialize)]
pub struct ServiceError {
    /// Service message.
    #[serde(default)]
    pub message: String,
}

/// The parts of the analysis result that are kept.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// Pages in document order.
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Tables across all pages.
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// One analyzed page.
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    /// Text lines in reading order.
    #[serde(default)]
    pub lines: Vec<Line>,
}

/// One recognized text line.
#[derive(Debug, Default, Deserialize)]
pub struct Line {
    /// Line text.
    #[serde(default)]
    pub content: String,
}

/// A recognized table with sparse cells.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Non-empty cells; spanned cells appear once.
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

/// One table cell, addressed by 0-based position.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// 0-based row.
    pub row_index: usize,
    /// 0-based column.
    pub column_index: usize,
    /// Cell text.
    #[serde(default)]
    pub content: String,
}

/// Flattens page lines in reading order and densifies every table.
pub fn layout_from_result(result: AnalyzeResult) -> LayoutAnalysis {
    let lines = result
        .pages
        .into_iter()
        .flat_map(|page| page.lines)
        .map(|line| line.content)
        .collect();
    let tables = result
        .tables
        .into_iter()
        .map(|table| {
            let cells = table
                .cells
                .into_iter()
                .map(|c| (c.row_index, c.column_index, c.content));
            dense_table(table.row_count, table.column_count, cells)
        })
        .collect();
    LayoutAnalysis { lines, tables }
}

fn ensure_success(response: Response) -> Result<Response, ConvertError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ConvertError::UpstreamService {
        detail: format!("HTTP {status}: {body}"),
    })
}

fn upstream(e: reqwest::Error) -> ConvertError {
    ConvertError::UpstreamService {
        detail: e.to_string(),
    }
}
