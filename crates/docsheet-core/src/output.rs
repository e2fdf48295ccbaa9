//! Output model: rows, sheet layouts and the finished artifact.
use serde::Serialize;

/// MIME type of every produced workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A primitive output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Written as a string cell.
    Text(String),
    /// Written as a number cell without fraction.
    Integer(i64),
    /// Written as a number cell.
    Number(f64),
}

impl Value {
    /// Renders the value as display text.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Number(f) => f.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Number(f)
    }
}

/// One output line: column name -> value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputRow {
    cells: Vec<(String, Value)>,
}

impl OutputRow {
    /// Starts an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `column = value` and returns the row.
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.cells.push((column.to_owned(), value.into()));
        self
    }

    /// Returns the value for `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Returns the value for `column` as text, `""` if absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(Value::to_text).unwrap_or_default()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|(_, v)| v)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// How the header row is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Bold, yellow fill, centered.
    Highlighted,
    /// Left-aligned, otherwise plain.
    LeftAligned,
    /// No styling.
    Plain,
}

/// Number format applied to a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// `#,##0.00`
    TwoDecimals,
    /// `0`
    Integer,
}

impl NumberFormat {
    /// Excel format code.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::TwoDecimals => "#,##0.00",
            Self::Integer => "0",
        }
    }
}

/// A fixed cell written above the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataCell {
    /// 1-based row.
    pub row: u32,
    /// 1-based column.
    pub column: u32,
    /// Cell content.
    pub value: Value,
}

/// Static shape of one output sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Worksheet name.
    pub name: String,
    /// Column headers, in output order. Empty means rows are written as-is
    /// without a header.
    pub headers: Vec<String>,
    /// Column widths (characters), by position.
    pub widths: Vec<f64>,
    /// Header row styling.
    pub header_style: HeaderStyle,
    /// 1-based row of the header; data follows directly below.
    pub header_row: u32,
    /// Cells written above the header.
    pub metadata: Vec<MetadataCell>,
    /// Number formats keyed by header name.
    pub number_formats: Vec<(String, NumberFormat)>,
}

impl SheetLayout {
    /// A layout with a plain header in row 1 and no widths.
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            headers: headers.iter().map(|h| (*h).to_owned()).collect(),
            widths: Vec::new(),
            header_style: HeaderStyle::Plain,
            header_row: 1,
            metadata: Vec::new(),
            number_formats: Vec::new(),
        }
    }

    /// Sets column widths.
    #[must_use]
    pub fn widths(mut self, widths: &[f64]) -> Self {
        self.widths = widths.to_vec();
        self
    }

    /// Sets the header style.
    #[must_use]
    pub fn header_style(mut self, style: HeaderStyle) -> Self {
        self.header_style = style;
        self
    }

    /// Moves the header to `row`.
    #[must_use]
    pub fn header_row(mut self, row: u32) -> Self {
        self.header_row = row;
        self
    }

    /// Adds a metadata cell above the header.
    #[must_use]
    pub fn metadata(mut self, row: u32, column: u32, value: impl Into<Value>) -> Self {
        self.metadata.push(MetadataCell {
            row,
            column,
            value: value.into(),
        });
        self
    }

    /// Applies `format` to the column named `header`.
    #[must_use]
    pub fn number_format(mut self, header: &str, format: NumberFormat) -> Self {
        self.number_formats.push((header.to_owned(), format));
        self
    }

    /// Returns the number format for the column at `index`.
    pub fn format_for(&self, index: usize) -> Option<NumberFormat> {
        let header = self.headers.get(index)?;
        self.number_formats
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, f)| *f)
    }

    /// 1-based row of the first data row.
    pub fn first_data_row(&self) -> u32 {
        if self.headers.is_empty() {
            self.header_row
        } else {
            self.header_row + 1
        }
    }
}

/// One populated output sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Static shape.
    pub layout: SheetLayout,
    /// Data rows in output order.
    pub rows: Vec<OutputRow>,
}

/// Everything a variant produces before the workbook is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
    /// Output filename without extension.
    pub filename_stem: String,
}

impl Transformed {
    /// A single-sheet result.
    pub fn single(layout: SheetLayout, rows: Vec<OutputRow>, filename_stem: String) -> Self {
        Self {
            sheets: vec![Sheet { layout, rows }],
            filename_stem,
        }
    }

    /// Rows of the first sheet.
    pub fn rows(&self) -> &[OutputRow] {
        self.sheets.first().map(|s| s.rows.as_slice()).unwrap_or(&[])
    }
}

/// The finished workbook handed to the upload boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Serialized `.xlsx` bytes.
    pub bytes: Vec<u8>,
    /// Download filename including the `.xlsx` extension.
    pub filename: String,
}

impl ConversionResult {
    /// `Content-Type` header value.
    pub fn content_type(&self) -> &'static str {
        XLSX_CONTENT_TYPE
    }

    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}
