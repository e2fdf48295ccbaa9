#![deny(clippy::print_stdout, clippy::print_stderr)]
//! Transformation rules that turn logistics documents into spreadsheet rows.
//!
//! This crate has no spreadsheet, CSV or PDF I/O. Callers parse uploads into
//! [`SourceGrid`]s or text lines, pick a [`VariantKind`], and render the
//! resulting [`Transformed`] sheets. `docsheet-excel` does both ends.

pub mod analysis;
pub mod error;
pub mod grid;
pub mod locator;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod upload;
pub mod variant;

pub use analysis::{DocumentAnalyzer, LayoutAnalysis, dense_table};
pub use error::ConvertError;
pub use grid::{Cell, SourceGrid, column_letters, column_number, parse_column};
pub use locator::{BOX_NUMBER, DigitShape, EAN13, FieldLocator};
pub use normalize::{
    extract_labeled_value, format_iso_date, next_working_day, parse_float_prefix,
    parse_int_prefix, parse_locale_number, round_to,
};
pub use output::{
    ConversionResult, HeaderStyle, MetadataCell, NumberFormat, OutputRow, Sheet, SheetLayout,
    Transformed, Value, XLSX_CONTENT_TYPE,
};
pub use resolve::{
    GroupIndex, GroupScan, QuantityIndex, QuantityScan, build_group_index, build_quantity_index,
};
pub use upload::{ConversionRequest, CsvFraming, InputFormat, Params, Upload};
pub use variant::{
    ConversionContext, InputSpec, Inputs, ParamSpec, ParsedInput, VariantKind, VariantSpec,
};
