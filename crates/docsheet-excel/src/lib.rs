//! Spreadsheet, CSV and PDF boundary for docsheet.
//!
//! This crate parses uploads into [`docsheet_core::SourceGrid`]s and text
//! lines, runs the variant transforms from `docsheet-core`, and writes the
//! resulting sheets as an `.xlsx` workbook. The `calamine`, `csv`,
//! `pdf-extract` and `rust_xlsxwriter` dependencies are confined to this
//! crate and do not bleed into `docsheet-core`.
//!
//! # Input formats
//!
//! | Format | Reader |
//! |---|---|
//! | `.xls` / `.xlsx` | `calamine`, first worksheet only |
//! | CSV | `csv`, headerless and flexible, then framed per variant |
//! | PDF text layer | `pdf-extract` |
//! | PDF layout | any [`docsheet_core::DocumentAnalyzer`] |
//!
//! Everything happens in memory; nothing is written to disk.

pub mod emit;
pub mod pipeline;
pub mod read;
pub mod style;

pub use emit::emit_workbook;
pub use pipeline::{convert, parse_upload, pdf_debug_report};
pub use read::{range_to_grid, read_csv, read_pdf_lines, read_spreadsheet, text_lines};
