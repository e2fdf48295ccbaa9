//! Abstraction over the external document-analysis (OCR) provider.
use crate::error::ConvertError;

/// Text lines and tables recognised in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutAnalysis {
    /// Recognised lines in reading order, across all pages.
    pub lines: Vec<String>,
    /// Tables as row-major cell grids.
    pub tables: Vec<Vec<Vec<String>>>,
}

/// A provider that turns a PDF into a [`LayoutAnalysis`].
///
/// Implementations live at the edge (the CLI ships an Azure client) so that
/// the core stays free of network dependencies.
pub trait DocumentAnalyzer {
    /// Analyses `document`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UpstreamService`] when the provider fails.
    fn analyze(&self, document: &[u8]) -> Result<LayoutAnalysis, ConvertError>;
}

/// Lays out table cells by `(row, column)` index into a dense grid.
///
/// Providers report cells sparsely with spans; missing positions are
/// filled with empty strings. Later cells at the same position win.
pub fn dense_table(
    row_count: usize,
    column_count: usize,
    cells: impl IntoIterator<Item = (usize, usize, String)>,
) -> Vec<Vec<String>> {
    let mut grid = vec![vec![String::new(); column_count]; row_count];
    for (row, column, content) in cells {
        if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(column)) {
            *slot = content;
        }
    }
    grid
}
