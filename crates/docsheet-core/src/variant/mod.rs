//! Conversion variants and the static records that describe them.
//!
//! Every conversion runs through the same pipeline: validate the request
//! against the variant's [`VariantSpec`], parse each upload according to its
//! [`InputFormat`], call the variant's transform, then emit the workbook.
//! The variants differ only in their records and transform functions.
use std::fmt;

use chrono::NaiveDate;

use crate::analysis::LayoutAnalysis;
use crate::error::ConvertError;
use crate::grid::SourceGrid;
use crate::output::Transformed;
use crate::upload::{ConversionRequest, CsvFraming, InputFormat, Params};

pub mod dispatch;
pub mod invoice;
pub mod ocr;
pub mod pdf_items;
pub mod pdf_summary;
pub mod segmentation;

/// Upload field carrying the packing list.
pub const PACKING_FILE: &str = "packingFile";
/// Upload field carrying the order confirmation.
pub const ORDER_FILE: &str = "orderFile";
/// Upload field carrying the quantity file.
pub const QUANTITY_FILE: &str = "quantityFile";
/// Upload field carrying the invoice workbook.
pub const INVOICE_FILE: &str = "invoiceFile";
/// Upload field for single-file variants.
pub const FILE: &str = "file";

/// Optional suffix appended to the dispatch advice number.
pub const DISPATCH_SUFFIX: &str = "dispatchSuffix";
/// Invoice number used in the invoice filename.
pub const INVOICE_NUMBER: &str = "invoiceNumber";
/// Document number written on every segmentation line.
pub const DOCUMENT_NO: &str = "documentNo";
/// Store (location) code written on every segmentation line.
pub const STORE: &str = "store";

/// The supported conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Packing list + order confirmation -> dispatch advice.
    PackingOrder,
    /// Packing list + order confirmation + quantity file -> dispatch advice.
    PackingOrderQuantity,
    /// Supplier invoice workbook -> invoice import sheet.
    InvoiceReformat,
    /// Invoice CSV export -> purchase lines with segmented item numbers.
    CsvSegmentation,
    /// Supplier PDF invoice -> line items found by the split heuristic.
    PdfLineItems,
    /// PDF with labeled invoice fields -> one row per invoice.
    PdfInvoiceSummary,
    /// PDF sent to the document-analysis provider -> raw lines and tables.
    OcrLayout,
}

impl VariantKind {
    /// All variants, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::PackingOrder,
        Self::PackingOrderQuantity,
        Self::InvoiceReformat,
        Self::CsvSegmentation,
        Self::PdfLineItems,
        Self::PdfInvoiceSummary,
        Self::OcrLayout,
    ];

    /// Stable identifier used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::PackingOrder => "packing-order",
            Self::PackingOrderQuantity => "packing-order-quantity",
            Self::InvoiceReformat => "invoice-reformat",
            Self::CsvSegmentation => "csv-segmentation",
            Self::PdfLineItems => "pdf-line-items",
            Self::PdfInvoiceSummary => "pdf-invoice-summary",
            Self::OcrLayout => "ocr-layout",
        }
    }

    /// Returns the static record describing this variant.
    pub fn spec(self) -> &'static VariantSpec {
        match self {
            Self::PackingOrder => &PACKING_ORDER,
            Self::PackingOrderQuantity => &PACKING_ORDER_QUANTITY,
            Self::InvoiceReformat => &INVOICE_REFORMAT,
            Self::CsvSegmentation => &CSV_SEGMENTATION,
            Self::PdfLineItems => &PDF_LINE_ITEMS,
            Self::PdfInvoiceSummary => &PDF_INVOICE_SUMMARY,
            Self::OcrLayout => &OCR_LAYOUT,
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A required upload field and how it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    /// Multipart field name.
    pub field: &'static str,
    /// Parser applied to the upload.
    pub format: InputFormat,
}

/// A scalar form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Form field name.
    pub name: &'static str,
    /// Whether a blank value is rejected.
    pub required: bool,
}

/// Signature shared by all variant transforms.
pub type TransformFn =
    fn(&Inputs, &Params, &ConversionContext) -> Result<Transformed, ConvertError>;

/// Static configuration for one conversion variant.
#[derive(Debug)]
pub struct VariantSpec {
    /// Which variant this record describes.
    pub kind: VariantKind,
    /// Required uploads, in parse order.
    pub inputs: &'static [InputSpec],
    /// Scalar parameters the variant reads.
    pub params: &'static [ParamSpec],
    /// Maps parsed inputs to output sheets.
    pub transform: TransformFn,
}

impl VariantSpec {
    /// Checks that every required upload and parameter is present and that
    /// each upload's MIME type is accepted.
    ///
    /// Inputs are checked in declaration order, so the first missing field
    /// is the one reported.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingInput`] or
    /// [`ConvertError::UnsupportedFormat`].
    pub fn validate(&self, request: &ConversionRequest) -> Result<(), ConvertError> {
        for input in self.inputs {
            let upload = request
                .file(input.field)
                .ok_or_else(|| ConvertError::missing(input.field))?;
            if !input.format.accepts(&upload.content_type) {
                return Err(ConvertError::UnsupportedFormat {
                    field: input.field.to_owned(),
                    content_type: upload.content_type.clone(),
                    expected: input.format.accepted_types().join(", "),
                });
            }
        }
        for param in self.params.iter().filter(|p| p.required) {
            if request.params.get(param.name).is_none() {
                return Err(ConvertError::missing(param.name));
            }
        }
        Ok(())
    }

    /// Runs the transform.
    ///
    /// # Errors
    ///
    /// Propagates the transform's error.
    pub fn run(
        &self,
        inputs: &Inputs,
        params: &Params,
        ctx: &ConversionContext,
    ) -> Result<Transformed, ConvertError> {
        (self.transform)(inputs, params, ctx)
    }
}

/// Request-independent facts a transform may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionContext {
    /// The conversion date (dispatch date and filename date).
    pub today: NaiveDate,
}

/// One upload after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInput {
    /// A spreadsheet or CSV file.
    Grid(SourceGrid),
    /// Text lines from a PDF.
    Lines(Vec<String>),
    /// Output of the document-analysis provider.
    Layout(LayoutAnalysis),
}

/// Parsed uploads keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    entries: Vec<(String, ParsedInput)>,
}

impl Inputs {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parsed upload and returns the set.
    #[must_use]
    pub fn with(mut self, field: &str, input: ParsedInput) -> Self {
        self.insert(field, input);
        self
    }

    /// Adds a parsed upload.
    pub fn insert(&mut self, field: &str, input: ParsedInput) {
        self.entries.push((field.to_owned(), input));
    }

    fn get(&self, field: &str) -> Option<&ParsedInput> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, input)| input)
    }

    /// Returns the grid parsed from `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingInput`] when `field` was not parsed as
    /// a grid.
    pub fn grid(&self, field: &str) -> Result<&SourceGrid, ConvertError> {
        match self.get(field) {
            Some(ParsedInput::Grid(grid)) => Ok(grid),
            Some(ParsedInput::Lines(_) | ParsedInput::Layout(_)) | None => {
                Err(ConvertError::missing(field))
            }
        }
    }

    /// Returns the PDF text lines parsed from `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingInput`] when `field` was not parsed as
    /// text lines.
    pub fn lines(&self, field: &str) -> Result<&[String], ConvertError> {
        match self.get(field) {
            Some(ParsedInput::Lines(lines)) => Ok(lines),
            Some(ParsedInput::Grid(_) | ParsedInput::Layout(_)) | None => {
                Err(ConvertError::missing(field))
            }
        }
    }

    /// Returns the layout analysis for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingInput`] when `field` has no analysis.
    pub fn layout(&self, field: &str) -> Result<&LayoutAnalysis, ConvertError> {
        match self.get(field) {
            Some(ParsedInput::Layout(layout)) => Ok(layout),
            Some(ParsedInput::Grid(_) | ParsedInput::Lines(_)) | None => {
                Err(ConvertError::missing(field))
            }
        }
    }
}

/// Segmentation export framing: 11 preamble records, 1 totals record.
pub const SEGMENTATION_CSV: CsvFraming = CsvFraming {
    skip_leading: 11,
    drop_trailing: 1,
};

/// Packing list + order confirmation.
pub static PACKING_ORDER: VariantSpec = VariantSpec {
    kind: VariantKind::PackingOrder,
    inputs: &[
        InputSpec {
            field: PACKING_FILE,
            format: InputFormat::Spreadsheet,
        },
        InputSpec {
            field: ORDER_FILE,
            format: InputFormat::Spreadsheet,
        },
    ],
    params: &[],
    transform: dispatch::packing_order,
};

/// Packing list + order confirmation + quantity file.
pub static PACKING_ORDER_QUANTITY: VariantSpec = VariantSpec {
    kind: VariantKind::PackingOrderQuantity,
    inputs: &[
        InputSpec {
            field: PACKING_FILE,
            format: InputFormat::Spreadsheet,
        },
        InputSpec {
            field: ORDER_FILE,
            format: InputFormat::Spreadsheet,
        },
        InputSpec {
            field: QUANTITY_FILE,
            format: InputFormat::Spreadsheet,
        },
    ],
    params: &[ParamSpec {
        name: DISPATCH_SUFFIX,
        required: false,
    }],
    transform: dispatch::packing_order_quantity,
};

/// Invoice workbook reformat.
pub static INVOICE_REFORMAT: VariantSpec = VariantSpec {
    kind: VariantKind::InvoiceReformat,
    inputs: &[InputSpec {
        field: INVOICE_FILE,
        format: InputFormat::Spreadsheet,
    }],
    params: &[
        ParamSpec {
            name: INVOICE_NUMBER,
            required: false,
        },
        ParamSpec {
            name: DISPATCH_SUFFIX,
            required: false,
        },
    ],
    transform: invoice::reformat,
};

/// CSV invoice segmentation.
pub static CSV_SEGMENTATION: VariantSpec = VariantSpec {
    kind: VariantKind::CsvSegmentation,
    inputs: &[InputSpec {
        field: FILE,
        format: InputFormat::Csv(SEGMENTATION_CSV),
    }],
    params: &[
        ParamSpec {
            name: DOCUMENT_NO,
            required: true,
        },
        ParamSpec {
            name: STORE,
            required: true,
        },
    ],
    transform: segmentation::segment,
};

/// Heuristic PDF line items.
pub static PDF_LINE_ITEMS: VariantSpec = VariantSpec {
    kind: VariantKind::PdfLineItems,
    inputs: &[InputSpec {
        field: FILE,
        format: InputFormat::PdfText,
    }],
    params: &[],
    transform: pdf_items::line_items,
};

/// Labeled-field PDF invoice summary.
pub static PDF_INVOICE_SUMMARY: VariantSpec = VariantSpec {
    kind: VariantKind::PdfInvoiceSummary,
    inputs: &[InputSpec {
        field: FILE,
        format: InputFormat::PdfText,
    }],
    params: &[],
    transform: pdf_summary::summarize,
};

/// OCR layout export.
pub static OCR_LAYOUT: VariantSpec = VariantSpec {
    kind: VariantKind::OcrLayout,
    inputs: &[InputSpec {
        field: FILE,
        format: InputFormat::PdfDocument,
    }],
    params: &[],
    transform: ocr::layout_sheets,
};

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::upload::{CSV_MIME, PDF_MIME, Upload, XLSX_MIME};

    #[test]
    fn every_kind_maps_to_its_own_record() {
        for kind in VariantKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn missing_second_file_is_reported_by_name() {
        let request = ConversionRequest::new().upload(Upload::new(PACKING_FILE, XLSX_MIME, vec![1]));
        let err = PACKING_ORDER.validate(&request).expect_err("validation should fail");
        assert!(
            matches!(&err, ConvertError::MissingInput { field } if field == ORDER_FILE),
            "got {err:?}"
        );
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn wrong_mime_type_is_unsupported() {
        let request = ConversionRequest::new().upload(Upload::new(FILE, XLSX_MIME, vec![1]));
        let err = PDF_LINE_ITEMS.validate(&request).expect_err("validation should fail");
        assert!(
            matches!(&err, ConvertError::UnsupportedFormat { field, .. } if field == FILE),
            "got {err:?}"
        );
    }

    #[test]
    fn required_params_are_enforced() {
        let request = ConversionRequest::new()
            .upload(Upload::new(FILE, CSV_MIME, vec![1]))
            .param(DOCUMENT_NO, "D-1");
        let err = CSV_SEGMENTATION.validate(&request).expect_err("validation should fail");
        assert!(
            matches!(&err, ConvertError::MissingInput { field } if field == STORE),
            "got {err:?}"
        );
        let request = request.param(STORE, "S01");
        assert!(CSV_SEGMENTATION.validate(&request).is_ok());
    }

    #[test]
    fn optional_params_may_be_absent() {
        let request = ConversionRequest::new().upload(Upload::new(INVOICE_FILE, XLSX_MIME, vec![1]));
        assert!(INVOICE_REFORMAT.validate(&request).is_ok());
    }

    #[test]
    fn input_accessors_check_kind() {
        let inputs = Inputs::new().with(FILE, ParsedInput::Lines(vec!["a".to_owned()]));
        assert!(inputs.lines(FILE).is_ok());
        assert!(inputs.grid(FILE).is_err());
        assert!(inputs.layout(FILE).is_err());
        assert!(inputs.lines(ORDER_FILE).is_err());
    }

    #[test]
    fn pdf_variants_accept_pdf() {
        let request = ConversionRequest::new().upload(Upload::new(FILE, PDF_MIME, vec![1]));
        assert!(PDF_INVOICE_SUMMARY.validate(&request).is_ok());
        assert!(OCR_LAYOUT.validate(&request).is_ok());
    }
}
