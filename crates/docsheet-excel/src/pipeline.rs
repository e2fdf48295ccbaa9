//! The shared conversion pipeline: validate, parse, transform, emit.
use tracing::{debug, info};

use docsheet_core::variant::FILE;
use docsheet_core::variant::pdf_items::{DebugReport, extract};
use docsheet_core::{
    ConversionContext, ConversionRequest, ConversionResult, ConvertError, DocumentAnalyzer,
    InputFormat, Inputs, ParsedInput, Upload, VariantKind,
};

use crate::emit::emit_workbook;
use crate::read::{read_csv, read_pdf_lines, read_spreadsheet};

/// Runs one conversion end to end.
///
/// `analyzer` is only consulted by variants that take a
/// [`InputFormat::PdfDocument`] upload. Validation happens before any
/// upload is parsed, so a missing parameter is reported even when a file
/// is malformed.
///
/// # Errors
///
/// - [`ConvertError::MissingInput`] / [`ConvertError::UnsupportedFormat`]
///   when the request does not match the variant.
/// - [`ConvertError::ParseFailure`] when an upload cannot be read.
/// - [`ConvertError::UpstreamService`] when document analysis fails or no
///   analyzer is configured.
/// - [`ConvertError::Emit`] when the workbook cannot be written.
pub fn convert(
    kind: VariantKind,
    request: &ConversionRequest,
    ctx: &ConversionContext,
    analyzer: Option<&dyn DocumentAnalyzer>,
) -> Result<ConversionResult, ConvertError> {
    let spec = kind.spec();
    spec.validate(request)?;

    let mut inputs = Inputs::new();
    for input in spec.inputs {
        let upload = request
            .file(input.field)
            .ok_or_else(|| ConvertError::MissingInput {
                field: input.field.to_owned(),
            })?;
        let parsed = parse_upload(upload, input.format, analyzer)?;
        inputs.insert(input.field, parsed);
    }

    let transformed = spec.run(&inputs, &request.params, ctx)?;
    let bytes = emit_workbook(&transformed)?;
    let filename = format!("{}.xlsx", transformed.filename_stem);
    info!(
        variant = %kind,
        filename = %filename,
        rows = transformed.rows().len(),
        bytes = bytes.len(),
        "conversion finished"
    );
    Ok(ConversionResult { bytes, filename })
}

/// Parses one upload according to its declared format.
///
/// # Errors
///
/// Returns [`ConvertError::ParseFailure`] or, for analyzed documents,
/// whatever the analyzer reports.
pub fn parse_upload(
    upload: &Upload,
    format: InputFormat,
    analyzer: Option<&dyn DocumentAnalyzer>,
) -> Result<ParsedInput, ConvertError> {
    let field = upload.field.as_str();
    debug!(field, content_type = %upload.content_type, size = upload.bytes.len(), "parsing upload");
    match format {
        InputFormat::Spreadsheet => read_spreadsheet(field, &upload.bytes).map(ParsedInput::Grid),
        InputFormat::Csv(framing) => read_csv(field, &upload.bytes, framing).map(ParsedInput::Grid),
        InputFormat::PdfText => read_pdf_lines(field, &upload.bytes).map(ParsedInput::Lines),
        InputFormat::PdfDocument => {
            let analyzer = analyzer.ok_or_else(|| ConvertError::UpstreamService {
                detail: "no document analysis service configured".to_owned(),
            })?;
            analyzer.analyze(&upload.bytes).map(ParsedInput::Layout)
        }
    }
}

/// Runs the PDF line-item extraction and returns everything it saw.
///
/// # Errors
///
/// Returns [`ConvertError::MissingInput`] without a `file` upload and
/// [`ConvertError::ParseFailure`] if the PDF cannot be read.
pub fn pdf_debug_report(request: &ConversionRequest) -> Result<DebugReport, ConvertError> {
    let upload = request.file(FILE).ok_or_else(|| ConvertError::MissingInput {
        field: FILE.to_owned(),
    })?;
    let lines = read_pdf_lines(FILE, &upload.bytes)?;
    Ok(extract(&lines))
}
