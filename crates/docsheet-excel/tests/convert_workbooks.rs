//! End-to-end conversions over in-memory workbooks and CSV files.
//!
//! Fixtures are written with `rust_xlsxwriter` and the converted workbook is
//! read back with `calamine`, so both ends of the pipeline are exercised.
#![allow(clippy::expect_used)]

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

use docsheet_core::upload::{CSV_MIME, PDF_MIME, XLS_MIME, XLSX_MIME};
use docsheet_core::variant::{
    DISPATCH_SUFFIX, DOCUMENT_NO, FILE, INVOICE_FILE, INVOICE_NUMBER, ORDER_FILE, PACKING_FILE,
    QUANTITY_FILE, STORE,
};
use docsheet_core::{ConversionContext, ConversionRequest, ConvertError, Upload, VariantKind};
use docsheet_excel::convert;

fn ctx() -> ConversionContext {
    ConversionContext {
        today: NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"),
    }
}

fn packing_list() -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_number(17, 9, 12_345_678.0).expect("box");
    ws.write_string(18, 35, "5701234567890").expect("ean");
    ws.write_number(18, 42, 3.0).expect("qty");
    ws.write_string(19, 36, "5701234567891").expect("ean");
    ws.write_string(19, 42, "5").expect("qty");
    ws.write_string(20, 9, "87654321").expect("box");
    ws.write_string(21, 35, "5701234567892").expect("ean");
    ws.write_number(21, 43, 2.0).expect("qty");
    ws.write_string(22, 35, "5701234567893").expect("ean without qty");
    ws.write_string(23, 1, "Carton total").expect("noise");
    wb.save_to_buffer().expect("packing list")
}

fn order_confirmation() -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Order confirmation").expect("title");
    ws.write_string(20, 0, "Customer order no: 4500771").expect("order");
    ws.write_string(22, 0, "Customer order ref: BZ991").expect("ref");
    wb.save_to_buffer().expect("order confirmation")
}

fn quantity_file() -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "5701234567890").expect("ean");
    ws.write_number(0, 1, 7.0).expect("qty");
    ws.write_string(1, 2, "5701234567892").expect("ean");
    ws.write_string(1, 3, "11").expect("qty");
    wb.save_to_buffer().expect("quantity file")
}

fn first_sheet(bytes: Vec<u8>) -> (String, Range<Data>) {
    let mut wb: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("open output");
    let name = wb.sheet_names().first().cloned().expect("one sheet");
    let range = wb.worksheet_range(&name).expect("range");
    (name, range)
}

fn text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => f.to_string(),
        Some(other) => format!("{other:?}"),
        None => String::new(),
    }
}

fn dispatch_request() -> ConversionRequest {
    ConversionRequest::new()
        .upload(Upload::new(PACKING_FILE, XLSX_MIME, packing_list()))
        .upload(Upload::new(ORDER_FILE, XLS_MIME, order_confirmation()))
}

#[test]
fn packing_order_builds_dispatch_advice() {
    let result = convert(VariantKind::PackingOrder, &dispatch_request(), &ctx(), None)
        .expect("convert");
    assert_eq!(result.filename, "converted_2026-10-16.xlsx");
    assert_eq!(
        result.content_disposition(),
        "attachment; filename=\"converted_2026-10-16.xlsx\""
    );

    let (name, range) = first_sheet(result.bytes);
    assert_eq!(name, "Converted Data");
    assert_eq!(text(&range, 0, 0), "Dispatch Advice form");
    assert_eq!(text(&range, 0, 7), "Box No.");

    let rows: Vec<[String; 8]> = (1..4)
        .map(|r| std::array::from_fn(|c| text(&range, r, c as u32)))
        .collect();
    assert_eq!(rows[0][0], "4500771");
    assert_eq!(rows[0][1], "5701234567890");
    assert_eq!(rows[0][2], "3");
    assert_eq!(rows[0][4], "BZ991");
    assert_eq!(rows[0][5], "2026-10-16");
    assert_eq!(rows[0][6], "2026-10-19");
    assert_eq!(rows[0][7], "12345678");
    assert_eq!(rows[1][1], "5701234567891");
    assert_eq!(rows[1][2], "5");
    assert_eq!(rows[1][7], "12345678");
    assert_eq!(rows[2][1], "5701234567892");
    assert_eq!(rows[2][2], "2");
    assert_eq!(rows[2][7], "87654321");
    assert_eq!(text(&range, 4, 1), "", "an EAN without quantity is skipped");
}

#[test]
fn quantity_file_overrides_packing_quantities() {
    let request = dispatch_request()
        .upload(Upload::new(QUANTITY_FILE, XLSX_MIME, quantity_file()))
        .param(DISPATCH_SUFFIX, "2");
    let result = convert(VariantKind::PackingOrderQuantity, &request, &ctx(), None)
        .expect("convert");
    assert_eq!(result.filename, "4500771-2.xlsx");

    let (_, range) = first_sheet(result.bytes);
    assert_eq!(text(&range, 1, 0), "4500771-2");
    assert_eq!(text(&range, 1, 3), "4500771-2");
    assert_eq!(range.get_value((1, 2)), Some(&Data::Float(7.0)));
    assert_eq!(range.get_value((2, 2)), Some(&Data::Float(0.0)));
    assert_eq!(range.get_value((3, 2)), Some(&Data::Float(11.0)));
    assert_eq!(
        range.get_value((4, 2)),
        Some(&Data::Float(0.0)),
        "packing quantity is not required with a quantity file"
    );
}

#[test]
fn missing_quantity_file_is_reported_by_field() {
    let err = convert(VariantKind::PackingOrderQuantity, &dispatch_request(), &ctx(), None)
        .expect_err("quantity file is missing");
    assert!(matches!(err, ConvertError::MissingInput { ref field } if field == QUANTITY_FILE));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn pdf_upload_is_rejected_for_spreadsheet_fields() {
    let request = ConversionRequest::new()
        .upload(Upload::new(PACKING_FILE, PDF_MIME, packing_list()))
        .upload(Upload::new(ORDER_FILE, XLSX_MIME, order_confirmation()));
    let err = convert(VariantKind::PackingOrder, &request, &ctx(), None)
        .expect_err("pdf is not a spreadsheet");
    assert!(matches!(err, ConvertError::UnsupportedFormat { ref field, .. } if field == PACKING_FILE));
}

#[test]
fn invoice_is_reformatted_and_named_after_invoice_number() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (col, header) in ["Order", "EAN", "Qty", "Price", "Boozt"].iter().enumerate() {
        ws.write_string(0, col as u16, *header).expect("header");
    }
    ws.write_string(1, 0, "SO-100").expect("order");
    ws.write_number(1, 1, 5_701_234_567_890.0).expect("ean");
    ws.write_number(1, 2, 4.0).expect("qty");
    ws.write_string(1, 4, "BZ-7781").expect("boozt");
    ws.write_string(3, 0, "SO-101").expect("order");
    ws.write_string(3, 1, "5701234567891").expect("ean");
    let bytes = wb.save_to_buffer().expect("invoice");

    let request = ConversionRequest::new()
        .upload(Upload::new(INVOICE_FILE, XLSX_MIME, bytes))
        .param(INVOICE_NUMBER, "INV9")
        .param(DISPATCH_SUFFIX, "1");
    let result = convert(VariantKind::InvoiceReformat, &request, &ctx(), None).expect("convert");
    assert_eq!(result.filename, "INV9-BZ-7781.xlsx");

    let (name, range) = first_sheet(result.bytes);
    assert_eq!(name, "Converted Invoice");
    assert_eq!(text(&range, 1, 0), "SO-100-1");
    assert_eq!(text(&range, 1, 2), "BZ-7781");
    assert_eq!(text(&range, 1, 3), "5701234567890");
    assert_eq!(text(&range, 1, 4), "4");
    assert_eq!(text(&range, 2, 1), "SO-101", "the blank source row is skipped");
}

#[test]
fn csv_export_is_segmented() {
    let mut csv = String::new();
    for i in 0..11 {
        csv.push_str(&format!("preamble {i},x\n"));
    }
    csv.push_str("1,12345678-RED,,,,2,,,10\n");
    csv.push_str("2,\"22345678_BLK\",,,,\"-1\",,,\"-500,00\"\n");
    csv.push_str("Total,,,,,,,,\n");

    let request = ConversionRequest::new()
        .upload(Upload::new(FILE, CSV_MIME, csv.into_bytes()))
        .param(DOCUMENT_NO, "PO-77")
        .param(STORE, "S01");
    let result = convert(VariantKind::CsvSegmentation, &request, &ctx(), None).expect("convert");
    assert_eq!(result.filename, "converted_invoice.xlsx");

    let (_, range) = first_sheet(result.bytes);
    assert_eq!(text(&range, 0, 0), "ILLUM BOLIGHUS");
    assert_eq!(text(&range, 0, 2), "37");
    assert_eq!(text(&range, 2, 0), "Document Type");
    assert_eq!(text(&range, 3, 1), "PO-77");
    assert_eq!(range.get_value((3, 2)), Some(&Data::Float(10_000.0)));
    assert_eq!(text(&range, 3, 4), "12345678");
    assert_eq!(text(&range, 3, 5), "RED");
    assert_eq!(text(&range, 3, 6), "S01");
    assert_eq!(range.get_value((3, 7)), Some(&Data::Float(2.0)));
    assert_eq!(range.get_value((3, 8)), Some(&Data::Float(2.5)));
    assert_eq!(range.get_value((4, 2)), Some(&Data::Float(20_000.0)));
    assert_eq!(text(&range, 4, 5), "BLK");
    assert_eq!(range.get_value((4, 8)), Some(&Data::Float(-223.0)));
    assert_eq!(text(&range, 5, 0), "", "the totals record is dropped");
}
