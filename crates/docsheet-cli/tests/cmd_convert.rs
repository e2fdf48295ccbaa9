//! Integration tests for the `docsheet` conversion subcommands.
#![allow(clippy::expect_used)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use rust_xlsxwriter::Workbook;

/// Path to the compiled `docsheet` binary.
fn docsheet_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("docsheet");
    path
}

/// Runs `docsheet` inside `dir` with a clean Azure environment.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(docsheet_bin())
        .current_dir(dir)
        .env_remove("AZURE_FORM_RECOGNIZER_ENDPOINT")
        .env_remove("AZURE_FORM_RECOGNIZER_KEY")
        .env_remove("DOCSHEET_MAX_FILE_SIZE")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run docsheet")
}

fn write_packing_list(path: &Path) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(17, 9, "12345678").expect("box");
    ws.write_string(18, 35, "5701234567890").expect("ean");
    ws.write_number(18, 42, 3.0).expect("qty");
    ws.write_string(19, 35, "5701234567891").expect("ean");
    ws.write_number(19, 42, 1.0).expect("qty");
    wb.save(path).expect("save packing list");
}

fn write_order(path: &Path) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(20, 0, "Customer order no: 4500771").expect("order");
    ws.write_string(22, 0, "Customer order ref: BZ991").expect("ref");
    wb.save(path).expect("save order");
}

fn segmentation_csv() -> String {
    let mut csv = String::new();
    for i in 0..11 {
        csv.push_str(&format!("header {i}\n"));
    }
    csv.push_str("1,12345678-RED,,,,10,,,100\n");
    csv.push_str("Total\n");
    csv
}

fn stdout_path(out: &Output) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&out.stdout).trim())
}

fn assert_exit(out: &Output, code: i32) {
    assert_eq!(
        out.status.code(),
        Some(code),
        "unexpected exit code; stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn dispatch_writes_workbook_and_prints_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_packing_list(&dir.path().join("packing.xlsx"));
    write_order(&dir.path().join("order.xlsx"));

    let out = run_in(
        dir.path(),
        &[
            "dispatch",
            "packing.xlsx",
            "order.xlsx",
            "--date",
            "2026-10-16",
            "--output-dir",
            "out",
        ],
    );
    assert_exit(&out, 0);

    let written = stdout_path(&out);
    assert!(written.ends_with("converted_2026-10-16.xlsx"), "got {}", written.display());
    let bytes = std::fs::read(dir.path().join(&written)).expect("workbook exists");
    let mut wb: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx");
    let range = wb.worksheet_range("Converted Data").expect("sheet");
    assert_eq!(range.height(), 3);
    assert_eq!(
        range.get_value((2, 1)),
        Some(&Data::String("5701234567891".to_owned()))
    );
    assert_eq!(range.get_value((1, 7)), Some(&Data::String("12345678".to_owned())));
}

#[test]
fn dispatch_with_quantity_file_is_named_after_advice_number() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_packing_list(&dir.path().join("packing.xlsx"));
    write_order(&dir.path().join("order.xlsx"));
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "5701234567890").expect("ean");
    ws.write_number(0, 1, 9.0).expect("qty");
    wb.save(dir.path().join("qty.xlsx")).expect("save quantity file");

    let out = run_in(
        dir.path(),
        &[
            "dispatch",
            "packing.xlsx",
            "order.xlsx",
            "--quantity",
            "qty.xlsx",
            "--suffix",
            "3",
        ],
    );
    assert_exit(&out, 0);
    assert!(dir.path().join("4500771-3.xlsx").exists());
}

#[test]
fn segment_writes_converted_invoice() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("export.csv"), segmentation_csv()).expect("csv");

    let out = run_in(
        dir.path(),
        &["segment", "export.csv", "--document-no", "PO-1", "--store", "S01"],
    );
    assert_exit(&out, 0);

    let bytes = std::fs::read(dir.path().join("converted_invoice.xlsx")).expect("workbook");
    let mut wb: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx");
    let range = wb.worksheet_range("Sheet1").expect("sheet");
    assert_eq!(range.get_value((3, 8)), Some(&Data::Float(5.0)));
}

#[test]
fn blank_store_exits_1_with_user_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("export.csv"), segmentation_csv()).expect("csv");

    let out = run_in(
        dir.path(),
        &["segment", "export.csv", "--document-no", "PO-1", "--store", " "],
    );
    assert_exit(&out, 1);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Obligatoriskt fält saknas: store"), "stderr: {stderr}");
}

#[test]
fn wrong_extension_exits_1_as_unsupported_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("invoice.txt"), "not a workbook").expect("txt");

    let out = run_in(dir.path(), &["invoice", "invoice.txt"]);
    assert_exit(&out, 1);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("giltig Excel-fil"), "stderr: {stderr}");
}

#[test]
fn missing_input_file_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_in(dir.path(), &["pdf-summary", "nope.pdf"]);
    assert_exit(&out, 2);
    assert!(String::from_utf8_lossy(&out.stderr).contains("file not found"));
}

#[test]
fn oversized_input_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("export.csv"), segmentation_csv()).expect("csv");

    let out = run_in(
        dir.path(),
        &[
            "--max-file-size",
            "16",
            "segment",
            "export.csv",
            "--document-no",
            "PO-1",
            "--store",
            "S01",
        ],
    );
    assert_exit(&out, 2);
    assert!(String::from_utf8_lossy(&out.stderr).contains("file too large"));
}

#[test]
fn ocr_without_configuration_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("scan.pdf"), b"%PDF-1.4").expect("pdf");

    let out = run_in(dir.path(), &["ocr", "scan.pdf"]);
    assert_exit(&out, 2);
    assert!(String::from_utf8_lossy(&out.stderr).contains("AZURE_FORM_RECOGNIZER_ENDPOINT"));
}

#[test]
fn unreadable_pdf_exits_1() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("broken.pdf"), b"%PDF-broken").expect("pdf");

    let out = run_in(dir.path(), &["pdf-items", "broken.pdf", "--debug"]);
    assert_exit(&out, 1);
    assert!(out.stdout.is_empty());
}
