//! Property tests for the packing list + order merge.
//!
//! Packing lists are generated as a sequence of box rows, EAN rows and noise
//! rows below the fixed 17-row preamble. Every EAN is unique, so the expected
//! box of each output row is simply the last box row above it.
#![allow(clippy::expect_used)]

use chrono::NaiveDate;
use proptest::prelude::*;

use docsheet_core::variant::dispatch::{box_scan, packing_order};
use docsheet_core::variant::{ORDER_FILE, PACKING_FILE};
use docsheet_core::{
    Cell, ConversionContext, Inputs, Params, ParsedInput, SourceGrid, build_group_index,
    column_number,
};

#[derive(Debug, Clone)]
enum PackingLine {
    Box(u32),
    Ean { column_offset: u32, quantity: Option<u32> },
    Noise,
}

fn packing_line() -> impl Strategy<Value = PackingLine> {
    prop_oneof![
        (10_000_000u32..100_000_000).prop_map(PackingLine::Box),
        (0u32..7, proptest::option::of(1u32..500))
            .prop_map(|(column_offset, quantity)| PackingLine::Ean { column_offset, quantity }),
        Just(PackingLine::Noise),
    ]
}

fn set(row: &mut Vec<Cell>, column: u32, cell: Cell) {
    let index = column as usize - 1;
    if row.len() <= index {
        row.resize(index + 1, Cell::Empty);
    }
    row[index] = cell;
}

/// Builds the grid and returns it with the expected `(ean, box)` pairs.
fn build(lines: &[PackingLine]) -> (SourceGrid, Vec<(String, String)>) {
    let mut rows = vec![Vec::new(); 17];
    let mut expected = Vec::new();
    let mut active = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut row = Vec::new();
        match line {
            PackingLine::Box(number) => {
                set(&mut row, column_number("J"), Cell::Number(f64::from(*number)));
                active = number.to_string();
            }
            PackingLine::Ean {
                column_offset,
                quantity,
            } => {
                let ean = format!("57{i:011}");
                set(&mut row, column_number("AJ") + column_offset, ean.as_str().into());
                if let Some(q) = quantity {
                    set(&mut row, column_number("AQ"), Cell::Number(f64::from(*q)));
                    expected.push((ean, active.clone()));
                }
            }
            PackingLine::Noise => {
                set(&mut row, column_number("B"), "Carton total".into());
            }
        }
        rows.push(row);
    }
    (SourceGrid::from_rows(rows), expected)
}

fn order_grid() -> SourceGrid {
    let mut rows = vec![Vec::new(); 23];
    rows[20] = vec!["Customer order no: 4500771".into()];
    rows[22] = vec!["Customer order ref: BZ991".into()];
    SourceGrid::from_rows(rows)
}

fn ctx() -> ConversionContext {
    ConversionContext {
        today: NaiveDate::from_ymd_opt(2026, 10, 14).expect("date"),
    }
}

proptest! {
    #[test]
    fn one_row_per_quantified_ean_with_positional_box(lines in proptest::collection::vec(packing_line(), 0..60)) {
        let (packing, expected) = build(&lines);
        let inputs = Inputs::new()
            .with(PACKING_FILE, ParsedInput::Grid(packing.clone()))
            .with(ORDER_FILE, ParsedInput::Grid(order_grid()));
        let out = packing_order(&inputs, &Params::new(), &ctx()).expect("transform");

        let actual: Vec<(String, String)> = out
            .rows()
            .iter()
            .map(|r| (r.text("EAN Code"), r.text("Box No.")))
            .collect();
        prop_assert_eq!(&actual, &expected);

        let index = build_group_index(&packing, &box_scan());
        for (ean, box_no) in &actual {
            prop_assert_eq!(index.group_of(ean).unwrap_or_default(), box_no.as_str());
        }
    }
}
