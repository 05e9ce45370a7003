//! Workbook fixtures written to a temp dir with rust_xlsxwriter, so tests
//! load real files through calamine.
#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::PathBuf;
use tempfile::TempDir;

/// Value written to one fixture cell
pub enum Fixture {
    Text(&'static str),
    Number(f64),
    Date(u16, u8, u8),
}

/// Sheet contents as `(row, col, value)`, 0-based.
pub struct SheetSpec {
    pub name: &'static str,
    pub cells: Vec<(u32, u16, Fixture)>,
}

impl SheetSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cells: Vec::new(),
        }
    }

    pub fn text(mut self, row: u32, col: u16, value: &'static str) -> Self {
        self.cells.push((row, col, Fixture::Text(value)));
        self
    }

    pub fn number(mut self, row: u32, col: u16, value: f64) -> Self {
        self.cells.push((row, col, Fixture::Number(value)));
        self
    }

    pub fn date(mut self, row: u32, col: u16, ymd: (u16, u8, u8)) -> Self {
        self.cells.push((row, col, Fixture::Date(ymd.0, ymd.1, ymd.2)));
        self
    }

    /// Consecutive text cells starting at column 0.
    pub fn text_row(mut self, row: u32, values: &[&'static str]) -> Self {
        for (col, value) in values.iter().enumerate() {
            self = self.text(row, col as u16, value);
        }
        self
    }
}

/// Write `sheets` to `<tempdir>/<file_name>`. Keep the `TempDir` alive for
/// as long as the file is used.
pub fn write_workbook(file_name: &str, sheets: &[SheetSpec]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let mut workbook = Workbook::new();
    for spec in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(spec.name).unwrap();
        for (row, col, value) in &spec.cells {
            match value {
                Fixture::Text(s) => {
                    worksheet.write_string(*row, *col, *s).unwrap();
                }
                Fixture::Number(n) => {
                    worksheet.write_number(*row, *col, *n).unwrap();
                }
                Fixture::Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                    worksheet
                        .write_datetime_with_format(*row, *col, &date, &date_format)
                        .unwrap();
                }
            }
        }
    }
    workbook.save(&path).unwrap();

    (dir, path)
}

/// Purchase-order export: preamble block, header on sheet row 13, three
/// line items below it and a trailing total row.
pub fn purchase_order() -> SheetSpec {
    SheetSpec::new("PO")
        .text(0, 0, "Purchase Order PO-1357102")
        .date(1, 0, (2022, 1, 5))
        .text(5, 0, "Issued To")
        .text(5, 4, "Acme Traders")
        .text(6, 0, "Vendor Code")
        .text(6, 4, "V-0042")
        .text(7, 0, "GST")
        .text(7, 4, "27ABCDE1234F1Z5")
        .text_row(
            12,
            &[
                "S.No",
                "Article Id",
                "Article Name",
                "HSN Code",
                "MRP (₹)",
                "Total",
            ],
        )
        .text_row(13, &["1", "A100", "Widget", "8471"])
        .number(13, 4, 250.0)
        .number(13, 5, 500.0)
        .text_row(14, &["2", "A200", "Gadget", "8472"])
        .number(14, 4, 99.5)
        .text_row(15, &["3", "A300", "   ", "8473"])
        .text(17, 0, "Total")
        .number(17, 5, 1234.0)
}
