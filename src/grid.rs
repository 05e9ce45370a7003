use crate::error::{MapperError, Result};
use crate::models::{CellValue, ABSENT};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, TimeDelta, Timelike};
use std::path::Path;
use tracing::{debug, info};

/// Cell values of one worksheet, addressed by absolute 0-based position.
///
/// Loaded once and never mutated. Any read outside the extent is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    sheet_name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Build a grid from in-memory rows; ragged rows are allowed.
    pub fn from_rows(sheet_name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            sheet_name: sheet_name.into(),
            rows,
            width,
        }
    }

    /// Open a workbook and load one sheet (the first when `sheet` is `None`).
    pub fn open(path: &Path, sheet: Option<&str>) -> Result<Self> {
        let mut workbook = open_workbook_auto(path).map_err(|source| MapperError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(MapperError::SheetNotFound {
                        sheet: name.to_string(),
                        available: sheet_names,
                    });
                }
                name.to_string()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| MapperError::NoWorksheet {
                    path: path.to_path_buf(),
                })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| MapperError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        let grid = Self::from_range(&sheet_name, &range);
        info!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = grid.height(),
            cols = grid.width(),
            "loaded worksheet"
        );
        Ok(grid)
    }

    /// Materialise a calamine range, padding so indices stay absolute.
    pub fn from_range(sheet_name: &str, range: &Range<Data>) -> Self {
        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            return Self::from_rows(sheet_name, Vec::new());
        };

        let height = end.0 as usize + 1;
        let width = end.1 as usize + 1;
        let mut rows = vec![vec![CellValue::Absent; width]; height];

        for (r, c, data) in range.cells() {
            let row = start.0 as usize + r;
            let col = start.1 as usize + c;
            if let Some(slot) = rows.get_mut(row).and_then(|cells| cells.get_mut(col)) {
                *slot = convert_cell(data);
            }
        }

        Self {
            sheet_name: sheet_name.to_string(),
            rows,
            width,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Number of rows, counting from sheet row 1.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, counting from sheet column A.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at `(row, col)`; absent when outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&ABSENT)
    }

    /// Cells of `row` across the full grid width.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &CellValue> + '_ {
        (0..self.width).map(move |col| self.cell(row, col))
    }

    /// Leftmost non-blank cell of `row`; whitespace-only text is skipped.
    pub fn first_populated(&self, row: usize) -> Option<(usize, &CellValue)> {
        self.row(row)
            .enumerate()
            .find(|(_, value)| !value.is_blank())
    }
}

/// calamine cell to grid cell
fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Absent,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => CellValue::Text(excel_serial_to_string(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            debug!(error = ?e, "error cell read as absent");
            CellValue::Absent
        }
    }
}

/// Excel serial date to `YYYY-MM-DD`, with the time appended when non-zero.
fn excel_serial_to_string(serial: f64) -> String {
    // Excel counts from 1899-12-30 because of its 1900 leap-year bug
    let millis = (serial * 86_400_000.0).round() as i64;
    let datetime = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|base| base.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_milliseconds(millis))
        .and_then(|(base, offset)| base.checked_add_signed(offset));

    match datetime {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => serial.to_string(),
    }
}
