//! Console views of a loaded grid.
//!
//! Rows and columns are printed 1-based with the 0-based index alongside,
//! so a mapping read off the screen can be used directly as array offsets.

use crate::grid::Grid;
use crate::mapper::HeaderLayout;
use crate::models::{CellValue, PreambleProbe, Record};
use std::io::{self, Write};

/// Sheet name and extent.
pub fn sheet_summary<W: Write>(out: &mut W, grid: &Grid) -> io::Result<()> {
    writeln!(out, "Sheet name: {}", grid.sheet_name())?;
    writeln!(out, "Total rows: {}", grid.height())?;
    writeln!(out, "Total columns: {}", grid.width())
}

/// Non-empty values of the first `max_rows` rows, limited to `max_cols`
/// columns and `truncate` characters per value. Empty rows are skipped.
pub fn dump_rows<W: Write>(
    out: &mut W,
    grid: &Grid,
    max_rows: usize,
    max_cols: usize,
    truncate: usize,
) -> io::Result<()> {
    for row in 0..max_rows.min(grid.height()) {
        let values: Vec<String> = grid
            .row(row)
            .take(max_cols)
            .filter_map(CellValue::text)
            .map(|text| truncate_chars(&text, truncate))
            .collect();
        if !values.is_empty() {
            writeln!(out, "Row {}: {:?}", row + 1, values)?;
        }
    }
    Ok(())
}

/// Every non-empty header cell with its position.
pub fn header_listing<W: Write>(
    out: &mut W,
    grid: &Grid,
    layout: &HeaderLayout,
) -> io::Result<()> {
    writeln!(out, "Header Row {} ({:?}):", layout.row + 1, layout.source)?;
    for (col, cell) in grid.row(layout.row).enumerate() {
        if let Some(label) = cell.text() {
            writeln!(out, "  Column {} (index {}): {}", col + 1, col, label)?;
        }
    }
    Ok(())
}

/// Header text next to the value of `data_row`, for every non-empty column
/// of that row.
pub fn column_report<W: Write>(
    out: &mut W,
    grid: &Grid,
    header_row: usize,
    data_row: usize,
) -> io::Result<()> {
    writeln!(out, "Row {} against header row {}:", data_row + 1, header_row + 1)?;
    for (col, cell) in grid.row(data_row).enumerate() {
        let Some(value) = cell.text() else {
            continue;
        };
        let header = grid.cell(header_row, col);
        writeln!(
            out,
            "  Column {} (index {}): Header='{}' Value='{}'",
            col + 1,
            col,
            header,
            value
        )?;
    }
    Ok(())
}

/// Resolve each probe against the first `limit` rows.
///
/// A probe matches the first row whose first populated cell contains its
/// label; the value is read from the probe's column on that row.
pub fn probe_preamble(
    grid: &Grid,
    probes: &[PreambleProbe],
    limit: usize,
) -> Vec<(String, CellValue)> {
    probes
        .iter()
        .map(|probe| {
            let col = probe.value_column.saturating_sub(1);
            let value = (0..limit.min(grid.height()))
                .find(|&row| {
                    grid.first_populated(row)
                        .is_some_and(|(_, cell)| cell.to_string().contains(&probe.label))
                })
                .map(|row| grid.cell(row, col).clone())
                .unwrap_or_default();
            (probe.name.clone(), value)
        })
        .collect()
}

pub fn render_preamble<W: Write>(out: &mut W, values: &[(String, CellValue)]) -> io::Result<()> {
    for (name, value) in values {
        if value.is_absent() {
            writeln!(out, "{}: (not found)", name)?;
        } else {
            writeln!(out, "{}: {}", name, value)?;
        }
    }
    Ok(())
}

/// Records as `label: value` blocks with labels padded to a common width.
pub fn render_records_text<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    let width = records
        .iter()
        .flat_map(|r| r.fields.iter().map(|(label, _)| label.chars().count()))
        .max()
        .unwrap_or(0);

    for record in records {
        writeln!(out, "Row {}:", record.row + 1)?;
        for (label, value) in &record.fields {
            if value.is_absent() {
                writeln!(out, "  {:<width$}  -", label, width = width)?;
            } else {
                writeln!(out, "  {:<width$}  {}", label, value, width = width)?;
            }
        }
    }
    Ok(())
}

/// Records as a pretty JSON array; absent values are `null`.
pub fn render_records_json<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
