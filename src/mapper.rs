use crate::error::{MapperError, Result};
use crate::grid::Grid;
use crate::models::{CellValue, FieldMap, Record};
use tracing::{debug, info, warn};

/// Header labels used when none are configured.
pub const DEFAULT_HEADER_LABELS: [&str; 3] = ["S.No", "S No", "Article"];

/// Rows scanned for a header when no limit is configured.
pub const DEFAULT_SEARCH_LIMIT: usize = 30;

/// First row within `search_limit` whose first populated cell contains one
/// of `candidate_labels` (case-sensitive substring match).
///
/// `None` is an ordinary outcome; callers decide whether to fall back.
pub fn locate_header_row<S: AsRef<str>>(
    grid: &Grid,
    candidate_labels: &[S],
    search_limit: usize,
) -> Option<usize> {
    let limit = search_limit.min(grid.height());

    for row in 0..limit {
        let Some((col, cell)) = grid.first_populated(row) else {
            continue;
        };
        let text = cell.to_string();
        for label in candidate_labels {
            let label: &str = label.as_ref();
            if text.contains(label) {
                debug!(row, col, label, "header row matched");
                return Some(row);
            }
        }
    }

    debug!(limit, "no header row within search limit");
    None
}

/// Every row within `search_limit` whose first populated cell matches one of
/// `candidate_labels`, top to bottom. The first entry is what
/// `locate_header_row` returns.
pub fn header_candidates<S: AsRef<str>>(
    grid: &Grid,
    candidate_labels: &[S],
    search_limit: usize,
) -> Vec<usize> {
    (0..search_limit.min(grid.height()))
        .filter(|&row| {
            grid.first_populated(row).is_some_and(|(_, cell)| {
                let text = cell.to_string();
                candidate_labels.iter().any(|label| {
                    let label: &str = label.as_ref();
                    text.contains(label)
                })
            })
        })
        .collect()
}

/// Label to column map built from every non-blank cell of `header_row`.
///
/// Labels are trimmed before insertion, so `"Rate"` and `" Rate "` are the
/// same label. A label that appears twice after trimming keeps the column
/// of its last occurrence.
pub fn build_field_map(grid: &Grid, header_row: usize) -> FieldMap {
    let mut map = FieldMap::new();

    for (col, cell) in grid.row(header_row).enumerate() {
        let Some(text) = cell.text() else {
            continue;
        };
        let label = text.trim();
        if let Some(previous) = map.insert(label, col) {
            debug!(label, previous, col, "duplicate header label, keeping later column");
        }
    }

    map
}

/// Read `row` through `field_map`. Blank cells become absent.
pub fn project_row(grid: &Grid, field_map: &FieldMap, row: usize) -> Record {
    let fields = field_map
        .entries()
        .into_iter()
        .map(|(label, col)| {
            let cell = grid.cell(row, col);
            let value = if cell.is_blank() {
                CellValue::Absent
            } else {
                cell.clone()
            };
            (label.to_string(), value)
        })
        .collect();

    Record { row, fields }
}

/// Records for rows `start_row..=end_row`.
///
/// Every call yields a fresh iterator from `start_row`; it is empty when
/// `start_row > end_row`.
pub fn project_rows<'a>(
    grid: &'a Grid,
    field_map: &'a FieldMap,
    start_row: usize,
    end_row: usize,
) -> impl Iterator<Item = Record> + 'a {
    (start_row..=end_row).map(move |row| project_row(grid, field_map, row))
}

/// How a header row was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    /// Given explicitly
    Override,
    /// Found by label search
    Located,
    /// Search failed, configured fallback used
    Fallback,
}

/// Inputs for resolving a header row. Rows are 0-based.
#[derive(Debug, Clone)]
pub struct HeaderOptions {
    pub labels: Vec<String>,
    pub search_limit: usize,
    pub header_row: Option<usize>,
    pub fallback_row: Option<usize>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            labels: DEFAULT_HEADER_LABELS.iter().map(|s| s.to_string()).collect(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            header_row: None,
            fallback_row: None,
        }
    }
}

/// Header row and field map of one grid, derived once and reused.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    pub row: usize,
    pub source: HeaderSource,
    pub fields: FieldMap,
}

impl HeaderLayout {
    /// Explicit row first, then label search, then the fallback row.
    pub fn resolve(grid: &Grid, options: &HeaderOptions) -> Result<Self> {
        let (row, source) = if let Some(row) = options.header_row {
            (row, HeaderSource::Override)
        } else if let Some(row) = locate_header_row(grid, &options.labels, options.search_limit) {
            (row, HeaderSource::Located)
        } else if let Some(row) = options.fallback_row {
            warn!(row, "header labels not found, using fallback row");
            (row, HeaderSource::Fallback)
        } else {
            return Err(MapperError::HeaderNotFound {
                labels: options.labels.clone(),
                limit: options.search_limit,
            });
        };

        let fields = build_field_map(grid, row);
        info!(row, ?source, fields = fields.len(), "header resolved");
        Ok(Self {
            row,
            source,
            fields,
        })
    }

    /// First data row: the one right below the header.
    pub fn first_data_row(&self) -> usize {
        self.row + 1
    }

    pub fn project(&self, grid: &Grid, row: usize) -> Record {
        project_row(grid, &self.fields, row)
    }

    /// Records from `start` (default: below the header) to `end` inclusive
    /// (default: last grid row).
    pub fn records<'a>(
        &'a self,
        grid: &'a Grid,
        start: Option<usize>,
        end: Option<usize>,
    ) -> impl Iterator<Item = Record> + 'a {
        let start = start.unwrap_or_else(|| self.first_data_row());
        let end = end.unwrap_or_else(|| grid.height().saturating_sub(1));
        project_rows(grid, &self.fields, start, end)
    }
}
