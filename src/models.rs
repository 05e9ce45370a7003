use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Shared absent marker for lookups that miss.
pub(crate) static ABSENT: CellValue = CellValue::Absent;

/// One cell of a loaded sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty, error, or outside the sheet
    #[default]
    Absent,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Absent, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Absent => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Display text, or `None` when the cell is blank.
    pub fn text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // f64 Display drops the trailing ".0" of integral values
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Header label to column index, derived from one header row.
///
/// Labels are stored trimmed. When a label occurs more than once in the
/// header row the last occurrence wins; this is a deliberate simplification
/// so that a single label always resolves to a single column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    columns: HashMap<String, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a label. Returns the column it replaced, if any.
    pub fn insert(&mut self, label: impl Into<String>, column: usize) -> Option<usize> {
        self.columns.insert(label.into(), column)
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.columns.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Entries ordered by column index.
    pub fn entries(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .columns
            .iter()
            .map(|(label, col)| (label.as_str(), *col))
            .collect();
        entries.sort_by_key(|(_, col)| *col);
        entries
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (label, col) in entries {
            map.serialize_entry(label, &col)?;
        }
        map.end()
    }
}

/// One data row projected through a `FieldMap`, fields in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 0-based source row
    pub row: usize,
    pub fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Value of `label`, or absent when the label is not in the header.
    pub fn get(&self, label: &str) -> &CellValue {
        self.fields
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
            .unwrap_or(&ABSENT)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == label)
    }

    /// True when every field is absent.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_absent())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// A label/value lookup in the block above the header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreambleProbe {
    /// Name printed in the output
    pub name: String,
    /// Fragment the row's first populated cell must contain
    pub label: String,
    /// 1-based column holding the value
    pub value_column: usize,
}
