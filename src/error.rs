//! Error types for loading a grid and resolving its header.

use std::path::PathBuf;

/// Everything that can stop a mapping run.
///
/// `HeaderNotFound` is the only recoverable kind: callers that have a
/// fallback row never see it. Reads outside the grid are not errors at all.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// The workbook could not be opened or decoded.
    #[error("cannot load workbook {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The workbook opened but contains no worksheets.
    #[error("workbook {} has no worksheets", path.display())]
    NoWorksheet { path: PathBuf },

    /// A sheet was requested by name and does not exist.
    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// No row within the search limit starts with one of the labels.
    #[error("no header row starting with any of {labels:?} within the first {limit} rows")]
    HeaderNotFound { labels: Vec<String>, limit: usize },

    /// A 1-based row or column option was given as zero.
    #[error("{option} is 1-based and must be at least 1")]
    ZeroPosition { option: String },

    /// The config file exists but cannot be read.
    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for `MapperConfig`.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MapperError>;
