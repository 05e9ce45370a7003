use crate::error::{MapperError, Result};
use crate::mapper::{HeaderOptions, DEFAULT_HEADER_LABELS, DEFAULT_SEARCH_LIMIT};
use crate::models::PreambleProbe;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "po-grid";

/// Recognised options for one mapping run.
///
/// Row and column numbers here are 1-based, as shown by spreadsheet tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Sheet to load; the first sheet when unset
    pub sheet: Option<String>,
    /// Fragments matched against the first populated cell of each row
    pub header_labels: Vec<String>,
    /// How many rows from the top are searched
    pub search_limit: usize,
    /// Skip the search and use this row
    pub header_row: Option<usize>,
    /// Row used when the search finds nothing
    pub fallback_header_row: Option<usize>,
    /// First data row; the row below the header when unset
    pub data_start: Option<usize>,
    /// Last data row, inclusive; the last sheet row when unset
    pub data_end: Option<usize>,
    /// Label/value lookups above the header
    pub preamble: Vec<PreambleProbe>,
    pub dump_rows: usize,
    pub dump_cols: usize,
    pub truncate: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            header_labels: DEFAULT_HEADER_LABELS.iter().map(|s| s.to_string()).collect(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            header_row: None,
            fallback_header_row: None,
            data_start: None,
            data_end: None,
            preamble: Vec::new(),
            dump_rows: 20,
            dump_cols: 10,
            truncate: 30,
        }
    }
}

impl MapperConfig {
    /// Reject zero where a 1-based position is expected.
    pub fn validate(&self) -> Result<()> {
        let positions = [
            ("header_row", self.header_row),
            ("fallback_header_row", self.fallback_header_row),
            ("data_start", self.data_start),
            ("data_end", self.data_end),
        ];
        for (option, value) in positions {
            if value == Some(0) {
                return Err(MapperError::ZeroPosition {
                    option: option.to_string(),
                });
            }
        }
        for probe in &self.preamble {
            if probe.value_column == 0 {
                return Err(MapperError::ZeroPosition {
                    option: format!("preamble '{}' value_column", probe.name),
                });
            }
        }
        Ok(())
    }

    /// Header search inputs, converted to 0-based rows.
    pub fn header_options(&self) -> HeaderOptions {
        HeaderOptions {
            labels: self.header_labels.clone(),
            search_limit: self.search_limit,
            header_row: self.header_row.and_then(to_index),
            fallback_row: self.fallback_header_row.and_then(to_index),
        }
    }

    /// 0-based data row bounds, `None` meaning "use the default".
    pub fn data_rows(&self) -> (Option<usize>, Option<usize>) {
        (
            self.data_start.and_then(to_index),
            self.data_end.and_then(to_index),
        )
    }
}

/// 1-based position to 0-based index.
pub fn to_index(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

/// Default config location under the user's config directory
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Load the config at `path`, or the default location when `path` is `None`.
///
/// A missing default file gives the defaults; a missing explicit file or a
/// malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<MapperConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !explicit && !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(MapperConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| MapperError::ConfigIo {
        path: path.clone(),
        source,
    })?;
    let config: MapperConfig =
        serde_json::from_str(&content).map_err(|source| MapperError::Config {
            path: path.clone(),
            source,
        })?;
    config.validate()?;

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Write `config` as pretty JSON, creating parent directories.
pub fn save_config(config: &MapperConfig, path: &Path) -> Result<()> {
    let io_err = |source| MapperError::ConfigIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|source| MapperError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(io_err)?;

    Ok(())
}
