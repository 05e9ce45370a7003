//! Locate the header row of a semi-structured spreadsheet export and read
//! the rows below it by column label.
//!
//! A [`Grid`] is loaded once per file; [`HeaderLayout`] finds the header and
//! its [`FieldMap`] once, and every [`Record`] is projected through it on
//! demand.

pub mod config;
pub mod error;
pub mod grid;
pub mod inspect;
pub mod mapper;
pub mod models;

pub use config::{load_config, save_config, MapperConfig};
pub use error::{MapperError, Result};
pub use grid::Grid;
pub use mapper::{
    build_field_map, header_candidates, locate_header_row, project_row, project_rows,
    HeaderLayout, HeaderOptions, HeaderSource,
};
pub use models::{CellValue, FieldMap, PreambleProbe, Record};
