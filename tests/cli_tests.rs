//! The `po-grid` binary run against fixture workbooks.

mod fixtures;

use fixtures::{purchase_order, write_workbook};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Write `json` as a config file next to the workbook, so runs never read
/// the user's config directory.
fn config_file(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, json).unwrap();
    path
}

fn po_grid(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_po-grid"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn records_json(output: &Output) -> Vec<Value> {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    match serde_json::from_slice(&output.stdout).unwrap() {
        Value::Array(records) => records,
        other => panic!("expected a JSON array, got {other}"),
    }
}

#[test]
fn missing_workbook_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "{}");
    let missing = dir.path().join("missing.xlsx");

    let output = po_grid(&config, &["header", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn header_command_reports_located_row() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    let config = config_file(&dir, "{}");

    let output = po_grid(&config, &["header", path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Header Row 13 (Located):"), "{text}");
    assert!(text.contains("Column 2 (index 1): Article Id"));
}

#[test]
fn header_row_and_start_select_rows() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    let config = config_file(&dir, "{}");

    let output = po_grid(
        &config,
        &[
            "records",
            path.to_str().unwrap(),
            "--json",
            "--header-row",
            "13",
            "--start",
            "15",
            "--end",
            "15",
        ],
    );
    let records = records_json(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Article Id"], "A200");
    assert_eq!(records[0]["MRP (₹)"], 99.5);
}

#[test]
fn config_positions_are_used_without_flags() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    let config = config_file(
        &dir,
        r#"{ "header_row": 13, "data_start": 14, "data_end": 14 }"#,
    );

    let output = po_grid(&config, &["records", path.to_str().unwrap(), "--json"]);
    let records = records_json(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Article Id"], "A100");
}

#[test]
fn flags_override_config_values() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    // Row 6 is the "Issued To" line of the vendor block.
    let config = config_file(
        &dir,
        r#"{ "header_row": 6, "data_start": 7, "data_end": 7 }"#,
    );
    let file = path.to_str().unwrap();

    let from_config = records_json(&po_grid(&config, &["records", file, "--json"]));
    assert!(from_config[0].get("Article Id").is_none());

    let overridden = records_json(&po_grid(
        &config,
        &[
            "records",
            file,
            "--json",
            "--header-row",
            "13",
            "--start",
            "16",
            "--end",
            "16",
        ],
    ));
    assert_eq!(overridden.len(), 1);
    assert_eq!(overridden[0]["Article Id"], "A300");
    assert_eq!(overridden[0]["Article Name"], Value::Null);
}

#[test]
fn zero_start_is_rejected() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    let config = config_file(&dir, "{}");

    let output = po_grid(
        &config,
        &["records", path.to_str().unwrap(), "--start", "0"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("data_start"), "{stderr}");
}

#[test]
fn unknown_label_fails_unless_fallback_given() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    let config = config_file(&dir, "{}");
    let file = path.to_str().unwrap();

    let output = po_grid(&config, &["header", file, "--label", "Nope"]);
    assert!(!output.status.success());

    let output = po_grid(
        &config,
        &["header", file, "--label", "Nope", "--fallback-row", "13"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Header Row 13 (Fallback):"));
}

#[test]
fn inspect_lists_every_header_candidate() {
    let (dir, path) = write_workbook("po.xlsx", &[purchase_order()]);
    let config = config_file(&dir, r#"{ "header_labels": ["S.No", "Total"], "header_row": 13 }"#);

    let output = po_grid(&config, &["inspect", path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Found potential header at row 13:"), "{text}");
    assert!(text.contains("Found potential header at row 18:"), "{text}");
    assert!(text.contains("Configured header row: 13"));
}
