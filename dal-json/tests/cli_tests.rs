#![allow(clippy::unwrap_used)]
//! End-to-end tests: `JsonExport` driven through `dal_helper::run_from`.

use std::cell::Cell;
use std::fs;

use dal_helper::{DalError, MainConfig, Runner, Sources, run_from};
use dal_json::JsonExport;
use tempfile::TempDir;

type Open = fn(Sources) -> anyhow::Result<JsonExport>;

fn run(runner: Runner<'_, Open>, args: &[&str]) -> (Result<(), DalError>, String) {
    let mut out = Vec::new();
    let argv = std::iter::once("dal-json").chain(args.iter().copied());
    let result = run_from(argv, &MainConfig::default(), runner, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_glob_over_exports() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("2024-01.json"), r#"[{"id": 1}, {"id": 2}]"#).unwrap();
    fs::write(tmp.path().join("2024-02.json"), r#"[{"id": 3}]"#).unwrap();
    let pattern = format!("{}/*.json", tmp.path().display());

    let records = Cell::new(0);
    let runner = Runner::new(JsonExport::open as Open).demo(
        |export: &JsonExport| -> anyhow::Result<()> {
            records.set(export.len());
            Ok(())
        },
    );
    let (result, out) = run(runner, &["--source", &pattern]);

    result.unwrap();
    assert_eq!(out, "JsonExport(2 sources, 3 records)\n");
    assert_eq!(records.get(), 3);
}

#[test]
fn test_malformed_export_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.path().join("broken.json");
    fs::write(&bad, "[{").unwrap();

    let runner = Runner::new(JsonExport::open as Open).demo(dal_json::demo);
    let (result, out) = run(runner, &["--source", bad.to_str().unwrap()]);

    let err = result.unwrap_err();
    assert!(matches!(err, DalError::Construction(_)), "got: {err}");
    assert!(err.to_string().contains("broken.json"), "got: {err}");
    assert!(out.is_empty());
}

#[test]
fn test_literal_wildcard_path_is_not_expanded() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.json"), "[]").unwrap();
    let pattern = format!("{}/*.json", tmp.path().display());

    let runner = Runner::new(JsonExport::open as Open).demo(dal_json::demo);
    let (result, _) = run(runner, &["--source", &pattern, "--no-glob"]);

    // The literal path "<dir>/*.json" does not exist.
    let err = result.unwrap_err();
    assert!(matches!(err, DalError::Construction(_)), "got: {err}");
}
