//! DAL over JSON export files.
//!
//! Each source file holds either a JSON array of records or a single record.
//! Records are expected to be objects; anything else is surfaced as an error
//! value by [`JsonExport::records`] instead of failing the whole load.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use dal_helper::{Json, Res, Sources};
use serde_json::Value;
use tracing::{debug, info};

/// Number of keys listed by [`demo`].
pub const TOP_KEYS: usize = 10;

/// All records from a set of JSON export files, in source order.
#[derive(Debug, Clone)]
pub struct JsonExport {
    sources: Vec<PathBuf>,
    values: Vec<Value>,
}

impl JsonExport {
    /// Load every file in `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the file if it cannot be read or is not valid JSON.
    pub fn new(paths: Vec<PathBuf>) -> anyhow::Result<Self> {
        let mut values = Vec::new();
        for path in &paths {
            let before = values.len();
            load_file(path, &mut values)?;
            debug!(path = %path.display(), records = values.len() - before, "loaded");
        }
        info!(sources = paths.len(), records = values.len(), "export loaded");
        Ok(Self {
            sources: paths,
            values,
        })
    }

    /// Factory for [`dal_helper::Runner`].
    ///
    /// # Errors
    ///
    /// See [`JsonExport::new`].
    pub fn open(sources: Sources) -> anyhow::Result<Self> {
        Self::new(sources.into_paths())
    }

    /// Files the export was loaded from.
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Number of records, including malformed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no records were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every record; non-object values are yielded as errors.
    pub fn records(&self) -> impl Iterator<Item = Res<&Json>> {
        self.values.iter().enumerate().map(|(i, value)| {
            value
                .as_object()
                .ok_or_else(|| anyhow!("record #{i} is not an object: {}", kind(value)))
        })
    }

    /// How many records carry each top-level key, most common first (ties by name).
    #[must_use]
    pub fn key_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in self.records().flatten() {
            for key in record.keys() {
                *counts.entry(key.as_str()).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(k, n)| (k.to_owned(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

impl fmt::Display for JsonExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JsonExport({} sources, {} records)",
            self.sources.len(),
            self.values.len()
        )
    }
}

fn load_file(path: &Path, values: &mut Vec<Value>) -> anyhow::Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;

    match value {
        Value::Array(items) => values.extend(items),
        other => values.push(other),
    }
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Write a short summary of the export: record counts and the most common keys.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary(export: &JsonExport, writer: &mut dyn std::io::Write) -> anyhow::Result<()> {
    let errors: Vec<anyhow::Error> = export.records().filter_map(Result::err).collect();

    writeln!(writer, "Records:  {}", export.len())?;
    writeln!(writer, "Invalid:  {}", errors.len())?;
    for e in &errors {
        writeln!(writer, "  {e}")?;
    }

    let counts = export.key_counts();
    if !counts.is_empty() {
        writeln!(writer, "Most common keys:")?;
        for (key, n) in counts.iter().take(TOP_KEYS) {
            writeln!(writer, "  {n:>6}  {key}")?;
        }
    }
    Ok(())
}

/// Demo run by the `dal-json` binary.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn demo(export: &JsonExport) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    write_summary(export, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_array_and_object_files() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.json", r#"[{"id": 1}, {"id": 2, "title": "x"}]"#);
        let b = write(tmp.path(), "b.json", r#"{"id": 3}"#);

        let export = JsonExport::new(vec![a, b]).unwrap();

        assert_eq!(export.len(), 3);
        assert_eq!(export.to_string(), "JsonExport(2 sources, 3 records)");
        assert_eq!(
            export.key_counts(),
            vec![("id".to_owned(), 3), ("title".to_owned(), 1)]
        );
    }

    #[test]
    fn test_non_object_records_are_error_values() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.json", r#"[{"id": 1}, 42, "text"]"#);

        let export = JsonExport::new(vec![a]).unwrap();
        let results: Vec<_> = export.records().collect();

        assert!(results[0].is_ok());
        let msg = results[1].as_ref().unwrap_err().to_string();
        assert_eq!(msg, "record #1 is not an object: number");
        assert!(results[2].is_err());
    }

    #[test]
    fn test_malformed_file_names_path() {
        let tmp = TempDir::new().unwrap();
        let bad = write(tmp.path(), "bad.json", "{not json");

        let err = JsonExport::new(vec![bad]).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("bad.json"), "got: {msg}");
    }

    #[test]
    fn test_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let err = JsonExport::new(vec![tmp.path().join("missing.json")]).unwrap_err();
        assert!(err.to_string().contains("missing.json"), "got: {err}");
    }

    #[test]
    fn test_empty_sources_is_empty_export() {
        let export = JsonExport::open(Sources::Multi(vec![])).unwrap();
        assert!(export.is_empty());
        assert!(export.sources().is_empty());
    }

    #[test]
    fn test_summary_lists_keys_and_invalid_records() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.json", r#"[{"id": 1, "at": 5}, {"id": 2}, null]"#);
        let export = JsonExport::new(vec![a]).unwrap();

        let mut out = Vec::new();
        write_summary(&export, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Records:  3"), "got: {out}");
        assert!(out.contains("Invalid:  1"), "got: {out}");
        assert!(out.contains("record #2 is not an object: null"), "got: {out}");
        assert!(out.contains("     2  id"), "got: {out}");
    }
}
