// ============================================================
// Layer 4 — Raw File Readers
// ============================================================
// Reads benchmark files into rows of strings (TSV/CSV) or
// JSON objects (JSONL). No task knowledge lives here — the
// processors decide which column means what.
//
// Formats:
//   TSV   — tab separated, quote characters are literal text
//           (GLUE sentences contain unbalanced quotes)
//   CSV   — comma separated, standard double-quote escaping
//   JSONL — one JSON object per line, blank lines ignored
//
// Rows are allowed to have different widths; short rows are
// reported by the processor that needs the missing column.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a tab-separated file without quote processing.
pub fn read_tsv(path: &Path) -> Result<Vec<Vec<String>>> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    collect_rows(reader, path)
}

/// Read a comma-separated file with standard quoting.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    collect_rows(reader, path)
}

fn collect_rows(mut reader: csv::Reader<fs::File>, path: &Path) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Malformed row {} in '{}'", i, path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!("Read {} rows from '{}'", rows.len(), path.display());
    Ok(rows)
}

/// Read a JSON-lines file. Each non-blank line must be a JSON object.
pub fn read_jsonl(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {} of '{}'", i + 1, path.display()))?;
        if !value.is_object() {
            anyhow::bail!(
                "Line {} of '{}' is not a JSON object",
                i + 1,
                path.display()
            );
        }
        records.push(value);
    }

    tracing::debug!("Read {} records from '{}'", records.len(), path.display());
    Ok(records)
}
