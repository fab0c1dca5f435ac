// ============================================================
// Layer 4 — Task Processors
// ============================================================
// Maps raw rows into InputExamples, one column layout per task.
//
// Two sources are supported:
//
//   GlueProcessor   — the task's own data directory
//                     (train.tsv / dev.tsv, train.csv, train.jsonl ...)
//
//   RecordProcessor — a JSON-lines file of named-field records,
//                     as exported from dataset hubs, e.g.
//                     {"idx": 3, "sentence1": "...", "sentence2": "...", "label": 1}
//                     Integer labels are mapped back to label strings
//                     through the task's label list.
//
// Column layouts (0-based, "last" = final column):
//
//   task            header  guid          text_a  text_b  label
//   cola            no      row index     3       -       1
//   mnli / mnli-mm  yes     column 0      8       9       last
//   mrpc            yes     row index     3       4       0
//   sst-2           yes     row index     0       -       1
//   sts-b           yes     column 0      7       8       last
//   qqp             yes     column 0      3       4       5   (short rows skipped)
//   qnli/rte/wnli   yes     column 0      1       2       last
//   emoji (csv)     yes     row index     1       -       0

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;

use crate::data::reader::{read_csv, read_jsonl, read_tsv};
use crate::domain::error::GlueError;
use crate::domain::example::InputExample;
use crate::domain::task::{FileFormat, Split, Task};
use crate::domain::traits::ExampleSource;

// ─── Row Layouts ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum GuidSource {
    /// Position of the row in the file (header included)
    RowIndex,
    /// Value of the first column
    FirstColumn,
}

#[derive(Debug, Clone, Copy)]
enum LabelColumn {
    At(usize),
    Last,
}

#[derive(Debug, Clone, Copy)]
struct RowLayout {
    skip_header:     bool,
    guid:            GuidSource,
    text_a:          usize,
    text_b:          Option<usize>,
    label:           LabelColumn,
    skip_short_rows: bool,
}

impl RowLayout {
    const fn new(
        skip_header: bool,
        guid:        GuidSource,
        text_a:      usize,
        text_b:      Option<usize>,
        label:       LabelColumn,
    ) -> Self {
        Self { skip_header, guid, text_a, text_b, label, skip_short_rows: false }
    }

    /// Minimum number of columns a row needs
    fn width(&self) -> usize {
        let label = match self.label {
            LabelColumn::At(i) => i,
            LabelColumn::Last  => 0,
        };
        self.text_a.max(self.text_b.unwrap_or(0)).max(label) + 1
    }
}

fn layout(task: Task) -> RowLayout {
    use GuidSource::*;
    use LabelColumn::*;

    match task {
        Task::Cola => RowLayout::new(false, RowIndex, 3, None, At(1)),
        Task::Mnli | Task::MnliMismatched => RowLayout::new(true, FirstColumn, 8, Some(9), Last),
        Task::Mrpc => RowLayout::new(true, RowIndex, 3, Some(4), At(0)),
        Task::Sst2 => RowLayout::new(true, RowIndex, 0, None, At(1)),
        Task::Stsb => RowLayout::new(true, FirstColumn, 7, Some(8), Last),
        Task::Qqp => RowLayout {
            skip_short_rows: true,
            ..RowLayout::new(true, FirstColumn, 3, Some(4), At(5))
        },
        Task::Qnli | Task::Rte | Task::Wnli => RowLayout::new(true, FirstColumn, 1, Some(2), Last),
        Task::Emoji => RowLayout::new(true, RowIndex, 1, None, At(0)),
        // JSONL, handled by create_examples_from_jsonl
        Task::Boolq => RowLayout::new(false, RowIndex, 0, None, At(0)),
    }
}

// ─── GlueProcessor ────────────────────────────────────────────────────────────
/// Reads a task's examples from its raw data directory.
pub struct GlueProcessor {
    task:     Task,
    data_dir: PathBuf,
}

impl GlueProcessor {
    pub fn new(task: Task, data_dir: impl Into<PathBuf>) -> Self {
        Self { task, data_dir: data_dir.into() }
    }

    /// Full path of the raw file for `split`
    pub fn file_path(&self, split: Split) -> PathBuf {
        self.data_dir.join(self.task.file_name(split))
    }

    /// Turn TSV/CSV rows into examples according to the task's layout.
    pub fn create_examples(
        &self,
        rows:  &[Vec<String>],
        split: Split,
        file:  &str,
    ) -> Result<Vec<InputExample>> {
        let layout   = layout(self.task);
        let set_type = self.task.guid_prefix(split);
        let width    = layout.width();
        let mut examples = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            if i == 0 && layout.skip_header {
                continue;
            }

            if row.len() < width {
                if layout.skip_short_rows {
                    tracing::debug!("Skipping short row {} of {}", i, file);
                    continue;
                }
                return Err(GlueError::ShortRow {
                    file:   file.to_string(),
                    row:    i,
                    found:  row.len(),
                    needed: width,
                }
                .into());
            }

            let id = match layout.guid {
                GuidSource::RowIndex    => i.to_string(),
                GuidSource::FirstColumn => row[0].clone(),
            };
            let label = match layout.label {
                LabelColumn::At(c) => row[c].clone(),
                LabelColumn::Last  => row[row.len() - 1].clone(),
            };

            examples.push(InputExample::new(
                format!("{set_type}-{id}"),
                row[layout.text_a].clone(),
                layout.text_b.map(|c| row[c].clone()),
                label,
            ));
        }

        Ok(examples)
    }

    /// Turn BoolQ-style JSON records (`idx`, `passage`, `question`, `label`)
    /// into examples. Every line is data; JSONL files carry no header.
    pub fn create_examples_from_jsonl(
        &self,
        records: &[Value],
        split:   Split,
        file:    &str,
    ) -> Result<Vec<InputExample>> {
        let set_type = self.task.guid_prefix(split);
        let (a_field, b_field) = record_fields(self.task);

        records
            .iter()
            .enumerate()
            .map(|(row, rec)| {
                let idx    = require(rec, "idx", file, row)?;
                let text_a = require(rec, a_field, file, row)?;
                let text_b = b_field
                    .map(|f| require(rec, f, file, row))
                    .transpose()?;
                let label  = require(rec, "label", file, row)?;

                Ok(InputExample::new(
                    format!("{set_type}-{}", value_text(idx)),
                    value_text(text_a),
                    text_b.map(value_text),
                    value_text(label),
                ))
            })
            .collect()
    }
}

impl ExampleSource for GlueProcessor {
    fn load(&self, split: Split) -> Result<Vec<InputExample>> {
        let path = self.file_path(split);
        let file = path.display().to_string();
        tracing::info!("Loading {} {} examples from '{}'", self.task, split, file);

        let examples = match self.task.file_format() {
            FileFormat::Tsv   => self.create_examples(&read_tsv(&path)?, split, &file)?,
            FileFormat::Csv   => self.create_examples(&read_csv(&path)?, split, &file)?,
            FileFormat::Jsonl => self.create_examples_from_jsonl(&read_jsonl(&path)?, split, &file)?,
        };

        tracing::info!("Loaded {} examples", examples.len());
        Ok(examples)
    }
}

// ─── RecordProcessor ──────────────────────────────────────────────────────────
/// Reads examples from a JSON-lines file of named-field records.
pub struct RecordProcessor {
    task: Task,
    path: PathBuf,
}

impl RecordProcessor {
    pub fn new(task: Task, path: impl Into<PathBuf>) -> Self {
        Self { task, path: path.into() }
    }

    /// Build one example from a record. The guid is the record's `idx`
    /// when present, otherwise `{set_type}-{row}`.
    pub fn example_from_record(
        &self,
        rec:   &Value,
        row:   usize,
        split: Split,
        file:  &str,
    ) -> Result<InputExample> {
        let (a_field, b_field) = record_fields(self.task);

        let guid = match rec.get("idx") {
            Some(idx) => value_text(idx),
            None      => format!("{}-{}", self.task.guid_prefix(split), row),
        };
        let text_a = value_text(require(rec, a_field, file, row)?);
        let text_b = b_field
            .map(|f| require(rec, f, file, row).map(value_text))
            .transpose()?;
        let label = self.map_label(require(rec, "label", file, row)?)?;

        Ok(InputExample::new(guid, text_a, text_b, label))
    }

    /// Integer labels index into the task's label list when it has more
    /// than one entry; anything else is kept as text.
    fn map_label(&self, value: &Value) -> Result<String> {
        let labels = self.task.labels();
        if labels.len() <= 1 {
            return Ok(value_text(value));
        }

        let index = match value {
            Value::Bool(b)   => Some(usize::from(*b)),
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        };

        match index {
            Some(i) => labels
                .get(i)
                .map(|l| l.to_string())
                .ok_or_else(|| {
                    GlueError::LabelIndexOutOfRange { index: i, num_labels: labels.len() }.into()
                }),
            // Already a label string, e.g. "entailment"
            None => Ok(value_text(value)),
        }
    }
}

impl ExampleSource for RecordProcessor {
    fn load(&self, split: Split) -> Result<Vec<InputExample>> {
        let file = self.path.display().to_string();
        tracing::info!("Loading {} records from '{}'", self.task, file);

        let examples = read_jsonl(Path::new(&self.path))?
            .iter()
            .enumerate()
            .map(|(row, rec)| self.example_from_record(rec, row, split, &file))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded {} examples", examples.len());
        Ok(examples)
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Named fields holding text_a and text_b for each task
fn record_fields(task: Task) -> (&'static str, Option<&'static str>) {
    match task {
        Task::Cola | Task::Sst2 => ("sentence", None),
        Task::Mnli | Task::MnliMismatched => ("premise", Some("hypothesis")),
        Task::Mrpc | Task::Stsb | Task::Rte | Task::Wnli => ("sentence1", Some("sentence2")),
        Task::Qqp => ("question1", Some("question2")),
        Task::Qnli => ("question", Some("sentence")),
        Task::Boolq => ("passage", Some("question")),
        Task::Emoji => ("passage", None),
    }
}

fn require<'a>(rec: &'a Value, field: &str, file: &str, row: usize) -> Result<&'a Value> {
    rec.get(field).ok_or_else(|| {
        GlueError::MissingField {
            file:  file.to_string(),
            row,
            field: field.to_string(),
        }
        .into()
    })
}

/// Text form of a JSON value: strings unquoted, booleans as True/False
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true)  => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn glue_error(err: &anyhow::Error) -> &GlueError {
        err.downcast_ref::<GlueError>().expect("expected a GlueError")
    }

    #[test]
    fn test_mrpc_layout() {
        let p = GlueProcessor::new(Task::Mrpc, "unused");
        let data = rows(&[
            &["Quality", "#1 ID", "#2 ID", "#1 String", "#2 String"],
            &["1", "702876", "702977", "He said.", "She said."],
        ]);
        let ex = p.create_examples(&data, Split::Train, "train.tsv").unwrap();
        assert_eq!(ex.len(), 1);
        assert_eq!(ex[0].guid, "train-1");
        assert_eq!(ex[0].text_a, "He said.");
        assert_eq!(ex[0].text_b.as_deref(), Some("She said."));
        assert_eq!(ex[0].label, "1");
    }

    #[test]
    fn test_cola_has_no_header() {
        let p = GlueProcessor::new(Task::Cola, "unused");
        let data = rows(&[
            &["gj04", "1", "", "Our friends won't buy this analysis."],
            &["gj04", "0", "*", "They drank the pub."],
        ]);
        let ex = p.create_examples(&data, Split::Dev, "dev.tsv").unwrap();
        assert_eq!(ex.len(), 2);
        assert_eq!(ex[0].guid, "dev-0");
        assert_eq!(ex[1].label, "0");
        assert!(ex[1].text_b.is_none());
    }

    #[test]
    fn test_mnli_uses_last_column_and_id_guid() {
        let p = GlueProcessor::new(Task::Mnli, "unused");
        let mut header = vec!["index"; 12];
        header[11] = "gold_label";
        let data = rows(&[
            &header[..],
            &["42", "a", "b", "c", "d", "e", "f", "g", "premise", "hypothesis", "neutral", "entailment"],
        ]);
        let ex = p.create_examples(&data, Split::Dev, "dev_matched.tsv").unwrap();
        assert_eq!(ex[0].guid, "dev_matched-42");
        assert_eq!(ex[0].text_a, "premise");
        assert_eq!(ex[0].text_b.as_deref(), Some("hypothesis"));
        assert_eq!(ex[0].label, "entailment");
    }

    #[test]
    fn test_mnli_mismatched_guid_prefix() {
        let p = GlueProcessor::new(Task::MnliMismatched, "unused");
        let row: Vec<&str> = vec!["7", "", "", "", "", "", "", "", "p", "h", "neutral"];
        let data = rows(&[&row[..], &row[..]]);
        let ex = p.create_examples(&data, Split::Dev, "dev_mismatched.tsv").unwrap();
        assert_eq!(ex[0].guid, "dev_mismatched-7");
    }

    #[test]
    fn test_qqp_skips_short_rows() {
        let p = GlueProcessor::new(Task::Qqp, "unused");
        let data = rows(&[
            &["id", "qid1", "qid2", "question1", "question2", "is_duplicate"],
            &["1", "1", "2", "How?", "Why?", "0"],
            &["2", "3", "4", "Broken row"],
            &["3", "5", "6", "What?", "Who?", "1"],
        ]);
        let ex = p.create_examples(&data, Split::Train, "train.tsv").unwrap();
        assert_eq!(ex.len(), 2);
        assert_eq!(ex[1].guid, "train-3");
        assert_eq!(ex[1].label, "1");
    }

    #[test]
    fn test_short_row_is_an_error_elsewhere() {
        let p = GlueProcessor::new(Task::Rte, "unused");
        let data = rows(&[&["index", "sentence1", "sentence2", "label"], &["0", "only one"]]);
        let err = p.create_examples(&data, Split::Train, "train.tsv").unwrap_err();
        assert_eq!(
            glue_error(&err),
            &GlueError::ShortRow { file: "train.tsv".into(), row: 1, found: 2, needed: 3 }
        );
    }

    #[test]
    fn test_sst2_single_sentence() {
        let p = GlueProcessor::new(Task::Sst2, "unused");
        let data = rows(&[&["sentence", "label"], &["a gorgeous film ", "1"]]);
        let ex = p.create_examples(&data, Split::Train, "train.tsv").unwrap();
        assert_eq!(ex[0].text_a, "a gorgeous film ");
        assert_eq!(ex[0].text_b, None);
    }

    #[test]
    fn test_stsb_score_label() {
        let p = GlueProcessor::new(Task::Stsb, "unused");
        let header: Vec<&str> = vec!["index"; 10];
        let data = rows(&[
            &header[..],
            &["0", "g", "f", "y", "i", "s", "s", "A plane.", "An air plane.", "5.000"],
        ]);
        let ex = p.create_examples(&data, Split::Train, "train.tsv").unwrap();
        assert_eq!(ex[0].label, "5.000");
        assert_eq!(ex[0].text_b.as_deref(), Some("An air plane."));
    }

    #[test]
    fn test_emoji_csv_layout() {
        let p = GlueProcessor::new(Task::Emoji, "unused");
        let data = rows(&[&["label", "text"], &[":fire:", "so hot today"]]);
        let ex = p.create_examples(&data, Split::Dev, "val.csv").unwrap();
        assert_eq!(ex[0].guid, "dev-1");
        assert_eq!(ex[0].label, ":fire:");
        assert_eq!(ex[0].text_a, "so hot today");
    }

    #[test]
    fn test_boolq_keeps_first_line_and_maps_bools() {
        let p = GlueProcessor::new(Task::Boolq, "unused");
        let records = vec![
            json!({"idx": 0, "passage": "Water boils.", "question": "does water boil", "label": true}),
            json!({"idx": 1, "passage": "Ice is cold.", "question": "is ice hot", "label": false}),
        ];
        let ex = p
            .create_examples_from_jsonl(&records, Split::Dev, "val.jsonl")
            .unwrap();
        assert_eq!(ex.len(), 2);
        assert_eq!(ex[0].guid, "val-0");
        assert_eq!(ex[0].label, "True");
        assert_eq!(ex[1].label, "False");
        assert_eq!(ex[1].text_b.as_deref(), Some("is ice hot"));
    }

    #[test]
    fn test_boolq_missing_field() {
        let p = GlueProcessor::new(Task::Boolq, "unused");
        let records = vec![json!({"idx": 0, "passage": "x", "label": true})];
        let err = p
            .create_examples_from_jsonl(&records, Split::Train, "train.jsonl")
            .unwrap_err();
        assert!(matches!(
            glue_error(&err),
            GlueError::MissingField { field, .. } if field == "question"
        ));
    }

    #[test]
    fn test_load_reads_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dev.tsv"),
            "index\tsentence1\tsentence2\tlabel\n0\tA man.\tA person.\tentailment\n",
        )
        .unwrap();
        let p  = GlueProcessor::new(Task::Rte, dir.path());
        let ex = p.load(Split::Dev).unwrap();
        assert_eq!(ex.len(), 1);
        assert_eq!(ex[0].guid, "dev-0");
        assert_eq!(ex[0].label, "entailment");
    }

    #[test]
    fn test_record_label_index_is_mapped() {
        let p   = RecordProcessor::new(Task::Qnli, "unused");
        let rec = json!({"idx": 9, "question": "Who?", "sentence": "Me.", "label": 1});
        let ex  = p.example_from_record(&rec, 0, Split::Train, "records.jsonl").unwrap();
        assert_eq!(ex.guid, "9");
        assert_eq!(ex.label, "not_entailment");
    }

    #[test]
    fn test_record_regression_label_is_kept() {
        let p   = RecordProcessor::new(Task::Stsb, "unused");
        let rec = json!({"sentence1": "a", "sentence2": "b", "label": 3.8});
        let ex  = p.example_from_record(&rec, 4, Split::Dev, "records.jsonl").unwrap();
        assert_eq!(ex.guid, "dev-4");
        assert_eq!(ex.label, "3.8");
    }

    #[test]
    fn test_record_label_index_out_of_range() {
        let p   = RecordProcessor::new(Task::Cola, "unused");
        let rec = json!({"idx": 0, "sentence": "x", "label": 7});
        let err = p.example_from_record(&rec, 0, Split::Train, "r.jsonl").unwrap_err();
        assert_eq!(
            glue_error(&err),
            &GlueError::LabelIndexOutOfRange { index: 7, num_labels: 2 }
        );
    }
}
