// ============================================================
// Layer 6 — Conversion Statistics
// ============================================================
// Summarises a converted feature set and records one CSV row
// per conversion run.
//
// Statistics recorded per run:
//   - task, split:   which data was converted
//   - examples:      rows turned into examples
//   - features:      feature records written
//   - at_max_length: records whose real tokens fill max_length
//                    (the tokenizer most likely truncated them)
//   - mean_tokens:   mean number of real (attended) tokens
//   - label_counts:  records per class index as `index:count`
//                    pairs joined by `;` (empty for regression)
//
// Output file: {output_dir}/conversion_log.csv
//
// Example CSV output:
//   task,split,examples,features,max_length,at_max_length,mean_tokens,label_counts
//   mrpc,train,3668,3668,128,12,52.310000,0:1194;1:2474
//   sts-b,dev,1500,1500,128,0,31.020000,
//
// How to read it:
//   - a high at_max_length share means max_length is too short
//   - mean_tokens far below max_length means wasted padding

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::feature::{InputFeatures, Label};
use crate::domain::task::{Split, Task};

/// Summary of one converted feature set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub task:          Task,
    pub split:         Split,
    pub examples:      usize,
    pub features:      usize,
    pub max_length:    usize,
    pub at_max_length: usize,
    pub mean_tokens:   f64,
    /// Record count per class index; empty for regression
    pub label_counts:  BTreeMap<usize, usize>,
}

impl ConversionStats {
    /// Compute statistics from converted features.
    /// `real_token_mask` is the attention-mask value of real tokens.
    pub fn compute(
        task:            Task,
        split:           Split,
        examples:        usize,
        features:        &[InputFeatures],
        max_length:      usize,
        real_token_mask: u32,
    ) -> Self {
        let mut label_counts = BTreeMap::new();
        let mut at_max_length = 0usize;
        let mut total_tokens  = 0usize;

        for f in features {
            let real = f.real_len(real_token_mask);
            total_tokens += real;
            if real == max_length {
                at_max_length += 1;
            }
            if let Label::Class(i) = f.label {
                *label_counts.entry(i).or_insert(0) += 1;
            }
        }

        let mean_tokens = if features.is_empty() {
            0.0
        } else {
            total_tokens as f64 / features.len() as f64
        };

        Self {
            task,
            split,
            examples,
            features: features.len(),
            max_length,
            at_max_length,
            mean_tokens,
            label_counts,
        }
    }

    /// `label_counts` as `0:12;1:30`, the form written to the CSV
    pub fn label_counts_field(&self) -> String {
        self.label_counts
            .iter()
            .map(|(label, count)| format!("{label}:{count}"))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Share of records that filled max_length, in [0.0, 1.0]
    pub fn truncation_rate(&self) -> f64 {
        if self.features == 0 {
            return 0.0;
        }
        self.at_max_length as f64 / self.features as f64
    }
}

const CSV_FILE: &str = "conversion_log.csv";

const CSV_HEADER: [&str; 8] = [
    "task",
    "split",
    "examples",
    "features",
    "max_length",
    "at_max_length",
    "mean_tokens",
    "label_counts",
];

/// Appends conversion statistics to a CSV file.
pub struct StatsLogger {
    csv_path: PathBuf,
}

impl StatsLogger {
    /// Create a new StatsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join(CSV_FILE);
        if !csv_path.exists() {
            let mut w = csv::Writer::from_path(&csv_path)?;
            w.write_record(CSV_HEADER)?;
            w.flush()?;
            tracing::debug!("Created stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one run as a new row.
    pub fn log(&self, s: &ConversionStats) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;
        let mut w = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        w.write_record([
            s.task.to_string(),
            s.split.to_string(),
            s.examples.to_string(),
            s.features.to_string(),
            s.max_length.to_string(),
            s.at_max_length.to_string(),
            format!("{:.6}", s.mean_tokens),
            s.label_counts_field(),
        ])?;
        w.flush()?;

        tracing::debug!(
            "Logged {} {} stats: {} features, mean_tokens={:.2}",
            s.task,
            s.split,
            s.features,
            s.mean_tokens,
        );
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn feature(mask: Vec<u32>, label: Label) -> InputFeatures {
        let n = mask.len();
        InputFeatures {
            input_ids:      vec![1; n],
            attention_mask: mask,
            token_type_ids: vec![0; n],
            label,
        }
    }

    #[test]
    fn test_compute_stats() {
        let features = vec![
            feature(vec![1, 1, 1, 1], Label::Class(1)),
            feature(vec![1, 1, 0, 0], Label::Class(0)),
            feature(vec![1, 1, 1, 0], Label::Class(1)),
        ];
        let s = ConversionStats::compute(Task::Mrpc, Split::Train, 3, &features, 4, 1);
        assert_eq!(s.features, 3);
        assert_eq!(s.at_max_length, 1);
        assert!((s.mean_tokens - 3.0).abs() < 1e-9);
        assert_eq!(s.label_counts.get(&1), Some(&2));
        assert_eq!(s.label_counts.get(&0), Some(&1));
        assert!((s.truncation_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_has_no_label_counts() {
        let features = vec![feature(vec![1, 0], Label::Score(1.5))];
        let s = ConversionStats::compute(Task::Stsb, Split::Dev, 1, &features, 2, 1);
        assert!(s.label_counts.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let s = ConversionStats::compute(Task::Cola, Split::Dev, 0, &[], 8, 1);
        assert_eq!(s.mean_tokens, 0.0);
        assert_eq!(s.truncation_rate(), 0.0);
    }

    #[test]
    fn test_logger_appends_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = StatsLogger::new(dir.path()).unwrap();
        let features = vec![
            feature(vec![1, 1, 0, 0], Label::Class(1)),
            feature(vec![1, 1, 1, 1], Label::Class(0)),
            feature(vec![1, 0, 0, 0], Label::Class(1)),
        ];
        let s = ConversionStats::compute(Task::Rte, Split::Train, 3, &features, 4, 1);
        logger.log(&s).unwrap();
        logger.log(&s).unwrap();

        let text  = fs::read_to_string(dir.path().join("conversion_log.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "task,split,examples,features,max_length,at_max_length,mean_tokens,label_counts"
        );
        assert_eq!(lines[1], "rte,train,3,3,4,1,2.333333,0:1;1:2");
        assert_eq!(lines[2], lines[1]);
    }

    #[test]
    fn test_regression_row_has_empty_label_counts() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = StatsLogger::new(dir.path()).unwrap();
        let s = ConversionStats::compute(
            Task::Stsb, Split::Dev, 1, &[feature(vec![1, 0], Label::Score(2.5))], 2, 1,
        );
        logger.log(&s).unwrap();

        let text = fs::read_to_string(dir.path().join("conversion_log.csv")).unwrap();
        assert_eq!(text.lines().nth(1), Some("sts-b,dev,1,1,2,0,1.000000,"));
    }
}
