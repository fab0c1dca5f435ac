// ============================================================
// Layer 2 — ConvertUseCase
// ============================================================
// Orchestrates one conversion run in order:
//
//   Step 1: Resolve task, split, and conversion options
//   Step 2: Load examples                 (Layer 4 - data)
//   Step 3: Load the tokenizer            (Layer 6 - infra)
//   Step 4: Convert examples to features  (Layer 4 - data)
//   Step 5: Save features, metadata, and
//           this run's config             (Layer 6 - infra)
//   Step 6: Log conversion statistics     (Layer 6 - infra)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    features::{convert_examples_to_features, ConversionOptions},
    processors::{GlueProcessor, RecordProcessor},
};
use crate::domain::task::{OutputMode, Split, Task};
use crate::domain::traits::{ExampleSource, PairEncoder};
use crate::infra::{
    feature_store::{FeatureMeta, FeatureStore},
    metrics::{ConversionStats, StatsLogger},
    tokenizer_store::TokenizerStore,
};

// ─── Conversion Configuration ────────────────────────────────────────────────
// Everything one `convert` run needs. Serialisable so a run
// can be described in (and reproduced from) a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub task:                   String,
    pub split:                  String,
    pub data_dir:               String,
    /// Named-field JSONL records to read instead of `data_dir`
    pub records:                Option<String>,
    pub tokenizer:              String,
    pub output_dir:             String,
    pub max_length:             usize,
    /// Replaces the task's label list when set
    pub labels:                 Option<Vec<String>>,
    /// Replaces the task's output mode when set
    pub output_mode:            Option<String>,
    pub pad_on_left:            bool,
    pub pad_token:              u32,
    pub pad_token_segment_id:   u32,
    pub mask_padding_with_zero: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            task:                   "mrpc".to_string(),
            split:                  "train".to_string(),
            data_dir:               "glue_data/MRPC".to_string(),
            records:                None,
            tokenizer:              "tokenizer.json".to_string(),
            output_dir:             "features".to_string(),
            max_length:             512,
            labels:                 None,
            output_mode:            None,
            pad_on_left:            false,
            pad_token:              0,
            pad_token_segment_id:   0,
            mask_padding_with_zero: true,
        }
    }
}

impl ConvertConfig {
    /// Read a run description from a JSON file; missing keys take defaults.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config '{path}'"))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config '{path}'"))
    }

    /// Catalog options for the task, with this config's overrides applied.
    pub fn conversion_options(&self, task: Task) -> Result<ConversionOptions> {
        if self.max_length == 0 {
            anyhow::bail!("max_length must be at least 1");
        }

        let mut options = ConversionOptions::for_task(task, self.max_length);
        if let Some(labels) = &self.labels {
            options.label_list = labels.clone();
        }
        if let Some(mode) = &self.output_mode {
            options.output_mode = mode.parse::<OutputMode>()?;
        }
        options.pad_on_left            = self.pad_on_left;
        options.pad_token              = self.pad_token;
        options.pad_token_segment_id   = self.pad_token_segment_id;
        options.mask_padding_with_zero = self.mask_padding_with_zero;
        Ok(options)
    }
}

// ─── ConvertUseCase ───────────────────────────────────────────────────────────
pub struct ConvertUseCase {
    config: ConvertConfig,
}

impl ConvertUseCase {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Load the configured tokenizer and run the conversion.
    pub fn execute(&self) -> Result<ConversionStats> {
        let store   = TokenizerStore::new(&self.config.tokenizer);
        let encoder = store.load(self.config.max_length)?;
        self.execute_with(&encoder, &store.path().display().to_string())
    }

    /// Run the conversion with an already-loaded encoder.
    pub fn execute_with<E: PairEncoder + ?Sized>(
        &self,
        encoder:   &E,
        tokenizer: &str,
    ) -> Result<ConversionStats> {
        let cfg = &self.config;

        // ── Step 1: Resolve what to convert ───────────────────────────────────
        let task: Task   = cfg.task.parse()?;
        let split: Split = cfg.split.parse()?;
        let options      = cfg.conversion_options(task)?;

        // ── Step 2: Load examples ─────────────────────────────────────────────
        let (source, description): (Box<dyn ExampleSource>, String) = match &cfg.records {
            Some(path) => (Box::new(RecordProcessor::new(task, path)), path.clone()),
            None => {
                let p    = GlueProcessor::new(task, &cfg.data_dir);
                let desc = p.file_path(split).display().to_string();
                (Box::new(p), desc)
            }
        };
        let examples = source.load(split)?;

        // ── Step 3/4: Encode, pad, map labels ─────────────────────────────────
        let features = convert_examples_to_features(&examples, encoder, &options)
            .with_context(|| format!("Converting {task} {split} examples"))?;

        // ── Step 5: Save ──────────────────────────────────────────────────────
        let meta = FeatureMeta {
            task,
            split,
            num_labels:   match options.output_mode {
                OutputMode::Regression     => 1,
                OutputMode::Classification => options.label_list.len(),
            },
            num_features: features.len(),
            options:      options.clone(),
            source:       description,
            tokenizer:    tokenizer.to_string(),
        };
        let store = FeatureStore::new(&cfg.output_dir);
        store.save(&meta, &features)?;
        store.save_config(task, split, cfg)?;

        // ── Step 6: Statistics ────────────────────────────────────────────────
        let stats = ConversionStats::compute(
            task,
            split,
            examples.len(),
            &features,
            options.max_length,
            options.real_token_mask(),
        );
        StatsLogger::new(&cfg.output_dir)?.log(&stats)?;

        if stats.truncation_rate() > 0.1 {
            tracing::warn!(
                "{:.1}% of {} {} records fill max_length {}; consider raising it",
                stats.truncation_rate() * 100.0,
                task,
                split,
                options.max_length
            );
        }

        Ok(stats)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::GlueError;
    use crate::domain::feature::Label;
    use crate::domain::traits::EncodedPair;

    /// [CLS] + one id per word + [SEP], segments 0 then 1
    struct CountingEncoder;

    impl PairEncoder for CountingEncoder {
        fn encode_pair(&self, a: &str, b: Option<&str>, max_length: usize) -> Result<EncodedPair> {
            let mut ids   = vec![101];
            ids.extend(a.split_whitespace().map(|_| 5));
            ids.push(102);
            let mut types = vec![0; ids.len()];
            if let Some(b) = b {
                ids.extend(b.split_whitespace().map(|_| 6));
                ids.push(102);
                types.resize(ids.len(), 1);
            }
            ids.truncate(max_length);
            types.truncate(max_length);
            Ok(EncodedPair { input_ids: ids, token_type_ids: types })
        }
    }

    fn rte_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("train.tsv"),
            "index\tsentence1\tsentence2\tlabel\n\
             0\tA man sleeps.\tSomeone rests.\tentailment\n\
             1\tIt rains.\tThe sun shines brightly today.\tnot_entailment\n",
        )
        .unwrap();
        dir
    }

    fn config(data: &tempfile::TempDir, out: &tempfile::TempDir) -> ConvertConfig {
        ConvertConfig {
            task:       "rte".into(),
            split:      "train".into(),
            data_dir:   data.path().display().to_string(),
            output_dir: out.path().display().to_string(),
            max_length: 9,
            ..ConvertConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_conversion() {
        let data = rte_dir();
        let out  = tempfile::tempdir().unwrap();
        let stats = ConvertUseCase::new(config(&data, &out))
            .execute_with(&CountingEncoder, "test")
            .unwrap();

        assert_eq!(stats.examples, 2);
        assert_eq!(stats.features, 2);
        // second example: 1 + 2 + 1 + 5 + 1 = 10 ids, cut to 9
        assert_eq!(stats.at_max_length, 1);

        let (meta, features) = FeatureStore::new(out.path())
            .load(Task::Rte, Split::Train)
            .unwrap();
        assert_eq!(meta.num_labels, 2);
        assert_eq!(meta.tokenizer, "test");
        assert_eq!(features[0].label, Label::Class(0));
        assert_eq!(features[1].label, Label::Class(1));
        assert_eq!(features[0].input_ids, vec![101, 5, 5, 5, 102, 6, 6, 102, 0]);
        assert_eq!(features[1].input_ids.len(), 9);
        assert!(out.path().join("conversion_log.csv").exists());

        let saved = ConvertConfig::from_json_file(
            out.path().join("rte-train.config.json").to_str().unwrap(),
        )
        .unwrap();
        assert_eq!(saved, config(&data, &out));
    }

    #[test]
    fn test_label_override() {
        let data = rte_dir();
        let out  = tempfile::tempdir().unwrap();
        let cfg  = ConvertConfig {
            labels: Some(vec!["not_entailment".into(), "entailment".into()]),
            ..config(&data, &out)
        };
        ConvertUseCase::new(cfg).execute_with(&CountingEncoder, "test").unwrap();

        let (_, features) = FeatureStore::new(out.path())
            .load(Task::Rte, Split::Train)
            .unwrap();
        assert_eq!(features[0].label, Label::Class(1));
    }

    #[test]
    fn test_unknown_output_mode_is_rejected() {
        let data = rte_dir();
        let out  = tempfile::tempdir().unwrap();
        let cfg  = ConvertConfig { output_mode: Some("ranking".into()), ..config(&data, &out) };
        let err  = ConvertUseCase::new(cfg)
            .execute_with(&CountingEncoder, "test")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<GlueError>(),
            Some(&GlueError::UnknownOutputMode("ranking".into()))
        );
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        let data = rte_dir();
        let out  = tempfile::tempdir().unwrap();
        let cfg  = ConvertConfig { task: "squad".into(), ..config(&data, &out) };
        let err  = ConvertUseCase::new(cfg)
            .execute_with(&CountingEncoder, "test")
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<GlueError>(), Some(GlueError::UnknownTask(_))));
    }

    #[test]
    fn test_records_source() {
        let data = tempfile::tempdir().unwrap();
        let out  = tempfile::tempdir().unwrap();
        let records = data.path().join("sst2.jsonl");
        std::fs::write(
            &records,
            "{\"idx\": 0, \"sentence\": \"great film\", \"label\": 1}\n\
             {\"idx\": 1, \"sentence\": \"dull\", \"label\": 0}\n",
        )
        .unwrap();

        let cfg = ConvertConfig {
            task:    "sst-2".into(),
            split:   "dev".into(),
            records: Some(records.display().to_string()),
            ..config(&data, &out)
        };
        let stats = ConvertUseCase::new(cfg).execute_with(&CountingEncoder, "test").unwrap();
        assert_eq!(stats.label_counts.get(&1), Some(&1));
        assert_eq!(stats.label_counts.get(&0), Some(&1));
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let cfg = ConvertConfig { max_length: 0, ..ConvertConfig::default() };
        assert!(cfg.conversion_options(Task::Cola).is_err());
    }

    #[test]
    fn test_config_file_fills_defaults() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, "{\"task\": \"sts-b\", \"max_length\": 64}").unwrap();

        let cfg = ConvertConfig::from_json_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.task, "sts-b");
        assert_eq!(cfg.max_length, 64);
        assert_eq!(cfg.split, "train");
        assert!(cfg.mask_padding_with_zero);
    }
}
