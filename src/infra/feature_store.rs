// ============================================================
// Layer 6 — Feature Store
// ============================================================
// Saves and restores converted feature sets.
//
// What gets saved per task split:
//   1. {task}-{split}.jsonl      — one InputFeatures per line
//   2. {task}-{split}.meta.json  — how the features were made
//   3. {task}-{split}.config.json — the run configuration, so the
//                                   conversion can be repeated
//
// Why save metadata separately?
//   A consumer needs the label list (to decode class indices),
//   the output mode, and the padding conventions before it can
//   use the numeric arrays. The sidecar keeps the feature file
//   itself a plain stream of records.
//
// File naming convention:
//   features/
//     mrpc-train.jsonl
//     mrpc-train.meta.json
//     mrpc-train.config.json
//     mrpc-dev.jsonl
//     mrpc-dev.meta.json
//     conversion_log.csv     ← appended by infra::metrics

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::features::ConversionOptions;
use crate::domain::feature::InputFeatures;
use crate::domain::task::{Split, Task};

/// Everything needed to interpret a saved feature file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMeta {
    pub task:         Task,
    pub split:        Split,
    pub num_labels:   usize,
    pub num_features: usize,
    pub options:      ConversionOptions,
    /// Where the examples were read from
    pub source:       String,
    /// Tokenizer file used for encoding
    pub tokenizer:    String,
}

/// Manages feature files under one output directory.
pub struct FeatureStore {
    dir: PathBuf,
}

impl FeatureStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn features_path(&self, task: Task, split: Split) -> PathBuf {
        self.dir.join(format!("{task}-{split}.jsonl"))
    }

    pub fn meta_path(&self, task: Task, split: Split) -> PathBuf {
        self.dir.join(format!("{task}-{split}.meta.json"))
    }

    pub fn config_path(&self, task: Task, split: Split) -> PathBuf {
        self.dir.join(format!("{task}-{split}.config.json"))
    }

    /// Save the configuration a feature set was produced with.
    pub fn save_config<C: Serialize>(&self, task: Task, split: Split, cfg: &C) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.config_path(task, split);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(())
    }

    /// Write features as JSON lines, then the metadata sidecar.
    pub fn save(&self, meta: &FeatureMeta, features: &[InputFeatures]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.features_path(meta.task, meta.split);
        let file = File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        for feature in features {
            serde_json::to_writer(&mut out, feature)?;
            out.write_all(b"\n")?;
        }
        out.flush()
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        let meta_path = self.meta_path(meta.task, meta.split);
        fs::write(&meta_path, serde_json::to_string_pretty(meta)?)
            .with_context(|| format!("Cannot write '{}'", meta_path.display()))?;

        tracing::info!(
            "Saved {} features to '{}'",
            features.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load_meta(&self, task: Task, split: Split) -> Result<FeatureMeta> {
        let path = self.meta_path(task, split);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Run 'convert' for {} {} first.",
                    path.display(),
                    task,
                    split
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid metadata in '{}'", path.display()))
    }

    /// Load metadata and features, checking the record count matches.
    pub fn load(&self, task: Task, split: Split) -> Result<(FeatureMeta, Vec<InputFeatures>)> {
        let meta = self.load_meta(task, split)?;

        let path = self.features_path(task, split);
        let file = File::open(&path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        let mut features = Vec::with_capacity(meta.num_features);
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let feature: InputFeatures = serde_json::from_str(&line)
                .with_context(|| format!("Invalid record on line {} of '{}'", i + 1, path.display()))?;
            features.push(feature);
        }

        if features.len() != meta.num_features {
            anyhow::bail!(
                "'{}' holds {} records but its metadata says {}",
                path.display(),
                features.len(),
                meta.num_features
            );
        }

        tracing::debug!("Loaded {} features from '{}'", features.len(), path.display());
        Ok((meta, features))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::Label;

    fn meta(num_features: usize) -> FeatureMeta {
        FeatureMeta {
            task: Task::Stsb,
            split: Split::Dev,
            num_labels: 1,
            num_features,
            options: ConversionOptions::for_task(Task::Stsb, 4),
            source: "glue/STS-B/dev.tsv".into(),
            tokenizer: "tokenizer.json".into(),
        }
    }

    fn features() -> Vec<InputFeatures> {
        vec![
            InputFeatures {
                input_ids:      vec![101, 7, 102, 0],
                attention_mask: vec![1, 1, 1, 0],
                token_type_ids: vec![0, 0, 0, 0],
                label:          Label::Score(4.5),
            },
            InputFeatures {
                input_ids:      vec![101, 8, 9, 102],
                attention_mask: vec![1, 1, 1, 1],
                token_type_ids: vec![0, 0, 1, 1],
                label:          Label::Score(0.25),
            },
        ]
    }

    #[test]
    fn test_file_names() {
        let store = FeatureStore::new("out");
        assert!(store.features_path(Task::Sst2, Split::Train).ends_with("sst-2-train.jsonl"));
        assert!(store.meta_path(Task::Mnli, Split::Dev).ends_with("mnli-dev.meta.json"));
    }

    #[test]
    fn test_saved_features_load_back() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("features"));
        store.save(&meta(2), &features()).unwrap();

        let (m, f) = store.load(Task::Stsb, Split::Dev).unwrap();
        assert_eq!(m, meta(2));
        assert_eq!(f, features());
    }

    #[test]
    fn test_config_is_written_beside_features() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path());
        store.save_config(Task::Cola, Split::Dev, &serde_json::json!({"max_length": 64})).unwrap();

        let text = fs::read_to_string(store.config_path(Task::Cola, Split::Dev)).unwrap();
        assert!(text.contains("\"max_length\": 64"));
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path());
        store.save(&meta(3), &features()).unwrap();

        let err = store.load(Task::Stsb, Split::Dev).unwrap_err();
        assert!(err.to_string().contains("holds 2 records"));
    }

    #[test]
    fn test_missing_meta_mentions_convert() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path());
        let err   = store.load(Task::Rte, Split::Train).unwrap_err();
        assert!(err.to_string().contains("Run 'convert' for rte train"));
    }
}
