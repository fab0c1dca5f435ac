// ============================================================
// Layer 2 — VocabUseCase
// ============================================================
// Builds a word-level tokenizer from a task's training texts,
// for data without a pretrained tokenizer.json.
//
//   Step 1: Load the train split          (Layer 4 - data)
//   Step 2: Collect text_a and text_b
//   Step 3: Build and save the tokenizer  (Layer 6 - infra)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::processors::GlueProcessor;
use crate::domain::task::{Split, Task};
use crate::domain::traits::ExampleSource;
use crate::infra::tokenizer_store::TokenizerStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabConfig {
    pub task:       String,
    pub data_dir:   String,
    /// tokenizer.json path, or a directory to write one into
    pub output:     String,
    pub vocab_size: usize,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            task:       "mrpc".to_string(),
            data_dir:   "glue_data/MRPC".to_string(),
            output:     "tokenizer.json".to_string(),
            vocab_size: 30522,
        }
    }
}

pub struct VocabUseCase {
    config: VocabConfig,
}

impl VocabUseCase {
    pub fn new(config: VocabConfig) -> Self {
        Self { config }
    }

    /// Returns the number of vocabulary entries written.
    pub fn execute(&self) -> Result<usize> {
        let cfg = &self.config;
        let task: Task = cfg.task.parse()?;

        let examples = GlueProcessor::new(task, &cfg.data_dir).load(Split::Train)?;
        if examples.is_empty() {
            anyhow::bail!("No training examples for {task} in '{}'", cfg.data_dir);
        }

        let texts: Vec<String> = examples
            .into_iter()
            .flat_map(|e| std::iter::once(e.text_a).chain(e.text_b))
            .collect();
        tracing::info!("Building vocabulary from {} texts", texts.len());

        TokenizerStore::new(&cfg.output).build_and_save(&texts, cfg.vocab_size)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::PairEncoder;

    #[test]
    fn test_builds_from_both_sentences() {
        let data = tempfile::tempdir().unwrap();
        std::fs::write(
            data.path().join("train.tsv"),
            "index\tquestion\tsentence\tlabel\n\
             0\tWho wrote it?\tAlice wrote it.\tentailment\n",
        )
        .unwrap();
        let out = tempfile::tempdir().unwrap();

        let cfg = VocabConfig {
            task:       "qnli".into(),
            data_dir:   data.path().display().to_string(),
            output:     out.path().display().to_string(),
            vocab_size: 100,
        };
        // who, wrote, it, alice + 5 special tokens
        assert_eq!(VocabUseCase::new(cfg).execute().unwrap(), 9);

        let enc = TokenizerStore::new(out.path()).load(16).unwrap();
        assert!(enc.token_to_id("alice").is_some());
        let pair = enc.encode_pair("who wrote", Some("alice"), 16).unwrap();
        assert_eq!(pair.input_ids.len(), 6);
    }

    #[test]
    fn test_empty_train_split_fails() {
        let data = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join("train.tsv"), "sentence\tlabel\n").unwrap();
        let cfg = VocabConfig {
            task:       "sst-2".into(),
            data_dir:   data.path().display().to_string(),
            output:     data.path().display().to_string(),
            vocab_size: 10,
        };
        assert!(VocabUseCase::new(cfg).execute().is_err());
    }
}
