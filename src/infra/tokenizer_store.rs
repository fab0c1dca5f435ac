// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads (or builds) the HuggingFace tokenizer that encodes
// examples, and adapts it to the PairEncoder trait.
//
// Loading:
//   The tokenizer.json is loaded as-is, then two settings are
//   forced so the conversion step owns the output length:
//     - truncation: longest-first at max_length
//     - padding:    disabled (padding happens in data::features)
//
// Building:
//   For corpora without a pretrained tokenizer, a word-level
//   vocabulary is built from the task's training texts and
//   written directly as tokenizer JSON. Special token ids
//   follow the BERT convention, and a BertProcessing post-
//   processor produces [CLS] A [SEP] B [SEP] with segment
//   ids 0 for A and 1 for B.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokenizers::{
    EncodeInput, PostProcessor, Tokenizer, TruncationDirection, TruncationParams,
    TruncationStrategy,
};

use crate::domain::traits::{EncodedPair, PairEncoder};

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Number of ids reserved for special tokens below the first word id
const FIRST_WORD_ID: usize = 104;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    /// `location` is either a tokenizer.json file or a directory holding one
    pub fn new(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let path = if location.extension().and_then(|e| e.to_str()) == Some("json") {
            location
        } else {
            location.join(TOKENIZER_FILE)
        };
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the tokenizer and configure it to truncate at `max_length`.
    pub fn load(&self, max_length: usize) -> Result<HfPairEncoder> {
        let mut tokenizer = Tokenizer::from_file(&self.path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", self.path.display(), e
            ))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                strategy:  TruncationStrategy::LongestFirst,
                stride:    0,
                direction: TruncationDirection::Right,
            }))
            .map_err(|e| anyhow::anyhow!("Cannot configure truncation: {e}"))?;
        tokenizer.with_padding(None);

        tracing::info!(
            "Loaded tokenizer from '{}' (vocab size {})",
            self.path.display(),
            tokenizer.get_vocab_size(true)
        );

        Ok(HfPairEncoder { tokenizer, max_length })
    }

    /// Build a word-level vocabulary from `texts` and write tokenizer JSON.
    /// Returns the number of entries in the vocabulary.
    pub fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<usize> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        }

        // ── Step 1: Count word frequencies ────────────────────────────────────
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in words(text) {
                *freq.entry(word).or_insert(0) += 1;
            }
        }

        // Most frequent first; ties broken alphabetically so builds are repeatable
        let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(vocab_size.saturating_sub(5));

        // ── Step 2: Build vocab JSON ──────────────────────────────────────────
        let mut vocab = serde_json::json!({
            "[PAD]":  0,
            "[UNK]":  1,
            "[CLS]":  101,
            "[SEP]":  102,
            "[MASK]": 103,
        });
        let mut next_id = FIRST_WORD_ID;
        for (word, _) in &ranked {
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }
        let entries = ranked.len() + 5;

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": {
                "type": "BertProcessing",
                "sep": ["[SEP]", 102],
                "cls": ["[CLS]", 101]
            },
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        std::fs::write(&self.path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write '{}'", self.path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            entries,
            self.path.display()
        );
        Ok(entries)
    }
}

/// Lowercased words with punctuation stripped from the edges
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|w| {
        let w = w.to_lowercase();
        let w = w.trim_matches(|c: char| !c.is_alphanumeric());
        (!w.is_empty()).then(|| w.to_string())
    })
}

// ─── HfPairEncoder ────────────────────────────────────────────────────────────
/// A loaded HuggingFace tokenizer, truncating at a fixed length.
pub struct HfPairEncoder {
    tokenizer:  Tokenizer,
    max_length: usize,
}

impl HfPairEncoder {
    /// Special tokens the post-processor adds to a single or pair input
    fn added_tokens(&self, is_pair: bool) -> usize {
        self.tokenizer
            .get_post_processor()
            .map_or(0, |p| p.added_tokens(is_pair))
    }
}

#[cfg(test)]
impl HfPairEncoder {
    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.tokenizer.token_to_id(token)
    }
}

impl PairEncoder for HfPairEncoder {
    fn encode_pair(
        &self,
        text_a:     &str,
        text_b:     Option<&str>,
        max_length: usize,
    ) -> Result<EncodedPair> {
        if max_length != self.max_length {
            anyhow::bail!(
                "Tokenizer was loaded for max_length {}, asked for {}",
                self.max_length,
                max_length
            );
        }

        // The tokenizer cannot truncate below its own special tokens
        let special = self.added_tokens(text_b.is_some());
        if max_length < special {
            anyhow::bail!(
                "max_length {} leaves no room for the {} special tokens of a {} input",
                max_length,
                special,
                if text_b.is_some() { "pair" } else { "single" }
            );
        }

        let input: EncodeInput = match text_b {
            Some(b) => (text_a, b).into(),
            None    => text_a.into(),
        };
        let encoding = self
            .tokenizer
            .encode(input, true)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        Ok(EncodedPair {
            input_ids:      encoding.get_ids().to_vec(),
            token_type_ids: encoding.get_type_ids().to_vec(),
        })
    }
}
