// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams of the pipeline:
//
//   ExampleSource — where InputExamples come from
//     - GlueProcessor reads a task's raw data directory
//     - RecordProcessor reads named-field JSON records
//
//   PairEncoder   — the tokenizer
//     - HfPairEncoder wraps a HuggingFace tokenizer.json
//     - tests plug in a deterministic stand-in
//
// The conversion step only sees these traits, so it never
// depends on file formats or on a particular tokenizer.

use anyhow::Result;

use crate::domain::example::InputExample;
use crate::domain::task::Split;

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Anything that can produce the examples of one split.
pub trait ExampleSource {
    fn load(&self, split: Split) -> Result<Vec<InputExample>>;
}

// ─── PairEncoder ──────────────────────────────────────────────────────────────
/// Token ids and segment ids for one (text_a, text_b) input,
/// special tokens included, before any padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPair {
    pub input_ids:      Vec<u32>,
    pub token_type_ids: Vec<u32>,
}

/// A tokenizer that encodes a single sequence or a sequence pair.
///
/// Implementations add special tokens and truncate the result
/// to at most `max_length` ids.
pub trait PairEncoder {
    fn encode_pair(
        &self,
        text_a:     &str,
        text_b:     Option<&str>,
        max_length: usize,
    ) -> Result<EncodedPair>;
}
