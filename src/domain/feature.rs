// ============================================================
// Layer 3 — InputFeatures Domain Type
// ============================================================
// The fixed-length numeric encoding of one InputExample.
//
// All three sequences have exactly max_length entries:
//   input_ids       token ids, padded with pad_token
//   attention_mask  1 = real token, 0 = padding (by default)
//   token_type_ids  segment ids, 0 for text_a, 1 for text_b
//
// Serialised as one JSON object per line, e.g.
//   {"input_ids":[101,7592,102,0],"attention_mask":[1,1,1,0],
//    "token_type_ids":[0,0,0,0],"label":1}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target value of a feature.
///
/// Untagged so classification labels serialise as integers
/// and regression labels as floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Index into the task's label list
    Class(usize),
    /// Real-valued similarity score
    Score(f32),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Class(i) => write!(f, "{i}"),
            Label::Score(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFeatures {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub token_type_ids: Vec<u32>,
    pub label:          Label,
}

impl InputFeatures {
    /// Sequence length shared by all three arrays
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }

    /// Number of attended positions, given which mask value marks real tokens
    pub fn real_len(&self, real_token_mask: u32) -> usize {
        self.attention_mask
            .iter()
            .filter(|&&m| m == real_token_mask)
            .count()
    }
}
