// ============================================================
// Layer 3 — InputExample Domain Type
// ============================================================
// One raw benchmark input: one or two text fields plus a
// label, exactly as it appeared in the source file.
//
// The label is kept as a string at this stage. Turning it
// into a class index or a score needs the task's label list
// and output mode, which is the conversion step's job.
//
// Example (MRPC):
//   guid:   "train-1"
//   text_a: "Amrozi accused his brother ..."
//   text_b: "Referring to him as only \" the witness \" ..."
//   label:  "1"

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputExample {
    /// Unique id, `{set_type}-{row id}`
    pub guid: String,

    /// First (or only) sequence
    pub text_a: String,

    /// Second sequence, for sentence-pair tasks only
    pub text_b: Option<String>,

    /// Raw label text
    pub label: String,
}

impl InputExample {
    pub fn new(
        guid:   impl Into<String>,
        text_a: impl Into<String>,
        text_b: Option<String>,
        label:  impl Into<String>,
    ) -> Self {
        Self {
            guid:   guid.into(),
            text_a: text_a.into(),
            text_b,
            label:  label.into(),
        }
    }
}
