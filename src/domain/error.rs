// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Typed failures that callers may want to match on.
// Everything else (I/O, tokenizer internals) travels as
// anyhow::Error with context attached at the boundary.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GlueError {
    #[error("Unknown task '{0}'. Run `glue-features tasks` for the catalog")]
    UnknownTask(String),

    #[error("Unknown output mode '{0}' (expected 'classification' or 'regression')")]
    UnknownOutputMode(String),

    #[error("Unknown split '{0}' (expected 'train' or 'dev')")]
    UnknownSplit(String),

    #[error("Label '{label}' of example {guid} is not in the label list {labels:?}")]
    UnknownLabel {
        guid:   String,
        label:  String,
        labels: Vec<String>,
    },

    #[error("Label '{label}' of example {guid} is not a number")]
    InvalidScore { guid: String, label: String },

    #[error("Row {row} of {file} has {found} columns, needs at least {needed}")]
    ShortRow {
        file:   String,
        row:    usize,
        found:  usize,
        needed: usize,
    },

    #[error("Record {row} of {file} is missing field '{field}'")]
    MissingField {
        file:  String,
        row:   usize,
        field: String,
    },

    #[error("Label index {index} is out of range for {num_labels} labels")]
    LabelIndexOutOfRange { index: usize, num_labels: usize },
}
