// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem outside the raw
// benchmark files:
//
//   tokenizer_store.rs — loads a HuggingFace tokenizer.json
//                        (or builds a word-level one) and
//                        adapts it to the PairEncoder trait
//
//   feature_store.rs   — writes converted features as JSON
//                        lines plus a metadata sidecar, and
//                        reads them back
//
//   metrics.rs         — conversion statistics, appended to
//                        a CSV file once per run

/// Tokenizer loading, building, and the PairEncoder adapter
pub mod tokenizer_store;

/// Feature file persistence
pub mod feature_store;

/// Conversion statistics CSV logger
pub mod metrics;
