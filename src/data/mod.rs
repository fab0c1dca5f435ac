// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw benchmark file and a list of
// padded feature records.
//
// The pipeline flows in this order:
//
//   train.tsv / val.jsonl / train.csv
//       │
//       ▼
//   reader          → rows of strings, or JSON objects
//       │
//       ▼
//   processors      → per-task column mapping → InputExamples
//       │
//       ▼
//   features        → tokenizer call, pad/truncate, label map
//       │
//       ▼
//   FeatureDataset  → implements burn's Dataset trait
//
// Each module is responsible for exactly one step.

/// TSV, CSV and JSON-lines readers
pub mod reader;

/// Per-task row → example mapping
pub mod processors;

/// Example → padded feature conversion
pub mod features;

/// Implements burn's Dataset trait for converted features
pub mod dataset;
