// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums, and traits describing the problem:
// tasks, raw examples, and encoded features.
//
// Rules for this layer:
//   - NO file I/O
//   - NO tokenizer or dataset-library types
//   - Only plain Rust types and the traits other layers implement

// The fixed catalog of benchmark tasks
pub mod task;

// A raw benchmark example
pub mod example;

// A padded numeric feature record
pub mod feature;

// Typed failures
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
