// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user-facing goal each.
//
// Rules for this layer:
//   - No tokenisation or padding logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - No direct file formats here (that's Layer 4 and 6)
//   - Only workflow coordination

// Raw benchmark files → saved feature records
pub mod convert_use_case;

// Saved feature records → summary report
pub mod inspect_use_case;

// Training texts → word-level tokenizer.json
pub mod vocab_use_case;
