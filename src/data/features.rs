// ============================================================
// Layer 4 — Example → Feature Conversion
// ============================================================
// Turns InputExamples into fixed-length InputFeatures:
//
//   1. Encode (text_a, text_b) with the tokenizer
//      → input_ids + token_type_ids, special tokens included
//   2. Build the attention mask over the real tokens
//   3. Pad (or truncate) all three arrays to max_length
//   4. Map the raw label to a class index or a float score
//
// Padding layout with max_length = 8, pad_on_left = false:
//
//   input_ids       [CLS] a  b  [SEP] c  [SEP] PAD PAD
//   attention_mask    1   1  1    1   1    1    0   0
//   token_type_ids    0   0  0    0   1    1    0   0
//
// With mask_padding_with_zero = false the mask is inverted
// (0 on real tokens, 1 on padding).

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::GlueError;
use crate::domain::example::InputExample;
use crate::domain::feature::{InputFeatures, Label};
use crate::domain::task::{OutputMode, Task};
use crate::domain::traits::PairEncoder;

/// How often progress is logged
const LOG_EVERY: usize = 10_000;

/// How many converted examples are logged in full
const LOG_FIRST: usize = 5;

// ─── Conversion Options ───────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOptions {
    pub max_length:             usize,
    pub label_list:             Vec<String>,
    pub output_mode:            OutputMode,
    pub pad_on_left:            bool,
    pub pad_token:              u32,
    pub pad_token_segment_id:   u32,
    pub mask_padding_with_zero: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_length:             512,
            label_list:             Vec::new(),
            output_mode:            OutputMode::Classification,
            pad_on_left:            false,
            pad_token:              0,
            pad_token_segment_id:   0,
            mask_padding_with_zero: true,
        }
    }
}

impl ConversionOptions {
    /// Options with the task's label list and output mode filled in.
    pub fn for_task(task: Task, max_length: usize) -> Self {
        let label_list: Vec<String> = task.labels().iter().map(|l| l.to_string()).collect();
        let output_mode = task.output_mode();

        tracing::info!("Using label list {:?} for task {}", label_list, task);
        tracing::info!("Using output mode {} for task {}", output_mode, task);

        Self { max_length, label_list, output_mode, ..Self::default() }
    }

    /// Mask value marking a real token
    pub fn real_token_mask(&self) -> u32 {
        if self.mask_padding_with_zero { 1 } else { 0 }
    }

    /// Mask value marking a padding position
    pub fn padding_mask(&self) -> u32 {
        1 - self.real_token_mask()
    }
}

// ─── Padding ──────────────────────────────────────────────────────────────────

/// Pad `seq` with `value` up to `max_length`, or cut it down to
/// `max_length` if it is longer. Truncation always keeps the head,
/// so the leading special token survives.
pub fn pad_to_length(seq: &mut Vec<u32>, max_length: usize, value: u32, on_left: bool) {
    if seq.len() >= max_length {
        seq.truncate(max_length);
        return;
    }

    let padding = max_length - seq.len();
    if on_left {
        seq.splice(0..0, std::iter::repeat(value).take(padding));
    } else {
        seq.resize(max_length, value);
    }
}

// ─── Label Mapping ────────────────────────────────────────────────────────────

struct LabelMapper<'a> {
    mode:  OutputMode,
    map:   HashMap<&'a str, usize>,
    names: &'a [String],
}

impl<'a> LabelMapper<'a> {
    fn new(options: &'a ConversionOptions) -> Self {
        let map = options
            .label_list
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        Self { mode: options.output_mode, map, names: &options.label_list }
    }

    fn map(&self, example: &InputExample) -> Result<Label, GlueError> {
        match self.mode {
            OutputMode::Classification => self
                .map
                .get(example.label.as_str())
                .map(|&i| Label::Class(i))
                .ok_or_else(|| GlueError::UnknownLabel {
                    guid:   example.guid.clone(),
                    label:  example.label.clone(),
                    labels: self.names.to_vec(),
                }),
            OutputMode::Regression => example
                .label
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|s| s.is_finite())
                .map(Label::Score)
                .ok_or_else(|| GlueError::InvalidScore {
                    guid:  example.guid.clone(),
                    label: example.label.clone(),
                }),
        }
    }
}

// ─── Conversion ───────────────────────────────────────────────────────────────

fn convert_with<E: PairEncoder + ?Sized>(
    example: &InputExample,
    encoder: &E,
    options: &ConversionOptions,
    labels:  &LabelMapper<'_>,
) -> Result<InputFeatures> {
    let max_length = options.max_length;

    let encoded = encoder.encode_pair(
        &example.text_a,
        example.text_b.as_deref(),
        max_length,
    )?;
    let mut input_ids      = encoded.input_ids;
    let mut token_type_ids = encoded.token_type_ids;

    if input_ids.len() > max_length {
        tracing::warn!(
            "Encoder returned {} ids for {} (max_length {}), truncating",
            input_ids.len(),
            example.guid,
            max_length
        );
    }

    let mut attention_mask = vec![options.real_token_mask(); input_ids.len()];

    pad_to_length(&mut input_ids,      max_length, options.pad_token,            options.pad_on_left);
    pad_to_length(&mut attention_mask, max_length, options.padding_mask(),       options.pad_on_left);
    pad_to_length(&mut token_type_ids, max_length, options.pad_token_segment_id, options.pad_on_left);

    debug_assert_eq!(input_ids.len(),      max_length);
    debug_assert_eq!(attention_mask.len(), max_length);
    debug_assert_eq!(token_type_ids.len(), max_length);

    let label = labels.map(example)?;

    Ok(InputFeatures { input_ids, attention_mask, token_type_ids, label })
}

/// Convert a list of examples into feature records, in order.
pub fn convert_examples_to_features<E: PairEncoder + ?Sized>(
    examples: &[InputExample],
    encoder:  &E,
    options:  &ConversionOptions,
) -> Result<Vec<InputFeatures>> {
    let labels = LabelMapper::new(options);
    let total  = examples.len();
    let mut features = Vec::with_capacity(total);

    for (i, example) in examples.iter().enumerate() {
        if i % LOG_EVERY == 0 {
            tracing::info!("Writing example {}/{}", i, total);
        }

        let feature = convert_with(example, encoder, options, &labels)?;

        if i < LOG_FIRST {
            log_feature(example, &feature);
        }
        features.push(feature);
    }

    Ok(features)
}

fn log_feature(example: &InputExample, feature: &InputFeatures) {
    let join = |v: &[u32]| {
        v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(" ")
    };

    tracing::info!("*** Example ***");
    tracing::info!("guid: {}", example.guid);
    tracing::info!("input_ids: {}", join(&feature.input_ids));
    tracing::info!("attention_mask: {}", join(&feature.attention_mask));
    tracing::info!("token_type_ids: {}", join(&feature.token_type_ids));
    tracing::info!("label: {} (id = {})", example.label, feature.label);
}
