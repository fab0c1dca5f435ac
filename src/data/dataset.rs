use burn::data::dataset::Dataset;

use crate::domain::feature::{InputFeatures, Label};

/// Converted features of one task split, exposed through burn's
/// `Dataset` trait so a training loop can index them directly.
pub struct FeatureDataset {
    features: Vec<InputFeatures>,
}

impl FeatureDataset {
    pub fn new(features: Vec<InputFeatures>) -> Self { Self { features } }

    /// Sequence length shared by every record (0 when empty)
    pub fn seq_len(&self) -> usize {
        self.features.first().map(InputFeatures::seq_len).unwrap_or(0)
    }

    /// Class indices in record order; `None` for regression data
    pub fn class_labels(&self) -> Option<Vec<usize>> {
        self.features
            .iter()
            .map(|f| match f.label {
                Label::Class(i) => Some(i),
                Label::Score(_) => None,
            })
            .collect()
    }
}

impl Dataset<InputFeatures> for FeatureDataset {
    fn get(&self, index: usize) -> Option<InputFeatures> {
        self.features.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.features.len()
    }
}
