// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Loads a saved feature set back through the dataset and
// summarises it: metadata, label distribution, and the first
// few records. Printing is left to Layer 1.

use anyhow::Result;
use burn::data::dataset::Dataset;

use crate::data::dataset::FeatureDataset;
use crate::domain::feature::InputFeatures;
use crate::domain::task::{Split, Task};
use crate::infra::feature_store::{FeatureMeta, FeatureStore};

/// Summary of a saved feature set
#[derive(Debug)]
pub struct InspectReport {
    pub meta:    FeatureMeta,
    pub records: usize,
    pub seq_len: usize,
    /// (label name, count) in label-list order; empty for regression
    pub label_counts: Vec<(String, usize)>,
    pub preview: Vec<InputFeatures>,
}

pub struct InspectUseCase {
    output_dir: String,
    task:       String,
    split:      String,
    show:       usize,
}

impl InspectUseCase {
    pub fn new(output_dir: String, task: String, split: String, show: usize) -> Self {
        Self { output_dir, task, split, show }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let task: Task   = self.task.parse()?;
        let split: Split = self.split.parse()?;

        let (meta, features) = FeatureStore::new(&self.output_dir).load(task, split)?;
        let dataset = FeatureDataset::new(features);

        let label_counts = match dataset.class_labels() {
            Some(indices) => {
                let labels = &meta.options.label_list;
                let mut counts = vec![0usize; labels.len()];
                for i in indices {
                    if let Some(c) = counts.get_mut(i) {
                        *c += 1;
                    }
                }
                labels.iter().cloned().zip(counts).collect()
            }
            None => Vec::new(),
        };

        let preview = (0..self.show.min(dataset.len()))
            .filter_map(|i| dataset.get(i))
            .collect();

        tracing::info!("Inspected {} {} ({} records)", task, split, dataset.len());

        Ok(InspectReport {
            records: dataset.len(),
            seq_len: dataset.seq_len(),
            meta,
            label_counts,
            preview,
        })
    }
}
