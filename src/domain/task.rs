// ============================================================
// Layer 3 — Task Catalog
// ============================================================
// The fixed set of benchmark tasks this tool knows about.
// Each task carries static metadata only:
//   - its label set and output mode
//   - the names and format of its train/dev files
//
// How rows are mapped into examples lives in Layer 4
// (data::processors) — this file is the lookup table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::GlueError;

const BINARY: &[&str] = &["0", "1"];
const NLI3: &[&str] = &["contradiction", "entailment", "neutral"];
const NLI2: &[&str] = &["entailment", "not_entailment"];
const BOOL: &[&str] = &["False", "True"];
const EMOJI: &[&str] = &[
    ":smiling_face_with_smiling_eyes:",
    ":broken_heart:",
    ":face_with_tears_of_joy:",
    ":crying_face:",
    ":grinning_face_with_sweat:",
    ":red_heart:",
    ":smiling_face_with_heart-eyes:",
    ":rolling_on_the_floor_laughing:",
    ":blue_heart:",
    ":beaming_face_with_smiling_eyes:",
    ":two_hearts:",
    ":sparkling_heart:",
    ":face_blowing_a_kiss:",
    ":fire:",
    ":folded_hands:",
    ":clapping_hands:",
    ":loudly_crying_face:",
    ":thinking_face:",
    ":heart_suit:",
    ":thumbs_up:",
];

/// One named benchmark dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Task {
    Cola,
    Mnli,
    MnliMismatched,
    Mrpc,
    Sst2,
    Stsb,
    Qqp,
    Qnli,
    Rte,
    Wnli,
    Boolq,
    Emoji,
}

/// Whether a task predicts a class index or a real-valued score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Classification,
    Regression,
}

/// On-disk layout of a task's raw files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Tsv,
    Csv,
    Jsonl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Dev,
}

impl Task {
    pub const ALL: [Task; 12] = [
        Task::Cola,
        Task::Mnli,
        Task::MnliMismatched,
        Task::Mrpc,
        Task::Sst2,
        Task::Stsb,
        Task::Qqp,
        Task::Qnli,
        Task::Rte,
        Task::Wnli,
        Task::Boolq,
        Task::Emoji,
    ];

    /// The catalog name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Task::Cola           => "cola",
            Task::Mnli           => "mnli",
            Task::MnliMismatched => "mnli-mm",
            Task::Mrpc           => "mrpc",
            Task::Sst2           => "sst-2",
            Task::Stsb           => "sts-b",
            Task::Qqp            => "qqp",
            Task::Qnli           => "qnli",
            Task::Rte            => "rte",
            Task::Wnli           => "wnli",
            Task::Boolq          => "boolq",
            Task::Emoji          => "emoji",
        }
    }

    /// Label strings in index order. Empty for regression tasks.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Task::Cola | Task::Mrpc | Task::Sst2 | Task::Qqp | Task::Wnli => BINARY,
            Task::Mnli | Task::MnliMismatched => NLI3,
            Task::Qnli | Task::Rte => NLI2,
            Task::Boolq => BOOL,
            Task::Emoji => EMOJI,
            Task::Stsb => &[],
        }
    }

    /// Size of the model head: the label count, or 1 for regression.
    pub fn num_labels(self) -> usize {
        match self.output_mode() {
            OutputMode::Regression     => 1,
            OutputMode::Classification => self.labels().len(),
        }
    }

    pub fn output_mode(self) -> OutputMode {
        match self {
            Task::Stsb => OutputMode::Regression,
            _ => OutputMode::Classification,
        }
    }

    pub fn file_format(self) -> FileFormat {
        match self {
            Task::Boolq => FileFormat::Jsonl,
            Task::Emoji => FileFormat::Csv,
            _ => FileFormat::Tsv,
        }
    }

    /// File name of the raw data for `split`, relative to the data directory.
    pub fn file_name(self, split: Split) -> &'static str {
        match (self, split) {
            (Task::Boolq, Split::Train) => "train.jsonl",
            (Task::Boolq, Split::Dev)   => "val.jsonl",
            (Task::Emoji, Split::Train) => "train.csv",
            (Task::Emoji, Split::Dev)   => "val.csv",
            (Task::Mnli, Split::Dev)    => "dev_matched.tsv",
            (Task::MnliMismatched, Split::Dev) => "dev_mismatched.tsv",
            (_, Split::Train) => "train.tsv",
            (_, Split::Dev)   => "dev.tsv",
        }
    }

    /// Prefix used when building example guids (`{prefix}-{id}`).
    pub fn guid_prefix(self, split: Split) -> &'static str {
        match (self, split) {
            (_, Split::Train) => "train",
            (Task::Mnli, Split::Dev) => "dev_matched",
            (Task::MnliMismatched, Split::Dev) => "dev_mismatched",
            (Task::Boolq, Split::Dev) => "val",
            (_, Split::Dev) => "dev",
        }
    }
}

impl FromStr for Task {
    type Err = GlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Task::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| GlueError::UnknownTask(s.to_string()))
    }
}

impl TryFrom<String> for Task {
    type Error = GlueError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Task> for String {
    fn from(t: Task) -> Self {
        t.name().to_string()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputMode {
    type Err = GlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "classification" => Ok(OutputMode::Classification),
            "regression"     => Ok(OutputMode::Regression),
            other => Err(GlueError::UnknownOutputMode(other.to_string())),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Classification => f.write_str("classification"),
            OutputMode::Regression     => f.write_str("regression"),
        }
    }
}

impl FromStr for Split {
    type Err = GlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "train"               => Ok(Split::Train),
            "dev" | "val" | "validation" => Ok(Split::Dev),
            other => Err(GlueError::UnknownSplit(other.to_string())),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("train"),
            Split::Dev   => f.write_str("dev"),
        }
    }
}
