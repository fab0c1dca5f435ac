// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `convert`, `inspect`,
// `build-tokenizer`, and `tasks`, and all their flags.
//
// clap's derive macros generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, u32, bool)

use clap::{Args, Subcommand};

use crate::application::{convert_use_case::ConvertConfig, vocab_use_case::VocabConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a task split's raw files into fixed-length features
    Convert(ConvertArgs),

    /// Summarise a converted feature set
    Inspect(InspectArgs),

    /// Build a word-level tokenizer.json from a task's training texts
    BuildTokenizer(BuildTokenizerArgs),

    /// List the supported tasks with their labels and output modes
    Tasks,
}

/// All arguments for the `convert` command.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Task name, e.g. mrpc, mnli-mm, sts-b, boolq
    #[arg(long, required_unless_present = "config")]
    pub task: Option<String>,

    /// train or dev (val/validation accepted)
    #[arg(long, default_value = "train")]
    pub split: String,

    /// Directory holding the task's raw files
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Named-field JSONL file to read instead of --data-dir
    #[arg(long)]
    pub records: Option<String>,

    /// tokenizer.json, or a directory containing one
    #[arg(long, default_value = "tokenizer.json")]
    pub tokenizer: String,

    /// Where feature files, metadata, and stats are written
    #[arg(long, default_value = "features")]
    pub output_dir: String,

    /// Length every sequence is padded or truncated to
    #[arg(long, default_value_t = 512)]
    pub max_length: usize,

    /// Comma-separated label list replacing the task's own
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// classification or regression, replacing the task's own
    #[arg(long)]
    pub output_mode: Option<String>,

    /// Pad at the start of the sequence instead of the end
    #[arg(long)]
    pub pad_on_left: bool,

    /// Id written into padded input_ids positions
    #[arg(long, default_value_t = 0)]
    pub pad_token: u32,

    /// Segment id written into padded token_type_ids positions
    #[arg(long, default_value_t = 0)]
    pub pad_token_segment_id: u32,

    /// Mark real tokens 0 and padding 1 in the attention mask
    #[arg(long)]
    pub mask_padding_with_one: bool,

    /// JSON run config; when given, every other flag is ignored
    #[arg(long)]
    pub config: Option<String>,
}

/// Convert CLI ConvertArgs into the application-layer ConvertConfig.
/// The application layer never sees clap types.
impl From<ConvertArgs> for ConvertConfig {
    fn from(a: ConvertArgs) -> Self {
        ConvertConfig {
            task:                   a.task.unwrap_or_default(),
            split:                  a.split,
            data_dir:               a.data_dir,
            records:                a.records,
            tokenizer:              a.tokenizer,
            output_dir:             a.output_dir,
            max_length:             a.max_length,
            labels:                 a.labels,
            output_mode:            a.output_mode,
            pad_on_left:            a.pad_on_left,
            pad_token:              a.pad_token,
            pad_token_segment_id:   a.pad_token_segment_id,
            mask_padding_with_zero: !a.mask_padding_with_one,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long)]
    pub task: String,

    #[arg(long, default_value = "train")]
    pub split: String,

    /// Directory `convert` wrote to
    #[arg(long, default_value = "features")]
    pub output_dir: String,

    /// Number of records to print
    #[arg(long, default_value_t = 3)]
    pub show: usize,
}

/// All arguments for the `build-tokenizer` command
#[derive(Args, Debug)]
pub struct BuildTokenizerArgs {
    /// Task whose train split supplies the texts
    #[arg(long)]
    pub task: String,

    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// tokenizer.json path, or a directory to write one into
    #[arg(long, default_value = "tokenizer.json")]
    pub output: String,

    /// Maximum entries in the vocabulary, special tokens included
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,
}

impl From<BuildTokenizerArgs> for VocabConfig {
    fn from(a: BuildTokenizerArgs) -> Self {
        VocabConfig {
            task:       a.task,
            data_dir:   a.data_dir,
            output:     a.output,
            vocab_size: a.vocab_size,
        }
    }
}
