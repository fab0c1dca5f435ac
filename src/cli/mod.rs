// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Arguments are parsed
// with `clap`; all work is delegated to Layer 2 (application)
// and only the results are printed here.
//
// Commands:
//   1. `convert`         — raw task files → feature records
//   2. `inspect`         — summarise saved feature records
//   3. `build-tokenizer` — word-level tokenizer from train texts
//   4. `tasks`           — print the task catalog

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildTokenizerArgs, Commands, ConvertArgs, InspectArgs};

use crate::application::convert_use_case::ConvertConfig;
use crate::domain::task::Task;

#[derive(Parser, Debug)]
#[command(
    name = "glue-features",
    version = "0.1.0",
    about = "Turn GLUE-style benchmark files into fixed-length model features."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Convert(args)        => run_convert(args),
            Commands::Inspect(args)        => run_inspect(args),
            Commands::BuildTokenizer(args) => run_build_tokenizer(args),
            Commands::Tasks                => run_tasks(),
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    use crate::application::convert_use_case::ConvertUseCase;

    let config = match &args.config {
        Some(path) => ConvertConfig::from_json_file(path)?,
        None       => args.into(),
    };
    tracing::info!("Converting {} {} (max_length {})", config.task, config.split, config.max_length);

    let output_dir = config.output_dir.clone();
    let stats = ConvertUseCase::new(config).execute()?;

    println!(
        "Converted {} {}: {} examples → {} features in '{}'",
        stats.task, stats.split, stats.examples, stats.features, output_dir
    );
    println!(
        "  mean tokens {:.1}, {} of {} at max_length {}",
        stats.mean_tokens, stats.at_max_length, stats.features, stats.max_length
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let report = InspectUseCase::new(args.output_dir, args.task, args.split, args.show).execute()?;
    let meta   = &report.meta;

    println!("{} {}: {} records, seq_len {}", meta.task, meta.split, report.records, report.seq_len);
    println!("  source:      {}", meta.source);
    println!("  tokenizer:   {}", meta.tokenizer);
    println!("  output mode: {}", meta.options.output_mode);
    println!("  num_labels:  {}", meta.num_labels);

    if !report.label_counts.is_empty() {
        println!("  labels:");
        for (name, count) in &report.label_counts {
            println!("    {name:<16} {count}");
        }
    }

    for (i, f) in report.preview.iter().enumerate() {
        println!("\n[{i}] label = {}", f.label);
        println!("  input_ids:      {:?}", f.input_ids);
        println!("  attention_mask: {:?}", f.attention_mask);
        println!("  token_type_ids: {:?}", f.token_type_ids);
    }
    Ok(())
}

fn run_build_tokenizer(args: BuildTokenizerArgs) -> Result<()> {
    use crate::application::vocab_use_case::VocabUseCase;

    let output  = args.output.clone();
    let entries = VocabUseCase::new(args.into()).execute()?;
    println!("Tokenizer with {entries} entries written to '{output}'");
    Ok(())
}

fn run_tasks() -> Result<()> {
    println!("{:<8} {:<15} {:>6}  labels", "task", "mode", "count");
    for task in Task::ALL {
        let labels = task.labels();
        let shown  = if labels.len() > 6 {
            format!("{} … ({} total)", labels[..6].join(", "), labels.len())
        } else {
            labels.join(", ")
        };
        println!(
            "{:<8} {:<15} {:>6}  {}",
            task.name(),
            task.output_mode().to_string(),
            task.num_labels(),
            shown
        );
    }
    Ok(())
}
