// src/main.rs
mod commands;
mod extractors;
mod records;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::FilterOutput;
use utils::config::Settings;
use utils::AppError;

/// Command Line Interface for the exam result sheet extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding extracted result tables (falls back to RESULTS_DIR)
    #[arg(short, long, global = true)]
    output_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract per-subject pass/fail records from a result PDF
    Extract {
        /// Path to the result sheet PDF
        pdf: PathBuf,

        /// Forget the current roll number at each page boundary
        #[arg(long)]
        reset_per_page: bool,
    },

    /// Narrow a previously extracted table by subject code and outcome
    Filter {
        /// Table id printed by `extract`, or a path to a table file
        #[arg(short, long)]
        table: Option<String>,

        /// Exact subject code to keep
        #[arg(short, long)]
        subject_code: Option<String>,

        /// `pass`, `fail`, or anything else for both
        #[arg(long)]
        outcome: Option<String>,

        /// Write the filtered table to this file instead of stdout
        #[arg(long, conflicts_with = "save")]
        output: Option<PathBuf>,

        /// Save as filtered_results_<code>.csv in the output directory
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let cli = Cli::parse();
    tracing::info!("Starting processing for args: {:?}", cli);

    // 3. Resolve settings and dispatch
    let result = match cli.command {
        Command::Extract { pdf, reset_per_page } => {
            let settings = Settings::resolve(cli.output_dir, reset_per_page);
            commands::run_extract(&settings, &pdf).await.map(|outcome| {
                tracing::info!(
                    "Extracted {} records for {} students",
                    outcome.table.len(),
                    outcome.table.student_count()
                );
                println!("{}\t{}", outcome.table_id, outcome.table_path.display());
            })
        }
        Command::Filter {
            table,
            subject_code,
            outcome,
            output,
            save,
        } => {
            let settings = Settings::resolve(cli.output_dir, false);
            let destination = match (output, save) {
                (Some(path), _) => FilterOutput::File(path),
                (None, true) => FilterOutput::Store,
                (None, false) => FilterOutput::Stdout,
            };
            commands::run_filter(
                &settings,
                table.as_deref(),
                subject_code.as_deref(),
                outcome.as_deref(),
                destination,
            )
            .await
            .map(|_| ())
        }
    };

    if let Err(e) = &result {
        tracing::error!("{}: {}", e.kind(), e);
    }
    result
}
