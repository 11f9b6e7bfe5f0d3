mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::calculator::ScoreArgs;
use commands::screening::{PercentileArgs, RankArgs};

/// Composite Fundamental Score screening
#[derive(Parser)]
#[command(
    name = "cfs",
    version,
    about = "Composite Fundamental Score screening",
    long_about = "Load a CFS score sheet (xlsx/xls/ods workbook or CSV), rank the \
                  companies by their published score, and compute what-if composite \
                  scores from percentile ranks against the loaded universe."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank companies by their published CFS, optionally filtered by name
    Rank(RankArgs),
    /// Compute a what-if composite score from metric inputs
    Score(ScoreArgs),
    /// Percentile rank of a single value within one sheet column
    Percentile(PercentileArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    // stderr only: stdout carries the formatted result.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cfs=warn,cfs_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Rank(args) => commands::screening::run_rank(args),
        Commands::Score(args) => commands::calculator::run_score(args),
        Commands::Percentile(args) => commands::screening::run_percentile(args),
        Commands::Version => {
            println!("cfs {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
