//! pyzpack - CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pyzpack::cli::{Cli, Commands};
use pyzpack::error::PyzpackResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PyzpackResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("pyzpack=warn"),
        1 => EnvFilter::new("pyzpack=info"),
        _ => EnvFilter::new("pyzpack=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Build(args) => pyzpack::cli::commands::build(args).await,
        Commands::Cache(args) => pyzpack::cli::commands::cache(args).await,
        Commands::Init(args) => pyzpack::cli::commands::init(args).await,
    }
}
