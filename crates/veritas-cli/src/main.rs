//! Command-line runner for veritas
//!
//! Runs one contract operation per invocation against a directory-backed
//! ledger and prints the result envelope as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use veritas_core::VeritasConfig;

mod commands;

use commands::invoke::{self, InvokeArgs};
use commands::operations;

#[derive(Parser)]
#[command(name = "veritas")]
#[command(about = "Veritas - verifiable assets, documents and e-forms on a key/value ledger")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".veritas/config.toml")]
    config: PathBuf,

    /// Ledger directory
    #[arg(long, global = true, default_value = ".veritas/ledger")]
    ledger_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke one contract operation
    Invoke(InvokeArgs),

    /// List operation names and their arguments
    Operations,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = VeritasConfig::load(Some(&cli.config))?;

    let log_filter = if cli.verbose {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Invoke(args) => {
            let succeeded = invoke::run(config, &cli.ledger_dir, args).await?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Operations => {
            operations::list();
            Ok(ExitCode::SUCCESS)
        }
    }
}
