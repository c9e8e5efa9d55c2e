//! Farm2Hand CLI - seed data tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the built-in sample farm as YAML, to edit into a seed file
//! farm2hand-cli seed export --output seed.yaml
//!
//! # Check a seed file before pointing FARM2HAND_SEED_FILE at it
//! farm2hand-cli seed check seed.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "farm2hand-cli")]
#[command(author, version, about = "Farm2Hand CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with dashboard seed files
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// Export the built-in sample data as YAML
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and validate a seed file
    Check {
        /// Seed file to check
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so `seed export` can be piped.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { action } => match action {
            SeedAction::Export { output } => commands::seed::export(output.as_deref()).await?,
            SeedAction::Check { file } => commands::seed::check(&file).await?,
        },
    }
    Ok(())
}
