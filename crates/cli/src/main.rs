//! Driftwood CLI - shipping quotes and fixture inspection.
//!
//! # Usage
//!
//! ```bash
//! # Quote shipping for a basket against a configured method
//! dw-cli quote -b basket.json -m method.json
//!
//! # Weigh a basket
//! dw-cli weigh -b basket.json
//!
//! # Replay a shipping event fixture and show per-line status
//! dw-cli status -f fixture.json
//! ```
//!
//! # Commands
//!
//! - `quote` - Calculate the shipping charge for a basket
//! - `weigh` - Weigh a basket with the configured scale
//! - `status` - Replay shipping events and report line status

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dw-cli")]
#[command(author, version, about = "Driftwood CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the shipping charge for a basket
    Quote {
        /// Path to a basket JSON file
        #[arg(short, long)]
        basket: String,

        /// Path to a shipping method JSON file
        #[arg(short, long)]
        method: String,
    },
    /// Weigh a basket with the configured scale
    Weigh {
        /// Path to a basket JSON file
        #[arg(short, long)]
        basket: String,
    },
    /// Replay a shipping event fixture and report per-line status
    Status {
        /// Path to a ledger fixture JSON file
        #[arg(short, long)]
        fixture: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote { basket, method } => commands::quote::run(&basket, &method)?,
        Commands::Weigh { basket } => commands::weigh::run(&basket)?,
        Commands::Status { fixture } => commands::status::run(&fixture)?,
    }
    Ok(())
}
