//! Askdesk CLI — the main entry point.
//!
//! Commands:
//! - `serve`   — Start the HTTP server
//! - `ask`     — Answer one question from the terminal
//! - `init`    — Write a default `askdesk.toml`
//! - `doctor`  — Diagnose configuration and history file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "askdesk",
    about = "Askdesk — professional Q&A from a knowledge base, with a remote model fallback",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ./askdesk.toml)
    #[arg(short, long, global = true, env = "ASKDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the bind address
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer a single question and print the response JSON
    Ask {
        /// The question to ask
        question: String,

        /// Do not append the exchange to the history file
        #[arg(long)]
        no_record: bool,
    },

    /// Write a default config file
    Init,

    /// Diagnose configuration and history file
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { host, port } => commands::serve::run(config_path, host, port).await?,
        Commands::Ask {
            question,
            no_record,
        } => commands::ask::run(config_path, &question, no_record).await?,
        Commands::Init => commands::init::run(config_path)?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
