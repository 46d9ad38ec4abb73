use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prescription_analyzer_cli::{run, Cli};

/// The main entry point for the prescription analyzer CLI
///
/// This function:
/// 1. Loads environment variables from a .env file when present
/// 2. Sets up tracing on stderr so panel output on stdout stays clean
/// 3. Parses the command line and runs the selected command
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables before the filter reads RUST_LOG
    let dotenv_loaded = dotenv().is_ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    if !dotenv_loaded {
        debug!(".env file not found or couldn't be read. Using environment variables.");
    }

    let cli = Cli::parse();
    debug!("Starting prescription analyzer");

    run(cli).await
}
