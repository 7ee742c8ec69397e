use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use form_coach_cli::commands::Cli;

fn main() -> Result<()> {
    // Parse first so --verbose can pick the log level
    let cli = Cli::parse();

    let default_level = if cli.verbose() { "debug" } else { "info" };

    // Logs go to stderr so replay output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Initialize tokio runtime
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}
