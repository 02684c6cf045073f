use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sol_wallet_gen::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli::resolve_config(&cli)?;
    init_logging(&config.log_level)?;

    tracing::debug!(data_dir = %config.data_dir.display(), "Starting sol-wallet");

    let mut stdout = std::io::stdout();
    cli::run(cli, &config, &mut stdout).await
}

/// Logs go to stderr so stdout stays clean for wallet output.
fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
