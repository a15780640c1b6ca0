use std::path::Path;

use tracing_subscriber::EnvFilter;

use walletscore::{pipeline, Config};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Initialize structured logging (set RUST_LOG=info for output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    tracing::info!("WalletScore starting");

    // Load configuration: explicit path, config.toml next to the binary, or defaults
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = Config::load(&path)?;
            tracing::info!("Configuration loaded from {}", path);
            config
        }
        None if Path::new("config.toml").exists() => {
            let config = Config::load("config.toml")?;
            tracing::info!("Configuration loaded from config.toml");
            config
        }
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    // A missing transaction log is an operator mistake, not a crash
    let input = &config.input.transactions_file;
    if !Path::new(input).exists() {
        tracing::error!(path = %input, "Input file not found, nothing to score");
        return Ok(());
    }

    let result = pipeline::run(&config)?;

    tracing::info!(
        transactions = result.transactions,
        wallets = result.wallets,
        scores_file = %config.output.scores_file,
        histogram_file = %config.output.histogram_file,
        "Scoring run complete"
    );

    Ok(())
}
