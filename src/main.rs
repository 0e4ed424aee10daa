//! mediameta
//!
//! Prints typed container, codec and stream metadata of media files, read
//! through the MediaInfo engine.
//!
//! # Usage
//!
//! ```bash
//! mediameta inspect clip.mov
//! mediameta inspect clip.mov --backend native --format json --extra
//! mediameta inspect saved.json --from-json --format yaml
//! mediameta engine --backend native
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use mediameta::cli::{commands, Cli, Commands};
use mediameta::config_initialization::initialize_configuration;
use mediameta::utils::logging;

/// Main entry point for the mediameta CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration: CLI > Env > File > Defaults
    let config = initialize_configuration(cli.config.as_deref(), &cli.config_overrides())
        .context("Failed to load configuration")?;

    // Initialize logging
    logging::init(&config.logging);
    debug!("Backend: {}, extras: {}", config.backend, config.with_extra);

    // Execute the requested command
    match &cli.command {
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(&config, args).await?;
        }
        Commands::Engine(args) => {
            info!("Executing engine command");
            commands::engine(&config, args).await?;
        }
    }

    Ok(())
}
