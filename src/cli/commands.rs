//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::toml_config::InspectConfig;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::InspectRequest;
use crate::cli::args::{EngineArgs, InspectArgs};

/// Execute the inspect command
pub async fn inspect(config: &InspectConfig, args: &InspectArgs) -> Result<()> {
    let container = if args.from_json {
        DefaultAppContainer::for_documents(config)
    } else {
        DefaultAppContainer::from_config(config)
    };
    let interactor = container.inspect_interactor();

    info!("Input: {}", args.input);
    info!("Backend: {}", interactor.backend_name());

    let request = InspectRequest {
        locator: args.input.clone(),
        format: args.format,
        with_extra: config.with_extra,
    };
    let response = interactor
        .execute(request)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input))?;

    if !response.diagnostics.is_empty() {
        warn!(
            "{} field(s) of {} could not be decoded and were set to zero",
            response.diagnostics.len(),
            args.input
        );
    }

    print_summary(&response.summary);
    Ok(())
}

/// Execute the engine command
pub async fn engine(config: &InspectConfig, _args: &EngineArgs) -> Result<()> {
    let container = DefaultAppContainer::from_config(config);
    let interactor = container.inspect_interactor();

    let version = interactor
        .engine_version()
        .await
        .with_context(|| format!("The {} engine is not available", config.backend))?;

    println!("{} backend: {}", interactor.backend_name(), version);
    Ok(())
}

fn print_summary(summary: &str) {
    if summary.ends_with('\n') {
        print!("{}", summary);
    } else {
        println!("{}", summary);
    }
}
