//! CLI module for mediameta
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;
use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

pub use args::{EngineArgs, InspectArgs};

/// mediameta
///
/// Typed container, codec and stream metadata for media files, read through
/// the MediaInfo engine.
#[derive(Parser, Debug)]
#[command(name = "mediameta")]
#[command(about = "Typed media metadata extracted with MediaInfo")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file (default: ./mediameta.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the metadata of a media file or URL
    Inspect(args::InspectArgs),
    /// Report whether the selected engine is available, and its version
    Engine(args::EngineArgs),
}

impl Cli {
    /// Settings given on the command line, for the top of the config hierarchy
    pub fn config_overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            log_level: self.log_level,
            log_format: self.log_format,
            ..ConfigOverrides::default()
        };

        match &self.command {
            Commands::Inspect(args) => {
                overrides.backend = args.backend;
                overrides.mediainfo_binary = args.binary.clone();
                overrides.library_path = args.library.clone();
                overrides.timeout_secs = args.timeout;
                if args.extra {
                    overrides.with_extra = Some(true);
                }
            }
            Commands::Engine(args) => {
                overrides.backend = args.backend;
                overrides.mediainfo_binary = args.binary.clone();
                overrides.library_path = args.library.clone();
            }
        }

        overrides
    }
}
