//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::adapters::toml_config::Backend;
use crate::app::ReportFormat;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Media file path or URL (a saved JSON document with --from-json)
    pub input: String,

    /// Acquisition backend (cli, native)
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Report format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,

    /// Include unit, label and description for every field
    #[arg(long)]
    pub extra: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Treat the input as saved `mediainfo --Output=JSON` output
    #[arg(long)]
    pub from_json: bool,

    /// mediainfo executable for the cli backend
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// MediaInfo shared library for the native backend
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,
}

/// Arguments for the engine command
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Acquisition backend (cli, native)
    #[arg(long)]
    pub backend: Option<Backend>,

    /// mediainfo executable for the cli backend
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// MediaInfo shared library for the native backend
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,
}
