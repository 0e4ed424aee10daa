//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::toml_config::{Backend, InspectConfig, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::error::{InspectError, InspectResult};
use crate::utils::logging::{LogFormat, LogLevel};

pub const ENV_BACKEND: &str = "MEDIAMETA_BACKEND";
pub const ENV_BINARY: &str = "MEDIAMETA_BINARY";
pub const ENV_LIBRARY: &str = "MEDIAMETA_LIBRARY";
pub const ENV_WITH_EXTRA: &str = "MEDIAMETA_WITH_EXTRA";
pub const ENV_TIMEOUT: &str = "MEDIAMETA_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "MEDIAMETA_LOG_LEVEL";

/// Values given on the command line; `None` leaves the lower layers in effect
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub backend: Option<Backend>,
    pub mediainfo_binary: Option<PathBuf>,
    pub library_path: Option<PathBuf>,
    pub with_extra: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
}

/// Build the effective configuration with precedence CLI > Env > File > Defaults.
///
/// An explicit `config_path` must exist; otherwise `mediameta.toml` in the
/// working directory is used when present.
pub fn initialize_configuration(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> InspectResult<InspectConfig> {
    let mut config = match config_path {
        Some(path) => TomlConfigAdapter::load_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            TomlConfigAdapter::load_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => InspectConfig::default(),
    };

    apply_environment(&mut config, |name| std::env::var(name).ok())?;
    apply_overrides(&mut config, overrides);
    config.validate()?;

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Apply environment variables read through `lookup`
pub fn apply_environment(
    config: &mut InspectConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> InspectResult<()> {
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = lookup(ENV_BACKEND) {
        config.backend = value.parse()?;
    }
    if let Some(value) = lookup(ENV_BINARY) {
        config.mediainfo_binary = PathBuf::from(value);
    }
    if let Some(value) = lookup(ENV_LIBRARY) {
        config.library_path = Some(PathBuf::from(value));
    }
    if let Some(value) = lookup(ENV_WITH_EXTRA) {
        config.with_extra = parse_flag(ENV_WITH_EXTRA, &value)?;
    }
    if let Some(value) = lookup(ENV_TIMEOUT) {
        let seconds = value.trim().parse::<u64>().map_err(|e| InspectError::Config {
            message: format!("{}={:?}: {}", ENV_TIMEOUT, value, e),
        })?;
        config.timeout_secs = Some(seconds);
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = value.parse().map_err(|message| InspectError::Config {
            message: format!("{}: {}", ENV_LOG_LEVEL, message),
        })?;
    }

    Ok(())
}

/// Apply command-line overrides
pub fn apply_overrides(config: &mut InspectConfig, overrides: &ConfigOverrides) {
    if let Some(backend) = overrides.backend {
        config.backend = backend;
    }
    if let Some(binary) = &overrides.mediainfo_binary {
        config.mediainfo_binary = binary.clone();
    }
    if let Some(path) = &overrides.library_path {
        config.library_path = Some(path.clone());
    }
    if let Some(with_extra) = overrides.with_extra {
        config.with_extra = with_extra;
    }
    if let Some(seconds) = overrides.timeout_secs {
        config.timeout_secs = Some(seconds);
    }
    if let Some(level) = overrides.log_level {
        config.logging.level = level;
    }
    if let Some(format) = overrides.log_format {
        config.logging.format = format;
    }
}

fn parse_flag(name: &str, value: &str) -> InspectResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(InspectError::Config {
            message: format!("{}={:?} is not a boolean", name, value),
        }),
    }
}
