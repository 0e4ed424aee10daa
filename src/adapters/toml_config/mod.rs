// TOML config adapter - Configuration management using TOML files

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::probe_cli::DEFAULT_BINARY;
use crate::error::{InspectError, InspectResult};
use crate::utils::logging::LoggingConfig;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "mediameta.toml";

/// Acquisition backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Bulk acquisition through the `mediainfo` executable
    #[default]
    Cli,
    /// Interactive acquisition through the MediaInfo shared library
    Native,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Cli => "cli",
            Backend::Native => "native",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cli" => Ok(Backend::Cli),
            "native" | "lib" | "library" => Ok(Backend::Native),
            other => Err(InspectError::Config {
                message: format!("unknown backend {:?} (expected cli or native)", other),
            }),
        }
    }
}

/// Inspection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    pub backend: Backend,
    /// Executable used by the CLI backend
    pub mediainfo_binary: PathBuf,
    /// Shared library used by the native backend; platform names when unset
    pub library_path: Option<PathBuf>,
    /// Look up unit, label and description for every field
    pub with_extra: bool,
    /// Upper bound for one engine run, in seconds
    pub timeout_secs: Option<u64>,
    pub logging: LoggingConfig,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            mediainfo_binary: PathBuf::from(DEFAULT_BINARY),
            library_path: None,
            with_extra: false,
            timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl InspectConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> InspectResult<()> {
        if self.mediainfo_binary.as_os_str().is_empty() {
            return Err(InspectError::Config {
                message: "mediainfo_binary must not be empty".to_string(),
            });
        }
        if self.timeout_secs == Some(0) {
            return Err(InspectError::Config {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Load and validate a config file
    pub fn load_file(path: &Path) -> InspectResult<InspectConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| InspectError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        debug!("Loading configuration from {}", path.display());
        Self::parse_str(&content).map_err(|e| match e {
            InspectError::Config { message } => InspectError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse and validate config text
    pub fn parse_str(content: &str) -> InspectResult<InspectConfig> {
        let config: InspectConfig = toml::from_str(content).map_err(|e| InspectError::Config {
            message: format!("invalid TOML config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize a config, e.g. to print the effective settings
    pub fn to_toml_string(config: &InspectConfig) -> InspectResult<String> {
        toml::to_string_pretty(config).map_err(|e| InspectError::Config {
            message: format!("failed to serialize config: {}", e),
        })
    }
}
