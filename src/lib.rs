//! mediameta
//!
//! Typed container, codec and stream metadata extracted with MediaInfo.
//!
//! Raw string fields are acquired from the engine (the `mediainfo`
//! executable or the MediaInfo shared library), decoded field by field into
//! typed values with known engine misreports corrected, and assembled into a
//! [`MetadataTree`]. A field that fails to decode falls back to its zero value
//! and is reported as a diagnostic; only acquisition failures abort.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod streams;
pub mod utils;

// Re-export commonly used types
pub use adapters::toml_config::{Backend, InspectConfig};
pub use app::container::{AppContainer, DefaultAppContainer};
pub use domain::model::{
    AudioTrack, Extra, GeneralInfo, MetadataTree, StreamKind, TimecodeTrack, Value, VideoTrack,
};
pub use error::{InspectError, InspectResult};
pub use streams::{AssembleOptions, Assembly, FieldDiagnostic};

/// Inspect a media file or URL with the default configuration (the
/// `mediainfo` executable on `PATH`, no extras)
pub async fn inspect(locator: &str) -> InspectResult<MetadataTree> {
    inspect_with(&InspectConfig::default(), locator).await
}

/// Inspect a media file or URL with an explicit configuration
pub async fn inspect_with(config: &InspectConfig, locator: &str) -> InspectResult<MetadataTree> {
    DefaultAppContainer::from_config(config)
        .inspect_interactor()
        .inspect(locator)
        .await
}
