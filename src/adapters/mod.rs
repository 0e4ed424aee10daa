// Adapters - External system implementations

pub mod probe_cli;
pub mod probe_json;
pub mod probe_memory;
pub mod probe_native;
pub mod toml_config;

// Re-export adapters
pub use probe_cli::MediaInfoCliAdapter;
pub use probe_json::{JsonDocumentSource, JsonFileProbeAdapter};
pub use probe_memory::{InMemoryProbeAdapter, MemorySource};
pub use probe_native::MediaInfoLibAdapter;
pub use toml_config::TomlConfigAdapter;
