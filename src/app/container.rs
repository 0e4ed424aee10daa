use std::sync::Arc;

use crate::adapters::toml_config::{Backend, InspectConfig};
use crate::adapters::{JsonFileProbeAdapter, MediaInfoCliAdapter, MediaInfoLibAdapter};
use crate::app::inspect_interactor::InspectInteractor;
use crate::ports::ProbePort;
use crate::streams::AssembleOptions;

pub trait AppContainer: Send + Sync {
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

pub struct DefaultAppContainer {
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    /// Wire the interactor to an explicit probe port
    pub fn new(probe_port: Arc<dyn ProbePort>, options: AssembleOptions) -> Self {
        Self {
            inspect_interactor: Arc::new(InspectInteractor::new(probe_port, options)),
        }
    }

    /// Wire the interactor to the backend selected in the configuration
    pub fn from_config(config: &InspectConfig) -> Self {
        Self::new(probe_for(config), options_for(config))
    }

    /// Wire the interactor to saved JSON documents instead of a live engine
    pub fn for_documents(config: &InspectConfig) -> Self {
        Self::new(Arc::new(JsonFileProbeAdapter::new()), options_for(config))
    }
}

impl AppContainer for DefaultAppContainer {
    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}

fn options_for(config: &InspectConfig) -> AssembleOptions {
    AssembleOptions {
        with_extra: config.with_extra,
    }
}

fn probe_for(config: &InspectConfig) -> Arc<dyn ProbePort> {
    match config.backend {
        Backend::Cli => {
            let mut adapter = MediaInfoCliAdapter::new(&config.mediainfo_binary);
            if let Some(timeout) = config.timeout() {
                adapter = adapter.with_timeout(timeout);
            }
            Arc::new(adapter)
        }
        Backend::Native => {
            let mut adapter = MediaInfoLibAdapter::new();
            if let Some(path) = &config.library_path {
                adapter = adapter.with_library_path(path);
            }
            Arc::new(adapter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let cli = DefaultAppContainer::from_config(&InspectConfig::default());
        assert_eq!(cli.inspect_interactor().backend_name(), "cli");

        let native = DefaultAppContainer::from_config(&InspectConfig {
            backend: Backend::Native,
            ..InspectConfig::default()
        });
        assert_eq!(native.inspect_interactor().backend_name(), "native");

        let documents = DefaultAppContainer::for_documents(&InspectConfig::default());
        assert_eq!(documents.inspect_interactor().backend_name(), "json");
    }
}
