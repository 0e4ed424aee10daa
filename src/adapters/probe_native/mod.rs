// MediaInfo library adapter - Interactive acquisition through libmediainfo

pub mod library;

use std::path::PathBuf;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::domain::model::{Extra, StreamKind};
use crate::error::{InspectError, InspectResult};
use crate::ports::*;
use crate::utils::path::{engine_argument, ensure_input_exists};

pub use library::{EngineHandle, InfoKind, MediaInfoLibrary};

/// Process-wide engine. Loaded on first use; a failed load is retried later.
static ENGINE: OnceCell<MediaInfoLibrary> = OnceCell::new();

fn engine(library_path: Option<&PathBuf>) -> InspectResult<&'static MediaInfoLibrary> {
    if let Some(path) = library_path {
        if !path.exists() {
            return Err(InspectError::EngineUnavailable {
                message: format!("MediaInfo library {} does not exist", path.display()),
            });
        }
    }

    let engine = ENGINE.get_or_try_init(|| MediaInfoLibrary::load(library_path.map(PathBuf::as_path)))?;
    if let Some(path) = library_path {
        if engine.location() != path.as_path() {
            warn!(
                "MediaInfo already loaded from {}, ignoring {}",
                engine.location().display(),
                path.display()
            );
        }
    }
    Ok(engine)
}

/// Field source backed by an open engine handle
pub struct NativeSource {
    handle: EngineHandle<'static>,
}

impl FieldSource for NativeSource {
    fn track_count(&self, kind: StreamKind) -> usize {
        self.handle.count(kind)
    }

    fn field_value(&self, kind: StreamKind, index: usize, field: &str) -> String {
        self.handle.get(kind, index, field, InfoKind::Text)
    }

    fn field_extra(&self, kind: StreamKind, index: usize, field: &str) -> Extra {
        Extra {
            measure: self.handle.get(kind, index, field, InfoKind::Measure),
            name_text: self.handle.get(kind, index, field, InfoKind::NameText),
            info: self.handle.get(kind, index, field, InfoKind::Info),
        }
    }
}

/// Probe adapter using the MediaInfo shared library
#[derive(Debug, Clone, Default)]
pub struct MediaInfoLibAdapter {
    library_path: Option<PathBuf>,
}

impl MediaInfoLibAdapter {
    /// Create an adapter that loads the library from the platform's default names
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the library from an explicit path instead
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }
}

#[async_trait]
impl ProbePort for MediaInfoLibAdapter {
    fn backend_name(&self) -> &'static str {
        "native"
    }

    async fn open(&self, locator: &str) -> InspectResult<Box<dyn FieldSource>> {
        ensure_input_exists(locator)?;

        let library_path = self.library_path.clone();
        let locator_owned = locator.to_string();
        let opened = tokio::task::spawn_blocking(move || -> InspectResult<NativeSource> {
            let engine = engine(library_path.as_ref())?;
            let mut handle = engine.handle()?;
            handle.open(&locator_owned, &engine_argument(&locator_owned))?;
            Ok(NativeSource { handle })
        })
        .await
        .map_err(|e| InspectError::OpenFailed {
            locator: locator.to_string(),
            message: format!("engine worker failed: {}", e),
        })??;

        debug!("Opened {} with the MediaInfo library", locator);
        Ok(Box::new(opened))
    }

    async fn engine_version(&self) -> InspectResult<String> {
        let library_path = self.library_path.clone();
        tokio::task::spawn_blocking(move || engine(library_path.as_ref())?.version())
            .await
            .map_err(|e| InspectError::EngineUnavailable {
                message: format!("engine worker failed: {}", e),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_explicit_missing_library_is_engine_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("clip.mov");
        std::fs::write(&media, b"x").unwrap();

        let adapter = MediaInfoLibAdapter::new().with_library_path(dir.path().join("libmediainfo.so.0"));
        let result = adapter.open(media.to_str().unwrap()).await;
        assert!(matches!(result, Err(InspectError::EngineUnavailable { .. })));

        let version = adapter.engine_version().await;
        assert!(matches!(version, Err(InspectError::EngineUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_missing_input_is_not_found() {
        let adapter = MediaInfoLibAdapter::new();
        let result = adapter.open("/definitely/not/here.mov").await;
        assert!(matches!(result, Err(InspectError::NotFound { .. })));
    }
}
