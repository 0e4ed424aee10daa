// In-memory probe adapter - Interactive-style provider backed by plain maps

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::model::{Extra, StreamKind};
use crate::error::{InspectError, InspectResult};
use crate::ports::*;

#[derive(Debug, Clone, Default)]
struct MemoryTrack {
    values: HashMap<String, String>,
    extras: HashMap<String, Extra>,
}

/// Field source holding per-kind track records in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tracks: HashMap<StreamKind, Vec<MemoryTrack>>,
    release_counter: Option<Arc<AtomicUsize>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track of `kind` with the given raw fields
    pub fn with_track(mut self, kind: StreamKind, fields: &[(&str, &str)]) -> Self {
        self.push_track(kind, fields);
        self
    }

    /// Append a track of `kind` with the given raw fields
    pub fn push_track(&mut self, kind: StreamKind, fields: &[(&str, &str)]) {
        let values = fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.tracks.entry(kind).or_default().push(MemoryTrack {
            values,
            extras: HashMap::new(),
        });
    }

    /// Attach extra metadata to a field of an existing track
    pub fn with_extra(mut self, kind: StreamKind, index: usize, field: &str, extra: Extra) -> Self {
        if let Some(track) = self.tracks.get_mut(&kind).and_then(|t| t.get_mut(index)) {
            track.extras.insert(field.to_string(), extra);
        }
        self
    }

    /// Count every drop of this source (and its clones) in `counter`
    pub fn on_release(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.release_counter = Some(counter);
        self
    }

    fn track(&self, kind: StreamKind, index: usize) -> Option<&MemoryTrack> {
        self.tracks.get(&kind).and_then(|tracks| tracks.get(index))
    }
}

impl FieldSource for MemorySource {
    fn track_count(&self, kind: StreamKind) -> usize {
        self.tracks.get(&kind).map_or(0, Vec::len)
    }

    fn field_value(&self, kind: StreamKind, index: usize, field: &str) -> String {
        self.track(kind, index)
            .and_then(|track| track.values.get(field))
            .cloned()
            .unwrap_or_default()
    }

    fn field_extra(&self, kind: StreamKind, index: usize, field: &str) -> Extra {
        self.track(kind, index)
            .and_then(|track| track.extras.get(field))
            .cloned()
            .unwrap_or_default()
    }
}

impl Drop for MemorySource {
    fn drop(&mut self) {
        if let Some(counter) = &self.release_counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Probe adapter serving registered in-memory sources by locator
#[derive(Debug, Clone, Default)]
pub struct InMemoryProbeAdapter {
    sources: HashMap<String, MemorySource>,
}

impl InMemoryProbeAdapter {
    /// Create an adapter with no registered sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source returned for `locator`
    pub fn with_source(mut self, locator: &str, source: MemorySource) -> Self {
        self.sources.insert(locator.to_string(), source);
        self
    }
}

#[async_trait]
impl ProbePort for InMemoryProbeAdapter {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn open(&self, locator: &str) -> InspectResult<Box<dyn FieldSource>> {
        match self.sources.get(locator) {
            Some(source) => Ok(Box::new(source.clone())),
            None => Err(InspectError::NotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn engine_version(&self) -> InspectResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }
}
