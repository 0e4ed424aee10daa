//! MediaInfo JSON document adapter
//!
//! Parses the bulk `--Output=JSON` document into per-kind track records. The
//! same parser serves saved documents on disk and live engine output.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::domain::model::StreamKind;
use crate::error::{InspectError, InspectResult};
use crate::ports::*;
use crate::utils::path::{ensure_input_exists, local_path};

const TRACK_TYPE: &str = "@type";

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(rename = "@ref", default)]
    reference: String,
    #[serde(default)]
    track: JsonValue,
}

/// Field source over a parsed MediaInfo JSON document
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentSource {
    reference: String,
    tracks: HashMap<StreamKind, Vec<HashMap<String, String>>>,
}

impl JsonDocumentSource {
    /// Parse a document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> InspectResult<Self> {
        let document: Document = serde_json::from_slice(bytes).map_err(|e| {
            InspectError::MalformedOutput {
                message: format!("invalid JSON document: {}", e),
            }
        })?;
        Self::from_document(document)
    }

    /// Parse a document from text
    pub fn from_text(text: &str) -> InspectResult<Self> {
        Self::from_slice(text.as_bytes())
    }

    /// Resource reference recorded by the engine (`media.@ref`)
    pub fn reference(&self) -> &str {
        &self.reference
    }

    fn from_document(document: Document) -> InspectResult<Self> {
        let media = document.media.ok_or_else(|| InspectError::MalformedOutput {
            message: "document has no media section".to_string(),
        })?;

        let records = match media.track {
            JsonValue::Array(items) => items,
            JsonValue::Object(item) => vec![JsonValue::Object(item)],
            JsonValue::Null => Vec::new(),
            other => {
                return Err(InspectError::MalformedOutput {
                    message: format!("unexpected track list: {}", other),
                })
            }
        };

        let mut source = Self {
            reference: media.reference,
            tracks: HashMap::new(),
        };

        for (position, record) in records.into_iter().enumerate() {
            let JsonValue::Object(record) = record else {
                return Err(InspectError::MalformedOutput {
                    message: format!("track {} is not an object", position),
                });
            };

            let type_name = record
                .get(TRACK_TYPE)
                .and_then(JsonValue::as_str)
                .ok_or_else(|| InspectError::MalformedOutput {
                    message: format!("track {} has no {} attribute", position, TRACK_TYPE),
                })?;

            match StreamKind::from_name(type_name) {
                Some(kind) => source
                    .tracks
                    .entry(kind)
                    .or_default()
                    .push(flatten_record(&record)),
                None => trace!("Skipping track {} of unknown type {:?}", position, type_name),
            }
        }

        debug!(
            "Parsed document for {:?}: {} records",
            source.reference,
            source.tracks.values().map(Vec::len).sum::<usize>()
        );
        Ok(source)
    }
}

/// Scalars become their textual form; nested objects such as `extra` are not
/// addressable fields and are dropped.
fn flatten_record(record: &Map<String, JsonValue>) -> HashMap<String, String> {
    record
        .iter()
        .filter_map(|(name, value)| {
            let text = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
                _ => return None,
            };
            Some((name.clone(), text))
        })
        .collect()
}

impl FieldSource for JsonDocumentSource {
    fn track_count(&self, kind: StreamKind) -> usize {
        self.tracks.get(&kind).map_or(0, Vec::len)
    }

    fn field_value(&self, kind: StreamKind, index: usize, field: &str) -> String {
        self.tracks
            .get(&kind)
            .and_then(|tracks| tracks.get(index))
            .and_then(|track| track.get(field))
            .cloned()
            .unwrap_or_default()
    }
}

/// Probe adapter that treats the locator as a saved MediaInfo JSON document
#[derive(Debug, Clone, Default)]
pub struct JsonFileProbeAdapter;

impl JsonFileProbeAdapter {
    /// Create a new document adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProbePort for JsonFileProbeAdapter {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn open(&self, locator: &str) -> InspectResult<Box<dyn FieldSource>> {
        ensure_input_exists(locator)?;
        let path: PathBuf = local_path(locator).ok_or_else(|| InspectError::OpenFailed {
            locator: locator.to_string(),
            message: "documents must be local files".to_string(),
        })?;

        debug!("Reading document {}", path.display());
        let bytes = tokio::fs::read(&path).await?;
        Ok(Box::new(JsonDocumentSource::from_slice(&bytes)?))
    }

    async fn engine_version(&self) -> InspectResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }
}
