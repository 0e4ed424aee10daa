// Ports - Interface definitions (contracts)

use async_trait::async_trait;

use crate::domain::model::{Extra, StreamKind};
use crate::error::InspectResult;

/// Raw per-track field values of one opened resource.
///
/// Implementations own whatever engine resource backs them and release it
/// when dropped.
pub trait FieldSource: Send {
    /// Number of tracks of the given kind
    fn track_count(&self, kind: StreamKind) -> usize;

    /// Raw value of a field; empty when the field is absent or inapplicable
    fn field_value(&self, kind: StreamKind, index: usize, field: &str) -> String;

    /// Descriptive metadata for a field; all-empty when not available
    fn field_extra(&self, _kind: StreamKind, _index: usize, _field: &str) -> Extra {
        Extra::default()
    }
}

/// Port for acquiring raw field values from an inspection engine
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Short backend name for logs and reports
    fn backend_name(&self) -> &'static str;

    /// Open a resource for inspection
    async fn open(&self, locator: &str) -> InspectResult<Box<dyn FieldSource>>;

    /// Version string of the underlying engine
    async fn engine_version(&self) -> InspectResult<String>;
}
