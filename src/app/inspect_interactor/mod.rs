// Inspect interactor - Orchestrates the metadata inspection use case

use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::model::*;
use crate::error::{InspectError, InspectResult};
use crate::ports::*;
use crate::streams::{assemble, AssembleOptions, Assembly, FieldDiagnostic};
use crate::utils::Utils;

/// Interactor for the metadata inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    options: AssembleOptions,
}

impl InspectInteractor {
    /// Create new inspect interactor with an injected probe port
    pub fn new(probe_port: Arc<dyn ProbePort>, options: AssembleOptions) -> Self {
        Self {
            probe_port,
            options,
        }
    }

    /// Name of the backend this interactor acquires through
    pub fn backend_name(&self) -> &'static str {
        self.probe_port.backend_name()
    }

    /// Inspect a resource and return its metadata tree
    pub async fn inspect(&self, locator: &str) -> InspectResult<MetadataTree> {
        Ok(self.inspect_report(locator).await?.tree)
    }

    /// Inspect a resource and keep the field diagnostics next to the tree.
    ///
    /// Field reads may be blocking engine calls, so assembly runs on the
    /// blocking pool. The opened source is released there before this
    /// returns.
    pub async fn inspect_report(&self, locator: &str) -> InspectResult<Assembly> {
        let started = Instant::now();
        debug!("Opening {} with the {} backend", locator, self.backend_name());

        let source = self.probe_port.open(locator).await?;
        let options = self.options;
        let locator_owned = locator.to_string();
        let assembly = tokio::task::spawn_blocking(move || {
            let assembly = assemble(source.as_ref(), &locator_owned, options);
            drop(source);
            assembly
        })
        .await
        .map_err(|e| InspectError::OpenFailed {
            locator: locator.to_string(),
            message: format!("assembly worker failed: {}", e),
        })?;

        debug!(
            "Inspected {} in {:.1} ms",
            locator,
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(assembly)
    }

    /// Execute an inspection request and render the summary
    pub async fn execute(&self, request: InspectRequest) -> InspectResult<InspectResponse> {
        info!("Inspecting {}", request.locator);
        let Assembly { tree, diagnostics } = self.inspect_report(&request.locator).await?;

        let summary = match request.format {
            ReportFormat::Json => format_as_json(&tree)?,
            ReportFormat::Yaml => format_as_yaml(&tree)?,
            ReportFormat::Text => format_as_text(&tree, request.with_extra),
        };

        Ok(InspectResponse {
            tree,
            diagnostics,
            summary,
        })
    }

    /// Version of the engine behind the probe port
    pub async fn engine_version(&self) -> InspectResult<String> {
        self.probe_port.engine_version().await
    }
}

/// Format the tree as JSON
pub fn format_as_json(tree: &MetadataTree) -> InspectResult<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Format the tree as YAML
pub fn format_as_yaml(tree: &MetadataTree) -> InspectResult<String> {
    Ok(serde_yaml::to_string(tree)?)
}

/// Format the tree as human-readable text. With `with_extra`, values carry
/// their unit of measure.
pub fn format_as_text(tree: &MetadataTree, with_extra: bool) -> String {
    fn show<T: std::fmt::Display>(value: &Value<T>, with_extra: bool) -> String {
        if with_extra {
            value.to_string()
        } else {
            value.val.to_string()
        }
    }

    let general = &tree.general;
    let mut output = String::new();

    let _ = writeln!(output, "Media File Information:");
    let _ = writeln!(output, "  File: {}", tree.file);
    let _ = writeln!(
        output,
        "  Container: {} {}",
        general.format.val, general.format_profile.val
    );
    let _ = writeln!(output, "  Duration: {}", Utils::format_seconds(general.duration.val));
    let _ = writeln!(
        output,
        "  File Size: {}",
        Utils::format_file_size(u64::try_from(general.file_size.val).unwrap_or_default())
    );
    let _ = writeln!(output, "  Overall Bitrate: {}", show(&general.bitrate, with_extra));
    if !general.encoded_date.is_zero() {
        let _ = writeln!(output, "  Encoded: {}", general.encoded_date.val);
    }
    let _ = writeln!(output, "  Total Tracks: {}", tree.total_tracks());

    if !tree.video_tracks.is_empty() {
        let _ = writeln!(output, "\nVideo Tracks ({}):", tree.video_tracks.len());
        for (i, track) in tree.video_tracks.iter().enumerate() {
            let _ = writeln!(
                output,
                "  Track #{}: {} {} {}x{} @ {:.3}fps, {}-bit {}",
                i,
                track.format.val,
                track.profile.val,
                track.width.val,
                track.height.val,
                track.frame_rate.val,
                track.bit_depth.val,
                track.chroma_subsampling.val
            );
        }
    }

    if !tree.audio_tracks.is_empty() {
        let _ = writeln!(output, "\nAudio Tracks ({}):", tree.audio_tracks.len());
        for (i, track) in tree.audio_tracks.iter().enumerate() {
            let _ = writeln!(
                output,
                "  Track #{}: {} {} channels, {}, {}",
                i,
                track.format.val,
                track.channels.val,
                show(&track.sampling_rate, with_extra),
                show(&track.bitrate, with_extra)
            );
        }
    }

    if !tree.timecode_tracks.is_empty() {
        let _ = writeln!(output, "\nTimecode Tracks ({}):", tree.timecode_tracks.len());
        for (i, track) in tree.timecode_tracks.iter().enumerate() {
            let _ = writeln!(
                output,
                "  Track #{}: first frame {} ({})",
                i, track.first_frame_timecode.val, track.settings.val
            );
        }
    }

    output
}

/// Rendering of an inspection report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for ReportFormat {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => Err(InspectError::Config {
                message: format!("unknown report format {:?}", other),
            }),
        }
    }
}

/// Request for metadata inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub locator: String,
    pub format: ReportFormat,
    /// Show units in the text report
    pub with_extra: bool,
}

impl InspectRequest {
    /// Create new inspect request with text output
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            format: ReportFormat::Text,
            with_extra: false,
        }
    }

    /// Create new inspect request with format
    pub fn with_format(locator: impl Into<String>, format: ReportFormat) -> Self {
        Self {
            format,
            ..Self::new(locator)
        }
    }
}

/// Response from metadata inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub tree: MetadataTree,
    pub diagnostics: Vec<FieldDiagnostic>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::probe_memory::{InMemoryProbeAdapter, MemorySource};

    fn interactor() -> InspectInteractor {
        let source = MemorySource::new()
            .with_track(StreamKind::General, &[("Format", "MPEG-4"), ("FileSize", "2097152"), ("Duration", "12.5")])
            .with_track(StreamKind::Video, &[("Format", "AVC"), ("Width", "1920"), ("Height", "1080"), ("BitDepth", "8")])
            .with_track(StreamKind::Audio, &[("Format", "AAC"), ("Channels", "2"), ("SamplingRate", "48000")]);
        let probe = InMemoryProbeAdapter::new().with_source("/media/clip.mp4", source);
        InspectInteractor::new(Arc::new(probe), AssembleOptions::default())
    }

    #[tokio::test]
    async fn test_text_report() {
        let response = interactor()
            .execute(InspectRequest::new("/media/clip.mp4"))
            .await
            .unwrap();

        assert!(response.summary.contains("File: clip.mp4"));
        assert!(response.summary.contains("File Size: 2.00 MB"));
        assert!(response.summary.contains("Duration: 00:12.500"));
        assert!(response.summary.contains("AVC  1920x1080"));
        assert!(response.summary.contains("AAC 2 channels, 48000"));
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_structured_reports() {
        let interactor = interactor();

        let json = interactor
            .execute(InspectRequest::with_format("/media/clip.mp4", ReportFormat::Json))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json.summary).unwrap();
        assert_eq!(value["video_tracks"][0]["width"]["val"], 1920);

        let yaml = interactor
            .execute(InspectRequest::with_format("/media/clip.mp4", ReportFormat::Yaml))
            .await
            .unwrap();
        assert!(yaml.summary.contains("file: clip.mp4"));
    }

    #[tokio::test]
    async fn test_open_failure_yields_no_tree() {
        let result = interactor().inspect("/media/other.mp4").await;
        assert!(matches!(result, Err(InspectError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_source_released_when_report_returns() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let released = Arc::new(AtomicUsize::new(0));
        let source = MemorySource::new()
            .with_track(StreamKind::General, &[("Format", "MPEG-4")])
            .on_release(Arc::clone(&released));
        let probe = InMemoryProbeAdapter::new().with_source("/media/clip.mp4", source);
        let interactor = InspectInteractor::new(Arc::new(probe), AssembleOptions::default());

        let before = released.load(Ordering::SeqCst);
        let report = interactor.inspect_report("/media/clip.mp4").await.unwrap();
        assert_eq!(report.tree.general.format.val, "MPEG-4");
        assert_eq!(released.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn test_report_format_names() {
        assert_eq!("YML".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
