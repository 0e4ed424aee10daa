// MediaInfo CLI adapter - Bulk acquisition through the `mediainfo` executable

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::adapters::probe_json::JsonDocumentSource;
use crate::error::{InspectError, InspectResult};
use crate::ports::*;
use crate::utils::path::{engine_argument, ensure_input_exists};

/// Executable looked up on `PATH` when none is configured
pub const DEFAULT_BINARY: &str = "mediainfo";

/// Probe adapter that runs `mediainfo --Output=JSON` and parses its document
#[derive(Debug, Clone)]
pub struct MediaInfoCliAdapter {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl Default for MediaInfoCliAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl MediaInfoCliAdapter {
    /// Create an adapter for the given executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Abort engine runs that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Executable this adapter runs
    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    async fn run(&self, locator: &str, args: &[String]) -> InspectResult<Output> {
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running {} {:?}", self.binary.display(), args);
        let output = command.output();

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output)
                .await
                .map_err(|_| InspectError::Timeout {
                    locator: locator.to_string(),
                    seconds: limit.as_secs(),
                })?,
            None => output.await,
        };

        result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InspectError::EngineUnavailable {
                    message: format!("{} not found: {}", self.binary.display(), e),
                }
            } else {
                InspectError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ProbePort for MediaInfoCliAdapter {
    fn backend_name(&self) -> &'static str {
        "cli"
    }

    async fn open(&self, locator: &str) -> InspectResult<Box<dyn FieldSource>> {
        ensure_input_exists(locator)?;

        let args = vec!["--Output=JSON".to_string(), engine_argument(locator)];
        let output = self.run(locator, &args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(InspectError::OpenFailed {
                locator: locator.to_string(),
                message: if stderr.is_empty() {
                    format!("engine exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        debug!("Engine produced {} bytes for {}", output.stdout.len(), locator);
        Ok(Box::new(JsonDocumentSource::from_slice(&output.stdout)?))
    }

    async fn engine_version(&self) -> InspectResult<String> {
        let name = self.binary.display().to_string();
        let output = self.run(&name, &["--Version".to_string()]).await?;
        let text = String::from_utf8_lossy(&output.stdout);

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(str::to_string)
            .ok_or_else(|| InspectError::MalformedOutput {
                message: "engine printed no version".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_engine_unavailable() {
        let adapter = MediaInfoCliAdapter::new("/nonexistent/bin/mediainfo-missing");
        let result = adapter.engine_version().await;
        assert!(matches!(result, Err(InspectError::EngineUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_missing_input_checked_before_engine() {
        let adapter = MediaInfoCliAdapter::new("/nonexistent/bin/mediainfo-missing");
        let result = adapter.open("/definitely/not/here.mov").await;
        assert!(matches!(result, Err(InspectError::NotFound { .. })));
    }

    #[test]
    fn test_defaults() {
        let adapter = MediaInfoCliAdapter::default();
        assert_eq!(adapter.binary(), &PathBuf::from(DEFAULT_BINARY));
        assert_eq!(adapter.backend_name(), "cli");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_engine_output_is_parsed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("clip.mp4");
        std::fs::write(&media, b"not really video").unwrap();

        let script = dir.path().join("fake-mediainfo");
        std::fs::write(
            &script,
            "#!/bin/sh\necho '{\"media\":{\"@ref\":\"clip.mp4\",\"track\":[{\"@type\":\"General\",\"FileSize\":\"16\"}]}}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let adapter = MediaInfoCliAdapter::new(&script);
        let source = adapter.open(media.to_str().unwrap()).await.unwrap();
        assert_eq!(
            source.field_value(crate::domain::model::StreamKind::General, 0, "FileSize"),
            "16"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_engine_is_open_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("clip.mp4");
        std::fs::write(&media, b"x").unwrap();

        let script = dir.path().join("broken-mediainfo");
        std::fs::write(&script, "#!/bin/sh\necho 'cannot open' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let adapter = MediaInfoCliAdapter::new(&script);
        match adapter.open(media.to_str().unwrap()).await {
            Err(InspectError::OpenFailed { message, .. }) => assert_eq!(message, "cannot open"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[cfg(unix)]
    fn slow_engine(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("slow-mediainfo");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("clip.mp4");
        std::fs::write(&media, b"x").unwrap();

        let adapter = MediaInfoCliAdapter::new(slow_engine(dir.path(), "sleep 5"))
            .with_timeout(Duration::from_millis(300));

        let started = std::time::Instant::now();
        let result = adapter.open(media.to_str().unwrap()).await;
        assert!(matches!(result, Err(InspectError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dropped_inspection_kills_engine() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("clip.mp4");
        std::fs::write(&media, b"x").unwrap();
        let marker = dir.path().join("finished");

        let body = format!("sleep 1\ntouch '{}'", marker.display());
        let adapter = MediaInfoCliAdapter::new(slow_engine(dir.path(), &body));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(200), adapter.open(media.to_str().unwrap())).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
