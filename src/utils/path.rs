//! Resource locator helpers
//!
//! A locator is either a filesystem path or a URL. Single-letter schemes are
//! Windows drive letters, not URLs.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{InspectError, InspectResult};

/// Parse the locator as a URL, if it is one
pub fn parse_url(locator: &str) -> Option<Url> {
    Url::parse(locator).ok().filter(|url| url.scheme().len() > 1)
}

/// Filesystem path the locator refers to; `None` for remote URLs
pub fn local_path(locator: &str) -> Option<PathBuf> {
    match parse_url(locator) {
        Some(url) if url.scheme() == "file" => url.to_file_path().ok(),
        Some(_) => None,
        None => Some(PathBuf::from(locator)),
    }
}

/// Display name of the resource: the last path segment, percent-decoded for URLs
pub fn display_name(locator: &str) -> String {
    if let Some(url) = parse_url(locator) {
        let last = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or_default();
        return percent_decode_str(last).decode_utf8_lossy().into_owned();
    }

    Path::new(locator)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| locator.to_string())
}

/// Fail with `NotFound` when a local locator does not exist. Remote URLs are
/// left for the engine to resolve.
pub fn ensure_input_exists(locator: &str) -> InspectResult<()> {
    match local_path(locator) {
        Some(path) if !path.exists() => Err(InspectError::NotFound {
            locator: locator.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Argument to hand to the engine: plain path for local resources, the URL
/// otherwise
pub fn engine_argument(locator: &str) -> String {
    match parse_url(locator) {
        Some(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|_| locator.to_string()),
        _ => locator.to_string(),
    }
}
