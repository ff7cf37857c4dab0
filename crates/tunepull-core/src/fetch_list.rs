//! Manifest fetcher: download the playlist from the endpoint, normalise the
//! track names and overwrite the local manifest.

use crate::http::{self, HttpOptions};
use crate::manifest::{self, ManifestError, Normalized};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// What a successful fetch produced.
#[derive(Debug)]
pub struct FetchReport {
    /// Absolute path of the written manifest (or as given if it could not be made absolute).
    pub manifest_path: PathBuf,
    /// Number of records, or None when the response was not an array.
    pub item_count: Option<usize>,
    /// Records whose names needed illegal characters replaced.
    pub renamed: usize,
}

/// Parse an endpoint response and normalise it into manifest form.
pub fn build_manifest(body: &[u8]) -> Result<(Value, Normalized)> {
    let mut root: Value = serde_json::from_slice(body)
        .map_err(ManifestError::Parse)
        .context("playlist response")?;
    let report = manifest::normalize_items(&mut root)?;
    if !report.was_array {
        tracing::warn!("playlist response is not an array; writing it unmodified");
    }
    Ok((root, report))
}

/// Fetch `endpoint` and write the manifest to `manifest_path`.
///
/// Nothing is written when the request, the JSON parse or the normalisation
/// fails.
pub fn fetch_list(endpoint: &str, manifest_path: &Path, opts: HttpOptions) -> Result<FetchReport> {
    tracing::info!("requesting playlist from {}", endpoint);
    let body = http::get_body(endpoint, opts).context("playlist request failed")?;
    let (root, report) = build_manifest(&body)?;

    manifest::write_manifest(manifest_path, &root)?;

    let manifest_path =
        std::path::absolute(manifest_path).unwrap_or_else(|_| manifest_path.to_path_buf());
    tracing::info!("manifest saved to {}", manifest_path.display());

    Ok(FetchReport {
        manifest_path,
        item_count: root.as_array().map(Vec::len),
        renamed: report.renamed.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_manifest_normalises_array() {
        let body = br#"[{"name":"A|B","artist":"C","url":"http://x/1.mp3"}]"#;
        let (root, report) = build_manifest(body).unwrap();
        assert!(report.was_array);
        assert_eq!(report.renamed.len(), 1);
        assert_eq!(root[0]["name"], "A｜B - C");
        assert!(root[0].get("artist").is_none());
    }

    #[test]
    fn build_manifest_passes_through_object() {
        let (root, report) = build_manifest(br#"{"msg":"nope"}"#).unwrap();
        assert!(!report.was_array);
        assert_eq!(root["msg"], "nope");
    }

    #[test]
    fn build_manifest_rejects_invalid_json() {
        assert!(build_manifest(b"<html>").is_err());
    }

    #[test]
    fn build_manifest_null_item_is_error() {
        let err = build_manifest(br#"[null]"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ManifestError>(),
            Some(ManifestError::NullItem(0))
        ));
    }
}
