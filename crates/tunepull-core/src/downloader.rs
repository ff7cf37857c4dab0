//! Asset downloader: walk the manifest in order and fetch each item's audio,
//! cover and lyric files into the output directory.
//!
//! Items are processed one at a time. A failing asset is logged against its
//! item and the run moves on; only an unreadable manifest stops the batch.

use crate::asset::{asset_path, AssetKind};
use crate::http::{self, HttpOptions};
use crate::manifest::{self, PlaylistItem};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// One asset that could not be saved.
#[derive(Debug, Clone)]
pub struct FailedAsset {
    /// 1-based position in the manifest.
    pub index: usize,
    pub name: String,
    /// None when the record itself could not be decoded.
    pub kind: Option<AssetKind>,
    pub error: String,
}

/// Outcome of a full run.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub total: usize,
    pub saved: Vec<PathBuf>,
    pub failed: Vec<FailedAsset>,
}

/// Create `dir` (and parents) if missing. Returns true when it was created.
pub fn ensure_output_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    Ok(true)
}

/// Fetch one asset of `kind` from `src` and save it under `dir`.
///
/// Audio and cover URLs get one redirect hop resolved first; the extension is
/// taken from the resolved URL.
pub fn fetch_asset(
    kind: AssetKind,
    src: &str,
    dir: &Path,
    name: &str,
    opts: HttpOptions,
) -> Result<PathBuf> {
    let url = if kind.resolves_redirect() {
        http::resolve_redirect(src, opts)
            .with_context(|| format!("resolving {} url {}", kind, src))?
    } else {
        src.to_string()
    };
    if url != src {
        tracing::debug!(%kind, from = %src, to = %url, "redirect resolved");
    }

    let dest = asset_path(dir, name, &kind.extension_for(&url));
    let bytes = http::download_to(&url, &dest, opts)
        .with_context(|| format!("downloading {} from {}", kind, url))?;
    tracing::debug!(%kind, bytes, path = %dest.display(), "asset written");
    Ok(dest)
}

/// Best-effort display name of a raw manifest entry, for log lines.
fn entry_name(entry: &Value) -> String {
    match entry.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn process_entry(
    entry: Value,
    index: usize,
    total: usize,
    dir: &Path,
    opts: HttpOptions,
    report: &mut DownloadReport,
) {
    let name = entry_name(&entry);
    tracing::info!("[{}/{}] processing: {}", index, total, name);

    let item = match PlaylistItem::from_value(entry) {
        Ok(item) => item,
        Err(err) => {
            tracing::error!("[{}/{}] error processing {}: {}", index, total, name, err);
            report.failed.push(FailedAsset {
                index,
                name,
                kind: None,
                error: err.to_string(),
            });
            return;
        }
    };

    for kind in AssetKind::ALL {
        let Some(src) = item.asset_url(kind) else {
            continue;
        };
        match fetch_asset(kind, src, dir, &item.name, opts) {
            Ok(path) => {
                tracing::info!("[{}/{}] {} saved: {}", index, total, kind, file_name(&path));
                report.saved.push(path);
            }
            Err(err) => {
                tracing::error!(
                    "[{}/{}] error processing {} ({}): {:#}",
                    index,
                    total,
                    item.name,
                    kind,
                    err
                );
                report.failed.push(FailedAsset {
                    index,
                    name: item.name.clone(),
                    kind: Some(kind),
                    error: format!("{:#}", err),
                });
            }
        }
    }
}

/// Download every asset listed in the manifest at `manifest_path` into `output_dir`.
///
/// Fails only when the output directory cannot be created or the manifest
/// cannot be read as a JSON array.
pub fn download_all(
    manifest_path: &Path,
    output_dir: &Path,
    opts: HttpOptions,
) -> Result<DownloadReport> {
    if ensure_output_dir(output_dir)? {
        tracing::info!("created output directory {}", output_dir.display());
    }

    let entries = manifest::read_manifest(manifest_path)?;
    let total = entries.len();
    tracing::info!("found {} items, starting", total);

    let mut report = DownloadReport {
        total,
        ..Default::default()
    };
    for (i, entry) in entries.into_iter().enumerate() {
        process_entry(entry, i + 1, total, output_dir, opts, &mut report);
    }

    if report.failed.is_empty() {
        tracing::info!("all done ({} items)", total);
    } else {
        tracing::warn!(
            "all done ({} items, {} failed assets)",
            total,
            report.failed.len()
        );
    }
    Ok(report)
}
