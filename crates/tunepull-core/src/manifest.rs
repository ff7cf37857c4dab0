//! The playlist manifest (`list.json`): record type, normalisation of the
//! raw endpoint response, and reading/writing the file.

use crate::asset::AssetKind;
use crate::sanitize::sanitize_name;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// One record of the manifest as consumed by the downloader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistItem {
    /// Track title, already in `"<title> - <artist>"` form and sanitized.
    pub name: String,
    /// Audio source location.
    #[serde(default)]
    pub url: Option<String>,
    /// Cover image source location.
    #[serde(default)]
    pub pic: Option<String>,
    /// Lyric file location.
    #[serde(default)]
    pub lrc: Option<String>,
}

impl PlaylistItem {
    /// Decode a single manifest entry.
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        serde_json::from_value(value).map_err(ManifestError::InvalidItem)
    }

    /// Source URL of `kind`, treating an empty string as absent.
    pub fn asset_url(&self, kind: AssetKind) -> Option<&str> {
        let url = match kind {
            AssetKind::Audio => &self.url,
            AssetKind::Cover => &self.pic,
            AssetKind::Lyric => &self.lrc,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("manifest content is not an array")]
    NotAnArray,
    #[error("playlist item {0} is null")]
    NullItem(usize),
    #[error("invalid playlist item: {0}")]
    InvalidItem(#[source] serde_json::Error),
}

/// A record whose name was rewritten by [`normalize_items`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub index: usize,
    pub original: String,
    pub replaced: String,
}

/// Result of normalising the endpoint response.
#[derive(Debug, Default)]
pub struct Normalized {
    /// False when the response was not an array and was left untouched.
    pub was_array: bool,
    pub renamed: Vec<Renamed>,
}

/// String form a loosely typed field takes when spliced into a name.
///
/// A missing field reads as `undefined`, `null` as `null`, arrays join their
/// elements with commas and whole-number floats drop their `.0`. Manifests in
/// the wild already carry names built this way, so the rendering stays stable.
fn display_field(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => display_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => display_field(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            return f.to_string();
        }
    }
    n.to_string()
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Rewrites the endpoint response in place into manifest form.
///
/// For every object item `name` becomes `"<name> - <artist>"`. Only items
/// that carry a truthy `artist` are then sanitized and lose the `artist`
/// field; an item without one keeps the literal `" - undefined"` suffix.
/// A `null` item aborts normalisation with the items before it already
/// rewritten. A response that is not an array is left as is.
pub fn normalize_items(root: &mut Value) -> Result<Normalized, ManifestError> {
    let Some(items) = root.as_array_mut() else {
        return Ok(Normalized::default());
    };

    let mut out = Normalized {
        was_array: true,
        renamed: Vec::new(),
    };

    for (index, item) in items.iter_mut().enumerate() {
        let obj = match item {
            Value::Object(obj) => obj,
            Value::Null => return Err(ManifestError::NullItem(index)),
            _ => continue,
        };

        let joined = format!(
            "{} - {}",
            display_field(obj.get("name")),
            display_field(obj.get("artist"))
        );
        obj.insert("name".to_string(), Value::String(joined.clone()));

        if !is_truthy(obj.get("artist")) {
            continue;
        }

        let replaced = sanitize_name(&joined).into_owned();
        if replaced != joined {
            tracing::info!(
                index,
                original = %joined,
                replaced = %replaced,
                "replaced illegal characters"
            );
            out.renamed.push(Renamed {
                index,
                original: joined,
                replaced: replaced.clone(),
            });
        }
        obj.insert("name".to_string(), Value::String(replaced));
        obj.shift_remove("artist");
    }

    Ok(out)
}

/// Serialize `root` with two-space indentation and overwrite `path`.
pub fn write_manifest(path: &Path, root: &Value) -> Result<()> {
    let formatted = serde_json::to_string_pretty(root).context("serialize manifest")?;
    fs::write(path, formatted)
        .with_context(|| format!("failed to write manifest {}", path.display()))?;
    Ok(())
}

/// Read `path` and return its entries. Entries are decoded later, one by one,
/// so a malformed record only affects itself.
pub fn read_manifest(path: &Path) -> Result<Vec<Value>, ManifestError> {
    let data = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })?;
    match serde_json::from_str::<Value>(&data).map_err(ManifestError::Parse)? {
        Value::Array(items) => Ok(items),
        _ => Err(ManifestError::NotAnArray),
    }
}
