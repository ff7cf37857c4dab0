//! Asset kinds attached to a playlist item and where each one is saved.

use std::fmt;
use std::path::{Path, PathBuf};

/// One downloadable file belonging to a playlist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Audio,
    Cover,
    Lyric,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Audio, AssetKind::Cover, AssetKind::Lyric];

    /// Extension used when the URL path does not carry one.
    pub fn default_extension(self) -> &'static str {
        match self {
            AssetKind::Audio => ".mp3",
            AssetKind::Cover => ".jpg",
            AssetKind::Lyric => ".lrc",
        }
    }

    /// Lyric links are direct; audio and cover links may bounce through a 302.
    pub fn resolves_redirect(self) -> bool {
        !matches!(self, AssetKind::Lyric)
    }

    /// Extension for a file fetched from `url`.
    ///
    /// Lyrics are always saved as `.lrc`. Other kinds take the extension
    /// of the URL path, falling back to the kind's default.
    pub fn extension_for(self, url: &str) -> String {
        match self {
            AssetKind::Lyric => self.default_extension().to_string(),
            _ => extension_from_url(url).unwrap_or_else(|| self.default_extension().to_string()),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Audio => "audio",
            AssetKind::Cover => "cover",
            AssetKind::Lyric => "lyric",
        })
    }
}

/// Lowercased extension, dot included, of the last path segment of `url`.
///
/// Query and fragment are ignored. A segment starting with its only dot
/// (`.hidden`) or ending in a dot has no extension.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().rsplit('/').next()?;
    let dot = segment.rfind('.')?;
    if dot == 0 || dot + 1 == segment.len() {
        return None;
    }
    Some(segment[dot..].to_lowercase())
}

/// `<dir>/<name><ext>`. `name` is used verbatim; it may itself contain dots.
pub fn asset_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    dir.join(format!("{name}{ext}"))
}
