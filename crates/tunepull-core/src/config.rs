use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Playlist endpoint queried by `fetch-list` when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://meting.robnot.us.kg/meting/?type=playlist&id=9610937929";
pub const DEFAULT_MANIFEST: &str = "list.json";
pub const DEFAULT_OUTPUT_DIR: &str = "music";

/// Global configuration loaded from `~/.config/tunepull/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunepullConfig {
    /// URL returning the playlist as a JSON array.
    pub endpoint: String,
    /// Manifest written by `fetch-list` and read by `download`. Relative to the working directory.
    pub manifest_path: PathBuf,
    /// Directory receiving downloaded assets. Relative to the working directory.
    pub output_dir: PathBuf,
    /// Log to `~/.local/state/tunepull/tunepull.log` instead of stderr.
    #[serde(default)]
    pub log_to_file: bool,
    /// Optional connect timeout for every request (None = wait indefinitely).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for TunepullConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_to_file: false,
            connect_timeout_secs: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tunepull")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
///
/// Returns the config and whether a fresh default file was written.
pub fn load_or_init() -> Result<(TunepullConfig, bool)> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TunepullConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        return Ok((default_cfg, true));
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TunepullConfig = toml::from_str(&data)?;
    Ok((cfg, false))
}
