//! CLI for tunepull.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tunepull_core::config::{self, TunepullConfig};
use tunepull_core::http::HttpOptions;
use tunepull_core::logging;

use commands::{run_download, run_fetch_list};

/// Top-level CLI for tunepull.
#[derive(Debug, Parser)]
#[command(name = "tunepull")]
#[command(about = "Fetch a playlist manifest and download its audio, covers and lyrics")]
#[command(long_about = "Fetch a playlist manifest and download its audio, covers and \
lyrics.\n\n\
Run `tunepull fetch-list` once to write list.json, then `tunepull download` to \
save every asset under music/. Neither command needs flags; without them the \
configured endpoint, manifest and output directory are used.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the playlist from the endpoint and write the manifest.
    FetchList {
        /// Playlist URL (overrides `endpoint` in config.toml).
        #[arg(long)]
        endpoint: Option<String>,
        /// Manifest file to write (overrides `manifest_path`).
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },

    /// Download every asset listed in the manifest.
    Download {
        /// Manifest file to read (overrides `manifest_path`).
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,
        /// Directory receiving the files (overrides `output_dir`).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let loaded = config::load_or_init();
        let cfg = match &loaded {
            Ok((cfg, _)) => cfg.clone(),
            Err(_) => TunepullConfig::default(),
        };
        logging::init_logging(cfg.log_to_file);
        match loaded {
            Ok((_, true)) => {
                if let Ok(path) = config::config_path() {
                    tracing::info!("created default config at {}", path.display());
                }
            }
            Ok((_, false)) => tracing::debug!("loaded config: {:?}", cfg),
            Err(err) => tracing::warn!("using built-in config defaults: {:#}", err),
        }

        let opts = HttpOptions::from_secs(cfg.connect_timeout_secs);

        match cli.command {
            CliCommand::FetchList { endpoint, manifest } => {
                let endpoint = endpoint.unwrap_or(cfg.endpoint);
                let manifest = manifest.unwrap_or(cfg.manifest_path);
                run_fetch_list(&endpoint, &manifest, opts)?;
            }
            CliCommand::Download {
                manifest,
                output_dir,
            } => {
                let manifest = manifest.unwrap_or(cfg.manifest_path);
                let output_dir = output_dir.unwrap_or(cfg.output_dir);
                run_download(&manifest, &output_dir, opts)?;
            }
        }

        Ok(())
    }
}
