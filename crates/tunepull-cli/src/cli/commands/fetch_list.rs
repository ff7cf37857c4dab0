//! `tunepull fetch-list` – refresh the manifest from the playlist endpoint.

use anyhow::Result;
use std::path::Path;
use tunepull_core::fetch_list::fetch_list;
use tunepull_core::http::HttpOptions;

pub fn run_fetch_list(endpoint: &str, manifest: &Path, opts: HttpOptions) -> Result<()> {
    let report = fetch_list(endpoint, manifest, opts)?;
    match report.item_count {
        Some(n) => println!(
            "Saved {} item(s) to {} ({} renamed)",
            n,
            report.manifest_path.display(),
            report.renamed
        ),
        None => println!(
            "Saved unrecognised response to {}",
            report.manifest_path.display()
        ),
    }
    Ok(())
}
