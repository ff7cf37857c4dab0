//! `tunepull download` – fetch every asset named in the manifest.

use anyhow::Result;
use std::path::Path;
use tunepull_core::downloader::download_all;
use tunepull_core::http::HttpOptions;

pub fn run_download(manifest: &Path, output_dir: &Path, opts: HttpOptions) -> Result<()> {
    let report = download_all(manifest, output_dir, opts)?;
    println!(
        "Processed {} item(s): {} file(s) saved, {} failed",
        report.total,
        report.saved.len(),
        report.failed.len()
    );
    for failed in &report.failed {
        let kind = failed
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "item".to_string());
        println!("  [{}] {} ({}): {}", failed.index, failed.name, kind, failed.error);
    }
    Ok(())
}
