//! HTTP plumbing over libcurl: single-hop redirect resolution, a plain GET
//! for small JSON bodies, and streaming downloads to a file.
//!
//! Redirects are never followed automatically. Calls block the current thread.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;
use thiserror::Error;

/// Per-request knobs shared by every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpOptions {
    /// Connect timeout; None waits as long as the OS allows.
    pub connect_timeout: Option<Duration>,
}

impl HttpOptions {
    pub fn from_secs(connect_timeout_secs: Option<u64>) -> Self {
        Self {
            connect_timeout: connect_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

fn new_easy(url: &str, opts: HttpOptions) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(false)?;
    if let Some(timeout) = opts.connect_timeout {
        easy.connect_timeout(timeout)?;
    }
    Ok(easy)
}

/// Value of the first `Location` header among `lines`, if non-empty.
fn location_header(lines: &[String]) -> Option<&str> {
    lines.iter().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        let value = value.trim();
        (name.trim().eq_ignore_ascii_case("location") && !value.is_empty()).then_some(value)
    })
}

/// Makes a relative `Location` absolute against the URL that returned it.
fn absolute_location(base: &str, location: &str) -> String {
    url::Url::parse(base)
        .and_then(|b| b.join(location))
        .map(String::from)
        .unwrap_or_else(|_| location.to_string())
}

/// Sends a HEAD request and returns where a `302 Found` points.
///
/// Any other status, or a 302 without a `Location`, yields `url` unchanged.
/// Only one hop is looked at.
pub fn resolve_redirect(url: &str, opts: HttpOptions) -> Result<String, TransferError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = new_easy(url, opts)?;
    easy.nobody(true)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code == 302 {
        if let Some(location) = location_header(&headers) {
            return Ok(absolute_location(url, location));
        }
    }
    Ok(url.to_string())
}

/// GETs `url` and returns the whole body. Used for the playlist endpoint.
///
/// The body is returned whatever the status; an error status only logs a
/// warning, since endpoints send their JSON error objects that way.
pub fn get_body(url: &str, opts: HttpOptions) -> Result<Vec<u8>, TransferError> {
    let mut body = Vec::new();
    let mut easy = new_easy(url, opts)?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        tracing::warn!("GET {} returned HTTP {}", url, code);
    }
    Ok(body)
}

/// Removes the destination file on drop unless the download was kept.
struct PartialFile<'a> {
    path: &'a Path,
    keep: bool,
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_file(self.path);
        }
    }
}

/// Streams the body of `url` into `dest`, creating or truncating it.
///
/// On any failure the partially written file is removed (best effort) and
/// the error returned. A non-2xx status counts as a failure too, so error
/// pages are never saved as assets. Returns the number of bytes written.
pub fn download_to(url: &str, dest: &Path, opts: HttpOptions) -> Result<u64, TransferError> {
    let io_err = |source: io::Error| TransferError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let file = File::create(dest).map_err(io_err)?;
    let mut guard = PartialFile {
        path: dest,
        keep: false,
    };
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;
    let mut write_error: Option<io::Error> = None;

    let mut easy = new_easy(url, opts)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match writer.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(io_err(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Status {
            url: url.to_string(),
            code,
        });
    }

    writer.flush().map_err(io_err)?;
    drop(writer);
    guard.keep = true;
    Ok(written)
}
