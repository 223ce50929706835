//! Local response cache backing offline mode.
//!
//! Successful JSON responses are written gzip-compressed under the cache
//! directory, one file per request path and query. In offline mode the
//! client reads from here instead of the network.

use crate::config;
use crate::error::{Result, SkinTrackerError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Stores and replays backend responses on the local filesystem.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    /// Directory where cached responses are stored.
    pub cache_dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `cache_dir`, or the platform default when `None`.
    ///
    /// Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    /// File that holds the response for a request path and query.
    pub fn entry_path(&self, path: &str, query: &[(&str, String)]) -> PathBuf {
        self.cache_dir.join(format!("{}.json.gz", cache_key(path, query)))
    }

    /// Write a response.
    ///
    /// The payload goes to a temp file in the cache directory first and is
    /// renamed on success, so readers never see a partial entry.
    pub fn store(&self, path: &str, query: &[(&str, String)], body: &str) -> Result<()> {
        let dest = self.entry_path(path, query);
        let tmp = NamedTempFile::new_in(&self.cache_dir)?;
        let mut encoder = GzEncoder::new(tmp, Compression::default());
        encoder.write_all(body.as_bytes())?;
        let tmp = encoder.finish()?;
        tmp.persist(&dest).map_err(|e| SkinTrackerError::Io(e.error))?;
        tracing::debug!(entry = %dest.display(), "cached response");
        Ok(())
    }

    /// Read a cached response body, or `None` on a miss.
    pub fn load(&self, path: &str, query: &[(&str, String)]) -> Result<Option<String>> {
        let entry = self.entry_path(path, query);
        if !entry.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&entry)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut body = String::new();
        match decoder.read_to_string(&mut body) {
            Ok(_) => Ok(Some(body)),
            Err(e) => {
                tracing::warn!(entry = %entry.display(), error = %e, "corrupt cache entry, removing");
                let _ = fs::remove_file(&entry);
                Err(SkinTrackerError::NotFound(format!(
                    "Cache entry '{}' was corrupt and has been removed. \
                     Retry online to re-fetch. Original error: {}",
                    entry.file_name().and_then(|n| n.to_str()).unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Drop a single entry, e.g. after it failed to decode.
    pub fn evict(&self, path: &str, query: &[(&str, String)]) {
        let _ = fs::remove_file(self.entry_path(path, query));
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        tracing::info!(dir = %self.cache_dir.display(), "response cache cleared");
        Ok(())
    }
}

/// Flatten a path and query into a file-system safe name.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_` and
/// two hex digits, so distinct requests never share an entry. Query pairs are
/// appended as `.name=value`.
///
/// `/prices/AK%2047/history` with `days=7` becomes
/// `prices_2FAK_252047_2Fhistory.days=7`.
fn cache_key(path: &str, query: &[(&str, String)]) -> String {
    let mut key = String::new();
    escape_into(&mut key, path.trim_matches('/'));
    if key.is_empty() {
        key.push('_');
    }
    for (name, value) in query {
        key.push('.');
        escape_into(&mut key, name);
        key.push('=');
        escape_into(&mut key, value);
    }
    key
}

fn escape_into(key: &mut String, raw: &str) {
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            key.push(byte as char);
        } else {
            key.push_str(&format!("_{:02X}", byte));
        }
    }
}
