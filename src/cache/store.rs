//! File-backed cache store for upstream JSON payloads
//!
//! Provides a `CacheStore` that keeps one `<fingerprint>.json` file per request.
//! The file's modification time is the only freshness reference: an entry older
//! than the TTL reads as a miss and is left on disk for the next write to replace.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use log::{debug, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::CacheKey;

/// File suffix for cache entries
const CACHE_SUFFIX: &str = "json";

/// Directory used when no XDG cache directory can be determined
const FALLBACK_CACHE_DIR: &str = "matchday_cache";

/// Failures inside the cache. These are logged and never reach the caller.
#[derive(Debug, Error)]
pub enum CacheError {
    /// An entry exists but could not be read or is not valid JSON
    #[error("failed to read cache entry {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// The payload could not be written or moved into place
    #[error("failed to write cache entry {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// TTL-bounded store mapping a `CacheKey` to an opaque JSON payload
///
/// Writes go to a temporary file in the cache directory and are renamed over
/// the final path, so a concurrent `lookup` sees either the old entry or the
/// new one, never a partial file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// Age after which an entry reads as a miss
    ttl: Duration,
}

impl CacheStore {
    /// Creates a store rooted at `cache_dir`. The directory is created lazily on first write.
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
        }
    }

    /// Returns the XDG-compliant default cache directory
    ///
    /// Uses `~/.cache/matchday/` on Linux, or `./matchday_cache` when no home
    /// directory can be determined.
    pub fn default_dir() -> PathBuf {
        ProjectDirs::from("", "", "matchday")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
    }

    /// Returns the path of the file backing `key`
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", key.as_str(), CACHE_SUFFIX))
    }

    /// Returns the payload stored under `key` if it exists, is readable and is fresh
    pub fn lookup(&self, key: &CacheKey) -> Option<Vec<u8>> {
        self.lookup_at(key, SystemTime::now())
    }

    /// Same as [`lookup`](Self::lookup), with an explicit "now" for age computation
    pub fn lookup_at(&self, key: &CacheKey, now: SystemTime) -> Option<Vec<u8>> {
        match self.read_entry(key, now) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn read_entry(&self, key: &CacheKey, now: SystemTime) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(key);
        let read_err = |reason: String| CacheError::Read {
            path: path.clone(),
            reason,
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_err(e.to_string())),
        };

        let modified = metadata.modified().map_err(|e| read_err(e.to_string()))?;
        // An mtime in the future (clock skew) counts as age zero
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age > self.ttl {
            debug!("Cache expired for {} (age={}s)", path.display(), age.as_secs());
            return Ok(None);
        }

        let payload = fs::read(&path).map_err(|e| read_err(e.to_string()))?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&payload)
            .map_err(|e| read_err(format!("corrupt payload: {}", e)))?;

        Ok(Some(payload))
    }

    /// Writes `payload` under `key`, replacing any previous entry
    ///
    /// Failures are logged and swallowed: a cache that cannot be written must
    /// never fail the fetch that produced the data.
    pub fn store(&self, key: &CacheKey, payload: &[u8]) {
        if let Err(e) = self.write_entry(key, payload) {
            warn!("{}", e);
        }
    }

    fn write_entry(&self, key: &CacheKey, payload: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let write_err = |source: io::Error| CacheError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.cache_dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&self.cache_dir).map_err(write_err)?;
        tmp.write_all(payload).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        debug!("Cached {} bytes at {}", payload.len(), path.display());
        Ok(())
    }
}
