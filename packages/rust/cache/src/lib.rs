//! Content-addressed on-disk cache for provider responses.
//!
//! Leaf files are JSON documents under a configurable root directory.
//! A key maps to exactly one stored value for the lifetime of the cache;
//! there is no invalidation API — stale entries are deleted out-of-band.

pub mod keys;

pub use keys::CacheKey;

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use lexisync_shared::{LexiSyncError, Result};

/// Outcome of a cache read, before any producer is consulted.
///
/// A present-but-unparsable entry is deliberately not a variant: it
/// surfaces as a fatal [`LexiSyncError::Cache`] instead of being silently
/// re-populated, since overwriting a corrupt entry can mask upstream bugs.
#[derive(Debug)]
pub enum Lookup<T> {
    /// A stored value exists under the key.
    Hit(T),
    /// No entry exists under the key.
    Miss,
}

/// On-disk JSON cache rooted at a base directory.
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    /// Create a cache over `root`. The directory tree is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the cache.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Return the stored value for `key`, or invoke `producer`, store its
    /// result under `key`, and return it.
    ///
    /// Producer failures propagate and leave no entry behind. A corrupt
    /// stored entry is a fatal error, never a repopulation.
    pub async fn get_with<T, F, Fut>(&self, key: &CacheKey, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.read(key)? {
            Lookup::Hit(value) => {
                debug!(%key, "cache hit");
                Ok(value)
            }
            Lookup::Miss => {
                debug!(%key, "cache miss");
                let value = producer().await?;
                self.write(key, &value)?;
                Ok(value)
            }
        }
    }

    /// Read the entry stored under `key`, if any.
    pub fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Lookup<T>> {
        let path = self.root.join(key.as_path());

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Lookup::Miss),
            Err(e) => return Err(LexiSyncError::io(path, e)),
        };

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            LexiSyncError::cache(format!("corrupt entry at {}: {e}", path.display()))
        })?;
        Ok(Lookup::Hit(value))
    }

    /// Store `value` under `key`, creating parent directories on demand.
    fn write<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let path = self.root.join(key.as_path());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LexiSyncError::io(parent, e))?;
        }

        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| LexiSyncError::cache(format!("encode {key}: {e}")))?;
        std::fs::write(&path, bytes).map_err(|e| LexiSyncError::io(path, e))
    }
}
