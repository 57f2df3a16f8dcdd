// On-disk credential cache.
//
// One structured JSON file holds a map of account key -> cached verify
// response, so sessions for different accounts never clobber each other.
// The stored body is the verify endpoint's response byte-for-byte; the
// cache never re-serializes or normalizes it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

const CACHE_FILE: &str = "credentials.json";

/// One cached login, as written by `complete_login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedLogin {
    /// Raw verify-endpoint response body.
    pub body: String,
    pub saved_at: DateTime<Utc>,
}

/// Account-keyed credential cache backed by a single JSON file.
///
/// No locking: concurrent processes writing the same file race. That is
/// acceptable for a single-user desktop setup and must not be relied on
/// for multi-instance deployments.
#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    /// Cache at the platform cache directory (e.g. `~/.cache/purelink/`).
    pub fn new() -> Result<Self, Error> {
        let dirs = ProjectDirs::from("com", "purelink", "purelink").ok_or(Error::NoCacheDir)?;
        Ok(Self {
            path: dirs.cache_dir().join(CACHE_FILE),
        })
    }

    /// Cache rooted at a custom directory. Test seam.
    pub fn with_root(root: &Path) -> Self {
        Self {
            path: root.join(CACHE_FILE),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cache key for an account. Keyed by identity, not by the mere
    /// existence of a file, so a second account cannot silently pick up
    /// the first account's token.
    pub fn account_key(email: &str, country: &str) -> String {
        format!("{email}|{country}")
    }

    /// Look up the cached login for `key`. `Ok(None)` when the file or
    /// the entry doesn't exist.
    pub fn load(&self, key: &str) -> Result<Option<CachedLogin>, Error> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    /// Insert or replace the entry for `key` and persist the file.
    pub fn store(&self, key: &str, body: &str) -> Result<(), Error> {
        let mut entries = self.read_entries()?;
        entries.insert(
            key.to_owned(),
            CachedLogin {
                body: body.to_owned(),
                saved_at: Utc::now(),
            },
        );
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "credential cache updated");
        Ok(())
    }

    /// Remove the entry for `key`. Returns whether an entry was present.
    pub fn remove(&self, key: &str) -> Result<bool, Error> {
        let mut entries = self.read_entries()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.write_entries(&entries)?;
        }
        Ok(removed)
    }

    fn read_entries(&self) -> Result<HashMap<String, CachedLogin>, Error> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(Error::Cache(e)),
        };
        serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
            message: format!("corrupt credential cache: {e}"),
            body: raw,
        })
    }

    fn write_entries(&self, entries: &HashMap<String, CachedLogin>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
