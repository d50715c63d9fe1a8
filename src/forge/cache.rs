//! File cache for per-organization repository listings.
//!
//! One pretty-printed JSON file per `(host, organization)` pair, named
//! `{host}_{organization}.json` with both parts lower-cased. Files are
//! replaced wholesale through a temporary file and rename, so a concurrent
//! reader never observes a half-written listing. Two processes refreshing
//! the same organization still race whole-file: last writer wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::forge::error::CacheError;
use crate::forge::types::Repository;

/// A deserialized cache file together with its age.
#[derive(Debug)]
pub struct CacheEntry {
    pub repositories: Vec<Repository>,
    /// Time since the file was last written.
    pub age: Duration,
}

pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
}

impl Cache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Whether an entry is recent enough to be used without a refetch.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.age <= self.ttl
    }

    /// Loads the cached listing for an organization.
    ///
    /// Any failure (missing file, unreadable file, unparseable JSON) is a
    /// cache miss, not an error; the caller refetches and overwrites.
    pub fn load(&self, host: &str, organization: &str) -> Option<CacheEntry> {
        let path = self.entry_path(host, organization);
        let age = file_age(&path)?;

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!("cache read failed for {}: {}", path.display(), err);
                return None;
            }
        };

        let repositories = match serde_json::from_str(&raw) {
            Ok(repositories) => repositories,
            Err(err) => {
                warn!("discarding corrupt cache file {}: {}", path.display(), err);
                return None;
            }
        };

        debug!(
            "{} cache was written {} seconds ago",
            organization,
            age.as_secs()
        );
        Some(CacheEntry { repositories, age })
    }

    /// Replaces the cached listing for an organization.
    pub fn save(
        &self,
        host: &str,
        organization: &str,
        repositories: &[Repository],
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(host, organization);
        debug!("updating cache file {}", path.display());

        let json = serde_json::to_string_pretty(repositories)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&path).map_err(|err| CacheError::Io(err.error))?;
        Ok(())
    }

    fn entry_path(&self, host: &str, organization: &str) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.json",
            host.to_lowercase(),
            organization.to_lowercase()
        ))
    }
}

fn file_age(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    modified.elapsed().ok()
}
