//! Flat-file cache for fetched playlist text
//!
//! Entries are stored byte-for-byte under `<directory>/<sha256(source)>.txt`.
//! There is no expiry; a cached copy lives until it is force-cleared.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How a load interacts with the cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Bypass the cache entirely
    No,
    /// Serve from the cache, populating it on a miss
    #[default]
    Use,
    /// Drop the cached copy, then behave like `Use`
    ForceClear,
}

impl std::str::FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(Self::No),
            "use" | "yes" => Ok(Self::Use),
            "force_clear" | "force-clear" => Ok(Self::ForceClear),
            other => Err(format!("unknown cache mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceCache {
    directory: PathBuf,
}

impl SourceCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Cache key for a source location
    pub fn key_for(source: &str) -> String {
        let digest = Sha256::digest(source.as_bytes());
        format!("{:x}", digest)
    }

    pub fn path_for(&self, source: &str) -> PathBuf {
        self.directory.join(format!("{}.txt", Self::key_for(source)))
    }

    /// Cached text for `source`, `None` on a miss
    pub fn read(&self, source: &str) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(source)) {
            Ok(content) => {
                debug!("Cache hit for {}", source);
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss for {}", source);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn write(&self, source: &str, content: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(source);
        std::fs::write(&path, content)?;
        debug!("Cached {} bytes for {} at {}", content.len(), source, path.display());
        Ok(path)
    }

    /// Remove the cached copy of `source`. Returns whether one existed.
    pub fn clear(&self, source: &str) -> std::io::Result<bool> {
        match std::fs::remove_file(self.path_for(source)) {
            Ok(()) => {
                info!("Cleared cached copy of {}", source);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove every cached playlist. Returns the number of files removed.
    pub fn clear_all(&self) -> std::io::Result<usize> {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        info!(
            "Cleared {} cached playlists from {}",
            removed,
            self.directory.display()
        );
        Ok(removed)
    }
}
