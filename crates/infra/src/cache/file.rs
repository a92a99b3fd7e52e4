//! File-backed session cache
//!
//! Persists the advisory [`CachedSession`] entry as a small JSON file so
//! the UI can make its first render decision before the authoritative
//! session resolves. The entry is best-effort on the read side: a missing
//! or corrupt file loads as absent rather than failing, because nothing
//! authoritative is ever built from it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use studyloop_core::auth::ports::SessionCache;
use studyloop_domain::{AuthError, CachedSession, Result};
use tracing::{debug, warn};

/// JSON-file implementation of [`SessionCache`].
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    /// Create a cache backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionCache for FileSessionCache {
    async fn load(&self) -> Result<Option<CachedSession>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AuthError::Cache(format!("failed to read session cache: {err}")))
            }
        };

        match serde_json::from_str::<CachedSession>(&contents) {
            Ok(entry) => Ok(Some(entry)),
            Err(err) => {
                // Advisory data only; treat corruption as absence.
                warn!(path = %self.path.display(), error = %err, "session cache corrupt, ignoring");
                Ok(None)
            }
        }
    }

    async fn store(&self, entry: CachedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                AuthError::Cache(format!("failed to create cache directory: {err}"))
            })?;
        }

        let contents = serde_json::to_string(&entry)
            .map_err(|err| AuthError::Cache(format!("failed to encode session cache: {err}")))?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|err| AuthError::Cache(format!("failed to write session cache: {err}")))?;

        debug!(path = %self.path.display(), "session cache updated");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cache cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Cache(format!("failed to clear session cache: {err}"))),
        }
    }
}
