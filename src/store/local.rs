//! store::local
//!
//! Local-filesystem fallback store.
//!
//! # Design
//!
//! Used only in development when no GitHub credentials are configured.
//! Writes go straight to disk under a root directory, creating parent
//! directories as needed. There is no atomicity beyond a single write
//! syscall and no revision history; this is a convenience shim, not a
//! durable store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::traits::{ContentFile, ContentStore, StoreError};

/// Filesystem-backed content store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory all repository-relative paths resolve under.
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store rooted at the current working directory, mirroring
    /// the repository layout.
    pub fn in_current_dir() -> Result<Self, StoreError> {
        let cwd = std::env::current_dir().map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self::new(cwd))
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl ContentStore for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn commit(&self, files: &[ContentFile], _message: &str) -> Result<(), StoreError> {
        if files.is_empty() {
            return Err(StoreError::InvalidRequest("empty file list".into()));
        }

        for file in files {
            let target = self.resolve(&file.path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io(e.to_string()))?;
            }
            tokio::fs::write(&target, &file.content)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
            tracing::debug!(path = %target.display(), "wrote local file");
        }

        tracing::info!(files = files.len(), "saved to local disk");
        Ok(())
    }

    async fn delete(&self, path: &str, _message: &str) -> Result<(), StoreError> {
        let target = self.resolve(path);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!(path = %target.display(), "deleted local file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}
