//! store::factory
//!
//! Backend selection.
//!
//! # Design
//!
//! The backend is chosen exactly once, from configuration, when the process
//! starts. Handlers never branch on environment variables at call sites;
//! they hold a `dyn ContentStore` and do not know which implementation is
//! behind it.
//!
//! Selection rule:
//! - GitHub credentials configured → [`GitHubStore`]
//! - no credentials, development mode → [`LocalStore`] rooted at the
//!   current working directory
//!
//! The third case, production without credentials, never reaches this
//! module: `Config::from_env` rejects it before any store exists.

use std::sync::Arc;

use super::github::GitHubStore;
use super::local::LocalStore;
use super::traits::{ContentStore, StoreError};
use crate::config::Config;

/// Available store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote GitHub repository.
    GitHub,
    /// Local filesystem (development fallback).
    Local,
}

impl StoreBackend {
    /// Which backend a configuration selects.
    pub fn for_config(config: &Config) -> Self {
        if config.github.is_some() {
            StoreBackend::GitHub
        } else {
            StoreBackend::Local
        }
    }

    /// Backend name as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::GitHub => "github",
            StoreBackend::Local => "local",
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Build the content store a configuration selects.
pub fn create_store(config: &Config) -> Result<Arc<dyn ContentStore>, StoreError> {
    match StoreBackend::for_config(config) {
        StoreBackend::GitHub => {
            // Checked by StoreBackend::for_config.
            let github = config.github.as_ref().ok_or_else(|| {
                StoreError::InvalidRequest("github backend selected without credentials".into())
            })?;
            tracing::info!(owner = %github.owner, repo = %github.repo, branch = %github.branch, "using github store");
            Ok(Arc::new(GitHubStore::from_config(github)))
        }
        StoreBackend::Local => {
            let store = LocalStore::in_current_dir()?;
            tracing::info!(root = %store.root().display(), "using local store");
            Ok(Arc::new(store))
        }
    }
}
