//! store::traits
//!
//! The `ContentStore` trait and its error taxonomy.
//!
//! # Design
//!
//! A store persists complete article files and removes them, nothing more.
//! The trait is async because the primary implementation is a chain of
//! network calls. Which implementation backs the trait is decided once at
//! startup (see `store::factory`); handlers only ever see `dyn ContentStore`.
//!
//! Every upstream failure carries the [`CommitStep`] it happened in, so an
//! operator reading a log line knows exactly where a chain broke without
//! needing request-level tracing.

use async_trait::async_trait;
use thiserror::Error;

/// One file to be written, as its complete replacement contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// Repository-relative path. Must be pre-sanitized by the caller;
    /// never absolute, never containing `..` segments.
    pub path: String,
    /// Full UTF-8 text payload.
    pub content: String,
}

impl ContentFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// The logical step of a store operation that failed.
///
/// The commit chain runs the first six steps in order; the deletion chain
/// runs the last two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    /// Reading the branch tip SHA.
    RefLookup,
    /// Reading the tip commit to obtain the base tree SHA.
    CommitLookup,
    /// Creating a blob for one file's content.
    BlobCreate,
    /// Creating the new tree on top of the base tree.
    TreeCreate,
    /// Creating the new commit object.
    CommitCreate,
    /// Repointing the branch ref at the new commit.
    RefUpdate,
    /// Reading a file's metadata before deletion.
    FileLookup,
    /// Deleting a file via the contents API.
    FileDelete,
}

impl std::fmt::Display for CommitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CommitStep::RefLookup => "branch ref lookup",
            CommitStep::CommitLookup => "base commit lookup",
            CommitStep::BlobCreate => "blob creation",
            CommitStep::TreeCreate => "tree creation",
            CommitStep::CommitCreate => "commit creation",
            CommitStep::RefUpdate => "ref update",
            CommitStep::FileLookup => "file lookup",
            CommitStep::FileDelete => "file deletion",
        };
        write!(f, "{}", name)
    }
}

/// Errors from store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The request was malformed before any I/O happened.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid token, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The target does not exist (deletion of an absent path).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The API returned a non-success status.
    #[error("{step} failed: {status} - {message}")]
    ApiError {
        /// Which step of the chain failed.
        step: CommitStep,
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// The request never completed (connect failure, timeout).
    #[error("network error during {step}: {message}")]
    Network {
        /// Which step of the chain failed.
        step: CommitStep,
        /// Underlying client error, stringified.
        message: String,
    },

    /// The API responded with success but the body was not the expected shape.
    #[error("{step} returned an unreadable response: {message}")]
    MalformedResponse {
        /// Which step of the chain failed.
        step: CommitStep,
        /// Parse error detail.
        message: String,
    },

    /// Local filesystem failure (fallback store only).
    #[error("I/O error: {0}")]
    Io(String),
}

impl StoreError {
    /// The step this error occurred in, when known.
    pub fn step(&self) -> Option<CommitStep> {
        match self {
            StoreError::ApiError { step, .. }
            | StoreError::Network { step, .. }
            | StoreError::MalformedResponse { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// A persistence backend for article content.
///
/// # Contract
///
/// - `commit` turns a non-empty batch of file writes into exactly one new
///   revision, or fails leaving the branch untouched. Paths not named in
///   `files` are byte-identical before and after.
/// - `delete` removes exactly one existing file in one revision. Deleting an
///   absent path is `NotFound`, never a silent no-op.
///
/// No method retries. Any failure is terminal for that invocation.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Backend name for logs (e.g. "github", "local").
    fn name(&self) -> &'static str;

    /// Write all `files` as a single revision with the given message.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `files` is empty
    /// - `ApiError` / `Network` / `MalformedResponse` naming the failed step
    /// - `AuthFailed` on credential rejection
    async fn commit(&self, files: &[ContentFile], message: &str) -> Result<(), StoreError>;

    /// Remove the file at `path` in a single revision.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `path`
    /// - `ApiError` / `Network` naming the failed step
    async fn delete(&self, path: &str, message: &str) -> Result<(), StoreError>;
}
