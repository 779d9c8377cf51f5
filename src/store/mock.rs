//! store::mock
//!
//! Mock content store for deterministic testing.
//!
//! # Design
//!
//! Models the remote branch as an in-memory tree plus a linear commit log,
//! which lets tests assert the store contract directly: a successful commit
//! changes the tree only at the named paths, a failed one leaves it
//! byte-identical, and each commit records its parent.
//!
//! # Example
//!
//! ```
//! use kalem::store::mock::MockStore;
//! use kalem::store::{ContentFile, ContentStore};
//!
//! # tokio_test::block_on(async {
//! let store = MockStore::new();
//! store
//!     .commit(&[ContentFile::new("a.md", "X")], "add a")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(store.file("a.md").as_deref(), Some("X"));
//! assert_eq!(store.commits().len(), 1);
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{ContentFile, ContentStore, StoreError};

/// One revision recorded by the mock.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Synthetic SHA ("c1", "c2", ...).
    pub sha: String,
    /// Parent SHA, `None` for the first revision.
    pub parent: Option<String>,
    /// Commit message.
    pub message: String,
    /// Full tree snapshot after this revision.
    pub tree: BTreeMap<String, String>,
}

/// Recorded operation for call-count assertions.
#[derive(Debug, Clone)]
pub enum MockOperation {
    Commit { paths: Vec<String>, message: String },
    Delete { path: String, message: String },
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail `commit` with the given error, before mutating the tree.
    Commit(StoreError),
    /// Fail `delete` with the given error, before mutating the tree.
    Delete(StoreError),
}

/// Mock store for testing. Thread-safe; clones share state.
#[derive(Debug, Clone)]
pub struct MockStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug)]
struct MockStoreInner {
    tree: BTreeMap<String, String>,
    commits: Vec<CommitRecord>,
    operations: Vec<MockOperation>,
    fail_on: Option<FailOn>,
    next_sha: u64,
}

impl MockStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockStoreInner {
                tree: BTreeMap::new(),
                commits: Vec::new(),
                operations: Vec::new(),
                fail_on: None,
                next_sha: 1,
            })),
        }
    }

    /// Create a mock store with a pre-populated tree.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap();
            for (path, content) in files {
                inner.tree.insert(path.to_string(), content.to_string());
            }
        }
        store
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Current tree snapshot.
    pub fn tree(&self) -> BTreeMap<String, String> {
        self.inner.lock().unwrap().tree.clone()
    }

    /// Content of one file, if present.
    pub fn file(&self, path: &str) -> Option<String> {
        self.inner.lock().unwrap().tree.get(path).cloned()
    }

    /// All recorded revisions, oldest first.
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.inner.lock().unwrap().commits.clone()
    }

    /// SHA of the branch tip, if any revision exists.
    pub fn tip(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .commits
            .last()
            .map(|c| c.sha.clone())
    }

    /// All recorded operations, including failed ones.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    fn check_fail(&self, op: &str) -> Option<StoreError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::Commit(e)) if op == "commit" => Some(e.clone()),
            Some(FailOn::Delete(e)) if op == "delete" => Some(e.clone()),
            _ => None,
        }
    }

    fn record_revision(inner: &mut MockStoreInner, message: &str) {
        let sha = format!("c{}", inner.next_sha);
        inner.next_sha += 1;
        let parent = inner.commits.last().map(|c| c.sha.clone());
        let tree = inner.tree.clone();
        inner.commits.push(CommitRecord {
            sha,
            parent,
            message: message.to_string(),
            tree,
        });
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn commit(&self, files: &[ContentFile], message: &str) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.operations.push(MockOperation::Commit {
                paths: files.iter().map(|f| f.path.clone()).collect(),
                message: message.to_string(),
            });
        }

        if files.is_empty() {
            return Err(StoreError::InvalidRequest("empty file list".into()));
        }
        if let Some(err) = self.check_fail("commit") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        for file in files {
            inner.tree.insert(file.path.clone(), file.content.clone());
        }
        Self::record_revision(&mut inner, message);
        Ok(())
    }

    async fn delete(&self, path: &str, message: &str) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.operations.push(MockOperation::Delete {
                path: path.to_string(),
                message: message.to_string(),
            });
        }

        if let Some(err) = self.check_fail("delete") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.tree.remove(path).is_none() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Self::record_revision(&mut inner, message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::traits::CommitStep;

    #[tokio::test]
    async fn commit_applies_files_and_records_revision() {
        let store = MockStore::new();

        store
            .commit(&[ContentFile::new("a.md", "X")], "add a")
            .await
            .unwrap();

        assert_eq!(store.file("a.md").as_deref(), Some("X"));
        let commits = store.commits();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "add a");
        assert!(commits[0].parent.is_none());
    }

    #[tokio::test]
    async fn commits_chain_parents() {
        let store = MockStore::new();

        store
            .commit(&[ContentFile::new("a.md", "X")], "one")
            .await
            .unwrap();
        store
            .commit(&[ContentFile::new("b.md", "Y")], "two")
            .await
            .unwrap();

        let commits = store.commits();
        assert_eq!(commits[1].parent.as_deref(), Some(commits[0].sha.as_str()));
        assert_eq!(store.tip(), Some(commits[1].sha.clone()));
    }

    #[tokio::test]
    async fn failed_commit_leaves_tree_untouched() {
        let store = MockStore::with_files(&[("a.md", "X")]).fail_on(FailOn::Commit(
            StoreError::ApiError {
                step: CommitStep::TreeCreate,
                status: 500,
                message: "boom".into(),
            },
        ));

        let before = store.tree();
        let result = store.commit(&[ContentFile::new("a.md", "Y")], "m").await;

        assert!(result.is_err());
        assert_eq!(store.tree(), before);
        assert!(store.commits().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = MockStore::new();
        let result = store.delete("yok.md", "m").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(store.commits().is_empty());
    }

    #[tokio::test]
    async fn operations_recorded_even_on_failure() {
        let store = MockStore::new();
        let _ = store.commit(&[], "m").await;
        let _ = store.delete("yok.md", "m").await;

        let ops = store.operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], MockOperation::Commit { .. }));
        assert!(matches!(&ops[1], MockOperation::Delete { .. }));
    }

    #[test]
    fn store_name() {
        assert_eq!(MockStore::new().name(), "mock");
    }
}
