//! store::github
//!
//! GitHub-backed content store using the git data REST API.
//!
//! # Design
//!
//! `commit` builds one atomic revision out of an arbitrary batch of file
//! writes. The chain is strictly sequential because every step consumes the
//! previous step's response:
//!
//! 1. `GET  git/refs/heads/{branch}`   — resolve the branch tip SHA
//! 2. `GET  git/commits/{tip}`         — resolve the base tree SHA
//! 3. `POST git/blobs`                 — one blob per file
//! 4. `POST git/trees`                 — new tree overlaying the base tree
//! 5. `POST git/commits`               — new commit, sole parent = the tip
//! 6. `PATCH git/refs/heads/{branch}`  — repoint the branch
//!
//! Only step 6 mutates shared state. A failure anywhere aborts the chain
//! immediately; blobs, trees, and commits created before the failure become
//! unreachable objects in GitHub's content-addressed store and are left
//! behind, so the branch itself is never observed in a partial state.
//!
//! `delete` uses the contents API instead: a metadata lookup supplies the
//! current blob SHA, which the DELETE call requires so a concurrently
//! rewritten file is not blindly removed.
//!
//! There are no retries anywhere. Two concurrent `commit` chains that both
//! resolve the same tip will both succeed, and the later ref update wins;
//! the earlier revision becomes unreachable. The ref update is deliberately
//! unconditioned on an expected prior SHA.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use async_trait::async_trait;

use super::traits::{CommitStep, ContentFile, ContentStore, StoreError};
use crate::config::GitHubConfig;

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "kalem";

/// Git file mode for regular non-executable files.
const FILE_MODE: &str = "100644";

/// GitHub-backed content store.
pub struct GitHubStore {
    /// HTTP client for making requests.
    client: Client,
    /// Bearer token, injected from configuration.
    token: String,
    /// Repository owner (user or organization).
    owner: String,
    /// Repository name.
    repo: String,
    /// Branch all operations target.
    branch: String,
    /// API base URL (overridable for tests).
    api_base: String,
}

// Custom Debug to keep the token out of logs.
impl std::fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStore")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GitHubStore {
    /// Create a store from repository coordinates and a token.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a store pointing at a custom API base URL.
    ///
    /// Used by tests to target a local mock server.
    pub fn with_api_base(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::new(token, owner, repo, branch)
        }
    }

    /// Create a store from loaded configuration.
    pub fn from_config(config: &GitHubConfig) -> Self {
        Self::new(
            config.token.clone(),
            config.owner.clone(),
            config.repo.clone(),
            config.branch.clone(),
        )
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Get the target branch.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| StoreError::AuthFailed("token contains invalid characters".into()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    fn ref_path(&self) -> String {
        format!("git/refs/heads/{}", self.branch)
    }

    /// Handle an API response, parsing the body on success and mapping the
    /// status on failure.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        step: CommitStep,
        response: Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| StoreError::MalformedResponse {
                    step,
                    message: e.to_string(),
                })
        } else {
            self.handle_error_response(step, response, status).await
        }
    }

    /// Map a non-success response to a `StoreError`.
    async fn handle_error_response<T>(
        &self,
        step: CommitStep,
        response: Response,
        status: StatusCode,
    ) -> Result<T, StoreError> {
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        // A 404 means "the deletion target does not exist" only when we are
        // looking up or deleting a file. During the commit chain it is an
        // upstream misconfiguration (wrong repo, missing branch, token scope)
        // and keeps its step like any other API failure.
        let target_absent = matches!(step, CommitStep::FileLookup | CommitStep::FileDelete);

        Err(match status {
            StatusCode::UNAUTHORIZED => StoreError::AuthFailed("invalid or expired token".into()),
            StatusCode::FORBIDDEN => StoreError::AuthFailed(format!("permission denied: {}", message)),
            StatusCode::NOT_FOUND if target_absent => StoreError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => StoreError::RateLimited,
            _ => StoreError::ApiError {
                step,
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        step: CommitStep,
        url: &str,
    ) -> Result<T, StoreError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                step,
                message: e.to_string(),
            })?;
        self.handle_response(step, response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        step: CommitStep,
        url: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                step,
                message: e.to_string(),
            })?;
        self.handle_response(step, response).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        step: CommitStep,
        url: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .client
            .patch(url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                step,
                message: e.to_string(),
            })?;
        self.handle_response(step, response).await
    }
}

#[async_trait]
impl ContentStore for GitHubStore {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn commit(&self, files: &[ContentFile], message: &str) -> Result<(), StoreError> {
        if files.is_empty() {
            return Err(StoreError::InvalidRequest("empty file list".into()));
        }

        // Step 1: resolve the branch tip.
        let tip: RefResponse = self
            .get_json(CommitStep::RefLookup, &self.repo_url(&self.ref_path()))
            .await?;
        let parent_sha = tip.object.sha;

        // Step 2: resolve the base tree from the tip commit.
        let base: CommitTreeResponse = self
            .get_json(
                CommitStep::CommitLookup,
                &self.repo_url(&format!("git/commits/{}", parent_sha)),
            )
            .await?;
        let base_tree_sha = base.tree.sha;

        // Step 3: one blob per file. Sequential; each creation is independent
        // and idempotent for identical content, so ordering is for simplicity,
        // not correctness.
        let blobs_url = self.repo_url("git/blobs");
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let blob: ShaResponse = self
                .post_json(
                    CommitStep::BlobCreate,
                    &blobs_url,
                    &CreateBlobBody {
                        content: &file.content,
                        encoding: "utf-8",
                    },
                )
                .await?;
            tracing::debug!(path = %file.path, sha = %blob.sha, "blob created");
            entries.push(TreeEntry {
                path: &file.path,
                mode: FILE_MODE,
                entry_type: "blob",
                sha: blob.sha,
            });
        }

        // Step 4: overlay the new entries onto the base tree. The host leaves
        // every path not named in `entries` untouched.
        let tree: ShaResponse = self
            .post_json(
                CommitStep::TreeCreate,
                &self.repo_url("git/trees"),
                &CreateTreeBody {
                    base_tree: &base_tree_sha,
                    tree: entries,
                },
            )
            .await?;

        // Step 5: new commit with the tip as sole parent.
        let commit: ShaResponse = self
            .post_json(
                CommitStep::CommitCreate,
                &self.repo_url("git/commits"),
                &CreateCommitBody {
                    message,
                    tree: &tree.sha,
                    parents: vec![parent_sha.as_str()],
                },
            )
            .await?;

        // Step 6: repoint the branch. The only mutation of shared state.
        let _: RefResponse = self
            .patch_json(
                CommitStep::RefUpdate,
                &self.repo_url(&self.ref_path()),
                &UpdateRefBody { sha: &commit.sha },
            )
            .await?;

        tracing::info!(
            branch = %self.branch,
            commit = %commit.sha,
            files = files.len(),
            "committed revision"
        );
        Ok(())
    }

    async fn delete(&self, path: &str, message: &str) -> Result<(), StoreError> {
        let contents_url = self.repo_url(&format!("contents/{}", path));

        // The contents API requires the current blob SHA, which doubles as a
        // guard against deleting a file that changed since we looked. The
        // lookup must name the branch; without `ref` the host reads the
        // default branch, whose SHA can be stale or absent.
        let meta: ShaResponse = self
            .get_json(
                CommitStep::FileLookup,
                &format!("{}?ref={}", contents_url, self.branch),
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => StoreError::NotFound(path.to_string()),
                other => other,
            })?;

        let response = self
            .client
            .delete(&contents_url)
            .headers(self.headers()?)
            .json(&DeleteFileBody {
                message,
                sha: &meta.sha,
                branch: &self.branch,
            })
            .send()
            .await
            .map_err(|e| StoreError::Network {
                step: CommitStep::FileDelete,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return self
                .handle_error_response(CommitStep::FileDelete, response, status)
                .await;
        }

        tracing::info!(branch = %self.branch, path = %path, "deleted file");
        Ok(())
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a blob.
#[derive(Serialize)]
struct CreateBlobBody<'a> {
    content: &'a str,
    encoding: &'static str,
}

/// One entry of a tree creation request.
#[derive(Serialize)]
struct TreeEntry<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    entry_type: &'static str,
    sha: String,
}

/// Request body for creating a tree.
#[derive(Serialize)]
struct CreateTreeBody<'a> {
    base_tree: &'a str,
    tree: Vec<TreeEntry<'a>>,
}

/// Request body for creating a commit.
#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
}

/// Request body for repointing a ref.
#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
}

/// Request body for deleting a file via the contents API.
#[derive(Serialize)]
struct DeleteFileBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Ref response: `{ "object": { "sha": ... } }`.
#[derive(Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

/// Commit response, reduced to the tree pointer.
#[derive(Deserialize)]
struct CommitTreeResponse {
    tree: ShaResponse,
}

/// Any response where only the `sha` field matters (blobs, trees, commits,
/// contents metadata).
#[derive(Deserialize)]
struct ShaResponse {
    sha: String,
}
