use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::HostError;

/// Mode for a regular (non-executable) file blob.
pub const FILE_MODE: &str = "100644";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub tree_sha: String,
    pub parents: Vec<String>,
}

/// One path of an overlay tree. Paths not listed are inherited from the base
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: FILE_MODE.to_string(),
            kind: "blob".to_string(),
            sha: sha.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// The Git data operations the editor needs from a repository host.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Full text of `path` at `reference`.
    async fn get_file(&self, path: &str, reference: &str) -> Result<String, HostError>;

    /// Commit sha the branch currently points at.
    async fn branch_tip(&self, branch: &str) -> Result<String, HostError>;

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo, HostError>;

    async fn create_blob(&self, content: &str) -> Result<String, HostError>;

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry])
        -> Result<String, HostError>;

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, HostError>;

    /// Move an existing branch to `sha`. Non-fast-forward moves are rejected.
    async fn update_ref(&self, branch: &str, sha: &str) -> Result<(), HostError>;

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<(), HostError>;

    /// Opens a pull request and returns its web URL.
    async fn create_pull_request(&self, request: &NewPullRequest) -> Result<String, HostError>;
}
