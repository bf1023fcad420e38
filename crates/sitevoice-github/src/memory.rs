use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use crate::{CommitInfo, HostError, NewPullRequest, SourceHost, TreeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    GetFile,
    BranchTip,
    GetCommit,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
    CreateRef,
    CreatePullRequest,
}

/// One recorded call. `target` is the path, branch or sha the call named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCall {
    pub op: HostOp,
    pub target: String,
}

#[derive(Default)]
struct Repo {
    blobs: HashMap<String, String>,
    trees: HashMap<String, BTreeMap<String, String>>,
    commits: HashMap<String, CommitInfo>,
    messages: HashMap<String, String>,
    refs: HashMap<String, String>,
    pulls: Vec<NewPullRequest>,
    calls: Vec<HostCall>,
    failures: HashMap<HostOp, HostError>,
    counter: u64,
}

impl Repo {
    fn next_sha(&mut self, kind: &str) -> String {
        self.counter += 1;
        format!("{}{:06}", kind, self.counter)
    }

    fn record(&mut self, op: HostOp, target: impl Into<String>) -> Result<(), HostError> {
        self.calls.push(HostCall {
            op,
            target: target.into(),
        });
        match self.failures.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn tree_of(&self, commit: &str) -> Option<&BTreeMap<String, String>> {
        let info = self.commits.get(commit)?;
        self.trees.get(&info.tree_sha)
    }

    fn not_found() -> HostError {
        HostError::ApiError(r#"{"message":"Not Found","status":"404"}"#.to_string())
    }
}

/// An in-process repository host. It keeps real blob/tree/commit/ref
/// bookkeeping and records every call, so publishing can be observed end to
/// end without a network.
#[derive(Default)]
pub struct MemoryHost {
    repo: Mutex<Repo>,
}

impl MemoryHost {
    /// A repository whose `branch` holds a single root commit with `files`.
    pub fn with_files<I, P, C>(branch: &str, files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut repo = Repo::default();
        let mut tree = BTreeMap::new();
        for (path, content) in files {
            let sha = repo.next_sha("blob");
            repo.blobs.insert(sha.clone(), content.into());
            tree.insert(path.into(), sha);
        }
        let tree_sha = repo.next_sha("tree");
        repo.trees.insert(tree_sha.clone(), tree);
        let commit_sha = repo.next_sha("commit");
        repo.commits.insert(
            commit_sha.clone(),
            CommitInfo {
                sha: commit_sha.clone(),
                tree_sha,
                parents: Vec::new(),
            },
        );
        repo.messages
            .insert(commit_sha.clone(), "Initial commit".to_string());
        repo.refs.insert(branch.to_string(), commit_sha);
        Self {
            repo: Mutex::new(repo),
        }
    }

    /// Make every later call of `op` fail with `error`.
    pub fn fail_on(&self, op: HostOp, error: HostError) {
        self.repo.lock().failures.insert(op, error);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.repo.lock().calls.clone()
    }

    pub fn calls_of(&self, op: HostOp) -> Vec<String> {
        self.repo
            .lock()
            .calls
            .iter()
            .filter(|call| call.op == op)
            .map(|call| call.target.clone())
            .collect()
    }

    /// Paths read through `get_file`, in call order.
    pub fn fetched_paths(&self) -> Vec<String> {
        self.calls_of(HostOp::GetFile)
    }

    pub fn head(&self, branch: &str) -> Option<String> {
        self.repo.lock().refs.get(branch).cloned()
    }

    pub fn commit(&self, sha: &str) -> Option<CommitInfo> {
        self.repo.lock().commits.get(sha).cloned()
    }

    pub fn commit_message(&self, sha: &str) -> Option<String> {
        self.repo.lock().messages.get(sha).cloned()
    }

    /// Path to blob sha for the tree of `commit`.
    pub fn tree_entries(&self, commit: &str) -> BTreeMap<String, String> {
        self.repo.lock().tree_of(commit).cloned().unwrap_or_default()
    }

    /// Current content of `path` on `branch`.
    pub fn file(&self, branch: &str, path: &str) -> Option<String> {
        let repo = self.repo.lock();
        let head = repo.refs.get(branch)?;
        let blob = repo.tree_of(head)?.get(path)?;
        repo.blobs.get(blob).cloned()
    }

    pub fn pull_requests(&self) -> Vec<NewPullRequest> {
        self.repo.lock().pulls.clone()
    }
}

#[async_trait]
impl SourceHost for MemoryHost {
    async fn get_file(&self, path: &str, reference: &str) -> Result<String, HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::GetFile, path)?;
        let head = repo.refs.get(reference).ok_or_else(Repo::not_found)?;
        let blob = repo
            .tree_of(head)
            .and_then(|tree| tree.get(path))
            .ok_or_else(Repo::not_found)?;
        repo.blobs.get(blob).cloned().ok_or_else(Repo::not_found)
    }

    async fn branch_tip(&self, branch: &str) -> Result<String, HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::BranchTip, branch)?;
        repo.refs.get(branch).cloned().ok_or_else(Repo::not_found)
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo, HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::GetCommit, sha)?;
        repo.commits.get(sha).cloned().ok_or_else(Repo::not_found)
    }

    async fn create_blob(&self, content: &str) -> Result<String, HostError> {
        let mut repo = self.repo.lock();
        let sha = repo.next_sha("blob");
        repo.record(HostOp::CreateBlob, sha.clone())?;
        repo.blobs.insert(sha.clone(), content.to_string());
        Ok(sha)
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::CreateTree, base_tree)?;
        let mut tree = repo
            .trees
            .get(base_tree)
            .cloned()
            .ok_or_else(Repo::not_found)?;
        for entry in entries {
            if !repo.blobs.contains_key(&entry.sha) {
                return Err(Repo::not_found());
            }
            tree.insert(entry.path.clone(), entry.sha.clone());
        }
        let sha = repo.next_sha("tree");
        repo.trees.insert(sha.clone(), tree);
        Ok(sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::CreateCommit, tree)?;
        if !repo.trees.contains_key(tree) || parents.iter().any(|p| !repo.commits.contains_key(p))
        {
            return Err(Repo::not_found());
        }
        let sha = repo.next_sha("commit");
        repo.commits.insert(
            sha.clone(),
            CommitInfo {
                sha: sha.clone(),
                tree_sha: tree.to_string(),
                parents: parents.to_vec(),
            },
        );
        repo.messages.insert(sha.clone(), message.to_string());
        Ok(sha)
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::UpdateRef, branch)?;
        let current = repo.refs.get(branch).cloned().ok_or_else(Repo::not_found)?;
        let commit = repo.commits.get(sha).ok_or_else(Repo::not_found)?;
        if !commit.parents.contains(&current) && current != sha {
            return Err(HostError::ApiError(
                r#"{"message":"Update is not a fast forward","status":"422"}"#.to_string(),
            ));
        }
        repo.refs.insert(branch.to_string(), sha.to_string());
        Ok(())
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::CreateRef, branch)?;
        if repo.refs.contains_key(branch) {
            return Err(HostError::ApiError(
                r#"{"message":"Reference already exists","status":"422"}"#.to_string(),
            ));
        }
        if !repo.commits.contains_key(sha) {
            return Err(Repo::not_found());
        }
        repo.refs.insert(branch.to_string(), sha.to_string());
        Ok(())
    }

    async fn create_pull_request(&self, request: &NewPullRequest) -> Result<String, HostError> {
        let mut repo = self.repo.lock();
        repo.record(HostOp::CreatePullRequest, request.head.clone())?;
        if !repo.refs.contains_key(&request.head) || !repo.refs.contains_key(&request.base) {
            return Err(HostError::ApiError(
                r#"{"message":"Validation Failed","status":"422"}"#.to_string(),
            ));
        }
        repo.pulls.push(request.clone());
        Ok(format!(
            "https://github.example/pulls/{}",
            repo.pulls.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_seeded_files() {
        let host = MemoryHost::with_files("main", [("index.html", "<main></main>")]);
        assert_eq!(
            host.get_file("index.html", "main").await.unwrap(),
            "<main></main>"
        );
        assert!(host.get_file("missing.html", "main").await.is_err());
        assert_eq!(host.fetched_paths(), vec!["index.html", "missing.html"]);
    }

    #[tokio::test]
    async fn test_overlay_tree_and_fast_forward() {
        let host = MemoryHost::with_files("main", [("a.txt", "a"), ("b.txt", "b")]);
        let tip = host.branch_tip("main").await.unwrap();
        let base = host.get_commit(&tip).await.unwrap();

        let blob = host.create_blob("a2").await.unwrap();
        let tree = host
            .create_tree(&base.tree_sha, &[TreeEntry::blob("a.txt", blob)])
            .await
            .unwrap();
        let commit = host
            .create_commit("edit", &tree, &[tip.clone()])
            .await
            .unwrap();
        host.update_ref("main", &commit).await.unwrap();

        assert_eq!(host.file("main", "a.txt").as_deref(), Some("a2"));
        assert_eq!(host.file("main", "b.txt").as_deref(), Some("b"));
        assert_eq!(host.commit(&commit).unwrap().parents, vec![tip]);
    }

    #[tokio::test]
    async fn test_rejects_non_fast_forward() {
        let host = MemoryHost::with_files("main", [("a.txt", "a")]);
        let tip = host.branch_tip("main").await.unwrap();
        let base = host.get_commit(&tip).await.unwrap();

        let first = host
            .create_commit("first", &base.tree_sha, &[tip.clone()])
            .await
            .unwrap();
        let second = host
            .create_commit("second", &base.tree_sha, &[tip.clone()])
            .await
            .unwrap();
        host.update_ref("main", &first).await.unwrap();

        let err = host.update_ref("main", &second).await.unwrap_err();
        assert!(err.to_string().starts_with("GitHub error:"));
        assert_eq!(host.head("main").as_deref(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let host = MemoryHost::with_files("main", [("a.txt", "a")]);
        host.fail_on(HostOp::CreateBlob, HostError::ApiError("boom".to_string()));
        assert_eq!(
            host.create_blob("x").await.unwrap_err().to_string(),
            "GitHub error: boom"
        );
    }
}
