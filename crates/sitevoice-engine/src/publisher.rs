use sitevoice_github::{HostError, NewPullRequest, SourceHost, TreeEntry};
use sitevoice_types::Action;

use crate::UpdateSet;

pub const PULL_REQUEST_TITLE: &str = "Voice update";

/// Commit `updates` onto `branch` as one commit whose sole parent is the
/// current tip, then move the branch to it.
///
/// Nothing is visible until the final ref update; a failure in any earlier
/// step leaves the branch untouched. The ref update is fast-forward only, so
/// losing a race with another writer fails instead of overwriting.
pub async fn publish_direct(
    host: &dyn SourceHost,
    branch: &str,
    updates: &UpdateSet,
    message: &str,
) -> Result<String, HostError> {
    let tip = host.branch_tip(branch).await?;
    let base = host.get_commit(&tip).await?;
    tracing::info!(branch, tip = %tip, "resolved branch tip");
    commit_on(host, branch, &tip, &base.tree_sha, updates, message).await
}

async fn commit_on(
    host: &dyn SourceHost,
    branch: &str,
    parent: &str,
    base_tree: &str,
    updates: &UpdateSet,
    message: &str,
) -> Result<String, HostError> {
    let mut entries = Vec::with_capacity(updates.len());
    for (path, content) in updates.iter() {
        let sha = host.create_blob(content).await?;
        entries.push(TreeEntry::blob(path, sha));
    }
    tracing::info!(count = entries.len(), "created blobs");

    let tree = host.create_tree(base_tree, &entries).await?;
    let commit = host
        .create_commit(message, &tree, &[parent.to_string()])
        .await?;
    tracing::info!(tree = %tree, commit = %commit, "created commit");

    host.update_ref(branch, &commit).await?;
    tracing::info!(branch, commit = %commit, "updated ref");
    Ok(commit)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestResult {
    pub commit_sha: String,
    pub branch_name: String,
    pub pr_url: String,
}

fn pull_request_body(command: &str, actions: &[Action]) -> String {
    let listed: Vec<String> = actions
        .iter()
        .map(|action| format!("- {}", action.kind()))
        .collect();
    format!("Command: {}\n\nActions:\n{}", command, listed.join("\n"))
}

/// Commit `updates` onto a new `branch_name` cut from the base tip and open a
/// pull request from it into `base_branch`.
pub async fn publish_pull_request(
    host: &dyn SourceHost,
    base_branch: &str,
    branch_name: &str,
    updates: &UpdateSet,
    message: &str,
    command: &str,
    actions: &[Action],
) -> Result<PullRequestResult, HostError> {
    let tip = host.branch_tip(base_branch).await?;
    let base = host.get_commit(&tip).await?;
    host.create_ref(branch_name, &tip).await?;
    tracing::info!(branch = branch_name, tip = %tip, "created branch");

    let commit_sha = commit_on(host, branch_name, &tip, &base.tree_sha, updates, message).await?;

    let pr_url = host
        .create_pull_request(&NewPullRequest {
            title: PULL_REQUEST_TITLE.to_string(),
            head: branch_name.to_string(),
            base: base_branch.to_string(),
            body: pull_request_body(command, actions),
        })
        .await?;
    tracing::info!(pr_url = %pr_url, "opened pull request");

    Ok(PullRequestResult {
        commit_sha,
        branch_name: branch_name.to_string(),
        pr_url,
    })
}
