use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::{CommitInfo, HostError, NewPullRequest, SourceHost, TreeEntry};

const DEFAULT_USER_AGENT: &str = concat!("sitevoice/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    /// `owner/name`
    pub repo: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

/// `SourceHost` backed by the GitHub REST Git Data API.
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
}

#[derive(Debug, Deserialize)]
struct ShaObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: ShaObject,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    tree: ShaObject,
    #[serde(default)]
    parents: Vec<ShaObject>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    html_url: String,
}

struct RepoParts<'a> {
    owner: &'a str,
    name: &'a str,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, HostError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    fn credentials(&self) -> Result<(&str, RepoParts<'_>), HostError> {
        let token = self
            .config
            .token
            .as_deref()
            .filter(|v| !v.trim().is_empty());
        let repo = self.config.repo.as_deref().filter(|v| !v.trim().is_empty());
        let (Some(token), Some(repo)) = (token, repo) else {
            return Err(HostError::MissingCredentials);
        };
        Ok((token, parse_repo(repo)?))
    }

    fn repo_url(&self, repo: &RepoParts<'_>, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.config.api_url.trim_end_matches('/'),
            repo.owner,
            repo.name,
            path
        )
    }

    /// Issue one authenticated request against `/repos/{owner}/{name}{path}`.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, HostError> {
        let (token, repo) = self.credentials()?;
        let url = self.repo_url(&repo, path);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/vnd.github+json")
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%method, path, %status, "github request failed");
            return Err(HostError::ApiError(body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| HostError::ApiError(format!("{}: {}", e, text)))
    }
}

fn parse_repo(repo: &str) -> Result<RepoParts<'_>, HostError> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
            Ok(RepoParts { owner, name })
        }
        _ => Err(HostError::InvalidRepo),
    }
}

/// Contents API payloads are base64 wrapped at 60 columns.
fn decode_content(path: &str, encoded: &str) -> Result<String, HostError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|_| HostError::DecodeError(path.to_string()))?;
    String::from_utf8(bytes).map_err(|_| HostError::DecodeError(path.to_string()))
}

fn blob_body(content: &str) -> Value {
    json!({ "content": content, "encoding": "utf-8" })
}

fn tree_body(base_tree: &str, entries: &[TreeEntry]) -> Value {
    json!({ "base_tree": base_tree, "tree": entries })
}

fn commit_body(message: &str, tree: &str, parents: &[String]) -> Value {
    json!({ "message": message, "tree": tree, "parents": parents })
}

/// Fast-forward only: the host rejects the update if `sha` does not descend
/// from the current tip.
fn update_ref_body(sha: &str) -> Value {
    json!({ "sha": sha, "force": false })
}

fn create_ref_body(branch: &str, sha: &str) -> Value {
    json!({ "ref": format!("refs/heads/{}", branch), "sha": sha })
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn get_file(&self, path: &str, reference: &str) -> Result<String, HostError> {
        let data: ContentResponse = self
            .request(
                Method::GET,
                &format!(
                    "/contents/{}?ref={}",
                    urlencoding::encode(path),
                    urlencoding::encode(reference)
                ),
                None,
            )
            .await?;
        decode_content(path, &data.content)
    }

    async fn branch_tip(&self, branch: &str) -> Result<String, HostError> {
        let data: RefResponse = self
            .request(Method::GET, &format!("/git/ref/heads/{}", branch), None)
            .await?;
        Ok(data.object.sha)
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo, HostError> {
        let data: CommitResponse = self
            .request(Method::GET, &format!("/git/commits/{}", sha), None)
            .await?;
        Ok(CommitInfo {
            sha: data.sha,
            tree_sha: data.tree.sha,
            parents: data.parents.into_iter().map(|p| p.sha).collect(),
        })
    }

    async fn create_blob(&self, content: &str) -> Result<String, HostError> {
        let data: ShaObject = self
            .request(
                Method::POST,
                "/git/blobs",
                Some(blob_body(content)),
            )
            .await?;
        Ok(data.sha)
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, HostError> {
        let data: ShaObject = self
            .request(
                Method::POST,
                "/git/trees",
                Some(tree_body(base_tree, entries)),
            )
            .await?;
        Ok(data.sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, HostError> {
        let data: ShaObject = self
            .request(
                Method::POST,
                "/git/commits",
                Some(commit_body(message, tree, parents)),
            )
            .await?;
        Ok(data.sha)
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        let _: Value = self
            .request(
                Method::PATCH,
                &format!("/git/refs/heads/{}", branch),
                Some(update_ref_body(sha)),
            )
            .await?;
        Ok(())
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        let _: Value = self
            .request(
                Method::POST,
                "/git/refs",
                Some(create_ref_body(branch, sha)),
            )
            .await?;
        Ok(())
    }

    async fn create_pull_request(&self, request: &NewPullRequest) -> Result<String, HostError> {
        let data: PullResponse = self
            .request(Method::POST, "/pulls", Some(json!(request)))
            .await?;
        Ok(data.html_url)
    }
}
