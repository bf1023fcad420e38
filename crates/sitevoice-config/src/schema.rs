use serde::{Deserialize, Serialize};
use std::time::Duration;

use sitevoice_util::text::redact;
use sitevoice_util::timeout;

pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_PLANNER_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner: Option<PlannerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
    /// Upper bound for every outbound HTTP request, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// `owner/name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishMode>,
}

/// How an apply lands on the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Commit straight onto the base branch.
    #[default]
    Direct,
    /// Commit onto a fresh `voice/<millis>` branch and open a pull request.
    PullRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors: Vec<String>,
}

fn overlay<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

impl GithubConfig {
    fn merge(&mut self, other: GithubConfig) {
        overlay(&mut self.token, other.token);
        overlay(&mut self.repo, other.repo);
        overlay(&mut self.base_branch, other.base_branch);
        overlay(&mut self.api_url, other.api_url);
        overlay(&mut self.publish, other.publish);
    }
}

impl PlannerConfig {
    fn merge(&mut self, other: PlannerConfig) {
        overlay(&mut self.api_key, other.api_key);
        overlay(&mut self.model, other.model);
        overlay(&mut self.base_url, other.base_url);
        overlay(&mut self.temperature, other.temperature);
    }
}

impl ServerConfig {
    fn merge(&mut self, other: ServerConfig) {
        overlay(&mut self.hostname, other.hostname);
        overlay(&mut self.port, other.port);
        for origin in other.cors {
            if !self.cors.contains(&origin) {
                self.cors.push(origin);
            }
        }
    }
}

impl Config {
    /// Field-level merge; values present in `other` win.
    pub fn merge(&mut self, other: Config) {
        if let Some(github) = other.github {
            self.github.get_or_insert_with(Default::default).merge(github);
        }
        if let Some(planner) = other.planner {
            self.planner
                .get_or_insert_with(Default::default)
                .merge(planner);
        }
        if let Some(server) = other.server {
            self.server.get_or_insert_with(Default::default).merge(server);
        }
        overlay(&mut self.request_timeout_secs, other.request_timeout_secs);
    }

    pub fn github_token(&self) -> Option<&str> {
        self.github
            .as_ref()
            .and_then(|g| g.token.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn github_repo(&self) -> Option<&str> {
        self.github
            .as_ref()
            .and_then(|g| g.repo.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn base_branch(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.base_branch.as_deref())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_BRANCH)
    }

    pub fn github_api_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.api_url.as_deref())
            .unwrap_or(DEFAULT_GITHUB_API_URL)
    }

    pub fn publish_mode(&self) -> PublishMode {
        self.github
            .as_ref()
            .and_then(|g| g.publish)
            .unwrap_or_default()
    }

    pub fn planner_api_key(&self) -> Option<&str> {
        self.planner
            .as_ref()
            .and_then(|p| p.api_key.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn model(&self) -> &str {
        self.planner
            .as_ref()
            .and_then(|p| p.model.as_deref())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn planner_base_url(&self) -> &str {
        self.planner
            .as_ref()
            .and_then(|p| p.base_url.as_deref())
            .unwrap_or(DEFAULT_PLANNER_BASE_URL)
    }

    pub fn temperature(&self) -> f32 {
        self.planner
            .as_ref()
            .and_then(|p| p.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn hostname(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.hostname.as_deref())
            .unwrap_or(DEFAULT_HOSTNAME)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn cors(&self) -> &[String] {
        self.server
            .as_ref()
            .map(|s| s.cors.as_slice())
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        timeout::or_default(Duration::from_secs(self.request_timeout_secs.unwrap_or(0)))
    }

    /// A copy safe to print: credentials are masked.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        if let Some(github) = copy.github.as_mut() {
            github.token = github.token.as_deref().map(redact);
        }
        if let Some(planner) = copy.planner.as_mut() {
            planner.api_key = planner.api_key.as_deref().map(redact);
        }
        copy
    }
}
