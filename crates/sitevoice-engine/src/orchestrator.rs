use serde_json::Value;
use std::sync::Arc;

use sitevoice_config::{Config, PublishMode};
use sitevoice_github::{GitHubClient, GitHubConfig, SourceHost};
use sitevoice_provider::{OpenAIConfig, OpenAIPlanner, Planner};
use sitevoice_types::{ActionOutcome, CommitResult, EditRequest, EditResponse, Mode, Plan};
use sitevoice_util::text::truncate_chars;

use crate::{execute_plan, publish_direct, publish_pull_request, EditorError};

const COMMIT_SUBJECT_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub base_branch: String,
    pub publish: PublishMode,
}

impl EditorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_branch: config.base_branch().to_string(),
            publish: config.publish_mode(),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            base_branch: sitevoice_config::DEFAULT_BASE_BRANCH.to_string(),
            publish: PublishMode::Direct,
        }
    }
}

/// `Live update: <first 60 characters of the command>`; pull requests use
/// `Voice update:` instead.
pub fn commit_message(publish: PublishMode, command: &str) -> String {
    let prefix = match publish {
        PublishMode::Direct => "Live update",
        PublishMode::PullRequest => "Voice update",
    };
    format!(
        "{}: {}",
        prefix,
        truncate_chars(command, COMMIT_SUBJECT_CHARS)
    )
}

// `null`, `false`, `0` and `""` count as "no plan supplied".
fn is_supplied(plan: &Value) -> bool {
    match plan {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Runs edit requests: obtains a plan, then either returns it or applies it
/// and publishes the result.
pub struct Editor {
    planner: Arc<dyn Planner>,
    host: Arc<dyn SourceHost>,
    settings: EditorSettings,
}

impl Editor {
    pub fn new(
        planner: Arc<dyn Planner>,
        host: Arc<dyn SourceHost>,
        settings: EditorSettings,
    ) -> Self {
        Self {
            planner,
            host,
            settings,
        }
    }

    /// Wire the OpenAI planner and the GitHub host from `config`.
    ///
    /// Missing credentials are not reported here; they fail the first request
    /// that needs them.
    pub fn from_config(config: &Config) -> Result<Self, EditorError> {
        let timeout = config.request_timeout();
        let planner = OpenAIPlanner::new(OpenAIConfig {
            api_key: config.planner_api_key().map(str::to_string),
            model: config.model().to_string(),
            base_url: Some(config.planner_base_url().to_string()),
            temperature: config.temperature(),
            timeout,
        })?;
        let host = GitHubClient::new(GitHubConfig {
            token: config.github_token().map(str::to_string),
            repo: config.github_repo().map(str::to_string),
            api_url: config.github_api_url().to_string(),
            timeout,
        })?;
        Ok(Self::new(
            Arc::new(planner),
            Arc::new(host),
            EditorSettings::from_config(config),
        ))
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub async fn handle(&self, request: EditRequest) -> Result<EditResponse, EditorError> {
        let mode = Mode::resolve(request.mode.as_deref())?;
        tracing::info!(%mode, "handling edit request");
        if mode == Mode::Rollback {
            return Err(EditorError::RollbackDisabled);
        }

        let command = request.command.unwrap_or_default();
        if command.is_empty() {
            return Err(EditorError::MissingCommand);
        }

        let plan = match request.plan {
            Some(plan) if is_supplied(&plan) => plan,
            _ => self.plan(&command).await?,
        };

        if mode == Mode::Plan {
            return Ok(EditResponse {
                mode,
                command,
                plan,
                commit: None,
                outcomes: None,
            });
        }

        let (commit, outcomes) = self.apply(&command, &Plan::from_value(&plan)).await?;
        Ok(EditResponse {
            mode,
            command,
            plan,
            commit: Some(commit),
            outcomes: Some(outcomes),
        })
    }

    /// Ask the planner for a plan document.
    pub async fn plan(&self, command: &str) -> Result<Value, EditorError> {
        tracing::info!(model = self.planner.model(), "requesting plan");
        Ok(self.planner.plan(command).await?)
    }

    /// Execute `plan` against the base branch and publish one commit.
    pub async fn apply(
        &self,
        command: &str,
        plan: &Plan,
    ) -> Result<(CommitResult, Vec<ActionOutcome>), EditorError> {
        let branch = &self.settings.base_branch;
        let execution = execute_plan(self.host.as_ref(), branch, &plan.actions).await?;
        let message = commit_message(self.settings.publish, command);
        let files = execution.updates.paths();

        let commit = match self.settings.publish {
            PublishMode::Direct => {
                let commit_sha =
                    publish_direct(self.host.as_ref(), branch, &execution.updates, &message)
                        .await?;
                CommitResult {
                    commit_sha,
                    files,
                    branch_name: None,
                    pr_url: None,
                }
            }
            PublishMode::PullRequest => {
                let branch_name = format!("voice/{}", chrono::Utc::now().timestamp_millis());
                let result = publish_pull_request(
                    self.host.as_ref(),
                    branch,
                    &branch_name,
                    &execution.updates,
                    &message,
                    command,
                    &plan.actions,
                )
                .await?;
                CommitResult {
                    commit_sha: result.commit_sha,
                    files,
                    branch_name: Some(result.branch_name),
                    pr_url: Some(result.pr_url),
                }
            }
        };

        tracing::info!(commit = %commit.commit_sha, files = commit.files.len(), "apply finished");
        Ok((commit, execution.outcomes))
    }
}
