use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::{extract_json, Planner, PlannerError, SYSTEM_PROMPT};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Plans edits through an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIPlanner {
    client: Client,
    config: OpenAIConfig,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

// Every field is optional: a reply missing any of them is "no response".
#[derive(Debug, Deserialize)]
struct RawChatResponse {
    #[serde(default)]
    choices: Vec<RawChoice>,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    #[serde(default)]
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    content: Option<String>,
}

impl RawChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
    }
}

impl OpenAIPlanner {
    pub fn new(config: OpenAIConfig) -> Result<Self, PlannerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PlannerError::from)?;
        Ok(Self { client, config })
    }

    fn chat_completions_url(base_url: Option<&str>) -> String {
        match base_url {
            None => OPENAI_API_URL.to_string(),
            Some(base) => {
                if base.ends_with("/chat/completions") {
                    return base.to_string();
                }
                if base.ends_with('/') {
                    format!("{base}chat/completions")
                } else {
                    format!("{base}/chat/completions")
                }
            }
        }
    }

    fn build_request<'a>(&'a self, command: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: command,
                },
            ],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl Planner for OpenAIPlanner {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn plan(&self, command: &str) -> Result<Value, PlannerError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(PlannerError::MissingApiKey)?;

        let url = Self::chat_completions_url(self.config.base_url.as_deref());
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(command))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.config.model, %status, "planner request rejected");
            return Err(PlannerError::ApiError(body));
        }

        let body = response.text().await?;
        tracing::info!(
            model = %self.config.model,
            latency_ms = started.elapsed().as_millis() as u64,
            "planner replied"
        );

        let content = serde_json::from_str::<RawChatResponse>(&body)
            .ok()
            .and_then(RawChatResponse::into_content)
            .ok_or(PlannerError::EmptyResponse)?;

        extract_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> OpenAIConfig {
        OpenAIConfig {
            api_key: api_key.map(str::to_string),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            temperature: 0.2,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_chat_completions_url() {
        assert_eq!(
            OpenAIPlanner::chat_completions_url(None),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            OpenAIPlanner::chat_completions_url(Some("http://localhost:9000/v1/")),
            "http://localhost:9000/v1/chat/completions"
        );
        assert_eq!(
            OpenAIPlanner::chat_completions_url(Some("http://proxy/chat/completions")),
            "http://proxy/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let planner = OpenAIPlanner::new(config(Some("sk-test"))).unwrap();
        let body = serde_json::to_value(planner.build_request("make it blue")).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "make it blue");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_reply_content_extraction() {
        let raw: RawChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"actions\":[]}"}}]}"#,
        )
        .unwrap();
        assert_eq!(raw.into_content().as_deref(), Some("{\"actions\":[]}"));

        let empty: RawChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.into_content(), None);

        let null_content: RawChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null_content.into_content(), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let planner = OpenAIPlanner::new(config(None)).unwrap();
        let err = planner.plan("change the headline").await.unwrap_err();
        assert_eq!(err, PlannerError::MissingApiKey);
        assert_eq!(err.to_string(), "Missing OPENAI_API_KEY.");

        let blank = OpenAIPlanner::new(config(Some("  "))).unwrap();
        assert_eq!(
            blank.plan("change the headline").await.unwrap_err(),
            PlannerError::MissingApiKey
        );
    }
}
