use async_trait::async_trait;
use serde_json::Value;

/// Turns a natural-language command into a raw plan document.
///
/// The plan is returned as untyped JSON so callers can echo it back exactly
/// as the model produced it.
#[async_trait]
pub trait Planner: Send + Sync {
    fn model(&self) -> &str;

    async fn plan(&self, command: &str) -> Result<Value, PlannerError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("Missing OPENAI_API_KEY.")]
    MissingApiKey,

    #[error("OpenAI error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Planner request timed out.")]
    Timeout,

    #[error("No response from model.")]
    EmptyResponse,

    #[error("Failed to parse JSON response.")]
    ParseError,
}

impl From<reqwest::Error> for PlannerError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return PlannerError::Timeout;
        }
        let mut msg = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        PlannerError::NetworkError(msg)
    }
}
