use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::PlannerError;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("fenced json regex"));

/// Pull the plan document out of a model reply.
///
/// Replies that start with `{` are parsed whole; otherwise the first
/// ```` ```json ```` fenced block is used.
pub fn extract_json(text: &str) -> Result<Value, PlannerError> {
    let trimmed = text.trim();
    let candidate = if trimmed.starts_with('{') {
        trimmed
    } else {
        FENCED_JSON
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or(PlannerError::ParseError)?
    };
    serde_json::from_str(candidate).map_err(|error| {
        tracing::debug!(%error, "model reply is not valid JSON");
        PlannerError::ParseError
    })
}
