use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::{lenient_string, ActionOutcome, CommitResult};

/// Inbound edit request body.
///
/// `plan` is kept as raw JSON so that plan mode can echo a supplied or
/// planner-produced plan back exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Plan,
    Apply,
    Rollback,
}

impl Mode {
    /// An absent or empty mode means `plan`.
    pub fn resolve(raw: Option<&str>) -> Result<Self, UnknownMode> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Mode::Plan),
            Some(value) => value.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Plan => "plan",
            Mode::Apply => "apply",
            Mode::Rollback => "rollback",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported mode: {}.", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan" => Ok(Mode::Plan),
            "apply" => Ok(Mode::Apply),
            "rollback" => Ok(Mode::Rollback),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Response body for plan and apply requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub mode: Mode,
    pub command: String,
    pub plan: Value,
    #[serde(flatten)]
    pub commit: Option<CommitResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<ActionOutcome>>,
}
