use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::SiteFile;

/// Why an action left its document untouched.
///
/// Skips are never errors: one malformed action must not abort an otherwise
/// valid batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The target document was not fetched or is empty.
    DocumentUnavailable(SiteFile),
    /// `update_copy` named a field outside the editable set.
    FieldNotEditable(String),
    /// A required parameter was absent or empty.
    MissingParameter(&'static str),
    /// The anchor the applier substitutes against is not in the document.
    PatternMissing(&'static str),
    /// The marker of an idempotent insertion is already present.
    AlreadyPresent(String),
    /// The action type is not one this editor knows.
    Unsupported,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DocumentUnavailable(file) => write!(f, "{} is unavailable", file),
            SkipReason::FieldNotEditable(field) => write!(f, "field '{}' is not editable", field),
            SkipReason::MissingParameter(name) => write!(f, "missing {}", name),
            SkipReason::PatternMissing(anchor) => write!(f, "no {} found", anchor),
            SkipReason::AlreadyPresent(marker) => write!(f, "{} already present", marker),
            SkipReason::Unsupported => f.write_str("unsupported action type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Applied,
    Skipped(SkipReason),
}

impl ActionStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionStatus::Applied)
    }
}

impl Serialize for ActionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionStatus::Applied => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("status", "applied")?;
                map.end()
            }
            ActionStatus::Skipped(reason) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "skipped")?;
                map.serialize_entry("reason", &reason.to_string())?;
                map.end()
            }
        }
    }
}

/// What happened to one action of a plan, in plan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(flatten)]
    pub status: ActionStatus,
}

/// The externally observable artifact of a successful apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    pub commit_sha: String,
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_serialization() {
        let applied = ActionOutcome {
            index: 0,
            kind: "update_copy",
            status: ActionStatus::Applied,
        };
        assert_eq!(
            serde_json::to_value(&applied).unwrap(),
            json!({"index": 0, "type": "update_copy", "status": "applied"})
        );

        let skipped = ActionOutcome {
            index: 1,
            kind: "insert_section",
            status: ActionStatus::Skipped(SkipReason::AlreadyPresent("id=\"faq\"".to_string())),
        };
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            json!({
                "index": 1,
                "type": "insert_section",
                "status": "skipped",
                "reason": "id=\"faq\" already present"
            })
        );
    }
}
