use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{lenient_string, Action, SiteFile};

/// An ordered action list plus its descriptive text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub commit_message: String,
    #[serde(default, deserialize_with = "nullable_actions")]
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    /// Read a caller- or planner-supplied plan document. Anything that is not
    /// a plan object reads as an empty plan.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Whether any action in the list reads `file`.
    pub fn needs(&self, file: SiteFile) -> bool {
        self.actions.iter().any(|action| action.targets(file))
    }

    /// The documents this plan needs, in fetch order.
    pub fn needed_documents(&self) -> Vec<SiteFile> {
        SiteFile::ALL
            .into_iter()
            .filter(|file| self.needs(*file))
            .collect()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

// A malformed entry becomes `Unsupported` so it is skipped instead of
// rejecting the whole list.
fn nullable_actions<'de, D>(deserializer: D) -> Result<Vec<Action>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or(Action::Unsupported))
        .collect())
}
