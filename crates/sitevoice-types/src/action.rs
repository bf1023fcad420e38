use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::SiteFile;

/// One edit instruction produced by the planner.
///
/// Every parameter is optional on the wire: planners routinely omit fields,
/// and the appliers fall back to defaults or skip instead of failing the
/// whole batch. String parameters also accept JSON numbers and booleans.
/// A `type` outside the known set deserializes as [`Action::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    UpdateCopy {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    UpdateTheme {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        theme: Option<String>,
    },
    UpdateMeta {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    AddPage {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        headline: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    InsertMonetization {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        headline: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        cta: Option<String>,
    },
    UpdateBackgroundVideo {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    UpdateWallpaper {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    UpdateAvatar {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    InsertSection {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    AddProduct {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        price: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    InsertVideo {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        poster: Option<String>,
    },
    InsertStream {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    InjectCss {
        #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
        css: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl Action {
    /// The wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::UpdateCopy { .. } => "update_copy",
            Action::UpdateTheme { .. } => "update_theme",
            Action::UpdateMeta { .. } => "update_meta",
            Action::AddPage { .. } => "add_page",
            Action::InsertMonetization { .. } => "insert_monetization",
            Action::UpdateBackgroundVideo { .. } => "update_background_video",
            Action::UpdateWallpaper { .. } => "update_wallpaper",
            Action::UpdateAvatar { .. } => "update_avatar",
            Action::InsertSection { .. } => "insert_section",
            Action::AddProduct { .. } => "add_product",
            Action::InsertVideo { .. } => "insert_video",
            Action::InsertStream { .. } => "insert_stream",
            Action::InjectCss { .. } => "inject_css",
            Action::Unsupported => "unsupported",
        }
    }

    /// Documents this action reads and rewrites. The first entry is the
    /// primary target; an action is skipped when its primary target is
    /// unavailable.
    pub fn documents(&self) -> &'static [SiteFile] {
        match self {
            Action::UpdateCopy { .. } | Action::UpdateTheme { .. } => &[SiteFile::AppState],
            Action::UpdateMeta { .. }
            | Action::AddPage { .. }
            | Action::UpdateBackgroundVideo { .. }
            | Action::UpdateAvatar { .. }
            | Action::InsertSection { .. }
            | Action::AddProduct { .. }
            | Action::InsertVideo { .. }
            | Action::InsertStream { .. } => &[SiteFile::Index],
            Action::InsertMonetization { .. } => &[SiteFile::Index, SiteFile::Styles],
            Action::UpdateWallpaper { .. } | Action::InjectCss { .. } => &[SiteFile::Styles],
            Action::Unsupported => &[],
        }
    }

    pub fn targets(&self, file: SiteFile) -> bool {
        self.documents().contains(&file)
    }
}

/// Deserializes an optional text field, accepting numbers and booleans as
/// their JSON text. Arrays, objects and `null` read as absent.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}
