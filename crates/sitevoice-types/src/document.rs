use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed site source files an action can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteFile {
    /// `index.html`: the HTML shell, navigation and main content.
    Index,
    /// `app.js`: the copy/theme state literal.
    AppState,
    /// `styles.css`: the stylesheet.
    Styles,
}

impl SiteFile {
    /// Fetch order used by the executor.
    pub const ALL: [SiteFile; 3] = [SiteFile::Index, SiteFile::AppState, SiteFile::Styles];

    pub fn path(&self) -> &'static str {
        match self {
            SiteFile::Index => "index.html",
            SiteFile::AppState => "app.js",
            SiteFile::Styles => "styles.css",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|file| file.path() == path)
    }
}

impl fmt::Display for SiteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A page synthesized by an `add_page` action. Always committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPage {
    pub path: String,
    pub slug: String,
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for file in SiteFile::ALL {
            assert_eq!(SiteFile::from_path(file.path()), Some(file));
        }
        assert_eq!(SiteFile::from_path("partners.html"), None);
    }
}
