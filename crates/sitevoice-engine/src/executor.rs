use std::collections::HashMap;

use sitevoice_edit::{apply, synthesize_page};
use sitevoice_github::{HostError, SourceHost};
use sitevoice_types::{Action, ActionOutcome, ActionStatus, NewPage, SiteFile, SkipReason};

/// Path to final content, in commit order. Writing a path twice keeps its
/// first position and the last content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSet {
    entries: Vec<(String, String)>,
}

impl UpdateSet {
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == path) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((path, content)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, content)| content.as_str())
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub updates: UpdateSet,
    pub outcomes: Vec<ActionOutcome>,
}

fn needed_documents(actions: &[Action]) -> Vec<SiteFile> {
    SiteFile::ALL
        .into_iter()
        .filter(|file| actions.iter().any(|action| action.targets(*file)))
        .collect()
}

fn apply_action(
    action: &Action,
    documents: &mut HashMap<SiteFile, String>,
    pages: &mut Vec<NewPage>,
) -> ActionStatus {
    let Some(primary) = action.documents().first() else {
        return ActionStatus::Skipped(SkipReason::Unsupported);
    };
    if !documents.contains_key(primary) {
        return ActionStatus::Skipped(SkipReason::DocumentUnavailable(*primary));
    }

    let mut applied = false;
    let mut first_skip = None;
    if let Some(page) = synthesize_page(action) {
        pages.push(page);
        applied = true;
    }
    for file in action.documents() {
        let Some(content) = documents.get_mut(file) else {
            continue;
        };
        match apply(action, *file, content) {
            Ok(updated) => {
                *content = updated;
                applied = true;
            }
            Err(reason) => {
                first_skip.get_or_insert(reason);
            }
        }
    }

    if applied {
        ActionStatus::Applied
    } else {
        ActionStatus::Skipped(first_skip.unwrap_or(SkipReason::Unsupported))
    }
}

/// Fold `actions` over the documents they need.
///
/// Each needed document is fetched once from `branch`; any fetch failure
/// aborts. An empty document counts as unavailable and its actions are
/// skipped. Every fetched document is part of the update set whether or not
/// it changed, followed by the synthesized pages.
pub async fn execute_plan(
    host: &dyn SourceHost,
    branch: &str,
    actions: &[Action],
) -> Result<Execution, HostError> {
    let mut documents = HashMap::new();
    for file in needed_documents(actions) {
        let content = host.get_file(file.path(), branch).await?;
        tracing::info!(path = %file, bytes = content.len(), "fetched document");
        if !content.is_empty() {
            documents.insert(file, content);
        }
    }

    let mut pages = Vec::new();
    let mut outcomes = Vec::with_capacity(actions.len());
    for (index, action) in actions.iter().enumerate() {
        let status = apply_action(action, &mut documents, &mut pages);
        match &status {
            ActionStatus::Applied => tracing::info!(index, kind = action.kind(), "action applied"),
            ActionStatus::Skipped(reason) => {
                tracing::info!(index, kind = action.kind(), %reason, "action skipped")
            }
        }
        outcomes.push(ActionOutcome {
            index,
            kind: action.kind(),
            status,
        });
    }

    let mut updates = UpdateSet::default();
    for file in SiteFile::ALL {
        if let Some(content) = documents.remove(&file) {
            updates.insert(file.path(), content);
        }
    }
    for page in pages {
        updates.insert(page.path, page.content);
    }

    Ok(Execution { updates, outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_set_keeps_first_position() {
        let mut updates = UpdateSet::default();
        updates.insert("index.html", "a");
        updates.insert("faq.html", "b");
        updates.insert("index.html", "c");
        assert_eq!(updates.paths(), vec!["index.html", "faq.html"]);
        assert_eq!(updates.get("index.html"), Some("c"));
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn test_needed_documents_in_fetch_order() {
        let actions = vec![
            Action::InjectCss { css: None },
            Action::UpdateTheme { theme: None },
            Action::InsertMonetization {
                headline: None,
                description: None,
                cta: None,
            },
        ];
        assert_eq!(
            needed_documents(&actions),
            vec![SiteFile::Index, SiteFile::AppState, SiteFile::Styles]
        );
        assert!(needed_documents(&[Action::Unsupported]).is_empty());
    }

    #[test]
    fn test_unavailable_primary_document_skips() {
        let mut documents = HashMap::new();
        documents.insert(SiteFile::Styles, "body {}".to_string());
        let mut pages = Vec::new();
        let status = apply_action(
            &Action::AddPage {
                slug: Some("faq".to_string()),
                title: None,
                headline: None,
                body: None,
            },
            &mut documents,
            &mut pages,
        );
        assert_eq!(
            status,
            ActionStatus::Skipped(SkipReason::DocumentUnavailable(SiteFile::Index))
        );
        assert!(pages.is_empty());
    }
}
