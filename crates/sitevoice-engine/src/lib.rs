pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod publisher;

pub use error::EditorError;
pub use executor::{execute_plan, Execution, UpdateSet};
pub use orchestrator::{commit_message, Editor, EditorSettings};
pub use publisher::{publish_direct, publish_pull_request, PullRequestResult};
