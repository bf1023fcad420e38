pub mod extract;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod scripted;

pub use extract::extract_json;
pub use openai::{OpenAIConfig, OpenAIPlanner};
pub use prompt::SYSTEM_PROMPT;
pub use provider::{Planner, PlannerError};
pub use scripted::ScriptedPlanner;
