use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

use crate::{extract_json, Planner, PlannerError};

/// A planner that replays canned replies in order. Used by tests and by
/// offline runs that supply their own model output.
#[derive(Default)]
pub struct ScriptedPlanner {
    replies: Mutex<VecDeque<Result<String, PlannerError>>>,
    commands: Mutex<Vec<String>>,
}

impl ScriptedPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw model reply; it goes through the same JSON extraction as a
    /// live reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(reply.into()));
        self
    }

    pub fn with_error(self, error: PlannerError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn plan(&self, command: &str) -> Result<Value, PlannerError> {
        self.commands.lock().push(command.to_string());
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(Err(PlannerError::EmptyResponse))?;
        extract_json(&reply)
    }
}
