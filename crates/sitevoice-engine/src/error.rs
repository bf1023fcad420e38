use sitevoice_github::HostError;
use sitevoice_provider::PlannerError;
use sitevoice_types::UnknownMode;

/// Fatal request errors. The message text is what callers see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Missing command.")]
    MissingCommand,

    #[error("Rollback disabled for live apply mode.")]
    RollbackDisabled,

    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Host(#[from] HostError),
}
