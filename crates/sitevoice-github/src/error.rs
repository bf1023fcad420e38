#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Missing GITHUB_TOKEN or GITHUB_REPO.")]
    MissingCredentials,

    #[error("GITHUB_REPO must be in the form owner/repo.")]
    InvalidRepo,

    /// Non-success response; carries the upstream body verbatim.
    #[error("GitHub error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("GitHub request timed out.")]
    Timeout,

    #[error("Could not decode contents of {0}.")]
    DecodeError(String),
}

impl From<reqwest::Error> for HostError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return HostError::Timeout;
        }
        let mut msg = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        HostError::NetworkError(msg)
    }
}
