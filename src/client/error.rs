//! Admin client error types.

use thiserror::Error;

use crate::submit::FailureKind;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable response: connection refused, timeout, broken body.
    #[error("Connection error: {0}")]
    Transport(String),
    /// The backend answered and said no.
    #[error("{0}")]
    Rejected(String),
    /// The backend answered with a body we could not interpret.
    #[error("Unexpected response (HTTP {status}): {message}")]
    Malformed { status: u16, message: String },
    /// Request bounced to the login page.
    #[error("Not logged in (redirected to the login page)")]
    Unauthorized,
    #[error("Login failed: {0}")]
    LoginFailed(String),
    #[error("Invalid interval {0}: must be between 1 and 3600 seconds")]
    InvalidInterval(u32),
    #[error("Failed to create HTTP client: {0}")]
    Build(String),
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl ClientError {
    /// Classification used when this error fails a submission batch.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ClientError::Rejected(_) | ClientError::InvalidInterval(_) => FailureKind::Rejected,
            ClientError::Malformed { .. } => FailureKind::Malformed,
            ClientError::Unauthorized | ClientError::LoginFailed(_) => FailureKind::Unauthorized,
            ClientError::Transport(_) | ClientError::Build(_) | ClientError::Url(_) => {
                FailureKind::Transport
            }
        }
    }
}
