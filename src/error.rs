//! Error types for streaming sessions.
//!
//! Transport failures and explicit upstream errors end the session through
//! the error callback; everything else the pipeline recovers from locally.

use crate::traits::HttpError;

/// Errors that terminate a streaming session.
#[derive(Debug, Clone)]
pub enum SessionError {
    /// Request parameters failed validation before any network activity.
    InvalidRequest { message: String },
    /// The streaming request or a mid-stream read failed.
    Transport(HttpError),
    /// A `final` event carried a payload that could not be parsed (strict mode).
    FinalParse { message: String },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidRequest { message } => {
                write!(f, "invalid request: {}", message)
            }
            SessionError::Transport(err) => write!(f, "transport error: {}", err),
            SessionError::FinalParse { message } => {
                write!(f, "failed to parse final payload: {}", message)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HttpError> for SessionError {
    fn from(err: HttpError) -> Self {
        SessionError::Transport(err)
    }
}
