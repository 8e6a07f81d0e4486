use reqwest::StatusCode;
use thiserror::Error;

use crate::infra::error::InfraError;

/// Failure taxonomy for every network-backed client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered 401. The session has already been cleared and the
    /// shell sent to login by the time this is returned.
    #[error("unauthorized: session cleared")]
    Auth,
    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Produced only by the explicit success checks callers run before parsing.
    #[error("server responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("storage error: {0}")]
    Storage(#[from] InfraError),
    #[error("{0} has not been loaded")]
    NotLoaded(&'static str),
    #[error("failed to read {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn decode(what: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            what,
            message: message.into(),
        }
    }

    /// Non-2xx answers and undecodable bodies, as opposed to session or transport failures.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Decode { .. })
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
