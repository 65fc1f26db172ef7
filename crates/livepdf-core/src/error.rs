//! Error types for the conversion core.
//!
//! The `Display` output of [`ConversionError`] is what the user sees as the
//! failure reason, so messages are written for people, not for logs.

use thiserror::Error;

/// Why a conversion attempt did not produce an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP error! status: {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    /// The exchange completed but the service declined to render.
    #[error("{message}")]
    Service { message: String },

    /// The response did not have the expected shape.
    #[error("Error: malformed response: {0}")]
    Malformed(String),

    /// The request could not be sent or the response could not be read.
    #[error("Error: {0}")]
    Transport(String),

    /// The transport encoding of the artifact was not valid base64.
    #[error("Error: invalid PDF payload: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({})", detail),
        None => String::new(),
    }
}

impl From<reqwest::Error> for ConversionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport("request timed out".to_string());
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

impl From<base64::DecodeError> for ConversionError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Errors raised when naming style fields from the outside.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("unknown style field: {0}")]
    UnknownField(String),

    #[error("expected field=value, got: {0}")]
    MalformedAssignment(String),
}
