//! Error types module
//!
//! Every failure the client can observe is folded into [`ClientError`]. The variants
//! follow the failure taxonomy of the client: validation errors are caught before any
//! network call, transport errors mean no response was received, and application
//! errors carry the `detail` message the backend returned. Failures of individual
//! files inside an upload batch are reported per file by the upload coordinator and
//! never abort the batch.

use std::io;

/// Message shown for any transport-level failure, and for search failures whose
/// error body could not be parsed.
pub const SERVER_UNREACHABLE_MESSAGE: &str = "Error connecting to server";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a rejected upload
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the operator.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the operation can simply be tried again
    fn is_recoverable(&self) -> bool;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not reach server: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {detail}")]
    Application { status: u16, detail: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Operation already in progress: {0}")]
    Busy(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Server-provided detail for application errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Application { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(format!("JSON parsing error: {}", err))
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Application { .. } => "APPLICATION_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Busy(_) => "BUSY",
            ClientError::Io(_) => "IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, ClientError::Unauthorized(_))
    }

    fn client_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Transport(_) => SERVER_UNREACHABLE_MESSAGE.to_string(),
            ClientError::Application { detail, .. } => detail.clone(),
            ClientError::Decode(_) => "Unexpected response from server".to_string(),
            ClientError::Unauthorized(msg) => msg.clone(),
            ClientError::Busy(what) => format!("A {} is already in progress", what),
            ClientError::Io(err) => format!("Could not read file: {}", err),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ClientError::Validation(_) | ClientError::Busy(_) => LogLevel::Debug,
            ClientError::Transport(_)
            | ClientError::Application { .. }
            | ClientError::Unauthorized(_)
            | ClientError::Io(_) => LogLevel::Warn,
            ClientError::Decode(_) => LogLevel::Error,
        }
    }
}
