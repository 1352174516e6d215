//! Error types for the Pusher client.
//!
//! Validation errors are raised before any request leaves the process.
//! Transport and status errors come back from the HTTP collaborator.

use thiserror::Error;

/// Reason a request was rejected locally, before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Channel name is empty or contains characters outside `[A-Za-z0-9_\-=@,.;]`
    #[error("invalid channel name: {0:?}")]
    InvalidChannelName(String),

    /// Channel name is longer than the allowed maximum
    #[error("channel name too long: {length} characters (max {max})")]
    ChannelNameTooLong { length: usize, max: usize },

    /// Event name is longer than the allowed maximum
    #[error("event name too long: {length} characters (max {max})")]
    EventNameTooLong { length: usize, max: usize },

    /// Serialized event data exceeds the payload limit
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Channel list is empty or longer than the per-trigger maximum
    #[error("invalid number of channels: {count} (expected 1 to {max})")]
    TooManyChannels { count: usize, max: usize },

    /// Socket id is not of the form `<digits>.<digits>`
    #[error("invalid socket id: {0:?}")]
    InvalidSocketId(String),
}

/// Failure inside the HTTP collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Invalid or incomplete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid Pusher URL: {0}")]
    InvalidUrl(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(String),
}

/// Top-level error returned by client operations.
#[derive(Debug, Error)]
pub enum PusherError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 400 - the API rejected the request parameters
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 401 - the request signature or key was rejected
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 403 - the app is disabled or over quota
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Response body was not a JSON object
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl PusherError {
    /// True if the error was raised locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, PusherError::Validation(_))
    }

    /// Map a non-success HTTP status to the matching error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => PusherError::BadRequest(body),
            401 => PusherError::Unauthorized(body),
            403 => PusherError::Forbidden(body),
            _ => PusherError::UnexpectedStatus { status, body },
        }
    }
}

impl From<serde_json::Error> for PusherError {
    fn from(e: serde_json::Error) -> Self {
        PusherError::Decode(e.to_string())
    }
}

/// Result type for client operations
pub type PusherResult<T> = Result<T, PusherError>;
