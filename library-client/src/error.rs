//! Client error types

use thiserror::Error;

/// Transport-level error of the HTTP layer
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a usable response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// Server answered with a non-success status
    #[error("Server rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    ServerRejected { status: u16, message: Option<String> },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True when no usable response was received from the server
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::ServerRejected { .. } | Self::Config(_))
    }

    /// HTTP status of a server rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message from the server's error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerRejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Outcome of a failed session operation, as surfaced to callers
///
/// Both variants carry the human-readable message that was also recorded
/// in the session's `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The server answered with an error body
    #[error("{0}")]
    ServerRejected(String),

    /// No usable response (network failure, timeout, undecodable body)
    #[error("{0}")]
    TransportFailure(String),
}

impl SessionError {
    /// Classify a client error, surfacing the server message when present
    /// and `default_message` otherwise.
    pub fn from_client_error(err: &ClientError, default_message: &str) -> Self {
        match err {
            ClientError::ServerRejected { message, .. } => Self::ServerRejected(
                message
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(default_message)
                    .to_string(),
            ),
            _ => Self::TransportFailure(default_message.to_string()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ServerRejected(message) | Self::TransportFailure(message) => message,
        }
    }
}

/// Result type for session operations
pub type SessionResult = Result<(), SessionError>;

/// Persistent storage error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid route declaration, reported when the table is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteConfigError {
    #[error("route '{0}' declares neither a requirement nor a redirect")]
    MissingRequirement(String),

    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("duplicate route name '{0}'")]
    DuplicateName(String),
}

/// Navigation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NoMatch(String),

    #[error("too many redirects navigating to '{target}' (last: '{last}')")]
    RedirectLoop { target: String, last: String },

    #[error("unknown route name '{0}'")]
    UnknownRoute(String),

    #[error("route '{route}' requires parameter '{param}'")]
    MissingParam { route: String, param: String },
}
