//! Error types for the Reel client.

use thiserror::Error;

/// Errors that can occur when talking to the generation service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Authentication required but no valid credential was given
    #[error("Authentication required")]
    AuthRequired,

    /// Login or registration was rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid service URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service accepted the connection but did not answer in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Service is offline or unreachable
    #[error("Service unreachable: {0}")]
    ServerUnreachable(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Message suitable for showing to the user as-is
    ///
    /// Server and authentication failures carry the message the service
    /// sent; everything else falls back to the display form.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } | ClientError::AuthFailed(message) => {
                message.clone()
            }
            ClientError::InvalidRequest(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a server-side failure
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(e: config::ConfigError) -> Self {
        ClientError::Config(e.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl(e.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Classify a failure to send a request at all
///
/// A connect timeout counts as unreachable; a timeout after connecting means
/// the service is still working on the request.
pub(crate) fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() {
        ClientError::ServerUnreachable(e.to_string())
    } else if e.is_timeout() {
        ClientError::Timeout(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// `detail` of an error body, when it is a plain string
pub(crate) fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}

/// Message to show for a failed generation request
///
/// Looks at `detail` (string), then `detail.message`, then `message`. A
/// body that is not JSON is used verbatim when non-empty.
pub(crate) fn generation_message(status: u16, body: &str) -> String {
    let fallback = || format!("Failed to trigger video generation (status {})", status);

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return if body.trim().is_empty() {
            fallback()
        } else {
            body.to_string()
        };
    };

    let detail = value.get("detail");
    detail
        .and_then(|d| d.as_str())
        .or_else(|| detail.and_then(|d| d.get("message")).and_then(|m| m.as_str()))
        .or_else(|| value.get("message").and_then(|m| m.as_str()))
        .map_or_else(fallback, str::to_string)
}
