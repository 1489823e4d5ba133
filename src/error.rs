//! Error types for the stats hub

use std::fmt;
use std::path::PathBuf;

/// Result type alias for hub operations
pub type HubResult<T> = Result<T, HubError>;

/// Errors that can occur while ingesting, aggregating or fanning out events
#[derive(Debug)]
pub enum HubError {
    /// Binding the ingestion socket failed
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Receiving from the ingestion socket failed (fatal)
    Transport(std::io::Error),

    /// An inbound datagram was not a valid activity event
    Decode(serde_json::Error),

    /// A snapshot or alert payload could not be serialized
    Serialization(serde_json::Error),

    /// Sending a frame to a subscriber failed
    Send(String),

    /// Delivering an outbound alert failed
    Alert(String),
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubError::Bind { path, source } => {
                write!(f, "failed to bind socket at {}: {}", path.display(), source)
            }
            HubError::Transport(err) => write!(f, "error receiving from socket: {}", err),
            HubError::Decode(err) => write!(f, "malformed activity event: {}", err),
            HubError::Serialization(err) => write!(f, "serialization error: {}", err),
            HubError::Send(msg) => write!(f, "failed to send to subscriber: {}", msg),
            HubError::Alert(msg) => write!(f, "failed to deliver alert: {}", msg),
        }
    }
}

impl std::error::Error for HubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HubError::Bind { source, .. } => Some(source),
            HubError::Transport(err) => Some(err),
            HubError::Decode(err) | HubError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HubError {
    fn from(err: reqwest::Error) -> Self {
        HubError::Alert(err.to_string())
    }
}

impl From<axum::Error> for HubError {
    fn from(err: axum::Error) -> Self {
        HubError::Send(err.to_string())
    }
}
