//! # Client Errors
//!
//! Failure taxonomy for backend calls. A non-2xx answer is kept apart from a
//! transport failure so callers can tell "not found" from "unreachable".

use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL or a derived request URL is not valid
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced an HTTP response (DNS, connect, timeout)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{url} returned {status}{}", format_body(.body))]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// The response body could not be decoded
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The caller cancelled the request before it completed
    #[error("request cancelled")]
    Cancelled,
}

fn format_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl ClientError {
    /// HTTP status of the response, if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// True when the backend could not be reached
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// Extract the backend's `{"error": ...}` message from a status error
    pub fn backend_message(&self) -> Option<String> {
        match self {
            ClientError::Status { body, .. } => {
                serde_json::from_str::<crate::models::ApiErrorBody>(body)
                    .ok()
                    .map(|b| b.error)
            }
            _ => None,
        }
    }
}
