use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

/// Error body the backend sends alongside non-2xx responses: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Error)]
#[error("{code:?} (HTTP {status}): {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Builds an error from a raw response body, preferring the backend's
    /// `error` field when the body carries one.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::new(status, parsed.error),
            Err(_) if body.trim().is_empty() => Self::new(status, format!("HTTP {status}")),
            Err(_) => Self::new(status, body.trim()),
        }
    }
}
