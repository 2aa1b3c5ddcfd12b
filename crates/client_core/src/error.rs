//! Error taxonomy the controller surfaces to the view layer.

use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Auth,
    Fetch,
    Submission,
    Poll,
}

/// Every failure the controller recovers from. None of these propagate past
/// the controller; each is rendered through [`crate::view::ViewUpdate::Alert`]
/// or as a status line, and also returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Bad credentials or a reply without a token.
    #[error("{0}")]
    Auth(String),
    /// The project list could not be loaded.
    #[error("{0}")]
    Fetch(String),
    /// Project creation was rejected or never reached the backend.
    #[error("{0}")]
    Submission(String),
    /// A status check failed mid-poll, or the backend reported `failed`.
    #[error("{0}")]
    Poll(String),
}

impl ControllerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Auth(_) => ErrorCategory::Auth,
            Self::Fetch(_) => ErrorCategory::Fetch,
            Self::Submission(_) => ErrorCategory::Submission,
            Self::Poll(_) => ErrorCategory::Poll,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Auth(message)
            | Self::Fetch(message)
            | Self::Submission(message)
            | Self::Poll(message) => message,
        }
    }
}

/// Turns a transport/API failure into the text shown to the user. Errors the
/// backend answered with keep its message; only failures to reach the backend
/// are replaced with the unreachable hint.
pub fn describe_failure(err: &anyhow::Error) -> String {
    if let Some(api_err) = err.chain().find_map(|cause| cause.downcast_ref::<ApiError>()) {
        return api_err.message.clone();
    }

    let unreachable = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(|cause| cause.is_connect() || cause.is_timeout());
    let message = format!("{err:#}");
    let lower = message.to_ascii_lowercase();
    if unreachable
        || lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("connect error")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Server unreachable; check URL/network and retry.".to_string()
    } else {
        message
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
