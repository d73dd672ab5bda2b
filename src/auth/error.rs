//! Session-level error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! The same `ApiError` means different things depending on the call: a 401
//! from login is a wrong password, a 401 from `/accounts/me` is an expired
//! token. The two constructors below encode that split once.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::net::error::{ApiError, FieldErrors};
use crate::net::types::Role;

pub const NETWORK_MESSAGE: &str = "Unable to reach the server. Check your connection and try again.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
pub const EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Transport failure or timeout; the request may be retried.
    #[error("network failure: {0}")]
    Network(String),
    /// The backend rejected the submitted data.
    #[error("rejected: {}", .0.summary().unwrap_or_default())]
    Invalid(FieldErrors),
    /// The access token is no longer accepted; the session was cleared.
    #[error("session expired")]
    ExpiredToken,
    /// Authenticated, but the account role may not use the view.
    #[error("{required:?} account required")]
    Permission { required: Role },
    /// Another session operation is still running.
    #[error("another session operation is in progress")]
    InProgress,
    #[error("already signed in")]
    AlreadyAuthenticated,
    /// A logout landed while the call was in flight; its result was dropped.
    #[error("operation cancelled by logout")]
    Cancelled,
    /// The backend answered with something the client cannot interpret.
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl AuthError {
    /// Interpret a failure from login or register.
    #[must_use]
    pub fn from_credentials_call(err: ApiError) -> Self {
        match err {
            ApiError::Network(reason) => Self::Network(reason),
            ApiError::Timeout(ms) => Self::Network(format!("timed out after {ms} ms")),
            ApiError::Unavailable => Self::Network("not available outside the browser".to_owned()),
            ApiError::Unauthorized(errors) | ApiError::Forbidden(errors) => {
                Self::Invalid(with_fallback(errors, INVALID_CREDENTIALS_MESSAGE))
            }
            ApiError::Rejected { status, errors } if status < 500 => {
                Self::Invalid(with_fallback(errors, "Please correct the highlighted fields."))
            }
            ApiError::Rejected { status, errors } => Self::Unexpected(
                errors.summary().unwrap_or_else(|| format!("server error {status}")),
            ),
            ApiError::Malformed(reason) => Self::Unexpected(reason),
        }
    }

    /// Interpret a failure from a call authenticated with the access token.
    #[must_use]
    pub fn from_token_call(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => Self::ExpiredToken,
            ApiError::Network(reason) => Self::Network(reason),
            ApiError::Timeout(ms) => Self::Network(format!("timed out after {ms} ms")),
            ApiError::Unavailable => Self::Network("not available outside the browser".to_owned()),
            ApiError::Forbidden(errors) => Self::Unexpected(errors.summary().unwrap_or_else(|| "forbidden".to_owned())),
            ApiError::Rejected { status, errors } => Self::Unexpected(
                errors.summary().unwrap_or_else(|| format!("request failed with status {status}")),
            ),
            ApiError::Malformed(reason) => Self::Unexpected(reason),
        }
    }

    /// Text suitable for a form banner or toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => NETWORK_MESSAGE.to_owned(),
            Self::Invalid(errors) => errors
                .summary()
                .unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_owned()),
            Self::ExpiredToken => EXPIRED_MESSAGE.to_owned(),
            Self::Permission { required } => {
                format!("Access denied. This page is only available to {} accounts.", required.label().to_lowercase())
            }
            Self::InProgress => "Please wait for the current request to finish.".to_owned(),
            Self::AlreadyAuthenticated => "You are already signed in.".to_owned(),
            Self::Cancelled => "The request was cancelled because you signed out.".to_owned(),
            Self::Unexpected(_) => "Something went wrong. Please try again later.".to_owned(),
        }
    }

    /// Per-field messages, empty unless the backend attached them to `field`.
    #[must_use]
    pub fn field_messages(&self, field: &str) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.messages_for(field).to_vec(),
            _ => Vec::new(),
        }
    }

    /// Whether the error means the stored session can no longer be used.
    #[must_use]
    pub fn forces_logout(&self) -> bool {
        matches!(self, Self::ExpiredToken)
    }
}

fn with_fallback(mut errors: FieldErrors, fallback: &str) -> FieldErrors {
    if errors.is_empty() {
        errors.message = Some(fallback.to_owned());
    }
    errors
}
