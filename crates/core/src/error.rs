//! Error model for the store and backend boundaries.

use thiserror::Error;

/// Result type used across the store layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by a client-side store.
///
/// Remote failures are flattened into a single message string here; the
/// hosted backend's structured errors stop at [`BackendError`]. Nothing in
/// this taxonomy is fatal; the worst outcome is a stale or reverted view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A form or argument failed client-side validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The remote call failed; the message is what gets shown to the user.
    #[error("{0}")]
    Backend(String),

    /// The operation requires a signed-in user.
    #[error("please login to continue")]
    NotAuthenticated,

    /// A requested record was not found.
    #[error("not found")]
    NotFound,
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Error returned by the hosted backend gateway.
///
/// The unique-constraint case is carved out because the wishlist treats it
/// as success (idempotent-by-convention); everything else collapses into a
/// message string at the store boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the request.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A uniqueness constraint was violated (remote code 23505).
    #[error("duplicate entry")]
    UniqueViolation,

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl BackendError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation)
    }
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        StoreError::Backend(err.to_string())
    }
}
