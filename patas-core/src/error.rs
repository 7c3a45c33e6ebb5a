use thiserror::Error;

use crate::storage::StorageError;

/// Error outputs from `PatasKit`
#[derive(Debug, Error, uniffi::Error)]
pub enum PatasError {
    /// The presented input is not valid for the requested operation
    #[error("invalid_input_{attribute}: {reason}")]
    InvalidInput {
        /// The attribute that is invalid
        attribute: String,
        /// The reason the input is invalid
        reason: String,
    },

    /// The request could not be delivered (connectivity, timeout, TLS, ...)
    #[error("network_error at {url}: {error}")]
    NetworkError {
        /// The URL of the request
        url: String,
        /// The HTTP status returned by the request, if any
        status: Option<u16>,
        /// The error message
        error: String,
    },

    /// The backend answered with a non-2xx status
    #[error("http_status_{status} at {url}: {error}")]
    HttpStatus {
        /// The URL of the request
        url: String,
        /// The HTTP status code
        status: u16,
        /// The response body, if the backend sent one
        error: String,
    },

    /// Unexpected error serializing or deserializing a payload
    #[error("serialization_error: {error}")]
    SerializationError {
        /// The error message
        error: String,
    },

    /// The operation requires a logged-in session and there is none
    #[error("not_logged_in")]
    NotLoggedIn,

    /// The persistent credential store failed
    #[error("storage_error: {error}")]
    Storage {
        /// The error message
        error: String,
    },

    /// Unhandled error
    #[error("unexpected_error: {error}")]
    Generic {
        /// The details of the error
        error: String,
    },
}

/// Broad category of a [`PatasError`], used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ErrorKind {
    /// Detected locally before any request was sent.
    Validation,
    /// The request never produced a usable response.
    Transport,
    /// The backend rejected the request.
    Rejected,
    /// Local failures that are neither of the above.
    Internal,
}

impl PatasError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::NotLoggedIn => ErrorKind::Validation,
            Self::NetworkError { .. } | Self::SerializationError { .. } => {
                ErrorKind::Transport
            }
            Self::HttpStatus { .. } => ErrorKind::Rejected,
            Self::Storage { .. } | Self::Generic { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status attached to this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::NetworkError { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn invalid_input(attribute: &str, reason: &str) -> Self {
        Self::InvalidInput {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<StorageError> for PatasError {
    fn from(error: StorageError) -> Self {
        Self::Storage {
            error: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for PatasError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationError {
            error: error.to_string(),
        }
    }
}
