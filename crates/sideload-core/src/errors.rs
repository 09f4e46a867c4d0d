//! Error types for the download pipeline.
//!
//! Per-item errors (`FetchError`, `RegistrationError`, `ItemError`) are
//! designed to be serializable so they can ride inside batch events without
//! depending on non-serializable sources like `std::io::Error`; I/O causes
//! are captured as kind and message strings. `ConfigError` is synchronous
//! and never enters the event channel, so it keeps real `PathBuf` payloads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised synchronously by configuration and cache-root handling.
///
/// Fatal to the call that raised them (item construction, loader
/// construction, `clear_cache`). The batch event channel never carries
/// these.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An item key that cannot serve as a cache filename.
    #[error("Invalid item key {key:?}: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An application identifier that cannot serve as a directory name.
    #[error("Invalid application id {id:?}: {reason}")]
    InvalidApplicationId {
        /// The offending identifier.
        id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A source URL that failed to parse or uses an unsupported scheme.
    #[error("Invalid source URL {url:?}: {reason}")]
    InvalidSourceUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Could not determine the user data directory for the default cache root.
    #[error("Cannot determine user data directory")]
    NoUserDataDir,

    /// The configured cache root exists but is not a directory.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create the cache root.
    #[error("Failed to create cache directory {path}: {reason}")]
    CreateFailed {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Failed to remove the cache root during a clear.
    #[error("Failed to clear cache directory {path}: {reason}")]
    ClearFailed {
        /// The directory that could not be cleared.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },
}

/// Error type for a single fetch attempt.
///
/// Serializable so it can be carried by `BatchEvent::DownloadException`.
/// A failed attempt is reported unchanged; there are no retries.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success HTTP status.
    #[error("Server returned HTTP {code}")]
    BadStatus {
        /// The HTTP status code.
        code: u16,
    },

    /// Transport-level failure: DNS, connect, reset, timeout, body read.
    #[error("Transport error: {message}")]
    Transport {
        /// Detailed error message.
        message: String,
    },

    /// The destination sink failed to accept bytes.
    #[error("Sink error ({kind}): {message}")]
    Sink {
        /// The kind of I/O error (e.g. "PermissionDenied").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The fetch was cancelled at a chunk boundary.
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Create a bad status error.
    #[must_use]
    pub const fn bad_status(code: u16) -> Self {
        Self::BadStatus { code }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a sink error from a `std::io::Error`, capturing kind and message.
    #[must_use]
    pub fn sink(err: &std::io::Error) -> Self {
        Self::Sink {
            kind: format!("{:?}", err.kind()),
            message: err.to_string(),
        }
    }

    /// The HTTP status code, when this is a `BadStatus`.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadStatus { code } => Some(*code),
            _ => None,
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Convenience result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Failure reported by the caller-supplied registrar.
///
/// Registrar implementations return whatever went wrong as a message;
/// `From<anyhow::Error>` lets them bubble arbitrary causes with `?`.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("Registration failed: {message}")]
pub struct RegistrationError {
    /// What the registrar reported.
    pub message: String,
}

impl RegistrationError {
    /// Create a registration error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for RegistrationError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} flattens the cause chain into one line
        Self {
            message: format!("{err:#}"),
        }
    }
}

/// Per-item failure carried by `BatchEvent::DownloadException`.
///
/// Either the transfer itself failed or the registrar rejected the resolved
/// file. Both leave the item unresolved while the batch keeps running.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemError {
    /// The fetch attempt failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The registration callback failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ItemError {
    /// Check if this failure was a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_error_captures_io_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "cache read-only");
        let err = FetchError::sink(&io_err);

        match err {
            FetchError::Sink { kind, message } => {
                assert_eq!(kind, "PermissionDenied");
                assert!(message.contains("cache read-only"));
            }
            _ => panic!("Expected Sink variant"),
        }
    }

    #[test]
    fn fetch_error_serialization_round_trip() {
        let err = FetchError::bad_status(404);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("404"));

        let parsed: FetchError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }

    #[test]
    fn status_code_only_for_bad_status() {
        assert_eq!(FetchError::bad_status(503).status_code(), Some(503));
        assert_eq!(FetchError::transport("dns").status_code(), None);
        assert_eq!(FetchError::Cancelled.status_code(), None);
    }

    #[test]
    fn registration_error_from_anyhow_keeps_chain() {
        let source = anyhow::anyhow!("disk full").context("writing manifest");
        let err = RegistrationError::from(source);
        assert!(err.message.contains("writing manifest"));
        assert!(err.message.contains("disk full"));
    }

    #[test]
    fn item_error_wraps_both_sides() {
        let fetch: ItemError = FetchError::Cancelled.into();
        assert!(fetch.is_cancelled());

        let reg: ItemError = RegistrationError::new("rejected").into();
        assert!(!reg.is_cancelled());
        assert!(reg.to_string().contains("rejected"));
    }

    #[test]
    fn item_error_serialization_round_trip() {
        let err: ItemError = FetchError::transport("connection reset").into();
        let json = serde_json::to_string(&err).unwrap();

        let parsed: ItemError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }
}
