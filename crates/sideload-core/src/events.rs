//! Batch lifecycle events - discriminated union for everything a listener observes.

use serde::{Deserialize, Serialize};

use crate::errors::ItemError;

/// Single discriminated union for all batch lifecycle events.
///
/// Delivery is totally ordered: `BatchStarted` first; then, for each item
/// in FIFO order, either `FileExists` (cache hit) or `FileFetchStarted`
/// followed by `FileFetchFinished` or `DownloadException`; finally
/// `BatchFinished`, which is emitted even when items failed or the run was
/// cancelled. A registration failure raises a `DownloadException` after
/// the item's `FileExists` or `FileFetchFinished`. Events for one item
/// are never interleaved with another's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// The batch run has started.
    BatchStarted,

    /// The item's target path already existed; no transfer occurred.
    FileExists {
        /// Key of the resolved item.
        key: String,
    },

    /// A network fetch for the item has begun.
    FileFetchStarted {
        /// Key of the item being fetched.
        key: String,
    },

    /// The item's transfer completed and the archive landed in the cache.
    FileFetchFinished {
        /// Key of the fetched item.
        key: String,
    },

    /// The item failed to resolve; the batch keeps running.
    DownloadException {
        /// Key of the failed item.
        key: String,
        /// What went wrong (fetch or registration).
        error: ItemError,
    },

    /// The batch run has finished, regardless of individual outcomes.
    BatchFinished,
}

impl BatchEvent {
    /// Create a cache-hit event.
    pub fn exists(key: impl Into<String>) -> Self {
        Self::FileExists { key: key.into() }
    }

    /// Create a fetch-started event.
    pub fn fetch_started(key: impl Into<String>) -> Self {
        Self::FileFetchStarted { key: key.into() }
    }

    /// Create a fetch-finished event.
    pub fn fetch_finished(key: impl Into<String>) -> Self {
        Self::FileFetchFinished { key: key.into() }
    }

    /// Create a per-item failure event.
    pub fn exception(key: impl Into<String>, error: impl Into<ItemError>) -> Self {
        Self::DownloadException {
            key: key.into(),
            error: error.into(),
        }
    }

    /// Get the item key from any per-item event.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::BatchStarted | Self::BatchFinished => None,
            Self::FileExists { key }
            | Self::FileFetchStarted { key }
            | Self::FileFetchFinished { key }
            | Self::DownloadException { key, .. } => Some(key),
        }
    }

    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::BatchStarted => "batch:started",
            Self::FileExists { .. } => "file:exists",
            Self::FileFetchStarted { .. } => "file:fetch_started",
            Self::FileFetchFinished { .. } => "file:fetch_finished",
            Self::DownloadException { .. } => "file:exception",
            Self::BatchFinished => "batch:finished",
        }
    }
}
