//! Batch download orchestration for sideload.
//!
//! Callers enqueue archive downloads into a [`BatchLoader`], then run
//! the batch inline or on a background task. Archives land in a
//! filesystem cache keyed by item key, already-cached items skip the
//! network entirely, and every resolved archive is handed to the
//! caller's registrar.

#![deny(unused_crate_dependencies)]

// Re-export core types for convenience
pub use sideload_core::{
    BatchConfig, BatchEvent, DownloadItem, FetchError, ItemError, Progress, ProgressFn,
    RegistrationError,
};
pub use sideload_core::{
    ArchiveFetcherPort, ArchiveRegistrarPort, BatchEventEmitterPort, ResolvedArchive,
};

// Internal modules (pub(crate) to keep implementation private)
pub(crate) mod queue;

// Public API - the batch loader
mod loader;

pub use loader::{BatchHandle, BatchLoader, RunOptions};

// Re-export the queue for consumers that want to inspect pending work
pub use queue::PendingQueue;

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
