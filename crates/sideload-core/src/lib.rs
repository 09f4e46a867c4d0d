//! Core domain types and ports for the sideload download pipeline.
//!
//! This crate holds everything the orchestration and transport crates
//! share: download items, batch events, the error taxonomy, progress
//! types, configuration, cache-root resolution, and the port traits the
//! adapters implement. It contains no HTTP client and no task spawning.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod errors;
pub mod events;
pub mod item;
pub mod paths;
pub mod ports;
pub mod progress;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use config::BatchConfig;
pub use errors::{ConfigError, FetchError, FetchResult, ItemError, RegistrationError};
pub use events::BatchEvent;
pub use item::{DownloadItem, SkipPredicate};
pub use ports::{
    ArchiveFetcherPort, ArchiveRegistrarPort, BatchEventEmitterPort, LoggingBatchEmitter,
    NoopBatchEmitter, ResolvedArchive,
};
pub use progress::{Progress, ProgressFn, ProgressThrottle};

// Re-export path utilities
pub use paths::{
    CACHE_DIR_ENV, ensure_cache_root, remove_cache_root, resolve_cache_root,
    validate_application_id,
};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
