//! Archive registrar port definition.
//!
//! The registrar is the sole hook through which a resolved file re-enters
//! the embedding application - typically by handing the path to a plugin
//! or asset loader. The pipeline itself never interprets file contents.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::RegistrationError;

/// Information about a resolved item, handed to the registrar.
///
/// Pure data transfer object: one per resolved item, whether the bytes
/// came over the network or were already cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArchive {
    /// Key of the resolved item.
    pub key: String,
    /// Local path of the resolved file, directly under the cache root.
    pub path: PathBuf,
    /// Whether the file was already cached (no transfer occurred).
    pub from_cache: bool,
}

impl ResolvedArchive {
    /// Local path of the resolved file.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.path
    }
}

/// Port for handing resolved archives back to the caller.
///
/// Invoked once per successfully resolved item (cache hit or fresh
/// download). A returned error is surfaced as a `DownloadException` for
/// that item; the batch keeps running.
///
/// # Usage
///
/// ```ignore
/// let registrar: Arc<dyn ArchiveRegistrarPort> = /* ... */;
/// registrar.register(&resolved).await?;
/// ```
#[async_trait]
pub trait ArchiveRegistrarPort: Send + Sync {
    /// Register one resolved archive with the embedding application.
    async fn register(&self, archive: &ResolvedArchive) -> Result<(), RegistrationError>;
}
