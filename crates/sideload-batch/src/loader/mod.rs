//! Batch loader orchestration.
//!
//! [`BatchLoader`] is the front door of this crate: callers enqueue
//! items (or whole URLs), then run the batch either inline or on a
//! background task. A run drains the queue at the moment it starts and
//! transfers one archive at a time, in enqueue order.

mod handle;
mod runner;

pub use handle::{BatchHandle, RunOptions};

use crate::queue::PendingQueue;
use runner::{run_batch, RunContext};
use sideload_core::{
    ensure_cache_root, remove_cache_root, resolve_cache_root, ArchiveFetcherPort,
    ArchiveRegistrarPort, BatchConfig, ConfigError, DownloadItem, LoggingBatchEmitter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sequential archive download pipeline with a filesystem cache.
///
/// Each item resolves to `<cache root>/<key>`: if that file exists the
/// archive is handed to the registrar as-is, otherwise it is fetched
/// first. A batch run consumes the queue exactly once; re-running
/// without enqueueing anything is a no-op apart from the start and
/// finish announcements.
///
/// Presence checks and writes are not locked. Two loaders sharing one
/// cache root need external coordination.
pub struct BatchLoader {
    cache_root: PathBuf,
    use_cache: bool,
    pending: PendingQueue,
    fetcher: Arc<dyn ArchiveFetcherPort>,
    registrar: Arc<dyn ArchiveRegistrarPort>,
}

impl BatchLoader {
    /// Create a loader and prepare its cache directory.
    ///
    /// The cache root comes from `config` (explicit root, then the
    /// `SIDELOAD_CACHE_DIR` override, then the per-user default) and is
    /// created on the spot when caching is enabled. With caching
    /// disabled the root is still resolved but never touched, and the
    /// loader accepts no work: see [`Self::enqueue`].
    pub fn new(
        config: &BatchConfig,
        fetcher: Arc<dyn ArchiveFetcherPort>,
        registrar: Arc<dyn ArchiveRegistrarPort>,
    ) -> Result<Self, ConfigError> {
        let cache_root = resolve_cache_root(config)?;
        if config.use_cache {
            ensure_cache_root(&cache_root)?;
        }
        tracing::debug!(target: "sideload.batch", root = %cache_root.display(), "Batch loader ready");

        Ok(Self {
            cache_root,
            use_cache: config.use_cache,
            pending: PendingQueue::new(),
            fetcher,
            registrar,
        })
    }

    /// Directory archives are cached in.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Number of items waiting for the next run.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Add an item to the pending queue.
    ///
    /// The item is dropped on the spot when caching is disabled or when
    /// its skip predicate reports the resource as already available.
    /// Duplicate keys are accepted; the later copy resolves from the
    /// cache once the first has landed.
    pub fn enqueue(&mut self, item: DownloadItem) {
        if !self.use_cache {
            tracing::debug!(target: "sideload.batch", key = %item.key(), "Caching disabled, dropping item");
            return;
        }
        if item.should_skip() {
            tracing::debug!(target: "sideload.batch", key = %item.key(), "Skip predicate matched, dropping item");
            return;
        }
        self.pending.push(item);
    }

    /// Enqueue a download keyed by the last segment of the URL path.
    ///
    /// `https://example.com/lib/tools.jar` caches as `tools.jar`.
    pub fn request(&mut self, source_url: &str) -> Result<(), ConfigError> {
        let item = DownloadItem::from_url(source_url)?;
        self.enqueue(item);
        Ok(())
    }

    /// Run the pending batch inline, returning when every item has been
    /// resolved or given up on.
    ///
    /// No events surface to the caller; failed items are logged through
    /// `tracing` and the run continues with the next item.
    pub async fn run_sync(&mut self) {
        let items = self.pending.drain();
        let ctx = self.run_context();
        let listener = LoggingBatchEmitter::new();
        run_batch(&ctx, items, &listener, None, &CancellationToken::new()).await;
    }

    /// Run the pending batch on a background task.
    ///
    /// The queue is drained before this method returns, so a second call
    /// starts an empty run (which still announces itself) rather than
    /// re-processing the same items. Lifecycle events go to the listener
    /// in `options`; without one, failures are logged and everything
    /// else is dropped.
    pub fn run_async(&mut self, options: RunOptions) -> BatchHandle {
        let items = self.pending.drain();
        let ctx = self.run_context();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let RunOptions { listener, progress } = options;

        let handle = tokio::spawn(async move {
            run_batch(&ctx, items, &*listener, progress.as_ref(), &task_cancel).await;
        });

        BatchHandle { handle, cancel }
    }

    /// Delete every cached archive.
    ///
    /// The cache root itself is recreated (empty) when caching is
    /// enabled. Pending items are unaffected; they simply fetch again on
    /// the next run.
    pub fn clear_cache(&self) -> Result<(), ConfigError> {
        remove_cache_root(&self.cache_root)?;
        if self.use_cache {
            ensure_cache_root(&self.cache_root)?;
        }
        tracing::info!(target: "sideload.batch", root = %self.cache_root.display(), "Cache cleared");
        Ok(())
    }

    fn run_context(&self) -> RunContext {
        RunContext {
            cache_root: self.cache_root.clone(),
            fetcher: Arc::clone(&self.fetcher),
            registrar: Arc::clone(&self.registrar),
        }
    }
}
