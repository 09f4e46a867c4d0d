//! Batch run execution.
//!
//! [`run_batch`] drives one drained batch to completion: item by item,
//! in enqueue order, emitting lifecycle events around each step. A
//! failed item never aborts the run; cancellation stops it after the
//! item currently in flight.

use sideload_core::{
    ArchiveFetcherPort, ArchiveRegistrarPort, BatchEvent, BatchEventEmitterPort, DownloadItem,
    FetchError, ProgressFn, ResolvedArchive,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a run needs, detached from the loader so the run can live
/// on a spawned task.
pub(crate) struct RunContext {
    pub cache_root: PathBuf,
    pub fetcher: Arc<dyn ArchiveFetcherPort>,
    pub registrar: Arc<dyn ArchiveRegistrarPort>,
}

/// Process `items` in order, reporting to `listener`.
///
/// `BatchStarted` is always emitted first and `BatchFinished` always
/// last, even when `items` is empty or the run is cancelled partway
/// through. Item failures surface as `DownloadException` events; the
/// listener decides what to do with them.
pub(crate) async fn run_batch(
    ctx: &RunContext,
    items: Vec<DownloadItem>,
    listener: &dyn BatchEventEmitterPort,
    progress: Option<&ProgressFn>,
    cancel: &CancellationToken,
) {
    tracing::info!(target: "sideload.batch", count = items.len(), "Batch run started");
    listener.emit(BatchEvent::BatchStarted);

    for item in &items {
        if cancel.is_cancelled() {
            tracing::info!(target: "sideload.batch", key = %item.key(), "Cancelled, skipping remaining items");
            break;
        }
        let stopped = run_item(ctx, item, listener, progress, cancel).await;
        if stopped {
            break;
        }
    }

    listener.emit(BatchEvent::BatchFinished);
    tracing::info!(target: "sideload.batch", "Batch run finished");
}

/// Resolve a single item, returning `true` when the run must stop.
///
/// Events follow the transfer, not the registration: `FileFetchFinished`
/// marks the archive landing in the cache, and a registration failure
/// after it raises its own `DownloadException`.
async fn run_item(
    ctx: &RunContext,
    item: &DownloadItem,
    listener: &dyn BatchEventEmitterPort,
    progress: Option<&ProgressFn>,
    cancel: &CancellationToken,
) -> bool {
    let key = item.key();
    let dest = ctx.cache_root.join(key);

    // Existence alone counts as resolved; archives are never re-verified.
    if dest.exists() {
        tracing::debug!(target: "sideload.batch", key = %key, "Archive already cached");
        listener.emit(BatchEvent::exists(key));
        let archive = ResolvedArchive {
            key: key.to_string(),
            path: dest,
            from_cache: true,
        };
        register(ctx, listener, &archive).await;
        return false;
    }

    listener.emit(BatchEvent::fetch_started(key));
    tracing::info!(target: "sideload.batch", key = %key, url = %item.source_url(), "Fetching archive");

    let fetched = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(FetchError::Cancelled),
        result = ctx.fetcher.fetch_archive(item.source_url(), &dest, progress.cloned()) => result,
    };

    match fetched {
        Ok(bytes) => {
            tracing::info!(target: "sideload.batch", key = %key, bytes, "Fetch complete");
            listener.emit(BatchEvent::fetch_finished(key));
            let archive = ResolvedArchive {
                key: key.to_string(),
                path: dest,
                from_cache: false,
            };
            register(ctx, listener, &archive).await;
            false
        }
        Err(err) => {
            let stopped = err.is_cancelled();
            if stopped {
                tracing::info!(target: "sideload.batch", key = %key, "Fetch cancelled");
            }
            listener.emit(BatchEvent::exception(key, err));
            stopped
        }
    }
}

async fn register(
    ctx: &RunContext,
    listener: &dyn BatchEventEmitterPort,
    archive: &ResolvedArchive,
) {
    if let Err(err) = ctx.registrar.register(archive).await {
        listener.emit(BatchEvent::exception(archive.key.clone(), err));
    }
}
