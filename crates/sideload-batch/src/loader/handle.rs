//! Options and handle for asynchronous batch runs.

use sideload_core::{BatchEventEmitterPort, LoggingBatchEmitter, ProgressFn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Configuration for a single [`crate::BatchLoader::run_async`] call.
///
/// The default listener logs failed items through `tracing` and ignores
/// everything else. Installing a listener replaces it entirely, so a
/// caller that still wants failure logs has to do its own.
pub struct RunOptions {
    pub(crate) listener: Box<dyn BatchEventEmitterPort>,
    pub(crate) progress: Option<ProgressFn>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self {
            listener: Box::new(LoggingBatchEmitter::new()),
            progress: None,
        }
    }

    /// Replace the default listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Box<dyn BatchEventEmitterPort>) -> Self {
        self.listener = listener;
        self
    }

    /// Receive per-item transfer progress.
    ///
    /// The callback is shared by every item in the run; snapshots from
    /// consecutive items arrive on the same callback in item order.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("has_progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

/// Handle to a batch run started with [`crate::BatchLoader::run_async`].
///
/// Dropping the handle detaches the run; it keeps going to completion.
#[derive(Debug)]
pub struct BatchHandle {
    pub(crate) handle: JoinHandle<()>,
    pub(crate) cancel: CancellationToken,
}

impl BatchHandle {
    /// Request cooperative cancellation.
    ///
    /// The item currently transferring is abandoned at the next chunk
    /// boundary and its partial file is removed; items not yet started
    /// are skipped. The run still emits its closing event.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the run has completed.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to complete.
    pub async fn wait(self) {
        if let Err(err) = self.handle.await {
            tracing::warn!(target: "sideload.batch", error = %err, "Batch task did not join cleanly");
        }
    }
}
