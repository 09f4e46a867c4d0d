//! Batch event emitter port.
//!
//! Abstracts event delivery so the loader can announce batch progress
//! without coupling to a transport (channels, UI bridges, logs).

use crate::events::BatchEvent;

/// Port for emitting batch lifecycle events.
///
/// Implementations handle the actual delivery and must not block; the
/// loader calls `emit` from its single worker between transfers.
pub trait BatchEventEmitterPort: Send + Sync {
    /// Emit a batch event.
    fn emit(&self, event: BatchEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// Enables cloning of `Arc<dyn BatchEventEmitterPort>` without
    /// requiring the underlying type to implement `Clone`.
    fn clone_box(&self) -> Box<dyn BatchEventEmitterPort>;
}

/// An event emitter that discards everything.
///
/// Suitable for unit tests that do not verify emission and for callers
/// that poll outcomes some other way.
#[derive(Debug, Clone, Default)]
pub struct NoopBatchEmitter;

impl NoopBatchEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BatchEventEmitterPort for NoopBatchEmitter {
    fn emit(&self, _event: BatchEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn BatchEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// The default listener used when a caller supplies none.
///
/// Status events are dropped; per-item failures are logged through
/// `tracing` at warn level.
#[derive(Debug, Clone, Default)]
pub struct LoggingBatchEmitter;

impl LoggingBatchEmitter {
    /// Create a new logging emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BatchEventEmitterPort for LoggingBatchEmitter {
    fn emit(&self, event: BatchEvent) {
        if let BatchEvent::DownloadException { key, error } = event {
            tracing::warn!(target: "sideload.batch", key = %key, error = %error, "Item failed");
        }
    }

    fn clone_box(&self) -> Box<dyn BatchEventEmitterPort> {
        Box::new(self.clone())
    }
}
