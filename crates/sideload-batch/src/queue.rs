//! Pending download queue.
//!
//! A plain FIFO over the items a caller has enqueued but not yet run.
//! No I/O happens here; the [`crate::BatchLoader`] drains the queue and
//! performs the side effects.
//!
//! The queue is a sync type with no internal locking. The loader owns it
//! and is responsible for synchronization.

use sideload_core::DownloadItem;
use std::collections::VecDeque;

/// FIFO of items waiting for the next batch run.
///
/// Duplicate keys are allowed: a later duplicate simply resolves from
/// the cache once the first copy has landed.
#[derive(Default)]
pub struct PendingQueue {
    items: VecDeque<DownloadItem>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Append an item at the back of the queue.
    pub fn push(&mut self, item: DownloadItem) {
        self.items.push_back(item);
    }

    /// Take every queued item, in enqueue order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<DownloadItem> {
        self.items.drain(..).collect()
    }

    /// Number of items waiting.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl std::fmt::Debug for PendingQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingQueue")
            .field("len", &self.items.len())
            .finish()
    }
}
