//! Byte-level progress reporting for in-flight fetches.
//!
//! A `Progress` snapshot is handed to the caller-supplied `ProgressFn` as
//! chunks arrive. `ProgressThrottle` rate-limits intermediate updates so a
//! fast transfer does not flood the consumer; the first and final updates
//! of a transfer bypass the throttle so completion is never dropped.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Byte progress of a single in-flight fetch.
///
/// `bytes_total` is `None` when the server did not report a content length.
/// Scoped to one transfer and reset for each item; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Bytes transferred so far.
    pub bytes_done: u64,
    /// Total bytes expected, when the server reported one.
    pub bytes_total: Option<u64>,
}

impl Progress {
    /// Create a progress snapshot.
    #[must_use]
    pub const fn new(bytes_done: u64, bytes_total: Option<u64>) -> Self {
        Self {
            bytes_done,
            bytes_total,
        }
    }

    /// Whether the transfer has covered the reported total.
    ///
    /// Only decidable when the total is known; `false` otherwise.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.bytes_total.is_some_and(|total| self.bytes_done >= total)
    }

    /// Completion percentage, when the total is known and non-zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> Option<f64> {
        match self.bytes_total {
            Some(total) if total > 0 => Some((self.bytes_done as f64 / total as f64) * 100.0),
            _ => None,
        }
    }
}

/// Callback consuming progress updates for one fetch.
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// Rate-limiter for progress updates.
///
/// Ensures intermediate updates are not delivered more frequently than the
/// configured interval. The first check after construction or `reset`
/// always passes.
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Default minimum interval between intermediate updates.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    /// Create a new throttle with the specified minimum interval.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Check if enough time has passed to deliver another update,
    /// recording the emission time when it has.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Force the next check to return true.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percentage_known_total() {
        let progress = Progress::new(250, Some(1000));
        let pct = progress.percentage().unwrap();
        assert!((pct - 25.0).abs() < 0.01);
        assert!(!progress.is_complete());
    }

    #[test]
    fn progress_unknown_total_has_no_percentage() {
        let progress = Progress::new(4096, None);
        assert_eq!(progress.percentage(), None);
        assert!(!progress.is_complete());
    }

    #[test]
    fn progress_complete_when_done_reaches_total() {
        assert!(Progress::new(1000, Some(1000)).is_complete());
        assert!(Progress::new(0, Some(0)).is_complete());
    }

    #[test]
    fn throttle_first_emit_always_passes() {
        let mut throttle = ProgressThrottle::new(Duration::from_millis(100));
        assert!(throttle.should_emit());
    }

    #[test]
    fn throttle_respects_interval() {
        let mut throttle = ProgressThrottle::new(Duration::from_millis(50));
        assert!(throttle.should_emit());
        assert!(!throttle.should_emit()); // Too soon

        std::thread::sleep(Duration::from_millis(60));
        assert!(throttle.should_emit()); // Enough time passed
    }

    #[test]
    fn throttle_reset_allows_immediate_emit() {
        let mut throttle = ProgressThrottle::default();
        throttle.should_emit();
        assert!(!throttle.should_emit());

        throttle.reset();
        assert!(throttle.should_emit());
    }

    #[test]
    fn zero_interval_never_suppresses() {
        let mut throttle = ProgressThrottle::new(Duration::ZERO);
        assert!(throttle.should_emit());
        assert!(throttle.should_emit());
        assert!(throttle.should_emit());
    }
}
