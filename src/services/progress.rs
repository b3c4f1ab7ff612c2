//! Throttled progress reporting for long-running searches.

use crate::models::ProgressSnapshot;
use std::time::{Duration, Instant};

const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Running totals fed to the throttler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounters {
    pub directories_scanned: u64,
    pub entries_seen: u64,
    pub matches_found: u64,
}

/// Time-based throttler governing progress event emission.
#[derive(Debug)]
pub struct ProgressThrottler {
    interval: Duration,
    last_emit: Option<Instant>,
    last_emitted: Option<ProgressCounters>,
}

impl Default for ProgressThrottler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressThrottler {
    /// Construct a throttler using the default interval of two seconds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(2))
    }

    /// Construct a throttler with the supplied minimum interval.
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            last_emit: None,
            last_emitted: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consider emitting a snapshot for the current counters.
    ///
    /// The first call only arms the timer.
    pub fn consider(
        &mut self,
        now: Instant,
        counters: ProgressCounters,
        timestamp_ms: u64,
    ) -> Option<ProgressSnapshot> {
        let Some(last_emit) = self.last_emit else {
            self.last_emit = Some(now);
            return None;
        };

        if now.saturating_duration_since(last_emit) < self.interval {
            return None;
        }

        Some(self.emit(now, counters, timestamp_ms))
    }

    /// Emit a final snapshot unless the counters have not moved since the last one.
    pub fn finish(
        &mut self,
        now: Instant,
        counters: ProgressCounters,
        timestamp_ms: u64,
    ) -> Option<ProgressSnapshot> {
        if self.last_emitted == Some(counters) {
            return None;
        }
        Some(self.emit(now, counters, timestamp_ms))
    }

    fn emit(&mut self, now: Instant, counters: ProgressCounters, timestamp_ms: u64) -> ProgressSnapshot {
        self.last_emit = Some(now);
        self.last_emitted = Some(counters);

        ProgressSnapshot {
            timestamp_ms,
            directories_scanned: counters.directories_scanned,
            entries_seen: counters.entries_seen,
            matches_found: counters.matches_found,
        }
    }
}
