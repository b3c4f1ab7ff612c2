//! Per-search state shared by all workers.

use super::matcher::NameSet;
use super::progress::{ProgressCounters, ProgressThrottler};
use super::sink::{MatchNotifier, ResultSink};
use crate::ProgressNotifier;
use crate::models::{ErrorItem, ProgressSnapshot};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Read-mostly search parameters plus the shared result sink and counters.
pub struct SearchContext {
    pub names: NameSet,
    pub max_depth: Option<u16>,
    pub follow_links: bool,
    sink: ResultSink,
    directories_scanned: AtomicU64,
    directories_failed: AtomicU64,
    entries_seen: AtomicU64,
    progress_events: Mutex<Vec<ProgressSnapshot>>,
    progress_throttler: Mutex<ProgressThrottler>,
    progress_notifier: Option<ProgressNotifier>,
    start_instant: Instant,
}

impl SearchContext {
    #[must_use]
    pub fn new(names: NameSet) -> Self {
        Self {
            names,
            max_depth: None,
            follow_links: false,
            sink: ResultSink::new(),
            directories_scanned: AtomicU64::new(0),
            directories_failed: AtomicU64::new(0),
            entries_seen: AtomicU64::new(0),
            progress_events: Mutex::new(Vec::new()),
            progress_throttler: Mutex::new(ProgressThrottler::new()),
            progress_notifier: None,
            start_instant: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<u16>) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    #[must_use]
    pub fn with_match_notifier(mut self, notifier: Option<MatchNotifier>) -> Self {
        self.sink = ResultSink::with_notifier(notifier);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, interval: Duration, notifier: Option<ProgressNotifier>) -> Self {
        self.progress_throttler = Mutex::new(ProgressThrottler::with_interval(interval));
        self.progress_notifier = notifier;
        self
    }

    /// Whether files found at `depth` are still within the depth limit.
    #[must_use]
    pub fn within_depth(&self, depth: u16) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }

    pub fn record_match(&self, path: String) {
        log::trace!("Match: {path}");
        self.sink.record_match(path);
    }

    /// Record a directory that failed to open or failed mid-listing.
    pub fn record_error(&self, path: &Path, error: &std::io::Error) {
        let path = path.to_string_lossy();
        log::warn!("Skipping {path}: {error}");
        self.directories_failed.fetch_add(1, Ordering::Relaxed);
        self.sink.record_error(&path, error);
    }

    /// Account for one enumerated directory and consider emitting progress.
    pub fn register_directory(&self, entries: u64) {
        self.directories_scanned.fetch_add(1, Ordering::Relaxed);
        self.entries_seen.fetch_add(entries, Ordering::Relaxed);

        let now = Instant::now();
        let elapsed_ms = self.elapsed_ms(now);
        let counters = self.counters();

        let mut throttler = self
            .progress_throttler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = throttler.consider(now, counters, elapsed_ms) {
            drop(throttler);
            self.publish(snapshot);
        }
    }

    /// Emit a closing snapshot once every worker is done.
    pub fn finalize_progress(&self) {
        let now = Instant::now();
        let elapsed_ms = self.elapsed_ms(now);
        let counters = self.counters();

        let mut throttler = self
            .progress_throttler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = throttler.finish(now, counters, elapsed_ms) {
            drop(throttler);
            self.publish(snapshot);
        }
    }

    fn publish(&self, snapshot: ProgressSnapshot) {
        if let Some(notifier) = &self.progress_notifier {
            notifier(&snapshot);
        }
        self.progress_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot);
    }

    #[must_use]
    pub fn counters(&self) -> ProgressCounters {
        ProgressCounters {
            directories_scanned: self.directories_scanned.load(Ordering::Relaxed),
            entries_seen: self.entries_seen.load(Ordering::Relaxed),
            matches_found: self.sink.match_count(),
        }
    }

    #[must_use]
    pub fn directories_failed(&self) -> u64 {
        self.directories_failed.load(Ordering::Relaxed)
    }

    fn elapsed_ms(&self, now: Instant) -> u64 {
        let millis = now
            .checked_duration_since(self.start_instant)
            .unwrap_or_default()
            .as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<ErrorItem>, Vec<ProgressSnapshot>) {
        let (matches, errors) = self.sink.into_parts();
        let progress = self
            .progress_events
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (matches, errors, progress)
    }
}
