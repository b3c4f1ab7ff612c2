//! Shared, append-only collection of search results.

use crate::models::ErrorItem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Callback invoked for every match as it is recorded.
pub type MatchNotifier = Arc<dyn Fn(&str) + Send + Sync>;

/// Matched paths and per-directory failures gathered by all workers.
///
/// Paths are kept in arrival order and never deduplicated: the same file
/// reached through two roots is recorded twice.
#[derive(Default)]
pub struct ResultSink {
    matches: Mutex<Vec<String>>,
    errors: Mutex<Vec<ErrorItem>>,
    match_count: AtomicU64,
    notifier: Option<MatchNotifier>,
}

impl ResultSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_notifier(notifier: Option<MatchNotifier>) -> Self {
        Self {
            notifier,
            ..Self::default()
        }
    }

    pub fn record_match(&self, path: String) {
        if let Some(notifier) = &self.notifier {
            notifier(&path);
        }
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
        self.match_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self, path: &str, error: &std::io::Error) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ErrorItem::from_io(path, error));
    }

    #[must_use]
    pub fn match_count(&self) -> u64 {
        self.match_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<ErrorItem>) {
        let matches = self
            .matches
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let errors = self
            .errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (matches, errors)
    }
}
