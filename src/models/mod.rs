//! Data models for search diagnostics, progress, and statistics

use serde::{Deserialize, Serialize};

/// A directory that could not be (fully) enumerated during a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl ErrorItem {
    /// Classify an I/O error raised while listing `path`.
    #[must_use]
    pub fn from_io(path: &str, error: &std::io::Error) -> Self {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        Self {
            path: path.to_string(),
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Point-in-time view of search progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub timestamp_ms: u64,
    pub directories_scanned: u64,
    pub entries_seen: u64,
    pub matches_found: u64,
}

/// Counters collected over one search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub directories_scanned: u64,
    pub directories_failed: u64,
    pub entries_seen: u64,
    pub matches_found: u64,
    pub workers: usize,
    /// Workers that exited without ever claiming a directory.
    pub idle_workers: usize,
}
