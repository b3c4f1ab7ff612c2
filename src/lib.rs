//! Parallel exact-name file search
//!
//! This library locates files by exact name below one or more root
//! directories. Directories are listed through the host's native enumeration
//! API and fanned out across a fixed pool of worker threads sharing one work
//! queue; results come back as an unordered, non-deduplicated list of paths.

pub mod cli;
pub mod models;
pub mod services;

pub use models::{ErrorItem, ProgressSnapshot, SearchStats};
pub use services::enumerate::EnumeratorKind;
pub use services::matcher::CaseSensitivity;
pub use services::sink::MatchNotifier;
pub use services::supervisor::Supervisor;
pub use services::worker::TerminationPolicy;

use std::ffi::OsStr;
use std::path::Path;
use std::result;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    System(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::System(msg) => write!(f, "System error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Callback receiving throttled progress snapshots.
pub type ProgressNotifier = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Options for a search
#[derive(Clone)]
pub struct SearchOptions {
    /// Size of the worker pool.
    pub max_workers: usize,
    /// Deepest level at which files are matched; roots are level 0, their
    /// entries level 1.
    pub max_depth: Option<u16>,
    /// Descend into symbolic links and junctions that point at directories.
    pub follow_links: bool,
    pub case_sensitivity: CaseSensitivity,
    /// Enumeration backend; `None` picks the native one.
    pub enumerator: Option<EnumeratorKind>,
    pub termination: TerminationPolicy,
    pub progress_interval: Duration,
    pub progress_notifier: Option<ProgressNotifier>,
    pub match_notifier: Option<MatchNotifier>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_workers: default_worker_count(),
            max_depth: None,
            follow_links: false,
            case_sensitivity: CaseSensitivity::native(),
            enumerator: None,
            termination: TerminationPolicy::Counted,
            progress_interval: Duration::from_secs(2),
            progress_notifier: None,
            match_notifier: None,
        }
    }
}

impl std::fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOptions")
            .field("max_workers", &self.max_workers)
            .field("max_depth", &self.max_depth)
            .field("follow_links", &self.follow_links)
            .field("case_sensitivity", &self.case_sensitivity)
            .field("enumerator", &self.enumerator)
            .field("termination", &self.termination)
            .field("progress_interval", &self.progress_interval)
            .finish_non_exhaustive()
    }
}

/// One worker per logical CPU.
#[must_use]
pub fn default_worker_count() -> usize {
    num_cpus::get().max(1)
}

/// Result of a search
#[derive(Debug)]
pub struct Summary {
    pub roots: Vec<String>,
    /// Matched file paths in discovery order; may contain duplicates.
    pub matches: Vec<String>,
    /// Directories that were skipped or only partially listed.
    pub errors: Vec<ErrorItem>,
    pub stats: SearchStats,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
    pub enumerator: EnumeratorKind,
    pub progress: Vec<ProgressSnapshot>,
}

impl Summary {
    /// Whether every reachable directory was listed without error.
    #[must_use]
    pub fn is_exhaustive(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Search `roots` for files named exactly like one of `names`.
///
/// # Arguments
/// * `names` - File names to match (no wildcards)
/// * `roots` - Directories to search below
/// * `opts` - Search options
///
/// # Returns
/// A Summary with every match and any directories that had to be skipped.
/// Per-directory failures never abort the search.
pub fn search<S, P>(names: &[S], roots: &[P], opts: &SearchOptions) -> Result<Summary>
where
    S: AsRef<OsStr>,
    P: AsRef<Path>,
{
    Supervisor::new(opts.clone()).run(names, roots)
}

/// Search with default options and a fixed worker count, returning only the
/// matched paths.
pub fn find_files<S, P>(names: &[S], roots: &[P], max_workers: usize) -> Result<Vec<String>>
where
    S: AsRef<OsStr>,
    P: AsRef<Path>,
{
    let opts = SearchOptions {
        max_workers,
        ..SearchOptions::default()
    };
    search(names, roots, &opts).map(|summary| summary.matches)
}
