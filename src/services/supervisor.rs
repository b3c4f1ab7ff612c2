//! Search supervisor: seeds the queue, runs the worker pool, collects results.

use super::context::SearchContext;
use super::enumerate::portable::PortableEnumerator;
use super::enumerate::{DirectoryEnumerator, EnumeratorKind};
use super::matcher::NameSet;
use super::paths::{display_path, normalize_root};
use super::queue::{DirectoryTask, WorkQueue};
use super::worker::{Worker, WorkerReport};
use crate::models::SearchStats;
use crate::{Error, Result, SearchOptions, Summary};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// Runs one search per call; holds no state between searches.
#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    options: SearchOptions,
}

impl Supervisor {
    #[must_use]
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Search using the configured (or native) enumeration backend.
    pub fn run<S, P>(&self, names: &[S], roots: &[P]) -> Result<Summary>
    where
        S: AsRef<OsStr>,
        P: AsRef<Path>,
    {
        let kind = self.options.enumerator.unwrap_or_default().resolve();

        match kind {
            #[cfg(unix)]
            EnumeratorKind::Posix => {
                self.run_with(&super::enumerate::posix::PosixEnumerator, names, roots)
            }
            #[cfg(windows)]
            EnumeratorKind::Windows => {
                self.run_with(&super::enumerate::windows::WindowsEnumerator, names, roots)
            }
            _ => self.run_with(&PortableEnumerator, names, roots),
        }
    }

    /// Search using a caller-supplied enumeration backend.
    pub fn run_with<E, S, P>(&self, enumerator: &E, names: &[S], roots: &[P]) -> Result<Summary>
    where
        E: DirectoryEnumerator,
        S: AsRef<OsStr>,
        P: AsRef<Path>,
    {
        let opts = &self.options;
        let name_set = NameSet::new(names, opts.case_sensitivity);
        if name_set.is_empty() {
            return Err(Error::InvalidInput(
                "at least one file name is required".to_string(),
            ));
        }
        if opts.max_workers == 0 {
            return Err(Error::InvalidInput(
                "worker count must be greater than zero".to_string(),
            ));
        }
        let roots = normalize_roots(roots)?;

        let started_at = SystemTime::now();
        log::info!(
            "Searching {} root(s) for {} name(s) with {} worker(s) using the {} enumerator",
            roots.len(),
            name_set.len(),
            opts.max_workers,
            enumerator.kind()
        );

        let queue = WorkQueue::new();
        for root in &roots {
            queue.enqueue(DirectoryTask::root(root.clone()));
        }

        let context = SearchContext::new(name_set)
            .with_max_depth(opts.max_depth)
            .with_follow_links(opts.follow_links)
            .with_match_notifier(opts.match_notifier.clone())
            .with_progress(opts.progress_interval, opts.progress_notifier.clone());

        let reports = run_pool(opts, &queue, &context, enumerator)?;
        debug_assert!(queue.is_empty(), "workers exited with directories still queued");

        context.finalize_progress();
        let counters = context.counters();
        let directories_failed = context.directories_failed();
        let (matches, errors, progress) = context.into_parts();

        let stats = SearchStats {
            directories_scanned: counters.directories_scanned,
            directories_failed,
            entries_seen: counters.entries_seen,
            matches_found: counters.matches_found,
            workers: reports.len(),
            idle_workers: reports.iter().filter(|r| r.was_idle()).count(),
        };

        log::info!(
            "Search finished: {} match(es), {} directories listed, {} skipped",
            stats.matches_found,
            stats.directories_scanned,
            stats.directories_failed
        );

        Ok(Summary {
            roots: roots.iter().map(|root| display_path(root)).collect(),
            matches,
            errors,
            stats,
            started_at,
            finished_at: SystemTime::now(),
            enumerator: enumerator.kind(),
            progress,
        })
    }
}

fn normalize_roots<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>> {
    if roots.is_empty() {
        return Err(Error::InvalidInput(
            "at least one root directory is required".to_string(),
        ));
    }

    roots
        .iter()
        .map(|root| {
            let root = root.as_ref();
            if root.as_os_str().is_empty() {
                return Err(Error::InvalidInput("root path is empty".to_string()));
            }
            normalize_root(root).map_err(|err| {
                Error::InvalidInput(format!("cannot resolve root {}: {err}", root.display()))
            })
        })
        .collect()
}

/// Start `max_workers` workers on a dedicated pool and block until all are done.
fn run_pool<E: DirectoryEnumerator>(
    opts: &SearchOptions,
    queue: &WorkQueue,
    context: &SearchContext,
    enumerator: &E,
) -> Result<Vec<WorkerReport>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.max_workers)
        .thread_name(|index| format!("nfind-worker-{}", index + 1))
        .build()
        .map_err(|err| Error::System(format!("failed to start worker pool: {err}")))?;

    let reports = Mutex::new(Vec::with_capacity(opts.max_workers));
    let policy = opts.termination;

    pool.scope(|scope| {
        for id in 1..=opts.max_workers {
            let reports = &reports;
            scope.spawn(move |_| {
                let report = Worker::new(id, queue, context, enumerator, policy).run();
                reports
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(report);
            });
        }
    });
    drop(pool);

    let mut reports = reports.into_inner().unwrap_or_else(PoisonError::into_inner);
    reports.sort_by_key(|report| report.id);
    Ok(reports)
}
