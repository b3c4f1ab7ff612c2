//! Traversal worker: pulls directories, lists them, feeds the queue and sink.

use super::context::SearchContext;
use super::enumerate::{self, DirectoryEnumerator};
use super::paths::{display_path, join_child};
use super::queue::{DirectoryTask, WorkQueue};
use std::time::Duration;

/// First-take delay for workers other than #1 under [`TerminationPolicy::EagerExit`].
pub const DEFAULT_INITIAL_WAIT: Duration = Duration::from_millis(50);

/// How workers decide that no more work can appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationPolicy {
    /// Block on the queue until it closes at zero outstanding directories.
    #[default]
    Counted,
    /// Exit on the first empty poll after a finished directory.
    ///
    /// Worker 1 polls without waiting on its first take, every other worker
    /// waits `initial_wait` so that early directories have time to fan out.
    /// No directory is lost, but workers that give up early leave the rest of
    /// the search to fewer threads.
    EagerExit { initial_wait: Duration },
}

impl TerminationPolicy {
    #[must_use]
    pub fn eager() -> Self {
        TerminationPolicy::EagerExit {
            initial_wait: DEFAULT_INITIAL_WAIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Seeding,
    Draining,
    Done,
}

/// What a worker did before reaching [`WorkerState::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub directories: u64,
}

impl WorkerReport {
    /// A worker that never obtained a directory.
    #[must_use]
    pub fn was_idle(&self) -> bool {
        self.directories == 0
    }
}

/// Marks the held task finished even if processing unwinds.
struct TaskGuard<'a> {
    queue: &'a WorkQueue,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}

pub struct Worker<'a, E> {
    id: usize,
    queue: &'a WorkQueue,
    context: &'a SearchContext,
    enumerator: &'a E,
    policy: TerminationPolicy,
    state: WorkerState,
    directories: u64,
}

impl<'a, E: DirectoryEnumerator> Worker<'a, E> {
    pub fn new(
        id: usize,
        queue: &'a WorkQueue,
        context: &'a SearchContext,
        enumerator: &'a E,
        policy: TerminationPolicy,
    ) -> Self {
        Self {
            id,
            queue,
            context,
            enumerator,
            policy,
            state: WorkerState::Seeding,
            directories: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Run the worker to completion.
    pub fn run(mut self) -> WorkerReport {
        let mut current = None;

        loop {
            match self.state {
                WorkerState::Seeding => {
                    current = self.first_take();
                    self.state = if current.is_some() {
                        WorkerState::Draining
                    } else {
                        log::debug!("Worker {} found no work and exits without starting", self.id);
                        WorkerState::Done
                    };
                }
                WorkerState::Draining => {
                    if let Some(task) = current.take() {
                        let _guard = TaskGuard { queue: self.queue };
                        self.process(&task);
                    }
                    current = self.next_take();
                    if current.is_none() {
                        self.state = WorkerState::Done;
                    }
                }
                WorkerState::Done => break,
            }
        }

        log::debug!(
            "Worker {} done after {} directories",
            self.id,
            self.directories
        );
        WorkerReport {
            id: self.id,
            directories: self.directories,
        }
    }

    fn first_take(&self) -> Option<DirectoryTask> {
        match self.policy {
            TerminationPolicy::Counted => self.queue.take(),
            TerminationPolicy::EagerExit { initial_wait } => {
                let wait = if self.id == 1 {
                    Duration::ZERO
                } else {
                    initial_wait
                };
                self.queue.try_take(wait)
            }
        }
    }

    fn next_take(&self) -> Option<DirectoryTask> {
        match self.policy {
            TerminationPolicy::Counted => self.queue.take(),
            TerminationPolicy::EagerExit { .. } => self.queue.try_take(Duration::ZERO),
        }
    }

    /// Enumerate one directory. Errors are recorded, never propagated: a
    /// failed open skips the directory, a failed read keeps what was already
    /// seen and stops.
    pub fn process(&mut self, task: &DirectoryTask) {
        self.directories += 1;

        let listing = match enumerate::entries(self.enumerator, &task.path) {
            Ok(listing) => listing,
            Err(err) => {
                self.context.record_error(&task.path, &err);
                return;
            }
        };

        let child_depth = task.depth.saturating_add(1);
        let files_in_range = self.context.within_depth(child_depth);
        let descend = self
            .context
            .max_depth
            .is_none_or(|max| child_depth < max);
        let mut seen = 0u64;

        for entry in listing {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.context.record_error(&task.path, &err);
                    break;
                }
            };
            seen += 1;

            if entry.is_dir() {
                if !descend || (entry.is_reparse_point() && !self.context.follow_links) {
                    continue;
                }
                let child = join_child(&task.path, &entry.name);
                self.queue.enqueue(DirectoryTask::new(child, child_depth));
            } else if files_in_range && self.context.names.matches(&entry.name) {
                let path = join_child(&task.path, &entry.name);
                self.context.record_match(display_path(&path));
            }
        }

        log::debug!(
            "Worker {} listed {} ({seen} entries)",
            self.id,
            task.path.display()
        );
        self.context.register_directory(seen);
    }
}
