//! Shared queue of directories awaiting enumeration.
//!
//! Termination is decided by an outstanding-task count: every enqueue bumps
//! it, every finished directory drops it, and the queue closes itself the
//! moment it reaches zero. A directory is always counted before its parent is
//! finished, so the count can only hit zero once no worker holds a task that
//! could still produce children. Closing drops the only sender, which wakes
//! every worker blocked in [`WorkQueue::take`].

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// A directory waiting to be enumerated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTask {
    pub path: PathBuf,

    /// Distance from the root this task descends from (0 = root)
    pub depth: u16,
}

impl DirectoryTask {
    pub fn new(path: impl Into<PathBuf>, depth: u16) -> Self {
        Self {
            path: path.into(),
            depth,
        }
    }

    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self::new(path, 0)
    }
}

/// Queue throughput counters
#[derive(Debug, Default)]
pub struct QueueStats {
    pub enqueued: AtomicU64,
    pub dequeued: AtomicU64,
}

impl QueueStats {
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }
}

/// Unbounded multi-producer / multi-consumer directory queue
pub struct WorkQueue {
    sender: RwLock<Option<Sender<DirectoryTask>>>,
    receiver: Receiver<DirectoryTask>,
    outstanding: AtomicUsize,
    stats: QueueStats,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender: RwLock::new(Some(sender)),
            receiver,
            outstanding: AtomicUsize::new(0),
            stats: QueueStats::default(),
        }
    }

    /// Add a directory for later consumption. Never blocks.
    ///
    /// Returns `false` only if the queue has already closed, which cannot
    /// happen while the caller is processing a task.
    pub fn enqueue(&self, task: DirectoryTask) -> bool {
        self.outstanding.fetch_add(1, Ordering::SeqCst);

        let guard = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        let sent = guard
            .as_ref()
            .is_some_and(|sender| sender.send(task).is_ok());
        drop(guard);

        if sent {
            self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        } else {
            log::warn!("Directory enqueued after the work queue closed; dropping it");
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
        }
        sent
    }

    /// Remove one task, waiting up to `timeout` for one to appear.
    ///
    /// A zero timeout polls without blocking. Returns `None` on timeout or
    /// once the queue has closed and drained.
    pub fn try_take(&self, timeout: Duration) -> Option<DirectoryTask> {
        let task = if timeout.is_zero() {
            self.receiver.try_recv().ok()
        } else {
            self.receiver.recv_timeout(timeout).ok()
        };
        self.record_take(task)
    }

    /// Block until a task is available or the queue closes.
    pub fn take(&self) -> Option<DirectoryTask> {
        let task = self.receiver.recv().ok();
        self.record_take(task)
    }

    fn record_take(&self, task: Option<DirectoryTask>) -> Option<DirectoryTask> {
        if task.is_some() {
            self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
        }
        task
    }

    /// Mark one taken task as fully processed; closes the queue at zero.
    pub fn task_done(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "task_done called more often than enqueue");
        if previous == 1 {
            log::debug!("No outstanding directories left; closing work queue");
            self.close();
        }
    }

    /// Close the queue; blocked and future takes return `None` once drained.
    pub fn close(&self) {
        let mut guard = self.sender.write().unwrap_or_else(PoisonError::into_inner);
        guard.take();
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Directories enqueued but not yet fully processed.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Directories currently waiting in the queue.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}
