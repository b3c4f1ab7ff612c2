//! Tests for the worker state machine and per-directory processing

use nfind::TerminationPolicy;
use nfind::services::context::SearchContext;
use nfind::services::enumerate::portable::PortableEnumerator;
use nfind::services::matcher::NameSet;
use nfind::services::queue::{DirectoryTask, WorkQueue};
use nfind::services::worker::{Worker, WorkerState};
use nfind::CaseSensitivity;
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn context(names: &[&str]) -> SearchContext {
    SearchContext::new(NameSet::new(names, CaseSensitivity::Sensitive))
}

#[test]
fn test_eager_worker_gives_up_after_initial_wait() {
    let queue = WorkQueue::new();
    let ctx = context(&["x"]);
    let enumerator = PortableEnumerator::default();

    let worker = Worker::new(
        2,
        &queue,
        &ctx,
        &enumerator,
        TerminationPolicy::EagerExit {
            initial_wait: Duration::from_millis(40),
        },
    );
    assert_eq!(worker.state(), WorkerState::Seeding);

    let start = Instant::now();
    let report = worker.run();
    assert!(start.elapsed() >= Duration::from_millis(30));
    assert!(report.was_idle());
    assert_eq!(report.id, 2);
}

#[test]
fn test_counted_worker_drains_tree_and_closes_queue() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();
    fs::write(temp_dir.path().join("a/b/x"), b"").unwrap();

    let queue = WorkQueue::new();
    queue.enqueue(DirectoryTask::root(temp_dir.path()));
    let ctx = context(&["x"]);
    let enumerator = PortableEnumerator::default();

    let report = Worker::new(1, &queue, &ctx, &enumerator, TerminationPolicy::Counted).run();

    assert_eq!(report.directories, 3);
    assert!(queue.is_closed());
    assert_eq!(queue.outstanding(), 0);
    let (matches, errors, _) = ctx.into_parts();
    assert_eq!(matches.len(), 1);
    assert!(errors.is_empty());
}

#[test]
fn test_process_enqueues_children_with_next_depth() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("x"), b"").unwrap();

    let queue = WorkQueue::new();
    let ctx = context(&["x"]);
    let enumerator = PortableEnumerator::default();
    let mut worker = Worker::new(1, &queue, &ctx, &enumerator, TerminationPolicy::Counted);

    worker.process(&DirectoryTask::new(root, 3));

    let child = queue.try_take(Duration::ZERO).unwrap();
    assert_eq!(child.depth, 4);
    assert_eq!(child.path.file_name().unwrap(), "sub");
    assert_eq!(ctx.counters().matches_found, 1);
    assert_eq!(ctx.counters().entries_seen, 2);
}

#[test]
fn test_process_respects_depth_limit() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("x"), b"").unwrap();

    let queue = WorkQueue::new();
    let ctx = context(&["x"]).with_max_depth(Some(1));
    let enumerator = PortableEnumerator::default();
    let mut worker = Worker::new(1, &queue, &ctx, &enumerator, TerminationPolicy::Counted);

    worker.process(&DirectoryTask::root(root));
    assert!(queue.is_empty());
    assert_eq!(ctx.counters().matches_found, 1);

    worker.process(&DirectoryTask::new(root, 1));
    assert_eq!(ctx.counters().matches_found, 1);
}

#[test]
fn test_process_records_open_failure() {
    let temp_dir = TempDir::new().unwrap();
    let queue = WorkQueue::new();
    let ctx = context(&["x"]);
    let enumerator = PortableEnumerator::default();
    let mut worker = Worker::new(1, &queue, &ctx, &enumerator, TerminationPolicy::Counted);

    worker.process(&DirectoryTask::root(temp_dir.path().join("missing")));

    assert_eq!(ctx.directories_failed(), 1);
    assert_eq!(ctx.counters().directories_scanned, 0);
    let (_, errors, _) = ctx.into_parts();
    assert_eq!(errors[0].code, "ENOENT");
}
