//! Tests for the shared directory queue and its termination count

use nfind::services::queue::{DirectoryTask, WorkQueue};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_enqueue_then_take_in_fifo_order() {
    let queue = WorkQueue::new();
    assert!(queue.enqueue(DirectoryTask::root("/a")));
    assert!(queue.enqueue(DirectoryTask::new("/a/b", 1)));

    assert_eq!(queue.len(), 2);
    assert_eq!(queue.outstanding(), 2);
    assert_eq!(queue.try_take(Duration::ZERO), Some(DirectoryTask::root("/a")));
    assert_eq!(queue.try_take(Duration::ZERO), Some(DirectoryTask::new("/a/b", 1)));
    assert!(queue.is_empty());

    // Taking does not finish a task
    assert_eq!(queue.outstanding(), 2);
    assert_eq!(queue.stats().enqueued(), 2);
    assert_eq!(queue.stats().dequeued(), 2);
}

#[test]
fn test_try_take_times_out_on_empty_queue() {
    let queue = WorkQueue::new();
    let start = Instant::now();
    assert!(queue.try_take(Duration::from_millis(30)).is_none());
    assert!(start.elapsed() >= Duration::from_millis(25));
    assert!(queue.try_take(Duration::ZERO).is_none());
    assert!(!queue.is_closed());
}

#[test]
fn test_queue_closes_when_last_task_is_done() {
    let queue = WorkQueue::new();
    queue.enqueue(DirectoryTask::root("/r"));
    let task = queue.take().unwrap();

    // Children are counted before the parent finishes
    queue.enqueue(DirectoryTask::new(task.path.join("c"), 1));
    queue.task_done();
    assert!(!queue.is_closed());
    assert_eq!(queue.outstanding(), 1);

    assert!(queue.take().is_some());
    queue.task_done();
    assert!(queue.is_closed());
    assert_eq!(queue.outstanding(), 0);
    assert!(queue.take().is_none());
}

#[test]
fn test_closing_wakes_blocked_takers() {
    let queue = Arc::new(WorkQueue::new());
    queue.enqueue(DirectoryTask::root("/only"));
    assert!(queue.take().is_some());

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.take())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    queue.task_done();

    for waiter in waiters {
        assert!(waiter.join().unwrap().is_none());
    }
}

#[test]
fn test_enqueue_after_close_is_rejected() {
    let queue = WorkQueue::new();
    queue.close();
    assert!(!queue.enqueue(DirectoryTask::root("/late")));
    assert_eq!(queue.outstanding(), 0);
    assert!(queue.is_empty());
}
