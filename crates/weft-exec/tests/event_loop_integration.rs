//! End-to-end checks of the event loop's ordering and marshalling contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use weft_exec::{EventLoop, OwnerExecutor, OwnerExecutorExt};

#[test]
fn jobs_run_in_submission_order() {
    let event_loop = EventLoop::spawn();
    let handle = event_loop.handle();
    let log = Arc::new(Mutex::new(Vec::new()));

    for i in 0..100 {
        let log = Arc::clone(&log);
        handle
            .post(Box::new(move || log.lock().unwrap().push(i)))
            .unwrap();
    }
    handle.post_and_wait(|| {}).unwrap();

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen, (0..100).collect::<Vec<_>>());
}

#[test]
fn all_jobs_run_on_the_same_owner_thread() {
    let event_loop = EventLoop::spawn();
    let handle = event_loop.handle();

    let first = handle.post_and_wait(|| thread::current().id()).unwrap();
    let second = handle.post_and_wait(|| thread::current().id()).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, thread::current().id());
}

#[test]
fn post_and_wait_carries_the_result_back() {
    let event_loop = EventLoop::spawn();
    let handle = event_loop.handle();
    let value = handle
        .post_and_wait(|| "computed on the owner thread".to_string())
        .unwrap();
    assert_eq!(value, "computed on the owner thread");
}

#[test]
fn concurrent_submitters_all_observed() {
    let event_loop = EventLoop::spawn();
    let handle = event_loop.handle();
    let count = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..16)
        .map(|_| {
            let handle = handle.clone();
            let count = Arc::clone(&count);
            thread::spawn(move || {
                for _ in 0..50 {
                    let count = Arc::clone(&count);
                    handle
                        .post(Box::new(move || {
                            count.fetch_add(1, Ordering::SeqCst);
                        }))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    handle.post_and_wait(|| {}).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 16 * 50);
}

#[test]
fn handle_outlives_the_loop() {
    let event_loop = EventLoop::spawn();
    let handle = event_loop.handle();
    event_loop.shutdown();

    assert!(!handle.is_owner());
    assert!(handle.post(Box::new(|| {})).is_err());
}
