#![forbid(unsafe_code)]

//! The [`OwnerExecutor`] trait: an abstract handle to an owner context.
//!
//! # Design
//!
//! An owner context is a single thread that serially executes submitted
//! jobs. The trait is deliberately minimal so that any single-consumer
//! queue (a dedicated loop thread, an actor mailbox, a UI event loop) can
//! implement it:
//!
//! - [`OwnerExecutor::is_owner`] answers "is the calling thread the one
//!   that drains this queue".
//! - [`OwnerExecutor::post`] submits a job without waiting for it to run.
//!
//! Blocking submission ([`OwnerExecutorExt::post_and_wait`]) is layered on
//! `post` with a one-shot channel, so implementors only provide the
//! fire-and-forget path.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Queue gone | owner context shut down | `post` returns [`PostError::Disconnected`] |
//! | Job dropped unrun | shutdown raced the submission | `post_and_wait` returns [`PostError::Disconnected`] |
//! | Wait from owner thread | `post_and_wait` called on the owner thread | deadlock (not detected) |

use std::sync::mpsc;

/// A unit of work submitted to an owner context.
pub type Job = Box<dyn FnOnce() + Send>;

/// Errors from submitting work to an owner context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostError {
    /// The owner context has shut down; the job did not and will not run.
    Disconnected,
}

impl std::fmt::Display for PostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "owner context disconnected"),
        }
    }
}

impl std::error::Error for PostError {}

/// Handle to an owner context: a single thread that serially executes
/// submitted jobs.
///
/// # Contract
///
/// 1. Jobs submitted through one handle run on the owner thread in
///    submission order.
/// 2. `is_owner` returns `true` exactly when the calling thread is the
///    thread that executes jobs for this context.
/// 3. `post` never blocks the caller on job execution.
pub trait OwnerExecutor: Send + Sync {
    /// Whether the calling thread is this context's owner thread.
    fn is_owner(&self) -> bool;

    /// Submit a job to run on the owner thread. Fire-and-forget: returns
    /// as soon as the job is queued.
    fn post(&self, job: Job) -> Result<(), PostError>;
}

/// Blocking submission, available on every [`OwnerExecutor`].
pub trait OwnerExecutorExt: OwnerExecutor {
    /// Submit `f` to the owner thread and block until it has run, returning
    /// its result.
    ///
    /// The wait is unbounded: there is no timeout and no cancellation. If
    /// the owner context shuts down before the job runs, the job is dropped
    /// and `Err(PostError::Disconnected)` is returned.
    ///
    /// Calling this *from* the owner thread deadlocks the queue: the loop
    /// cannot make progress while the current job is blocked on it. Callers
    /// that may already be on the owner thread must check `is_owner` first
    /// and run the closure inline.
    fn post_and_wait<R, F>(&self, f: F) -> Result<R, PostError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.post(Box::new(move || {
            // A dropped receiver just means the caller vanished; the job
            // itself still ran to completion.
            let _ = tx.send(f());
        }))?;
        rx.recv().map_err(|_| PostError::Disconnected)
    }
}

impl<E: OwnerExecutor + ?Sized> OwnerExecutorExt for E {}

/// An owner context that is always the calling thread.
///
/// Every thread is "the owner" and `post` runs the job inline before
/// returning. Useful for single-threaded consumers and as a test stand-in
/// where marshalling is irrelevant.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl OwnerExecutor for InlineExecutor {
    fn is_owner(&self) -> bool {
        true
    }

    fn post(&self, job: Job) -> Result<(), PostError> {
        job();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn post_error_display() {
        assert_eq!(
            PostError::Disconnected.to_string(),
            "owner context disconnected"
        );
    }

    #[test]
    fn inline_executor_is_always_owner() {
        assert!(InlineExecutor.is_owner());
    }

    #[test]
    fn inline_executor_runs_job_inline() {
        let ran = Arc::new(AtomicU32::new(0));
        let ran_clone = Arc::clone(&ran);
        InlineExecutor
            .post(Box::new(move || {
                ran_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn post_and_wait_returns_closure_result() {
        let result = InlineExecutor.post_and_wait(|| 6 * 7).unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn post_and_wait_through_dyn_handle() {
        let exec: &dyn OwnerExecutor = &InlineExecutor;
        let result = exec.post_and_wait(|| "ok".to_string()).unwrap();
        assert_eq!(result, "ok");
    }
}
