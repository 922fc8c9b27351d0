#![forbid(unsafe_code)]

//! Dedicated owner thread draining an unbounded job queue.
//!
//! [`EventLoop::spawn`] starts a named thread that executes submitted jobs
//! one at a time, in arrival order, until it is shut down. [`Handle`] is the
//! cheap, clonable [`OwnerExecutor`] pointing at that thread.
//!
//! # Shutdown
//!
//! Shutdown is a message like any other: jobs queued ahead of it still run,
//! jobs queued behind it are dropped. [`EventLoop::shutdown`] (and `Drop`)
//! sends the message and joins the thread. After the thread exits, `post`
//! returns [`PostError::Disconnected`]; jobs that raced the shutdown message
//! into the queue are lost without notice to the submitter (a counted
//! `warn!` is logged on the loop side).

use std::sync::mpsc;
use std::thread::{self, JoinHandle, ThreadId};

use crate::executor::{Job, OwnerExecutor, PostError};

enum LoopMsg {
    Run(Job),
    Shutdown,
}

/// A dedicated owner thread with a serial job queue.
///
/// Dropping the loop shuts it down and joins the thread.
pub struct EventLoop {
    handle: Handle,
    join: Option<JoinHandle<()>>,
}

impl EventLoop {
    /// Spawn the owner thread and start draining jobs.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to spawn a thread.
    #[must_use]
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<LoopMsg>();
        let join = thread::Builder::new()
            .name("weft-owner".into())
            .spawn(move || run_loop(&rx))
            .expect("failed to spawn owner thread");
        let handle = Handle {
            sender: tx,
            owner: join.thread().id(),
        };
        Self {
            handle,
            join: Some(join),
        }
    }

    /// A clonable executor handle bound to this loop's thread.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Shut the loop down and join the owner thread.
    ///
    /// Jobs already queued ahead of the shutdown message still execute.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let _ = self.handle.sender.send(LoopMsg::Shutdown);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("owner", &self.handle.owner)
            .finish_non_exhaustive()
    }
}

/// Executor handle for an [`EventLoop`].
///
/// Clones share the same queue and owner thread. The handle stays valid
/// after the loop shuts down; submissions then fail with
/// [`PostError::Disconnected`].
#[derive(Clone)]
pub struct Handle {
    sender: mpsc::Sender<LoopMsg>,
    owner: ThreadId,
}

impl OwnerExecutor for Handle {
    fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    fn post(&self, job: Job) -> Result<(), PostError> {
        self.sender
            .send(LoopMsg::Run(job))
            .map_err(|_| PostError::Disconnected)
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").field("owner", &self.owner).finish()
    }
}

fn run_loop(rx: &mpsc::Receiver<LoopMsg>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            LoopMsg::Run(job) => {
                tracing::trace!("executing marshalled job");
                job();
            }
            LoopMsg::Shutdown => break,
        }
    }
    // Anything still queued behind the shutdown message is dropped unrun.
    let dropped = rx
        .try_iter()
        .filter(|msg| matches!(msg, LoopMsg::Run(_)))
        .count();
    if dropped > 0 {
        tracing::warn!(dropped, "owner loop shut down with pending jobs");
    }
}
