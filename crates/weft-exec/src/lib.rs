#![forbid(unsafe_code)]

//! Owner-context execution for weft.
//!
//! Collections in this workspace are bound to a single *owner* thread: the
//! only thread allowed to execute structural mutations and deliver change
//! notifications. This crate provides the two pieces that make that binding
//! work:
//!
//! - [`OwnerExecutor`]: an object-safe handle to some owner context, with an
//!   identity check (`is_owner`) and fire-and-forget job submission (`post`).
//!   [`OwnerExecutorExt::post_and_wait`] adds blocking submission on top.
//! - [`EventLoop`]: a concrete owner context backed by a dedicated thread
//!   draining an unbounded job queue.
//!
//! Any single-consumer queue can stand in for the owner context by
//! implementing [`OwnerExecutor`]; [`InlineExecutor`] does so trivially for
//! single-threaded use.

pub mod event_loop;
pub mod executor;

pub use event_loop::{EventLoop, Handle};
pub use executor::{InlineExecutor, Job, OwnerExecutor, OwnerExecutorExt, PostError};
