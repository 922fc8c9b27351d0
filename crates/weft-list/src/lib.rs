#![forbid(unsafe_code)]

//! A thread-marshalled observable list.
//!
//! [`ObservableList<T>`] is an ordered collection that may be mutated from
//! arbitrary worker threads while one designated owner thread reads it and
//! receives change notifications. Three pieces make that safe:
//!
//! - a single reader/writer gate over the backing sequence (concurrent
//!   reads, exclusive writes, guard-scoped release on every path);
//! - an owner-thread marshaller: structural mutations requested from any
//!   other thread are forwarded to the owner context's queue (see
//!   [`weft_exec::OwnerExecutor`]) instead of executing inline —
//!   fire-and-forget for mutations without a result, blocking for
//!   [`ObservableList::remove`];
//! - a change notifier publishing one [`ListEvent`] per structural
//!   mutation, synchronously on the owner thread, in subscriber
//!   registration order.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use weft_exec::{EventLoop, OwnerExecutorExt};
//! use weft_list::{ChangeKind, ObservableList};
//!
//! let event_loop = EventLoop::spawn();
//! let list = ObservableList::new(event_loop.handle());
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let _sub = list.subscribe(move |event| sink.lock().unwrap().push(event.kind));
//!
//! // Worker thread: the push is marshalled to the owner thread.
//! let worker_list = list.clone();
//! std::thread::spawn(move || worker_list.push("A".to_string()))
//!     .join()
//!     .unwrap();
//!
//! // Drain the owner queue, then observe the applied mutation.
//! event_loop.handle().post_and_wait(|| {}).unwrap();
//! assert_eq!(list.get(0), Some("A".to_string()));
//! assert_eq!(*seen.lock().unwrap(), vec![ChangeKind::Add]);
//! ```

pub mod event;
pub mod list;
pub mod subscription;

pub use event::{ChangeKind, ListEvent};
pub use list::{ListConfig, ListIter, ObservableList};
pub use subscription::{NotifyPolicy, Subscription};
