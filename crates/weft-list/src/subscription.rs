#![forbid(unsafe_code)]

//! Subscriber registry and the RAII [`Subscription`] guard.
//!
//! # Design
//!
//! Callbacks are stored as `Weak` references; the [`Subscription`] guard
//! handed back to the caller holds the only strong reference. Dropping the
//! guard unsubscribes the callback, and dead entries are pruned lazily on
//! the next notification cycle.
//!
//! # Invariants
//!
//! 1. Subscribers are notified synchronously, in registration order.
//! 2. A callback is never invoked after its [`Subscription`] is dropped.
//! 3. Notification with zero subscribers is a no-op.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use crate::event::ListEvent;

type CallbackArc<T> = Arc<dyn Fn(&ListEvent<T>) + Send + Sync>;
type CallbackWeak<T> = Weak<dyn Fn(&ListEvent<T>) + Send + Sync>;

/// How subscriber panics are handled during notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// A panicking subscriber unwinds through the mutation call. Later
    /// subscribers do not run, and the unwind poisons the list's gate.
    #[default]
    Propagate,
    /// Each subscriber runs under `catch_unwind`; a panic is logged and the
    /// remaining subscribers still run.
    Isolate,
}

pub(crate) struct SubscriberRegistry<T> {
    subscribers: Mutex<Vec<CallbackWeak<T>>>,
}

impl<T: 'static> SubscriberRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(
        &self,
        callback: impl Fn(&ListEvent<T>) + Send + Sync + 'static,
    ) -> Subscription {
        let strong: CallbackArc<T> = Arc::new(callback);
        let weak = Arc::downgrade(&strong);
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of registered subscribers, counting dead ones not yet pruned.
    pub(crate) fn len(&self) -> usize {
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .len()
    }

    /// Deliver `event` to every live subscriber, pruning dead ones.
    pub(crate) fn notify(&self, event: &ListEvent<T>, policy: NotifyPolicy) {
        // Collect live callbacks first so the registry lock is not held
        // while user code runs.
        let callbacks: Vec<CallbackArc<T>> = {
            let mut subscribers = self
                .subscribers
                .lock()
                .expect("subscriber registry poisoned");
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for callback in &callbacks {
            match policy {
                NotifyPolicy::Propagate => callback(event),
                NotifyPolicy::Isolate => {
                    if panic::catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                        tracing::error!("list subscriber panicked during notification");
                    }
                }
            }
        }
    }
}

/// RAII guard for a registered subscriber.
///
/// Dropping the guard releases the callback's only strong reference; the
/// registry prunes the dead entry on the next notification cycle.
pub struct Subscription {
    _guard: Box<dyn Any + Send>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
