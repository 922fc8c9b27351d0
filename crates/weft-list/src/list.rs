#![forbid(unsafe_code)]

//! The thread-marshalled observable list.
//!
//! # Design
//!
//! [`ObservableList<T>`] is an ordered sequence guarded by a single
//! reader/writer gate, permanently bound to one owner context (an
//! [`OwnerExecutor`]). Reads and in-place replacement run on the calling
//! thread under the gate. Structural mutations (push, insert, clear,
//! remove, remove_at) must run on the owner thread: a call from any other
//! thread is marshalled to the owner context's queue instead of executing
//! inline. Change notifications are therefore always delivered on the
//! owner thread, while the write side of the gate is still held.
//!
//! Cloning the list produces another handle to the same sequence,
//! subscribers, and owner binding.
//!
//! # Dispatch per operation
//!
//! | Operation | Thread | Cross-thread dispatch | Event |
//! |-----------|--------|----------------------|-------|
//! | `push` | owner | fire-and-forget | `Add{item}` |
//! | `insert` | owner | fire-and-forget | `Add{item, index}` |
//! | `clear` | owner | fire-and-forget | `Reset` |
//! | `remove_at` | owner | fire-and-forget | `Reset` or none |
//! | `remove` | owner | blocking (needs the `bool`) | `Reset` or none |
//! | `set` | caller | none | never |
//! | reads | caller | none | never |
//!
//! # Failure Modes
//!
//! - **Owner context gone**: fire-and-forget mutations are dropped with a
//!   `warn!`; `remove` logs and reports `false`. No retry, no timeout.
//! - **Out-of-range writes** (`set`, `remove_at`, marshalled `insert`):
//!   absorbed as no-ops so that races between a reader snapshotting `len`
//!   and a concurrent shrink cannot crash a worker thread or the owner
//!   loop.
//! - **Re-entrancy**: a subscriber calling back into the list deadlocks on
//!   the non-reentrant gate. Re-entrant mutation from a notification is a
//!   design bug in the subscriber graph.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use weft_exec::{OwnerExecutor, OwnerExecutorExt};

use crate::event::ListEvent;
use crate::subscription::{NotifyPolicy, SubscriberRegistry, Subscription};

const GATE_POISONED: &str = "list gate poisoned";

/// Configuration for an [`ObservableList`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConfig {
    /// Whether a panicking subscriber aborts or is isolated from the rest
    /// of the notification chain.
    pub notify_policy: NotifyPolicy,
}

/// State shared by every clone of one list.
struct Shared<T> {
    items: RwLock<Vec<T>>,
    subscribers: SubscriberRegistry<T>,
    config: ListConfig,
}

impl<T: Clone + 'static> Shared<T> {
    // The mutation bodies below are the only code that touches the
    // sequence structurally. Each runs on the owner thread, takes the
    // write side of the gate for the full mutation, and notifies
    // subscribers before the guard is released.

    fn do_push(&self, item: T) {
        let mut items = self.items.write().expect(GATE_POISONED);
        items.push(item.clone());
        self.subscribers
            .notify(&ListEvent::added(item), self.config.notify_policy);
    }

    fn do_insert(&self, index: usize, item: T) {
        let mut items = self.items.write().expect(GATE_POISONED);
        if index > items.len() {
            tracing::warn!(index, len = items.len(), "insert out of range, dropped");
            return;
        }
        items.insert(index, item.clone());
        self.subscribers
            .notify(&ListEvent::inserted(item, index), self.config.notify_policy);
    }

    fn do_clear(&self) {
        let mut items = self.items.write().expect(GATE_POISONED);
        items.clear();
        self.subscribers
            .notify(&ListEvent::reset(), self.config.notify_policy);
    }

    fn do_remove_at(&self, index: usize) {
        let mut items = self.items.write().expect(GATE_POISONED);
        if index >= items.len() {
            tracing::warn!(index, len = items.len(), "remove_at out of range, dropped");
            return;
        }
        items.remove(index);
        self.subscribers
            .notify(&ListEvent::reset(), self.config.notify_policy);
    }

    fn do_remove(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let mut items = self.items.write().expect(GATE_POISONED);
        let Some(index) = items.iter().position(|candidate| candidate == item) else {
            return false;
        };
        items.remove(index);
        self.subscribers
            .notify(&ListEvent::reset(), self.config.notify_policy);
        true
    }
}

/// A mutation-observable ordered collection bound to one owner thread.
///
/// See the [module docs](self) for the dispatch table. `T` must be
/// `Clone` (events carry a copy of the added item) and `Send + Sync`
/// (items cross threads inside marshalled jobs, and the list itself is
/// meant to be shared across threads).
pub struct ObservableList<T> {
    shared: Arc<Shared<T>>,
    exec: Arc<dyn OwnerExecutor>,
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            exec: Arc::clone(&self.exec),
        }
    }
}

impl<T: 'static> std::fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.shared.items.read().expect(GATE_POISONED).len();
        f.debug_struct("ObservableList")
            .field("len", &len)
            .field("subscriber_count", &self.shared.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> ObservableList<T> {
    /// Create an empty list bound to `exec`'s owner thread.
    #[must_use]
    pub fn new(exec: impl OwnerExecutor + 'static) -> Self {
        Self::with_config(exec, ListConfig::default())
    }

    /// Create an empty list with an explicit [`ListConfig`].
    #[must_use]
    pub fn with_config(exec: impl OwnerExecutor + 'static, config: ListConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                items: RwLock::new(Vec::new()),
                subscribers: SubscriberRegistry::new(),
                config,
            }),
            exec: Arc::new(exec),
        }
    }

    /// Append `item` to the end of the list.
    ///
    /// From the owner thread this applies immediately; from any other
    /// thread it is queued fire-and-forget and becomes visible to reads
    /// only once the owner thread processes it.
    pub fn push(&self, item: T) {
        if self.exec.is_owner() {
            self.shared.do_push(item);
        } else {
            let shared = Arc::clone(&self.shared);
            self.post_detached("push", Box::new(move || shared.do_push(item)));
        }
    }

    /// Insert `item` at `index`.
    ///
    /// If `index` is beyond the list's length *at execution time* (the
    /// list may have shrunk between submission and execution), the insert
    /// is dropped without an event.
    pub fn insert(&self, index: usize, item: T) {
        if self.exec.is_owner() {
            self.shared.do_insert(index, item);
        } else {
            let shared = Arc::clone(&self.shared);
            self.post_detached("insert", Box::new(move || shared.do_insert(index, item)));
        }
    }

    /// Remove every element. Always publishes one `Reset`, even when the
    /// list was already empty.
    pub fn clear(&self) {
        if self.exec.is_owner() {
            self.shared.do_clear();
        } else {
            let shared = Arc::clone(&self.shared);
            self.post_detached("clear", Box::new(move || shared.do_clear()));
        }
    }

    /// Remove the element at `index`. Out-of-range indices (including any
    /// index on an empty list) are absorbed as a no-op without an event.
    pub fn remove_at(&self, index: usize) {
        if self.exec.is_owner() {
            self.shared.do_remove_at(index);
        } else {
            let shared = Arc::clone(&self.shared);
            self.post_detached("remove_at", Box::new(move || shared.do_remove_at(index)));
        }
    }

    /// Replace the element at `index` in place.
    ///
    /// Runs on the calling thread; it is not marshalled because
    /// replacement is not a structural change. Out of range is a silent
    /// no-op, and **no event is ever published** for a replacement —
    /// observers tracking structure see nothing.
    pub fn set(&self, index: usize, item: T) {
        let mut items = self.shared.items.write().expect(GATE_POISONED);
        if index >= items.len() {
            tracing::warn!(index, len = items.len(), "set out of range, dropped");
            return;
        }
        items[index] = item;
    }

    /// A clone of the element at `index`, or `None` out of range. Never a
    /// stale or default value.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.read().get(index).cloned()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run `f` against the current contents under the read side of the
    /// gate.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.read())
    }

    /// Clone every element into `dest` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `dest` cannot hold the list's contents at `offset`.
    pub fn copy_into(&self, dest: &mut [T], offset: usize) {
        let items = self.read();
        dest[offset..offset + items.len()].clone_from_slice(&items);
    }

    /// Iterate over a live view of the list.
    ///
    /// The iterator holds the read side of the gate for its whole
    /// lifetime: the view cannot change mid-iteration, and writers block
    /// until it is dropped. Mutating the list from the *same* thread while
    /// the iterator is alive deadlocks.
    #[must_use]
    pub fn iter(&self) -> ListIter<'_, T> {
        ListIter {
            guard: self.read(),
            index: 0,
        }
    }

    /// Register `callback` for change events. Events are delivered
    /// synchronously on the owner thread, in registration order, while the
    /// mutation still holds the write side of the gate.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe(
        &self,
        callback: impl Fn(&ListEvent<T>) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.subscribers.subscribe(callback)
    }

    /// Registered subscribers, counting dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.shared.items.read().expect(GATE_POISONED)
    }

    /// Queue a mutation on the owner thread without waiting. A vanished
    /// owner context loses the mutation; that is the accepted contract for
    /// detached submission.
    fn post_detached(&self, op: &'static str, job: weft_exec::Job) {
        if let Err(err) = self.exec.post(job) {
            tracing::warn!(op, %err, "owner context gone, mutation dropped");
        }
    }
}

impl<T: Clone + Send + Sync + PartialEq + 'static> ObservableList<T> {
    /// Remove the first element equal to `item`.
    ///
    /// Returns `true` if an element was removed (publishing one `Reset`),
    /// `false` if no element matched. Unlike the other mutators, a call
    /// from a non-owner thread **blocks** until the owner thread has
    /// executed the removal, because the caller needs the result. If the
    /// owner context is gone the removal cannot run and `false` is
    /// returned.
    pub fn remove(&self, item: &T) -> bool {
        if self.exec.is_owner() {
            return self.shared.do_remove(item);
        }
        let shared = Arc::clone(&self.shared);
        let item = item.clone();
        match self.exec.post_and_wait(move || shared.do_remove(&item)) {
            Ok(removed) => removed,
            Err(err) => {
                tracing::error!(%err, "owner context gone, remove reported as not found");
                false
            }
        }
    }

    /// Whether any element equals `item`.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.read().contains(item)
    }

    /// Index of the first element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.read().iter().position(|candidate| candidate == item)
    }
}

/// Live iterator over an [`ObservableList`], yielding clones.
///
/// Holds the read side of the gate until dropped; see
/// [`ObservableList::iter`].
pub struct ListIter<'a, T> {
    guard: RwLockReadGuard<'a, Vec<T>>,
    index: usize,
}

impl<T: Clone> Iterator for ListIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.guard.get(self.index).cloned();
        if item.is_some() {
            self.index += 1;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.guard.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
