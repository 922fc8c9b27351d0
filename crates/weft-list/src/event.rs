#![forbid(unsafe_code)]

//! Change events published after structural mutations.

/// The kind of change described by a [`ListEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// An item entered the list (append or insert).
    Add,
    /// The list changed in a way consumers must re-read wholesale
    /// (clear, or any removal).
    Reset,
}

/// Describes the outcome of one structural mutation.
///
/// Events are transient: constructed inside the mutation, handed to each
/// subscriber by reference, then discarded.
///
/// Removals deliberately report a coarse [`ChangeKind::Reset`] with no item
/// or index, even when a single element was removed; consumers are expected
/// to re-scan the list rather than patch a view incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEvent<T> {
    /// What happened.
    pub kind: ChangeKind,
    /// The item that was added, for [`ChangeKind::Add`].
    pub item: Option<T>,
    /// The position the item was inserted at. Absent for appends.
    pub index: Option<usize>,
}

impl<T> ListEvent<T> {
    /// Event for an item appended to the end of the list.
    #[must_use]
    pub fn added(item: T) -> Self {
        Self {
            kind: ChangeKind::Add,
            item: Some(item),
            index: None,
        }
    }

    /// Event for an item inserted at `index`.
    #[must_use]
    pub fn inserted(item: T, index: usize) -> Self {
        Self {
            kind: ChangeKind::Add,
            item: Some(item),
            index: Some(index),
        }
    }

    /// Event telling consumers to discard and re-read everything.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            kind: ChangeKind::Reset,
            item: None,
            index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_carries_item_without_index() {
        let event = ListEvent::added("a");
        assert_eq!(event.kind, ChangeKind::Add);
        assert_eq!(event.item, Some("a"));
        assert_eq!(event.index, None);
    }

    #[test]
    fn inserted_carries_item_and_index() {
        let event = ListEvent::inserted("b", 3);
        assert_eq!(event.kind, ChangeKind::Add);
        assert_eq!(event.item, Some("b"));
        assert_eq!(event.index, Some(3));
    }

    #[test]
    fn reset_carries_nothing() {
        let event: ListEvent<String> = ListEvent::reset();
        assert_eq!(event.kind, ChangeKind::Reset);
        assert_eq!(event.item, None);
        assert_eq!(event.index, None);
    }
}
