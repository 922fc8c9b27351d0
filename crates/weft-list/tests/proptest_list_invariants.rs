//! Model-based property tests: on the owner thread, the list behaves like a
//! plain `Vec` with the documented no-op edge cases, and the event stream
//! accounts for exactly the mutations that applied.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use weft_exec::InlineExecutor;
use weft_list::{ChangeKind, ObservableList};

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Insert(usize, u8),
    Clear,
    Remove(u8),
    RemoveAt(usize),
    Set(usize, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Index seeds intentionally overshoot typical lengths so out-of-range
    // branches are exercised.
    prop_oneof![
        any::<u8>().prop_map(Op::Push),
        (0usize..12, any::<u8>()).prop_map(|(i, v)| Op::Insert(i, v)),
        Just(Op::Clear),
        any::<u8>().prop_map(Op::Remove),
        (0usize..12).prop_map(Op::RemoveAt),
        (0usize..12, any::<u8>()).prop_map(|(i, v)| Op::Set(i, v)),
    ]
}

/// Apply `op` to the reference model, returning (adds, resets) it should
/// have produced on the real list.
fn apply_to_model(model: &mut Vec<u8>, op: &Op) -> (usize, usize) {
    match *op {
        Op::Push(v) => {
            model.push(v);
            (1, 0)
        }
        Op::Insert(i, v) => {
            if i <= model.len() {
                model.insert(i, v);
                (1, 0)
            } else {
                (0, 0)
            }
        }
        Op::Clear => {
            model.clear();
            (0, 1)
        }
        Op::Remove(v) => match model.iter().position(|x| *x == v) {
            Some(p) => {
                model.remove(p);
                (0, 1)
            }
            None => (0, 0),
        },
        Op::RemoveAt(i) => {
            if i < model.len() {
                model.remove(i);
                (0, 1)
            } else {
                (0, 0)
            }
        }
        Op::Set(i, v) => {
            if i < model.len() {
                model[i] = v;
            }
            (0, 0)
        }
    }
}

fn apply_to_list(list: &ObservableList<u8>, op: &Op) {
    match *op {
        Op::Push(v) => list.push(v),
        Op::Insert(i, v) => list.insert(i, v),
        Op::Clear => list.clear(),
        Op::Remove(v) => {
            list.remove(&v);
        }
        Op::RemoveAt(i) => list.remove_at(i),
        Op::Set(i, v) => list.set(i, v),
    }
}

proptest! {
    #[test]
    fn list_matches_vec_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let list: ObservableList<u8> = ObservableList::new(InlineExecutor);
        let adds = Arc::new(AtomicUsize::new(0));
        let resets = Arc::new(AtomicUsize::new(0));
        let (adds_sink, resets_sink) = (Arc::clone(&adds), Arc::clone(&resets));
        let _sub = list.subscribe(move |event| {
            match event.kind {
                ChangeKind::Add => adds_sink.fetch_add(1, Ordering::SeqCst),
                ChangeKind::Reset => resets_sink.fetch_add(1, Ordering::SeqCst),
            };
        });

        let mut model = Vec::new();
        let mut expected_adds = 0;
        let mut expected_resets = 0;
        for op in &ops {
            apply_to_list(&list, op);
            let (add, reset) = apply_to_model(&mut model, op);
            expected_adds += add;
            expected_resets += reset;
        }

        prop_assert_eq!(list.with(<[u8]>::to_vec), model);
        prop_assert_eq!(adds.load(Ordering::SeqCst), expected_adds);
        prop_assert_eq!(resets.load(Ordering::SeqCst), expected_resets);
    }

    #[test]
    fn remove_result_matches_membership(
        initial in prop::collection::vec(any::<u8>(), 0..16),
        target: u8,
    ) {
        let list: ObservableList<u8> = ObservableList::new(InlineExecutor);
        for v in &initial {
            list.push(*v);
        }

        let present = initial.contains(&target);
        let before = list.len();
        prop_assert_eq!(list.remove(&target), present);
        let expected_len = if present { before - 1 } else { before };
        prop_assert_eq!(list.len(), expected_len);
    }

    #[test]
    fn get_agrees_with_len(
        initial in prop::collection::vec(any::<u8>(), 0..16),
        probe in 0usize..32,
    ) {
        let list: ObservableList<u8> = ObservableList::new(InlineExecutor);
        for v in &initial {
            list.push(*v);
        }

        let got = list.get(probe);
        if probe < initial.len() {
            prop_assert_eq!(got, Some(initial[probe]));
        } else {
            prop_assert_eq!(got, None);
        }
    }
}
