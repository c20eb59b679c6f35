//! Selection store integration tests

use std::collections::BTreeSet;

use pointfield_core::{Event, EventQueue, NullSink, PointId, SelectionStore};
use proptest::prelude::*;

const POINT_COUNT: usize = 64;

fn ids() -> impl Strategy<Value = Vec<PointId>> {
    prop::collection::vec(0u32..80, 0..20)
}

proptest! {
    #[test]
    fn test_merge_is_a_set_union(first in ids(), second in ids()) {
        let mut store = SelectionStore::new();
        store.select(&first, true, POINT_COUNT, &mut NullSink);
        store.select(&second, true, POINT_COUNT, &mut NullSink);

        let expected: BTreeSet<PointId> = first
            .iter()
            .chain(&second)
            .copied()
            .filter(|id| (*id as usize) < POINT_COUNT)
            .collect();
        let actual: BTreeSet<PointId> = store.selected().iter().copied().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_merge_order_does_not_matter(first in ids(), second in ids()) {
        let mut forward = SelectionStore::new();
        forward.select(&first, true, POINT_COUNT, &mut NullSink);
        forward.select(&second, true, POINT_COUNT, &mut NullSink);

        let mut backward = SelectionStore::new();
        backward.select(&second, true, POINT_COUNT, &mut NullSink);
        backward.select(&first, true, POINT_COUNT, &mut NullSink);

        prop_assert_eq!(forward.selected(), backward.selected());
    }

    #[test]
    fn test_every_change_publishes_one_event(
        batches in prop::collection::vec((ids(), any::<bool>(), prop::option::of(0u32..80)), 1..10)
    ) {
        let mut store = SelectionStore::new();
        let mut events = EventQueue::new();
        for (batch, merge, hover) in batches {
            let before = store.selected().to_vec();
            let changed = store.select(&batch, merge, POINT_COUNT, &mut events);
            prop_assert_eq!(changed, before != store.selected());
            prop_assert_eq!(events.drain().len(), usize::from(changed));

            let hovered_before = store.hovered();
            let changed = store.hover(hover, POINT_COUNT, &mut events);
            prop_assert_eq!(changed, hovered_before != store.hovered());
            prop_assert_eq!(events.drain().len(), usize::from(changed));
        }
    }
}

#[test]
fn test_deselect_event_count() {
    let mut store = SelectionStore::new();
    let mut events = EventQueue::new();

    assert!(!store.deselect(&mut events));
    assert!(events.is_empty());

    store.select(&[3, 1], false, POINT_COUNT, &mut events);
    events.drain();
    assert!(store.deselect(&mut events));
    assert_eq!(events.drain(), vec![Event::Deselect]);
}

#[test]
fn test_replace_keeps_first_seen_order() {
    let mut store = SelectionStore::new();
    store.select(&[5, 2, 5, 9, 2], false, POINT_COUNT, &mut NullSink);
    assert_eq!(store.selected(), &[5, 2, 9]);
}
