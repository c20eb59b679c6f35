//! Selection and hover state
//!
//! The selection is an ordered id list with a membership set alongside it.
//! Every state-changing call publishes exactly one event per transition;
//! calls that change nothing publish nothing.

use std::collections::HashSet;

use crate::events::{Event, EventSink};
use crate::point::PointId;

/// Selected ids and the hovered id
#[derive(Clone, Debug, Default)]
pub struct SelectionStore {
    ids: Vec<PointId>,
    members: HashSet<PointId>,
    hovered: Option<PointId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order
    pub fn selected(&self) -> &[PointId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.members.contains(&id)
    }

    pub fn hovered(&self) -> Option<PointId> {
        self.hovered
    }

    /// The hovered id, unless it is also selected
    pub fn highlighted_hover(&self) -> Option<PointId> {
        self.hovered.filter(|id| !self.contains(*id))
    }

    /// Select `ids`, dropping any that are not below `point_count`.
    ///
    /// With `merge` the result is the union with the current selection in
    /// ascending id order; otherwise it replaces the selection, keeping
    /// first-seen order. A result that equals the current selection
    /// publishes nothing, and an empty result behaves like [`deselect`].
    ///
    /// [`deselect`]: SelectionStore::deselect
    pub fn select<S: EventSink + ?Sized>(
        &mut self,
        ids: &[PointId],
        merge: bool,
        point_count: usize,
        sink: &mut S,
    ) -> bool {
        let valid = ids.iter().copied().filter(|id| (*id as usize) < point_count);

        let next: Vec<PointId> = if merge {
            let mut union: Vec<PointId> = self.ids.iter().copied().chain(valid).collect();
            union.sort_unstable();
            union.dedup();
            union
        } else {
            let mut seen = HashSet::new();
            valid.filter(|id| seen.insert(*id)).collect()
        };

        if next.is_empty() {
            return self.deselect(sink);
        }
        if next == self.ids {
            return false;
        }

        self.members = next.iter().copied().collect();
        self.ids = next;
        sink.publish(Event::Select {
            points: self.ids.clone(),
        });
        true
    }

    /// Clear the selection
    pub fn deselect<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        self.members.clear();
        sink.publish(Event::Deselect);
        true
    }

    /// Track the hovered point. Ids not below `point_count` count as none.
    ///
    /// Each change publishes one event. Moving from one point to another
    /// publishes `PointOut` for the old point and tracks the new one.
    pub fn hover<S: EventSink + ?Sized>(
        &mut self,
        id: Option<PointId>,
        point_count: usize,
        sink: &mut S,
    ) -> bool {
        let id = id.filter(|id| (*id as usize) < point_count);
        if id == self.hovered {
            return false;
        }

        let event = match self.hovered {
            Some(previous) => Event::PointOut { point: previous },
            None => match id {
                Some(next) => Event::PointOver { point: next },
                None => return false,
            },
        };
        self.hovered = id;
        sink.publish(event);
        true
    }

    /// Silently drop ids that no longer exist after a dataset change
    pub fn retain_valid(&mut self, point_count: usize) {
        self.ids.retain(|id| (*id as usize) < point_count);
        self.members.retain(|id| (*id as usize) < point_count);
        self.hovered = self.hovered.filter(|id| (*id as usize) < point_count);
    }
}
