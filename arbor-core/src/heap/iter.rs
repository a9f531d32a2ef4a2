//! Depth-first traversal over the entries of one heap.

use super::{EntryId, HeapForest};

/// Lazy iterator returned by [`HeapForest::iter`].
///
/// Yields `(id, value, priority)` for every entry of the heap. Each stack
/// frame remembers where its circular sibling list started so the walk knows
/// when a list has been exhausted.
#[derive(Debug)]
pub struct Entries<'a, V, P, C> {
    forest: &'a HeapForest<V, P, C>,
    stack: Vec<(EntryId, EntryId)>,
}

impl<'a, V, P, C> Entries<'a, V, P, C> {
    pub(super) fn new(forest: &'a HeapForest<V, P, C>, start: Option<EntryId>) -> Self {
        Self {
            forest,
            stack: start.map(|id| (id, id)).into_iter().collect(),
        }
    }
}

impl<'a, V, P, C> Iterator for Entries<'a, V, P, C> {
    type Item = (EntryId, &'a V, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (start, current) = self.stack.pop()?;
            let slot = self.forest.slots.get(current.slot)?;
            if slot.next != start {
                self.stack.push((start, slot.next));
            }
            if let Some(child) = slot.first_child {
                self.stack.push((child, child));
            }
            if let Some((value, priority)) = slot.payload.as_ref() {
                return Some((current, value, priority));
            }
        }
    }
}
