//! Fibonacci heap (Fredman and Tarjan) over an index arena.
//!
//! Entries of every heap created from one [`HeapForest`] live in a single
//! arena and link to each other by [`EntryId`]. A [`FibonacciHeap`] is only a
//! handle onto a circular root list, which is what makes `merge` a constant
//! time splice: no entry ever moves between arenas. All heaps of one forest
//! share its comparator, so two heaps are merge-compatible exactly when they
//! come from the same forest.
//!
//! Amortised costs: `add`, `peek`, `merge` and `decrease_priority` are O(1);
//! `extract_min` and `remove` are O(log n). Slots vacated by `extract_min`
//! and `remove` are reused by later `add`s, so the arena never holds more
//! slots than the peak number of live entries.

mod iter;

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::HeapError;

pub use self::iter::Entries;

/// Default entry ceiling for a forest.
pub const DEFAULT_CAPACITY: usize = u32::MAX as usize;

static NEXT_FOREST_ID: AtomicU64 = AtomicU64::new(0);

/// Orders heap priorities. The heap surfaces the entry that compares least.
pub trait Comparator<P> {
    /// Compares two priorities.
    fn compare(&self, left: &P, right: &P) -> Ordering;
}

/// Orders priorities by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<P: Ord> Comparator<P> for NaturalOrder {
    fn compare(&self, left: &P, right: &P) -> Ordering {
        left.cmp(right)
    }
}

impl<P, F> Comparator<P> for F
where
    F: Fn(&P, &P) -> Ordering,
{
    fn compare(&self, left: &P, right: &P) -> Ordering {
        self(left, right)
    }
}

/// Stable handle to an entry stored in a [`HeapForest`].
///
/// A handle outlives its entry: once the entry is extracted or removed the
/// handle is rejected, even after its slot has been handed to a new entry.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntryId {
    slot: usize,
    generation: u32,
}

impl EntryId {
    /// Returns the arena slot backing this entry.
    #[must_use]
    #[rustfmt::skip]
    pub fn index(self) -> usize { self.slot }
}

/// A heap drawn from a [`HeapForest`].
///
/// The handle is deliberately not `Clone`: two live handles onto the same
/// root list would let one of them observe a stale minimum.
#[derive(Debug, PartialEq, Eq)]
pub struct FibonacciHeap {
    forest: u64,
    min: Option<EntryId>,
    size: usize,
}

impl FibonacciHeap {
    /// Returns the number of entries in the heap.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.size }

    /// Returns `true` when the heap holds no entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.min.is_none() }
}

#[derive(Debug)]
struct Slot<V, P> {
    // `None` once the entry has been extracted or is being removed. A vacated
    // entry compares below every live one, which is how `remove` forces an
    // arbitrary entry to the top.
    payload: Option<(V, P)>,
    parent: Option<EntryId>,
    first_child: Option<EntryId>,
    previous: EntryId,
    next: EntryId,
    degree: usize,
    // Set once the entry has lost a child since it last became a child
    // itself; losing a second child cuts it from its parent.
    marked: bool,
    // Bumped every time the slot is reused.
    generation: u32,
}

/// Arena owning the entries of any number of [`FibonacciHeap`]s.
///
/// # Examples
/// ```
/// use arbor_core::HeapForest;
///
/// let mut forest: HeapForest<&str, u32> = HeapForest::new();
/// let mut heap = forest.heap();
/// forest.add(&mut heap, "b", 2)?;
/// forest.add(&mut heap, "a", 1)?;
/// assert_eq!(forest.extract_min(&mut heap), Some("a"));
/// assert_eq!(heap.len(), 1);
/// # Ok::<(), arbor_core::HeapError>(())
/// ```
#[derive(Debug)]
pub struct HeapForest<V, P, C = NaturalOrder> {
    id: u64,
    slots: Vec<Slot<V, P>>,
    vacant: Vec<usize>,
    live: usize,
    capacity: usize,
    degree_bound: usize,
    comparator: C,
}

impl<V, P, C: Comparator<P> + Default> HeapForest<V, P, C> {
    /// Creates an empty forest using the comparator's default value.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<V, P, C: Comparator<P> + Default> Default for HeapForest<V, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, P, C: Comparator<P>> HeapForest<V, P, C> {
    /// Creates an empty forest ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            id: NEXT_FOREST_ID.fetch_add(1, AtomicOrdering::Relaxed),
            slots: Vec::new(),
            vacant: Vec::new(),
            live: 0,
            capacity: DEFAULT_CAPACITY,
            degree_bound: degree_bound(DEFAULT_CAPACITY),
            comparator,
        }
    }

    /// Limits the number of live entries the forest accepts.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self.degree_bound = degree_bound(capacity);
        self
    }

    /// Returns the configured entry ceiling.
    #[must_use]
    #[rustfmt::skip]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Returns the number of live entries across every heap of the forest.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.live }

    /// Returns `true` when no heap of the forest holds an entry.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.live == 0 }

    /// Returns the number of arena slots allocated so far, live or vacant.
    #[must_use]
    #[rustfmt::skip]
    pub fn allocated(&self) -> usize { self.slots.len() }

    /// Returns the comparator shared by every heap of the forest.
    #[must_use]
    #[rustfmt::skip]
    pub fn comparator(&self) -> &C { &self.comparator }

    /// Returns the comparator mutably.
    ///
    /// Callers may only change the comparator in ways that preserve the
    /// relative order of entries inside each individual heap; otherwise heap
    /// order is silently violated.
    #[rustfmt::skip]
    pub fn comparator_mut(&mut self) -> &mut C { &mut self.comparator }

    /// Creates a new, empty heap backed by this forest.
    #[must_use]
    pub fn heap(&self) -> FibonacciHeap {
        FibonacciHeap {
            forest: self.id,
            min: None,
            size: 0,
        }
    }

    /// Inserts `value` with `priority` into `heap` as a new root.
    ///
    /// # Errors
    /// Returns [`HeapError::CapacityExhausted`] when the forest is full; the
    /// value is not added. Returns [`HeapError::ForeignHeap`] when `heap` was
    /// created by another forest.
    pub fn add(
        &mut self,
        heap: &mut FibonacciHeap,
        value: V,
        priority: P,
    ) -> Result<EntryId, HeapError> {
        self.check_owner(heap)?;
        if self.live >= self.capacity {
            return Err(HeapError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        let id = self.occupy(value, priority);
        heap.min = self.merge_lists(Some(id), heap.min);
        heap.size = heap.size.saturating_add(1);
        self.live = self.live.saturating_add(1);
        Ok(id)
    }

    /// Returns the minimum entry of `heap` without removing it.
    #[must_use]
    pub fn peek(&self, heap: &FibonacciHeap) -> Option<EntryId> {
        if heap.forest != self.id {
            return None;
        }
        heap.min
    }

    /// Returns the value stored in a live entry.
    #[must_use]
    pub fn value(&self, entry: EntryId) -> Option<&V> {
        self.payload(entry).map(|(value, _)| value)
    }

    /// Returns the priority of a live entry.
    #[must_use]
    pub fn priority(&self, entry: EntryId) -> Option<&P> {
        self.payload(entry).map(|(_, priority)| priority)
    }

    /// Removes the minimum entry of `heap` and returns its value.
    pub fn extract_min(&mut self, heap: &mut FibonacciHeap) -> Option<V> {
        self.extract_min_entry(heap).map(|(value, _)| value)
    }

    /// Removes the minimum entry of `heap` and returns its value and priority.
    pub fn extract_min_entry(&mut self, heap: &mut FibonacciHeap) -> Option<(V, P)> {
        if heap.forest != self.id {
            return None;
        }
        let min = self.unlink_min(heap)?;
        let entry = self.slots.get_mut(min.slot).and_then(|slot| slot.payload.take());
        self.vacant.push(min.slot);
        entry
    }

    /// Moves `entry` towards the top of `heap` by lowering its priority.
    ///
    /// # Errors
    /// Returns [`HeapError::PriorityIncrease`] when `priority` compares above
    /// the entry's current priority, [`HeapError::UnknownEntry`] when the
    /// entry is no longer live, and [`HeapError::ForeignHeap`] when `heap`
    /// belongs to another forest. `entry` must belong to `heap`.
    pub fn decrease_priority(
        &mut self,
        heap: &mut FibonacciHeap,
        entry: EntryId,
        priority: P,
    ) -> Result<(), HeapError> {
        self.check_owner(heap)?;
        let current = self
            .priority(entry)
            .ok_or(HeapError::UnknownEntry { entry: entry.slot })?;
        if self.comparator.compare(&priority, current) == Ordering::Greater {
            return Err(HeapError::PriorityIncrease { entry: entry.slot });
        }
        if let Some((_, slot_priority)) = self.slots[entry.slot].payload.as_mut() {
            *slot_priority = priority;
        }
        if let Some(parent) = self.slots[entry.slot].parent {
            if self.precedes(entry, parent) {
                self.cut_and_make_root(heap, entry);
            }
        }
        if heap.min.is_some_and(|min| self.precedes(entry, min)) {
            heap.min = Some(entry);
        }
        Ok(())
    }

    /// Deletes an arbitrary entry from `heap` and returns its value.
    ///
    /// # Errors
    /// Returns [`HeapError::UnknownEntry`] when the entry is no longer live
    /// and [`HeapError::ForeignHeap`] when `heap` belongs to another forest.
    /// `entry` must belong to `heap`.
    pub fn remove(&mut self, heap: &mut FibonacciHeap, entry: EntryId) -> Result<V, HeapError> {
        self.check_owner(heap)?;
        let (value, _) = self
            .slots
            .get_mut(entry.slot)
            .filter(|slot| slot.generation == entry.generation)
            .and_then(|slot| slot.payload.take())
            .ok_or(HeapError::UnknownEntry { entry: entry.slot })?;
        // With its payload gone the entry sorts first, so it becomes the
        // minimum as soon as it reaches the root list.
        self.cut_and_make_root(heap, entry);
        heap.min = Some(entry);
        self.unlink_min(heap);
        self.vacant.push(entry.slot);
        Ok(value)
    }

    /// Splices two heaps of this forest into one without consolidating.
    ///
    /// # Errors
    /// Returns [`HeapError::ForeignHeap`] when either heap was created by
    /// another forest.
    pub fn merge(
        &mut self,
        left: FibonacciHeap,
        right: FibonacciHeap,
    ) -> Result<FibonacciHeap, HeapError> {
        self.check_owner(&left)?;
        self.check_owner(&right)?;
        let min = self.merge_lists(left.min, right.min);
        Ok(FibonacciHeap {
            forest: self.id,
            min,
            size: left.size.saturating_add(right.size),
        })
    }

    /// Iterates every entry of `heap` depth-first, in no particular order.
    ///
    /// The iterator borrows the forest, so the heap cannot be mutated while
    /// it is alive.
    #[must_use]
    pub fn iter<'a>(&'a self, heap: &FibonacciHeap) -> Entries<'a, V, P, C> {
        let start = (heap.forest == self.id).then_some(heap.min).flatten();
        Entries::new(self, start)
    }

    fn check_owner(&self, heap: &FibonacciHeap) -> Result<(), HeapError> {
        if heap.forest == self.id {
            Ok(())
        } else {
            Err(HeapError::ForeignHeap {
                expected: self.id,
                found: heap.forest,
            })
        }
    }

    fn payload(&self, entry: EntryId) -> Option<&(V, P)> {
        self.slots
            .get(entry.slot)
            .filter(|slot| slot.generation == entry.generation)
            .and_then(|slot| slot.payload.as_ref())
    }

    /// Stores a fresh root entry, preferring a vacated slot.
    fn occupy(&mut self, value: V, priority: P) -> EntryId {
        if let Some(slot) = self.vacant.pop() {
            let vacated = &mut self.slots[slot];
            let id = EntryId {
                slot,
                generation: vacated.generation.wrapping_add(1),
            };
            *vacated = Slot {
                payload: Some((value, priority)),
                parent: None,
                first_child: None,
                previous: id,
                next: id,
                degree: 0,
                marked: false,
                generation: id.generation,
            };
            return id;
        }
        let id = EntryId {
            slot: self.slots.len(),
            generation: 0,
        };
        self.slots.push(Slot {
            payload: Some((value, priority)),
            parent: None,
            first_child: None,
            previous: id,
            next: id,
            degree: 0,
            marked: false,
            generation: 0,
        });
        id
    }

    /// Returns `true` when `left` must sit above `right`.
    fn precedes(&self, left: EntryId, right: EntryId) -> bool {
        match (self.priority(left), self.priority(right)) {
            (Some(left), Some(right)) => self.comparator.compare(left, right) == Ordering::Less,
            (None, _) => true,
            (Some(_), None) => false,
        }
    }

    /// Splices two circular lists given an entry of each and returns the
    /// smaller of the two entries.
    fn merge_lists(&mut self, left: Option<EntryId>, right: Option<EntryId>) -> Option<EntryId> {
        let (left, right) = match (left, right) {
            (None, other) | (other, None) => return other,
            (Some(left), Some(right)) => (left, right),
        };
        let left_old_next = self.slots[left.slot].next;
        let right_next = self.slots[right.slot].next;
        self.slots[left.slot].next = right_next;
        self.slots[right_next.slot].previous = left;
        self.slots[right.slot].next = left_old_next;
        self.slots[left_old_next.slot].previous = right;
        if self.precedes(left, right) {
            Some(left)
        } else {
            Some(right)
        }
    }

    fn unlink_from_neighbours(&mut self, entry: EntryId) {
        let previous = self.slots[entry.slot].previous;
        let next = self.slots[entry.slot].next;
        self.slots[previous.slot].next = next;
        self.slots[next.slot].previous = previous;
        self.slots[entry.slot].previous = entry;
        self.slots[entry.slot].next = entry;
    }

    /// Collects the circular list containing `start`.
    fn siblings(&self, start: EntryId) -> Vec<EntryId> {
        let mut cycle = vec![start];
        let mut current = self.slots[start.slot].next;
        while current != start {
            cycle.push(current);
            current = self.slots[current.slot].next;
        }
        cycle
    }

    /// Detaches the minimum from `heap`, promoting its children and
    /// consolidating the root list. The payload is left in place.
    fn unlink_min(&mut self, heap: &mut FibonacciHeap) -> Option<EntryId> {
        let min = heap.min?;
        if let Some(first_child) = self.slots[min.slot].first_child.take() {
            for child in self.siblings(first_child) {
                self.slots[child.slot].parent = None;
            }
            self.slots[min.slot].degree = 0;
            self.merge_lists(Some(min), Some(first_child));
        }
        if heap.size <= 1 {
            heap.min = None;
        } else {
            let next = self.slots[min.slot].next;
            self.unlink_from_neighbours(min);
            heap.min = Some(self.consolidate(next));
        }
        heap.size = heap.size.saturating_sub(1);
        self.live = self.live.saturating_sub(1);
        Some(min)
    }

    /// Cuts `entry` from its parent into the root list, then applies the
    /// cascading cut up the ancestor chain.
    fn cut_and_make_root(&mut self, heap: &mut FibonacciHeap, entry: EntryId) {
        let mut current = entry;
        while let Some(parent) = self.slots[current.slot].parent {
            let sibling = self.slots[current.slot].next;
            let parent_slot = &mut self.slots[parent.slot];
            parent_slot.degree = parent_slot.degree.saturating_sub(1);
            if parent_slot.first_child == Some(current) {
                parent_slot.first_child = if parent_slot.degree == 0 {
                    None
                } else {
                    Some(sibling)
                };
            }
            self.slots[current.slot].marked = false;
            self.slots[current.slot].parent = None;
            self.unlink_from_neighbours(current);
            heap.min = self.merge_lists(Some(current), heap.min);

            if self.slots[parent.slot].parent.is_none() {
                return;
            }
            if !self.slots[parent.slot].marked {
                self.slots[parent.slot].marked = true;
                return;
            }
            current = parent;
        }
    }

    /// Makes `child` a child of `parent` and returns `parent`.
    fn link(&mut self, child: EntryId, parent: EntryId) -> EntryId {
        self.unlink_from_neighbours(child);
        self.slots[child.slot].parent = Some(parent);
        self.slots[child.slot].marked = false;
        let first_child = self.slots[parent.slot].first_child;
        self.slots[parent.slot].first_child = self.merge_lists(Some(child), first_child);
        self.slots[parent.slot].degree = self.slots[parent.slot].degree.saturating_add(1);
        parent
    }

    /// Joins roots of equal degree until every root degree is distinct and
    /// returns the new minimum root.
    fn consolidate(&mut self, some_root: EntryId) -> EntryId {
        let mut min_root = some_root;
        let mut roots_by_degree: Vec<Option<EntryId>> = vec![None; self.degree_bound];
        for root in self.siblings(some_root) {
            let mut merged = root;
            let mut degree = self.slots[root.slot].degree;
            while let Some(other) = roots_by_degree.get_mut(degree).and_then(Option::take) {
                merged = if self.precedes(other, merged) {
                    self.link(merged, other)
                } else {
                    self.link(other, merged)
                };
                degree = degree.saturating_add(1);
            }
            if roots_by_degree.len() <= degree {
                roots_by_degree.resize(degree.saturating_add(1), None);
            }
            roots_by_degree[degree] = Some(merged);
            if !self.precedes(min_root, merged) {
                min_root = merged;
            }
        }
        min_root
    }
}

/// Largest root degree a heap of `capacity` entries can reach:
/// `⌈log_φ(capacity)⌉`, plus one slot so the scratch array is indexable by
/// that degree.
fn degree_bound(capacity: usize) -> usize {
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;
    #[expect(
        clippy::cast_precision_loss,
        reason = "the bound only needs the order of magnitude of the capacity"
    )]
    let capacity = capacity.max(2) as f64;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "log_phi of a usize is at most a few hundred"
    )]
    let bound = (capacity.ln() / golden_ratio.ln()).ceil() as usize;
    bound.saturating_add(1)
}
