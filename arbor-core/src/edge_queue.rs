//! Per-component priority queues of candidate incoming edges.
//!
//! Every strongly connected component owns one [`FibonacciHeap`] drawn from a
//! single shared [`HeapForest`], so contracting a cycle merges its queues in
//! constant time per queue. Contraction also lowers the weight of every edge
//! entering the cycle by the weight of the cycle edge it would displace. That
//! reduction is kept lazily: each queue belongs to a weight group, and merging
//! links the merged groups under a fresh one, recording the offset and the
//! displaced edge on the link. Because every entry of a merged heap shifts by
//! the same amount, heap order survives the merge.
//!
//! Offsets are resolved through a weighted union-find over the groups: a
//! lookup repoints every group it passes at the top of its chain with the
//! summed offset, so comparisons stay cheap however deeply cycles nest.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::trace;

use crate::arborescence::Arborescence;
use crate::error::HeapError;
use crate::graph::{Edge, ExclusiveEdge, NodeId, WeightedEdge};
use crate::heap::{Comparator, FibonacciHeap, HeapForest};
use crate::partition::Partition;

/// What a queued entry offers to its destination component.
#[derive(Clone, Debug)]
enum Offer<V> {
    /// A real edge entering the component.
    Edge(Edge<V>),
    /// Rooting the branching at this node instead of entering it.
    Root(V),
}

/// Heap priority of an [`Offer`].
#[derive(Clone, Copy, Debug)]
struct OfferKey {
    root: bool,
    base: f64,
    group: usize,
    sequence: u64,
}

#[derive(Clone, Copy, Debug)]
struct GroupLink {
    // Group this one was merged under. Never rewritten, so the displaced
    // edges of an entry can still be read off the full chain.
    parent: Option<usize>,
    // Compressed pointer up the chain, and the offset summed along the way.
    // A group pointing at itself heads its chain.
    shortcut: usize,
    offset: f64,
}

/// Lookup effort spent resolving offsets.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct OffsetWork {
    pub(crate) lookups: u64,
    pub(crate) hops: u64,
}

/// Ranks offers best first: real edges before roots, then by reduced weight
/// (descending), then by insertion order.
#[derive(Debug, Default)]
struct OfferOrder {
    links: Vec<Cell<GroupLink>>,
    path: RefCell<Vec<usize>>,
    #[cfg(test)]
    work: Cell<OffsetWork>,
}

impl OfferOrder {
    fn new_group(&mut self) -> usize {
        let group = self.links.len();
        self.links.push(Cell::new(GroupLink {
            parent: None,
            shortcut: group,
            offset: 0.0,
        }));
        group
    }

    /// Links the head group `child` under `parent`.
    fn attach(&mut self, child: usize, parent: usize, offset: f64) {
        self.links[child].set(GroupLink {
            parent: Some(parent),
            shortcut: parent,
            offset,
        });
    }

    fn parent(&self, group: usize) -> Option<usize> {
        self.links[group].get().parent
    }

    /// Sums the offsets from `group` to the head of its chain, repointing
    /// every group on the way straight at the head.
    fn offset(&self, group: usize) -> f64 {
        let mut path = self.path.borrow_mut();
        path.clear();
        let mut current = group;
        loop {
            let shortcut = self.links[current].get().shortcut;
            if shortcut == current {
                break;
            }
            path.push(current);
            current = shortcut;
        }
        #[cfg(test)]
        self.record_lookup(path.len());

        let head = current;
        let mut offset = 0.0;
        for &member in path.iter().rev() {
            let link = self.links[member].get();
            offset += link.offset;
            self.links[member].set(GroupLink {
                shortcut: head,
                offset,
                ..link
            });
        }
        offset
    }

    fn reduced_weight(&self, key: &OfferKey) -> f64 {
        key.base + self.offset(key.group)
    }

    #[cfg(test)]
    fn record_lookup(&self, hops: usize) {
        let mut work = self.work.get();
        work.lookups += 1;
        work.hops += u64::try_from(hops).unwrap_or(u64::MAX);
        self.work.set(work);
    }
}

impl Comparator<OfferKey> for OfferOrder {
    fn compare(&self, left: &OfferKey, right: &OfferKey) -> Ordering {
        left.root
            .cmp(&right.root)
            .then_with(|| {
                self.reduced_weight(right)
                    .total_cmp(&self.reduced_weight(left))
            })
            .then_with(|| left.sequence.cmp(&right.sequence))
    }
}

/// The best remaining option for a component.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Candidate<V> {
    /// Enter the component through this edge.
    Edge(ExclusiveEdge<V>),
    /// Leave the component without an incoming edge, rooted at `node`.
    ///
    /// Only offered once no edge from outside the component remains. The
    /// weight is zero reduced by every cycle edge that has to be dropped so
    /// that `node` has no parent.
    Root {
        node: V,
        weight: f64,
        excluded: Vec<Edge<V>>,
    },
}

#[derive(Debug)]
struct ComponentQueue {
    heap: FibonacciHeap,
    group: usize,
}

/// Candidate incoming edges for every live strongly connected component,
/// keyed by the component's representative.
#[derive(Debug)]
pub(crate) struct EdgeQueueMap<V: NodeId> {
    forest: HeapForest<Offer<V>, OfferKey, OfferOrder>,
    queues: HashMap<V, ComponentQueue>,
    // Edge displaced when a group was linked under a contraction, by group.
    displaced: Vec<Option<Edge<V>>>,
    tie_tolerance: f64,
    sequence: u64,
}

impl<V: NodeId> EdgeQueueMap<V> {
    /// Creates one queue per node, each holding only that node's root offer.
    pub(crate) fn new(nodes: &[V], tie_tolerance: f64) -> Result<Self, HeapError> {
        let mut map = Self {
            forest: HeapForest::new(),
            queues: HashMap::with_capacity(nodes.len()),
            displaced: Vec::new(),
            tie_tolerance,
            sequence: 0,
        };
        for node in nodes {
            let group = map.new_group();
            let key = map.next_key(true, 0.0, group);
            let mut heap = map.forest.heap();
            map.forest.add(&mut heap, Offer::Root(node.clone()), key)?;
            map.queues
                .insert(node.clone(), ComponentQueue { heap, group });
        }
        Ok(map)
    }

    /// Queues `edge` under the component currently containing its
    /// destination.
    pub(crate) fn add_edge(
        &mut self,
        edge: WeightedEdge<V>,
        components: &mut Partition<V>,
    ) -> Result<(), HeapError> {
        let Some(component) = components.component_of(edge.edge().destination()) else {
            return Ok(());
        };
        let Some(group) = self.queues.get(&component).map(|queue| queue.group) else {
            return Ok(());
        };
        let key = self.next_key(false, edge.weight(), group);
        if let Some(queue) = self.queues.get_mut(&component) {
            self.forest
                .add(&mut queue.heap, Offer::Edge(edge.into_edge()), key)?;
        }
        Ok(())
    }

    /// Returns the number of entries queued for `component`, including
    /// internal edges that have not been discarded yet.
    #[cfg(test)]
    pub(crate) fn queued(&self, component: &V) -> usize {
        self.queues
            .get(component)
            .map_or(0, |queue| queue.heap.len())
    }

    /// Returns the number of heap slots allocated across every queue.
    #[cfg(test)]
    pub(crate) fn allocated(&self) -> usize {
        self.forest.allocated()
    }

    /// Returns the effort spent resolving reduced weights so far.
    #[cfg(test)]
    pub(crate) fn offset_work(&self) -> OffsetWork {
        self.forest.comparator().work.get()
    }

    /// Pops the best usable candidate for `component`.
    ///
    /// Edges whose source has meanwhile joined `component` are discarded.
    /// Among candidates whose reduced weights lie within the tie tolerance
    /// of the best one, the first edge contained in `preferred` wins;
    /// otherwise the best one does. Tied candidates that lose are queued
    /// again unchanged, reusing the slots they were popped from.
    pub(crate) fn pop_best_edge(
        &mut self,
        component: &V,
        preferred: &Arborescence<V>,
        components: &mut Partition<V>,
    ) -> Result<Option<Candidate<V>>, HeapError> {
        let Some(mut queue) = self.queues.remove(component) else {
            return Ok(None);
        };
        let best = self.pop_preferring(&mut queue.heap, preferred, components);
        self.queues.insert(component.clone(), queue);
        best
    }

    /// Replaces the queues of the contracted components by one queue under
    /// `component`.
    ///
    /// Each entry of `cycle` names a contracted component together with the
    /// cycle edge entering it; choosing any queued edge of that component
    /// later displaces that cycle edge.
    pub(crate) fn merge(
        &mut self,
        component: V,
        cycle: Vec<(V, WeightedEdge<V>)>,
    ) -> Result<(), HeapError> {
        let group = self.new_group();
        let mut merged = self.forest.heap();
        for (contracted, displaced) in cycle {
            let Some(queue) = self.queues.remove(&contracted) else {
                continue;
            };
            // Links must be in place before the splice compares the minima.
            self.forest
                .comparator_mut()
                .attach(queue.group, group, -displaced.weight());
            self.displaced[queue.group] = Some(displaced.into_edge());
            merged = self.forest.merge(merged, queue.heap)?;
        }
        self.queues.insert(
            component,
            ComponentQueue {
                heap: merged,
                group,
            },
        );
        Ok(())
    }

    fn new_group(&mut self) -> usize {
        self.displaced.push(None);
        self.forest.comparator_mut().new_group()
    }

    fn next_key(&mut self, root: bool, base: f64, group: usize) -> OfferKey {
        let sequence = self.sequence;
        self.sequence = self.sequence.saturating_add(1);
        OfferKey {
            root,
            base,
            group,
            sequence,
        }
    }

    fn pop_preferring(
        &mut self,
        heap: &mut FibonacciHeap,
        preferred: &Arborescence<V>,
        components: &mut Partition<V>,
    ) -> Result<Option<Candidate<V>>, HeapError> {
        let Some(first) = self.pop_usable(heap, components) else {
            return Ok(None);
        };
        if preferred.is_empty() || is_preferred(&first.0, preferred) {
            return Ok(Some(self.candidate(first)));
        }

        let order = self.forest.comparator();
        let (best_root, best_weight) = (first.1.root, order.reduced_weight(&first.1));
        let mut popped = vec![first];
        let mut chosen = 0;
        while let Some(next) = self.pop_usable(heap, components) {
            let weight = self.forest.comparator().reduced_weight(&next.1);
            let tied = next.1.root == best_root && (best_weight - weight).abs() <= self.tie_tolerance;
            let wins = tied && is_preferred(&next.0, preferred);
            popped.push(next);
            if wins {
                chosen = popped.len() - 1;
            }
            if wins || !tied {
                break;
            }
        }

        let best = popped.swap_remove(chosen);
        for (offer, key) in popped {
            self.forest.add(heap, offer, key)?;
        }
        Ok(Some(self.candidate(best)))
    }

    fn pop_usable(
        &mut self,
        heap: &mut FibonacciHeap,
        components: &mut Partition<V>,
    ) -> Option<(Offer<V>, OfferKey)> {
        while let Some((offer, key)) = self.forest.extract_min_entry(heap) {
            if let Offer::Edge(edge) = &offer {
                if components.same_component(edge.source(), edge.destination()) {
                    trace!(edge = %edge, "discarding edge internal to its component");
                    continue;
                }
            }
            return Some((offer, key));
        }
        None
    }

    fn candidate(&self, (offer, key): (Offer<V>, OfferKey)) -> Candidate<V> {
        let order = self.forest.comparator();
        let weight = order.reduced_weight(&key);
        let mut excluded = Vec::new();
        let mut group = Some(key.group);
        while let Some(current) = group {
            if let Some(edge) = &self.displaced[current] {
                excluded.push(edge.clone());
            }
            group = order.parent(current);
        }
        match offer {
            Offer::Edge(edge) => Candidate::Edge(ExclusiveEdge::new(edge, weight, excluded)),
            Offer::Root(node) => Candidate::Root {
                node,
                weight,
                excluded,
            },
        }
    }
}

fn is_preferred<V: NodeId>(offer: &Offer<V>, preferred: &Arborescence<V>) -> bool {
    match offer {
        Offer::Edge(edge) => preferred.contains(edge),
        Offer::Root(_) => false,
    }
}
