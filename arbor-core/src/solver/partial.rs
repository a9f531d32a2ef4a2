//! Incremental state of one solve: the subgraph of chosen edges built up so
//! far, with its strongly and weakly connected components.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::arborescence::{Arborescence, Weighted};
use crate::edge_queue::{Candidate, EdgeQueueMap};
use crate::error::Result;
use crate::graph::{Edge, ExclusiveEdge, NodeId, WeightedEdge, WeightedGraph};
use crate::partition::Partition;

/// One accepted choice, with the earlier choices it overrides.
#[derive(Debug)]
struct Choice<V> {
    // `None` when a component was rooted instead of entered.
    edge: Option<Edge<V>>,
    excluded: Vec<Edge<V>>,
}

#[derive(Debug)]
pub(crate) struct PartialSolution<V: NodeId> {
    strongly_connected: Partition<V>,
    weakly_connected: Partition<V>,
    // Each strongly connected component has at most one incoming edge.
    incoming_edge_by_scc: HashMap<V, WeightedEdge<V>>,
    // Most recent first.
    history: VecDeque<Choice<V>>,
    unseen_incoming_edges: EdgeQueueMap<V>,
    score: f64,
    contractions: usize,
}

impl<V: NodeId> PartialSolution<V> {
    /// Starts from the empty subgraph of `graph`, queueing every edge with a
    /// finite weight. `graph` must not contain self-loops.
    pub(crate) fn initialize<G: WeightedGraph<V>>(graph: &G, tie_tolerance: f64) -> Result<Self> {
        let nodes = graph.nodes();
        let mut strongly_connected = Partition::singletons(nodes.iter().cloned());
        let mut unseen_incoming_edges = EdgeQueueMap::new(&nodes, tie_tolerance)?;
        for destination in &nodes {
            for edge in graph.incoming_edges(destination) {
                if edge.weight() != f64::NEG_INFINITY {
                    unseen_incoming_edges.add_edge(edge, &mut strongly_connected)?;
                }
            }
        }
        Ok(Self {
            strongly_connected,
            weakly_connected: Partition::singletons(nodes),
            incoming_edge_by_scc: HashMap::new(),
            history: VecDeque::new(),
            unseen_incoming_edges,
            score: 0.0,
            contractions: 0,
        })
    }

    pub(crate) fn nodes(&self) -> &[V] {
        self.strongly_connected.nodes()
    }

    pub(crate) fn contractions(&self) -> usize {
        self.contractions
    }

    #[cfg(test)]
    pub(crate) fn offset_work(&self) -> crate::edge_queue::OffsetWork {
        self.unseen_incoming_edges.offset_work()
    }

    pub(crate) fn pop_best_edge(
        &mut self,
        component: &V,
        preferred: &Arborescence<V>,
    ) -> Result<Option<Candidate<V>>> {
        Ok(self.unseen_incoming_edges.pop_best_edge(
            component,
            preferred,
            &mut self.strongly_connected,
        )?)
    }

    /// Adds the edge to the subgraph, contracting the cycle it closes if any.
    ///
    /// Returns the contracted component, which has no incoming edge yet.
    pub(crate) fn add_edge(&mut self, choice: ExclusiveEdge<V>) -> Result<Option<V>> {
        let (edge, weight, excluded) = choice.into_parts();
        trace!(edge = %edge, weight, "choosing edge");
        self.score += weight;
        let Some(destination_scc) = self.strongly_connected.component_of(edge.destination())
        else {
            return Ok(None);
        };
        let weighted = WeightedEdge::new(edge.clone(), weight);
        self.incoming_edge_by_scc
            .insert(destination_scc, weighted.clone());
        self.history.push_front(Choice {
            edge: Some(edge.clone()),
            excluded,
        });

        if self
            .weakly_connected
            .same_component(edge.source(), edge.destination())
        {
            self.merge(weighted).map(Some)
        } else {
            self.weakly_connected
                .merge(edge.source(), edge.destination());
            Ok(None)
        }
    }

    /// Leaves a component without an incoming edge, rooted at `node`.
    pub(crate) fn add_root(&mut self, node: &V, weight: f64, excluded: Vec<Edge<V>>) {
        trace!(node = ?node, weight, "rooting component");
        self.score += weight;
        if !excluded.is_empty() {
            self.history.push_front(Choice {
                edge: None,
                excluded,
            });
        }
    }

    /// Contracts the cycle closed by `new_edge` into one component.
    fn merge(&mut self, new_edge: WeightedEdge<V>) -> Result<V> {
        let cycle = self.cycle(&new_edge);
        let mut queues_to_merge = Vec::with_capacity(cycle.len());
        for edge in &cycle {
            if let Some(component) = self
                .strongly_connected
                .component_of(edge.edge().destination())
            {
                queues_to_merge.push((component, edge.clone()));
            }
        }
        for edge in &cycle {
            self.strongly_connected
                .merge(edge.edge().source(), edge.edge().destination());
        }
        let component = self
            .strongly_connected
            .component_of(new_edge.edge().destination())
            .unwrap_or_else(|| new_edge.edge().destination().clone());
        self.unseen_incoming_edges
            .merge(component.clone(), queues_to_merge)?;
        // Every edge on the cycle is now internal to the new component.
        self.incoming_edge_by_scc.remove(&component);
        self.contractions += 1;
        debug!(cycle_len = cycle.len(), component = ?component, "contracted cycle");
        Ok(component)
    }

    /// Walks backwards from `new_edge` through the chosen incoming edges until
    /// the walk reaches the component `new_edge` enters.
    fn cycle(&mut self, new_edge: &WeightedEdge<V>) -> Vec<WeightedEdge<V>> {
        let destination = new_edge.edge().destination();
        let mut cycle = vec![new_edge.clone()];
        let mut edge = new_edge;
        while !self
            .strongly_connected
            .same_component(edge.edge().source(), destination)
        {
            let Some(previous) = self
                .strongly_connected
                .component_of(edge.edge().source())
                .and_then(|component| self.incoming_edge_by_scc.get(&component))
            else {
                break;
            };
            cycle.push(previous.clone());
            edge = previous;
        }
        cycle
    }

    /// Reads the optimum branching off the history, newest choice first.
    ///
    /// A choice survives unless a newer surviving choice excluded it.
    pub(crate) fn recover_best_arborescence(self) -> Weighted<Arborescence<V>> {
        let mut parents = BTreeMap::new();
        let mut excluded = HashSet::new();
        for choice in self.history {
            if let Some(edge) = &choice.edge {
                if excluded.contains(edge) {
                    continue;
                }
                parents.insert(edge.destination().clone(), edge.source().clone());
            }
            excluded.extend(choice.excluded);
        }
        Weighted::new(Arborescence::from_parents(parents), self.score)
    }
}
