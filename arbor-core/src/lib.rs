//! Arbor core library: maximum branchings of weighted directed graphs.
//!
//! The solver implements Tarjan's formulation of the Chu-Liu-Edmonds
//! algorithm on top of a union-find [`Partition`] and a mergeable
//! [`FibonacciHeap`] arena. Start from [`max_arborescence`] or configure an
//! [`ArborescenceSolver`] through [`SolverBuilder`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod arborescence;
mod edge_queue;
mod error;
mod graph;
mod heap;
mod partition;
mod solver;
#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    arborescence::{Arborescence, Weighted},
    error::{ArborError, ArborErrorCode, HeapError, HeapErrorCode, Result},
    graph::{
        DenseWeightedGraph, Edge, ExclusiveEdge, NodeId, SparseWeightedGraph, WeightedEdge,
        WeightedGraph,
    },
    heap::{
        Comparator, DEFAULT_CAPACITY, Entries, EntryId, FibonacciHeap, HeapForest, NaturalOrder,
    },
    partition::Partition,
    solver::{
        ArborescenceSolver, SolverBuilder, max_arborescence, max_arborescence_constrained,
        max_arborescence_rooted,
    },
};
