//! Complete graph backed by a square weight matrix.

use super::{WeightedEdge, WeightedGraph};
use crate::error::{ArborError, Result, render};

/// A graph over nodes `0..n` whose weights come from an `n × n` matrix.
///
/// `matrix[source][destination]` is the weight of `source -> destination`.
/// Entries equal to negative infinity mark missing edges; every other entry,
/// including the diagonal, is an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseWeightedGraph {
    weights: Vec<Vec<f64>>,
}

impl DenseWeightedGraph {
    /// Builds the graph from a square matrix.
    ///
    /// # Errors
    /// Returns [`ArborError::NonSquareMatrix`] when a row length differs from
    /// the number of rows and [`ArborError::NonFiniteWeight`] when an entry
    /// is NaN.
    pub fn from_matrix(weights: Vec<Vec<f64>>) -> Result<Self> {
        let expected = weights.len();
        for (row, columns) in weights.iter().enumerate() {
            if columns.len() != expected {
                return Err(ArborError::NonSquareMatrix {
                    row,
                    expected,
                    found: columns.len(),
                });
            }
            if let Some((column, &weight)) = columns.iter().enumerate().find(|(_, w)| w.is_nan())
            {
                return Err(ArborError::NonFiniteWeight {
                    source_node: render(&row),
                    destination: render(&column),
                    weight,
                });
            }
        }
        Ok(Self { weights })
    }

    /// Returns the number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.weights.len() }
}

impl WeightedGraph<usize> for DenseWeightedGraph {
    fn nodes(&self) -> Vec<usize> {
        (0..self.weights.len()).collect()
    }

    fn incoming_edges(&self, destination: &usize) -> Vec<WeightedEdge<usize>> {
        if *destination >= self.weights.len() {
            return Vec::new();
        }
        self.weights
            .iter()
            .enumerate()
            .map(|(source, row)| WeightedEdge::between(source, *destination, row[*destination]))
            .filter(|edge| edge.weight() != f64::NEG_INFINITY)
            .collect()
    }

    fn weight_of(&self, source: &usize, destination: &usize) -> f64 {
        self.weights
            .get(*source)
            .and_then(|row| row.get(*destination))
            .copied()
            .unwrap_or(f64::NEG_INFINITY)
    }
}
