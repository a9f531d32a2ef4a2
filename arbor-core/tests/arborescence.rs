//! End-to-end checks of the public solver API.

use arbor_core::{
    ArborErrorCode, Arborescence, DenseWeightedGraph, Edge, SolverBuilder, SparseWeightedGraph,
    WeightedEdge, WeightedGraph, max_arborescence, max_arborescence_constrained,
    max_arborescence_rooted,
};
use rstest::{fixture, rstest};

const NO: f64 = f64::NEG_INFINITY;

#[fixture]
fn sentence_scores() -> DenseWeightedGraph {
    // Row = head, column = dependent; node 0 is the artificial root.
    DenseWeightedGraph::from_matrix(vec![
        vec![NO, 9.0, 10.0, 9.0],
        vec![NO, NO, 20.0, 3.0],
        vec![NO, 30.0, NO, 30.0],
        vec![NO, 11.0, 0.0, NO],
    ])
    .expect("matrix is square")
}

fn assert_weight(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected weight {expected}, got {actual}"
    );
}

#[rstest]
fn dense_scores_produce_a_parse(sentence_scores: DenseWeightedGraph) {
    let best = max_arborescence_rooted(&sentence_scores, 0).expect("solve succeeds");
    assert_eq!(best.value.parent_of(&2), Some(&0));
    assert_eq!(best.value.parent_of(&1), Some(&2));
    assert_eq!(best.value.parent_of(&3), Some(&2));
    assert_eq!(best.value.parent_of(&0), None);
    assert_weight(best.weight, 70.0);
}

#[rstest]
fn dense_and_sparse_views_agree(sentence_scores: DenseWeightedGraph) {
    let nodes = sentence_scores.nodes();
    let sparse = SparseWeightedGraph::with_nodes(
        nodes.clone(),
        nodes
            .iter()
            .flat_map(|node| sentence_scores.incoming_edges(node)),
    );
    let from_dense = max_arborescence_rooted(&sentence_scores, 0).expect("dense solve");
    let from_sparse = max_arborescence_rooted(&sparse, 0).expect("sparse solve");
    assert_eq!(from_dense.value, from_sparse.value);
    assert_weight(from_dense.weight, from_sparse.weight);
}

#[rstest]
fn banning_the_best_head_moves_the_dependent(sentence_scores: DenseWeightedGraph) {
    let best = SolverBuilder::new()
        .with_root(0)
        .with_banned_edges([Edge::new(2, 1)])
        .build()
        .expect("configuration is valid")
        .solve(&sentence_scores)
        .expect("solve succeeds");
    assert_eq!(best.value.parent_of(&1), Some(&0));
    assert_eq!(best.value.parent_of(&2), Some(&1));
    assert!(!best.value.contains(&Edge::new(2, 1)));
    assert_weight(best.weight, 59.0);
}

#[test]
fn non_square_matrix_is_rejected() {
    let err = DenseWeightedGraph::from_matrix(vec![vec![0.0, 1.0], vec![1.0]])
        .expect_err("ragged matrix");
    assert_eq!(err.code(), ArborErrorCode::NonSquareMatrix);
}

#[test]
fn unrooted_solve_spans_a_strongly_connected_graph() {
    let graph = SparseWeightedGraph::from_edges([
        WeightedEdge::between('a', 'b', 2.0),
        WeightedEdge::between('b', 'c', 2.0),
        WeightedEdge::between('c', 'a', 2.0),
        WeightedEdge::between('a', 'c', 1.0),
    ]);
    let best = max_arborescence(&graph).expect("solve succeeds");
    assert_eq!(best.value.len(), 2);
    assert_weight(best.weight, 4.0);
}

#[test]
fn required_edge_wins_over_heavier_competitor() {
    let graph = SparseWeightedGraph::from_edges([
        WeightedEdge::between(0_u8, 1, 1.0),
        WeightedEdge::between(0, 2, 5.0),
        WeightedEdge::between(2, 1, 10.0),
    ]);
    let best = max_arborescence_constrained(&graph, [Edge::new(0, 1)], [])
        .expect("solve succeeds");
    let expected: Arborescence<u8> = [Edge::new(0, 1), Edge::new(0, 2)].into_iter().collect();
    assert_eq!(best.value, expected);
    assert_weight(best.weight, 6.0);
}

#[test]
fn invalid_configuration_surfaces_through_free_functions() {
    let graph = SparseWeightedGraph::from_edges([WeightedEdge::between(0_u8, 1, 1.0)]);
    let err = max_arborescence_constrained(&graph, [Edge::new(1, 1)], [])
        .expect_err("self-loop cannot be required");
    assert_eq!(err.code(), ArborErrorCode::RequiredSelfLoop);
    assert_eq!(err.code().as_str(), "ARBOR_REQUIRED_SELF_LOOP");
}
