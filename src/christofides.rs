//! Christofides–Serdyukov pipeline and its result.
//!
//! Sequences the stages of [`crate::algorithms`] over a validated
//! [`WeightedGraph`] and returns a structured [`ChristofidesResult`]; rendering
//! is left to [`crate::report`].

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::algorithms::{
    combine, eulerian_circuit, odd_degree_vertices, percentage_error, prim_mst, shortcut,
    tour_cost, MatchingStrategy,
};
use crate::error::{ChristofidesError, Result};
use crate::graph::{Edge, WeightedGraph};

/// Options of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Root vertex of Prim's algorithm
    pub root: usize,
    /// Minimum-weight perfect matching strategy
    pub matching: MatchingStrategy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            root: 0,
            matching: MatchingStrategy::Blossom,
        }
    }
}

/// Outcome of a Christofides run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChristofidesResult {
    /// Number of vertices of the instance
    pub num_vertices: usize,
    /// Minimum spanning tree edges, in insertion order
    pub tree_edges: Vec<Edge>,
    /// Total weight of the spanning tree
    pub tree_weight: f64,
    /// Odd-degree vertices of the spanning tree
    pub odd_vertices: Vec<usize>,
    /// Minimum-weight perfect matching on the odd vertices
    pub matching: Vec<(usize, usize)>,
    /// Total weight of the matching
    pub matching_weight: f64,
    /// Matching strategy that produced the matching
    pub matching_algorithm: String,
    /// Eulerian circuit of tree + matching
    pub circuit: Vec<usize>,
    /// Hamiltonian cycle, first vertex repeated at the end
    pub tour: Vec<usize>,
    /// Cost of the tour
    pub tour_cost: f64,
    /// Known optimal tour cost
    pub optimal: f64,
    /// Percentage deviation of the tour cost from the optimum
    pub percentage_error: f64,
    /// Computation time in seconds
    pub computation_time: f64,
}

/// Christofides–Serdyukov approximation
pub struct Christofides {
    pub config: SolverConfig,
}

impl Christofides {
    pub fn new(config: SolverConfig) -> Self {
        Christofides { config }
    }

    /// Run every stage on `graph` and compare the tour with `optimal`.
    pub fn run(&self, graph: &WeightedGraph, optimal: f64) -> Result<ChristofidesResult> {
        let start = Instant::now();
        let n = graph.num_vertices();

        let tree = prim_mst(graph, self.config.root)?;
        let odd = odd_degree_vertices(&tree)?;

        let solver = self.config.matching.solver();
        let matching = solver.min_weight_perfect_matching(graph, &odd)?;
        debug!(
            "{} matching paired {} odd vertices",
            solver.name(),
            odd.len()
        );

        let multi = combine(&tree, &matching, n)?;
        let circuit = eulerian_circuit(&multi)?;
        let tour = shortcut(&circuit);
        if !tour.is_hamiltonian(n) {
            return Err(ChristofidesError::InvariantViolation(format!(
                "shortcut tour {:?} is not a Hamiltonian cycle over {} vertices",
                tour.vertices, n
            )));
        }

        let cost = tour_cost(graph, &tour)?;
        let error = percentage_error(cost, optimal)?;

        let result = ChristofidesResult {
            num_vertices: n,
            tree_edges: tree.edges,
            tree_weight: tree.total_weight,
            odd_vertices: odd,
            matching: matching.pairs,
            matching_weight: matching.total_weight,
            matching_algorithm: solver.name().to_string(),
            circuit: circuit.vertices,
            tour: tour.vertices,
            tour_cost: cost,
            optimal,
            percentage_error: error,
            computation_time: start.elapsed().as_secs_f64(),
        };

        info!(
            "Christofides on {} vertices: MST {:.2}, tour {:.2}, optimal {:.2}, error {:.2}%",
            n, result.tree_weight, result.tour_cost, optimal, result.percentage_error
        );
        Ok(result)
    }
}

impl Default for Christofides {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Validate `matrix` as a complete graph and run the pipeline with the default
/// configuration.
pub fn run(matrix: Vec<Vec<f64>>, optimal: f64) -> Result<ChristofidesResult> {
    let graph = WeightedGraph::complete(matrix)?;
    Christofides::default().run(&graph, optimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn scenario_matrix() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 2.0],
            vec![2.0, 4.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ]
    }

    fn euclidean_matrix(n: usize, seed: u64) -> Vec<Vec<f64>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
            .collect();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let dx = points[i].0 - points[j].0;
                        let dy = points[i].1 - points[j].1;
                        (dx * dx + dy * dy).sqrt()
                    })
                    .collect()
            })
            .collect()
    }

    /// Optimal tour cost by enumerating permutations of vertices 1..n.
    fn brute_force_optimum(graph: &WeightedGraph) -> f64 {
        fn search(
            graph: &WeightedGraph,
            last: usize,
            visited: &mut Vec<bool>,
            count: usize,
            cost: f64,
            best: &mut f64,
        ) {
            let n = graph.num_vertices();
            if cost >= *best {
                return;
            }
            if count == n {
                *best = best.min(cost + graph.weight(last, 0));
                return;
            }
            for v in 1..n {
                if !visited[v] {
                    visited[v] = true;
                    search(graph, v, visited, count + 1, cost + graph.weight(last, v), best);
                    visited[v] = false;
                }
            }
        }

        let mut visited = vec![false; graph.num_vertices()];
        visited[0] = true;
        let mut best = f64::INFINITY;
        search(graph, 0, &mut visited, 1, 0.0, &mut best);
        best
    }

    #[test]
    fn test_four_vertex_scenario() {
        let result = run(scenario_matrix(), 6.0).unwrap();
        assert!((result.tree_weight - 4.0).abs() < 1e-12);
        assert_eq!(result.odd_vertices, vec![1, 3]);
        assert_eq!(result.matching, vec![(1, 3)]);
        assert_eq!(result.circuit, vec![0, 2, 3, 1, 0]);
        assert_eq!(result.tour, vec![0, 2, 3, 1, 0]);
        assert_eq!(result.tour_cost, 6.0);
        assert_eq!(result.percentage_error, 0.0);
    }

    #[test]
    fn test_reproducible() {
        let matrix = euclidean_matrix(30, 11);
        let first = run(matrix.clone(), 1.0).unwrap();
        let second = run(matrix, 1.0).unwrap();
        assert_eq!(first.tour, second.tour);
        assert_eq!(first.circuit, second.circuit);
        assert_eq!(first.tour_cost, second.tour_cost);
    }

    #[test]
    fn test_within_twice_optimum_on_metric_instances() {
        for seed in 0..8 {
            let graph = WeightedGraph::from_matrix(euclidean_matrix(8, seed)).unwrap();
            let optimum = brute_force_optimum(&graph);
            let result = Christofides::default().run(&graph, optimum).unwrap();
            assert_eq!(result.tour.len(), 9);
            assert!(result.tour_cost <= 2.0 * optimum + 1e-9);
            // Christofides guarantees 1.5 with an exact matching.
            assert!(result.tour_cost <= 1.5 * optimum + 1e-9);
            assert!(result.percentage_error >= -1e-9);
        }
    }

    #[test]
    fn test_strategies_agree_on_cost_bound() {
        let graph = WeightedGraph::from_matrix(euclidean_matrix(16, 42)).unwrap();
        let blossom = Christofides::default().run(&graph, 1.0).unwrap();
        let exhaustive = Christofides::new(SolverConfig {
            matching: MatchingStrategy::Exhaustive,
            ..Default::default()
        })
        .run(&graph, 1.0)
        .unwrap();
        assert!((blossom.matching_weight - exhaustive.matching_weight).abs() < 1e-6);
        assert_eq!(exhaustive.matching_algorithm, "Exhaustive");
    }

    #[test]
    fn test_zero_optimal_is_rejected() {
        assert!(matches!(
            run(scenario_matrix(), 0.0),
            Err(ChristofidesError::DivisionByZero)
        ));
    }

    #[test]
    fn test_small_instances() {
        let single = run(vec![vec![0.0]], 1.0).unwrap();
        assert_eq!(single.tour, vec![0, 0]);
        assert_eq!(single.tour_cost, 0.0);

        let pair = run(vec![vec![0.0, 3.0], vec![3.0, 0.0]], 6.0).unwrap();
        assert_eq!(pair.tour, vec![0, 1, 0]);
        assert_eq!(pair.tour_cost, 6.0);
        assert_eq!(pair.matching, vec![(0, 1)]);
    }

    #[test]
    fn test_coincident_points() {
        // (0, 0) twice, then (3, 4) and (6, 0).
        let matrix = vec![
            vec![0.0, 0.0, 5.0, 6.0],
            vec![0.0, 0.0, 5.0, 6.0],
            vec![5.0, 5.0, 0.0, 5.0],
            vec![6.0, 6.0, 5.0, 0.0],
        ];
        let result = run(matrix, 16.0).unwrap();
        assert_eq!(result.tree_edges[0], Edge::new(0, 1, 0.0));
        assert_eq!(result.tour, vec![0, 2, 3, 1, 0]);
        assert_eq!(result.tour_cost, 16.0);
        assert_eq!(result.percentage_error, 0.0);

        let pair = run(vec![vec![0.0, 0.0], vec![0.0, 0.0]], 1.0).unwrap();
        assert_eq!(pair.tour, vec![0, 1, 0]);
        assert_eq!(pair.tour_cost, 0.0);
    }

    #[test]
    fn test_masked_zero_cost_edge() {
        let mut matrix = scenario_matrix();
        matrix[0][1] = 0.0;
        matrix[1][0] = 0.0;
        let mask = (0..4).map(|i| (0..4).map(|j| i != j).collect()).collect();
        let graph = WeightedGraph::with_mask(matrix, mask).unwrap();

        let result = Christofides::default().run(&graph, 5.0).unwrap();
        assert!(result.tree_edges.contains(&Edge::new(0, 1, 0.0)));
        assert_eq!(result.tree_weight, 3.0);
        assert_eq!(result.tour, vec![0, 2, 3, 1, 0]);
        // 2 + 1 + 2 + 0, the closing step back to 0 is free.
        assert_eq!(result.tour_cost, 5.0);
    }

    #[test]
    fn test_non_finite_optimal() {
        assert!(matches!(
            run(scenario_matrix(), f64::NAN),
            Err(ChristofidesError::InvalidOptimal { .. })
        ));
    }

    #[test]
    fn test_invalid_matrix() {
        assert!(matches!(
            run(vec![vec![0.0, 1.0], vec![2.0, 0.0]], 1.0),
            Err(ChristofidesError::InvalidGraph(_))
        ));
    }
}
