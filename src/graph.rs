//! Graph data structures used by the Christofides pipeline.
//!
//! Everything is stored densely and indexed by integer vertex id: the weighted
//! input graph, the spanning tree and matching edge lists, the multigraph of
//! parallel-edge counts, and the closed walks produced from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ChristofidesError, Result};

/// Relative tolerance accepted between `w[i][j]` and `w[j][i]`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Dense symmetric weighted graph.
///
/// Edge presence is tracked separately from the weight so that a zero-cost
/// edge and a missing edge are distinguishable. [`WeightedGraph::from_matrix`]
/// treats an off-diagonal zero as a missing edge, [`WeightedGraph::complete`]
/// keeps every pair, and [`WeightedGraph::with_mask`] takes the presence mask
/// explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGraph {
    num_vertices: usize,
    weights: Vec<Vec<f64>>,
    present: Vec<Vec<bool>>,
}

impl WeightedGraph {
    /// Build a graph from a square matrix, treating off-diagonal zeros as absent edges.
    pub fn from_matrix(weights: Vec<Vec<f64>>) -> Result<Self> {
        let n = weights.len();
        let present = (0..n)
            .map(|i| {
                (0..weights[i].len())
                    .map(|j| i != j && weights[i][j] > 0.0)
                    .collect()
            })
            .collect();
        Self::with_mask(weights, present)
    }

    /// Build a complete graph: every off-diagonal pair is an edge, zero weights included.
    pub fn complete(weights: Vec<Vec<f64>>) -> Result<Self> {
        let n = weights.len();
        let present = (0..n).map(|i| (0..n).map(|j| i != j).collect()).collect();
        Self::with_mask(weights, present)
    }

    /// Build a graph from a square matrix and an explicit edge presence mask.
    pub fn with_mask(weights: Vec<Vec<f64>>, present: Vec<Vec<bool>>) -> Result<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(ChristofidesError::InvalidGraph("matrix is empty".to_string()));
        }

        for (i, row) in weights.iter().enumerate() {
            if row.len() != n {
                return Err(ChristofidesError::InvalidGraph(format!(
                    "matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &w) in row.iter().enumerate() {
                if !w.is_finite() {
                    return Err(ChristofidesError::InvalidGraph(format!(
                        "weight ({}, {}) is not finite",
                        i, j
                    )));
                }
                if w < 0.0 {
                    return Err(ChristofidesError::InvalidGraph(format!(
                        "weight ({}, {}) is negative: {}",
                        i, j, w
                    )));
                }
            }
            if row[i] != 0.0 {
                return Err(ChristofidesError::InvalidGraph(format!(
                    "diagonal weight ({}, {}) is {}, expected 0",
                    i, i, row[i]
                )));
            }
        }

        if present.len() != n || present.iter().any(|row| row.len() != n) {
            return Err(ChristofidesError::InvalidGraph(
                "presence mask does not match the matrix dimension".to_string(),
            ));
        }

        let mut weights = weights;
        for i in 0..n {
            if present[i][i] {
                return Err(ChristofidesError::InvalidGraph(format!(
                    "presence mask declares a self-loop on vertex {}",
                    i
                )));
            }
            for j in i + 1..n {
                let (a, b) = (weights[i][j], weights[j][i]);
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(ChristofidesError::InvalidGraph(format!(
                        "matrix is asymmetric at ({}, {}): {} != {}",
                        i, j, a, b
                    )));
                }
                if present[i][j] != present[j][i] {
                    return Err(ChristofidesError::InvalidGraph(format!(
                        "presence mask is asymmetric at ({}, {})",
                        i, j
                    )));
                }
                weights[j][i] = a;
            }
        }

        Ok(WeightedGraph {
            num_vertices: n,
            weights,
            present,
        })
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Weight stored for the pair `(u, v)`.
    #[inline]
    pub fn weight(&self, u: usize, v: usize) -> f64 {
        self.weights[u][v]
    }

    /// Whether `(u, v)` is an edge of the graph.
    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.present[u][v]
    }
}

/// Weighted undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub weight: f64,
}

impl Edge {
    pub fn new(u: usize, v: usize, weight: f64) -> Self {
        Edge { u, v, weight }
    }
}

/// Spanning tree produced by Prim's algorithm, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningTree {
    pub num_vertices: usize,
    pub edges: Vec<Edge>,
    pub total_weight: f64,
}

impl SpanningTree {
    pub fn new(num_vertices: usize) -> Self {
        SpanningTree {
            num_vertices,
            edges: Vec::with_capacity(num_vertices.saturating_sub(1)),
            total_weight: 0.0,
        }
    }

    pub fn push(&mut self, edge: Edge) {
        self.total_weight += edge.weight;
        self.edges.push(edge);
    }
}

/// Set of vertex-disjoint pairs, each stored as `(min, max)` and sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Matching {
    pub pairs: Vec<(usize, usize)>,
    pub total_weight: f64,
}

impl Matching {
    /// Normalise `pairs` and price them against `graph`.
    pub fn from_pairs(graph: &WeightedGraph, pairs: Vec<(usize, usize)>) -> Self {
        let mut pairs: Vec<(usize, usize)> = pairs
            .into_iter()
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        pairs.sort_unstable();
        let total_weight = pairs.iter().map(|&(a, b)| graph.weight(a, b)).sum();
        Matching {
            pairs,
            total_weight,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Vertices covered by the matching.
    pub fn covered(&self) -> Vec<usize> {
        let mut covered: Vec<usize> = self.pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        covered.sort_unstable();
        covered
    }
}

/// Multigraph storing the number of parallel edges between each pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiGraph {
    num_vertices: usize,
    multiplicity: Vec<Vec<u32>>,
}

impl MultiGraph {
    pub fn new(num_vertices: usize) -> Self {
        MultiGraph {
            num_vertices,
            multiplicity: vec![vec![0; num_vertices]; num_vertices],
        }
    }

    /// Add one parallel edge between `u` and `v`.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.multiplicity[u][v] += 1;
        self.multiplicity[v][u] += 1;
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    #[inline]
    pub fn multiplicity(&self, u: usize, v: usize) -> u32 {
        self.multiplicity[u][v]
    }

    /// Multiplicity-weighted degree of `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.multiplicity[v].iter().map(|&m| m as usize).sum()
    }

    /// Number of edges, counting each parallel edge once.
    pub fn edge_count(&self) -> usize {
        (0..self.num_vertices)
            .map(|i| {
                (i + 1..self.num_vertices)
                    .map(|j| self.multiplicity[i][j] as usize)
                    .sum::<usize>()
            })
            .sum()
    }
}

/// Closed walk using every multigraph edge exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub vertices: Vec<usize>,
}

impl Circuit {
    /// Number of edges traversed.
    pub fn steps(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.vertices.first() == self.vertices.last()
    }
}

/// Hamiltonian cycle with the first vertex repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    pub vertices: Vec<usize>,
}

impl Tour {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Check that the tour visits each of `0..n` once and closes on its start.
    pub fn is_hamiltonian(&self, num_vertices: usize) -> bool {
        if self.vertices.len() != num_vertices + 1 || self.vertices.first() != self.vertices.last() {
            return false;
        }
        let unique: HashSet<usize> = self.vertices[..num_vertices].iter().cloned().collect();
        unique.len() == num_vertices && unique.iter().all(|&v| v < num_vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 2.0],
            vec![2.0, 4.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn test_from_matrix() {
        let graph = WeightedGraph::from_matrix(square()).unwrap();
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.weight(1, 3), 2.0);
        assert!(graph.has_edge(0, 3));
        assert!(!graph.has_edge(2, 2));
    }

    #[test]
    fn test_rejects_malformed_matrices() {
        assert!(matches!(
            WeightedGraph::from_matrix(vec![]),
            Err(ChristofidesError::InvalidGraph(_))
        ));

        let mut ragged = square();
        ragged[2].pop();
        assert!(matches!(
            WeightedGraph::from_matrix(ragged),
            Err(ChristofidesError::InvalidGraph(_))
        ));

        let mut asymmetric = square();
        asymmetric[0][1] = 1.5;
        assert!(matches!(
            WeightedGraph::from_matrix(asymmetric),
            Err(ChristofidesError::InvalidGraph(_))
        ));

        let mut negative = square();
        negative[1][2] = -4.0;
        negative[2][1] = -4.0;
        assert!(matches!(
            WeightedGraph::from_matrix(negative),
            Err(ChristofidesError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_symmetry_tolerance() {
        let mut nearly = square();
        nearly[0][1] = 1.0 + 1e-12;
        let graph = WeightedGraph::from_matrix(nearly).unwrap();
        assert_eq!(graph.weight(0, 1), graph.weight(1, 0));
    }

    #[test]
    fn test_zero_weight_presence() {
        let mut matrix = square();
        matrix[0][1] = 0.0;
        matrix[1][0] = 0.0;
        let graph = WeightedGraph::from_matrix(matrix.clone()).unwrap();
        assert!(!graph.has_edge(0, 1));

        let mask = (0..4).map(|i| (0..4).map(|j| i != j).collect()).collect();
        let graph = WeightedGraph::with_mask(matrix.clone(), mask).unwrap();
        assert!(graph.has_edge(0, 1));
        assert_eq!(graph.weight(0, 1), 0.0);

        let complete = WeightedGraph::complete(matrix).unwrap();
        assert_eq!(complete, graph);
    }

    #[test]
    fn test_multigraph_counts() {
        let mut multi = MultiGraph::new(3);
        multi.add_edge(0, 1);
        multi.add_edge(1, 0);
        multi.add_edge(1, 2);
        assert_eq!(multi.multiplicity(0, 1), 2);
        assert_eq!(multi.degree(1), 3);
        assert_eq!(multi.edge_count(), 3);
    }

    #[test]
    fn test_tour_shape() {
        let tour = Tour { vertices: vec![0, 2, 1, 3, 0] };
        assert!(tour.is_hamiltonian(4));
        let broken = Tour { vertices: vec![0, 2, 2, 3, 0] };
        assert!(!broken.is_hamiltonian(4));
    }
}
