//! Exact minimum-weight perfect matching by dynamic programming over subsets.

use log::debug;

use super::{check_vertex_set, MatchingSolver};
use crate::error::{ChristofidesError, Result};
use crate::graph::{Matching, WeightedGraph};

/// Largest vertex set accepted by [`ExhaustiveMatching`].
pub const EXHAUSTIVE_LIMIT: usize = 20;

/// O(2^k · k) exact matcher for small vertex sets.
///
/// The lowest unmatched vertex is always paired next, with partners tried in
/// ascending order; on equal totals the first pairing found is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveMatching;

impl ExhaustiveMatching {
    pub fn new() -> Self {
        ExhaustiveMatching
    }
}

impl MatchingSolver for ExhaustiveMatching {
    fn min_weight_perfect_matching(
        &self,
        graph: &WeightedGraph,
        vertices: &[usize],
    ) -> Result<Matching> {
        check_vertex_set(graph, vertices)?;
        let k = vertices.len();
        if k == 0 {
            return Ok(Matching::default());
        }
        if k > EXHAUSTIVE_LIMIT {
            return Err(ChristofidesError::NoPerfectMatching(format!(
                "exhaustive matching is limited to {} vertices, got {}",
                EXHAUSTIVE_LIMIT, k
            )));
        }

        let full = (1usize << k) - 1;
        // cost[mask]: cheapest way to match the vertices outside `mask`.
        let mut cost = vec![f64::INFINITY; 1 << k];
        let mut partner = vec![usize::MAX; 1 << k];
        cost[full] = 0.0;

        for mask in (0..full).rev() {
            let i = mask.trailing_ones() as usize;
            for j in i + 1..k {
                if mask & (1 << j) != 0 || !graph.has_edge(vertices[i], vertices[j]) {
                    continue;
                }
                let rest = cost[mask | (1 << i) | (1 << j)];
                if rest.is_infinite() {
                    continue;
                }
                let total = graph.weight(vertices[i], vertices[j]) + rest;
                if total < cost[mask] {
                    cost[mask] = total;
                    partner[mask] = j;
                }
            }
        }

        if cost[0].is_infinite() {
            return Err(ChristofidesError::NoPerfectMatching(
                "induced subgraph has no perfect matching".to_string(),
            ));
        }

        let mut pairs = Vec::with_capacity(k / 2);
        let mut mask = 0usize;
        while mask != full {
            let i = mask.trailing_ones() as usize;
            let j = partner[mask];
            pairs.push((vertices[i], vertices[j]));
            mask |= (1 << i) | (1 << j);
        }

        let matching = Matching::from_pairs(graph, pairs);
        debug!(
            "Exhaustive matching: {} pairs, total weight {:.6}",
            matching.len(),
            matching.total_weight
        );
        Ok(matching)
    }

    fn name(&self) -> &str {
        "Exhaustive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_cheap_pairs() {
        let graph = WeightedGraph::from_matrix(vec![
            vec![0.0, 1.0, 9.0, 9.0],
            vec![1.0, 0.0, 9.0, 9.0],
            vec![9.0, 9.0, 0.0, 2.0],
            vec![9.0, 9.0, 2.0, 0.0],
        ])
        .unwrap();
        let matching = ExhaustiveMatching::new()
            .min_weight_perfect_matching(&graph, &[3, 2, 1, 0])
            .unwrap();
        assert_eq!(matching.pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(matching.total_weight, 3.0);
    }

    #[test]
    fn test_size_limit() {
        let n = EXHAUSTIVE_LIMIT + 2;
        let matrix = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
            .collect();
        let graph = WeightedGraph::from_matrix(matrix).unwrap();
        let vertices: Vec<usize> = (0..n).collect();
        assert!(matches!(
            ExhaustiveMatching::new().min_weight_perfect_matching(&graph, &vertices),
            Err(ChristofidesError::NoPerfectMatching(_))
        ));
    }
}
