//! Minimum-weight perfect matching on the odd-degree vertices.
//!
//! The solver is a strategy behind the [`MatchingSolver`] trait: the blossom
//! algorithm for production use and an exhaustive dynamic programme for small
//! instances and cross-checking.

pub mod blossom;
pub mod exhaustive;

pub use blossom::BlossomMatching;
pub use exhaustive::{ExhaustiveMatching, EXHAUSTIVE_LIMIT};

use serde::{Deserialize, Serialize};

use crate::error::{ChristofidesError, Result};
use crate::graph::{Matching, WeightedGraph};

/// Trait for minimum-weight perfect matching solvers
pub trait MatchingSolver {
    /// Pair up every vertex of `vertices` using edges of `graph`, minimising
    /// the total weight. An empty vertex set yields an empty matching.
    fn min_weight_perfect_matching(
        &self,
        graph: &WeightedGraph,
        vertices: &[usize],
    ) -> Result<Matching>;

    fn name(&self) -> &str;
}

/// Selectable matching strategy.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum MatchingStrategy {
    #[default]
    Blossom,
    Exhaustive,
}

impl MatchingStrategy {
    pub fn solver(&self) -> Box<dyn MatchingSolver> {
        match self {
            MatchingStrategy::Blossom => Box::new(BlossomMatching::new()),
            MatchingStrategy::Exhaustive => Box::new(ExhaustiveMatching::new()),
        }
    }
}

/// Reject vertex sets that cannot be perfectly matched in `graph`.
pub(crate) fn check_vertex_set(graph: &WeightedGraph, vertices: &[usize]) -> Result<()> {
    if vertices.len() % 2 != 0 {
        return Err(ChristofidesError::NoPerfectMatching(format!(
            "{} vertices cannot be perfectly matched",
            vertices.len()
        )));
    }
    let mut seen = vec![false; graph.num_vertices()];
    for &v in vertices {
        if v >= graph.num_vertices() {
            return Err(ChristofidesError::InvalidGraph(format!(
                "vertex {} is out of range for {} vertices",
                v,
                graph.num_vertices()
            )));
        }
        if seen[v] {
            return Err(ChristofidesError::NoPerfectMatching(format!(
                "vertex {} appears twice",
                v
            )));
        }
        seen[v] = true;
    }
    Ok(())
}
