//! Union of the spanning tree and the matching into a multigraph.

use log::debug;

use crate::error::{ChristofidesError, Result};
use crate::graph::{Matching, MultiGraph, SpanningTree};

/// Add one parallel edge per tree edge and one per matching pair.
///
/// A pair that is both a tree edge and a matched pair ends with multiplicity
/// two. Every vertex of the result must have even degree.
pub fn combine(tree: &SpanningTree, matching: &Matching, num_vertices: usize) -> Result<MultiGraph> {
    let mut multi = MultiGraph::new(num_vertices);

    for edge in &tree.edges {
        check_pair(edge.u, edge.v, num_vertices)?;
        multi.add_edge(edge.u, edge.v);
    }
    for &(u, v) in &matching.pairs {
        check_pair(u, v, num_vertices)?;
        multi.add_edge(u, v);
    }

    if let Some(v) = (0..num_vertices).find(|&v| multi.degree(v) % 2 != 0) {
        return Err(ChristofidesError::InvariantViolation(format!(
            "vertex {} has odd degree {} in the combined multigraph",
            v,
            multi.degree(v)
        )));
    }

    debug!(
        "Multigraph: {} edges over {} vertices",
        multi.edge_count(),
        num_vertices
    );
    Ok(multi)
}

fn check_pair(u: usize, v: usize, num_vertices: usize) -> Result<()> {
    if u >= num_vertices || v >= num_vertices || u == v {
        return Err(ChristofidesError::InvariantViolation(format!(
            "edge ({}, {}) is not a valid pair over {} vertices",
            u, v, num_vertices
        )));
    }
    Ok(())
}
