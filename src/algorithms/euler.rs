//! Eulerian circuit extraction with Hierholzer's algorithm.

use log::debug;

use crate::error::{ChristofidesError, Result};
use crate::graph::{Circuit, MultiGraph};

/// Find a closed walk using every edge of `multi` exactly once.
///
/// The traversal consumes a private adjacency multiset built from the
/// multigraph; the multigraph itself is left untouched.
pub fn eulerian_circuit(multi: &MultiGraph) -> Result<Circuit> {
    let n = multi.num_vertices();
    let total_edges = multi.edge_count();

    // One entry per parallel edge, neighbours in ascending order.
    let mut adjacency: Vec<Vec<usize>> = (0..n)
        .map(|u| {
            (0..n)
                .flat_map(|v| std::iter::repeat(v).take(multi.multiplicity(u, v) as usize))
                .collect()
        })
        .collect();

    let start = match adjacency.iter().position(|list| !list.is_empty()) {
        Some(v) => v,
        None if n <= 1 => return Ok(Circuit { vertices: vec![0; n] }),
        None => return Err(ChristofidesError::NoEdges { num_vertices: n }),
    };

    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(total_edges + 1);

    while let Some(&current) = stack.last() {
        match adjacency[current].pop() {
            Some(next) => {
                let back = adjacency[next].iter().position(|&u| u == current);
                match back {
                    Some(pos) => {
                        adjacency[next].remove(pos);
                    }
                    None => {
                        return Err(ChristofidesError::InvariantViolation(format!(
                            "edge ({}, {}) is missing its reverse entry",
                            current, next
                        )))
                    }
                }
                stack.push(next);
            }
            None => {
                circuit.push(current);
                stack.pop();
            }
        }
    }
    circuit.reverse();

    let circuit = Circuit { vertices: circuit };
    if circuit.steps() != total_edges {
        return Err(ChristofidesError::InvariantViolation(format!(
            "circuit uses {} of {} edges, the multigraph is not connected",
            circuit.steps(),
            total_edges
        )));
    }

    debug!("Eulerian circuit: {} steps from vertex {}", circuit.steps(), start);
    Ok(circuit)
}
