//! Tour cost and deviation from a known optimum.

use crate::error::{ChristofidesError, Result};
use crate::graph::{Tour, WeightedGraph};

/// Sum of the weights along consecutive tour vertices.
pub fn tour_cost(graph: &WeightedGraph, tour: &Tour) -> Result<f64> {
    let mut cost = 0.0;
    for step in tour.vertices.windows(2) {
        let (u, v) = (step[0], step[1]);
        if u == v {
            continue;
        }
        if !graph.has_edge(u, v) {
            return Err(ChristofidesError::MissingEdge { u, v });
        }
        cost += graph.weight(u, v);
    }
    Ok(cost)
}

/// `(approx - optimal) / optimal * 100`.
pub fn percentage_error(approx: f64, optimal: f64) -> Result<f64> {
    if !optimal.is_finite() {
        return Err(ChristofidesError::InvalidOptimal { value: optimal });
    }
    if optimal == 0.0 {
        return Err(ChristofidesError::DivisionByZero);
    }
    Ok((approx - optimal) / optimal * 100.0)
}
