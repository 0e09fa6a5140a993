//! Shortcutting an Eulerian circuit into a Hamiltonian cycle.

use std::collections::HashSet;

use crate::graph::{Circuit, Tour};

/// Keep the first visit of every vertex and close the cycle on the start.
pub fn shortcut(circuit: &Circuit) -> Tour {
    let mut visited = HashSet::new();
    let mut vertices: Vec<usize> = circuit
        .vertices
        .iter()
        .cloned()
        .filter(|&v| visited.insert(v))
        .collect();

    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }
    Tour { vertices }
}
