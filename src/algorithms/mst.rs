//! Minimum spanning tree construction with Prim's algorithm.

use log::debug;

use crate::error::{ChristofidesError, Result};
use crate::graph::{Edge, SpanningTree, WeightedGraph};

/// Build a minimum spanning tree rooted at `root` with dense O(n²) Prim.
///
/// Among the vertices not yet in the tree, the one with the smallest
/// connection cost is selected, ties going to the smallest index. Only edges
/// present in the graph relax a neighbour's key.
pub fn prim_mst(graph: &WeightedGraph, root: usize) -> Result<SpanningTree> {
    let n = graph.num_vertices();
    if root >= n {
        return Err(ChristofidesError::InvalidGraph(format!(
            "root vertex {} is out of range for {} vertices",
            root, n
        )));
    }

    let mut key = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut in_tree = vec![false; n];
    let mut tree = SpanningTree::new(n);
    key[root] = 0.0;

    for _ in 0..n {
        let mut selected: Option<usize> = None;
        for v in 0..n {
            if in_tree[v] {
                continue;
            }
            match selected {
                Some(s) if key[v] >= key[s] => {}
                _ => selected = Some(v),
            }
        }

        // Every step runs while some vertex is still outside the tree.
        let u = match selected {
            Some(u) => u,
            None => break,
        };
        if key[u].is_infinite() {
            return Err(ChristofidesError::DisconnectedGraph { vertex: u });
        }

        in_tree[u] = true;
        if let Some(p) = parent[u] {
            tree.push(Edge::new(p, u, graph.weight(p, u)));
        }

        for v in 0..n {
            if in_tree[v] || !graph.has_edge(u, v) {
                continue;
            }
            let w = graph.weight(u, v);
            if w < key[v] {
                key[v] = w;
                parent[v] = Some(u);
            }
        }
    }

    debug!(
        "Prim: {} edges, total weight {:.6} (root {})",
        tree.edges.len(),
        tree.total_weight,
        root
    );

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use ordered_float::OrderedFloat;

    fn scenario_graph() -> WeightedGraph {
        WeightedGraph::from_matrix(vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 2.0],
            vec![2.0, 4.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    /// Kruskal with union-find, used as an independent reference.
    fn kruskal_weight(graph: &WeightedGraph) -> f64 {
        let n = graph.num_vertices();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                if graph.has_edge(i, j) {
                    edges.push((graph.weight(i, j), i, j));
                }
            }
        }
        edges.sort_by_key(|e| OrderedFloat(e.0));

        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut Vec<usize>, x: usize) -> usize {
            let mut root = x;
            while parent[root] != root {
                root = parent[root];
            }
            let mut node = x;
            while parent[node] != root {
                let next = parent[node];
                parent[node] = root;
                node = next;
            }
            root
        }

        let mut total = 0.0;
        for (w, i, j) in edges {
            let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
            if ri != rj {
                parent[ri] = rj;
                total += w;
            }
        }
        total
    }

    fn random_graph(n: usize, seed: u64) -> WeightedGraph {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i + 1..n {
                let w: f64 = rng.gen_range(1.0..100.0);
                matrix[i][j] = w;
                matrix[j][i] = w;
            }
        }
        WeightedGraph::from_matrix(matrix).unwrap()
    }

    #[test]
    fn test_masked_zero_cost_edge() {
        let mut matrix = vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 2.0],
            vec![2.0, 4.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ];
        matrix[0][1] = 0.0;
        matrix[1][0] = 0.0;
        let mask = (0..4).map(|i| (0..4).map(|j| i != j).collect()).collect();
        let graph = WeightedGraph::with_mask(matrix.clone(), mask).unwrap();

        let tree = prim_mst(&graph, 0).unwrap();
        assert_eq!(tree.edges[0], Edge::new(0, 1, 0.0));
        assert_eq!(tree.edges.len(), 3);
        assert_eq!(tree.total_weight, 3.0);
        assert_eq!(tree.total_weight, kruskal_weight(&graph));

        // Without the mask the zero cell is a gap, and vertex 1 hangs off 3.
        let sparse = WeightedGraph::from_matrix(matrix).unwrap();
        let tree = prim_mst(&sparse, 0).unwrap();
        assert!(!tree.edges.iter().any(|e| e.u.min(e.v) == 0 && e.u.max(e.v) == 1));
    }

    #[test]
    fn test_scenario_weight() {
        let tree = prim_mst(&scenario_graph(), 0).unwrap();
        assert_eq!(tree.edges.len(), 3);
        assert!((tree.total_weight - 4.0).abs() < 1e-12);
        let pairs: Vec<(usize, usize)> = tree.edges.iter().map(|e| (e.u, e.v)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (2, 3)]);
    }

    #[test]
    fn test_matches_kruskal() {
        for seed in 0..20 {
            let graph = random_graph(12, seed);
            let tree = prim_mst(&graph, 0).unwrap();
            assert_eq!(tree.edges.len(), 11);
            assert!((tree.total_weight - kruskal_weight(&graph)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_root_choice_keeps_weight() {
        let graph = random_graph(9, 7);
        let from_zero = prim_mst(&graph, 0).unwrap();
        let from_five = prim_mst(&graph, 5).unwrap();
        assert!((from_zero.total_weight - from_five.total_weight).abs() < 1e-9);
    }

    #[test]
    fn test_single_vertex() {
        let graph = WeightedGraph::from_matrix(vec![vec![0.0]]).unwrap();
        let tree = prim_mst(&graph, 0).unwrap();
        assert!(tree.edges.is_empty());
        assert_eq!(tree.total_weight, 0.0);
    }

    #[test]
    fn test_disconnected() {
        // Vertex 2 only has zero (absent) edges.
        let graph = WeightedGraph::from_matrix(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        assert!(matches!(
            prim_mst(&graph, 0),
            Err(ChristofidesError::DisconnectedGraph { vertex: 2 })
        ));
    }

    #[test]
    fn test_invalid_root() {
        assert!(matches!(
            prim_mst(&scenario_graph(), 4),
            Err(ChristofidesError::InvalidGraph(_))
        ));
    }
}
