//! Text rendering of a [`ChristofidesResult`].

use crate::christofides::ChristofidesResult;

/// Human-readable summary of a run: spanning tree, tour, cost and error.
pub fn render(result: &ChristofidesResult) -> String {
    let mut report = String::new();
    let edges: Vec<String> = result
        .tree_edges
        .iter()
        .map(|e| format!("({}, {}, {})", e.u, e.v, e.weight))
        .collect();

    report.push_str("========== Christofides ==========\n");
    report.push_str(&format!("Vertices: {}\n", result.num_vertices));
    report.push_str("\nMinimum spanning tree:\n");
    report.push_str(&format!("[{}]\n", edges.join(", ")));
    report.push_str(&format!("Minimum spanning tree weight: {}\n", result.tree_weight));
    report.push_str("\nApproximate tour:\n");
    report.push_str(&format!("{:?}\n", result.tour));
    report.push_str(&format!("Tour cost: {}\n", result.tour_cost));
    report.push_str(&format!("\nOptimal value: {}\n", result.optimal));
    report.push_str(&format!("Percentage error: {:.2} %\n", result.percentage_error));
    report.push_str(&format!("Time: {:.4}s\n", result.computation_time));
    report
}

/// Intermediate stages, printed with `--verbose`.
pub fn render_details(result: &ChristofidesResult) -> String {
    let mut report = String::new();
    report.push_str(&format!("Odd-degree vertices: {:?}\n", result.odd_vertices));
    report.push_str(&format!(
        "Matching ({}): {:?}\n",
        result.matching_algorithm, result.matching
    ));
    report.push_str(&format!("Matching weight: {}\n", result.matching_weight));
    report.push_str(&format!("Eulerian circuit: {:?}\n", result.circuit));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::christofides;

    fn scenario() -> ChristofidesResult {
        christofides::run(
            vec![
                vec![0.0, 1.0, 2.0, 3.0],
                vec![1.0, 0.0, 4.0, 2.0],
                vec![2.0, 4.0, 0.0, 1.0],
                vec![3.0, 2.0, 1.0, 0.0],
            ],
            5.5,
        )
        .unwrap()
    }

    #[test]
    fn test_render_summary() {
        let text = render(&scenario());
        assert!(text.contains("[(0, 1, 1), (0, 2, 2), (2, 3, 1)]"));
        assert!(text.contains("Minimum spanning tree weight: 4\n"));
        assert!(text.contains("[0, 2, 3, 1, 0]"));
        assert!(text.contains("Tour cost: 6\n"));
        assert!(text.contains("Optimal value: 5.5\n"));
        // 0.5 / 5.5 * 100 = 9.0909...
        assert!(text.contains("Percentage error: 9.09 %"));
    }

    #[test]
    fn test_render_details() {
        let text = render_details(&scenario());
        assert!(text.contains("Odd-degree vertices: [1, 3]"));
        assert!(text.contains("Matching (Blossom): [(1, 3)]"));
        assert!(text.contains("Eulerian circuit: [0, 2, 3, 1, 0]"));
    }
}
