//! Error taxonomy shared by the pipeline stages and the outer layers.

/// Errors raised while building or evaluating a Christofides tour.
///
/// Every variant is terminal for the current run: the algorithm is deterministic,
/// so a failure means malformed input or a broken upstream invariant.
#[derive(Debug, thiserror::Error)]
pub enum ChristofidesError {
    /// Malformed, asymmetric or negative-weight matrix, or an out-of-range vertex.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Prim's algorithm could not reach a vertex from the root.
    #[error("Graph is disconnected: vertex {vertex} cannot be reached from the root")]
    DisconnectedGraph { vertex: usize },

    /// Odd-vertex parity or even-degree multigraph invariant broken.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// The induced subgraph on the odd vertices admits no perfect matching.
    #[error("No perfect matching: {0}")]
    NoPerfectMatching(String),

    /// Multigraph with more than one vertex but no edge to traverse.
    #[error("Multigraph on {num_vertices} vertices has no edges")]
    NoEdges { num_vertices: usize },

    /// A zero optimal value makes the percentage error undefined.
    #[error("Optimal value is zero, percentage error is undefined")]
    DivisionByZero,

    /// The optimal value is NaN or infinite.
    #[error("Optimal value {value} is not a finite number")]
    InvalidOptimal { value: f64 },

    /// A tour step uses a pair that is not an edge of the graph.
    #[error("Tour uses edge ({u}, {v}) which is absent from the graph")]
    MissingEdge { u: usize, v: usize },

    /// Matrix or manifest text could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for every fallible operation of the crate.
pub type Result<T> = std::result::Result<T, ChristofidesError>;
