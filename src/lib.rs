//! Christofides TSP Library
//!
//! Christofides–Serdyukov 3/2-approximation for the metric Traveling Salesman
//! Problem on a complete weighted graph given as a distance matrix.
//!
//! # Features
//!
//! - Dense Prim minimum spanning tree
//! - Minimum-weight perfect matching on the odd-degree vertices (Edmonds blossom
//!   algorithm, or an exact bitmask search for small vertex sets)
//! - Hierholzer Eulerian circuit and shortcutting into a Hamiltonian tour
//! - Matrix instance files, TSPLIB conversion and manifest-driven benchmarks
//!
//! # Example
//!
//! ```no_run
//! use christofides_tsp::instance::MatrixInstance;
//! use christofides_tsp::christofides::{Christofides, SolverConfig};
//!
//! let instance = MatrixInstance::from_file("berlin52.txt").unwrap();
//! let graph = instance.to_graph().unwrap();
//!
//! let result = Christofides::new(SolverConfig::default())
//!     .run(&graph, 7542.0)
//!     .unwrap();
//!
//! println!("Tour cost: {:.2} ({:.2}% above optimal)", result.tour_cost, result.percentage_error);
//! ```

pub mod error;
pub mod graph;
pub mod algorithms;
pub mod christofides;
pub mod instance;
pub mod tsplib;
pub mod benchmark;
pub mod report;

pub use christofides::{run, Christofides, ChristofidesResult, SolverConfig};
pub use error::{ChristofidesError, Result};
pub use graph::WeightedGraph;
pub use instance::MatrixInstance;
