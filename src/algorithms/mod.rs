//! Stages of the Christofides pipeline.
//!
//! This module exports the spanning tree, parity, matching, multigraph,
//! Eulerian circuit, shortcutting and cost stages.

pub mod mst;
pub mod odd_vertices;
pub mod matching;
pub mod multigraph;
pub mod euler;
pub mod shortcut;
pub mod cost;

pub use mst::*;
pub use odd_vertices::*;
pub use matching::{BlossomMatching, ExhaustiveMatching, MatchingSolver, MatchingStrategy};
pub use multigraph::*;
pub use euler::*;
pub use shortcut::*;
pub use cost::*;
