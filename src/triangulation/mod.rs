//! Triangulation and junction tree construction.
//!
//! The [`StaticTriangulation`] drives an [elimination strategy](elimination)
//! node by node over a working copy of the graph, records the cliques and
//! fill-in edges it produces, and from those builds the elimination tree, the
//! [junction tree](junction) and, on demand, the maximal prime subgraph tree.

pub mod elimination;
mod elimination_tree;
pub mod junction;
mod max_prime;
mod settings;
mod static_triangulation;
mod thinning;

//Here we expose the orchestrator and its configuration
//directly, and leave the strategies in their own modules

pub use elimination_tree::elimination_tree;
pub use max_prime::max_prime_subgraph_tree;
pub use settings::*;
pub use static_triangulation::*;
