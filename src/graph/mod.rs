//! Undirected graphs and clique graphs.
//!
//! Nodes are plain integer ids.  Sets of nodes are kept in insertion order
//! so that every algorithm in this crate is deterministic for a given input.

use std::collections::HashMap;

/// Identifier of a node of an [`UndirectedGraph`]
pub type NodeId = usize;

/// Identifier of a clique of a [`CliqueGraph`]
pub type CliqueId = usize;

/// Insertion ordered set of node ids
pub type VertexSet = indexmap::IndexSet<NodeId>;

/// Cardinality of the domain of each node (all values must be ≥ 1)
pub type DomainSizes = HashMap<NodeId, usize>;

mod clique_graph;
pub(crate) mod disjoint_set_union;
mod mcs;
mod undirected;

pub use clique_graph::*;
pub(crate) use clique_graph::intersect;
pub use mcs::*;
pub use undirected::*;
