//! __cliquetree__ turns the undirected structure of a graphical model into
//! a junction tree suitable for exact inference.
//!
//! The graph is triangulated by node elimination.  Each elimination step
//! removes a node after connecting its neighbours pairwise, and the clique
//! formed by the node and those neighbours is recorded.  The cliques are then
//! assembled into a tree of maximal cliques whose separators satisfy the
//! running intersection property.
//!
//! ## Features
//!
//! * __Weighted min-fill elimination__: nodes are ranked by the domain size
//!   weighted fill-in they would cause.  Costs are maintained incrementally in
//!   an indexed priority queue, so only nodes whose neighbourhood changed are
//!   re-ranked after each step.
//!
//! * __Constrained elimination__: a fixed order, an approximate minimum degree
//!   order, or a partial order given as a sequence of node subsets.
//!
//! * __Minimal triangulations__: redundant fill-ins can be removed by
//!   recursive thinning.
//!
//! * __Maximal prime subgraph decomposition__: the junction tree can be
//!   coarsened until every separator is complete in the original graph.
//!
//! # Example
//!
//! ```
//! use cliquetree::graph::{DomainSizes, UndirectedGraph};
//! use cliquetree::triangulation::StaticTriangulation;
//!
//! // two triangles sharing the edge 1-2
//! let g = UndirectedGraph::from_edges(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]).unwrap();
//! let sizes: DomainSizes = g.nodes().map(|n| (n, 2)).collect();
//!
//! let mut triangulation = StaticTriangulation::new();
//! triangulation.set_graph(&g, &sizes);
//!
//! let tree = triangulation.junction_tree().unwrap();
//! assert_eq!(tree.size(), 2);
//! assert_eq!(tree.separator(0, 1).unwrap().len(), 2);
//! ```

pub mod graph;
pub mod triangulation;

mod error_types;
pub use error_types::*;
