//! Elimination sequence strategies.
//!
//! A strategy owns a working copy of the graph, proposes the next node to
//! eliminate and performs the elimination, returning the clique it created
//! and the fill-in edges it added.

use crate::graph::{DomainSizes, EdgeSet, NodeId, UndirectedGraph};
use crate::TriangulationError;
use enum_dispatch::*;

mod default;
mod ordered;
mod partial_order;
mod priority;
mod simplicial;
mod working_graph;

pub use default::*;
pub use ordered::*;
pub use partial_order::*;
pub use working_graph::EliminationStep;

// All elimination sequence strategies must implement the following trait.

#[enum_dispatch]
pub trait EliminationSequenceStrategy {
    /// Loads a graph, discarding any previous state.  Variants that weigh
    /// nodes by their domain fail with `GraphError` if a node of `graph`
    /// has no valid entry in `domain_sizes`.
    fn set_graph(
        &mut self,
        graph: &UndirectedGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError>;

    /// forgets the loaded graph and all elimination state
    fn clear(&mut self);

    /// the node the strategy would eliminate next
    fn next_node_to_eliminate(&self) -> Result<NodeId, TriangulationError>;

    /// Eliminates `node` from the working graph.  Fails with `NotFound` if
    /// the node is not (or no longer) in the working graph.
    fn eliminate(&mut self, node: NodeId) -> Result<EliminationStep, TriangulationError>;

    /// turns recording of fill-in edges on or off
    fn ask_fill_ins(&mut self, track: bool);

    /// all fill-in edges recorded so far
    fn fill_ins(&self) -> &EdgeSet;

    /// the graph that remains to be eliminated
    fn working_graph(&self) -> &UndirectedGraph;

    /// true once every node has been eliminated
    fn is_done(&self) -> bool {
        self.working_graph().is_empty()
    }
}

/// The elimination sequence strategies available to a
/// [`StaticTriangulation`](crate::triangulation::StaticTriangulation).
#[enum_dispatch(EliminationSequenceStrategy)]
#[derive(Debug)]
pub enum EliminationStrategy {
    Default(DefaultEliminationStrategy),
    Ordered(OrderedEliminationStrategy),
    PartialOrdered(PartialOrderedEliminationStrategy),
}

/// Runs `strategy` over its whole working graph, returning every step in
/// elimination order.
pub fn eliminate_all<S>(strategy: &mut S) -> Result<Vec<EliminationStep>, TriangulationError>
where
    S: EliminationSequenceStrategy,
{
    let mut steps = Vec::with_capacity(strategy.working_graph().size());
    while !strategy.is_done() {
        let node = strategy.next_node_to_eliminate()?;
        steps.push(strategy.eliminate(node)?);
    }
    Ok(steps)
}
