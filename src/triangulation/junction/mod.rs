//! Junction tree assembly from an elimination tree.

use crate::graph::{CliqueGraph, CliqueId, NodeId};
use crate::TriangulationError;
use enum_dispatch::*;
use indexmap::IndexMap;

mod merge;
mod nomerge;

pub use merge::*;
pub use nomerge::*;

/// A clique tree together with the clique that owns each node of the
/// underlying graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunctionTreeBuild {
    pub tree: CliqueGraph,
    /// for each eliminated node, the clique containing the clique created
    /// by its elimination
    pub node_to_clique: IndexMap<NodeId, CliqueId>,
}

// All junction tree strategies must implement the following trait.

#[enum_dispatch]
pub trait JunctionTreeStrategy {
    /// Assembles a junction tree from the elimination tree and the
    /// elimination order that produced it.  Fails with
    /// `OperationNotAllowed` if nothing has been eliminated.
    fn junction_tree(
        &mut self,
        elimination_tree: &CliqueGraph,
        elimination_order: &[NodeId],
    ) -> Result<JunctionTreeBuild, TriangulationError>;
}

#[enum_dispatch(JunctionTreeStrategy)]
#[derive(Debug)]
pub enum JunctionTreeMethod {
    Merge(DefaultJunctionTreeStrategy),
    NoMerge(NoMergeJunctionTreeStrategy),
}

impl JunctionTreeMethod {
    /// the strategy registered under `name` ("merge" or "none")
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "merge" => Some(DefaultJunctionTreeStrategy::new().into()),
            "none" => Some(NoMergeJunctionTreeStrategy::new().into()),
            _ => None,
        }
    }
}

fn check_input(
    elimination_tree: &CliqueGraph,
    elimination_order: &[NodeId],
) -> Result<(), TriangulationError> {
    if elimination_order.is_empty() {
        return Err(TriangulationError::OperationNotAllowed(
            "junction tree requested before any elimination",
        ));
    }
    if elimination_order.len() != elimination_tree.size() {
        return Err(TriangulationError::GraphError(format!(
            "elimination tree has {} cliques for {} eliminated nodes",
            elimination_tree.size(),
            elimination_order.len()
        )));
    }
    Ok(())
}
