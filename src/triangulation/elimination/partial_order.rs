use super::simplicial::SimplicialSet;
use super::{EliminationSequenceStrategy, EliminationStep};
use crate::graph::{DomainSizes, EdgeSet, NodeId, UndirectedGraph, VertexSet};
use crate::TriangulationError;

/// Weighted min-fill elimination constrained by a partial order.
///
/// The nodes are split into an ordered list of subsets.  Every node of a
/// subset must be eliminated before any node of the following subsets;
/// within the active subset the cheapest node is chosen exactly as in
/// [`DefaultEliminationStrategy`](super::DefaultEliminationStrategy).
/// Costs are tracked for every node of the graph, but only the nodes of the
/// active subset are queued.
#[derive(Debug)]
pub struct PartialOrderedEliminationStrategy {
    subsets: Vec<VertexSet>,
    active: usize,
    remaining: usize,
    quasi_ratio: f64,
    track_fill_ins: bool,
    simplicial: SimplicialSet,
}

impl Default for PartialOrderedEliminationStrategy {
    fn default() -> Self {
        Self::new(Vec::new(), 0.1)
    }
}

impl PartialOrderedEliminationStrategy {
    pub fn new(subsets: Vec<VertexSet>, quasi_ratio: f64) -> Self {
        Self {
            subsets,
            active: 0,
            remaining: 0,
            quasi_ratio,
            track_fill_ins: true,
            simplicial: SimplicialSet::default(),
        }
    }

    /// Replaces the partial order.  Takes effect at the next call to
    /// [`set_graph`](EliminationSequenceStrategy::set_graph).
    pub fn set_partial_order(&mut self, subsets: Vec<VertexSet>) {
        self.subsets = subsets;
        self.clear();
    }

    pub fn partial_order(&self) -> &[VertexSet] {
        &self.subsets
    }

    /// index of the subset currently being eliminated
    pub fn active_subset(&self) -> usize {
        self.active
    }

    // moves on to the next non-empty subset once the active one is used up
    fn advance(&mut self) -> Result<(), TriangulationError> {
        while self.remaining == 0 && self.active < self.subsets.len() {
            self.active += 1;
            if let Some(subset) = self.subsets.get(self.active) {
                self.remaining = subset.len();
                self.simplicial.add_candidates(subset.iter().copied())?;
            }
        }
        Ok(())
    }
}

impl EliminationSequenceStrategy for PartialOrderedEliminationStrategy {
    /// Fails with `GraphError` unless the subsets cover the nodes of `graph`
    /// exactly once, or if a node has no valid domain size.
    fn set_graph(
        &mut self,
        graph: &UndirectedGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        let mut seen = VertexSet::with_capacity(graph.size());
        for &node in self.subsets.iter().flatten() {
            if !graph.exists_node(node) {
                return Err(TriangulationError::GraphError(format!(
                    "partial order names unknown node {node}"
                )));
            }
            if !seen.insert(node) {
                return Err(TriangulationError::GraphError(format!(
                    "partial order lists node {node} twice"
                )));
            }
        }
        if seen.len() != graph.size() {
            return Err(TriangulationError::GraphError(format!(
                "partial order covers {} of the {} nodes",
                seen.len(),
                graph.size()
            )));
        }

        self.simplicial =
            SimplicialSet::new(graph, domain_sizes, self.quasi_ratio, self.track_fill_ins)?;
        self.active = 0;
        self.remaining = 0;
        if let Some(first) = self.subsets.first() {
            self.remaining = first.len();
            self.simplicial.add_candidates(first.iter().copied())?;
        }
        self.advance()
    }

    fn clear(&mut self) {
        self.simplicial = SimplicialSet::default();
        self.active = 0;
        self.remaining = 0;
    }

    fn next_node_to_eliminate(&self) -> Result<NodeId, TriangulationError> {
        self.simplicial
            .best()
            .ok_or(TriangulationError::OperationNotAllowed(
                "no node left to eliminate",
            ))
    }

    fn eliminate(&mut self, node: NodeId) -> Result<EliminationStep, TriangulationError> {
        if !self.simplicial.graph().exists_node(node) {
            return Err(TriangulationError::NotFound(node));
        }
        if !self.simplicial.is_candidate(node) {
            return Err(TriangulationError::OperationNotAllowed(
                "node belongs to a later subset of the partial order",
            ));
        }
        let step = self.simplicial.eliminate(node)?;
        self.remaining -= 1;
        self.advance()?;
        Ok(step)
    }

    fn ask_fill_ins(&mut self, track: bool) {
        self.track_fill_ins = track;
        self.simplicial.set_track_fill_ins(track);
    }

    fn fill_ins(&self) -> &EdgeSet {
        self.simplicial.fill_ins()
    }

    fn working_graph(&self) -> &UndirectedGraph {
        self.simplicial.graph()
    }
}
