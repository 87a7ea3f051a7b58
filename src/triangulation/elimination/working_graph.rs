use crate::graph::{Edge, EdgeSet, NodeId, UndirectedGraph, VertexSet};
use crate::TriangulationError;
use itertools::Itertools;

/// The record of a single elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EliminationStep {
    /// the eliminated node
    pub node: NodeId,
    /// the eliminated node followed by its neighbours at elimination time
    pub clique: VertexSet,
    /// the edges added between those neighbours (empty when fill-in
    /// tracking is disabled)
    pub fill_ins: Vec<Edge>,
}

/// Hooks invoked while a node is eliminated.  Both are called *before* the
/// graph is modified, so implementors see the graph as it was.
pub(crate) trait EliminationObserver {
    fn edge_added(&mut self, _graph: &UndirectedGraph, _a: NodeId, _b: NodeId) {}
    fn node_removed(&mut self, _graph: &UndirectedGraph, _node: NodeId) {}
}

impl EliminationObserver for () {}

/// The working copy of a graph being eliminated, plus the fill-ins added so far.
#[derive(Debug, Clone, Default)]
pub(crate) struct EliminationGraph {
    graph: UndirectedGraph,
    fill_ins: EdgeSet,
    track_fill_ins: bool,
}

impl EliminationGraph {
    pub(crate) fn new(graph: &UndirectedGraph, track_fill_ins: bool) -> Self {
        Self {
            graph: graph.clone(),
            fill_ins: EdgeSet::new(),
            track_fill_ins,
        }
    }

    pub(crate) fn graph(&self) -> &UndirectedGraph {
        &self.graph
    }

    pub(crate) fn fill_ins(&self) -> &EdgeSet {
        &self.fill_ins
    }

    pub(crate) fn set_track_fill_ins(&mut self, track: bool) {
        self.track_fill_ins = track;
    }

    /// Removes `node`, first connecting all of its neighbours pairwise.
    pub(crate) fn eliminate_with<O>(
        &mut self,
        node: NodeId,
        observer: &mut O,
    ) -> Result<EliminationStep, TriangulationError>
    where
        O: EliminationObserver,
    {
        let neighbours = self.graph.neighbours(node)?.clone();

        let mut clique = VertexSet::with_capacity(neighbours.len() + 1);
        clique.insert(node);
        clique.extend(neighbours.iter().copied());

        let mut fill_ins = Vec::new();
        for (&a, &b) in neighbours.iter().tuple_combinations() {
            if self.graph.exists_edge(a, b) {
                continue;
            }
            observer.edge_added(&self.graph, a, b);
            self.graph.add_edge(a, b)?;
            if self.track_fill_ins {
                fill_ins.push(Edge::new(a, b));
            }
        }

        observer.node_removed(&self.graph, node);
        self.graph.remove_node(node)?;

        self.fill_ins.extend(fill_ins.iter().copied());

        Ok(EliminationStep {
            node,
            clique,
            fill_ins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eliminate_star_center() {
        let g = UndirectedGraph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let mut elim = EliminationGraph::new(&g, true);

        let step = elim.eliminate_with(0, &mut ()).unwrap();
        assert_eq!(step.clique.len(), 5);
        assert_eq!(step.clique[0], 0);
        assert_eq!(step.fill_ins.len(), 6);
        assert_eq!(elim.fill_ins().len(), 6);
        assert_eq!(elim.graph().size(), 4);
        assert!(elim.graph().is_clique(&[1, 2, 3, 4]));

        // already gone
        assert_eq!(
            elim.eliminate_with(0, &mut ()),
            Err(TriangulationError::NotFound(0))
        );
    }

    #[test]
    fn test_untracked_fill_ins() {
        let g = UndirectedGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let mut elim = EliminationGraph::new(&g, false);
        let step = elim.eliminate_with(1, &mut ()).unwrap();

        // the working graph still gets the edge, only the record is skipped
        assert!(step.fill_ins.is_empty());
        assert!(elim.fill_ins().is_empty());
        assert!(elim.graph().exists_edge(0, 2));
    }
}
