use super::simplicial::SimplicialSet;
use super::{EliminationSequenceStrategy, EliminationStep};
use crate::graph::{DomainSizes, EdgeSet, NodeId, UndirectedGraph};
use crate::TriangulationError;

/// Weighted min-fill elimination.
///
/// Simplicial nodes are always eliminated first, then quasi-simplicial ones,
/// each ranked by the weight of the clique they create.  All remaining nodes
/// are ranked by weighted fill-in, ties broken by clique weight and then by
/// node id.  Costs are maintained incrementally as the graph shrinks.
#[derive(Debug)]
pub struct DefaultEliminationStrategy {
    quasi_ratio: f64,
    track_fill_ins: bool,
    simplicial: SimplicialSet,
}

impl Default for DefaultEliminationStrategy {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl DefaultEliminationStrategy {
    pub fn new(quasi_ratio: f64) -> Self {
        Self {
            quasi_ratio,
            track_fill_ins: true,
            simplicial: SimplicialSet::default(),
        }
    }
}

impl EliminationSequenceStrategy for DefaultEliminationStrategy {
    fn set_graph(
        &mut self,
        graph: &UndirectedGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        let mut simplicial =
            SimplicialSet::new(graph, domain_sizes, self.quasi_ratio, self.track_fill_ins)?;
        simplicial.add_candidates(graph.nodes())?;
        self.simplicial = simplicial;
        Ok(())
    }

    fn clear(&mut self) {
        self.simplicial = SimplicialSet::default();
    }

    fn next_node_to_eliminate(&self) -> Result<NodeId, TriangulationError> {
        self.simplicial
            .best()
            .ok_or(TriangulationError::OperationNotAllowed(
                "no node left to eliminate",
            ))
    }

    fn eliminate(&mut self, node: NodeId) -> Result<EliminationStep, TriangulationError> {
        self.simplicial.eliminate(node)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::elimination::eliminate_all;

    #[test]
    fn test_empty_graph() {
        let mut s = DefaultEliminationStrategy::default();
        s.set_graph(&UndirectedGraph::new(), &DomainSizes::new()).unwrap();
        assert!(s.is_done());
        assert!(matches!(
            s.next_node_to_eliminate(),
            Err(TriangulationError::OperationNotAllowed(_))
        ));
    }

    #[test]
    fn test_simplicial_first() {
        // triangle 0-1-2 with a 4-cycle 2-3-4-5-2 hanging off node 2
        let g = UndirectedGraph::from_edges(
            6,
            &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (5, 2)],
        )
        .unwrap();
        let sizes: DomainSizes = g.nodes().map(|n| (n, 2)).collect();
        let mut s = DefaultEliminationStrategy::default();
        s.set_graph(&g, &sizes).unwrap();

        // nodes 0 and 1 are simplicial
        assert_eq!(s.next_node_to_eliminate().unwrap(), 0);
        let steps = eliminate_all(&mut s).unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[1].node, 1);

        // the 4-cycle needs exactly one chord
        assert_eq!(s.fill_ins().len(), 1);
        assert!(s.is_done());
    }

    #[test]
    fn test_heavier_domains_wait() {
        // path 0-1-2: both ends are simplicial, node 0 has the larger domain
        let g = UndirectedGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let sizes: DomainSizes = [(0, 10), (1, 2), (2, 3)].into_iter().collect();
        let mut s = DefaultEliminationStrategy::default();
        s.set_graph(&g, &sizes).unwrap();
        assert_eq!(s.next_node_to_eliminate().unwrap(), 2);
    }

    #[test]
    fn test_eliminate_unknown_node() {
        let g = UndirectedGraph::from_edges(2, &[(0, 1)]).unwrap();
        let sizes: DomainSizes = g.nodes().map(|n| (n, 2)).collect();
        let mut s = DefaultEliminationStrategy::default();
        s.set_graph(&g, &sizes).unwrap();
        s.eliminate(1).unwrap();
        assert_eq!(s.eliminate(1), Err(TriangulationError::NotFound(1)));
        assert_eq!(s.eliminate(7), Err(TriangulationError::NotFound(7)));

        s.clear();
        assert!(s.working_graph().is_empty());
    }

    #[test]
    fn test_fill_in_tracking_off() {
        let g = UndirectedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let sizes: DomainSizes = g.nodes().map(|n| (n, 2)).collect();
        let mut s = DefaultEliminationStrategy::default();
        s.ask_fill_ins(false);
        s.set_graph(&g, &sizes).unwrap();
        let steps = eliminate_all(&mut s).unwrap();
        assert!(s.fill_ins().is_empty());
        assert!(steps.iter().all(|st| st.fill_ins.is_empty()));
        // the cliques still reflect the chord
        assert_eq!(steps[0].clique.len(), 3);
    }
}
