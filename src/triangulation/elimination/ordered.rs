use super::working_graph::EliminationGraph;
use super::{EliminationSequenceStrategy, EliminationStep};
use crate::graph::{DomainSizes, EdgeSet, NodeId, UndirectedGraph, VertexSet};
use crate::TriangulationError;

/// Eliminates nodes in a fixed, user supplied order.
#[derive(Debug, Default)]
pub struct OrderedEliminationStrategy {
    order: Vec<NodeId>,
    position: usize,
    track_fill_ins: bool,
    elim: EliminationGraph,
}

impl OrderedEliminationStrategy {
    pub fn new(order: Vec<NodeId>) -> Self {
        Self {
            order,
            position: 0,
            track_fill_ins: true,
            elim: EliminationGraph::default(),
        }
    }

    /// Replaces the elimination order.  Takes effect at the next call to
    /// [`set_graph`](EliminationSequenceStrategy::set_graph).
    pub fn set_order(&mut self, order: Vec<NodeId>) {
        self.order = order;
        self.clear();
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }
}

impl EliminationSequenceStrategy for OrderedEliminationStrategy {
    /// Fails with `GraphError` unless the order lists every node of `graph`
    /// exactly once.  Domain sizes are not used.
    fn set_graph(
        &mut self,
        graph: &UndirectedGraph,
        _domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        check_is_permutation(graph, &self.order)?;
        self.elim = EliminationGraph::new(graph, self.track_fill_ins);
        self.position = 0;
        Ok(())
    }

    fn clear(&mut self) {
        self.elim = EliminationGraph::default();
        self.position = 0;
    }

    fn next_node_to_eliminate(&self) -> Result<NodeId, TriangulationError> {
        if self.elim.graph().is_empty() {
            return Err(TriangulationError::OperationNotAllowed(
                "elimination order is exhausted",
            ));
        }
        Ok(self.order[self.position])
    }

    fn eliminate(&mut self, node: NodeId) -> Result<EliminationStep, TriangulationError> {
        if !self.elim.graph().exists_node(node) {
            return Err(TriangulationError::NotFound(node));
        }
        if self.order.get(self.position) != Some(&node) {
            return Err(TriangulationError::OperationNotAllowed(
                "node is not next in the elimination order",
            ));
        }
        let step = self.elim.eliminate_with(node, &mut ())?;
        self.position += 1;
        Ok(step)
    }

    fn ask_fill_ins(&mut self, track: bool) {
        self.track_fill_ins = track;
        self.elim.set_track_fill_ins(track);
    }

    fn fill_ins(&self) -> &EdgeSet {
        self.elim.fill_ins()
    }

    fn working_graph(&self) -> &UndirectedGraph {
        self.elim.graph()
    }
}

pub(crate) fn check_is_permutation(
    graph: &UndirectedGraph,
    order: &[NodeId],
) -> Result<(), TriangulationError> {
    if order.len() != graph.size() {
        return Err(TriangulationError::GraphError(format!(
            "elimination order has {} nodes but the graph has {}",
            order.len(),
            graph.size()
        )));
    }
    let mut seen = VertexSet::with_capacity(order.len());
    for &node in order {
        if !graph.exists_node(node) {
            return Err(TriangulationError::GraphError(format!(
                "elimination order names unknown node {node}"
            )));
        }
        if !seen.insert(node) {
            return Err(TriangulationError::GraphError(format!(
                "elimination order lists node {node} twice"
            )));
        }
    }
    Ok(())
}

/// Computes an approximate minimum degree ordering of `graph`.
///
/// The adjacency pattern is packed into compressed sparse column form over
/// the compacted node ids and handed to the AMD routine, whose dense row
/// threshold is scaled by `dense_scale`.
pub fn amd_elimination_order(
    graph: &UndirectedGraph,
    dense_scale: f64,
) -> Result<Vec<NodeId>, TriangulationError> {
    let nodes: Vec<NodeId> = graph.nodes().collect();
    let n = nodes.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // compact ids: nodes[k] <-> k
    let mut compact = vec![usize::MAX; graph.bound()];
    for (k, &node) in nodes.iter().enumerate() {
        compact[node] = k;
    }

    let mut colptr = Vec::with_capacity(n + 1);
    let mut rowval = Vec::with_capacity(2 * graph.size_edges() + n);
    colptr.push(0);
    for &node in nodes.iter() {
        let mut rows: Vec<usize> = graph.neighbours(node)?.iter().map(|&nb| compact[nb]).collect();
        // amd expects a structurally nonzero diagonal
        rows.push(compact[node]);
        rows.sort_unstable();
        rowval.extend(rows);
        colptr.push(rowval.len());
    }

    let mut control = amd::Control::default();
    control.dense *= dense_scale;

    let (perm, _iperm, _info) = amd::order(n, &colptr, &rowval, &control).map_err(|status| {
        TriangulationError::GraphError(format!("AMD ordering failed: {status:?}"))
    })?;

    Ok(perm.into_iter().map(|k| nodes[k]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::elimination::eliminate_all;

    fn cycle4() -> UndirectedGraph {
        UndirectedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    #[test]
    fn test_follows_order() {
        let g = cycle4();
        let mut s = OrderedEliminationStrategy::new(vec![2, 0, 1, 3]);
        s.set_graph(&g, &DomainSizes::new()).unwrap();

        let steps = eliminate_all(&mut s).unwrap();
        let order: Vec<NodeId> = steps.iter().map(|st| st.node).collect();
        assert_eq!(order, vec![2, 0, 1, 3]);
        assert_eq!(s.fill_ins().len(), 1);
        assert!(s.fill_ins().contains(&crate::graph::Edge::new(1, 3)));
    }

    #[test]
    fn test_out_of_order() {
        let g = cycle4();
        let mut s = OrderedEliminationStrategy::new(vec![0, 1, 2, 3]);
        s.set_graph(&g, &DomainSizes::new()).unwrap();

        assert!(matches!(
            s.eliminate(2),
            Err(TriangulationError::OperationNotAllowed(_))
        ));
        s.eliminate(0).unwrap();
        assert_eq!(s.eliminate(0), Err(TriangulationError::NotFound(0)));
    }

    #[test]
    fn test_exhausted() {
        let g = UndirectedGraph::from_edges(2, &[(0, 1)]).unwrap();
        let mut s = OrderedEliminationStrategy::new(vec![1, 0]);
        s.set_graph(&g, &DomainSizes::new()).unwrap();
        eliminate_all(&mut s).unwrap();
        assert!(matches!(
            s.next_node_to_eliminate(),
            Err(TriangulationError::OperationNotAllowed(_))
        ));
    }

    #[test]
    fn test_bad_orders() {
        let g = cycle4();
        let mut s = OrderedEliminationStrategy::new(vec![0, 1, 2]);
        assert!(matches!(
            s.set_graph(&g, &DomainSizes::new()),
            Err(TriangulationError::GraphError(_))
        ));
        s.set_order(vec![0, 1, 2, 2]);
        assert!(s.set_graph(&g, &DomainSizes::new()).is_err());
        s.set_order(vec![0, 1, 2, 9]);
        assert!(s.set_graph(&g, &DomainSizes::new()).is_err());
    }

    #[test]
    fn test_amd_order_is_permutation() {
        // a 3x3 grid, with node 4 in the centre
        let edges = [
            (0, 1), (1, 2), (3, 4), (4, 5), (6, 7), (7, 8),
            (0, 3), (3, 6), (1, 4), (4, 7), (2, 5), (5, 8),
        ];
        let g = UndirectedGraph::from_edges(9, &edges).unwrap();
        let order = amd_elimination_order(&g, 1.0).unwrap();
        assert!(check_is_permutation(&g, &order).is_ok());

        // sparse node ids survive the compaction
        let mut g = UndirectedGraph::new();
        for id in [3, 10, 42] {
            g.add_node_with_id(id).unwrap();
        }
        g.add_edge(3, 42).unwrap();
        let mut order = amd_elimination_order(&g, 1.0).unwrap();
        order.sort_unstable();
        assert_eq!(order, vec![3, 10, 42]);

        assert!(amd_elimination_order(&UndirectedGraph::new(), 1.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_amd_order_with_isolated_nodes() {
        // fewer edges than nodes
        let g = UndirectedGraph::from_edges(5, &[(0, 1), (1, 2)]).unwrap();
        let order = amd_elimination_order(&g, 1.0).unwrap();
        assert!(check_is_permutation(&g, &order).is_ok());

        let g = UndirectedGraph::from_edges(1, &[]).unwrap();
        assert_eq!(amd_elimination_order(&g, 1.0).unwrap(), vec![0]);

        let mut s = OrderedEliminationStrategy::new(order);
        let g = UndirectedGraph::from_edges(5, &[(0, 1), (1, 2)]).unwrap();
        s.set_graph(&g, &DomainSizes::new()).unwrap();
        assert_eq!(eliminate_all(&mut s).unwrap().len(), 5);
    }
}
