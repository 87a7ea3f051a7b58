//! Incremental bookkeeping of the weighted fill-in of every node of a graph
//! under elimination.
//!
//! For a node `x` with neighbourhood `N(x)` and domain sizes `d`:
//!
//! - `missing(x)` is the number of non-adjacent pairs in `N(x)`,
//! - `fill_in_weight(x)` is the sum of `d(a)·d(b)` over those pairs,
//! - `clique_weight(x)` is the product of `d` over `{x} ∪ N(x)`, kept as
//!   the sum of `ln d` since the product overflows on large neighbourhoods.
//!
//! Rather than recomputing these from scratch after every elimination, the
//! [`CostTracker`] observes each fill-in edge and each node removal and
//! adjusts only the nodes whose neighbourhood actually changed.  The clique
//! weights of those nodes are then summed afresh, so rounding never builds up.

use super::priority::{Category, CostQueue, EliminationCost};
use super::working_graph::{EliminationGraph, EliminationObserver, EliminationStep};
use crate::graph::{DomainSizes, EdgeSet, NodeId, UndirectedGraph, VertexSet};
use crate::TriangulationError;
use itertools::Itertools;
use ordered_float::OrderedFloat;

/// Elimination cost figures of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NodeCost {
    pub missing: usize,
    pub fill_in_weight: f64,
    pub log_clique_weight: f64,
}

impl Default for NodeCost {
    fn default() -> Self {
        Self {
            missing: 0,
            fill_in_weight: 0.0,
            log_clique_weight: 0.0,
        }
    }
}

impl NodeCost {
    /// computes the cost of `node` directly from its neighbourhood
    pub(crate) fn compute(graph: &UndirectedGraph, sizes: &[f64], node: NodeId) -> Self {
        let mut cost = NodeCost {
            log_clique_weight: sizes[node].ln(),
            ..NodeCost::default()
        };
        let Ok(neighbours) = graph.neighbours(node) else {
            return cost;
        };
        cost.log_clique_weight = log_clique_weight(sizes, node, neighbours);
        for (&a, &b) in neighbours.iter().tuple_combinations() {
            if !graph.exists_edge(a, b) {
                cost.missing += 1;
                cost.fill_in_weight += sizes[a] * sizes[b];
            }
        }
        cost
    }

    pub(crate) fn key(&self, node: NodeId, quasi_ratio: f64) -> EliminationCost {
        // fill_in_weight < quasi_ratio * clique_weight, compared as logarithms
        let quasi = quasi_ratio > 0.0
            && self.fill_in_weight.ln() < quasi_ratio.ln() + self.log_clique_weight;
        let (category, primary, secondary) = if self.missing == 0 {
            (Category::Simplicial, self.log_clique_weight, 0.0)
        } else if quasi {
            (Category::QuasiSimplicial, self.log_clique_weight, self.fill_in_weight)
        } else {
            (Category::FillIn, self.fill_in_weight, self.log_clique_weight)
        };
        EliminationCost {
            category,
            primary: OrderedFloat(primary),
            secondary: OrderedFloat(secondary),
            node,
        }
    }
}

// ln of the product of domain sizes over `node` and its neighbours
fn log_clique_weight(sizes: &[f64], node: NodeId, neighbours: &VertexSet) -> f64 {
    neighbours
        .iter()
        .fold(sizes[node].ln(), |acc, &nb| acc + sizes[nb].ln())
}

/// Keeps the [`NodeCost`] of every node current while the graph is
/// eliminated, and remembers which nodes changed.
#[derive(Debug, Clone, Default)]
pub(crate) struct CostTracker {
    sizes: Vec<f64>,
    costs: Vec<NodeCost>,
    touched: VertexSet,
}

impl CostTracker {
    fn new(graph: &UndirectedGraph, sizes: Vec<f64>) -> Self {
        let mut costs = vec![NodeCost::default(); graph.bound()];
        for node in graph.nodes() {
            costs[node] = NodeCost::compute(graph, &sizes, node);
        }
        Self {
            sizes,
            costs,
            touched: VertexSet::new(),
        }
    }
}

impl CostTracker {
    /// sums the clique weight of every touched node over its current
    /// neighbourhood
    fn refresh_clique_weights(&mut self, graph: &UndirectedGraph) {
        for &x in self.touched.iter() {
            if let Ok(nx) = graph.neighbours(x) {
                self.costs[x].log_clique_weight = log_clique_weight(&self.sizes, x, nx);
            }
        }
    }
}

impl EliminationObserver for CostTracker {
    fn edge_added(&mut self, graph: &UndirectedGraph, a: NodeId, b: NodeId) {
        let (Ok(na), Ok(nb)) = (graph.neighbours(a), graph.neighbours(b)) else {
            return;
        };
        let (da, db) = (self.sizes[a], self.sizes[b]);

        // a and b stop being a missing pair of their common neighbours
        for &w in na.iter().filter(|w| nb.contains(*w)) {
            let cost = &mut self.costs[w];
            cost.missing -= 1;
            cost.fill_in_weight -= da * db;
            self.touched.insert(w);
        }

        // b is new to a's neighbourhood, and vice versa
        for &y in na.iter().filter(|&&y| !nb.contains(&y)) {
            let cost = &mut self.costs[a];
            cost.missing += 1;
            cost.fill_in_weight += db * self.sizes[y];
        }
        for &y in nb.iter().filter(|&&y| !na.contains(&y)) {
            let cost = &mut self.costs[b];
            cost.missing += 1;
            cost.fill_in_weight += da * self.sizes[y];
        }
        self.touched.insert(a);
        self.touched.insert(b);
    }

    fn node_removed(&mut self, graph: &UndirectedGraph, node: NodeId) {
        let Ok(nn) = graph.neighbours(node) else {
            return;
        };
        let dn = self.sizes[node];

        for &x in nn {
            let Ok(nx) = graph.neighbours(x) else {
                continue;
            };
            // pairs (node, y) that were missing at x disappear
            for &y in nx.iter().filter(|&&y| y != node && !nn.contains(&y)) {
                let cost = &mut self.costs[x];
                cost.missing -= 1;
                cost.fill_in_weight -= dn * self.sizes[y];
            }
            self.touched.insert(x);
        }
        self.touched.swap_remove(&node);
        self.costs[node] = NodeCost::default();
    }
}

/// A graph under elimination together with the weighted fill-in cost of
/// every node and a queue of the nodes currently allowed to be eliminated.
#[derive(Debug, Default)]
pub(crate) struct SimplicialSet {
    elim: EliminationGraph,
    tracker: CostTracker,
    queue: CostQueue,
    quasi_ratio: f64,
}

impl SimplicialSet {
    /// Fails with `GraphError` if a node of `graph` has no domain size, or a
    /// domain size of zero.
    pub(crate) fn new(
        graph: &UndirectedGraph,
        domain_sizes: &DomainSizes,
        quasi_ratio: f64,
        track_fill_ins: bool,
    ) -> Result<Self, TriangulationError> {
        let mut sizes = vec![1.0; graph.bound()];
        for node in graph.nodes() {
            match domain_sizes.get(&node) {
                Some(&d) if d >= 1 => sizes[node] = d as f64,
                Some(_) => {
                    return Err(TriangulationError::GraphError(format!(
                        "node {node} has an empty domain"
                    )))
                }
                None => {
                    return Err(TriangulationError::GraphError(format!(
                        "node {node} has no domain size"
                    )))
                }
            }
        }

        Ok(Self {
            elim: EliminationGraph::new(graph, track_fill_ins),
            tracker: CostTracker::new(graph, sizes),
            queue: CostQueue::with_capacity(graph.size()),
            quasi_ratio,
        })
    }

    /// makes the given nodes eligible for elimination
    pub(crate) fn add_candidates<I>(&mut self, nodes: I) -> Result<(), TriangulationError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for node in nodes {
            if !self.elim.graph().exists_node(node) {
                return Err(TriangulationError::NotFound(node));
            }
            self.queue
                .set(self.tracker.costs[node].key(node, self.quasi_ratio));
        }
        Ok(())
    }

    pub(crate) fn is_candidate(&self, node: NodeId) -> bool {
        self.queue.contains(node)
    }

    /// the cheapest candidate
    pub(crate) fn best(&self) -> Option<NodeId> {
        self.queue.top()
    }

    pub(crate) fn eliminate(&mut self, node: NodeId) -> Result<EliminationStep, TriangulationError> {
        self.tracker.touched.clear();
        let step = self.elim.eliminate_with(node, &mut self.tracker)?;
        self.tracker.refresh_clique_weights(self.elim.graph());
        self.queue.remove(node);

        for &x in self.tracker.touched.iter() {
            if self.queue.contains(x) {
                self.queue
                    .set(self.tracker.costs[x].key(x, self.quasi_ratio));
            }
        }
        Ok(step)
    }

    pub(crate) fn graph(&self) -> &UndirectedGraph {
        self.elim.graph()
    }

    pub(crate) fn fill_ins(&self) -> &EdgeSet {
        self.elim.fill_ins()
    }

    pub(crate) fn set_track_fill_ins(&mut self, track: bool) {
        self.elim.set_track_fill_ins(track);
    }
}

#[cfg(test)]
impl SimplicialSet {
    fn candidates_len(&self) -> usize {
        self.queue.len()
    }

    fn cost(&self, node: NodeId) -> Option<&NodeCost> {
        if self.elim.graph().exists_node(node) {
            self.tracker.costs.get(node)
        } else {
            None
        }
    }

    fn sizes(&self) -> &[f64] {
        &self.tracker.sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_sizes(g: &UndirectedGraph, d: usize) -> DomainSizes {
        g.nodes().map(|n| (n, d)).collect()
    }

    fn assert_costs_consistent(s: &SimplicialSet) {
        for node in s.graph().nodes() {
            let expected = NodeCost::compute(s.graph(), s.sizes(), node);
            let actual = *s.cost(node).unwrap();
            assert_eq!(actual.missing, expected.missing, "missing of node {node}");
            assert!((actual.fill_in_weight - expected.fill_in_weight).abs() < 1e-9);
            assert_eq!(actual.log_clique_weight, expected.log_clique_weight);
        }
    }

    #[test]
    fn test_initial_costs() {
        // 4-cycle 0-1-2-3-0 plus pendant 4 on node 0
        let g = UndirectedGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 4)]).unwrap();
        let mut sizes = uniform_sizes(&g, 2);
        sizes.insert(4, 3);
        let s = SimplicialSet::new(&g, &sizes, 0.1, true).unwrap();

        let c0 = s.cost(0).unwrap();
        // pairs (1,3) (1,4) (3,4) are all missing
        assert_eq!(c0.missing, 3);
        assert_eq!(c0.fill_in_weight, 4.0 + 6.0 + 6.0);
        assert!((c0.log_clique_weight - 24f64.ln()).abs() < 1e-12);

        let c4 = s.cost(4).unwrap();
        assert_eq!(c4.missing, 0);
        assert!((c4.log_clique_weight - 6f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_missing_domain_size() {
        let g = UndirectedGraph::from_edges(2, &[(0, 1)]).unwrap();
        let sizes: DomainSizes = [(0, 2)].into_iter().collect();
        assert!(matches!(
            SimplicialSet::new(&g, &sizes, 0.1, true),
            Err(TriangulationError::GraphError(_))
        ));
        let sizes: DomainSizes = [(0, 2), (1, 0)].into_iter().collect();
        assert!(SimplicialSet::new(&g, &sizes, 0.1, true).is_err());
    }

    #[test]
    fn test_incremental_matches_recompute() {
        // a 3x3 grid with mixed domain sizes
        let edges = [
            (0, 1), (1, 2), (3, 4), (4, 5), (6, 7), (7, 8),
            (0, 3), (3, 6), (1, 4), (4, 7), (2, 5), (5, 8),
        ];
        let g = UndirectedGraph::from_edges(9, &edges).unwrap();
        let sizes: DomainSizes = (0..9).map(|n| (n, 2 + n % 3)).collect();
        let mut s = SimplicialSet::new(&g, &sizes, 0.1, true).unwrap();
        s.add_candidates(g.nodes()).unwrap();

        while let Some(node) = s.best() {
            s.eliminate(node).unwrap();
            assert_costs_consistent(&s);
        }
        assert!(s.graph().is_empty());
        assert_eq!(s.candidates_len(), 0);
    }

    #[test]
    fn test_large_neighbourhood_weights() {
        // the centre's clique weight is 1000^121, far beyond f64
        let leaves: Vec<(NodeId, NodeId)> = (1..=120).map(|leaf| (0, leaf)).collect();
        let g = UndirectedGraph::from_edges(121, &leaves).unwrap();
        let mut s = SimplicialSet::new(&g, &uniform_sizes(&g, 1000), 0.1, true).unwrap();
        assert!(s.cost(0).unwrap().log_clique_weight.is_finite());

        s.add_candidates(1..=120).unwrap();
        for leaf in 1..=119 {
            s.eliminate(leaf).unwrap();
        }
        assert_costs_consistent(&s);

        let centre = s.cost(0).unwrap();
        assert_eq!(centre.missing, 0);
        assert!((centre.log_clique_weight - 1e6f64.ln()).abs() < 1e-9);
        assert_eq!(centre.key(0, 0.1).category, Category::Simplicial);
    }

    #[test]
    fn test_star_leaves_first() {
        let g = UndirectedGraph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let mut s = SimplicialSet::new(&g, &uniform_sizes(&g, 2), 0.1, true).unwrap();
        s.add_candidates(g.nodes()).unwrap();

        let mut order = Vec::new();
        while let Some(node) = s.best() {
            s.eliminate(node).unwrap();
            order.push(node);
        }
        // once three leaves are gone the centre is tied with the last leaf
        // and wins on id, so node 0 is never first
        assert_ne!(order[0], 0);
        assert!(s.fill_ins().is_empty());
    }

    #[test]
    fn test_quasi_simplicial_category() {
        let cost = NodeCost {
            missing: 1,
            fill_in_weight: 4.0,
            log_clique_weight: 1000f64.ln(),
        };
        assert_eq!(cost.key(0, 0.1).category, Category::QuasiSimplicial);
        assert_eq!(cost.key(0, 0.0).category, Category::FillIn);

        let simplicial = NodeCost::default();
        assert_eq!(simplicial.key(0, 0.1).category, Category::Simplicial);
    }

    #[test]
    fn test_candidates_restrict_choice() {
        let g = UndirectedGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let mut s = SimplicialSet::new(&g, &uniform_sizes(&g, 2), 0.1, true).unwrap();
        s.add_candidates([1]).unwrap();
        assert_eq!(s.best(), Some(1));
        assert!(!s.is_candidate(0));

        let step = s.eliminate(1).unwrap();
        assert_eq!(step.fill_ins.len(), 1);
        assert_eq!(s.best(), None);
        assert!(s.add_candidates([7]).is_err());
    }
}
