use super::{NodeId, VertexSet};
use crate::TriangulationError;
use indexmap::IndexSet;
use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// -------------------------------------
// Edges
// -------------------------------------

/// An undirected edge.  The endpoints are always stored with
/// `first < second`, so that `Edge::new(a,b) == Edge::new(b,a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    first: NodeId,
    second: NodeId,
}

impl Edge {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> NodeId {
        self.first
    }

    pub fn second(&self) -> NodeId {
        self.second
    }

    /// the endpoint opposite to `node`, if `node` is an endpoint
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.first {
            Some(self.second)
        } else if node == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Insertion ordered set of edges
pub type EdgeSet = IndexSet<Edge>;

// -------------------------------------
// Undirected graph
// -------------------------------------

/// A mutable undirected graph without self loops.
///
/// Nodes live in an arena indexed by their id.  Each present node
/// owns the set of its neighbours, so that node and edge queries and
/// mutations are O(1) (amortized).  Removed ids leave a hole in the
/// arena and may be reused by [`add_node_with_id`](UndirectedGraph::add_node_with_id).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UndirectedGraph {
    adjacency: Vec<Option<VertexSet>>,
    nnodes: usize,
    nedges: usize,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// preallocate space for node ids `0..n`
    pub fn with_capacity(n: usize) -> Self {
        Self {
            adjacency: Vec::with_capacity(n),
            nnodes: 0,
            nedges: 0,
        }
    }

    /// Graph with nodes `0..n` and the given edges
    pub fn from_edges(n: usize, edges: &[(NodeId, NodeId)]) -> Result<Self, TriangulationError> {
        let mut g = Self::with_capacity(n);
        for id in 0..n {
            g.add_node_with_id(id)?;
        }
        for &(a, b) in edges {
            g.add_edge(a, b)?;
        }
        Ok(g)
    }

    /// adds a node with the smallest id larger than every id in use
    pub fn add_node(&mut self) -> NodeId {
        let id = self.adjacency.len();
        self.adjacency.push(Some(VertexSet::new()));
        self.nnodes += 1;
        id
    }

    pub fn add_node_with_id(&mut self, id: NodeId) -> Result<(), TriangulationError> {
        if self.exists_node(id) {
            return Err(TriangulationError::GraphError(format!(
                "node {id} already exists"
            )));
        }
        if id >= self.adjacency.len() {
            self.adjacency.resize(id + 1, None);
        }
        self.adjacency[id] = Some(VertexSet::new());
        self.nnodes += 1;
        Ok(())
    }

    /// removes a node together with all its incident edges
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), TriangulationError> {
        let neighbours = self
            .adjacency
            .get_mut(id)
            .and_then(Option::take)
            .ok_or(TriangulationError::NotFound(id))?;

        for &nb in neighbours.iter() {
            if let Some(Some(set)) = self.adjacency.get_mut(nb) {
                set.swap_remove(&id);
            }
        }
        self.nedges -= neighbours.len();
        self.nnodes -= 1;
        Ok(())
    }

    /// adds the edge a-b.  Adding an existing edge is a no-op.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), TriangulationError> {
        if a == b {
            return Err(TriangulationError::GraphError(format!(
                "self loop on node {a}"
            )));
        }
        self.check_node(a)?;
        self.check_node(b)?;

        if self.adj_mut(a).insert(b) {
            self.adj_mut(b).insert(a);
            self.nedges += 1;
        }
        Ok(())
    }

    /// removes the edge a-b.  Removing a missing edge is a no-op.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), TriangulationError> {
        self.check_node(a)?;
        self.check_node(b)?;

        if self.adj_mut(a).swap_remove(&b) {
            self.adj_mut(b).swap_remove(&a);
            self.nedges -= 1;
        }
        Ok(())
    }

    pub fn exists_node(&self, id: NodeId) -> bool {
        matches!(self.adjacency.get(id), Some(Some(_)))
    }

    pub fn exists_edge(&self, a: NodeId, b: NodeId) -> bool {
        match self.adjacency.get(a) {
            Some(Some(set)) => set.contains(&b),
            _ => false,
        }
    }

    pub fn neighbours(&self, id: NodeId) -> Result<&VertexSet, TriangulationError> {
        match self.adjacency.get(id) {
            Some(Some(set)) => Ok(set),
            _ => Err(TriangulationError::NotFound(id)),
        }
    }

    pub fn degree(&self, id: NodeId) -> Result<usize, TriangulationError> {
        Ok(self.neighbours(id)?.len())
    }

    /// node ids in increasing order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .filter_map(|(id, adj)| adj.as_ref().map(|_| id))
    }

    /// every edge exactly once, ordered by its smaller endpoint
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .filter_map(|(id, adj)| adj.as_ref().map(|set| (id, set)))
            .flat_map(|(id, set)| {
                set.iter()
                    .filter(move |&&nb| nb > id)
                    .map(move |&nb| Edge::new(id, nb))
            })
    }

    /// number of nodes
    pub fn size(&self) -> usize {
        self.nnodes
    }

    /// number of edges
    pub fn size_edges(&self) -> usize {
        self.nedges
    }

    pub fn is_empty(&self) -> bool {
        self.nnodes == 0
    }

    /// upper bound (exclusive) on the node ids in use
    pub fn bound(&self) -> usize {
        self.adjacency.len()
    }

    /// true if every pair of distinct nodes in `set` is adjacent
    pub fn is_clique<'a, I>(&self, set: I) -> bool
    where
        I: IntoIterator<Item = &'a NodeId>,
        I::IntoIter: Clone,
    {
        set.into_iter()
            .tuple_combinations()
            .all(|(&a, &b)| a == b || self.exists_edge(a, b))
    }

    fn check_node(&self, id: NodeId) -> Result<(), TriangulationError> {
        if self.exists_node(id) {
            Ok(())
        } else {
            Err(TriangulationError::NotFound(id))
        }
    }

    // only called after check_node
    fn adj_mut(&mut self, id: NodeId) -> &mut VertexSet {
        match self.adjacency[id] {
            Some(ref mut set) => set,
            None => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path3() -> UndirectedGraph {
        UndirectedGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap()
    }

    #[test]
    fn test_edge_normalisation() {
        assert_eq!(Edge::new(4, 1), Edge::new(1, 4));
        let e = Edge::new(7, 2);
        assert_eq!((e.first(), e.second()), (2, 7));
        assert_eq!(e.other(2), Some(7));
        assert_eq!(e.other(3), None);
    }

    #[test]
    fn test_add_remove() {
        let mut g = path3();
        assert_eq!(g.size(), 3);
        assert_eq!(g.size_edges(), 2);
        assert!(g.exists_edge(1, 0));
        assert!(!g.exists_edge(0, 2));

        // duplicate edge is a no-op
        g.add_edge(1, 0).unwrap();
        assert_eq!(g.size_edges(), 2);

        g.remove_node(1).unwrap();
        assert_eq!(g.size(), 2);
        assert_eq!(g.size_edges(), 0);
        assert!(g.neighbours(0).unwrap().is_empty());
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![0, 2]);

        // the hole can be refilled
        g.add_node_with_id(1).unwrap();
        assert!(g.add_node_with_id(1).is_err());
        assert_eq!(g.add_node(), 3);
    }

    #[test]
    fn test_errors() {
        let mut g = path3();
        assert_eq!(g.add_edge(0, 0), Err(TriangulationError::GraphError("self loop on node 0".to_string())));
        assert_eq!(g.add_edge(0, 9), Err(TriangulationError::NotFound(9)));
        assert_eq!(g.remove_node(9), Err(TriangulationError::NotFound(9)));
        assert!(g.neighbours(5).is_err());
    }

    #[test]
    fn test_edges_and_cliques() {
        let g = UndirectedGraph::from_edges(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]).unwrap();
        let edges: Vec<Edge> = g.edges().collect();
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&Edge::new(3, 2)));

        assert!(g.is_clique(&[0, 1, 2]));
        assert!(!g.is_clique(&[0, 1, 2, 3]));
        assert!(g.is_clique(&[3]));
        assert!(g.is_clique(&[]));
    }
}
