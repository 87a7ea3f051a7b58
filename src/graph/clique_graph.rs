use super::{CliqueId, Edge, NodeId, VertexSet};
use crate::TriangulationError;
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// this value used to mark root cliques, i.e. ones with no parent
pub const NO_PARENT: CliqueId = CliqueId::MAX;

/// A graph whose nodes are cliques (sets of node ids) and whose edges
/// carry separators, i.e. the intersection of the two cliques they join.
///
/// Junction trees, elimination trees and maximal prime subgraph trees are
/// all represented as a `CliqueGraph`.  Separators are computed once when an
/// edge is created and cached until one of its endpoints changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CliqueGraph {
    cliques: IndexMap<CliqueId, VertexSet>,
    neighbours: IndexMap<CliqueId, IndexSet<CliqueId>>,
    separators: IndexMap<Edge, VertexSet>,
}

impl CliqueGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            cliques: IndexMap::with_capacity(n),
            neighbours: IndexMap::with_capacity(n),
            separators: IndexMap::with_capacity(n.saturating_sub(1)),
        }
    }

    pub fn add_clique(&mut self, id: CliqueId, clique: VertexSet) -> Result<(), TriangulationError> {
        if self.cliques.contains_key(&id) {
            return Err(TriangulationError::GraphError(format!(
                "clique {id} already exists"
            )));
        }
        self.cliques.insert(id, clique);
        self.neighbours.insert(id, IndexSet::new());
        Ok(())
    }

    /// removes a clique and all edges incident to it
    pub fn remove_clique(&mut self, id: CliqueId) -> Result<VertexSet, TriangulationError> {
        let nbs = self
            .neighbours
            .shift_remove(&id)
            .ok_or(TriangulationError::NotFound(id))?;
        for nb in nbs {
            self.neighbours[&nb].shift_remove(&id);
            self.separators.shift_remove(&Edge::new(id, nb));
        }
        self.cliques
            .shift_remove(&id)
            .ok_or(TriangulationError::NotFound(id))
    }

    /// joins two cliques and caches their separator
    pub fn add_edge(&mut self, a: CliqueId, b: CliqueId) -> Result<(), TriangulationError> {
        if a == b {
            return Err(TriangulationError::GraphError(format!(
                "self loop on clique {a}"
            )));
        }
        let separator = intersect(self.clique(a)?, self.clique(b)?);
        self.neighbours[&a].insert(b);
        self.neighbours[&b].insert(a);
        self.separators.insert(Edge::new(a, b), separator);
        Ok(())
    }

    pub fn remove_edge(&mut self, a: CliqueId, b: CliqueId) -> Result<(), TriangulationError> {
        self.check_edge(a, b)?;
        self.neighbours[&a].shift_remove(&b);
        self.neighbours[&b].shift_remove(&a);
        self.separators.shift_remove(&Edge::new(a, b));
        Ok(())
    }

    pub fn exists_clique(&self, id: CliqueId) -> bool {
        self.cliques.contains_key(&id)
    }

    pub fn exists_edge(&self, a: CliqueId, b: CliqueId) -> bool {
        self.separators.contains_key(&Edge::new(a, b))
    }

    pub fn clique(&self, id: CliqueId) -> Result<&VertexSet, TriangulationError> {
        self.cliques.get(&id).ok_or(TriangulationError::NotFound(id))
    }

    pub fn separator(&self, a: CliqueId, b: CliqueId) -> Result<&VertexSet, TriangulationError> {
        self.check_edge(a, b)?;
        Ok(&self.separators[&Edge::new(a, b)])
    }

    pub fn neighbours(&self, id: CliqueId) -> Result<&IndexSet<CliqueId>, TriangulationError> {
        self.neighbours
            .get(&id)
            .ok_or(TriangulationError::NotFound(id))
    }

    /// clique ids in insertion order
    pub fn clique_ids(&self) -> impl Iterator<Item = CliqueId> + '_ {
        self.cliques.keys().copied()
    }

    pub fn cliques(&self) -> impl Iterator<Item = (CliqueId, &VertexSet)> + '_ {
        self.cliques.iter().map(|(&id, c)| (id, c))
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.separators.keys().copied()
    }

    pub fn separators(&self) -> impl Iterator<Item = (Edge, &VertexSet)> + '_ {
        self.separators.iter().map(|(&e, s)| (e, s))
    }

    /// number of cliques
    pub fn size(&self) -> usize {
        self.cliques.len()
    }

    /// number of edges
    pub fn size_edges(&self) -> usize {
        self.separators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cliques.is_empty()
    }

    pub fn max_clique_size(&self) -> usize {
        self.cliques.values().map(|c| c.len()).max().unwrap_or(0)
    }

    /// Merges clique `absorb` into clique `keep` across their common edge.
    ///
    /// The vertices of `absorb` are added to `keep`, the remaining neighbours
    /// of `absorb` are attached to `keep`, and every separator around `keep`
    /// is recomputed.
    pub fn merge_cliques(&mut self, keep: CliqueId, absorb: CliqueId) -> Result<(), TriangulationError> {
        self.check_edge(keep, absorb)?;

        let others: Vec<CliqueId> = self.neighbours[&absorb]
            .iter()
            .copied()
            .filter(|&c| c != keep)
            .collect();

        let absorbed = self.remove_clique(absorb)?;
        self.cliques[&keep].extend(absorbed);

        for other in others {
            self.neighbours[&keep].insert(other);
            self.neighbours[&other].insert(keep);
        }
        self.refresh_separators(keep);
        Ok(())
    }

    /// true if the clique graph is a forest
    pub fn is_forest(&self) -> bool {
        self.size_edges() + self.components().len() == self.size()
    }

    /// The running intersection property: the graph is a forest and, for
    /// every node, the cliques containing it induce a connected subtree.
    pub fn has_running_intersection(&self) -> bool {
        if !self.is_forest() {
            return false;
        }

        // cliques containing each node
        let mut containing: IndexMap<NodeId, Vec<CliqueId>> = IndexMap::new();
        for (&id, clique) in self.cliques.iter() {
            for &v in clique {
                containing.entry(v).or_default().push(id);
            }
        }

        for (v, ids) in containing.iter() {
            let start = ids[0];
            let mut seen: IndexSet<CliqueId> = IndexSet::from([start]);
            let mut queue = VecDeque::from([start]);
            while let Some(c) = queue.pop_front() {
                for &nb in self.neighbours[&c].iter() {
                    if self.cliques[&nb].contains(v) && seen.insert(nb) {
                        queue.push_back(nb);
                    }
                }
            }
            if seen.len() != ids.len() {
                return false;
            }
        }
        true
    }

    /// connected components, each listing its cliques in discovery order
    pub fn components(&self) -> Vec<Vec<CliqueId>> {
        let mut seen: IndexSet<CliqueId> = IndexSet::with_capacity(self.size());
        let mut components = Vec::new();

        // start from the most recently inserted clique so that trees built
        // in elimination order are rooted at their last clique
        for &start in self.cliques.keys().rev() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut stack = vec![start];
            while let Some(c) = stack.pop() {
                for &nb in self.neighbours[&c].iter() {
                    if seen.insert(nb) {
                        component.push(nb);
                        stack.push(nb);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// one root per connected component
    pub fn roots(&self) -> Vec<CliqueId> {
        self.components().into_iter().map(|c| c[0]).collect()
    }

    /// The parent of each clique when every component of the forest is
    /// hung from its root.  Roots map to [`NO_PARENT`].
    pub fn parents(&self) -> IndexMap<CliqueId, CliqueId> {
        let mut parent = IndexMap::with_capacity(self.size());
        for root in self.roots() {
            parent.insert(root, NO_PARENT);
            let mut stack = vec![root];
            while let Some(c) = stack.pop() {
                for &nb in self.neighbours[&c].iter() {
                    if !parent.contains_key(&nb) {
                        parent.insert(nb, c);
                        stack.push(nb);
                    }
                }
            }
        }
        parent
    }

    /// A post ordering of the forest: every clique appears after all of its
    /// children.  Children are visited in increasing id order.
    pub fn post_order(&self) -> Vec<CliqueId> {
        let parent = self.parents();
        let mut children: IndexMap<CliqueId, Vec<CliqueId>> =
            self.cliques.keys().map(|&c| (c, Vec::new())).collect();
        for (&c, &p) in parent.iter() {
            if p != NO_PARENT {
                children[&p].push(c);
            }
        }

        let mut post = Vec::with_capacity(self.size());
        for root in self.roots() {
            // the stack yields a pre-order with children reversed,
            // which is a post order once reversed in turn
            let mut stack = vec![root];
            let mut pre = Vec::new();
            while let Some(v) = stack.pop() {
                pre.push(v);
                let kids = &mut children[&v];
                kids.sort_unstable();
                stack.extend(kids.iter());
            }
            post.extend(pre.into_iter().rev());
        }
        post
    }

    /// recomputes the separators of every edge incident to `id`
    fn refresh_separators(&mut self, id: CliqueId) {
        let nbs: Vec<CliqueId> = self.neighbours[&id].iter().copied().collect();
        for nb in nbs {
            let separator = intersect(&self.cliques[&id], &self.cliques[&nb]);
            self.separators.insert(Edge::new(id, nb), separator);
        }
    }

    fn check_edge(&self, a: CliqueId, b: CliqueId) -> Result<(), TriangulationError> {
        self.clique(a)?;
        self.clique(b)?;
        if self.exists_edge(a, b) {
            Ok(())
        } else {
            Err(TriangulationError::GraphError(format!(
                "no edge between cliques {a} and {b}"
            )))
        }
    }
}

pub(crate) fn intersect(a: &VertexSet, b: &VertexSet) -> VertexSet {
    // iterate over the smaller set
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().copied().filter(|v| large.contains(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(v: &[NodeId]) -> VertexSet {
        v.iter().copied().collect()
    }

    // 0:{1,2,3} - 1:{2,3,4} - 2:{4,5}
    fn chain() -> CliqueGraph {
        let mut g = CliqueGraph::new();
        g.add_clique(0, set(&[1, 2, 3])).unwrap();
        g.add_clique(1, set(&[2, 3, 4])).unwrap();
        g.add_clique(2, set(&[4, 5])).unwrap();
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g
    }

    #[test]
    fn test_separators() {
        let g = chain();
        assert_eq!(g.separator(1, 0).unwrap(), &set(&[2, 3]));
        assert_eq!(g.separator(1, 2).unwrap(), &set(&[4]));
        assert!(g.separator(0, 2).is_err());
        assert_eq!(g.max_clique_size(), 3);
    }

    #[test]
    fn test_running_intersection() {
        let mut g = chain();
        assert!(g.is_forest());
        assert!(g.has_running_intersection());

        // 4 appears at both ends of a path that skips it
        let mut bad = CliqueGraph::new();
        bad.add_clique(0, set(&[1, 4])).unwrap();
        bad.add_clique(1, set(&[1, 2])).unwrap();
        bad.add_clique(2, set(&[2, 4])).unwrap();
        bad.add_edge(0, 1).unwrap();
        bad.add_edge(1, 2).unwrap();
        assert!(!bad.has_running_intersection());

        // cycles are rejected
        g.add_edge(0, 2).unwrap();
        assert!(!g.is_forest());
        assert!(!g.has_running_intersection());
    }

    #[test]
    fn test_merge_cliques() {
        let mut g = chain();
        g.merge_cliques(1, 0).unwrap();
        assert_eq!(g.size(), 2);
        assert_eq!(g.clique(1).unwrap(), &set(&[2, 3, 4, 1]));
        assert!(g.clique(0).is_err());
        assert_eq!(g.separator(1, 2).unwrap(), &set(&[4]));

        // merging the middle of a chain rewires the far end
        let mut g = chain();
        g.merge_cliques(0, 1).unwrap();
        assert!(g.exists_edge(0, 2));
        assert_eq!(g.separator(0, 2).unwrap(), &set(&[4]));
        assert!(g.has_running_intersection());
    }

    #[test]
    fn test_post_order() {
        let mut g = chain();
        g.add_clique(3, set(&[3, 7])).unwrap();
        g.add_edge(0, 3).unwrap();
        g.add_clique(9, set(&[8])).unwrap();

        let post = g.post_order();
        assert_eq!(post.len(), 5);
        let pos = |c: CliqueId| post.iter().position(|&x| x == c).unwrap();

        let parent = g.parents();
        for (&c, &p) in parent.iter() {
            if p != NO_PARENT {
                assert!(pos(c) < pos(p));
            }
        }
        // two components, two roots
        assert_eq!(g.roots().len(), 2);
        assert_eq!(g.components().len(), 2);
    }
}
