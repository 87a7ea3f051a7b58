use super::*;
use crate::graph::VertexSet;

/// Builds a junction tree of maximal cliques.
///
/// The elimination tree is walked in post order, children before parents.  A
/// clique that is contained in the clique of one of its children is not
/// maximal and is merged into that child, which inherits its remaining tree
/// edges.  The
/// surviving cliques are then renumbered `0..k` in the elimination order of
/// the nodes that created them.
#[derive(Debug, Default)]
pub struct DefaultJunctionTreeStrategy {
    // clique ids that disappeared, and the clique that absorbed them
    absorbed_into: IndexMap<CliqueId, CliqueId>,
}

impl DefaultJunctionTreeStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    // a child of `parent` whose clique contains the parent's clique.  Merged
    // cliques keep the id of the earlier node, so children are exactly the
    // neighbours eliminated before `parent`.
    fn containing_child(
        tree: &CliqueGraph,
        rank: &IndexMap<NodeId, usize>,
        parent: CliqueId,
    ) -> Result<Option<CliqueId>, TriangulationError> {
        let clique = tree.clique(parent)?;
        let rank_of = |id: CliqueId| rank.get(&id).copied().ok_or(TriangulationError::NotFound(id));
        let parent_rank = rank_of(parent)?;

        for &child in tree.neighbours(parent)? {
            if rank_of(child)? > parent_rank {
                continue;
            }
            let candidate = tree.clique(child)?;
            if candidate.len() > clique.len() && clique.iter().all(|v| candidate.contains(v)) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    fn survivor(&self, mut id: CliqueId) -> CliqueId {
        while let Some(&next) = self.absorbed_into.get(&id) {
            id = next;
        }
        id
    }
}

impl JunctionTreeStrategy for DefaultJunctionTreeStrategy {
    fn junction_tree(
        &mut self,
        elimination_tree: &CliqueGraph,
        elimination_order: &[NodeId],
    ) -> Result<JunctionTreeBuild, TriangulationError> {
        check_input(elimination_tree, elimination_order)?;
        self.absorbed_into.clear();

        let rank: IndexMap<NodeId, usize> = elimination_order
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect();

        let mut tree = elimination_tree.clone();
        for node in elimination_tree.post_order() {
            if let Some(child) = Self::containing_child(&tree, &rank, node)? {
                tree.merge_cliques(child, node)?;
                self.absorbed_into.insert(node, child);
            }
        }

        // renumber the survivors in elimination order
        let new_id: IndexMap<CliqueId, CliqueId> = elimination_order
            .iter()
            .filter(|n| tree.exists_clique(**n))
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect();

        let mut junction = CliqueGraph::with_capacity(new_id.len());
        for (&old, &new) in new_id.iter() {
            let clique: VertexSet = tree.clique(old)?.clone();
            junction.add_clique(new, clique)?;
        }
        for edge in tree.edges() {
            junction.add_edge(new_id[&edge.first()], new_id[&edge.second()])?;
        }

        let node_to_clique = elimination_order
            .iter()
            .map(|&n| (n, new_id[&self.survivor(n)]))
            .collect();

        Ok(JunctionTreeBuild {
            tree: junction,
            node_to_clique,
        })
    }
}
