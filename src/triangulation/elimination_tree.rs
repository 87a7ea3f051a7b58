use crate::graph::{CliqueGraph, Edge, EdgeSet, NodeId, UndirectedGraph, VertexSet};
use crate::TriangulationError;
use indexmap::IndexMap;
use itertools::Itertools;

/// Builds the elimination tree from the cliques created by an elimination,
/// given in elimination order and keyed by the eliminated node.
///
/// Clique ids are node ids.  The clique created by `n` is attached to the
/// clique of the earliest eliminated node among its other members, or is a
/// root if it has no other members.
pub fn elimination_tree(
    cliques: &IndexMap<NodeId, VertexSet>,
) -> Result<CliqueGraph, TriangulationError> {
    let mut tree = CliqueGraph::with_capacity(cliques.len());
    for (&node, clique) in cliques.iter() {
        tree.add_clique(node, clique.clone())?;
    }

    for (&node, clique) in cliques.iter() {
        let mut parent: Option<(usize, NodeId)> = None;
        for &v in clique.iter().filter(|&&v| v != node) {
            let rank = cliques
                .get_index_of(&v)
                .ok_or(TriangulationError::NotFound(v))?;
            if parent.map_or(true, |(r, _)| rank < r) {
                parent = Some((rank, v));
            }
        }

        if let Some((_, parent)) = parent {
            tree.add_edge(node, parent)?;
        }
    }
    Ok(tree)
}

/// The edges that the cliques add to `original`, and the node whose
/// elimination added each of them, in elimination order.
pub(crate) fn fill_ins_from_cliques(
    original: &UndirectedGraph,
    cliques: &IndexMap<NodeId, VertexSet>,
) -> (EdgeSet, IndexMap<NodeId, Vec<Edge>>) {
    let mut fill_ins = EdgeSet::new();
    let mut added_by = IndexMap::with_capacity(cliques.len());

    for (&node, clique) in cliques.iter() {
        let mut added = Vec::new();
        for (&a, &b) in clique.iter().filter(|&&v| v != node).tuple_combinations() {
            let e = Edge::new(a, b);
            if !original.exists_edge(a, b) && fill_ins.insert(e) {
                added.push(e);
            }
        }
        added_by.insert(node, added);
    }
    (fill_ins, added_by)
}
