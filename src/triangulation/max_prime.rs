//! Maximal prime subgraph decomposition.
//!
//! Adjacent clusters of a junction tree are merged whenever their separator
//! is not complete in the original, untriangulated graph.  Merging is
//! repeated on the coarsened tree until every separator is a clique of the
//! original graph.

use super::junction::JunctionTreeBuild;
use crate::graph::disjoint_set_union::DisjointSetUnion;
use crate::graph::{CliqueGraph, CliqueId, UndirectedGraph, VertexSet};
use crate::TriangulationError;
use indexmap::IndexMap;
use tracing::trace;

/// Coarsens `junction` into its maximal prime subgraph tree.  Clusters are
/// numbered `0..k` in the order of the lowest junction tree clique they
/// contain.
pub fn max_prime_subgraph_tree(
    junction: &JunctionTreeBuild,
    original: &UndirectedGraph,
) -> Result<JunctionTreeBuild, TriangulationError> {
    let mut tree = junction.tree.clone();
    let mut node_to_clique = junction.node_to_clique.clone();

    loop {
        let mut dsu = DisjointSetUnion::new(tree.clique_ids());
        let mut merged = false;
        for (edge, separator) in tree.separators() {
            if !original.is_clique(separator) {
                trace!(a = edge.first(), b = edge.second(), "separator is not complete");
                dsu.union(edge.first(), edge.second());
                merged = true;
            }
        }
        if !merged {
            break;
        }
        let new_id = coarsen(&mut tree, &mut dsu)?;
        for cluster in node_to_clique.values_mut() {
            *cluster = new_id[&*cluster];
        }
    }

    Ok(JunctionTreeBuild {
        tree,
        node_to_clique,
    })
}

// replaces every set of the union-find by a single cluster, returning the
// new id of each old clique
fn coarsen(
    tree: &mut CliqueGraph,
    dsu: &mut DisjointSetUnion,
) -> Result<IndexMap<CliqueId, CliqueId>, TriangulationError> {
    let sets = dsu.sets();
    let mut coarse = CliqueGraph::with_capacity(sets.len());
    let mut new_id = IndexMap::with_capacity(tree.size());

    for (id, members) in sets.values().enumerate() {
        let mut cluster = VertexSet::new();
        for &member in members {
            cluster.extend(tree.clique(member)?.iter().copied());
            new_id.insert(member, id);
        }
        coarse.add_clique(id, cluster)?;
    }

    for edge in tree.edges() {
        let (a, b) = (new_id[&edge.first()], new_id[&edge.second()]);
        if a != b && !coarse.exists_edge(a, b) {
            coarse.add_edge(a, b)?;
        }
    }

    *tree = coarse;
    Ok(new_id)
}
