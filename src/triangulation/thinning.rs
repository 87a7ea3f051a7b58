//! Recursive thinning of a triangulation.
//!
//! A fill-in edge `u-v` of a chordal graph lies in a single maximal clique
//! exactly when the common neighbours of `u` and `v` are pairwise adjacent.
//! Such an edge can be removed without breaking chordality, and removing it
//! can make other fill-ins removable in turn, so the scan is repeated until
//! nothing changes.  The result is a minimal triangulation.

use crate::graph::{intersect, Edge, EdgeSet, UndirectedGraph};
use crate::TriangulationError;
use tracing::trace;

/// Removes redundant fill-ins from `triangulated`, which must be chordal and
/// contain every edge of `fill_ins`.  Returns the removed edges.
pub(crate) fn thin(
    triangulated: &mut UndirectedGraph,
    fill_ins: &mut EdgeSet,
) -> Result<Vec<Edge>, TriangulationError> {
    let mut removed = Vec::new();

    loop {
        let mut changed = false;
        let mut kept = EdgeSet::with_capacity(fill_ins.len());

        for &edge in fill_ins.iter() {
            let (u, v) = (edge.first(), edge.second());
            let common = intersect(triangulated.neighbours(u)?, triangulated.neighbours(v)?);
            if triangulated.is_clique(&common) {
                triangulated.remove_edge(u, v)?;
                removed.push(edge);
                changed = true;
                trace!(u, v, "removed redundant fill-in");
            } else {
                kept.insert(edge);
            }
        }

        *fill_ins = kept;
        if !changed {
            break;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::is_chordal;

    #[test]
    fn test_cycle_with_chords() {
        // 6-cycle with chords 0-2, 0-4, triangulated by eliminating node 0 first
        let mut g = UndirectedGraph::from_edges(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 2), (0, 4)],
        )
        .unwrap();
        let mut fill_ins: EdgeSet = [(1, 5), (1, 4), (2, 5), (2, 4)]
            .into_iter()
            .map(|(a, b)| Edge::new(a, b))
            .collect();
        for e in fill_ins.iter() {
            g.add_edge(e.first(), e.second()).unwrap();
        }
        assert!(is_chordal(&g));

        let removed = thin(&mut g, &mut fill_ins).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(fill_ins.len(), 1);
        assert!(fill_ins.contains(&Edge::new(2, 4)));
        assert!(is_chordal(&g));
    }

    #[test]
    fn test_needed_fill_in_kept() {
        // a 4-cycle needs its single chord
        let mut g = UndirectedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]).unwrap();
        let mut fill_ins: EdgeSet = [Edge::new(1, 3)].into_iter().collect();
        assert!(thin(&mut g, &mut fill_ins).unwrap().is_empty());
        assert_eq!(fill_ins.len(), 1);
    }
}
