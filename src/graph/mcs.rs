// Maximum cardinality search (Tarjan & Yannakakis, 1984).
//
// Nodes are visited one at a time, always choosing the unvisited node with
// the most visited neighbours.  The reverse of the visit order is a perfect
// elimination ordering iff the graph is chordal.

use super::{NodeId, UndirectedGraph};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Visit order of a maximum cardinality search.  Ties are broken in favour
/// of the smallest node id, so the result is deterministic.
pub fn max_cardinality_search(graph: &UndirectedGraph) -> Vec<NodeId> {
    let mut queue: PriorityQueue<NodeId, (usize, Reverse<NodeId>)> =
        PriorityQueue::with_capacity(graph.size());
    for v in graph.nodes() {
        queue.push(v, (0, Reverse(v)));
    }

    let mut visited = Vec::with_capacity(graph.size());
    while let Some((v, _)) = queue.pop() {
        visited.push(v);
        if let Ok(neighbours) = graph.neighbours(v) {
            for &nb in neighbours {
                queue.change_priority_by(&nb, |(w, _)| *w += 1);
            }
        }
    }
    visited
}

/// An elimination order derived from maximum cardinality search, i.e. the
/// reversed visit order.  For a chordal graph it produces no fill-in.
pub fn mcs_elimination_order(graph: &UndirectedGraph) -> Vec<NodeId> {
    let mut order = max_cardinality_search(graph);
    order.reverse();
    order
}

/// Checks that eliminating the nodes of `graph` in `order` adds no fill-in
/// edge.  `order` must be a permutation of the nodes of `graph`.
pub fn is_perfect_elimination_order(graph: &UndirectedGraph, order: &[NodeId]) -> bool {
    if order.len() != graph.size() {
        return false;
    }
    let rank: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    if rank.len() != order.len() || !order.iter().all(|&v| graph.exists_node(v)) {
        return false;
    }

    for &v in order {
        let Ok(neighbours) = graph.neighbours(v) else {
            return false;
        };

        // neighbours of v eliminated after v
        let later: Vec<NodeId> = neighbours
            .iter()
            .copied()
            .filter(|nb| rank[nb] > rank[&v])
            .collect();

        // the earliest of them must be adjacent to all the others
        let Some(&first) = later.iter().min_by_key(|&nb| rank[nb]) else {
            continue;
        };
        if !later
            .iter()
            .all(|&u| u == first || graph.exists_edge(first, u))
        {
            return false;
        }
    }
    true
}

/// true if every cycle of length 4 or more in `graph` has a chord
pub fn is_chordal(graph: &UndirectedGraph) -> bool {
    is_perfect_elimination_order(graph, &mcs_elimination_order(graph))
}
