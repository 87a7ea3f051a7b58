use crate::graph::NodeId;
use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Coarse classes of elimination candidates, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Category {
    /// neighbourhood is already complete, elimination adds no fill-in
    Simplicial,
    /// fill-in is small compared to the clique the node creates
    QuasiSimplicial,
    /// everything else, ranked by weighted fill-in
    FillIn,
}

/// Sort key of a node in the [`CostQueue`].  Keys compare lexicographically,
/// and the node id makes every key unique, so the queue order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EliminationCost {
    pub category: Category,
    pub primary: OrderedFloat<f64>,
    pub secondary: OrderedFloat<f64>,
    pub node: NodeId,
}

/// Indexed min-priority queue over candidate nodes with update-key support.
#[derive(Debug, Default)]
pub(crate) struct CostQueue {
    queue: PriorityQueue<NodeId, Reverse<EliminationCost>>,
}

impl CostQueue {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            queue: PriorityQueue::with_capacity(n),
        }
    }

    /// inserts `node`, or moves it if it is already queued
    pub(crate) fn set(&mut self, cost: EliminationCost) {
        self.queue.push(cost.node, Reverse(cost));
    }

    pub(crate) fn remove(&mut self, node: NodeId) -> Option<EliminationCost> {
        self.queue.remove(&node).map(|(_, Reverse(cost))| cost)
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.queue.get_priority(&node).is_some()
    }

    /// the cheapest node, without removing it
    pub(crate) fn top(&self) -> Option<NodeId> {
        self.queue.peek().map(|(&node, _)| node)
    }
}

#[cfg(test)]
impl CostQueue {
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    fn cost(&self, node: NodeId) -> Option<&EliminationCost> {
        self.queue.get_priority(&node).map(|Reverse(cost)| cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(category: Category, primary: f64, secondary: f64, node: NodeId) -> EliminationCost {
        EliminationCost {
            category,
            primary: OrderedFloat(primary),
            secondary: OrderedFloat(secondary),
            node,
        }
    }

    #[test]
    fn test_category_dominates() {
        let mut q = CostQueue::default();
        q.set(cost(Category::FillIn, 1.0, 1.0, 0));
        q.set(cost(Category::QuasiSimplicial, 100.0, 5.0, 1));
        q.set(cost(Category::Simplicial, 1000.0, 0.0, 2));
        assert_eq!(q.top(), Some(2));
        q.remove(2);
        assert_eq!(q.top(), Some(1));
        q.remove(1);
        assert_eq!(q.top(), Some(0));
    }

    #[test]
    fn test_ties_broken_by_secondary_then_id() {
        let mut q = CostQueue::default();
        q.set(cost(Category::FillIn, 4.0, 8.0, 3));
        q.set(cost(Category::FillIn, 4.0, 2.0, 5));
        q.set(cost(Category::FillIn, 4.0, 2.0, 4));
        assert_eq!(q.top(), Some(4));
    }

    #[test]
    fn test_update_key() {
        let mut q = CostQueue::with_capacity(3);
        q.set(cost(Category::FillIn, 4.0, 0.0, 0));
        q.set(cost(Category::FillIn, 8.0, 0.0, 1));
        assert_eq!(q.top(), Some(0));

        // decrease key of node 1 below node 0
        q.set(cost(Category::FillIn, 2.0, 0.0, 1));
        assert_eq!(q.top(), Some(1));
        assert_eq!(q.len(), 2);

        // increase it again
        q.set(cost(Category::FillIn, 16.0, 0.0, 1));
        assert_eq!(q.top(), Some(0));
        assert_eq!(q.cost(1).map(|c| c.primary), Some(OrderedFloat(16.0)));

        assert!(q.remove(0).is_some());
        assert!(q.remove(0).is_none());
        assert!(!q.contains(0));
        assert_eq!(q.len(), 1);
    }
}
