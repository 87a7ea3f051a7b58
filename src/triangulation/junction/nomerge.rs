use super::*;

/// Keeps the elimination tree as the junction tree: one clique per node,
/// identified by the node that created it.
#[derive(Debug, Default)]
pub struct NoMergeJunctionTreeStrategy;

impl NoMergeJunctionTreeStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl JunctionTreeStrategy for NoMergeJunctionTreeStrategy {
    fn junction_tree(
        &mut self,
        elimination_tree: &CliqueGraph,
        elimination_order: &[NodeId],
    ) -> Result<JunctionTreeBuild, TriangulationError> {
        check_input(elimination_tree, elimination_order)?;

        Ok(JunctionTreeBuild {
            tree: elimination_tree.clone(),
            node_to_clique: elimination_order.iter().map(|&n| (n, n)).collect(),
        })
    }
}

#[test]
fn test_nomerge() {
    let mut tree = CliqueGraph::new();
    tree.add_clique(4, [4, 7].into_iter().collect()).unwrap();
    tree.add_clique(7, [7].into_iter().collect()).unwrap();
    tree.add_edge(4, 7).unwrap();

    let build = NoMergeJunctionTreeStrategy::new()
        .junction_tree(&tree, &[4, 7])
        .unwrap();
    assert_eq!(build.tree, tree);
    assert_eq!(build.node_to_clique[&4], 4);

    assert!(matches!(
        NoMergeJunctionTreeStrategy::new().junction_tree(&CliqueGraph::new(), &[]),
        Err(TriangulationError::OperationNotAllowed(_))
    ));
}
