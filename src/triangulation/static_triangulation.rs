use super::elimination::*;
use super::elimination_tree::{elimination_tree, fill_ins_from_cliques};
use super::junction::{JunctionTreeBuild, JunctionTreeMethod, JunctionTreeStrategy};
use super::max_prime::max_prime_subgraph_tree;
use super::settings::TriangulationSettings;
use super::thinning;
use crate::graph::*;
use crate::{SettingsError, TriangulationError};
use indexmap::IndexMap;
use itertools::Itertools;
use std::time::Instant;
use tracing::{debug, trace};

/// Lifecycle of a [`StaticTriangulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangulationState {
    /// no graph has been supplied
    Uninitialized,
    /// a graph is set, nothing has been computed for it yet
    GraphSet,
    /// the elimination has run and its results are cached
    Triangulated,
}

/// Triangulation of a fixed graph, with junction tree and maximal prime
/// subgraph tree construction.
///
/// The graph and its domain sizes are borrowed for the lifetime of the
/// triangulation.  Nothing is computed until a result is requested; every
/// result is then cached until one of the setters is called.
///
/// ```
/// use cliquetree::graph::{DomainSizes, UndirectedGraph};
/// use cliquetree::triangulation::StaticTriangulation;
///
/// let g = UndirectedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
/// let sizes: DomainSizes = (0..4).map(|n| (n, 2)).collect();
///
/// let mut triangulation = StaticTriangulation::new();
/// triangulation.set_graph(&g, &sizes);
/// assert_eq!(triangulation.fill_ins().unwrap().len(), 1);
/// assert_eq!(triangulation.junction_tree().unwrap().size(), 2);
/// ```
#[derive(Debug)]
pub struct StaticTriangulation<'g> {
    settings: TriangulationSettings,
    graph: Option<&'g UndirectedGraph>,
    domain_sizes: Option<&'g DomainSizes>,
    elimination_order_constraint: Vec<NodeId>,
    partial_order_constraint: Vec<VertexSet>,
    state: TriangulationState,
    cache: TriangulationCache,
}

// everything derived from the graph, computed on demand
#[derive(Debug, Default)]
struct TriangulationCache {
    elimination_order: Vec<NodeId>,
    ranks: IndexMap<NodeId, usize>,
    cliques: IndexMap<NodeId, VertexSet>,
    fill_ins: Option<(EdgeSet, IndexMap<NodeId, Vec<Edge>>)>,
    triangulated_graph: Option<UndirectedGraph>,
    elimination_tree: Option<CliqueGraph>,
    junction_tree: Option<JunctionTreeBuild>,
    max_prime: Option<JunctionTreeBuild>,
}

impl Default for StaticTriangulation<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> StaticTriangulation<'g> {
    pub fn new() -> Self {
        Self {
            settings: TriangulationSettings::default(),
            graph: None,
            domain_sizes: None,
            elimination_order_constraint: Vec::new(),
            partial_order_constraint: Vec::new(),
            state: TriangulationState::Uninitialized,
            cache: TriangulationCache::default(),
        }
    }

    pub fn with_settings(settings: TriangulationSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::new()
        })
    }

    // ---------------------------------------------------------
    // setters.  All of them discard the cached results.
    // ---------------------------------------------------------

    pub fn set_graph(&mut self, graph: &'g UndirectedGraph, domain_sizes: &'g DomainSizes) {
        self.graph = Some(graph);
        self.domain_sizes = Some(domain_sizes);
        self.invalidate();
    }

    /// the order used by the `"ordered"` elimination method
    pub fn set_elimination_order(&mut self, order: Vec<NodeId>) {
        self.elimination_order_constraint = order;
        self.invalidate();
    }

    /// the subsets used by the `"partial_order"` elimination method
    pub fn set_partial_order(&mut self, subsets: Vec<VertexSet>) {
        self.partial_order_constraint = subsets;
        self.invalidate();
    }

    pub fn set_settings(&mut self, settings: TriangulationSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        self.invalidate();
        Ok(())
    }

    pub fn set_minimality_required(&mut self, minimality: bool) {
        self.settings.minimality = minimality;
        self.invalidate();
    }

    pub fn set_fill_in_tracking(&mut self, track: bool) {
        self.settings.fill_in_tracking = track;
        self.invalidate();
    }

    /// forgets the graph and every cached result
    pub fn clear(&mut self) {
        self.graph = None;
        self.domain_sizes = None;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.cache = TriangulationCache::default();
        self.state = match self.graph {
            Some(_) => TriangulationState::GraphSet,
            None => TriangulationState::Uninitialized,
        };
    }

    // ---------------------------------------------------------
    // accessors
    // ---------------------------------------------------------

    pub fn state(&self) -> TriangulationState {
        self.state
    }

    pub fn settings(&self) -> &TriangulationSettings {
        &self.settings
    }

    pub fn graph(&self) -> Option<&'g UndirectedGraph> {
        self.graph
    }

    pub fn domain_sizes(&self) -> Option<&'g DomainSizes> {
        self.domain_sizes
    }

    fn inputs(&self) -> Result<(&'g UndirectedGraph, &'g DomainSizes), TriangulationError> {
        match (self.graph, self.domain_sizes) {
            (Some(graph), Some(domain_sizes)) => Ok((graph, domain_sizes)),
            _ => Err(TriangulationError::GraphError(
                "no graph has been set".to_string(),
            )),
        }
    }

    // ---------------------------------------------------------
    // triangulation
    // ---------------------------------------------------------

    fn elimination_strategy(
        &self,
        graph: &UndirectedGraph,
    ) -> Result<EliminationStrategy, TriangulationError> {
        let settings = &self.settings;
        let strategy: EliminationStrategy = match settings.elimination_method.as_str() {
            "weighted_fill" => DefaultEliminationStrategy::new(settings.quasi_ratio).into(),
            "ordered" => {
                OrderedEliminationStrategy::new(self.elimination_order_constraint.clone()).into()
            }
            "amd" => {
                let order = amd_elimination_order(graph, settings.amd_dense_scale)?;
                OrderedEliminationStrategy::new(order).into()
            }
            "partial_order" => PartialOrderedEliminationStrategy::new(
                self.partial_order_constraint.clone(),
                settings.quasi_ratio,
            )
            .into(),
            _ => {
                return Err(TriangulationError::OperationNotAllowed(
                    "unrecognized elimination method",
                ))
            }
        };
        Ok(strategy)
    }

    /// Runs the elimination if it has not run yet.  Every query below calls
    /// this first.  Fails with `GraphError` if no graph has been set.
    pub fn triangulate(&mut self) -> Result<(), TriangulationError> {
        if self.state == TriangulationState::Triangulated {
            return Ok(());
        }
        let (graph, domain_sizes) = self.inputs()?;
        let start = Instant::now();
        let track = self.settings.fill_in_tracking;

        let mut strategy = self.elimination_strategy(graph)?;
        strategy.ask_fill_ins(track);
        strategy.set_graph(graph, domain_sizes)?;

        let mut cache = TriangulationCache {
            elimination_order: Vec::with_capacity(graph.size()),
            cliques: IndexMap::with_capacity(graph.size()),
            ..TriangulationCache::default()
        };
        let mut added_by = IndexMap::with_capacity(if track { graph.size() } else { 0 });

        while !strategy.is_done() {
            let node = strategy.next_node_to_eliminate()?;
            let step = strategy.eliminate(node)?;
            trace!(
                node,
                clique = step.clique.len(),
                fill_ins = step.fill_ins.len(),
                "eliminated"
            );
            if track {
                added_by.insert(node, step.fill_ins);
            }
            cache.elimination_order.push(node);
            cache.cliques.insert(node, step.clique);
        }
        if track {
            cache.fill_ins = Some((strategy.fill_ins().clone(), added_by));
        }

        if self.settings.minimality {
            make_minimal(graph, &mut cache)?;
        }

        cache.ranks = cache
            .elimination_order
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect();

        debug!(
            nodes = graph.size(),
            edges = graph.size_edges(),
            fill_ins = cache.fill_ins.as_ref().map(|(f, _)| f.len()),
            method = self.settings.elimination_method.as_str(),
            elapsed = ?start.elapsed(),
            "triangulation complete"
        );

        self.cache = cache;
        self.state = TriangulationState::Triangulated;
        Ok(())
    }

    // ---------------------------------------------------------
    // queries
    // ---------------------------------------------------------

    /// all nodes in the order they were eliminated
    pub fn elimination_order(&mut self) -> Result<&[NodeId], TriangulationError> {
        self.triangulate()?;
        Ok(&self.cache.elimination_order)
    }

    /// the position of each node in the elimination order
    pub fn reverse_elimination_order(
        &mut self,
    ) -> Result<&IndexMap<NodeId, usize>, TriangulationError> {
        self.triangulate()?;
        Ok(&self.cache.ranks)
    }

    /// the clique created by eliminating `node`: the node followed by its
    /// neighbours at elimination time
    pub fn elimination_clique(&mut self, node: NodeId) -> Result<&VertexSet, TriangulationError> {
        self.triangulate()?;
        self.cache
            .cliques
            .get(&node)
            .ok_or(TriangulationError::NotFound(node))
    }

    /// every clique created by the elimination, keyed by the eliminated node
    pub fn elimination_cliques(
        &mut self,
    ) -> Result<&IndexMap<NodeId, VertexSet>, TriangulationError> {
        self.triangulate()?;
        Ok(&self.cache.cliques)
    }

    fn fill_in_record(
        &mut self,
    ) -> Result<&(EdgeSet, IndexMap<NodeId, Vec<Edge>>), TriangulationError> {
        self.triangulate()?;
        let (graph, _) = self.inputs()?;
        let cliques = &self.cache.cliques;
        Ok(self
            .cache
            .fill_ins
            .get_or_insert_with(|| fill_ins_from_cliques(graph, cliques)))
    }

    /// the edges added to the graph by the triangulation
    pub fn fill_ins(&mut self) -> Result<&EdgeSet, TriangulationError> {
        Ok(&self.fill_in_record()?.0)
    }

    /// the fill-in edges added when `node` was eliminated
    pub fn fill_ins_added_by(&mut self, node: NodeId) -> Result<&[Edge], TriangulationError> {
        self.fill_in_record()?
            .1
            .get(&node)
            .map(|edges| edges.as_slice())
            .ok_or(TriangulationError::NotFound(node))
    }

    /// the original graph plus every fill-in edge
    pub fn triangulated_graph(&mut self) -> Result<&UndirectedGraph, TriangulationError> {
        self.triangulate()?;
        let (graph, _) = self.inputs()?;
        let triangulated = match self.cache.triangulated_graph.take() {
            Some(triangulated) => triangulated,
            None => triangulated_from_cliques(graph, &self.cache.cliques)?,
        };
        Ok(self.cache.triangulated_graph.insert(triangulated))
    }

    /// the elimination tree: one clique per node, with clique id = node id
    pub fn elimination_tree(&mut self) -> Result<&CliqueGraph, TriangulationError> {
        self.triangulate()?;
        self.cache.elimination_tree()
    }

    fn junction_tree_build(&mut self) -> Result<&JunctionTreeBuild, TriangulationError> {
        self.triangulate()?;
        let cache = &mut self.cache;
        let build = match cache.junction_tree.take() {
            Some(build) => build,
            None => {
                let start = Instant::now();
                let etree = match cache.elimination_tree.take() {
                    Some(etree) => etree,
                    None => elimination_tree(&cache.cliques)?,
                };
                let build = assemble_junction_tree(
                    &etree,
                    &cache.elimination_order,
                    &self.settings.junction_tree_method,
                );
                cache.elimination_tree = Some(etree);
                let build = build?;
                debug!(
                    cliques = build.tree.size(),
                    max_clique = build.tree.max_clique_size(),
                    elapsed = ?start.elapsed(),
                    "junction tree built"
                );
                build
            }
        };
        Ok(cache.junction_tree.insert(build))
    }

    pub fn junction_tree(&mut self) -> Result<&CliqueGraph, TriangulationError> {
        Ok(&self.junction_tree_build()?.tree)
    }

    /// the id of the junction tree clique that contains the clique created
    /// by eliminating `node`
    pub fn created_junction_tree_clique(&mut self, node: NodeId) -> Result<CliqueId, TriangulationError> {
        self.junction_tree_build()?
            .node_to_clique
            .get(&node)
            .copied()
            .ok_or(TriangulationError::NotFound(node))
    }

    /// [`created_junction_tree_clique`](Self::created_junction_tree_clique)
    /// for every node
    pub fn created_junction_tree_cliques(
        &mut self,
    ) -> Result<&IndexMap<NodeId, CliqueId>, TriangulationError> {
        Ok(&self.junction_tree_build()?.node_to_clique)
    }

    fn max_prime_build(&mut self) -> Result<&JunctionTreeBuild, TriangulationError> {
        self.triangulate()?;
        let (graph, _) = self.inputs()?;
        let prime = match self.cache.max_prime.take() {
            Some(prime) => prime,
            None => {
                let start = Instant::now();
                let prime = max_prime_subgraph_tree(self.junction_tree_build()?, graph)?;
                debug!(
                    clusters = prime.tree.size(),
                    elapsed = ?start.elapsed(),
                    "max prime subgraph tree built"
                );
                prime
            }
        };
        Ok(self.cache.max_prime.insert(prime))
    }

    /// the junction tree coarsened so that every separator is a clique of
    /// the original graph
    pub fn max_prime_subgraph_tree(&mut self) -> Result<&CliqueGraph, TriangulationError> {
        Ok(&self.max_prime_build()?.tree)
    }

    /// the id of the max prime subgraph cluster that contains the clique
    /// created by eliminating `node`
    pub fn created_max_prime_subgraph(&mut self, node: NodeId) -> Result<CliqueId, TriangulationError> {
        self.max_prime_build()?
            .node_to_clique
            .get(&node)
            .copied()
            .ok_or(TriangulationError::NotFound(node))
    }

    /// `log10` of the largest clique domain size, i.e. of the product of
    /// the domain sizes of the clique members.  Zero for an empty graph.
    pub fn max_log10_clique_domain_size(&mut self) -> Result<f64, TriangulationError> {
        self.triangulate()?;
        let (_, domain_sizes) = self.inputs()?;

        let mut max = 0.0_f64;
        for clique in self.cache.cliques.values() {
            let mut size = 0.0;
            for v in clique {
                match domain_sizes.get(v) {
                    Some(&d) if d >= 1 => size += (d as f64).log10(),
                    _ => {
                        return Err(TriangulationError::GraphError(format!(
                            "node {v} has no valid domain size"
                        )))
                    }
                }
            }
            max = max.max(size);
        }
        Ok(max)
    }
}

impl TriangulationCache {
    fn elimination_tree(&mut self) -> Result<&CliqueGraph, TriangulationError> {
        let tree = match self.elimination_tree.take() {
            Some(tree) => tree,
            None => elimination_tree(&self.cliques)?,
        };
        Ok(self.elimination_tree.insert(tree))
    }
}

// an empty elimination yields an empty tree rather than an error
fn assemble_junction_tree(
    etree: &CliqueGraph,
    elimination_order: &[NodeId],
    method: &str,
) -> Result<JunctionTreeBuild, TriangulationError> {
    if elimination_order.is_empty() {
        return Ok(JunctionTreeBuild::default());
    }
    let mut strategy = JunctionTreeMethod::from_name(method).ok_or(
        TriangulationError::OperationNotAllowed("unrecognized junction tree method"),
    )?;
    strategy.junction_tree(etree, elimination_order)
}

fn triangulated_from_cliques(
    graph: &UndirectedGraph,
    cliques: &IndexMap<NodeId, VertexSet>,
) -> Result<UndirectedGraph, TriangulationError> {
    let mut triangulated = graph.clone();
    for clique in cliques.values() {
        for (&a, &b) in clique.iter().tuple_combinations() {
            triangulated.add_edge(a, b)?;
        }
    }
    Ok(triangulated)
}

// Thins the fill-ins, then re-derives the elimination order by maximum
// cardinality search on the thinned graph and recomputes the cliques.
fn make_minimal(
    graph: &UndirectedGraph,
    cache: &mut TriangulationCache,
) -> Result<(), TriangulationError> {
    let mut triangulated = triangulated_from_cliques(graph, &cache.cliques)?;
    let (mut fill_ins, _) = fill_ins_from_cliques(graph, &cache.cliques);

    let removed = thinning::thin(&mut triangulated, &mut fill_ins)?;
    debug!(
        removed = removed.len(),
        remaining = fill_ins.len(),
        "recursive thinning"
    );

    if !removed.is_empty() {
        let order = mcs_elimination_order(&triangulated);
        let mut strategy = OrderedEliminationStrategy::new(order.clone());
        strategy.ask_fill_ins(false);
        strategy.set_graph(&triangulated, &DomainSizes::new())?;

        cache.cliques = eliminate_all(&mut strategy)?
            .into_iter()
            .map(|step| (step.node, step.clique))
            .collect();
        cache.elimination_order = order;
        // attribution is relative to the original graph, so recompute it
        cache.fill_ins = None;
    }
    cache.triangulated_graph = Some(triangulated);
    Ok(())
}
