//! Call graph metrics
//!
//! Out-degree is measured per call site: a function with two call sites
//! contributes two samples, and a call site that may dispatch to several
//! callees (an imprecise dynamic call) contributes one sample equal to its
//! number of targets. A function without outgoing calls contributes a single
//! zero. In-degree is measured per function, one sample each, including zeros.
//!
//! Only functions reachable from the root are sampled. The statistics depend on
//! the multiset of samples, never on traversal order.

use super::envelope::{measure, RunMetrics};
use crate::stats::Summary;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use std::fmt;
use std::time::Duration;

/// Identity of a call instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteId(pub u32);

/// Call graph node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub name: String,
}

/// Call graph edge, labelled with the call site it originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEdge {
    pub site: CallSiteId,
}

/// Directed call graph with an optional entry point.
///
/// Parallel edges are allowed: one call site may target several callees, and
/// one caller may reach the same callee from different sites.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    graph: DiGraph<FunctionNode, CallEdge>,
    root: Option<NodeIndex>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, name: impl Into<String>) -> NodeIndex {
        self.graph.add_node(FunctionNode { name: name.into() })
    }

    pub fn set_root(&mut self, root: NodeIndex) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Add an edge `caller → callee` through call site `site`
    pub fn add_call(&mut self, caller: NodeIndex, site: CallSiteId, callee: NodeIndex) {
        self.graph.add_edge(caller, callee, CallEdge { site });
    }

    /// Number of functions in the graph, reachable or not
    pub fn function_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn function(&self, node: NodeIndex) -> Option<&FunctionNode> {
        self.graph.node_weight(node)
    }

    /// Visit every function reachable from the root exactly once.
    ///
    /// Cycles are safe. A graph without a root visits nothing.
    pub fn visit(&self, mut f: impl FnMut(NodeIndex)) {
        let Some(root) = self.root else {
            return;
        };

        let mut dfs = Dfs::new(&self.graph, root);
        while let Some(node) = dfs.next(&self.graph) {
            f(node);
        }
    }

    /// Number of outgoing edges per distinct call site of `node`.
    ///
    /// A node without outgoing edges yields a single `0`.
    pub fn out_degrees_by_site(&self, node: NodeIndex) -> Vec<usize> {
        let mut by_site: FxHashMap<CallSiteId, usize> = FxHashMap::default();
        for edge in self.graph.edges_directed(node, Direction::Outgoing) {
            *by_site.entry(edge.weight().site).or_insert(0) += 1;
        }

        if by_site.is_empty() {
            return vec![0];
        }
        by_site.into_values().collect()
    }

    /// Number of incoming edges of `node`, regardless of call site
    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    /// Per-call-site out-degree distribution over reachable functions
    pub fn out_degree_summary(&self) -> Summary {
        let mut samples = Vec::with_capacity(self.graph.node_count());
        self.visit(|n| samples.extend(self.out_degrees_by_site(n)));
        Summary::from_samples(samples)
    }

    /// Per-function in-degree distribution over reachable functions
    pub fn in_degree_summary(&self) -> Summary {
        let mut samples = Vec::with_capacity(self.graph.node_count());
        self.visit(|n| samples.push(self.in_degree(n)));
        Summary::from_samples(samples)
    }
}

/// Metrics about one call graph construction run
#[derive(Debug, Clone, Default)]
pub struct CallGraphMetrics {
    pub run: RunMetrics<CallGraph>,

    /// Number of functions in the graph
    pub functions: usize,

    /// Call site out-degree distribution
    pub out_degree: Summary,
    /// Function in-degree distribution
    pub in_degree: Summary,
}

impl CallGraphMetrics {
    /// Wrap an already built call graph
    pub fn from_graph(graph: CallGraph) -> Self {
        Self::from_run(RunMetrics::completed(Duration::ZERO, graph))
    }

    /// Derive statistics from an envelope. Failed runs keep zero statistics.
    pub fn from_run(run: RunMetrics<CallGraph>) -> Self {
        let mut metrics = Self {
            run,
            ..Self::default()
        };

        if let Some(graph) = metrics.run.payload() {
            metrics.functions = graph.function_count();
            metrics.out_degree = graph.out_degree_summary();
            metrics.in_degree = graph.in_degree_summary();
        }

        metrics
    }

    pub fn duration(&self) -> Duration {
        self.run.duration
    }

    pub fn is_ok(&self) -> bool {
        self.run.is_ok()
    }
}

/// Build a call graph with an external engine and collect metrics about it
pub fn analyze_call_graph<E: fmt::Display>(
    build: impl FnOnce() -> Result<CallGraph, E>,
) -> CallGraphMetrics {
    let metrics = CallGraphMetrics::from_run(measure(build));

    if let Some(failure) = metrics.run.failure() {
        tracing::debug!("Call graph construction failed after {:?}: {}", metrics.duration(), failure);
    }

    metrics
}
