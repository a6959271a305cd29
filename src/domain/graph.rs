//! Weighted directed graph keyed by node identifier.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Borrowed view of one weighted edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub weight: f64,
}

/// Directed simple graph with `f64` edge weights.
///
/// At most one edge exists per ordered `(source, target)` pair; inserting the
/// same pair again replaces its weight. Self-loops and cycles are allowed.
/// Nodes and edges enumerate in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WeightedDigraph {
    graph: DiGraph<String, f64>,
    node_map: HashMap<String, NodeIndex>,
}

impl WeightedDigraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, id: String) -> NodeIndex {
        match self.node_map.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.graph.add_node(id.clone());
                self.node_map.insert(id, idx);
                idx
            }
        }
    }

    /// Add an edge, creating both endpoints. Returns the replaced weight, if any.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
    ) -> Option<f64> {
        let src = self.ensure_node(source.into());
        let tgt = self.ensure_node(target.into());
        let previous = self.graph.find_edge(src, tgt).map(|e| self.graph[e]);
        self.graph.update_edge(src, tgt, weight);
        previous
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn weight(&self, source: &str, target: &str) -> Option<f64> {
        let src = *self.node_map.get(source)?;
        let tgt = *self.node_map.get(target)?;
        self.graph.find_edge(src, tgt).map(|e| self.graph[e])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// All edges, resolved to node identifiers.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.graph.edge_references().map(|e| Edge {
            source: self.graph[e.source()].as_str(),
            target: self.graph[e.target()].as_str(),
            weight: *e.weight(),
        })
    }
}

impl<S, T> FromIterator<(S, T, f64)> for WeightedDigraph
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T, f64)>>(iter: I) -> Self {
        let mut graph = Self::new();
        for (source, target, weight) in iter {
            graph.add_edge(source, target, weight);
        }
        graph
    }
}
