//! Cutoff filter over edge weights.

use tracing::{debug, instrument};

use crate::domain::graph::WeightedDigraph;

/// Keeps the edges whose weight reaches a threshold.
pub struct GraphFilter;

impl GraphFilter {
    /// Build the subgraph of edges with `weight >= cutoff`.
    ///
    /// The result holds only endpoints of surviving edges, so nodes whose edges
    /// all fall below the cutoff disappear. `NaN` weights never survive.
    #[instrument(level = "debug", skip(graph))]
    pub fn filter(graph: &WeightedDigraph, cutoff: f64) -> WeightedDigraph {
        let filtered: WeightedDigraph = graph
            .edges()
            .filter(|e| e.weight >= cutoff)
            .map(|e| (e.source, e.target, e.weight))
            .collect();
        debug!(
            "kept {}/{} edges, {}/{} nodes",
            filtered.edge_count(),
            graph.edge_count(),
            filtered.node_count(),
            graph.node_count()
        );
        filtered
    }
}
