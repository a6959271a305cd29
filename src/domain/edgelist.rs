//! Edge-list parsing: `source <sep> target <sep> weight` per line.

use tracing::debug;

use crate::domain::entities::Delimiter;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::WeightedDigraph;

const COMMENT: char = '#';
const FIELD_COUNT: usize = 3;

/// Parser for weighted edge lists.
pub struct EdgeList;

impl EdgeList {
    /// Parse edge-list content into a graph.
    ///
    /// Text after `#` is a comment, blank lines are skipped. Every other line needs
    /// exactly three fields with a numeric weight. A repeated `(source, target)`
    /// pair replaces the earlier weight.
    pub fn parse(content: &str, delimiter: &Delimiter) -> DomainResult<WeightedDigraph> {
        let mut graph = WeightedDigraph::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = match raw.find(COMMENT) {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            if line.trim().is_empty() {
                continue;
            }

            let fields = delimiter.split(line);
            let [source, target, weight] = fields.as_slice() else {
                return Err(DomainError::input_format(
                    line_no,
                    format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
                ));
            };

            if source.is_empty() || target.is_empty() {
                return Err(DomainError::input_format(line_no, "empty node identifier"));
            }

            let weight: f64 = weight.parse().map_err(|_| {
                DomainError::input_format(line_no, format!("non-numeric weight '{weight}'"))
            })?;

            if let Some(previous) = graph.add_edge(*source, *target, weight) {
                debug!(
                    "line {}: {} -> {} redefined ({} replaced by {})",
                    line_no, source, target, previous, weight
                );
            }
        }

        debug!(
            "parsed edge list: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}
