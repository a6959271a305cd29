//! Text renderings of a `ValueTree`: indented tree, edge list, Graphviz DOT.

use std::fmt;

use generational_arena::Index;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::arena::{TreeNode, ValueTree};

/// Cosmetics of a hierarchical DOT layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotStyle {
    /// Space between layers (`ranksep`)
    pub layer_space: f64,
    /// Color of every tree edge
    pub edge_color: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            layer_space: 3.0,
            edge_color: "crimson".into(),
        }
    }
}

pub trait TreeRender {
    /// Indented tree for terminal display.
    fn to_tree_string(&self) -> Tree<String>;

    /// One `source target weight layer` row per tree edge.
    fn to_edge_list(&self, separator: &str) -> String;

    /// Graphviz document for a top-down layered layout.
    fn to_dot(&self, style: &DotStyle) -> String;
}

fn label(node: &TreeNode) -> String {
    match node.link {
        Some(link) => format!(
            "{} (dist {}, weight {}, layer {})",
            node.data.id, node.data.dist, link.weight, link.layer
        ),
        None => format!("{} (dist {})", node.data.id, node.data.dist),
    }
}

/// Quote a DOT identifier.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

impl TreeRender for ValueTree {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &ValueTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let root_label = self
            .get_node(self.root())
            .map(label)
            .unwrap_or_else(|| "Empty tree".to_string());
        let mut out = Tree::new(root_label);
        build_tree(self, self.root(), &mut out);
        out
    }

    fn to_edge_list(&self, separator: &str) -> String {
        self.edges()
            .iter()
            .map(|e| {
                [
                    e.source.clone(),
                    e.target.clone(),
                    e.weight.to_string(),
                    e.layer.to_string(),
                ]
                .iter()
                .join(separator)
            })
            .map(|row| row + "\n")
            .collect()
    }

    fn to_dot(&self, style: &DotStyle) -> String {
        let mut dot = String::new();
        match write_dot(self, style, &mut dot) {
            Ok(()) => dot,
            // fmt::Write for String does not fail
            Err(fmt::Error) => String::new(),
        }
    }
}

fn write_dot(tree: &ValueTree, style: &DotStyle, out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "digraph {{")?;
    writeln!(out, "  ranksep=\"{}\";", style.layer_space)?;
    writeln!(out, "  node [shape=oval, fixedsize=true];")?;
    writeln!(
        out,
        "  edge [color={}, arrowhead=open, style=bold];",
        quote(&style.edge_color)
    )?;
    if tree.is_root_only() {
        writeln!(out, "  {};", quote(tree.root_id()))?;
    }
    for e in tree.edges() {
        writeln!(
            out,
            "  {} -> {} [value={}, layer={}];",
            quote(&e.source),
            quote(&e.target),
            e.weight,
            e.layer
        )?;
    }
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::Link;
    use crate::domain::entities::Direction;

    /// Accepts a fixed number of writes, then fails.
    struct FailingWriter {
        budget: usize,
    }

    impl fmt::Write for FailingWriter {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            if self.budget == 0 {
                return Err(fmt::Error);
            }
            self.budget -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_dot_propagates_writer_error() {
        let tree = ValueTree::new("solo", Direction::Up);
        let mut out = FailingWriter { budget: 2 };
        assert_eq!(write_dot(&tree, &DotStyle::default(), &mut out), Err(fmt::Error));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_root_only_dot_declares_root() {
        let tree = ValueTree::new("solo", Direction::Up);
        let dot = tree.to_dot(&DotStyle::default());
        assert!(dot.contains("  \"solo\";"));
        assert!(dot.contains("ranksep=\"3\""));
        assert!(dot.contains("color=\"crimson\""));
    }

    #[test]
    fn test_tree_string_labels_links() {
        let mut tree = ValueTree::new("r", Direction::Down);
        let root = tree.root();
        tree.attach("a", root, Link { weight: 2.5, layer: 1 });
        let text = tree.to_tree_string().to_string();
        assert!(text.starts_with("r (dist 0)"));
        assert!(text.contains("a (dist 1, weight 2.5, layer 1)"));
    }
}
