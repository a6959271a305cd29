//! Arena-based output tree.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::Direction;

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Node identifier as read from the edge list
    pub id: String,
    /// Distance in layers from the root (root = 0)
    pub dist: usize,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Parent link of a non-root node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Weight copied from the source graph
    pub weight: f64,
    /// Round (1-based) in which the node was annexed
    pub layer: usize,
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of the parent node, None for the root
    pub parent: Option<Index>,
    /// Link to the parent, None for the root
    pub link: Option<Link>,
    /// Child indices in annexation order
    pub children: Vec<Index>,
}

/// A tree edge in graph orientation.
///
/// Upstream trees point child -> parent, downstream trees parent -> child.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub layer: usize,
}

/// Single-root tree grown from a weighted digraph.
///
/// Every node except the root carries exactly one parent link. Nodes are kept in
/// annexation order, which is also the order `edges()` reports them in.
#[derive(Debug)]
pub struct ValueTree {
    arena: Arena<TreeNode>,
    root: Index,
    by_id: HashMap<String, Index>,
    order: Vec<Index>,
    direction: Direction,
}

impl ValueTree {
    /// Create a tree holding only `root` with `dist = 0`.
    pub fn new(root: impl Into<String>, direction: Direction) -> Self {
        let root = root.into();
        let mut arena = Arena::new();
        let root_idx = arena.insert(TreeNode {
            data: NodeData {
                id: root.clone(),
                dist: 0,
            },
            parent: None,
            link: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root: root_idx,
            by_id: HashMap::from([(root, root_idx)]),
            order: vec![root_idx],
            direction,
        }
    }

    /// Attach a new node below `parent`. Its `dist` is the link's layer.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn attach(&mut self, id: &str, parent: Index, link: Link) -> Index {
        let node_idx = self.arena.insert(TreeNode {
            data: NodeData {
                id: id.to_string(),
                dist: link.layer,
            },
            parent: Some(parent),
            link: Some(link),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        self.by_id.insert(id.to_string(), node_idx);
        self.order.push(node_idx);
        node_idx
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_id(&self) -> &str {
        self.arena
            .get(self.root)
            .map(|n| n.data.id.as_str())
            .unwrap_or_default()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.get_node(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn dist(&self, id: &str) -> Option<usize> {
        self.node(id).map(|n| n.data.dist)
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.get_node(p))
            .map(|p| p.data.id.as_str())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// A tree always holds its root; this reports whether it holds nothing else.
    pub fn is_root_only(&self) -> bool {
        self.order.len() == 1
    }

    pub fn edge_count(&self) -> usize {
        self.order.len() - 1
    }

    /// Node payloads in annexation order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> + '_ {
        self.order
            .iter()
            .filter_map(|&idx| self.get_node(idx))
            .map(|n| &n.data)
    }

    /// Tree edges in annexation order, oriented like the graph they came from.
    pub fn edges(&self) -> Vec<TreeEdge> {
        self.order
            .iter()
            .filter_map(|&idx| self.get_node(idx))
            .filter_map(|node| {
                let link = node.link?;
                let parent = self.get_node(node.parent?)?;
                let (source, target) = match self.direction {
                    Direction::Up => (&node.data.id, &parent.data.id),
                    Direction::Down => (&parent.data.id, &node.data.id),
                };
                Some(TreeEdge {
                    source: source.clone(),
                    target: target.clone(),
                    weight: link.weight,
                    layer: link.layer,
                })
            })
            .collect()
    }

    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of levels, the root alone counts as 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.nodes().map(|n| n.dist + 1).max().unwrap_or(0)
    }

    /// Identifiers of nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

impl PartialEq for ValueTree {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.root_id() == other.root_id()
            && self.edges() == other.edges()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ValueTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ValueTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ValueTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ValueTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root(), false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
