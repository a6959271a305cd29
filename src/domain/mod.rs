//! Domain layer: graph model, tree growth and rendering
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod edgelist;
pub mod entities;
pub mod error;
pub mod filter;
pub mod graph;
pub mod render;

pub use arena::{Link, NodeData, TreeEdge, TreeNode, ValueTree};
pub use builder::TreeBuilder;
pub use edgelist::EdgeList;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use filter::GraphFilter;
pub use graph::{Edge, WeightedDigraph};
pub use render::{DotStyle, TreeRender};
