//! gvtree: greedy, layer-bounded value trees from weighted directed graphs.
//!
//! An edge list is loaded into a [`domain::WeightedDigraph`], edges below a cutoff
//! are dropped by [`domain::GraphFilter`], and [`domain::TreeBuilder`] grows a
//! single-parent tree outward from a root, one layer per round, letting the
//! heaviest candidate edge claim each newly reached node.
//!
//! ```no_run
//! let tree = gvtree::get_tree("trade.csv", "comma", "USA", 0.05, 3, true)?;
//! for edge in tree.edges() {
//!     println!("{} -> {} ({}, layer {})", edge.source, edge.target, edge.weight, edge.layer);
//! }
//! # Ok::<(), gvtree::application::ApplicationError>(())
//! ```

use std::path::Path;
use std::sync::Arc;

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

use application::services::{TreeRequest, TreeService};
use application::ApplicationResult;
use domain::{Delimiter, Direction, ValueTree};
use infrastructure::traits::{RealCommandRunner, RealFileSystem};

/// Load an edge list and extract the tree rooted at `root`.
///
/// `delimiter` is a separator name (`whitespace`, `tab`, `comma`, ...) or a literal
/// string. `upstream` follows incoming edges, otherwise outgoing edges are followed.
pub fn get_tree(
    path: impl AsRef<Path>,
    delimiter: &str,
    root: &str,
    cutoff: f64,
    layer_max: i64,
    upstream: bool,
) -> ApplicationResult<ValueTree> {
    let service = TreeService::new(Arc::new(RealFileSystem), Arc::new(RealCommandRunner));
    service.get_tree(&TreeRequest {
        path: path.as_ref().to_path_buf(),
        delimiter: Delimiter::from_name(delimiter),
        root: root.to_string(),
        cutoff,
        layer_max,
        direction: Direction::from_upstream(upstream),
    })
}
