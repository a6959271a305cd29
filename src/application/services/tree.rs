//! Tree extraction service
//!
//! Reads an edge list, applies the cutoff and grows the tree. Also writes
//! renderings and hands DOT documents to Graphviz for image output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    validate_cutoff, Delimiter, Direction, DomainError, DotStyle, EdgeList, GraphFilter,
    TreeBuilder, TreeParams, TreeRender, ValueTree, WeightedDigraph,
};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

/// Graphviz executable used for image output.
const DOT_PROGRAM: &str = "dot";
const DEFAULT_IMAGE_FORMAT: &str = "png";

/// Everything one `get_tree` call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRequest {
    /// Edge-list file
    pub path: PathBuf,
    pub delimiter: Delimiter,
    pub root: String,
    /// Minimum edge weight
    pub cutoff: f64,
    /// Maximum number of growth rounds, validated to be >= 0
    pub layer_max: i64,
    pub direction: Direction,
}

/// Service extracting value trees from edge-list files.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(fs: Arc<dyn FileSystem>, cmd: Arc<dyn CommandRunner>) -> Self {
        Self { fs, cmd }
    }

    /// Read and parse an edge-list file.
    pub fn load_graph(&self, path: &Path, delimiter: &Delimiter) -> ApplicationResult<WeightedDigraph> {
        debug!("load_graph: path={}, delimiter={:?}", path.display(), delimiter);
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read edge list", path)?;
        EdgeList::parse(&content, delimiter).map_err(|source| ApplicationError::EdgeList {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Extract the tree described by `request`.
    ///
    /// Configuration is validated before the file is read. A root missing from the
    /// input is `InvalidRoot`, a root whose edges all fall below the cutoff is
    /// `EmptyTree`.
    #[instrument(level = "debug", skip(self))]
    pub fn get_tree(&self, request: &TreeRequest) -> ApplicationResult<ValueTree> {
        let cutoff = validate_cutoff(request.cutoff)?;
        let params = TreeParams::new(request.root.clone(), request.layer_max, request.direction)?;

        let raw = self.load_graph(&request.path, &request.delimiter)?;
        let filtered = GraphFilter::filter(&raw, cutoff);

        if !filtered.contains_node(&params.root) {
            let err = if raw.contains_node(&params.root) {
                DomainError::EmptyTree {
                    root: params.root.clone(),
                }
            } else {
                DomainError::InvalidRoot(params.root.clone())
            };
            return Err(err.into());
        }

        let tree = TreeBuilder::new(&filtered).build(&params)?;
        debug!(
            "get_tree: {} node(s), {} edge(s)",
            tree.len(),
            tree.edge_count()
        );
        Ok(tree)
    }

    /// Write a rendering to `path`, creating parent directories.
    pub fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write output", path)
    }

    /// Lay out the tree with Graphviz and write an image to `image_path`.
    ///
    /// The output format follows the file extension (`png` when there is none).
    #[instrument(level = "debug", skip(self, tree))]
    pub fn render_image(
        &self,
        tree: &ValueTree,
        style: &DotStyle,
        image_path: &Path,
    ) -> ApplicationResult<()> {
        let format = image_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_IMAGE_FORMAT)
            .to_ascii_lowercase();
        self.fs
            .ensure_parent(image_path)
            .with_path_context("create directory for", image_path)?;

        let format_flag = format!("-T{format}");
        let output_path = image_path.to_string_lossy();
        let args = [format_flag.as_str(), "-o", output_path.as_ref()];
        let dot = tree.to_dot(style);

        let result = self
            .cmd
            .run_with_stdin(DOT_PROGRAM, &args, &dot)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run {DOT_PROGRAM} for {}: {e}", image_path.display()),
                source: Box::new(InfraError::Render {
                    message: e.to_string(),
                    exit_code: None,
                }),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ApplicationError::OperationFailed {
                context: format!("{DOT_PROGRAM} {}: {}", image_path.display(), stderr.trim()),
                source: Box::new(InfraError::Render {
                    message: stderr.to_string(),
                    exit_code: result.status.code(),
                }),
            });
        }

        debug!("render_image: wrote {}", image_path.display());
        Ok(())
    }
}
