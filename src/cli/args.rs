//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Extract greedy, layer-bounded value trees from weighted edge lists
#[derive(Parser, Debug)]
#[command(name = "gvtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .gvtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a tree rooted at a node
    Tree(TreeArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Edge-list file: source, target, weight per line
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Root node
    #[arg(short, long)]
    pub root: String,

    /// Minimum edge weight
    #[arg(short, long, allow_negative_numbers = true)]
    pub cutoff: Option<f64>,

    /// Number of layers to grow
    #[arg(short, long, allow_negative_numbers = true)]
    pub layers: Option<i64>,

    /// Search direction: up (incoming edges) or down (outgoing edges)
    #[arg(short, long)]
    pub direction: Option<String>,

    /// Field separator: whitespace, tab, comma, semicolon, space, pipe, or literal
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also render an image with Graphviz (format from extension)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub image: Option<PathBuf>,

    /// Space between layers in DOT/image output
    #[arg(long)]
    pub layer_space: Option<f64>,

    /// Edge color in DOT/image output
    #[arg(long)]
    pub edge_color: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented tree with dist/weight/layer
    Tree,
    /// Edge list: source, target, weight, layer
    Edges,
    /// Graphviz DOT
    Dot,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
