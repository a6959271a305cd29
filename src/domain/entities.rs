//! Domain entities: core value types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Search direction of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow incoming edges: tree edges point child -> parent.
    #[serde(alias = "upstream")]
    Up,
    /// Follow outgoing edges: tree edges point parent -> child.
    #[serde(alias = "downstream")]
    Down,
}

impl Direction {
    pub fn from_upstream(upstream: bool) -> Self {
        if upstream {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Split an edge into its (near, far) endpoints for this direction.
    ///
    /// The near endpoint must already be reached for the edge to be a candidate,
    /// the far endpoint is the node the edge would annex.
    pub fn near_far<'a>(&self, source: &'a str, target: &'a str) -> (&'a str, &'a str) {
        match self {
            Self::Up => (target, source),
            Self::Down => (source, target),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Up
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "upstream" | "in" => Ok(Self::Up),
            "down" | "downstream" | "out" => Ok(Self::Down),
            other => Err(DomainError::InvalidConfig(format!(
                "unrecognized direction: '{other}' (expected up or down)"
            ))),
        }
    }
}

/// Field separator of an edge-list file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Runs of whitespace separate fields.
    #[default]
    Whitespace,
    /// A literal separator string.
    Token(String),
}

impl Delimiter {
    /// Resolve a delimiter from its configured name.
    ///
    /// Named forms: `whitespace` (or empty), `tab`, `comma`, `semicolon`, `space`, `pipe`.
    /// The escape `\t` is read as a tab. Anything else is taken literally.
    pub fn from_name(name: &str) -> Self {
        match name {
            "" | "whitespace" => Self::Whitespace,
            "tab" | "\\t" => Self::Token("\t".into()),
            "comma" => Self::Token(",".into()),
            "semicolon" => Self::Token(";".into()),
            "space" => Self::Token(" ".into()),
            "pipe" => Self::Token("|".into()),
            other => Self::Token(other.to_string()),
        }
    }

    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Self::Whitespace => line.split_whitespace().collect(),
            Self::Token(sep) => line.trim().split(sep.as_str()).map(str::trim).collect(),
        }
    }

    /// Separator used when writing fields back out.
    pub fn as_output(&self) -> &str {
        match self {
            Self::Whitespace => "\t",
            Self::Token(sep) => sep,
        }
    }
}

/// Validated parameters of one tree build.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    pub root: String,
    pub layer_max: usize,
    pub direction: Direction,
}

impl TreeParams {
    /// Validate raw parameters.
    ///
    /// `layer_max` arrives signed from configuration and the command line,
    /// a negative bound is rejected here before any growth happens.
    pub fn new(root: impl Into<String>, layer_max: i64, direction: Direction) -> DomainResult<Self> {
        let layer_max = usize::try_from(layer_max).map_err(|_| {
            DomainError::InvalidConfig(format!("layer_max must be >= 0, got {layer_max}"))
        })?;
        Ok(Self {
            root: root.into(),
            layer_max,
            direction,
        })
    }
}

/// Reject a cutoff that no weight can be compared against.
pub fn validate_cutoff(cutoff: f64) -> DomainResult<f64> {
    if cutoff.is_nan() {
        return Err(DomainError::InvalidConfig("cutoff must be a number, got NaN".into()));
    }
    Ok(cutoff)
}
