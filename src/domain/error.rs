//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree-extraction rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("malformed edge list at line {line}: {message}")]
    InputFormat { line: usize, message: String },

    #[error("root node not found in graph: {0}")]
    InvalidRoot(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("empty tree: no qualifying edge touches root {root}")]
    EmptyTree { root: String },
}

impl DomainError {
    pub(crate) fn input_format(line: usize, message: impl Into<String>) -> Self {
        Self::InputFormat {
            line,
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
