//! CLI-level errors (wraps infrastructure errors)

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Render { .. } => crate::exitcode::UNAVAILABLE,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    if let Some(domain) = e.domain() {
        return match domain {
            DomainError::InvalidConfig(_) => crate::exitcode::USAGE,
            DomainError::InputFormat { .. }
            | DomainError::InvalidRoot(_)
            | DomainError::EmptyTree { .. } => crate::exitcode::DATAERR,
        };
    }
    match e {
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::OperationFailed { source, .. } => {
            match source.downcast_ref::<io::Error>() {
                Some(io) if io.kind() == io::ErrorKind::NotFound => crate::exitcode::NOINPUT,
                _ if source.is::<InfraError>() => crate::exitcode::UNAVAILABLE,
                _ => crate::exitcode::IOERR,
            }
        }
        _ => crate::exitcode::SOFTWARE,
    }
}
