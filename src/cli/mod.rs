//! CLI support for jaql-ast
//!
//! Provides programmatic access to the `jaql` commands so other drivers can
//! reuse them.

mod check;
mod plan;

pub use check::{execute_check, CheckOptions, CheckReport, StatementCheck};
pub use plan::{execute_plan, PlanOptions};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Trace decoding error
    Trace(crate::TraceError),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Trace(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Pass a trace file or pipe a trace to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Trace(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<crate::TraceError> for CliError {
    fn from(e: crate::TraceError) -> Self {
        CliError::Trace(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
