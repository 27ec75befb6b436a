//! Validate the statements of a build trace

use super::CliError;
use crate::{release::release_result, trace::parse_trace};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Build trace JSON
    pub trace: Option<String>,
}

/// Verdict for one statement
#[derive(Debug, Clone, PartialEq)]
pub enum StatementCheck {
    /// Built successfully into a tree of this many nodes
    Valid { nodes: usize },
    /// Failed with this message
    Invalid(String),
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckReport {
    pub statements: Vec<StatementCheck>,
}

impl CheckReport {
    pub fn all_valid(&self) -> bool {
        self.statements
            .iter()
            .all(|s| matches!(s, StatementCheck::Valid { .. }))
    }
}

/// Build every statement of the trace and report which ones are valid
pub fn execute_check(options: &CheckOptions) -> Result<CheckReport, CliError> {
    let text = options.trace.as_ref().ok_or(CliError::NoInput)?;

    let statements = parse_trace(text)?
        .into_iter()
        .map(|stmt| match stmt.tree {
            Ok(pipe) => {
                let nodes = pipe.node_count();
                release_result(Ok(pipe));
                StatementCheck::Valid { nodes }
            }
            Err(e) => StatementCheck::Invalid(e.to_string()),
        })
        .collect();

    Ok(CheckReport { statements })
}
