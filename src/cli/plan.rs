//! Print the plans of a build trace

use super::CliError;
use crate::{
    printer::PlanPrinter,
    session::{Explain, Outcome, PlanOnly, Session},
    trace::parse_trace,
};

/// Options for the plan command
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Build trace JSON
    pub trace: Option<String>,
    /// Canonical (`planf`) instead of surface (`plan`) form
    pub canonical: bool,
}

/// Render every statement of the trace.
///
/// Each statement's own explain mode is overridden. Failing statements
/// render as errors in the chosen form; the others are unaffected.
pub fn execute_plan(options: &PlanOptions) -> Result<String, CliError> {
    let text = options.trace.as_ref().ok_or(CliError::NoInput)?;
    let mode = if options.canonical {
        Explain::PlanCanonical
    } else {
        Explain::Plan
    };

    let printer = PlanPrinter::new(options.canonical);
    let mut session = Session::new(PlanOnly);
    let mut out = String::new();

    for mut stmt in parse_trace(text)? {
        stmt.explain = mode;
        let failure = stmt.tree.as_ref().err().cloned();

        match session.run(stmt) {
            Outcome::Output(plan) => out.push_str(&plan),
            Outcome::Failed(_) => {
                if let Some(e) = failure {
                    let _ = printer.write_error(&mut out, &e);
                    if options.canonical {
                        out.push('\n');
                    }
                }
            }
        }
    }

    Ok(out)
}
