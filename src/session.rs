//! Statement driver.
//!
//! A session receives the statements of a script one at a time, each as the
//! result of building its tree together with the mode it was requested in.
//! Plan modes are answered with the printer; execution modes hand the
//! validated tree and the variable environment to a [`Backend`], which owns
//! translation into executable instructions and running them.
//!
//! A statement that failed to build, or that the backend rejects, produces
//! its error message. The session itself stays usable: later statements run
//! against the same environment as if the failing one had not been issued.

use std::fmt;

use tracing::{debug, warn};

use crate::{
    ast::Pipeline,
    env::VarEnv,
    error::Result,
    printer::PlanPrinter,
    release::release,
};

/// How a statement was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Explain {
    /// Run the statement
    #[default]
    Execute,
    /// Show the generated program without running it
    Explain,
    /// Print the tree in surface form (`plan`)
    Plan,
    /// Print the tree in canonical form (`planf`)
    PlanCanonical,
}

/// One built statement awaiting processing.
#[derive(Debug)]
pub struct Statement {
    pub tree: Result<Pipeline>,
    pub explain: Explain,
}

impl Statement {
    pub fn new(tree: Result<Pipeline>, explain: Explain) -> Self {
        Statement { tree, explain }
    }
}

/// Code generation and execution for validated trees.
///
/// Implementations may assume every tree they receive passed scope and
/// arithmetic validation.
pub trait Backend {
    /// Engine handle stored per variable
    type Handle;
    type Error: fmt::Display;

    /// Translate and run `pipe`, returning whatever it prints.
    fn execute(
        &mut self,
        pipe: &Pipeline,
        env: &mut VarEnv<Self::Handle>,
    ) -> std::result::Result<String, Self::Error>;

    /// Translate `pipe` and render the resulting program.
    fn explain(
        &mut self,
        pipe: &Pipeline,
        env: &VarEnv<Self::Handle>,
    ) -> std::result::Result<String, Self::Error>;
}

/// Result of processing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Text produced by the statement (possibly empty)
    Output(String),
    /// The statement's error message; its partial work was discarded
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Backend for sessions that only print plans.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanOnly;

impl Backend for PlanOnly {
    type Handle = ();
    type Error = &'static str;

    fn execute(&mut self, _: &Pipeline, _: &mut VarEnv<()>) -> std::result::Result<String, Self::Error> {
        Err("no execution engine attached")
    }

    fn explain(&mut self, _: &Pipeline, _: &VarEnv<()>) -> std::result::Result<String, Self::Error> {
        Err("no execution engine attached")
    }
}

pub struct Session<B: Backend> {
    backend: B,
    env: VarEnv<B::Handle>,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B) -> Self {
        Session {
            backend,
            env: VarEnv::new(),
        }
    }

    pub fn env(&self) -> &VarEnv<B::Handle> {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut VarEnv<B::Handle> {
        &mut self.env
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Process one statement and release its tree.
    pub fn run(&mut self, stmt: Statement) -> Outcome {
        let pipe = match stmt.tree {
            Ok(pipe) => pipe,
            Err(e) => {
                warn!(error = %e, "statement failed to build");
                return Outcome::Failed(e.to_string());
            }
        };

        let outcome = match stmt.explain {
            Explain::Plan | Explain::PlanCanonical => {
                let canonical = stmt.explain == Explain::PlanCanonical;
                let mut text = PlanPrinter::new(canonical).print(&pipe);
                text.push('\n');
                Outcome::Output(text)
            }
            Explain::Execute => match self.backend.execute(&pipe, &mut self.env) {
                Ok(text) => Outcome::Output(text),
                Err(e) => {
                    warn!(error = %e, "statement failed to execute");
                    Outcome::Failed(e.to_string())
                }
            },
            Explain::Explain => match self.backend.explain(&pipe, &self.env) {
                Ok(text) => Outcome::Output(text),
                Err(e) => {
                    warn!(error = %e, "statement failed to translate");
                    Outcome::Failed(e.to_string())
                }
            },
        };

        let released = release(pipe);
        debug!(released, mode = ?stmt.explain, "statement done");
        outcome
    }

    /// Process statements in order; a failure does not stop the rest.
    pub fn run_all(&mut self, stmts: impl IntoIterator<Item = Statement>) -> Vec<Outcome> {
        stmts.into_iter().map(|stmt| self.run(stmt)).collect()
    }
}
