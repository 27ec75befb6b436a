pub mod ast;
pub mod builder;
pub mod cli;
pub mod env;
pub mod error;
pub mod optimize;
pub mod printer;
pub mod release;
pub mod scope;
pub mod session;
pub mod trace;

pub use ast::{ArithOp, BoolOp, CmpOp, Expr, Pair, Pipeline, Predicate, SortKey, SortKeys, Stage, StageKind, Var};
pub use env::{EnvError, VarEnv};
pub use error::BuildError;
pub use printer::{to_plan, to_plan_canonical, PlanPrinter};
pub use release::{release, release_result};
pub use session::{Backend, Explain, Outcome, Session, Statement};
pub use trace::{parse_trace, TraceError};
