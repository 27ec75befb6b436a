//! # JAQL Pipeline Abstract Syntax Tree
//!
//! This module defines the tree the constructors in [`crate::builder`]
//! assemble for a JAQL statement: a chain of stages over JSON arrays, each
//! stage looping over its input with one bound variable.
//!
//! ## Architecture Overview
//!
//! - **[operators]** - Comparison, boolean and arithmetic operators
//! - **[expressions]** - Values: literals, variables, objects, arrays, arithmetic
//! - **[predicates]** - Boolean tests used by filter stages
//! - **[stages]** - Pipeline stages (filter, transform, expand, sort, top, output)
//! - **[pipeline]** - The ordered stage chain handed to code generation
//!
//! ## Quick Start
//!
//! ```text
//! $in -> filter each x x.price > 100 -> transform each x x.name => out;
//! ```
//!
//! This statement keeps the expensive elements of `$in`, maps each to its
//! name and stores the result in `out`.
//!
//! ## Ownership
//!
//! The tree is strictly owned: every child is held by value or `Box` by
//! exactly one parent, and the sibling chains (stages, object pairs, array
//! elements) are plain `Vec`s in insertion order. Sort keys live in
//! [`SortKeys`], which cannot be empty. Dropping the root drops everything.
//!
//! ## Validity
//!
//! A tree produced by the constructors has already been scope checked and
//! has had its constant arithmetic folded:
//!
//! - every variable inside a stage resolves to the stage's bound variable
//! - no arithmetic operand is a string or boolean literal
//! - a `+` or `*` [`Expr::Operation`] with a dynamic operand holds it on the left
pub mod expressions;
pub mod operators;
pub mod pipeline;
pub mod predicates;
pub mod stages;

pub use expressions::{Expr, Pair, Var};
pub use operators::{ArithOp, BoolOp, CmpOp};
pub use pipeline::Pipeline;
pub use predicates::Predicate;
pub use stages::{SortKey, SortKeys, Stage, StageKind};
