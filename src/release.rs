//! Explicit teardown of statement trees.
//!
//! Dropping a tree releases it, but the default drop glue recurses once per
//! nesting level, and long `&&` chains or deep arithmetic nest arbitrarily.
//! [`release`] takes the tree apart with an explicit worklist instead, so
//! teardown depth is bounded no matter the shape, and reports how many
//! nodes it released. For any tree the count equals
//! [`Pipeline::node_count`].

use tracing::trace;

use crate::{
    ast::{Expr, Pair, Pipeline, Predicate, SortKey, Stage},
    error::Result,
};

/// A subtree whose ownership has moved to the worklist.
enum Owned {
    Stage(Stage),
    Expr(Expr),
    Predicate(Predicate),
    Pair(Pair),
    SortKey(SortKey),
}

/// Release every node of `pipe`, returning the number released.
pub fn release(pipe: Pipeline) -> usize {
    // Reversed so stages come off the worklist in chain order
    let mut pending: Vec<Owned> = pipe.into_stages().into_iter().rev().map(Owned::Stage).collect();
    let mut released = 0;

    while let Some(node) = pending.pop() {
        released += dismantle(node, &mut pending);
    }

    trace!(released, "released statement tree");
    released
}

/// Release a statement result; an error counts as a single node.
pub fn release_result(result: Result<Pipeline>) -> usize {
    match result {
        Ok(pipe) => release(pipe),
        Err(_) => 1,
    }
}

/// Move the children of `node` onto the worklist and count the nodes freed
/// here.
fn dismantle(node: Owned, pending: &mut Vec<Owned>) -> usize {
    match node {
        Owned::Stage(stage) => match stage {
            // The input is the expression itself, no wrapping node
            Stage::Source(expr) => {
                pending.push(Owned::Expr(expr));
                0
            }
            Stage::Filter { var, predicate } => {
                pending.push(Owned::Predicate(predicate));
                1 + var.node_count()
            }
            Stage::Transform { var, template } => {
                pending.push(Owned::Expr(template));
                1 + var.node_count()
            }
            Stage::Expand { var, expr } => 1 + var.node_count() + expr.node_count(),
            Stage::Sort { var, keys } => {
                pending.extend(keys.into_iter().map(Owned::SortKey));
                1 + var.node_count()
            }
            Stage::Top(_) | Stage::Output(_) => 1,
        },

        Owned::Expr(expr) => match expr {
            Expr::Object(pairs) => {
                pending.extend(pairs.into_iter().map(Owned::Pair));
                1
            }
            Expr::Array(elems) => {
                pending.extend(elems.into_iter().map(Owned::Expr));
                1
            }
            Expr::Operation { left, right, .. } => {
                pending.push(Owned::Expr(*left));
                pending.push(Owned::Expr(*right));
                // The operation and its operator
                2
            }
            Expr::Var(var) => var.node_count(),
            Expr::Json(_)
            | Expr::Integer(_)
            | Expr::Double(_)
            | Expr::String(_)
            | Expr::Boolean(_) => 1,
        },

        Owned::Predicate(pred) => match pred {
            Predicate::Compare { left, right, .. } => {
                pending.push(Owned::Expr(left));
                pending.push(Owned::Expr(right));
                2
            }
            Predicate::Compound { left, right, .. } => {
                if let Some(left) = left {
                    pending.push(Owned::Predicate(*left));
                }
                pending.push(Owned::Predicate(*right));
                2
            }
        },

        Owned::Pair(pair) => {
            pending.push(Owned::Expr(pair.value));
            1
        }

        Owned::SortKey(key) => key.node_count(),
    }
}
