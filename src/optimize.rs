//! Peephole rewrites applied while the tree is being built.
//!
//! There is no separate optimisation pass: the constructors in
//! [`crate::builder`] call into this module as each node is assembled, so a
//! finished tree is already in its reduced form.
//!
//! # Rewrites
//!
//! - **Identity transform**: `transform each x x` changes nothing and is
//!   dropped from the pipeline
//! - **Negated equality**: `!(x.a == v)` becomes `x.a != v`
//! - **Operand order**: `5 + x` becomes `x + 5`, so code generation only sees
//!   dynamic operands on the left. `-` and `/` keep their order.
//! - **Constant folding**: `2 + 3` becomes `5`, `2 + 3.0` becomes `5.0`
//!
//! Division by zero and integer overflow are not checked here. Such an
//! operation is left unfolded and reported by whatever evaluates it.

use tracing::debug;

use crate::{
    ast::{ArithOp, CmpOp, Expr, Predicate, Var},
    error::{BuildError, Result},
};

/// True when `template` is a bare reference to the bound variable, making a
/// transform over `var` a no-op.
pub fn is_identity(var: &Var, template: &Expr) -> bool {
    match template {
        Expr::Var(t) => t.is_bare() && t.name == var.name,
        _ => false,
    }
}

/// Turn a simple `==` comparison into `!=`.
///
/// Any other predicate is returned unchanged.
pub fn negate_equality(pred: Predicate) -> Predicate {
    match pred {
        Predicate::Compare {
            left,
            op: CmpOp::Equal,
            right,
        } => {
            debug!("rewriting negated equality to inequality");
            Predicate::Compare {
                left,
                op: CmpOp::NotEqual,
                right,
            }
        }
        other => other,
    }
}

/// Build an arithmetic operation, reordering or folding it where possible.
///
/// # Errors
///
/// [`BuildError::ArithmeticOnNonNumeric`] when either operand is a string or
/// boolean literal.
///
/// # Examples
/// ```
/// use jaql_ast::ast::{ArithOp, Expr};
/// use jaql_ast::optimize::fold_operation;
///
/// let folded = fold_operation(Expr::Integer(2), ArithOp::Plus, Expr::Double(3.0)).unwrap();
/// assert_eq!(folded, Expr::Double(5.0));
/// ```
pub fn fold_operation(left: Expr, op: ArithOp, right: Expr) -> Result<Expr> {
    if left.is_non_numeric_scalar() || right.is_non_numeric_scalar() {
        return Err(BuildError::ArithmeticOnNonNumeric);
    }

    if left.is_dynamic() {
        return Ok(operation(left, op, right));
    }

    if right.is_dynamic() {
        if is_commutative(op) {
            debug!(%op, "moving dynamic operand to the left");
            return Ok(operation(right, op, left));
        }
        return Ok(operation(left, op, right));
    }

    match fold_constants(&left, op, &right) {
        Some(folded) => {
            debug!(%op, "folded constant arithmetic");
            Ok(folded)
        }
        None => Ok(operation(left, op, right)),
    }
}

fn operation(left: Expr, op: ArithOp, right: Expr) -> Expr {
    Expr::Operation {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn is_commutative(op: ArithOp) -> bool {
    matches!(op, ArithOp::Plus | ArithOp::Multiply)
}

/// Evaluate arithmetic over two numeric literals.
///
/// Integers stay integers unless either side is a double. Returns `None`
/// for anything that is not a numeric pair and for integer results that are
/// undefined (division by zero, overflow).
fn fold_constants(left: &Expr, op: ArithOp, right: &Expr) -> Option<Expr> {
    match (left, right) {
        (Expr::Integer(a), Expr::Integer(b)) => {
            let (a, b) = (*a, *b);
            let n = match op {
                ArithOp::Plus => a.checked_add(b),
                ArithOp::Minus => a.checked_sub(b),
                ArithOp::Multiply => a.checked_mul(b),
                ArithOp::Divide => a.checked_div(b),
            }?;
            Some(Expr::Integer(n))
        }
        (l, r) if l.is_numeric() && r.is_numeric() => {
            let a = as_double(l)?;
            let b = as_double(r)?;
            let d = match op {
                ArithOp::Plus => a + b,
                ArithOp::Minus => a - b,
                ArithOp::Multiply => a * b,
                ArithOp::Divide => a / b,
            };
            Some(Expr::Double(d))
        }
        _ => None,
    }
}

fn as_double(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Integer(n) => Some(*n as f64),
        Expr::Double(d) => Some(*d),
        _ => None,
    }
}
