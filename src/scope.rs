use crate::{
    ast::{Expr, Predicate, StageKind, Var},
    error::{BuildError, Result},
};

/// Check that every variable in `expr` refers to `bound`.
///
/// The walk is depth-first, left to right, and stops at the first foreign
/// variable, which is reported against `stage`.
///
/// # Examples
/// ```
/// use jaql_ast::ast::{Expr, StageKind, Var};
/// use jaql_ast::scope::check_expr;
///
/// let ok = Expr::Var(Var::new("x"));
/// assert!(check_expr(StageKind::Transform, "x", &ok).is_ok());
///
/// let bad = Expr::Var(Var::new("y"));
/// let err = check_expr(StageKind::Transform, "x", &bad).unwrap_err();
/// assert_eq!(err.to_string(), "transform: unknown variable: y");
/// ```
pub fn check_expr(stage: StageKind, bound: &str, expr: &Expr) -> Result<()> {
    match expr {
        // Only the root is a variable; path segments are field names
        Expr::Var(var) => check_var(stage, bound, var),

        Expr::Object(pairs) => pairs
            .iter()
            .try_for_each(|pair| check_expr(stage, bound, &pair.value)),

        Expr::Array(elems) => elems
            .iter()
            .try_for_each(|elem| check_expr(stage, bound, elem)),

        Expr::Operation { left, right, .. } => {
            check_expr(stage, bound, left)?;
            check_expr(stage, bound, right)
        }

        // Literals never reference variables
        Expr::Json(_)
        | Expr::Integer(_)
        | Expr::Double(_)
        | Expr::String(_)
        | Expr::Boolean(_) => Ok(()),
    }
}

/// Check every variable in a predicate tree, compound operands included.
pub fn check_predicate(stage: StageKind, bound: &str, pred: &Predicate) -> Result<()> {
    match pred {
        Predicate::Compare { left, right, .. } => {
            check_expr(stage, bound, left)?;
            check_expr(stage, bound, right)
        }
        Predicate::Compound { left, right, .. } => {
            if let Some(left) = left {
                check_predicate(stage, bound, left)?;
            }
            check_predicate(stage, bound, right)
        }
    }
}

/// Check a single variable reference against the bound name.
pub fn check_var(stage: StageKind, bound: &str, var: &Var) -> Result<()> {
    if var.name == bound {
        Ok(())
    } else {
        Err(BuildError::UnknownVariable {
            stage,
            name: var.name.clone(),
        })
    }
}
