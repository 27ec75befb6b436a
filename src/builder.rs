//! Node constructors driven by the statement grammar.
//!
//! The grammar reduces productions bottom-up and calls one constructor per
//! reduction, passing the trees built so far. Every constructor takes its
//! children by value: on success they move into the new node, on failure
//! they are dropped before the error is returned, so an error never leaves
//! a partially built tree behind.
//!
//! Stage constructors validate that the stage only references its bound
//! variable ([`crate::scope`]) and apply the rewrites in
//! [`crate::optimize`].
//!
//! # Examples
//!
//! ```
//! use jaql_ast::builder::*;
//! use jaql_ast::ast::CmpOp;
//!
//! // $in -> filter each x x.price > 100 -> top 3 => out
//! let pipe = make_pipe(make_source(make_varname("$in").into()));
//! let pred = make_pred(
//!     append_varname(make_varname("x"), "price").into(),
//!     CmpOp::Greater,
//!     make_number(100),
//! );
//! let pipe = append_pipe(pipe, make_jaql_filter(make_varname("x"), pred).map(Some));
//! let pipe = append_pipe(pipe, make_jaql_top(3).map(Some));
//! let pipe = append_pipe(pipe, Ok(Some(make_json_output(Some("out".into())))));
//!
//! assert_eq!(pipe.unwrap().len(), 4);
//! ```

use tracing::{debug, trace};

use crate::{
    ast::{ArithOp, BoolOp, CmpOp, Expr, Pair, Pipeline, Predicate, SortKey, SortKeys, Stage, StageKind, Var},
    error::{BuildError, Result},
    optimize, scope,
};

// ============================================================================
// Pipelines
// ============================================================================

/// Pipeline sink. A name assigns the result to that variable, `None` prints
/// it.
pub fn make_json_output(ident: Option<String>) -> Stage {
    Stage::Output(ident)
}

/// Pipeline input.
pub fn make_source(expr: Expr) -> Stage {
    Stage::Source(expr)
}

/// Start a pipeline from its first stage.
pub fn make_pipe(first: Stage) -> Result<Pipeline> {
    Ok(Pipeline::new(first))
}

/// Append `stage` as the next step of `pipe`.
///
/// - `Ok(None)` (a stage optimised away) leaves the pipeline unchanged
/// - if either side failed, the other is dropped and the error returned;
///   when both failed the pipeline's earlier error is kept
///
/// A statement with any failing stage therefore reduces to exactly one
/// error, whatever its length.
pub fn append_pipe(pipe: Result<Pipeline>, stage: Result<Option<Stage>>) -> Result<Pipeline> {
    let mut pipe = pipe?;
    match stage? {
        Some(stage) => {
            trace!(kind = %stage.kind(), position = pipe.len(), "appending stage");
            pipe.push(stage);
        }
        None => trace!("skipping elided stage"),
    }
    Ok(pipe)
}

// ============================================================================
// Stages
// ============================================================================

/// Filter loop over the input as `var`, keeping elements matching `pred`.
///
/// # Errors
///
/// [`BuildError::UnknownVariable`] if `pred` references anything but `var`.
pub fn make_jaql_filter(var: Var, pred: Predicate) -> Result<Stage> {
    scope::check_predicate(StageKind::Filter, &var.name, &pred)?;

    Ok(Stage::Filter {
        var,
        predicate: pred,
    })
}

/// Transform loop over the input as `var`, mapping each element through
/// `tmpl`.
///
/// Returns `Ok(None)` when the template is the bare loop variable: the
/// stage would not change anything and is left out of the pipeline.
///
/// # Errors
///
/// [`BuildError::UnknownVariable`] if `tmpl` references anything but `var`.
pub fn make_jaql_transform(var: Var, tmpl: Expr) -> Result<Option<Stage>> {
    scope::check_expr(StageKind::Transform, &var.name, &tmpl)?;

    if optimize::is_identity(&var, &tmpl) {
        debug!(var = %var.name, "eliding identity transform");
        return Ok(None);
    }

    Ok(Some(Stage::Transform {
        var,
        template: tmpl,
    }))
}

/// Expand loop over the input as `var`, flattening the nested array found
/// at `expr` (or each element itself when `expr` is omitted).
///
/// # Errors
///
/// [`BuildError::UnknownVariable`] if `expr` is rooted at another variable.
pub fn make_jaql_expand(var: Var, expr: Option<Var>) -> Result<Stage> {
    let expr = match expr {
        Some(expr) => {
            scope::check_var(StageKind::Expand, &var.name, &expr)?;
            expr
        }
        // Code generation always gets something to expand
        None => Var::new(var.name.clone()),
    };

    Ok(Stage::Expand { var, expr })
}

/// Sort the input, looping over it as `var`, by the given keys in order.
///
/// A single [`SortKey`] converts into a one-key list.
///
/// # Errors
///
/// [`BuildError::UnknownVariable`] for the first key rooted at another
/// variable.
pub fn make_jaql_sort(var: Var, keys: impl Into<SortKeys>) -> Result<Stage> {
    let keys = keys.into();
    for key in keys.iter() {
        scope::check_var(StageKind::Sort, &var.name, &key.var)?;
    }

    Ok(Stage::Sort { var, keys })
}

/// Limit the result to the first `num` elements.
///
/// # Errors
///
/// [`BuildError::InvalidLimit`] for negative counts. Zero is valid.
pub fn make_jaql_top(num: i64) -> Result<Stage> {
    u64::try_from(num)
        .map(Stage::Top)
        .map_err(|_| BuildError::InvalidLimit(num))
}

/// One sort criterion.
pub fn make_sort_arg(var: Var, ascending: bool) -> SortKey {
    SortKey { var, ascending }
}

/// Add a lower-priority key; `keys` may be the first key on its own.
pub fn append_sort_arg(keys: impl Into<SortKeys>, key: SortKey) -> SortKeys {
    let mut keys = keys.into();
    keys.push(key);
    keys
}

// ============================================================================
// Predicates
// ============================================================================

/// Simple predicate comparing two values.
pub fn make_pred(left: Expr, op: CmpOp, right: Expr) -> Predicate {
    Predicate::Compare { left, op, right }
}

/// Chain `pred` onto a preceding predicate and the connective joining them.
///
/// Without a preceding predicate `pred` is returned as is.
pub fn make_cpred(prev: Option<(Predicate, BoolOp)>, pred: Predicate) -> Predicate {
    match prev {
        None => pred,
        Some((prev, op)) => Predicate::Compound {
            left: Some(Box::new(prev)),
            op,
            right: Box::new(pred),
        },
    }
}

/// `!pred`. Applied to a bare `==` comparison this yields the `!=`
/// comparison instead of a wrapping node.
pub fn make_not(pred: Predicate) -> Predicate {
    if pred.is_equality() {
        return optimize::negate_equality(pred);
    }

    Predicate::Compound {
        left: None,
        op: BoolOp::Not,
        right: Box::new(pred),
    }
}

// ============================================================================
// Values
// ============================================================================

/// Opaque JSON text.
pub fn make_json(s: impl Into<String>) -> Expr {
    Expr::Json(s.into())
}

/// Object constructor over a list of pairs.
pub fn make_json_object(pairs: Vec<Pair>) -> Expr {
    Expr::Object(pairs)
}

/// Array constructor; elements may be any expression.
pub fn make_json_array(elems: Vec<Expr>) -> Expr {
    Expr::Array(elems)
}

/// `"name": value`
pub fn make_pair(name: impl Into<String>, value: Expr) -> Pair {
    Pair {
        name: name.into(),
        value,
    }
}

/// Pair named after the last segment of a variable path.
///
/// # Examples
/// ```
/// use jaql_ast::builder::{append_varname, make_pair_from_var, make_varname};
///
/// let pair = make_pair_from_var(append_varname(make_varname("x"), "price"));
/// assert_eq!(pair.name, "price");
/// ```
pub fn make_pair_from_var(var: Var) -> Pair {
    let name = var.leaf_name().to_string();
    Pair {
        name,
        value: Expr::Var(var),
    }
}

pub fn append_pair(mut pairs: Vec<Pair>, pair: Pair) -> Vec<Pair> {
    pairs.push(pair);
    pairs
}

pub fn append_elem(mut elems: Vec<Expr>, elem: Expr) -> Vec<Expr> {
    elems.push(elem);
    elems
}

/// Variable reference.
pub fn make_varname(ident: impl Into<String>) -> Var {
    Var::new(ident)
}

/// Extend a variable path by one field: `x.a` + `b` gives `x.a.b`.
pub fn append_varname(mut var: Var, ident: impl Into<String>) -> Var {
    var.path.push(ident.into());
    var
}

/// Arithmetic over two operands, folded when both are numeric literals.
///
/// # Errors
///
/// [`BuildError::ArithmeticOnNonNumeric`] if either operand is a string or
/// boolean literal.
pub fn make_operation(left: Expr, op: ArithOp, right: Expr) -> Result<Expr> {
    optimize::fold_operation(left, op, right)
}

pub fn make_number(n: i64) -> Expr {
    Expr::Integer(n)
}

pub fn make_double(d: f64) -> Expr {
    Expr::Double(d)
}

pub fn make_string(s: impl Into<String>) -> Expr {
    Expr::String(s.into())
}

pub fn make_bool(b: bool) -> Expr {
    Expr::Boolean(b)
}
