//! Plan printing for built statement trees.
//!
//! Two renderings are supported:
//!
//! - **Canonical** via [`to_plan_canonical()`] - every node spelled out by
//!   kind with explicit nesting, e.g. `j_filter( j_var( x ) , ... ) `
//! - **Surface** via [`to_plan()`] - an echo of the query syntax, e.g.
//!   `as x -> filter: x.a == 1 `
//!
//! Both are read-only walks over the tree in chain order. Every token is
//! followed by a single space, which downstream consumers rely on; the
//! output is reproduced character for character.
//!
//! # Examples
//!
//! ```
//! use jaql_ast::builder::*;
//! use jaql_ast::printer::{to_plan, to_plan_canonical};
//!
//! let pipe = make_pipe(make_source(make_varname("$in").into()));
//! let pipe = append_pipe(pipe, make_jaql_top(5).map(Some)).unwrap();
//!
//! assert_eq!(to_plan(&pipe), "$in -> top: 5 ");
//! assert_eq!(to_plan_canonical(&pipe), "j_var( $in ) j_top( 5 ) ");
//! ```

use std::fmt::{self, Write};

use crate::{
    ast::{Expr, Pair, Pipeline, Predicate, SortKey, Stage, Var},
    error::{BuildError, Result},
};

pub struct PlanPrinter {
    canonical: bool,
}

impl PlanPrinter {
    pub fn new(canonical: bool) -> Self {
        PlanPrinter { canonical }
    }

    pub fn print(&self, pipe: &Pipeline) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_pipeline(&mut out, pipe);
        out
    }

    /// Render a statement that may have failed to build.
    pub fn print_result(&self, result: &Result<Pipeline>) -> String {
        let mut out = String::new();
        let _ = match result {
            Ok(pipe) => self.write_pipeline(&mut out, pipe),
            Err(e) => self.write_error(&mut out, e),
        };
        out
    }

    pub fn write_pipeline<W: Write>(&self, out: &mut W, pipe: &Pipeline) -> fmt::Result {
        for stage in pipe.stages() {
            self.write_stage(out, stage)?;
        }
        Ok(())
    }

    pub fn write_stage<W: Write>(&self, out: &mut W, stage: &Stage) -> fmt::Result {
        match stage {
            Stage::Source(expr) => self.write_expr(out, expr),
            Stage::Filter { var, predicate } => {
                self.write_loop(out, "filter", var)?;
                self.write_predicate(out, predicate)?;
                self.close_loop(out)
            }
            Stage::Transform { var, template } => {
                self.write_loop(out, "transform", var)?;
                self.write_expr(out, template)?;
                self.close_loop(out)
            }
            Stage::Expand { var, expr } => {
                self.write_loop(out, "expand", var)?;
                self.write_var(out, expr)?;
                self.close_loop(out)
            }
            Stage::Sort { var, keys } => {
                if self.canonical {
                    out.write_str("j_sort( ")?;
                    self.write_var(out, var)?;
                    out.write_str(", ( ")?;
                    self.write_sort_keys(out, keys)?;
                    out.write_str(") ) ")
                } else {
                    out.write_str("as ")?;
                    self.write_var(out, var)?;
                    out.write_str("-> sort: [ ")?;
                    self.write_sort_keys(out, keys)?;
                    out.write_str("] ")
                }
            }
            Stage::Top(n) => {
                if self.canonical {
                    write!(out, "j_top( {} ) ", n)
                } else {
                    write!(out, "-> top: {} ", n)
                }
            }
            Stage::Output(Some(name)) => {
                if self.canonical {
                    write!(out, "j_output_var( {} ) ", name)
                } else {
                    write!(out, "=> {} ", name)
                }
            }
            Stage::Output(None) => {
                if self.canonical {
                    out.write_str("j_output() ")
                } else {
                    out.write_str("=> <result> ")
                }
            }
        }
    }

    // `j_<stage>( var, ` or `as var -> <stage>: `
    fn write_loop<W: Write>(&self, out: &mut W, stage: &str, var: &Var) -> fmt::Result {
        if self.canonical {
            write!(out, "j_{}( ", stage)?;
            self.write_var(out, var)?;
            out.write_str(", ")
        } else {
            out.write_str("as ")?;
            self.write_var(out, var)?;
            write!(out, "-> {}: ", stage)
        }
    }

    fn close_loop<W: Write>(&self, out: &mut W) -> fmt::Result {
        if self.canonical {
            out.write_str(") ")?;
        }
        Ok(())
    }

    fn write_sort_keys<W: Write>(&self, out: &mut W, keys: &[SortKey]) -> fmt::Result {
        for key in keys {
            let order = if key.ascending { "asc " } else { "desc " };
            if self.canonical {
                out.write_str("j_sort_arg( ")?;
                self.write_var(out, &key.var)?;
                out.write_str(", ")?;
                out.write_str(order)?;
                out.write_str(") ")?;
            } else {
                self.write_var(out, &key.var)?;
                out.write_str(order)?;
            }
        }
        Ok(())
    }

    pub fn write_predicate<W: Write>(&self, out: &mut W, pred: &Predicate) -> fmt::Result {
        match pred {
            Predicate::Compare { left, op, right } => {
                if self.canonical {
                    out.write_str("j_pred( ")?;
                    self.write_expr(out, left)?;
                    write!(out, ", {} , ", op)?;
                    self.write_expr(out, right)?;
                    out.write_str(") ")
                } else {
                    self.write_expr(out, left)?;
                    write!(out, "{} ", op)?;
                    self.write_expr(out, right)
                }
            }
            Predicate::Compound { left, op, right } => {
                if self.canonical {
                    out.write_str("j_cmpnd( ")?;
                    if let Some(left) = left {
                        self.write_predicate(out, left)?;
                    }
                    write!(out, ", {} , ", op)?;
                    self.write_predicate(out, right)?;
                    out.write_str(") ")
                } else {
                    out.write_str("( ")?;
                    if let Some(left) = left {
                        self.write_predicate(out, left)?;
                    }
                    write!(out, "{} ", op)?;
                    self.write_predicate(out, right)?;
                    out.write_str(") ")
                }
            }
        }
    }

    pub fn write_expr<W: Write>(&self, out: &mut W, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Json(s) => {
                if self.canonical {
                    write!(out, "j_json( {} ) ", s)
                } else {
                    write!(out, "{} ", s)
                }
            }
            Expr::Object(pairs) => {
                out.write_str(if self.canonical { "j_json_obj( " } else { "{ " })?;
                self.write_pairs(out, pairs)?;
                out.write_str(if self.canonical { ") " } else { "} " })
            }
            Expr::Array(elems) => {
                out.write_str(if self.canonical { "j_json_arr( " } else { "[ " })?;
                for elem in elems {
                    self.write_expr(out, elem)?;
                }
                out.write_str(if self.canonical { ") " } else { "] " })
            }
            Expr::Var(var) => self.write_var(out, var),
            Expr::Operation { left, op, right } => {
                if self.canonical {
                    out.write_str("j_operation( ")?;
                    self.write_expr(out, left)?;
                    write!(out, ", {} , ", op)?;
                    self.write_expr(out, right)?;
                    out.write_str(") ")
                } else {
                    out.write_str("( ")?;
                    self.write_expr(out, left)?;
                    write!(out, "{} ", op)?;
                    self.write_expr(out, right)?;
                    out.write_str(") ")
                }
            }
            Expr::Integer(n) => write!(out, "{} ", n),
            // `%f` spelling; Rust would print `NaN` and drop the sign
            Expr::Double(d) if d.is_nan() => {
                out.write_str(if d.is_sign_negative() { "-nan " } else { "nan " })
            }
            Expr::Double(d) => write!(out, "{:.6} ", d),
            Expr::String(s) => write!(out, "'{}' ", s),
            Expr::Boolean(b) => write!(out, "{} ", b),
        }
    }

    fn write_pairs<W: Write>(&self, out: &mut W, pairs: &[Pair]) -> fmt::Result {
        for (i, pair) in pairs.iter().enumerate() {
            if self.canonical {
                write!(out, "j_pair( \"{}\", ", pair.name)?;
                self.write_expr(out, &pair.value)?;
                out.write_str(") ")?;
            } else {
                write!(out, "\"{}\": ", pair.name)?;
                self.write_expr(out, &pair.value)?;
                if i + 1 < pairs.len() {
                    out.write_str(", ")?;
                }
            }
        }
        Ok(())
    }

    /// Canonical form nests one `j_var` per path segment:
    /// `j_var( x. j_var( a ) ) `. Surface form joins with dots: `x.a `.
    pub fn write_var<W: Write>(&self, out: &mut W, var: &Var) -> fmt::Result {
        if self.canonical {
            write_var_canonical(out, &var.name, &var.path)
        } else {
            out.write_str(&var.name)?;
            for segment in &var.path {
                write!(out, ".{}", segment)?;
            }
            out.write_char(' ')
        }
    }

    pub fn write_error<W: Write>(&self, out: &mut W, err: &BuildError) -> fmt::Result {
        if self.canonical {
            write!(out, "j_error( {} )", err)
        } else {
            writeln!(out, "!{}", err)
        }
    }
}

fn write_var_canonical<W: Write>(out: &mut W, name: &str, rest: &[String]) -> fmt::Result {
    match rest.split_first() {
        Some((next, tail)) => {
            write!(out, "j_var( {}. ", name)?;
            write_var_canonical(out, next, tail)?;
        }
        None => write!(out, "j_var( {} ", name)?,
    }
    out.write_str(") ")
}

// Convenience functions

/// Renders a pipeline in surface form.
pub fn to_plan(pipe: &Pipeline) -> String {
    PlanPrinter::new(false).print(pipe)
}

/// Renders a pipeline in canonical form.
pub fn to_plan_canonical(pipe: &Pipeline) -> String {
    PlanPrinter::new(true).print(pipe)
}
