//! Build traces: statement construction recorded as JSON.
//!
//! Query text is parsed elsewhere. To drive the constructors without a
//! grammar, a trace spells out each statement's reductions as nested JSON,
//! which is replayed bottom-up through [`crate::builder`] exactly as a
//! parser would call it.
//!
//! # Format
//!
//! ```text
//! [
//!   { "explain": "plan",
//!     "pipe": [
//!       { "source": { "var": "$in" } },
//!       { "filter": { "each": "x", "where": { "cmp": ">", "left": { "var": "x.price" }, "right": 100 } } },
//!       { "transform": { "each": "x", "into": { "object": [ { "var": "x.name" } ] } } },
//!       { "sort": { "each": "x", "by": [ { "key": "x.name", "desc": true } ] } },
//!       { "top": 3 },
//!       { "output": "out" }
//!     ] }
//! ]
//! ```
//!
//! Values are JSON scalars, arrays, `{"var": "x.a"}`, `{"json": "<text>"}`,
//! `{"object": [...]}` and `{"op": "+", "left": .., "right": ..}`.
//! Predicates are `{"cmp": "==", "left": .., "right": ..}`, `{"not": ..}`,
//! `{"and": [..]}` and `{"or": [..]}`.
//!
//! A malformed trace is a [`TraceError`]. A well-formed statement whose
//! construction fails (unknown variable, negative limit, ...) still decodes;
//! its tree holds the [`BuildError`].

use serde_json::{Map, Value};

use crate::{
    ast::{ArithOp, BoolOp, CmpOp, Expr, Pair, Pipeline, Predicate, SortKey, SortKeys, Stage, Var},
    builder::*,
    error::{BuildError, Result},
    session::{Explain, Statement},
};

/// Errors in the shape of a trace.
#[derive(Debug)]
pub enum TraceError {
    /// Not valid JSON
    Json(serde_json::Error),
    /// Valid JSON that does not describe a statement
    Malformed(String),
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::Json(e) => write!(f, "Invalid JSON: {}", e),
            TraceError::Malformed(msg) => write!(f, "Malformed trace: {}", msg),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Json(e) => Some(e),
            TraceError::Malformed(_) => None,
        }
    }
}

impl From<serde_json::Error> for TraceError {
    fn from(e: serde_json::Error) -> Self {
        TraceError::Json(e)
    }
}

/// Either failure while replaying one statement.
enum DecodeError {
    Trace(TraceError),
    Build(BuildError),
}

impl From<TraceError> for DecodeError {
    fn from(e: TraceError) -> Self {
        DecodeError::Trace(e)
    }
}

impl From<BuildError> for DecodeError {
    fn from(e: BuildError) -> Self {
        DecodeError::Build(e)
    }
}

type Decoded<T> = std::result::Result<T, DecodeError>;

fn malformed(msg: impl Into<String>) -> TraceError {
    TraceError::Malformed(msg.into())
}

/// Parse a trace: a single statement object or an array of them.
pub fn parse_trace(text: &str) -> std::result::Result<Vec<Statement>, TraceError> {
    let value: Value = serde_json::from_str(text)?;
    match &value {
        Value::Array(stmts) => stmts.iter().map(decode_statement).collect(),
        Value::Object(_) => Ok(vec![decode_statement(&value)?]),
        _ => Err(malformed("expected a statement or an array of statements")),
    }
}

/// Replay one statement.
pub fn decode_statement(value: &Value) -> std::result::Result<Statement, TraceError> {
    let obj = value
        .as_object()
        .ok_or_else(|| malformed("statement must be an object"))?;

    let explain = match obj.get("explain").and_then(Value::as_str) {
        None | Some("execute") => Explain::Execute,
        Some("explain") => Explain::Explain,
        Some("plan") => Explain::Plan,
        Some("planf") => Explain::PlanCanonical,
        Some(other) => return Err(malformed(format!("unknown explain mode: {}", other))),
    };

    let stages = obj
        .get("pipe")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("statement needs a \"pipe\" array"))?;

    Ok(Statement::new(decode_pipe(stages)?, explain))
}

fn decode_pipe(stages: &[Value]) -> std::result::Result<Result<Pipeline>, TraceError> {
    let mut pipe: Option<Result<Pipeline>> = None;

    for value in stages {
        let stage = match decode_stage(value) {
            Ok(stage) => Ok(stage),
            Err(DecodeError::Build(e)) => Err(e),
            Err(DecodeError::Trace(e)) => return Err(e),
        };

        pipe = match (pipe, stage) {
            (Some(pipe), stage) => Some(append_pipe(pipe, stage)),
            (None, Ok(Some(first))) => Some(make_pipe(first)),
            // Elided before anything was built
            (None, Ok(None)) => None,
            (None, Err(e)) => Some(Err(e)),
        };
    }

    pipe.ok_or_else(|| malformed("pipeline has no stages"))
}

/// Split `{"tag": body}` into its single entry.
fn tagged(value: &Value) -> std::result::Result<(&str, &Value), TraceError> {
    match value.as_object() {
        Some(obj) if obj.len() == 1 => obj
            .iter()
            .next()
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| malformed("empty object")),
        _ => Err(malformed(format!("expected a single-key object, got {}", value))),
    }
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> std::result::Result<&'a Value, TraceError> {
    obj.get(name)
        .ok_or_else(|| malformed(format!("missing field \"{}\"", name)))
}

fn as_object(value: &Value) -> std::result::Result<&Map<String, Value>, TraceError> {
    value
        .as_object()
        .ok_or_else(|| malformed(format!("expected an object, got {}", value)))
}

fn as_str(value: &Value) -> std::result::Result<&str, TraceError> {
    value
        .as_str()
        .ok_or_else(|| malformed(format!("expected a string, got {}", value)))
}

fn decode_stage(value: &Value) -> Decoded<Option<Stage>> {
    let (tag, body) = tagged(value)?;

    match tag {
        "source" => Ok(Some(make_source(decode_expr(body)?))),

        "filter" => {
            let obj = as_object(body)?;
            let var = make_varname(as_str(field(obj, "each")?)?);
            let pred = decode_pred(field(obj, "where")?)?;
            Ok(Some(make_jaql_filter(var, pred)?))
        }

        "transform" => {
            let obj = as_object(body)?;
            let var = make_varname(as_str(field(obj, "each")?)?);
            let tmpl = decode_expr(field(obj, "into")?)?;
            Ok(make_jaql_transform(var, tmpl)?)
        }

        "expand" => {
            let obj = as_object(body)?;
            let var = make_varname(as_str(field(obj, "each")?)?);
            let expr = match obj.get("expr") {
                None | Some(Value::Null) => None,
                Some(v) => Some(decode_path(as_str(v)?)?),
            };
            Ok(Some(make_jaql_expand(var, expr)?))
        }

        "sort" => {
            let obj = as_object(body)?;
            let var = make_varname(as_str(field(obj, "each")?)?);
            let mut keys = field(obj, "by")?
                .as_array()
                .ok_or_else(|| malformed("sort \"by\" must be an array"))?
                .iter()
                .map(decode_sort_key);
            let first = keys
                .next()
                .ok_or_else(|| malformed("sort \"by\" needs at least one key"))??;
            let keys = keys.try_fold(SortKeys::new(first), |keys, key| {
                key.map(|key| append_sort_arg(keys, key))
            })?;
            Ok(Some(make_jaql_sort(var, keys)?))
        }

        "top" => {
            let n = body
                .as_i64()
                .ok_or_else(|| malformed(format!("top count must be an integer, got {}", body)))?;
            Ok(Some(make_jaql_top(n)?))
        }

        "output" => match body {
            Value::Null => Ok(Some(make_json_output(None))),
            v => Ok(Some(make_json_output(Some(as_str(v)?.to_string())))),
        },

        other => Err(malformed(format!("unknown stage: {}", other)).into()),
    }
}

fn decode_sort_key(value: &Value) -> std::result::Result<SortKey, TraceError> {
    let obj = as_object(value)?;
    let var = decode_path(as_str(field(obj, "key")?)?)?;
    let descending = obj.get("desc").and_then(Value::as_bool).unwrap_or(false);
    Ok(make_sort_arg(var, !descending))
}

/// `x.a.b` as a variable with a two-segment path.
fn decode_path(text: &str) -> std::result::Result<Var, TraceError> {
    let mut segments = text.split('.');
    let root = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed(format!("invalid variable path: {:?}", text)))?;

    segments.try_fold(make_varname(root), |var, segment| {
        if segment.is_empty() {
            Err(malformed(format!("invalid variable path: {:?}", text)))
        } else {
            Ok(append_varname(var, segment))
        }
    })
}

fn decode_expr(value: &Value) -> Decoded<Expr> {
    match value {
        Value::Null => Ok(make_json("null")),
        Value::Bool(b) => Ok(make_bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(make_number(i)),
            None => n
                .as_f64()
                .map(make_double)
                .ok_or_else(|| malformed(format!("unrepresentable number: {}", n)).into()),
        },
        Value::String(s) => Ok(make_string(s.clone())),
        Value::Array(elems) => {
            let elems = elems.iter().try_fold(Vec::new(), |elems, v| {
                decode_expr(v).map(|elem| append_elem(elems, elem))
            })?;
            Ok(make_json_array(elems))
        }
        Value::Object(obj) => {
            if obj.contains_key("op") {
                let op = as_str(field(obj, "op")?)?;
                let op = ArithOp::from_symbol(op)
                    .ok_or_else(|| malformed(format!("unknown arithmetic operator: {}", op)))?;
                let left = decode_expr(field(obj, "left")?)?;
                let right = decode_expr(field(obj, "right")?)?;
                return Ok(make_operation(left, op, right)?);
            }

            let (tag, body) = tagged(value)?;
            match tag {
                "var" => Ok(decode_path(as_str(body)?)?.into()),
                "json" => Ok(make_json(as_str(body)?)),
                "object" => {
                    let pairs = body
                        .as_array()
                        .ok_or_else(|| malformed("object fields must be an array"))?
                        .iter()
                        .try_fold(Vec::new(), |pairs, v| {
                            decode_pair(v).map(|pair| append_pair(pairs, pair))
                        })?;
                    Ok(make_json_object(pairs))
                }
                other => Err(malformed(format!("unknown value: {}", other)).into()),
            }
        }
    }
}

/// `{"name": .., "value": ..}`, or a bare `{"var": ..}` named after its
/// last path segment.
fn decode_pair(value: &Value) -> Decoded<Pair> {
    let obj = as_object(value)?;
    match obj.get("name") {
        Some(name) => {
            let name = as_str(name)?.to_string();
            Ok(make_pair(name, decode_expr(field(obj, "value")?)?))
        }
        None => {
            let var = decode_path(as_str(field(obj, "var")?)?)?;
            Ok(make_pair_from_var(var))
        }
    }
}

fn decode_pred(value: &Value) -> Decoded<Predicate> {
    let obj = as_object(value)?;

    if obj.contains_key("cmp") {
        let op = as_str(field(obj, "cmp")?)?;
        let op = CmpOp::from_symbol(op)
            .ok_or_else(|| malformed(format!("unknown comparison: {}", op)))?;
        let left = decode_expr(field(obj, "left")?)?;
        let right = decode_expr(field(obj, "right")?)?;
        return Ok(make_pred(left, op, right));
    }

    let (tag, body) = tagged(value)?;
    match tag {
        "not" => Ok(make_not(decode_pred(body)?)),
        "and" | "or" => {
            let op = if tag == "and" { BoolOp::And } else { BoolOp::Or };
            let operands = body
                .as_array()
                .filter(|ops| !ops.is_empty())
                .ok_or_else(|| malformed(format!("\"{}\" needs a non-empty array", tag)))?;

            let mut acc: Option<Predicate> = None;
            for operand in operands {
                let pred = decode_pred(operand)?;
                acc = Some(make_cpred(acc.map(|prev| (prev, op)), pred));
            }
            acc.ok_or_else(|| malformed("empty predicate list").into())
        }
        other => Err(malformed(format!("unknown predicate: {}", other)).into()),
    }
}
