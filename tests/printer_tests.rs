// tests/printer_tests.rs

use jaql_ast::ast::{ArithOp, BoolOp, CmpOp, Expr, Pipeline, Stage, Var};
use jaql_ast::builder::*;
use jaql_ast::printer::{to_plan, to_plan_canonical, PlanPrinter};

fn path(name: &str, segments: &[&str]) -> Var {
    segments
        .iter()
        .fold(make_varname(name), |v, s| append_varname(v, *s))
}

fn field(name: &str, segments: &[&str]) -> Expr {
    Expr::Var(path(name, segments))
}

fn pipe_of(stages: Vec<Stage>) -> Pipeline {
    let mut stages = stages.into_iter();
    let first = stages.next().expect("at least one stage");
    stages
        .fold(make_pipe(first), |pipe, stage| append_pipe(pipe, Ok(Some(stage))))
        .unwrap()
}

fn source(name: &str) -> Stage {
    make_source(Expr::Var(make_varname(name)))
}

// ============================================================================
// Stages
// ============================================================================

#[test]
fn test_filter_pipeline() {
    let pred = make_pred(field("x", &["a"]), CmpOp::Equal, make_number(1));
    let pipe = pipe_of(vec![
        source("$in"),
        make_jaql_filter(make_varname("x"), pred).unwrap(),
        make_jaql_top(5).unwrap(),
        make_json_output(None),
    ]);

    assert_eq!(to_plan(&pipe), "$in as x -> filter: x.a == 1 -> top: 5 => <result> ");
    assert_eq!(
        to_plan_canonical(&pipe),
        "j_var( $in ) j_filter( j_var( x ) , j_pred( j_var( x. j_var( a ) ) , == , 1 ) ) j_top( 5 ) j_output() "
    );
}

#[test]
fn test_transform_object_template() {
    let price = make_operation(field("x", &["price"]), ArithOp::Multiply, make_number(2)).unwrap();
    let tmpl = make_json_object(vec![
        make_pair_from_var(path("x", &["name"])),
        make_pair("total", price),
    ]);
    let pipe = pipe_of(vec![
        make_jaql_transform(make_varname("x"), tmpl).unwrap().unwrap(),
        make_json_output(Some("out".into())),
    ]);

    assert_eq!(
        to_plan(&pipe),
        r#"as x -> transform: { "name": x.name , "total": ( x.price * 2 ) } => out "#
    );
    assert_eq!(
        to_plan_canonical(&pipe),
        r#"j_transform( j_var( x ) , j_json_obj( j_pair( "name", j_var( x. j_var( name ) ) ) j_pair( "total", j_operation( j_var( x. j_var( price ) ) , * , 2 ) ) ) ) j_output_var( out ) "#
    );
}

#[test]
fn test_sort_keys() {
    let keys = append_sort_arg(
        make_sort_arg(path("x", &["a"]), true),
        make_sort_arg(path("x", &["b"]), false),
    );
    let pipe = pipe_of(vec![make_jaql_sort(make_varname("x"), keys).unwrap()]);

    assert_eq!(to_plan(&pipe), "as x -> sort: [ x.a asc x.b desc ] ");
    assert_eq!(
        to_plan_canonical(&pipe),
        "j_sort( j_var( x ) , ( j_sort_arg( j_var( x. j_var( a ) ) , asc ) j_sort_arg( j_var( x. j_var( b ) ) , desc ) ) ) "
    );
}

#[test]
fn test_expand_default() {
    let pipe = pipe_of(vec![make_jaql_expand(make_varname("x"), None).unwrap()]);

    assert_eq!(to_plan(&pipe), "as x -> expand: x ");
    assert_eq!(to_plan_canonical(&pipe), "j_expand( j_var( x ) , j_var( x ) ) ");
}

#[test]
fn test_deep_variable_path() {
    let pipe = pipe_of(vec![make_source(field("a", &["b", "c"]))]);

    assert_eq!(to_plan(&pipe), "a.b.c ");
    assert_eq!(to_plan_canonical(&pipe), "j_var( a. j_var( b. j_var( c ) ) ) ");
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_literals_in_array() {
    let arr = make_json_array(vec![
        make_number(1),
        make_double(2.5),
        make_string("a"),
        make_bool(true),
        make_json(r#"{"k":1}"#),
    ]);
    let pipe = pipe_of(vec![make_source(arr)]);

    assert_eq!(to_plan(&pipe), r#"[ 1 2.500000 'a' true {"k":1} ] "#);
    assert_eq!(
        to_plan_canonical(&pipe),
        r#"j_json_arr( 1 2.500000 'a' true j_json( {"k":1} ) ) "#
    );
}

#[test]
fn test_folded_double_prints_six_decimals() {
    let folded = make_operation(make_number(2), ArithOp::Plus, make_double(3.0)).unwrap();
    let pipe = pipe_of(vec![make_source(folded)]);
    assert_eq!(to_plan_canonical(&pipe), "5.000000 ");
}

#[test]
fn test_nan_prints_like_printf() {
    let pipe = pipe_of(vec![make_source(make_double(f64::NAN))]);
    assert_eq!(to_plan_canonical(&pipe), "nan ");
    assert_eq!(to_plan(&pipe), "nan ");

    let pipe = pipe_of(vec![make_source(make_double(-f64::NAN))]);
    assert_eq!(to_plan_canonical(&pipe), "-nan ");
}

#[test]
fn test_folded_zero_over_zero_prints_nan() {
    let folded = make_operation(make_double(0.0), ArithOp::Divide, make_double(0.0)).unwrap();
    let pipe = pipe_of(vec![make_source(folded)]);

    let out = to_plan_canonical(&pipe);
    assert!(out == "nan " || out == "-nan ", "got {:?}", out);
}

#[test]
fn test_infinity_prints_like_printf() {
    let pipe = pipe_of(vec![make_source(make_double(f64::NEG_INFINITY))]);
    assert_eq!(to_plan_canonical(&pipe), "-inf ");
}

// ============================================================================
// Predicates
// ============================================================================

#[test]
fn test_compound_predicate() {
    let not_less = make_not(make_pred(field("x", &["a"]), CmpOp::Less, make_number(1)));
    let pred = make_cpred(
        Some((not_less, BoolOp::And)),
        make_pred(field("x", &["b"]), CmpOp::Equal, make_number(2)),
    );
    let pipe = pipe_of(vec![make_jaql_filter(make_varname("x"), pred).unwrap()]);

    assert_eq!(
        to_plan(&pipe),
        "as x -> filter: ( ( ! x.a < 1 ) && x.b == 2 ) "
    );
    assert_eq!(
        to_plan_canonical(&pipe),
        "j_filter( j_var( x ) , j_cmpnd( j_cmpnd( , ! , j_pred( j_var( x. j_var( a ) ) , < , 1 ) ) , && , j_pred( j_var( x. j_var( b ) ) , == , 2 ) ) ) "
    );
}

#[test]
fn test_negated_equality_prints_as_inequality() {
    let negated = make_not(make_pred(field("x", &["a"]), CmpOp::Equal, make_string("v")));
    let direct = make_pred(field("x", &["a"]), CmpOp::NotEqual, make_string("v"));

    let a = pipe_of(vec![make_jaql_filter(make_varname("x"), negated).unwrap()]);
    let b = pipe_of(vec![make_jaql_filter(make_varname("x"), direct).unwrap()]);

    assert_eq!(to_plan_canonical(&a), to_plan_canonical(&b));
    assert_eq!(to_plan(&a), "as x -> filter: x.a != 'v' ");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_rendering() {
    let result = append_pipe(make_pipe(source("$in")), make_jaql_top(-1).map(Some));

    assert_eq!(
        PlanPrinter::new(true).print_result(&result),
        "j_error( top: invalid limit: -1 )"
    );
    assert_eq!(
        PlanPrinter::new(false).print_result(&result),
        "!top: invalid limit: -1\n"
    );
}

#[test]
fn test_printing_is_read_only() {
    let pred = make_pred(field("x", &["a"]), CmpOp::GreaterEqual, make_double(0.5));
    let pipe = pipe_of(vec![source("$in"), make_jaql_filter(make_varname("x"), pred).unwrap()]);
    let before = pipe.clone();

    let first = to_plan_canonical(&pipe);
    let second = to_plan_canonical(&pipe);
    assert_eq!(first, second);
    assert_eq!(pipe, before);
}

#[test]
fn test_write_into_caller_sink() {
    let mut out = String::from(">> ");
    PlanPrinter::new(false)
        .write_expr(&mut out, &make_number(42))
        .unwrap();
    assert_eq!(out, ">> 42 ");
}
