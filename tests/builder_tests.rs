// tests/builder_tests.rs

use jaql_ast::ast::{ArithOp, BoolOp, CmpOp, Expr, Predicate, SortKeys, Stage, StageKind, Var};
use jaql_ast::builder::*;
use jaql_ast::error::BuildError;

// Helper functions to build trees for testing
fn var(name: &str) -> Var {
    make_varname(name)
}

fn path(name: &str, segments: &[&str]) -> Var {
    segments
        .iter()
        .fold(make_varname(name), |v, s| append_varname(v, *s))
}

fn eq(left: Expr, right: Expr) -> Predicate {
    make_pred(left, CmpOp::Equal, right)
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_append_varname_builds_left_to_right() {
    let v = append_varname(append_varname(make_varname("a"), "b"), "c");
    assert_eq!(v.name, "a");
    assert_eq!(v.path, vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn test_pair_named_after_last_segment() {
    let pair = make_pair_from_var(path("x", &["user", "email"]));
    assert_eq!(pair.name, "email");
    assert_eq!(pair.value, Expr::Var(path("x", &["user", "email"])));
}

#[test]
fn test_pair_from_bare_var_uses_root_name() {
    let pair = make_pair_from_var(var("x"));
    assert_eq!(pair.name, "x");
}

#[test]
fn test_explicit_pair_name_wins() {
    let pair = make_pair("total", Expr::Var(path("x", &["price"])));
    assert_eq!(pair.name, "total");
}

#[test]
fn test_chains_keep_insertion_order() {
    let pairs = append_pair(vec![make_pair("a", make_number(1))], make_pair("b", make_number(2)));
    let pairs = append_pair(pairs, make_pair("c", make_number(3)));
    let names: Vec<_> = pairs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let elems = append_elem(append_elem(vec![make_number(1)], make_string("two")), make_bool(true));
    assert_eq!(
        make_json_array(elems),
        Expr::Array(vec![
            Expr::Integer(1),
            Expr::String("two".into()),
            Expr::Boolean(true)
        ])
    );
}

#[test]
fn test_output_variants() {
    assert_eq!(make_json_output(Some("out".into())), Stage::Output(Some("out".into())));
    assert_eq!(make_json_output(None), Stage::Output(None));
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_fold_integers() {
    let e = make_operation(make_number(2), ArithOp::Plus, make_number(3)).unwrap();
    assert_eq!(e, Expr::Integer(5));
}

#[test]
fn test_fold_promotes_to_double() {
    let e = make_operation(make_number(2), ArithOp::Plus, make_double(3.0)).unwrap();
    assert_eq!(e, Expr::Double(5.0));

    let e = make_operation(make_double(1.5), ArithOp::Multiply, make_number(4)).unwrap();
    assert_eq!(e, Expr::Double(6.0));
}

#[test]
fn test_fold_all_operators() {
    let fold = |op| make_operation(make_number(12), op, make_number(4)).unwrap();
    assert_eq!(fold(ArithOp::Plus), Expr::Integer(16));
    assert_eq!(fold(ArithOp::Minus), Expr::Integer(8));
    assert_eq!(fold(ArithOp::Multiply), Expr::Integer(48));
    assert_eq!(fold(ArithOp::Divide), Expr::Integer(3));
}

#[test]
fn test_string_operand_is_error() {
    let err = make_operation(make_string("a"), ArithOp::Plus, make_number(1)).unwrap_err();
    assert_eq!(err, BuildError::ArithmeticOnNonNumeric);
    assert_eq!(
        err.to_string(),
        "cannot perform arithmetic on string or boolean values"
    );
}

#[test]
fn test_boolean_operand_is_error_even_next_to_variable() {
    let err = make_operation(Expr::Var(var("x")), ArithOp::Minus, make_bool(true)).unwrap_err();
    assert_eq!(err, BuildError::ArithmeticOnNonNumeric);
}

#[test]
fn test_variable_moved_to_left() {
    let e = make_operation(make_number(5), ArithOp::Plus, Expr::Var(var("x"))).unwrap();
    assert_eq!(
        e,
        Expr::Operation {
            left: Box::new(Expr::Var(var("x"))),
            op: ArithOp::Plus,
            right: Box::new(Expr::Integer(5)),
        }
    );
}

#[test]
fn test_nested_operation_moved_to_left() {
    let inner = make_operation(Expr::Var(path("x", &["a"])), ArithOp::Multiply, make_number(2)).unwrap();
    let e = make_operation(make_double(0.5), ArithOp::Multiply, inner.clone()).unwrap();

    match e {
        Expr::Operation { left, op, right } => {
            assert_eq!(*left, inner);
            assert_eq!(op, ArithOp::Multiply);
            assert_eq!(*right, Expr::Double(0.5));
        }
        other => panic!("Expected operation, got {:?}", other),
    }
}

#[test]
fn test_variable_on_left_untouched() {
    let e = make_operation(Expr::Var(var("x")), ArithOp::Divide, make_number(2)).unwrap();
    assert!(matches!(
        e,
        Expr::Operation {
            op: ArithOp::Divide,
            ref left,
            ..
        } if matches!(**left, Expr::Var(_))
    ));
}

#[test]
fn test_literal_left_of_division_kept() {
    let e = make_operation(make_number(10), ArithOp::Divide, Expr::Var(path("x", &["n"]))).unwrap();
    assert_eq!(
        e,
        Expr::Operation {
            left: Box::new(Expr::Integer(10)),
            op: ArithOp::Divide,
            right: Box::new(Expr::Var(path("x", &["n"]))),
        }
    );
}

// ============================================================================
// Predicates
// ============================================================================

#[test]
fn test_cpred_shortcut_returns_predicate() {
    let pred = eq(Expr::Var(var("x")), make_number(1));
    assert_eq!(make_cpred(None, pred.clone()), pred);
}

#[test]
fn test_not_equal_rewrite() {
    let rewritten = make_not(eq(Expr::Var(var("x")), make_number(1)));
    assert_eq!(
        rewritten,
        make_pred(Expr::Var(var("x")), CmpOp::NotEqual, make_number(1))
    );
}

#[test]
fn test_not_over_other_comparison_wraps() {
    let pred = make_pred(Expr::Var(var("x")), CmpOp::Less, make_number(1));
    let wrapped = make_not(pred.clone());
    assert_eq!(
        wrapped,
        Predicate::Compound {
            left: None,
            op: BoolOp::Not,
            right: Box::new(pred),
        }
    );
}

#[test]
fn test_and_chain() {
    let a = eq(Expr::Var(path("x", &["a"])), make_number(1));
    let b = eq(Expr::Var(path("x", &["b"])), make_number(2));
    let c = make_cpred(Some((a.clone(), BoolOp::And)), b.clone());
    assert_eq!(
        c,
        Predicate::Compound {
            left: Some(Box::new(a)),
            op: BoolOp::And,
            right: Box::new(b),
        }
    );
}

#[test]
fn test_or_chain_is_left_nested() {
    let a = eq(Expr::Var(path("x", &["a"])), make_number(1));
    let b = eq(Expr::Var(path("x", &["b"])), make_number(2));
    let c = eq(Expr::Var(path("x", &["c"])), make_number(3));

    let ab = make_cpred(Some((a, BoolOp::Or)), b);
    let abc = make_cpred(Some((ab.clone(), BoolOp::Or)), c.clone());
    match abc {
        Predicate::Compound { left, op, right } => {
            assert_eq!(left.as_deref(), Some(&ab));
            assert_eq!(op, BoolOp::Or);
            assert_eq!(*right, c);
        }
        other => panic!("Expected compound, got {:?}", other),
    }
}

#[test]
fn test_not_over_compound_wraps() {
    let a = eq(Expr::Var(path("x", &["a"])), make_number(1));
    let b = eq(Expr::Var(path("x", &["b"])), make_number(2));
    let both = make_cpred(Some((a, BoolOp::And)), b);

    let negated = make_not(both.clone());
    assert_eq!(
        negated,
        Predicate::Compound {
            left: None,
            op: BoolOp::Not,
            right: Box::new(both),
        }
    );
}

// ============================================================================
// Stages
// ============================================================================

#[test]
fn test_identity_transform_elided() {
    for name in ["x", "$", "each_item"] {
        assert_eq!(make_jaql_transform(var(name), Expr::Var(var(name))), Ok(None));
    }
}

#[test]
fn test_path_template_is_not_identity() {
    let stage = make_jaql_transform(var("x"), Expr::Var(path("x", &["a"]))).unwrap();
    assert!(matches!(stage, Some(Stage::Transform { .. })));
}

#[test]
fn test_transform_unknown_variable() {
    let tmpl = make_json_object(vec![
        make_pair_from_var(path("x", &["a"])),
        make_pair("b", make_operation(Expr::Var(path("y", &["b"])), ArithOp::Plus, make_number(1)).unwrap()),
    ]);
    let err = make_jaql_transform(var("x"), tmpl).unwrap_err();
    assert_eq!(err.to_string(), "transform: unknown variable: y");
}

#[test]
fn test_transform_with_only_bound_var_and_literals() {
    let tmpl = make_json_array(vec![
        Expr::Var(path("x", &["a"])),
        make_number(1),
        make_string("s"),
        make_json("{\"k\": 1}"),
    ]);
    assert!(make_jaql_transform(var("x"), tmpl).unwrap().is_some());
}

#[test]
fn test_filter_unknown_variable() {
    let pred = make_cpred(
        Some((eq(Expr::Var(path("x", &["a"])), make_number(1)), BoolOp::Or)),
        eq(Expr::Var(path("z", &["a"])), make_number(2)),
    );
    let err = make_jaql_filter(var("x"), pred).unwrap_err();
    assert_eq!(
        err,
        BuildError::UnknownVariable {
            stage: StageKind::Filter,
            name: "z".into()
        }
    );
}

#[test]
fn test_expand_defaults_to_bound_variable() {
    let stage = make_jaql_expand(var("x"), None).unwrap();
    assert_eq!(
        stage,
        Stage::Expand {
            var: var("x"),
            expr: var("x"),
        }
    );
}

#[test]
fn test_expand_path_of_bound_variable() {
    let stage = make_jaql_expand(var("x"), Some(path("x", &["items"]))).unwrap();
    assert!(matches!(stage, Stage::Expand { ref expr, .. } if expr.path == vec!["items".to_string()]));
}

#[test]
fn test_expand_unknown_variable() {
    let err = make_jaql_expand(var("x"), Some(path("y", &["items"]))).unwrap_err();
    assert_eq!(err.to_string(), "expand: unknown variable: y");
}

#[test]
fn test_sort_checks_every_key() {
    let keys = append_sort_arg(
        append_sort_arg(
            make_sort_arg(path("x", &["a"]), true),
            make_sort_arg(path("x", &["b"]), false),
        ),
        make_sort_arg(path("w", &["c"]), true),
    );
    let err = make_jaql_sort(var("x"), keys).unwrap_err();
    assert_eq!(err.to_string(), "sort: unknown variable: w");
}

#[test]
fn test_sort_valid() {
    let keys = append_sort_arg(
        make_sort_arg(path("x", &["a"]), true),
        make_sort_arg(path("x", &["b"]), false),
    );
    match make_jaql_sort(var("x"), keys).unwrap() {
        Stage::Sort { keys, .. } => {
            assert_eq!(keys.len(), 2);
            assert!(keys[0].ascending);
            assert!(!keys[1].ascending);
        }
        other => panic!("Expected sort, got {:?}", other),
    }
}

#[test]
fn test_sort_single_key() {
    let stage = make_jaql_sort(var("x"), make_sort_arg(path("x", &["a"]), false)).unwrap();
    match stage {
        Stage::Sort { keys, .. } => {
            assert_eq!(keys.len(), 1);
            assert_eq!(keys[0].var, path("x", &["a"]));
        }
        other => panic!("Expected sort, got {:?}", other),
    }
}

#[test]
fn test_sort_keys_start_from_first_key() {
    let keys = SortKeys::new(make_sort_arg(path("x", &["a"]), true));
    assert!(!keys.is_empty());

    let keys = append_sort_arg(keys, make_sort_arg(path("x", &["b"]), true));
    let order: Vec<_> = keys.iter().map(|k| k.var.path[0].as_str()).collect();
    assert_eq!(order, vec!["a", "b"]);
}

#[test]
fn test_top_limits() {
    assert_eq!(make_jaql_top(0), Ok(Stage::Top(0)));
    assert_eq!(make_jaql_top(5), Ok(Stage::Top(5)));

    let err = make_jaql_top(-1).unwrap_err();
    assert_eq!(err, BuildError::InvalidLimit(-1));
    assert_eq!(err.to_string(), "top: invalid limit: -1");
}
