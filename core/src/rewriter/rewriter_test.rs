//! Tests for negation push-down and disjunctive normal form

use super::*;
use crate::expression::Expression;
use crate::test_utils::{REGISTRY, c, call, p};

fn pushed(expr: &Expression) -> Expression {
    push_down_not(expr, &REGISTRY)
        .unwrap_or_else(|e| panic!("push_down_not({}) failed: {}", expr, e))
}

fn dnf(expr: &Expression) -> Expression {
    disjunctive_normal_form(expr, &REGISTRY, &RewriteOptions::default())
        .unwrap_or_else(|e| panic!("dnf({}) failed: {}", expr, e))
}

fn assert_same(actual: &Expression, expected: &Expression) {
    assert!(actual.deep_equals(expected), "expected {}, got {}", expected, actual);
}

#[test]
fn test_de_morgan_without_negations() {
    let expr = call!("!", call!("&&", p("a"), p("b")));
    let expected = call!("||", call!("!", p("a")), call!("!", p("b")));
    assert_same(&pushed(&expr), &expected);
}

#[test]
fn test_de_morgan_with_negation_partners() {
    let expr = call!("!", call!("&&", call!("<", p("a"), c(1)), call!("==", p("b"), c("x"))));
    let expected = call!("||", call!(">=", p("a"), c(1)), call!("!=", p("b"), c("x")));
    assert_same(&pushed(&expr), &expected);

    let expr = call!("!", call!("||", call!(">", p("a"), c(1)), call!("<=", p("b"), c(2))));
    let expected = call!("&&", call!("<=", p("a"), c(1)), call!(">", p("b"), c(2)));
    assert_same(&pushed(&expr), &expected);
}

#[test]
fn test_double_negation_cancels() {
    let expr = call!("!", call!("!", call!("<", p("a"), c(1))));
    assert_same(&pushed(&expr), &call!("<", p("a"), c(1)));
}

#[test]
fn test_exists_becomes_null_comparison() {
    assert_same(&pushed(&call!("exists", p("a"))), &call!("!=", p("a"), c(Value::Null)));
    assert_same(
        &pushed(&call!("!", call!("exists", p("a")))),
        &call!("==", p("a"), c(Value::Null)),
    );
}

#[test]
fn test_markers_pass_negation_through() {
    let expr = call!("!", call!("optional", call!("==", p("a"), c(1))));
    let expected = call!("optional", call!("!=", p("a"), c(1)));
    assert_same(&pushed(&expr), &expected);
}

#[test]
fn test_leaves_without_negation_are_untouched() {
    let expr = call!("&&", p("a"), call!("contains", p("items"), c("x")));
    assert_same(&pushed(&expr), &expr);
    assert_same(&pushed(&call!("!", c(true))), &c(false));
}

#[test]
fn test_dnf_distributes_and_over_or() {
    let expr = call!("&&", call!("||", p("a"), p("b")), p("c"));
    let expected = call!("||", call!("&&", p("a"), p("c")), call!("&&", p("b"), p("c")));
    assert_same(&dnf(&expr), &expected);
}

#[test]
fn test_dnf_cross_product() {
    let expr = call!("&&", call!("||", p("a"), p("b")), call!("||", p("c"), p("d")));
    let result = dnf(&expr);
    assert_eq!(result.expr_type(), "||");
    assert_eq!(result.children().len(), 4);
    for clause in result.children() {
        assert_eq!(clause.expr_type(), "&&");
        assert_eq!(clause.children().len(), 2);
    }
}

#[test]
fn test_dnf_constants() {
    let expr = call!("&&", p("a"), c(false));
    assert_same(&dnf(&expr), &c(false));

    let expr = call!("||", c(false), p("a"));
    assert_same(&dnf(&expr), &p("a"));

    let expr = call!("||", c(true), p("a"));
    assert_same(&dnf(&expr), &call!("||", c(true), p("a")));

    let expr = call!("&&", c(true), p("a"));
    assert_same(&dnf(&expr), &p("a"));
}

#[test]
fn test_dnf_pushes_negation_first() {
    let expr = call!("!", call!("||", p("a"), call!("&&", p("b"), p("c"))));
    let expected = call!(
        "||",
        call!("&&", call!("!", p("a")), call!("!", p("b"))),
        call!("&&", call!("!", p("a")), call!("!", p("c")))
    );
    assert_same(&dnf(&expr), &expected);
}

#[test]
fn test_dnf_clause_limit() {
    let pair = |x: &str, y: &str| call!("||", p(x), p(y));
    let expr = call!("&&", pair("a", "b"), pair("c", "d"), pair("e", "f"));
    let bounded = RewriteOptions { max_clauses: Some(4) };
    let err = disjunctive_normal_form(&expr, &REGISTRY, &bounded).unwrap_err();
    assert_eq!(err, RewriteError::TooManyClauses { limit: 4 });
    assert_eq!(err.to_string(), "Disjunctive normal form needs more than 4 clauses.");

    let unbounded = RewriteOptions { max_clauses: None };
    let normal = disjunctive_normal_form(&expr, &REGISTRY, &unbounded).unwrap();
    assert_eq!(normal.children().len(), 8);
}

#[test]
fn test_malformed_nodes_are_rejected() {
    let empty_not = Expression::new(&REGISTRY, "!", vec![]).unwrap();
    assert!(push_down_not(&empty_not, &REGISTRY).is_err());

    let empty_exists = Expression::new(&REGISTRY, "exists", vec![]).unwrap();
    let tree = call!("&&", p("a"), empty_exists);
    assert!(push_down_not(&tree, &REGISTRY).is_err());
    assert!(disjunctive_normal_form(&tree, &REGISTRY, &RewriteOptions::default()).is_err());
}
