//! Tests for expression construction, display, equality and references

use super::*;
use crate::evaluator::Registry;
use crate::memory::SimpleObjectMemory;
use crate::test_utils::{REGISTRY, c, call, elem, eval, p, scope};
use pretty_assertions::assert_eq;
use serde::Deserialize;

fn sorted_refs(expr: &Expression) -> Vec<String> {
    let mut refs = expr.references();
    refs.sort();
    refs
}

#[test]
fn test_make_unknown_function() {
    let err = Expression::make(&REGISTRY, "frobnicate", vec![c(1)]).unwrap_err();
    assert_eq!(err, ExpressionError::UnknownFunction("frobnicate".to_string()));
    assert_eq!(
        err.to_string(),
        "frobnicate does not have an evaluator, it's not a built-in function or a custom function."
    );
}

#[test]
fn test_make_validates_children() {
    let err = Expression::make(&REGISTRY, "+", vec![c(1), c(true)]).unwrap_err();
    assert!(matches!(err, ExpressionError::InvalidArgument(_)), "{:?}", err);

    // `new` skips validation; `validate` reports the same problem later.
    let unchecked = Expression::new(&REGISTRY, "+", vec![c(1), c(true)]).unwrap();
    assert_eq!(unchecked.validate(), Err(err));
}

#[test]
fn test_unvalidated_nodes_fail_instead_of_dispatching() {
    for name in ["!", "if", "foreach", "Element", "mod", "substring", "Accessor"] {
        let unchecked = Expression::new(&REGISTRY, name, vec![]).unwrap();
        let expected = unchecked.validate().unwrap_err();
        assert_eq!(
            eval(&unchecked, &scope()).unwrap_err().message(),
            expected.to_string(),
            "{}",
            name
        );
        assert_eq!(unchecked.ensure_valid(), Err(expected));
    }

    // A malformed node deep in a validated tree fails when reached.
    let inner = Expression::new(&REGISTRY, "!", vec![]).unwrap();
    let outer = call!("jsonStringify", inner);
    assert!(eval(&outer, &scope()).is_err());

    let well_formed = Expression::new(&REGISTRY, "+", vec![c(1), c(2)]).unwrap();
    assert_eq!(eval(&well_formed, &scope()), Ok(Value::Integer(3)));
}

#[test]
fn test_validate_tree_reaches_descendants() {
    let bad = Expression::new(&REGISTRY, "length", vec![c(1), c(2)]).unwrap();
    let root = Expression::new(&REGISTRY, "jsonStringify", vec![bad]).unwrap();
    assert!(root.validate().is_ok());
    assert!(root.validate_tree().is_err());
}

#[test]
fn test_aliases_bind_canonical_evaluator() {
    let expr = call!("add", c(1), c(2));
    assert_eq!(expr.expr_type(), "+");
    assert_eq!(expr.to_string(), "(1 + 2)");
}

#[test]
fn test_display() {
    assert_eq!(p("bag.name").to_string(), "bag.name");
    assert_eq!(elem(p("items"), c(1)).to_string(), "items[1]");
    assert_eq!(elem(p("bag"), c("name")).to_string(), "bag['name']");
    assert_eq!(call!("concat", c("it's"), p("x")).to_string(), "concat('it\\'s', x)");
    assert_eq!(call!("!", call!("&&", p("a"), p("b"))).to_string(), "!((a && b))");
    assert_eq!(c(Value::Null).to_string(), "null");
    assert_eq!(format!("{:?}", c(2.5)), "Expression(2.5)");
}

#[test]
fn test_constants() {
    let constant = c("hello");
    assert!(constant.is_constant());
    assert_eq!(constant.constant_text(), Some("hello"));
    assert_eq!(constant.return_type(), ReturnType::STRING);
    assert_eq!(c(1).return_type(), ReturnType::NUMBER);
    assert_eq!(c(true).return_type(), ReturnType::BOOLEAN);
    assert_eq!(eval(&constant, &scope()), Ok(Value::text("hello")));
}

#[test]
fn test_and_or_collapse_single_child() {
    let single = Expression::and(&REGISTRY, vec![p("a")]).unwrap();
    assert!(single.deep_equals(&p("a")));
    let single = Expression::or(&REGISTRY, vec![p("b")]).unwrap();
    assert!(single.deep_equals(&p("b")));
    let both = Expression::or(&REGISTRY, vec![p("a"), p("b")]).unwrap();
    assert_eq!(both.expr_type(), "||");
}

#[test]
fn test_deep_equals() {
    let a = call!("&&", call!("<", p("x"), c(1)), p("y"));
    let b = call!("&&", p("y"), call!("<", p("x"), c(1)));
    assert!(a.deep_equals(&b), "&& ignores child order");

    let lt = call!("<", p("x"), c(1));
    let gt = call!("<", c(1), p("x"));
    assert!(!lt.deep_equals(&gt), "< keeps child order");

    assert!(!c(1).deep_equals(&c(1.5)));
    assert!(!c(1).deep_equals(&c("1")));
    assert!(!call!("+", c(1), c(2)).deep_equals(&call!("-", c(1), c(2))));
}

#[test]
fn test_references() {
    let expr = elem(p("bag.list"), call!("-", p("bag.index"), c(2)));
    assert_eq!(sorted_refs(&expr), vec!["bag.index", "bag.list"]);

    let expr = elem(p("bag"), c("name"));
    assert_eq!(sorted_refs(&expr), vec!["bag.name"]);

    let expr = elem(p("items"), c(0));
    assert_eq!(sorted_refs(&expr), vec!["items[0]"]);

    let expr = Expression::accessor(&REGISTRY, "x", Some(call!("first", p("items")))).unwrap();
    assert_eq!(sorted_refs(&expr), vec!["items"]);
}

#[test]
fn test_references_skip_iteration_variables() {
    let body = call!("concat", p("x.name"), p("suffix"), elem(p("x"), c(0)));
    let expr = call!("foreach", p("items"), p("x"), body);
    assert_eq!(sorted_refs(&expr), vec!["items", "suffix"]);

    let expr = call!("where", p("items"), p("item"), call!("==", p("itemCount"), c(1)));
    assert_eq!(sorted_refs(&expr), vec!["itemCount", "items"]);
}

#[test]
fn test_lambda_reads_memory() {
    let expr = Expression::lambda(|memory| Ok(memory.get("bag.name").unwrap_or_default()));
    assert_eq!(expr.expr_type(), "Lambda");
    assert_eq!(eval(&expr, &scope()), Ok(Value::text("mybag")));
    let upper = call!("toUpper", expr);
    assert_eq!(eval(&upper, &scope()), Ok(Value::text("MYBAG")));
}

#[test]
fn test_custom_evaluator_in_tree() {
    let registry = Registry::new();
    registry
        .register(Evaluator::new("double", |expr, memory, options| {
            let value: f64 = expr.children()[0].try_evaluate_as(memory, options)?;
            Ok(Value::number_from_f64(value * 2.0))
        }, ReturnType::NUMBER))
        .unwrap();
    let three = Expression::path(&registry, "bag.three").unwrap();
    let expr = Expression::make(&registry, "double", vec![three]).unwrap();
    assert_eq!(eval(&expr, &scope()), Ok(Value::Integer(6)));
}

#[test]
fn test_try_evaluate_as() {
    let memory = scope();
    let options = Options::default();
    assert_eq!(call!("+", c(2), c(3)).try_evaluate_as::<i64>(&memory, &options), Ok(5));
    assert_eq!(p("one").try_evaluate_as::<i32>(&memory, &options), Ok(1));
    assert_eq!(call!("*", c(2.5), c(2.0)).try_evaluate_as::<i64>(&memory, &options), Ok(5));
    assert_eq!(p("bag.name").try_evaluate_as::<String>(&memory, &options), Ok("mybag".to_string()));
    assert_eq!(
        p("items").try_evaluate_as::<Vec<String>>(&memory, &options),
        Ok(vec!["zero".to_string(), "one".to_string(), "two".to_string()])
    );
    assert_eq!(
        c(5.5).try_evaluate_as::<i64>(&memory, &options).unwrap_err().message(),
        "'5.5' is not of type i64"
    );
}

#[derive(Debug, PartialEq, Deserialize)]
struct Bag {
    three: f64,
    list: Vec<String>,
    name: String,
}

#[test]
fn test_try_evaluate_deserialize() {
    let memory = scope();
    let options = Options::default();
    let bag: Bag = p("bag").try_evaluate_deserialize(&memory, &options).unwrap();
    assert_eq!(
        bag,
        Bag {
            three: 3.0,
            list: vec!["red".to_string(), "blue".to_string()],
            name: "mybag".to_string(),
        }
    );
    let err = p("hello").try_evaluate_deserialize::<Bag>(&memory, &options).unwrap_err();
    assert_eq!(err.message(), "'hello' is not of type Bag");
}

#[test]
fn test_trees_are_shareable_across_threads() {
    let expr = call!("concat", p("hello"), c(" "), p("world"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let expr = expr.clone();
            std::thread::spawn(move || {
                let memory = SimpleObjectMemory::from_json(
                    serde_json::json!({"hello": "hi", "world": "there"}),
                );
                eval(&expr, &memory)
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(Value::text("hi there")));
    }
}
