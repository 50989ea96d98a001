//! Property tests: rewriting never changes what a boolean tree evaluates to.

use adex_core::{
    Expression, Registry, RewriteOptions, api::Options, disjunctive_normal_form,
    memory::SimpleObjectMemory, push_down_not, values::Value,
};
use once_cell::sync::Lazy;
use proptest::prelude::*;

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

const VARS: usize = 3;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Tree {
    Flag(usize),
    Compare(&'static str, usize, i64),
    Exists(usize),
    Literal(bool),
    Not(Box<Tree>),
    And(Vec<Tree>),
    Or(Vec<Tree>),
}

fn leaf() -> impl Strategy<Value = Tree> {
    prop_oneof![
        (0..VARS).prop_map(Tree::Flag),
        (
            prop_oneof![Just("<"), Just("<="), Just(">"), Just(">="), Just("=="), Just("!=")],
            0..VARS,
            -2i64..3
        )
            .prop_map(|(op, var, n)| Tree::Compare(op, var, n)),
        (0..VARS).prop_map(Tree::Exists),
        any::<bool>().prop_map(Tree::Literal),
    ]
}

fn tree() -> impl Strategy<Value = Tree> {
    leaf().prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| Tree::Not(Box::new(t))),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Tree::And),
            prop::collection::vec(inner, 2..4).prop_map(Tree::Or),
        ]
    })
}

/// Values for `flag{i}`, `n{i}` and the sometimes-missing `m{i}`.
fn assignment() -> impl Strategy<Value = (Vec<bool>, Vec<i64>, Vec<Option<i64>>)> {
    (
        prop::collection::vec(any::<bool>(), VARS),
        prop::collection::vec(-2i64..3, VARS),
        prop::collection::vec(prop::option::of(0i64..2), VARS),
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn path(name: String) -> Expression {
    Expression::path(&REGISTRY, &name).expect("valid path")
}

fn build(tree: &Tree) -> Expression {
    let make = |name: &str, children: Vec<Expression>| {
        Expression::make(&REGISTRY, name, children).expect("valid tree")
    };
    match tree {
        Tree::Flag(i) => path(format!("flag{}", i)),
        Tree::Compare(op, i, n) => {
            make(op, vec![path(format!("n{}", i)), Expression::constant(*n)])
        }
        Tree::Exists(i) => make("exists", vec![path(format!("m{}", i))]),
        Tree::Literal(b) => Expression::constant(*b),
        Tree::Not(inner) => make("!", vec![build(inner)]),
        Tree::And(children) => make("&&", children.iter().map(build).collect()),
        Tree::Or(children) => make("||", children.iter().map(build).collect()),
    }
}

fn memory(flags: &[bool], numbers: &[i64], maybe: &[Option<i64>]) -> SimpleObjectMemory {
    let mut entries = Vec::new();
    for i in 0..VARS {
        entries.push((format!("flag{}", i), Value::Bool(flags[i])));
        entries.push((format!("n{}", i), Value::Integer(numbers[i])));
        if let Some(m) = maybe[i] {
            entries.push((format!("m{}", i), Value::Integer(m)));
        }
    }
    SimpleObjectMemory::new(Value::map(entries))
}

fn truth(expr: &Expression, memory: &SimpleObjectMemory) -> bool {
    expr.try_evaluate(memory, &Options::default())
        .unwrap_or_else(|e| panic!("{} failed: {}", expr, e))
        .is_truthy()
}

fn is_leaf_or_negated_leaf(expr: &Expression) -> bool {
    match expr.expr_type() {
        "&&" | "||" => false,
        "!" => expr.children().iter().all(|c| !matches!(c.expr_type(), "&&" | "||" | "!")),
        _ => true,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn push_down_not_preserves_truth(t in tree(), (flags, numbers, maybe) in assignment()) {
        let expr = build(&t);
        let pushed = push_down_not(&expr, &REGISTRY).expect("push_down_not failed");
        let memory = memory(&flags, &numbers, &maybe);
        prop_assert_eq!(truth(&expr, &memory), truth(&pushed, &memory), "{} vs {}", expr, pushed);
    }

    #[test]
    fn dnf_preserves_truth(t in tree(), (flags, numbers, maybe) in assignment()) {
        let expr = build(&t);
        let options = RewriteOptions { max_clauses: None };
        let normal = disjunctive_normal_form(&expr, &REGISTRY, &options).expect("dnf failed");
        let memory = memory(&flags, &numbers, &maybe);
        prop_assert_eq!(truth(&expr, &memory), truth(&normal, &memory), "{} vs {}", expr, normal);
    }

    #[test]
    fn dnf_is_an_or_of_ands(t in tree()) {
        let expr = build(&t);
        let options = RewriteOptions { max_clauses: None };
        let normal = disjunctive_normal_form(&expr, &REGISTRY, &options).expect("dnf failed");
        let clauses = match normal.expr_type() {
            "||" => normal.children().to_vec(),
            _ => vec![normal.clone()],
        };
        for clause in &clauses {
            let literals = match clause.expr_type() {
                "&&" => clause.children().to_vec(),
                _ => vec![clause.clone()],
            };
            for literal in &literals {
                prop_assert!(is_leaf_or_negated_leaf(literal), "{} in {}", literal, normal);
            }
        }
    }
}
