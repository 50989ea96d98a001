use adex::{EvalResult, Expression, Options, Registry, SimpleObjectMemory};
use once_cell::sync::Lazy;

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// `name(args...)` against the shared registry.
pub fn call(name: &str, children: Vec<Expression>) -> Expression {
    Expression::make(&REGISTRY, name, children)
        .unwrap_or_else(|e| panic!("failed to build {}: {}", name, e))
}

pub fn path(path: &str) -> Expression {
    Expression::path(&REGISTRY, path).unwrap_or_else(|e| panic!("bad path {}: {}", path, e))
}

pub fn lit(value: impl Into<adex::Value>) -> Expression {
    Expression::constant(value)
}

pub fn run(expr: &Expression, memory_json: &str, options: &Options) -> EvalResult {
    let json: serde_json::Value =
        serde_json::from_str(memory_json).unwrap_or_else(|e| panic!("bad memory document: {}", e));
    expr.try_evaluate(&SimpleObjectMemory::from_json(json), options)
}

/// Declares a test evaluating one tree against a JSON memory document.
///
/// ```ignore
/// scenario!(
///     greeting,
///     memory: indoc! {r#"{ "name": "Ada" }"#},
///     expr: call("concat", vec![lit("hi "), path("name")]),
///     result: Ok(Value::text("hi Ada")),
/// );
/// ```
#[macro_export]
macro_rules! scenario {
    (
        $name:ident,
        memory: $memory:expr,
        expr: $expr:expr,
        $(options: $options:expr,)?
        result: Ok($expected:expr) $(,)?
    ) => {
        #[test]
        fn $name() {
            #[allow(unused_mut, unused_assignments)]
            let mut options = adex::Options::default();
            $(options = $options;)?
            let expr = $expr;
            pretty_assertions::assert_eq!(cases::run(&expr, $memory, &options), Ok($expected));
        }
    };
    (
        $name:ident,
        memory: $memory:expr,
        expr: $expr:expr,
        $(options: $options:expr,)?
        result: Err($message:expr) $(,)?
    ) => {
        #[test]
        fn $name() {
            #[allow(unused_mut, unused_assignments)]
            let mut options = adex::Options::default();
            $(options = $options;)?
            let expr = $expr;
            let err = cases::run(&expr, $memory, &options).unwrap_err();
            pretty_assertions::assert_eq!(err.message(), $message);
        }
    };
}
