//! Core of the adex expression language.
//!
//! Expressions are immutable trees whose nodes are bound to evaluators from a
//! [`Registry`]. Trees evaluate against a [`memory::Memory`] and produce a
//! [`values::Value`] or an [`evaluator::EvalError`].

pub mod api;
pub mod casting;
pub mod evaluator;
pub mod expression;
pub mod locale;
pub mod memory;
pub mod regex;
pub mod rewriter;
pub mod stdlib;
pub mod values;

pub use api::{Options, RewriteOptions};
pub use evaluator::{EvalError, EvalResult, Evaluator, ExpressionError, Registry, RegistryBuilder};
pub use expression::{Expression, FromValue, ReturnType};
pub use memory::{Memory, SimpleObjectMemory, StackedMemory};
pub use rewriter::{RewriteError, disjunctive_normal_form, push_down_not};
pub use values::{ObjectMap, Value};

/// Test utilities for enabling logging in tests and building trees tersely
#[cfg(test)]
pub mod test_utils {
    use crate::api::Options;
    use crate::evaluator::{EvalResult, Registry};
    use crate::expression::Expression;
    use crate::memory::{Memory, SimpleObjectMemory};
    use crate::values::Value;
    use once_cell::sync::Lazy;

    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_dnf() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

    pub fn c(value: impl Into<Value>) -> Expression {
        Expression::constant(value)
    }

    /// Dotted memory path, e.g. `bag.name`.
    pub fn p(path: &str) -> Expression {
        Expression::path(&REGISTRY, path).unwrap_or_else(|e| panic!("bad path {}: {}", path, e))
    }

    pub fn build(name: &str, children: Vec<Expression>) -> Expression {
        Expression::make(&REGISTRY, name, children)
            .unwrap_or_else(|e| panic!("failed to build {}: {}", name, e))
    }

    /// `instance[index]`
    pub fn elem(instance: Expression, index: Expression) -> Expression {
        build("Element", vec![instance, index])
    }

    pub fn eval(expr: &Expression, memory: &dyn Memory) -> EvalResult {
        expr.try_evaluate(memory, &Options::default())
    }

    /// Memory shared by the builtin tests.
    pub fn scope() -> SimpleObjectMemory {
        SimpleObjectMemory::from_json(serde_json::json!({
            "one": 1.0,
            "two": 2.0,
            "hello": "hello",
            "world": "world",
            "y": "y",
            "istrue": true,
            "nullObj": null,
            "emptyList": [],
            "emptyObject": {},
            "bag": {
                "three": 3.0,
                "set": { "four": 4.0 },
                "list": ["red", "blue"],
                "index": 3,
                "name": "mybag"
            },
            "items": ["zero", "one", "two"],
            "nestedItems": [{ "x": 1 }, { "x": 2 }, { "x": 3 }],
            "doubleNestedItems": [[{ "x": 1 }, { "x": 2 }], [{ "x": 3 }]],
            "dialog": {
                "x": 3,
                "instance": { "xxx": "instance", "yyy": { "instanceY": "instanceY" } },
                "options": { "xxx": "options", "yyy": ["optionY1", "optionY2"] },
                "title": "Dialog Title",
                "subTitle": "Dialog Sub Title"
            },
            "path": { "array": [1] },
            "timestamp": "2018-03-15T13:00:00.000Z",
            "notISOTimestamp": "2018/03/15 13:00:00",
            "unixTimestamp": 1521118800,
            "byteArr": [3, 5, 1, 12]
        }))
    }

    /// Build a call with the shared registry: `call!("add", c(1), c(2))`.
    macro_rules! call {
        ($name:expr $(, $arg:expr)* $(,)?) => {
            $crate::test_utils::build($name, vec![$($arg),*])
        };
    }

    pub(crate) use call;
}
