//! Adex - an embeddable expression core
//!
//! # Overview
//!
//! Adex evaluates immutable expression trees against a caller-supplied
//! memory. Trees are built programmatically, bound to evaluators at
//! construction, and can be shared freely between threads. Common use cases
//! include:
//!
//! - Routing and trigger conditions
//! - Templated text with locale-aware formatting
//! - Data lookups and reshaping over JSON-like state
//!
//! # Quick Start
//!
//! ```
//! use adex::{Expression, Options, Registry, SimpleObjectMemory, Value};
//!
//! let registry = Registry::new();
//! let memory = SimpleObjectMemory::from_json(serde_json::json!({
//!     "user": { "name": "Ada", "visits": 41 }
//! }));
//!
//! let visits = Expression::path(&registry, "user.visits").unwrap();
//! let next = Expression::make(&registry, "+", vec![visits, Expression::constant(1)]).unwrap();
//! let greeting = Expression::make(
//!     &registry,
//!     "concat",
//!     vec![
//!         Expression::path(&registry, "user.name").unwrap(),
//!         Expression::constant(" #"),
//!         Expression::make(&registry, "string", vec![next]).unwrap(),
//!     ],
//! )
//! .unwrap();
//!
//! let result = greeting.try_evaluate(&memory, &Options::default());
//! assert_eq!(result, Ok(Value::text("Ada #42")));
//! ```
//!
//! # Custom functions
//!
//! Evaluators registered on a [`Registry`] live in a custom overlay next to
//! the builtins. They cannot shadow a builtin name.
//!
//! ```
//! use adex::{Evaluator, Expression, Options, Registry, ReturnType, SimpleObjectMemory, Value};
//!
//! let registry = Registry::new();
//! registry
//!     .register(Evaluator::new(
//!         "twice",
//!         |expr, memory, options| {
//!             let n: f64 = expr.children()[0].try_evaluate_as(memory, options)?;
//!             Ok(Value::number_from_f64(n * 2.0))
//!         },
//!         ReturnType::NUMBER,
//!     ))
//!     .unwrap();
//!
//! let expr = Expression::make(&registry, "twice", vec![Expression::constant(21)]).unwrap();
//! let memory = SimpleObjectMemory::default();
//! assert_eq!(expr.try_evaluate(&memory, &Options::default()), Ok(Value::Integer(42)));
//! ```
//!
//! # Rewriting
//!
//! Boolean trees can be normalized with [`push_down_not`] and
//! [`disjunctive_normal_form`], bounded by [`RewriteOptions::max_clauses`].

// Re-export public API from adex_core
pub use adex_core::api::{NullSubstitution, Options, RewriteOptions};

// Re-export trees, evaluators and errors
pub use adex_core::evaluator::{
    EvalError, EvalResult, Evaluator, ExpressionError, Registry, RegistryBuilder,
};
pub use adex_core::expression::{Expression, FromValue, ReturnType};
pub use adex_core::rewriter::{RewriteError, disjunctive_normal_form, push_down_not};

// Re-export memory and values
pub use adex_core::memory::{Memory, SimpleObjectMemory, StackedMemory};
pub use adex_core::values::{self, ObjectMap, Value};

pub use adex_core::{locale, regex};
