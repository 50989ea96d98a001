//! Expression trees.
//!
//! An [`Expression`] is an immutable node: a type tag, ordered children and
//! the [`Evaluator`] bound to it. Trees are built once (by a parser or
//! programmatically) and evaluated any number of times against any number of
//! memories, from any number of threads.
//!
//! ## Design Principles
//!
//! - **Bound at construction**: the evaluator is resolved from a
//!   [`Registry`] when the node is built, so evaluation never looks names up.
//! - **Cheap to share**: nodes are reference counted; cloning a tree or
//!   reusing a subtree in a rewritten tree copies no children.
//! - **Two error channels**: building a malformed call fails immediately with
//!   [`ExpressionError`]; evaluation failures come back as [`EvalError`].
//!
//! # Example
//!
//! ```
//! use adex_core::{Expression, Registry, api::Options, memory::SimpleObjectMemory, values::Value};
//!
//! let registry = Registry::new();
//! let expr = Expression::make(
//!     &registry,
//!     "add",
//!     vec![Expression::constant(1), Expression::constant(2), Expression::constant(3)],
//! )
//! .unwrap();
//!
//! let memory = SimpleObjectMemory::default();
//! assert_eq!(expr.try_evaluate(&memory, &Options::default()), Ok(Value::Integer(6)));
//! assert_eq!(expr.to_string(), "(1 + 2 + 3)");
//! ```

mod display;
pub mod expression_type;
mod references;
mod return_type;
mod typed;

#[cfg(test)]
mod expression_test;

pub use return_type::ReturnType;
pub use typed::FromValue;

use crate::api::Options;
use crate::evaluator::{EvalError, EvalResult, Evaluator, ExpressionError, Registry};
use crate::memory::Memory;
use crate::values::Value;
use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::sync::Arc;

lazy_static! {
    static ref CONSTANT_EVALUATOR: Arc<Evaluator> = Arc::new(Evaluator::new(
        expression_type::CONSTANT,
        |expr, _, _| Ok(expr.value().cloned().unwrap_or_default()),
        ReturnType::OBJECT,
    ));
}

/// Shared evaluator of every constant node.
pub(crate) fn constant_evaluator() -> Arc<Evaluator> {
    Arc::clone(&CONSTANT_EVALUATOR)
}

struct Node {
    evaluator: Arc<Evaluator>,
    children: Vec<Expression>,
    value: Option<Value>,
    /// Outcome of this node's own static check, filled at most once.
    checked: OnceCell<Result<(), ExpressionError>>,
}

/// An immutable expression tree node.
#[derive(Clone)]
pub struct Expression(Arc<Node>);

static_assertions::assert_impl_all!(Expression: Send, Sync);

impl Expression {
    /// Build a node by function name without validating it.
    pub fn new(
        registry: &Registry,
        type_name: &str,
        children: Vec<Expression>,
    ) -> Result<Expression, ExpressionError> {
        let evaluator = registry
            .lookup(type_name)
            .ok_or_else(|| ExpressionError::UnknownFunction(type_name.to_string()))?;
        Ok(Self::from_evaluator(evaluator, children))
    }

    /// Build a node bound directly to an evaluator, bypassing lookup.
    pub fn from_evaluator(evaluator: Arc<Evaluator>, children: Vec<Expression>) -> Expression {
        Expression(Arc::new(Node {
            evaluator,
            children,
            value: None,
            checked: OnceCell::new(),
        }))
    }

    /// Build and validate a node by function name.
    pub fn make(
        registry: &Registry,
        type_name: &str,
        children: Vec<Expression>,
    ) -> Result<Expression, ExpressionError> {
        let expr = Self::new(registry, type_name, children)?;
        expr.ensure_valid()?;
        Ok(expr)
    }

    /// Build and validate a node bound to an evaluator.
    pub fn make_with_evaluator(
        evaluator: Arc<Evaluator>,
        children: Vec<Expression>,
    ) -> Result<Expression, ExpressionError> {
        let expr = Self::from_evaluator(evaluator, children);
        expr.ensure_valid()?;
        Ok(expr)
    }

    /// A constant node.
    pub fn constant(value: impl Into<Value>) -> Expression {
        Expression(Arc::new(Node {
            evaluator: constant_evaluator(),
            children: Vec::new(),
            value: Some(value.into()),
            checked: OnceCell::with_value(Ok(())),
        }))
    }

    /// A memory path node: `property` or `instance.property`.
    pub fn accessor(
        registry: &Registry,
        property: &str,
        instance: Option<Expression>,
    ) -> Result<Expression, ExpressionError> {
        let mut children = vec![Expression::constant(property)];
        children.extend(instance);
        Self::make(registry, expression_type::ACCESSOR, children)
    }

    /// Build an accessor chain from a dotted path like `bag.list`.
    pub fn path(registry: &Registry, path: &str) -> Result<Expression, ExpressionError> {
        let mut expr: Option<Expression> = None;
        for segment in path.split('.') {
            expr = Some(Self::accessor(registry, segment, expr)?);
        }
        expr.ok_or_else(|| ExpressionError::InvalidArgument("Empty path".to_string()))
    }

    /// An anonymous node evaluated by `f` against the memory.
    pub fn lambda<F>(f: F) -> Expression
    where
        F: Fn(&dyn Memory) -> EvalResult + Send + Sync + 'static,
    {
        let evaluator = Evaluator::new(
            expression_type::LAMBDA,
            move |_, memory, _| f(memory),
            ReturnType::OBJECT,
        );
        Self::from_evaluator(Arc::new(evaluator), Vec::new())
    }

    /// Conjunction of `children`; a single child is returned unchanged.
    pub fn and(
        registry: &Registry,
        mut children: Vec<Expression>,
    ) -> Result<Expression, ExpressionError> {
        if children.len() == 1 {
            return Ok(children.remove(0));
        }
        Self::make(registry, expression_type::AND, children)
    }

    /// Disjunction of `children`; a single child is returned unchanged.
    pub fn or(
        registry: &Registry,
        mut children: Vec<Expression>,
    ) -> Result<Expression, ExpressionError> {
        if children.len() == 1 {
            return Ok(children.remove(0));
        }
        Self::make(registry, expression_type::OR, children)
    }

    pub fn not(registry: &Registry, child: Expression) -> Result<Expression, ExpressionError> {
        Self::make(registry, expression_type::NOT, vec![child])
    }

    /// The node's type, always equal to its evaluator's name.
    pub fn expr_type(&self) -> &str {
        self.0.evaluator.name()
    }

    pub fn evaluator(&self) -> &Arc<Evaluator> {
        &self.0.evaluator
    }

    pub fn children(&self) -> &[Expression] {
        &self.0.children
    }

    /// The stored value of a constant node.
    pub fn value(&self) -> Option<&Value> {
        self.0.value.as_ref()
    }

    pub fn is_constant(&self) -> bool {
        self.0.value.is_some()
    }

    /// Text of a constant string node.
    pub fn constant_text(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// Declared result kind; constants derive it from their value.
    pub fn return_type(&self) -> ReturnType {
        match &self.0.value {
            Some(value) => ReturnType::of_value(value),
            None => self.0.evaluator.return_type(),
        }
    }

    /// Run the bound evaluator's static check on this node.
    pub fn validate(&self) -> Result<(), ExpressionError> {
        self.0.evaluator.validate(self)
    }

    /// Run this node's static check once and remember the outcome.
    ///
    /// Evaluation and rewriting call this before reading children, so a node
    /// built with [`Expression::new`] that has the wrong shape fails with an
    /// error instead of being dispatched.
    pub fn ensure_valid(&self) -> Result<(), ExpressionError> {
        self.0.checked.get_or_init(|| self.validate()).clone()
    }

    /// Validate this node and all descendants, depth first.
    pub fn validate_tree(&self) -> Result<(), ExpressionError> {
        self.validate()?;
        for child in self.children() {
            child.validate_tree()?;
        }
        Ok(())
    }

    /// Evaluate against a memory.
    pub fn try_evaluate(&self, memory: &dyn Memory, options: &Options) -> EvalResult {
        self.ensure_valid().map_err(|e| EvalError::new(e.to_string()))?;
        self.0.evaluator.evaluate(self, memory, options)
    }

    /// Evaluate and coerce the result to `T`.
    pub fn try_evaluate_as<T: FromValue>(
        &self,
        memory: &dyn Memory,
        options: &Options,
    ) -> Result<T, EvalError> {
        let value = self.try_evaluate(memory, options)?;
        T::from_value(value)
    }

    /// Evaluate and convert the result through a JSON round-trip.
    pub fn try_evaluate_deserialize<T: DeserializeOwned>(
        &self,
        memory: &dyn Memory,
        options: &Options,
    ) -> Result<T, EvalError> {
        let value = self.try_evaluate(memory, options)?;
        let json = serde_json::Value::from(&value);
        serde_json::from_value(json).map_err(|_| {
            EvalError::new(format!(
                "'{}' is not of type {}",
                value,
                typed::short_type_name::<T>()
            ))
        })
    }

    /// Structural equality. Children of `&&` and `||` match in any order.
    pub fn deep_equals(&self, other: &Expression) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if self.expr_type() != other.expr_type()
            || self.children().len() != other.children().len()
        {
            return false;
        }
        if self.0.value != other.0.value {
            return false;
        }
        let ty = self.expr_type();
        if ty == expression_type::AND || ty == expression_type::OR {
            self.children()
                .iter()
                .all(|mine| other.children().iter().any(|theirs| mine.deep_equals(theirs)))
        } else {
            self.children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.deep_equals(b))
        }
    }
}

impl core::fmt::Debug for Expression {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Expression({})", self)
    }
}
