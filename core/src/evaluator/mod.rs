//! Evaluators: the behavior bound to every expression node.
//!
//! An [`Evaluator`] is a plain data record: a name, an evaluate function, a
//! static validate function and a declared [`ReturnType`]. Builtins and host
//! extensions are both just evaluators registered in a [`Registry`].
//!
//! ## Design Principles
//!
//! - **Data, not hierarchy**: evaluators are records of function values, so a
//!   host registers new functions without subclassing anything.
//! - **One adapter boundary**: function bodies return `Result`; the shared
//!   [`combinators`] evaluate children, run [`verifiers`] and turn every failure
//!   into an [`EvalError`] with the failing step's message.
//! - **Static checks are best effort**: [`validators`] run once when a tree is
//!   built; anything they cannot decide is verified at runtime.

pub mod combinators;
mod error;
mod registry;
pub mod validators;
pub mod verifiers;

pub use error::{EvalError, EvalResult, ExpressionError};
pub use registry::{Registry, RegistryBuilder};

use crate::api::Options;
use crate::expression::{Expression, ReturnType};
use crate::memory::Memory;
use core::fmt;
use std::sync::Arc;

/// Evaluate function of an evaluator.
pub type EvaluateFn = Arc<dyn Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync>;

/// Static validation function of an evaluator.
pub type ValidateFn = Arc<dyn Fn(&Expression) -> Result<(), ExpressionError> + Send + Sync>;

/// The behavior bound to an expression node.
pub struct Evaluator {
    name: String,
    evaluate: EvaluateFn,
    validate: ValidateFn,
    return_type: ReturnType,
}

impl Evaluator {
    /// Create an evaluator that accepts any children.
    pub fn new<F>(name: impl Into<String>, evaluate: F, return_type: ReturnType) -> Self
    where
        F: Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            evaluate: Arc::new(evaluate),
            validate: Arc::new(|_| Ok(())),
            return_type,
        }
    }

    /// Attach a static validator.
    pub fn with_validator<V>(mut self, validate: V) -> Self
    where
        V: Fn(&Expression) -> Result<(), ExpressionError> + Send + Sync + 'static,
    {
        self.validate = Arc::new(validate);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    pub fn evaluate(
        &self,
        expr: &Expression,
        memory: &dyn Memory,
        options: &Options,
    ) -> EvalResult {
        (self.evaluate)(expr, memory, options)
    }

    pub fn validate(&self, expr: &Expression) -> Result<(), ExpressionError> {
        (self.validate)(expr)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Evaluator: Send, Sync);
