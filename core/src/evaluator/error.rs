//! Errors raised while building and evaluating expressions.
//!
//! There are two channels:
//!
//! - **Construction errors** ([`ExpressionError`]): unknown functions, wrong
//!   arity, statically incompatible child kinds. These are authoring bugs and
//!   are returned from the tree-building API immediately.
//!
//! - **Evaluation errors** ([`EvalError`]): anything that goes wrong while a
//!   tree runs against a memory. A builtin never panics on bad data; it returns
//!   an `EvalError` whose message propagates unchanged up to the caller, and the
//!   first failing child aborts its parent.

use crate::casting::CastError;
use crate::regex::RegexError;
use core::fmt;

/// Runtime evaluation error.
///
/// Carries only the message: propagation is by identity, so an error produced
/// deep in a tree reaches the caller with exactly the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<String> for EvalError {
    fn from(message: String) -> Self {
        EvalError::new(message)
    }
}

impl From<&str> for EvalError {
    fn from(message: &str) -> Self {
        EvalError::new(message)
    }
}

// Integration with the casting module
impl From<CastError> for EvalError {
    fn from(e: CastError) -> Self {
        EvalError::new(e.to_string())
    }
}

impl From<RegexError> for EvalError {
    fn from(e: RegexError) -> Self {
        EvalError::new(e.to_string())
    }
}

/// Errors raised while constructing or statically validating a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// No builtin or custom evaluator is registered under this name.
    #[error("{0} does not have an evaluator, it's not a built-in function or a custom function.")]
    UnknownFunction(String),

    /// Arity or static type mismatch detected by a validator.
    #[error("{0}")]
    InvalidArgument(String),

    /// A custom evaluator tried to take a builtin's name.
    #[error("{0} is already defined as a built-in function and cannot be overridden.")]
    ShadowsBuiltin(String),
}

/// Result of evaluating an expression.
pub type EvalResult = Result<crate::values::Value, EvalError>;
