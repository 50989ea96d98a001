//! Predicates Package
//!
//! Runtime type checks and regex matching. Type predicates inspect the
//! resolved value, never the declared return type of the child.

use super::datetime::parse_iso_timestamp;
use crate::evaluator::combinators::{apply, apply_with_error};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalResult, Evaluator, ExpressionError, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::regex::{RegexError, create_regex, is_common_regex};
use crate::values::Value;

// ============================================================================
// isMatch
// ============================================================================

/// `isMatch(text, pattern)`; a null text matches as empty.
fn is_match(args: &[Value]) -> EvalResult {
    let text = args[0].as_str().unwrap_or_default();
    let regex = create_regex(&args[1].to_text())?;
    Ok(Value::Bool(regex.is_match(text)))
}

fn verify_is_match_args(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    match position {
        0 => verify_string_or_null(value, expr, position),
        _ => verify_string(value, expr, position),
    }
}

/// Constant patterns are checked against the conformance grammar up front.
fn validate_is_match(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 2, 2, ReturnType::STRING)?;
    match expr.children()[1].constant_text() {
        Some("") => Err(ExpressionError::InvalidArgument(RegexError::Empty.to_string())),
        Some(pattern) if !is_common_regex(pattern) => Err(ExpressionError::InvalidArgument(
            RegexError::Unsupported(pattern.to_string()).to_string(),
        )),
        _ => Ok(()),
    }
}

// ============================================================================
// Type checks
// ============================================================================

fn is_integer(args: &[Value]) -> Value {
    Value::Bool(match &args[0] {
        Value::Integer(_) => true,
        Value::Float(x) => x.is_finite() && x.fract() == 0.0,
        _ => false,
    })
}

fn is_float(args: &[Value]) -> Value {
    Value::Bool(matches!(&args[0], Value::Float(x) if x.fract() != 0.0))
}

fn is_string(args: &[Value]) -> Value {
    Value::Bool(args[0].is_text())
}

fn is_array(args: &[Value]) -> Value {
    Value::Bool(args[0].is_list())
}

fn is_object(args: &[Value]) -> Value {
    Value::Bool(args[0].is_map())
}

fn is_boolean(args: &[Value]) -> Value {
    Value::Bool(matches!(args[0], Value::Bool(_)))
}

/// Only standard ISO timestamps count.
fn is_date_time(args: &[Value]) -> Value {
    Value::Bool(matches!(&args[0], Value::Text(text) if parse_iso_timestamp(text).is_ok()))
}

// ============================================================================
// Package
// ============================================================================

/// Register `isMatch` and the runtime type predicates.
pub fn register_predicates_package(builder: &mut RegistryBuilder) {
    builder.add(
        Evaluator::new(
            ty::IS_MATCH,
            apply_with_error(is_match, Some(verify_is_match_args)),
            ReturnType::BOOLEAN,
        )
        .with_validator(validate_is_match),
    );

    let checks: [(&str, fn(&[Value]) -> Value); 7] = [
        (ty::IS_INTEGER, is_integer),
        (ty::IS_FLOAT, is_float),
        (ty::IS_STRING, is_string),
        (ty::IS_ARRAY, is_array),
        (ty::IS_OBJECT, is_object),
        (ty::IS_BOOLEAN, is_boolean),
        (ty::IS_DATE_TIME, is_date_time),
    ];
    for (name, f) in checks {
        builder.add(
            Evaluator::new(name, apply(f, None), ReturnType::BOOLEAN)
                .with_validator(validate_unary),
        );
    }
}
