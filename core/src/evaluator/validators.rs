//! Static validators, run when a node is built.
//!
//! Checks are best effort: a child whose declared kind includes
//! [`ReturnType::OBJECT`] is unconstrained and always passes here, its shape
//! is verified at runtime instead.

use super::ExpressionError;
use crate::expression::{Expression, ReturnType, expression_type};

fn invalid(message: String) -> ExpressionError {
    ExpressionError::InvalidArgument(message)
}

fn type_error(expected: ReturnType, child: &Expression, expr: &Expression) -> ExpressionError {
    let names = expected.names();
    if names.contains(',') {
        invalid(format!("{} in {} is not any of [{}].", child, expr, names))
    } else {
        invalid(format!("{} is not a {} expression in {}.", child, names, expr))
    }
}

fn check_child(
    child: &Expression,
    allowed: ReturnType,
    expr: &Expression,
) -> Result<(), ExpressionError> {
    let declared = child.return_type();
    if allowed.contains(ReturnType::OBJECT) || declared.contains(ReturnType::OBJECT) {
        return Ok(());
    }
    if declared.intersects(allowed) {
        Ok(())
    } else {
        Err(type_error(allowed, child, expr))
    }
}

/// Check the child count lies in `min..=max` and that every child's declared
/// kind intersects `allowed`.
pub fn validate_arity_and_any_type(
    expr: &Expression,
    min: usize,
    max: usize,
    allowed: ReturnType,
) -> Result<(), ExpressionError> {
    let count = expr.children().len();
    if count < min {
        return Err(invalid(format!("{} should have at least {} children.", expr, min)));
    }
    if count > max {
        return Err(invalid(format!("{} can't have more than {} children.", expr, max)));
    }
    for child in expr.children() {
        check_child(child, allowed, expr)?;
    }
    Ok(())
}

/// Positional variant: `required` kinds for the leading children, followed by
/// up to `optional.len()` trailing children.
pub fn validate_order(
    expr: &Expression,
    optional: &[ReturnType],
    required: &[ReturnType],
) -> Result<(), ExpressionError> {
    let count = expr.children().len();
    let min = required.len();
    let max = required.len() + optional.len();
    if count < min || count > max {
        return Err(if optional.is_empty() {
            invalid(format!("{} should have {} children.", expr, min))
        } else {
            invalid(format!("{} should have between {} and {} children.", expr, min, max))
        });
    }
    let kinds = required.iter().chain(optional);
    for (child, kind) in expr.children().iter().zip(kinds) {
        check_child(child, *kind, expr)?;
    }
    Ok(())
}

pub fn validate_at_least_one(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, usize::MAX, ReturnType::OBJECT)
}

pub fn validate_number(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, usize::MAX, ReturnType::NUMBER)
}

pub fn validate_string(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, usize::MAX, ReturnType::STRING)
}

pub fn validate_binary(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 2, 2, ReturnType::OBJECT)
}

pub fn validate_binary_number(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 2, 2, ReturnType::NUMBER)
}

pub fn validate_unary_or_binary_number(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, 2, ReturnType::NUMBER)
}

pub fn validate_two_or_more_than_two_numbers(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 2, usize::MAX, ReturnType::NUMBER)
}

pub fn validate_binary_number_or_string(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 2, 2, ReturnType::NUMBER | ReturnType::STRING)
}

pub fn validate_unary(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, 1, ReturnType::OBJECT)
}

pub fn validate_unary_string(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, 1, ReturnType::STRING)
}

pub fn validate_unary_or_binary_string(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, 2, ReturnType::STRING)
}

pub fn validate_unary_number(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, 1, ReturnType::NUMBER)
}

pub fn validate_unary_boolean(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 1, 1, ReturnType::BOOLEAN)
}

pub fn validate_no_children(expr: &Expression) -> Result<(), ExpressionError> {
    validate_arity_and_any_type(expr, 0, 0, ReturnType::OBJECT)
}

/// Shape of `foreach`/`select`/`where`/`any`/`all`: a collection, a
/// single-segment accessor naming the iteration variable, and a body.
pub fn validate_lambda_expression(expr: &Expression) -> Result<(), ExpressionError> {
    let count = expr.children().len();
    if count != 3 {
        return Err(invalid(format!(
            "Lambda expression expects 3 parameters, found {}",
            count
        )));
    }
    let second = &expr.children()[1];
    if !(second.expr_type() == expression_type::ACCESSOR && second.children().len() == 1) {
        return Err(invalid(format!("Second parameter is not an identifier : {}", second)));
    }
    Ok(())
}
