//! Runtime verifiers applied to each evaluated child.
//!
//! A verifier sees the child's value, the child expression and its position,
//! and returns the error message when the value is not acceptable.

use crate::expression::Expression;
use crate::values::Value;

/// Signature shared by every verifier.
pub type VerifyFn = fn(&Value, &Expression, usize) -> Option<String>;

pub fn verify_number(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    (!value.is_number()).then(|| format!("{} is not a number.", expr))
}

pub fn verify_numeric_list(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    let Some(items) = value.as_list() else {
        return Some(format!("{} is not a list.", expr));
    };
    non_numeric_element(items, expr)
}

pub fn verify_numeric_list_or_number(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    if value.is_number() {
        return None;
    }
    let Some(items) = value.as_list() else {
        return Some(format!("{} is neither a list nor a number.", expr));
    };
    non_numeric_element(items, expr)
}

fn non_numeric_element(items: &[Value], expr: &Expression) -> Option<String> {
    items
        .iter()
        .find(|item| !item.is_number())
        .map(|item| format!("{} is not a number in {}", item, expr))
}

pub fn verify_container(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    match value {
        Value::Text(_) | Value::List(_) | Value::Map(_) => None,
        _ => Some(format!("{} must be a string or list.", expr)),
    }
}

pub fn verify_container_or_null(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    match value {
        Value::Null | Value::Text(_) | Value::List(_) | Value::Map(_) => None,
        _ => Some(format!("{} must be a string or list or a null object.", expr)),
    }
}

pub fn verify_list(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    (!value.is_list()).then(|| format!("{} must be a list.", expr))
}

/// Integral numbers, including floats without a fractional part.
pub fn verify_integer(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    let integral = match value {
        Value::Integer(_) => true,
        Value::Float(x) => x.fract() == 0.0,
        _ => false,
    };
    (!integral).then(|| format!("{} is not an integer.", expr))
}

pub fn verify_string(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    (!value.is_text()).then(|| format!("{} is not a string.", expr))
}

pub fn verify_string_or_null(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    (!value.is_text() && !value.is_null())
        .then(|| format!("{} is neither a string nor a null object.", expr))
}

pub fn verify_not_null(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    value.is_null().then(|| format!("{} is null.", expr))
}

pub fn verify_number_or_string(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    (!value.is_number() && !value.is_text()).then(|| format!("{} is not string or number.", expr))
}

pub fn verify_number_or_string_or_null(
    value: &Value,
    expr: &Expression,
    _: usize,
) -> Option<String> {
    (!value.is_null() && !value.is_number() && !value.is_text())
        .then(|| format!("{} is not string or number.", expr))
}

pub fn verify_boolean(value: &Value, expr: &Expression, _: usize) -> Option<String> {
    value.as_bool().is_none().then(|| format!("{} is not a boolean.", expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(value: impl Into<Value>) -> Expression {
        Expression::constant(value)
    }

    #[test]
    fn test_number_verifiers() {
        assert_eq!(verify_number(&Value::Integer(1), &c(1), 0), None);
        assert_eq!(
            verify_number(&Value::text("a"), &c("a"), 0),
            Some("'a' is not a number.".to_string())
        );
        assert_eq!(verify_integer(&Value::Float(2.0), &c(2.0), 0), None);
        assert_eq!(
            verify_integer(&Value::Float(2.5), &c(2.5), 0),
            Some("2.5 is not an integer.".to_string())
        );
    }

    #[test]
    fn test_list_verifiers() {
        let numbers = Value::list([Value::Integer(1), Value::Float(2.5)]);
        assert_eq!(verify_numeric_list(&numbers, &c(numbers.clone()), 0), None);

        let mixed = Value::list([Value::Integer(1), Value::text("x")]);
        assert_eq!(
            verify_numeric_list(&mixed, &c(mixed.clone()), 0),
            Some("x is not a number in [1, 'x']".to_string())
        );
        assert_eq!(verify_numeric_list_or_number(&Value::Integer(3), &c(3), 0), None);
        assert_eq!(
            verify_numeric_list_or_number(&Value::Bool(true), &c(true), 0),
            Some("true is neither a list nor a number.".to_string())
        );
        assert_eq!(
            verify_list(&Value::text("s"), &c("s"), 0),
            Some("'s' must be a list.".to_string())
        );
    }

    #[test]
    fn test_container_and_null_verifiers() {
        assert_eq!(verify_container(&Value::text("abc"), &c("abc"), 0), None);
        assert_eq!(
            verify_container(&Value::Null, &c(Value::Null), 0),
            Some("null must be a string or list.".to_string())
        );
        assert_eq!(verify_container_or_null(&Value::Null, &c(Value::Null), 0), None);
        assert_eq!(
            verify_not_null(&Value::Null, &c(Value::Null), 0),
            Some("null is null.".to_string())
        );
        assert_eq!(verify_string_or_null(&Value::Null, &c(Value::Null), 0), None);
        assert_eq!(
            verify_number_or_string(&Value::Null, &c(Value::Null), 0),
            Some("null is not string or number.".to_string())
        );
        assert_eq!(verify_number_or_string_or_null(&Value::Null, &c(Value::Null), 0), None);
        assert_eq!(verify_boolean(&Value::Bool(false), &c(false), 0), None);
    }
}
