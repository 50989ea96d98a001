//! Math Package
//!
//! Arithmetic operators, aggregation and rounding.
//!
//! Integers stay integral while every operand is an integer and the result
//! fits in `i64`; anything else is computed in double precision.

use crate::casting;
use crate::evaluator::combinators::{apply_sequence_with_error, apply_with_error};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::values::Value;
use rand::Rng;

// ============================================================================
// Operators
// ============================================================================

/// Integer operation with a float fallback on overflow or mixed operands.
fn numeric_op(
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        if let Some(result) = int_op(*x, *y) {
            return Ok(Value::Integer(result));
        }
    }
    Ok(Value::Float(float_op(casting::to_f64(a)?, casting::to_f64(b)?)))
}

/// `+`: numeric addition, or concatenation when either side is text.
fn add(a: &Value, b: &Value) -> EvalResult {
    if a.is_number() && b.is_number() {
        return numeric_op(a, b, i64::checked_add, |x, y| x + y);
    }
    if (a.is_null() && b.is_number()) || (b.is_null() && a.is_number()) {
        return Err(EvalError::new(
            "Operator '+' or add cannot be applied to operands of type 'number' and null object.",
        ));
    }
    Ok(Value::Text(format!("{}{}", a.to_text(), b.to_text())))
}

fn subtract(a: &Value, b: &Value) -> EvalResult {
    numeric_op(a, b, i64::checked_sub, |x, y| x - y)
}

fn multiply(a: &Value, b: &Value) -> EvalResult {
    numeric_op(a, b, i64::checked_mul, |x, y| x * y)
}

/// Integral when both sides are integers and the division is exact.
fn divide(a: &Value, b: &Value) -> EvalResult {
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        if *y != 0 && x.checked_rem(*y) == Some(0) {
            if let Some(q) = x.checked_div(*y) {
                return Ok(Value::Integer(q));
            }
        }
    }
    Ok(Value::Float(casting::to_f64(a)? / casting::to_f64(b)?))
}

fn modulo(args: &[Value]) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::Integer(x), Value::Integer(y)) => {
            Ok(Value::Integer(x.checked_rem(*y).unwrap_or(0)))
        }
        (a, b) => Ok(Value::Float(casting::to_f64(a)? % casting::to_f64(b)?)),
    }
}

fn power(a: &Value, b: &Value) -> EvalResult {
    Ok(Value::Float(casting::to_f64(a)?.powf(casting::to_f64(b)?)))
}

/// Number verifier that also rejects zero past the first position.
fn verify_divisor(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    verify_number(value, expr, position).or_else(|| {
        (position > 0 && value.as_f64() == Some(0.0))
            .then(|| format!("Cannot divide by 0 from {}", expr))
    })
}

fn verify_modulus(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    verify_integer(value, expr, position).or_else(|| {
        (position > 0 && value.as_f64() == Some(0.0))
            .then(|| format!("Cannot mod by 0 from {}", expr))
    })
}

// ============================================================================
// Aggregation
// ============================================================================

/// Flatten numbers and lists of numbers into one sequence.
fn numbers(args: &[Value]) -> Vec<&Value> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            Value::List(items) => out.extend(items.iter()),
            other => out.push(other),
        }
    }
    out
}

fn extreme(name: &str, args: &[Value], pick_left: fn(&Value, &Value) -> bool) -> EvalResult {
    let mut values = numbers(args).into_iter();
    let first = values
        .next()
        .ok_or_else(|| EvalError::new(format!("{} requires at least one number.", name)))?;
    let mut best = first;
    for value in values {
        if !pick_left(best, value) {
            best = value;
        }
    }
    Ok(best.clone())
}

fn min(args: &[Value]) -> EvalResult {
    extreme(ty::MIN, args, |a, b| a.compare(b).is_some_and(|o| o.is_le()))
}

fn max(args: &[Value]) -> EvalResult {
    extreme(ty::MAX, args, |a, b| a.compare(b).is_some_and(|o| o.is_ge()))
}

/// Integer sum while possible, double precision otherwise.
fn sum_of(items: &[Value]) -> EvalResult {
    let mut acc = Value::Integer(0);
    for item in items {
        acc = numeric_op(&acc, item, i64::checked_add, |x, y| x + y)?;
    }
    Ok(acc)
}

fn sum(args: &[Value]) -> EvalResult {
    sum_of(args[0].as_list().unwrap_or_default())
}

fn average(args: &[Value]) -> EvalResult {
    let items = args[0].as_list().unwrap_or_default();
    if items.is_empty() {
        return Err(EvalError::new("Cannot compute the average of an empty list."));
    }
    let total = casting::to_f64(&sum_of(items)?)?;
    Ok(Value::Float(total / items.len() as f64))
}

/// `range(start, count)`: `count` consecutive integers from `start`.
fn range(args: &[Value]) -> EvalResult {
    let start = casting::to_i64(&args[0])?;
    let count = casting::to_i64(&args[1])?;
    if count <= 0 {
        return Err(EvalError::new(format!(
            "The second parameter {} should be more than zero",
            count
        )));
    }
    let end = start
        .checked_add(count)
        .ok_or_else(|| EvalError::new(format!("range({}, {}) overflows", start, count)))?;
    Ok(Value::list((start..end).map(Value::Integer)))
}

// ============================================================================
// Rounding and unary functions
// ============================================================================

fn floor(args: &[Value]) -> EvalResult {
    Ok(Value::number_from_f64(casting::to_f64(&args[0])?.floor()))
}

fn ceiling(args: &[Value]) -> EvalResult {
    Ok(Value::number_from_f64(casting::to_f64(&args[0])?.ceil()))
}

/// `round(x, digits?)`, half away from zero; `digits` lies in `0..=15`.
fn round(args: &[Value]) -> EvalResult {
    let x = casting::to_f64(&args[0])?;
    let digits = match args.get(1) {
        Some(d) => casting::to_i32(d)?,
        None => 0,
    };
    if !(0..=15).contains(&digits) {
        return Err(EvalError::new(format!(
            "The second parameter {} must be an integer between 0 and 15.",
            digits
        )));
    }
    if digits == 0 {
        return Ok(Value::number_from_f64(x.round()));
    }
    let scale = 10f64.powi(digits);
    Ok(Value::Float((x * scale).round() / scale))
}

fn abs(args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Integer(i) => Ok(i
            .checked_abs()
            .map_or(Value::Float((*i as f64).abs()), Value::Integer)),
        other => Ok(Value::Float(casting::to_f64(other)?.abs())),
    }
}

fn sqrt(args: &[Value]) -> EvalResult {
    let x = casting::to_f64(&args[0])?;
    if x < 0.0 {
        return Err(EvalError::new(format!("{} is not a non-negative number.", args[0])));
    }
    Ok(Value::Float(x.sqrt()))
}

/// `rand(min, max)`: integer in `[min, max)`.
fn random(args: &[Value]) -> EvalResult {
    let low = casting::to_i64(&args[0])?;
    let high = casting::to_i64(&args[1])?;
    if low >= high {
        return Err(EvalError::new(format!(
            "Min value {} cannot be greater than or equal to max value {}.",
            low, high
        )));
    }
    Ok(Value::Integer(rand::thread_rng().gen_range(low..high)))
}

// ============================================================================
// Package
// ============================================================================

/// Register the math builtins.
pub fn register_math_package(builder: &mut RegistryBuilder) {
    builder.add(
        Evaluator::new(
            ty::ADD,
            apply_sequence_with_error(add, Some(verify_number_or_string_or_null)),
            ReturnType::STRING | ReturnType::NUMBER,
        )
        .with_validator(|e| {
            validate_arity_and_any_type(e, 2, usize::MAX, ReturnType::STRING | ReturnType::NUMBER)
        }),
    );
    builder.add(
        Evaluator::new(
            ty::SUBTRACT,
            apply_sequence_with_error(subtract, Some(verify_number)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_two_or_more_than_two_numbers),
    );
    builder.add(
        Evaluator::new(
            ty::MULTIPLY,
            apply_sequence_with_error(multiply, Some(verify_number)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_two_or_more_than_two_numbers),
    );
    builder.add(
        Evaluator::new(
            ty::DIVIDE,
            apply_sequence_with_error(divide, Some(verify_divisor)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_two_or_more_than_two_numbers),
    );
    builder.add(
        Evaluator::new(ty::MOD, apply_with_error(modulo, Some(verify_modulus)), ReturnType::NUMBER)
            .with_validator(validate_binary_number),
    );
    builder.add(
        Evaluator::new(
            ty::POWER,
            apply_sequence_with_error(power, Some(verify_number)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_two_or_more_than_two_numbers),
    );

    builder.add(
        Evaluator::new(
            ty::MIN,
            apply_with_error(min, Some(verify_numeric_list_or_number)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_at_least_one),
    );
    builder.add(
        Evaluator::new(
            ty::MAX,
            apply_with_error(max, Some(verify_numeric_list_or_number)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_at_least_one),
    );
    builder.add(
        Evaluator::new(
            ty::SUM,
            apply_with_error(sum, Some(verify_numeric_list)),
            ReturnType::NUMBER,
        )
        .with_validator(|e| validate_order(e, &[], &[ReturnType::ARRAY])),
    );
    builder.add(
        Evaluator::new(
            ty::AVERAGE,
            apply_with_error(average, Some(verify_numeric_list)),
            ReturnType::NUMBER,
        )
        .with_validator(|e| validate_order(e, &[], &[ReturnType::ARRAY])),
    );
    builder.add(
        Evaluator::new(ty::RANGE, apply_with_error(range, Some(verify_integer)), ReturnType::ARRAY)
            .with_validator(validate_binary_number),
    );

    builder.add(
        Evaluator::new(ty::FLOOR, apply_with_error(floor, Some(verify_number)), ReturnType::NUMBER)
            .with_validator(validate_unary_number),
    );
    builder.add(
        Evaluator::new(
            ty::CEILING,
            apply_with_error(ceiling, Some(verify_number)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_unary_number),
    );
    builder.add(
        Evaluator::new(ty::ROUND, apply_with_error(round, Some(verify_number)), ReturnType::NUMBER)
            .with_validator(validate_unary_or_binary_number),
    );
    builder.add(
        Evaluator::new(ty::ABS, apply_with_error(abs, Some(verify_number)), ReturnType::NUMBER)
            .with_validator(validate_unary_number),
    );
    builder.add(
        Evaluator::new(ty::SQRT, apply_with_error(sqrt, Some(verify_number)), ReturnType::NUMBER)
            .with_validator(validate_unary_number),
    );
    builder.add(
        Evaluator::new(ty::RAND, apply_with_error(random, Some(verify_integer)), ReturnType::NUMBER)
            .with_validator(validate_binary_number),
    );
}

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;
