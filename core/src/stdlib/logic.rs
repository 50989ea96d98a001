//! Logic Package
//!
//! Comparison operators, short-circuiting boolean operators, `if`,
//! `exists`, `coalesce` and the pass-through markers `optional` and `ignore`.
//!
//! Child failures inside logical and comparison operators do not propagate:
//! the failing operand counts as false.

use crate::api::Options;
use crate::evaluator::combinators::{apply, evaluate_children};
use crate::evaluator::validators::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::memory::Memory;
use crate::values::Value;
use core::cmp::Ordering;

// ============================================================================
// Comparison
// ============================================================================

/// Evaluator body shared by the ordering operators.
fn ordering(
    accept: fn(Ordering) -> bool,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static {
    move |expr, memory, options| {
        let Ok(args) = evaluate_children(expr, memory, options, None) else {
            return Ok(Value::Bool(false));
        };
        let all_numbers = args.iter().all(Value::is_number);
        let all_text = args.iter().all(Value::is_text);
        if !(all_numbers || all_text) {
            return Err(EvalError::new(format!(
                "Arguments must either all be numbers or strings in {}",
                expr
            )));
        }
        let result = args[0].compare(&args[1]).is_some_and(accept);
        Ok(Value::Bool(result))
    }
}

fn equality(
    negate: bool,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static {
    move |expr, memory, options| {
        let Ok(args) = evaluate_children(expr, memory, options, None) else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(args[0].loose_eq(&args[1]) != negate))
    }
}

// ============================================================================
// Boolean operators
// ============================================================================

/// Truthiness of a child; failures count as false.
fn child_is_true(child: &Expression, memory: &dyn Memory, options: &Options) -> bool {
    child
        .try_evaluate(memory, options)
        .is_ok_and(|value| value.is_truthy())
}

fn and(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let result = expr
        .children()
        .iter()
        .all(|child| child_is_true(child, memory, options));
    Ok(Value::Bool(result))
}

fn or(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let result = expr
        .children()
        .iter()
        .any(|child| child_is_true(child, memory, options));
    Ok(Value::Bool(result))
}

fn not(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    Ok(Value::Bool(!child_is_true(&expr.children()[0], memory, options)))
}

/// `if(condition, then, else)`: only the chosen branch is evaluated.
fn if_then_else(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let children = expr.children();
    if child_is_true(&children[0], memory, options) {
        children[1].try_evaluate(memory, options)
    } else {
        children[2].try_evaluate(memory, options)
    }
}

fn coalesce(args: &[Value]) -> Value {
    args.iter().find(|v| !v.is_null()).cloned().unwrap_or_default()
}

// ============================================================================
// Package
// ============================================================================

/// Register the logic builtins.
pub fn register_logic_package(builder: &mut RegistryBuilder) {
    let orderings: [(&str, fn(Ordering) -> bool); 4] = [
        (ty::LESS_THAN, Ordering::is_lt),
        (ty::LESS_THAN_OR_EQUAL, Ordering::is_le),
        (ty::GREATER_THAN, Ordering::is_gt),
        (ty::GREATER_THAN_OR_EQUAL, Ordering::is_ge),
    ];
    for (name, accept) in orderings {
        builder.add(
            Evaluator::new(name, ordering(accept), ReturnType::BOOLEAN)
                .with_validator(validate_binary_number_or_string),
        );
    }
    builder.add(
        Evaluator::new(ty::EQUAL, equality(false), ReturnType::BOOLEAN)
            .with_validator(validate_binary),
    );
    builder.add(
        Evaluator::new(ty::NOT_EQUAL, equality(true), ReturnType::BOOLEAN)
            .with_validator(validate_binary),
    );

    builder.add(
        Evaluator::new(
            ty::EXISTS,
            apply(|args| Value::Bool(!args[0].is_null()), None),
            ReturnType::BOOLEAN,
        )
        .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::AND, and, ReturnType::BOOLEAN)
            .with_validator(validate_at_least_one),
    );
    builder.add(
        Evaluator::new(ty::OR, or, ReturnType::BOOLEAN)
            .with_validator(validate_at_least_one),
    );
    builder.add(Evaluator::new(ty::NOT, not, ReturnType::BOOLEAN).with_validator(validate_unary));
    builder.add(
        Evaluator::new(ty::IF, if_then_else, ReturnType::OBJECT)
            .with_validator(|e| validate_arity_and_any_type(e, 3, 3, ReturnType::OBJECT)),
    );
    builder.add(
        Evaluator::new(ty::COALESCE, apply(coalesce, None), ReturnType::OBJECT)
            .with_validator(validate_at_least_one),
    );

    // Markers for trigger rewriting; at runtime they pass their child through.
    for marker in [ty::OPTIONAL, ty::IGNORE] {
        builder.add(
            Evaluator::new(marker, apply(|args| args[0].clone(), None), ReturnType::BOOLEAN)
                .with_validator(validate_unary_boolean),
        );
    }
}

#[cfg(test)]
#[path = "logic_test.rs"]
mod logic_test;
