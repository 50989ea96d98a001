//! Collection Package
//!
//! Builtins over lists (and, where it makes sense, strings and objects),
//! including the higher-order `foreach`/`select`/`where`/`any`/`all` family.
//!
//! ## Design Principles
//!
//! - Set-like builtins (`union`, `intersection`, `unique`) keep first-seen
//!   order and compare with loose equality, so `1` and `1.0` collapse.
//! - Higher-order builtins bind the iteration variable in a stacked frame;
//!   the binding never leaks into the caller's memory.

use crate::api::Options;
use crate::casting;
use crate::evaluator::combinators::{
    apply, apply_with_error, evaluate_children, lambda_evaluator, lambda_source, object_of,
};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::memory::Memory;
use crate::values::{ObjectMap, Value};

const DEFAULT_FLATTEN_DEPTH: i64 = 100;

fn push_distinct(out: &mut Vec<Value>, value: &Value) {
    if !out.iter().any(|seen| seen.loose_eq(value)) {
        out.push(value.clone());
    }
}

// ============================================================================
// Inspection
// ============================================================================

fn count(args: &[Value]) -> Value {
    let n = match &args[0] {
        Value::Text(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        _ => 0,
    };
    Value::Integer(n as i64)
}

/// Substring for text, element for lists, key for objects.
fn contains(args: &[Value]) -> Value {
    let found = match (&args[0], &args[1]) {
        (Value::Text(s), needle) => s.contains(needle.to_text().as_str()),
        (Value::List(items), needle) => items.iter().any(|v| v.loose_eq(needle)),
        (Value::Map(map), Value::Text(key)) => map.contains_key(key),
        _ => false,
    };
    Value::Bool(found)
}

fn empty(args: &[Value]) -> Value {
    let is_empty = match &args[0] {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        _ => false,
    };
    Value::Bool(is_empty)
}

fn first(args: &[Value]) -> Value {
    match &args[0] {
        Value::Text(s) => s.chars().next().map(|c| Value::Text(c.to_string())).unwrap_or_default(),
        Value::List(items) => items.first().cloned().unwrap_or_default(),
        _ => Value::Null,
    }
}

fn last(args: &[Value]) -> Value {
    match &args[0] {
        Value::Text(s) => s.chars().last().map(|c| Value::Text(c.to_string())).unwrap_or_default(),
        Value::List(items) => items.last().cloned().unwrap_or_default(),
        _ => Value::Null,
    }
}

/// `join(list, separator, lastSeparator?)`
fn join(args: &[Value]) -> EvalResult {
    let items = args[0]
        .as_list()
        .ok_or_else(|| EvalError::new(format!("{} is not a list.", args[0])))?;
    let separator = args[1].to_text();
    let parts: Vec<String> = items.iter().map(Value::to_text).collect();
    let joined = match (args.get(2), parts.split_last()) {
        (Some(last_separator), Some((tail, init))) if !init.is_empty() => {
            format!("{}{}{}", init.join(&separator), last_separator.to_text(), tail)
        }
        _ => parts.join(&separator),
    };
    Ok(Value::Text(joined))
}

// ============================================================================
// Higher-order
// ============================================================================

/// `foreach` and `select`: the body's value for every element.
fn foreach(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let (_, items) = lambda_source(expr, memory, options)?;
    let mut out = Vec::with_capacity(items.len());
    lambda_evaluator(expr, memory, options, items, |_, result| {
        out.push(result);
        true
    })?;
    Ok(Value::List(out))
}

/// Elements whose body is truthy. Filtering an object yields an object.
fn where_(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let (instance, items) = lambda_source(expr, memory, options)?;
    let mut kept = Vec::new();
    lambda_evaluator(expr, memory, options, items, |item, result| {
        if result.is_truthy() {
            kept.push(item);
        }
        true
    })?;

    if instance.is_map() {
        let mut map = ObjectMap::with_capacity(kept.len());
        for pair in kept.iter().filter_map(Value::as_map) {
            if let (Some(Value::Text(key)), Some(value)) = (pair.get("key"), pair.get("value")) {
                map.insert(key.clone(), value.clone());
            }
        }
        return Ok(Value::Map(map));
    }
    Ok(Value::List(kept))
}

fn any(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let (_, items) = lambda_source(expr, memory, options)?;
    let mut found = false;
    lambda_evaluator(expr, memory, options, items, |_, result| {
        found = result.is_truthy();
        !found
    })?;
    Ok(Value::Bool(found))
}

fn all(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let (_, items) = lambda_source(expr, memory, options)?;
    let mut holds = true;
    lambda_evaluator(expr, memory, options, items, |_, result| {
        holds = result.is_truthy();
        holds
    })?;
    Ok(Value::Bool(holds))
}

// ============================================================================
// Set operations
// ============================================================================

fn union(args: &[Value]) -> Value {
    let mut out = Vec::new();
    for list in args.iter().filter_map(Value::as_list) {
        for item in list {
            push_distinct(&mut out, item);
        }
    }
    Value::List(out)
}

fn intersection(args: &[Value]) -> Value {
    let lists: Vec<&[Value]> = args.iter().filter_map(Value::as_list).collect();
    let Some((head, rest)) = lists.split_first() else {
        return Value::List(Vec::new());
    };
    let mut out = Vec::new();
    for item in head.iter() {
        if rest.iter().all(|list| list.iter().any(|v| v.loose_eq(item))) {
            push_distinct(&mut out, item);
        }
    }
    Value::List(out)
}

fn unique(args: &[Value]) -> Value {
    let mut out = Vec::new();
    for item in args[0].as_list().unwrap_or_default() {
        push_distinct(&mut out, item);
    }
    Value::List(out)
}

// ============================================================================
// Slicing
// ============================================================================

/// Clamp a count into `0..=len`.
fn clamp_count(value: &Value, len: usize) -> Result<usize, EvalError> {
    let n = casting::to_i64(value)?;
    Ok(n.clamp(0, len as i64) as usize)
}

fn skip(args: &[Value]) -> EvalResult {
    let items = args[0].as_list().unwrap_or_default();
    let start = clamp_count(&args[1], items.len())?;
    Ok(Value::list(items[start..].iter().cloned()))
}

/// `take(list | text, count)`
fn take(args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Text(s) => {
            let chars: Vec<char> = s.chars().collect();
            let n = clamp_count(&args[1], chars.len())?;
            Ok(Value::Text(chars[..n].iter().collect()))
        }
        Value::List(items) => {
            let n = clamp_count(&args[1], items.len())?;
            Ok(Value::list(items[..n].iter().cloned()))
        }
        other => Err(EvalError::new(format!("{} is not array or string.", other))),
    }
}

/// `subArray(list, start, end?)`, reporting the offending argument.
fn sub_array(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let args = evaluate_children(expr, memory, options, None)?;
    let items = args[0]
        .as_list()
        .ok_or_else(|| EvalError::new(format!("{} is not array.", expr.children()[0])))?;
    let bound = |position: usize| -> Result<usize, EvalError> {
        let child = &expr.children()[position];
        let n = casting::to_i64(&args[position])
            .map_err(|_| EvalError::new(format!("{} is not an integer.", child)))?;
        if n < 0 || n as usize > items.len() {
            return Err(EvalError::new(format!(
                "{}={} which is out of range for {}",
                child, n, args[0]
            )));
        }
        Ok(n as usize)
    };
    let start = bound(1)?;
    let end = if args.len() > 2 { bound(2)? } else { items.len() };
    if start > end {
        return Err(EvalError::new(format!(
            "{} should be less than or equal to {}",
            expr.children()[1],
            expr.children()[2]
        )));
    }
    Ok(Value::list(items[start..end].iter().cloned()))
}

// ============================================================================
// Ordering and reshaping
// ============================================================================

/// `sortBy(list, property?)`; stable, nulls and mixed kinds sort by kind.
fn sort_by(
    descending: bool,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static {
    move |expr, memory, options| {
        let args = evaluate_children(expr, memory, options, None)?;
        let items = args[0]
            .as_list()
            .ok_or_else(|| EvalError::new(format!("{} is not array", expr.children()[0])))?;
        let property = args.get(1).map(Value::to_text);
        let key = |v: &Value| -> Value {
            match &property {
                Some(p) => v.as_map().and_then(|m| m.get(p)).cloned().unwrap_or_default(),
                None => v.clone(),
            }
        };
        let mut sorted = items.to_vec();
        sorted.sort_by(|a, b| key(a).sort_cmp(&key(b)));
        if descending {
            sorted.reverse();
        }
        Ok(Value::List(sorted))
    }
}

/// Lists become `{index, value}` pairs; objects use their keys as the index.
fn indices_and_values(args: &[Value]) -> EvalResult {
    let pair = |index: Value, value: &Value| {
        object_of([("index".to_string(), index), ("value".to_string(), value.clone())])
    };
    match &args[0] {
        Value::List(items) => Ok(Value::list(
            items.iter().enumerate().map(|(i, v)| pair(Value::Integer(i as i64), v)),
        )),
        Value::Map(map) => Ok(Value::list(map.iter().map(|(k, v)| pair(Value::text(k), v)))),
        other => Err(EvalError::new(format!("{} is not array or object.", other))),
    }
}

fn flatten_into(items: &[Value], depth: i64, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::List(inner) if depth > 0 => flatten_into(inner, depth - 1, out),
            other => out.push(other.clone()),
        }
    }
}

/// `flatten(list, depth?)`
fn flatten(args: &[Value]) -> EvalResult {
    let depth = match args.get(1) {
        Some(value) => casting::to_i64(value)?,
        None => DEFAULT_FLATTEN_DEPTH,
    };
    let mut out = Vec::new();
    flatten_into(args[0].as_list().unwrap_or_default(), depth, &mut out);
    Ok(Value::List(out))
}

fn reverse(args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Text(s) => Ok(Value::Text(s.chars().rev().collect())),
        Value::List(items) => Ok(Value::list(items.iter().rev().cloned())),
        other => Err(EvalError::new(format!("{} is not a string or list.", other))),
    }
}

fn create_array(args: &[Value]) -> Value {
    Value::list(args.iter().cloned())
}

// ============================================================================
// Package
// ============================================================================

/// Register the collection builtins.
pub fn register_collection_package(builder: &mut RegistryBuilder) {
    builder.add(
        Evaluator::new(ty::COUNT, apply(count, Some(verify_container)), ReturnType::NUMBER)
            .with_validator(|e| validate_order(e, &[], &[ReturnType::STRING | ReturnType::ARRAY])),
    );
    builder.add(
        Evaluator::new(ty::CONTAINS, apply(contains, None), ReturnType::BOOLEAN)
            .with_validator(validate_binary),
    );
    builder.add(
        Evaluator::new(ty::EMPTY, apply(empty, None), ReturnType::BOOLEAN)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::FIRST, apply(first, None), ReturnType::OBJECT)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::LAST, apply(last, None), ReturnType::OBJECT)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::JOIN, apply_with_error(join, None), ReturnType::STRING)
            .with_validator(|e| {
                validate_order(e, &[ReturnType::STRING], &[ReturnType::ARRAY, ReturnType::STRING])
            }),
    );

    builder.add(
        Evaluator::new(ty::FOREACH, foreach, ReturnType::ARRAY)
            .with_validator(validate_lambda_expression),
    );
    builder.add(
        Evaluator::new(ty::SELECT, foreach, ReturnType::ARRAY)
            .with_validator(validate_lambda_expression),
    );
    builder.add(
        Evaluator::new(ty::WHERE, where_, ReturnType::ARRAY)
            .with_validator(validate_lambda_expression),
    );
    builder.add(
        Evaluator::new(ty::ANY, any, ReturnType::BOOLEAN)
            .with_validator(validate_lambda_expression),
    );
    builder.add(
        Evaluator::new(ty::ALL, all, ReturnType::BOOLEAN)
            .with_validator(validate_lambda_expression),
    );

    builder.add(
        Evaluator::new(ty::UNION, apply(union, Some(verify_list)), ReturnType::ARRAY)
            .with_validator(|e| validate_arity_and_any_type(e, 1, usize::MAX, ReturnType::ARRAY)),
    );
    builder.add(
        Evaluator::new(ty::INTERSECTION, apply(intersection, Some(verify_list)), ReturnType::ARRAY)
            .with_validator(|e| validate_arity_and_any_type(e, 1, usize::MAX, ReturnType::ARRAY)),
    );
    builder.add(
        Evaluator::new(ty::UNIQUE, apply(unique, Some(verify_list)), ReturnType::ARRAY)
            .with_validator(|e| validate_order(e, &[], &[ReturnType::ARRAY])),
    );

    builder.add(
        Evaluator::new(
            ty::SKIP,
            apply_with_error(skip, Some(verify_list_then_integer)),
            ReturnType::ARRAY,
        )
        .with_validator(|e| validate_order(e, &[], &[ReturnType::ARRAY, ReturnType::NUMBER])),
    );
    builder.add(
        Evaluator::new(
            ty::TAKE,
            apply_with_error(take, None),
            ReturnType::ARRAY | ReturnType::STRING,
        )
        .with_validator(|e| {
            validate_order(e, &[], &[ReturnType::ARRAY | ReturnType::STRING, ReturnType::NUMBER])
        }),
    );
    builder.add(
        Evaluator::new(ty::SUB_ARRAY, sub_array, ReturnType::ARRAY).with_validator(|e| {
            validate_order(e, &[ReturnType::NUMBER], &[ReturnType::ARRAY, ReturnType::NUMBER])
        }),
    );

    for (name, descending) in [(ty::SORT_BY, false), (ty::SORT_BY_DESCENDING, true)] {
        builder.add(
            Evaluator::new(name, sort_by(descending), ReturnType::ARRAY)
                .with_validator(|e| validate_order(e, &[ReturnType::STRING], &[ReturnType::ARRAY])),
        );
    }
    builder.add(
        Evaluator::new(
            ty::INDICES_AND_VALUES,
            apply_with_error(indices_and_values, None),
            ReturnType::ARRAY,
        )
        .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(
            ty::FLATTEN,
            apply_with_error(flatten, Some(verify_list_then_integer)),
            ReturnType::ARRAY,
        )
        .with_validator(|e| validate_order(e, &[ReturnType::NUMBER], &[ReturnType::ARRAY])),
    );
    builder.add(
        Evaluator::new(
            ty::REVERSE,
            apply_with_error(reverse, None),
            ReturnType::ARRAY | ReturnType::STRING,
        )
        .with_validator(validate_unary),
    );
    builder.add(Evaluator::new(ty::CREATE_ARRAY, apply(create_array, None), ReturnType::ARRAY));
}

/// A list followed by an integer count.
fn verify_list_then_integer(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    match position {
        0 => verify_list(value, expr, position),
        _ => verify_integer(value, expr, position),
    }
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;
