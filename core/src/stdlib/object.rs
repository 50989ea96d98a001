//! Object Package
//!
//! Memory access (`Accessor`, `Element`), property manipulation, deep merge
//! and a small JSON path dialect.
//!
//! Property builtins never mutate their input: they return an updated copy.
//! Only `setPathToValue` writes to memory.

use crate::api::Options;
use crate::evaluator::combinators::{
    access_index, access_property, apply_sequence_with_error, apply_with_error, evaluate_children,
    try_accumulate_path, wrap_get_value,
};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, ExpressionError, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::memory::{Memory, SimpleObjectMemory};
use crate::values::{ObjectMap, Value};

// ============================================================================
// Memory access
// ============================================================================

/// `a.b.c`: one memory lookup for the whole path; a non-path head is
/// evaluated first and the rest of the path resolves against its value.
fn accessor(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    match try_accumulate_path(expr, memory, options)? {
        (Some(path), None) => Ok(wrap_get_value(memory, &path, options)),
        (Some(path), Some(left)) => {
            let instance = left.try_evaluate(memory, options)?;
            Ok(wrap_get_value(&SimpleObjectMemory::new(instance), &path, options))
        }
        (None, Some(left)) => left.try_evaluate(memory, options),
        (None, None) => Ok(Value::Null),
    }
}

/// `instance[index]`: integer indices address lists, text indices address
/// properties.
fn element(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let instance_expr = &expr.children()[0];
    let index_expr = &expr.children()[1];
    let instance = instance_expr.try_evaluate(memory, options)?;
    let index = index_expr.try_evaluate(memory, &options.without_null_substitution())?;

    let value = match &index {
        Value::Integer(_) => access_index(&instance, &index)?,
        Value::Float(x) if x.fract() == 0.0 => access_index(&instance, &index)?,
        Value::Text(name) => access_property(&instance, name),
        other => {
            return Err(EvalError::new(format!(
                "Could not coerce {}<{}> to an int or string",
                index_expr,
                other.kind_name()
            )));
        }
    };

    if value.is_null() && options.null_substitution.is_some() {
        if let (Some(path), None) = try_accumulate_path(expr, memory, options)? {
            return Ok(wrap_get_value(memory, &path, options));
        }
    }
    Ok(value)
}

fn require_object<'v>(value: &'v Value, name: &str) -> Result<&'v ObjectMap, EvalError> {
    value
        .as_map()
        .ok_or_else(|| {
            EvalError::new(format!("{} is not an object, {} expects an object.", value, name))
        })
}

/// `getProperty(instance, name)`, or `getProperty(name)` against memory.
fn get_property(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let args = evaluate_children(expr, memory, options, None)?;
    match args.as_slice() {
        [name] => Ok(wrap_get_value(memory, &name.to_text(), options)),
        [Value::Null, _] => Ok(Value::Null),
        [instance, name] => {
            require_object(instance, ty::GET_PROPERTY)?;
            Ok(access_property(instance, &name.to_text()))
        }
        _ => Ok(Value::Null),
    }
}

fn add_property(args: &[Value]) -> EvalResult {
    let mut map = require_object(&args[0], ty::ADD_PROPERTY)?.clone();
    let name = args[1].to_text();
    if map.contains_key(&name) {
        return Err(EvalError::new(format!("{} already exists", name)));
    }
    map.insert(name, args[2].clone());
    Ok(Value::Map(map))
}

fn set_property(args: &[Value]) -> EvalResult {
    let mut map = require_object(&args[0], ty::SET_PROPERTY)?.clone();
    map.insert(args[1].to_text(), args[2].clone());
    Ok(Value::Map(map))
}

fn remove_property(args: &[Value]) -> EvalResult {
    let mut map = require_object(&args[0], ty::REMOVE_PROPERTY)?.clone();
    map.remove(&args[1].to_text());
    Ok(Value::Map(map))
}

/// `setPathToValue(path, value)`: the first child must be a pure memory path.
fn set_path_to_value(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let target = &expr.children()[0];
    let path = match try_accumulate_path(target, memory, options)? {
        (Some(path), None) => path,
        _ => return Err(EvalError::new(format!("{} is not a valid path to set value", target))),
    };
    let value = expr.children()[1].try_evaluate(memory, options)?;
    memory.set(&path, value)
}

// ============================================================================
// Merge
// ============================================================================

/// Deep merge: nested objects merge, everything else is replaced.
fn merge_into(target: &mut ObjectMap, source: &ObjectMap) {
    for (key, value) in source.iter() {
        match (target.get_mut(key), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => merge_into(existing, incoming),
            (Some(slot), _) => *slot = value.clone(),
            (None, _) => {
                target.insert(key, value.clone());
            }
        }
    }
}

fn merge(acc: &Value, next: &Value) -> EvalResult {
    let mut merged = require_object(acc, ty::MERGE)?.clone();
    merge_into(&mut merged, require_object(next, ty::MERGE)?);
    Ok(Value::Map(merged))
}

// ============================================================================
// JSON path
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Child(String),
    Index(i64),
    Wildcard,
    Descendant(String),
}

fn parse_json_path(path: &str) -> Result<Vec<Step>, EvalError> {
    let invalid =
        |reason: &str| EvalError::new(format!("{} is not a valid json path: {}", path, reason));
    let chars: Vec<char> = path.trim().chars().collect();
    let mut steps = Vec::new();
    let mut i = 0;
    if chars.first() == Some(&'$') {
        i = 1;
    }

    let read_name = |i: &mut usize| {
        let start = *i;
        while *i < chars.len() && !matches!(chars[*i], '.' | '[') {
            *i += 1;
        }
        chars[start..*i].iter().collect::<String>()
    };

    while i < chars.len() {
        match chars[i] {
            '.' if chars.get(i + 1) == Some(&'.') => {
                i += 2;
                let name = read_name(&mut i);
                if name.is_empty() {
                    return Err(invalid("expected a property after '..'"));
                }
                steps.push(Step::Descendant(name));
            }
            '.' => {
                i += 1;
                let name = read_name(&mut i);
                match name.as_str() {
                    "" => return Err(invalid("expected a property after '.'")),
                    "*" => steps.push(Step::Wildcard),
                    _ => steps.push(Step::Child(name)),
                }
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|offset| i + offset)
                    .ok_or_else(|| invalid("unterminated '['"))?;
                let inner: String = chars[i + 1..close].iter().collect();
                let inner = inner.trim();
                if inner.starts_with('?') || inner.starts_with('(') {
                    return Err(EvalError::new(format!(
                        "jPath filters are not supported: {}",
                        path
                    )));
                }
                if inner == "*" {
                    steps.push(Step::Wildcard);
                } else if let Some(quoted) = inner
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
                {
                    steps.push(Step::Child(quoted.to_string()));
                } else {
                    let index = inner.parse::<i64>().map_err(|_| invalid("expected an index"))?;
                    steps.push(Step::Index(index));
                }
                i = close + 1;
            }
            _ if i == 0 => {
                let name = read_name(&mut i);
                steps.push(Step::Child(name));
            }
            other => return Err(invalid(&format!("unexpected '{}'", other))),
        }
    }
    Ok(steps)
}

fn collect_descendants<'v>(value: &'v Value, name: &str, out: &mut Vec<&'v Value>) {
    match value {
        Value::Map(map) => {
            if let Some(found) = map.get_exact(name) {
                out.push(found);
            }
            for child in map.values() {
                collect_descendants(child, name, out);
            }
        }
        Value::List(items) => {
            for child in items {
                collect_descendants(child, name, out);
            }
        }
        _ => {}
    }
}

fn select_tokens<'v>(root: &'v Value, steps: &[Step]) -> Vec<&'v Value> {
    let mut current = vec![root];
    for step in steps {
        let mut next = Vec::new();
        for value in current {
            match (step, value) {
                (Step::Child(name), Value::Map(map)) => next.extend(map.get_exact(name)),
                (Step::Index(index), Value::List(items)) => {
                    let position = if *index < 0 { items.len() as i64 + index } else { *index };
                    if let Ok(position) = usize::try_from(position) {
                        next.extend(items.get(position));
                    }
                }
                (Step::Wildcard, Value::Map(map)) => next.extend(map.values()),
                (Step::Wildcard, Value::List(items)) => next.extend(items.iter()),
                (Step::Descendant(name), _) => collect_descendants(value, name, &mut next),
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// `jPath(object, path)`: one match is returned as-is, several as a list.
fn jpath(args: &[Value]) -> EvalResult {
    let root = match &args[0] {
        Value::Text(json) => Value::parse_json(json)
            .map_err(|e| EvalError::new(format!("{} is not a valid json string: {}", json, e)))?,
        other => other.clone(),
    };
    let path = args[1].to_text();
    let steps = parse_json_path(&path)?;
    let mut matches = select_tokens(&root, &steps);
    match matches.len() {
        0 => Err(EvalError::new(format!("{} does not evaluate to a valid result", path))),
        1 => Ok(matches.remove(0).clone()),
        _ => Ok(Value::list(matches.into_iter().cloned())),
    }
}

// ============================================================================
// Package
// ============================================================================

fn validate_accessor(expr: &Expression) -> Result<(), ExpressionError> {
    validate_order(expr, &[ReturnType::OBJECT], &[ReturnType::STRING])?;
    match expr.children()[0].constant_text() {
        Some(_) => Ok(()),
        None => Err(ExpressionError::InvalidArgument(format!(
            "{} must have a constant string property name.",
            expr
        ))),
    }
}

/// Register the memory access and object builtins.
pub fn register_object_package(builder: &mut RegistryBuilder) {
    let object = ReturnType::OBJECT;

    builder.add(Evaluator::new(ty::ACCESSOR, accessor, object).with_validator(validate_accessor));
    builder.add(Evaluator::new(ty::ELEMENT, element, object).with_validator(validate_binary));
    builder.add(
        Evaluator::new(ty::GET_PROPERTY, get_property, object)
            .with_validator(move |e| validate_order(e, &[ReturnType::STRING], &[object])),
    );
    for (name, f) in [
        (ty::ADD_PROPERTY, add_property as fn(&[Value]) -> EvalResult),
        (ty::SET_PROPERTY, set_property),
    ] {
        builder.add(
            Evaluator::new(name, apply_with_error(f, None), object).with_validator(move |e| {
                validate_order(e, &[], &[object, ReturnType::STRING, object])
            }),
        );
    }
    builder.add(
        Evaluator::new(ty::REMOVE_PROPERTY, apply_with_error(remove_property, None), object)
            .with_validator(move |e| validate_order(e, &[], &[object, ReturnType::STRING])),
    );
    builder.add(
        Evaluator::new(ty::SET_PATH_TO_VALUE, set_path_to_value, object)
            .with_validator(validate_binary),
    );
    builder.add(
        Evaluator::new(ty::MERGE, apply_sequence_with_error(merge, Some(verify_not_null)), object)
            .with_validator(move |e| validate_arity_and_any_type(e, 2, usize::MAX, object)),
    );
    builder.add(
        Evaluator::new(ty::JPATH, apply_with_error(jpath, None), object)
            .with_validator(move |e| validate_order(e, &[], &[object, ReturnType::STRING])),
    );
}

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;
