//! Adapters from plain function bodies to evaluate functions.
//!
//! Builtin bodies work on already evaluated arguments and return
//! `Result<Value, EvalError>`. The combinators here evaluate the children left
//! to right, run the optional verifier on each value and stop at the first
//! failure, so every builtin shares the same propagation rules.
//!
//! The module also hosts the path and iteration helpers used by the
//! accessor, element and higher-order builtins.

use super::verifiers::VerifyFn;
use super::{EvalError, EvalResult};
use crate::api::Options;
use crate::casting;
use crate::expression::{Expression, expression_type};
use crate::memory::{Memory, SimpleObjectMemory, StackedMemory};
use crate::values::{ObjectMap, Value};
use smallvec::SmallVec;
use tracing::debug;

/// Evaluated arguments; most builtins take at most four.
pub type Args = SmallVec<[Value; 4]>;

/// Evaluate every child in order, verifying each value.
pub fn evaluate_children(
    expr: &Expression,
    memory: &dyn Memory,
    options: &Options,
    verify: Option<VerifyFn>,
) -> Result<Args, EvalError> {
    let mut args = Args::with_capacity(expr.children().len());
    for (position, child) in expr.children().iter().enumerate() {
        let value = child.try_evaluate(memory, options)?;
        if let Some(verify) = verify {
            if let Some(message) = verify(&value, child, position) {
                return Err(EvalError::new(message));
            }
        }
        args.push(value);
    }
    Ok(args)
}

fn traced(expr: &Expression, result: EvalResult) -> EvalResult {
    if let Err(err) = &result {
        debug!(function = expr.expr_type(), error = %err, "Evaluation failed");
    }
    result
}

/// Wrap an infallible body.
pub fn apply<F>(
    f: F,
    verify: Option<VerifyFn>,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static
where
    F: Fn(&[Value]) -> Value + Send + Sync + 'static,
{
    move |expr, memory, options| {
        let args = evaluate_children(expr, memory, options, verify)?;
        Ok(f(&args))
    }
}

/// Wrap a fallible body.
pub fn apply_with_error<F>(
    f: F,
    verify: Option<VerifyFn>,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static
where
    F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
{
    move |expr, memory, options| {
        let args = evaluate_children(expr, memory, options, verify)?;
        traced(expr, f(&args))
    }
}

/// Wrap a fallible body that also reads the evaluation options, such as the
/// locale.
pub fn apply_with_options_and_error<F>(
    f: F,
    verify: Option<VerifyFn>,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static
where
    F: Fn(&[Value], &Options) -> EvalResult + Send + Sync + 'static,
{
    move |expr, memory, options| {
        let args = evaluate_children(expr, memory, options, verify)?;
        traced(expr, f(&args, options))
    }
}

/// Left fold of a binary body over all arguments.
pub fn apply_sequence<F>(
    f: F,
    verify: Option<VerifyFn>,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static
where
    F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
{
    apply_sequence_with_error(move |a, b| Ok(f(a, b)), verify)
}

/// Left fold of a fallible binary body; the first failing step aborts.
pub fn apply_sequence_with_error<F>(
    f: F,
    verify: Option<VerifyFn>,
) -> impl Fn(&Expression, &dyn Memory, &Options) -> EvalResult + Send + Sync + 'static
where
    F: Fn(&Value, &Value) -> EvalResult + Send + Sync + 'static,
{
    move |expr, memory, options| {
        let args = evaluate_children(expr, memory, options, verify)?;
        let mut iter = args.into_iter();
        let Some(mut acc) = iter.next() else {
            return Ok(Value::Null);
        };
        for next in iter {
            acc = traced(expr, f(&acc, &next))?;
        }
        Ok(acc)
    }
}

/// Iterable view of a value: lists as-is, maps as `{key, value}` pairs in
/// declared order.
pub fn convert_to_list(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::List(items) => Some(items.clone()),
        Value::Map(map) => Some(
            map.iter()
                .map(|(k, v)| Value::map([("key", Value::text(k)), ("value", v.clone())]))
                .collect(),
        ),
        _ => None,
    }
}

/// Collapse a chain of accessors and elements into a memory path, right to
/// left.
///
/// Returns the path (if any segment accumulated) and the leftmost expression
/// that is not part of a path, e.g. `first(items)` in `first(items).x`.
pub fn try_accumulate_path(
    expr: &Expression,
    memory: &dyn Memory,
    options: &Options,
) -> Result<(Option<String>, Option<Expression>), EvalError> {
    let mut segments: Vec<String> = Vec::new();
    let mut left = Some(expr.clone());

    while let Some(current) = left.take() {
        let ty = current.expr_type();
        if ty == expression_type::ACCESSOR {
            let prop = current
                .children()
                .first()
                .and_then(Expression::constant_text)
                .ok_or_else(|| EvalError::new(format!("{} is not a valid accessor", current)))?;
            segments.push(format!(".{}", prop));
            left = current.children().get(1).cloned();
        } else if ty == expression_type::ELEMENT && current.children().len() == 2 {
            let index_expr = &current.children()[1];
            let index = index_expr.try_evaluate(memory, options)?;
            match &index {
                Value::Integer(i) => segments.push(format!("[{}]", i)),
                Value::Float(x) if x.fract() == 0.0 => segments.push(format!("[{}]", index)),
                Value::Text(s) => segments.push(format!("['{}']", s)),
                _ => {
                    return Err(EvalError::new(format!(
                        "{} doesn't return an int or string",
                        index_expr
                    )));
                }
            }
            left = Some(current.children()[0].clone());
        } else {
            left = Some(current);
            break;
        }
    }

    let path: String = segments.iter().rev().map(String::as_str).collect();
    let path = path.strip_prefix('.').unwrap_or(&path).to_string();
    let path = (!path.is_empty()).then_some(path);
    Ok((path, left))
}

/// Read a path, substituting through the options when it is missing or null.
pub fn wrap_get_value(memory: &dyn Memory, path: &str, options: &Options) -> Value {
    match memory.get(path) {
        Some(value) if !value.is_null() => value,
        _ => match &options.null_substitution {
            Some(substitute) => substitute(path),
            None => Value::Null,
        },
    }
}

/// Index into a list. A null instance yields null.
pub fn access_index(instance: &Value, index: &Value) -> EvalResult {
    match instance {
        Value::Null => Ok(Value::Null),
        Value::List(items) => {
            let wide = casting::to_i64(index)?;
            if wide < 0 || wide as usize >= items.len() {
                return Err(EvalError::new("Index was out of range."));
            }
            let i = casting::to_index(index)?;
            Ok(items[i].clone())
        }
        other => Err(EvalError::new(format!("{} is not a collection.", other))),
    }
}

/// Property lookup with case-insensitive fallback. Missing is null.
pub fn access_property(instance: &Value, property: &str) -> Value {
    instance
        .as_map()
        .and_then(|map| map.get(property))
        .cloned()
        .unwrap_or_default()
}

/// Run the body of a `foreach`-shaped node once per element.
///
/// The iteration variable is bound in a fresh frame over `memory` that is
/// popped after each element. `visit` receives the element and the body's
/// value and returns `false` to stop early. The first body error aborts.
pub fn lambda_evaluator<V>(
    expr: &Expression,
    memory: &dyn Memory,
    options: &Options,
    items: Vec<Value>,
    mut visit: V,
) -> Result<(), EvalError>
where
    V: FnMut(Value, Value) -> bool,
{
    let iterator = expr.children()[1]
        .children()
        .first()
        .and_then(Expression::constant_text)
        .unwrap_or_default()
        .to_string();
    let body = &expr.children()[2];

    let mut stack = StackedMemory::wrap(memory);
    for item in items {
        stack.push(SimpleObjectMemory::with_binding(&iterator, item.clone()));
        let result = body.try_evaluate(&stack, options);
        stack.pop().map_err(|e| EvalError::new(e.to_string()))?;
        if !visit(item, result?) {
            break;
        }
    }
    Ok(())
}

/// Evaluate the collection child of a `foreach`-shaped node.
///
/// Returns the evaluated instance together with its iterable view.
pub fn lambda_source(
    expr: &Expression,
    memory: &dyn Memory,
    options: &Options,
) -> Result<(Value, Vec<Value>), EvalError> {
    let source = &expr.children()[0];
    let instance = source.try_evaluate(memory, options)?;
    if instance.is_null() {
        return Err(EvalError::new(format!("'{}' evaluated to null.", source)));
    }
    let items = convert_to_list(&instance).ok_or_else(|| {
        EvalError::new(format!(
            "{} is not a collection or structure object to run Foreach",
            source
        ))
    })?;
    Ok((instance, items))
}

/// Build a map from `(key, value)` pairs.
pub(crate) fn object_of<I>(entries: I) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    Value::Map(entries.into_iter().collect::<ObjectMap>())
}
