//! String Package
//!
//! Text manipulation builtins. Null text arguments behave as the empty
//! string; indices and lengths count characters.

use super::resolve_culture;
use crate::api::Options;
use crate::casting;
use crate::evaluator::combinators::{
    apply, apply_sequence, apply_with_error, apply_with_options_and_error, evaluate_children,
};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::memory::Memory;
use crate::values::Value;
use rand::RngCore;

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

// ============================================================================
// Building and measuring
// ============================================================================

/// Lists concatenate as lists; everything else is stringified.
fn concat(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Null, Value::Null) => Value::Null,
        (Value::Null, Value::List(_)) => b.clone(),
        (Value::List(_), Value::Null) => a.clone(),
        (Value::List(x), Value::List(y)) => Value::list(x.iter().chain(y).cloned()),
        _ => Value::Text(format!("{}{}", a.to_text(), b.to_text())),
    }
}

fn length(args: &[Value]) -> Value {
    Value::Integer(text(&args[0]).chars().count() as i64)
}

fn count_word(args: &[Value]) -> Value {
    Value::Integer(text(&args[0]).split_whitespace().count() as i64)
}

/// `addOrdinal(n)`: `1st`, `2nd`, `11th`. Non-positive numbers render as-is.
fn add_ordinal(args: &[Value]) -> EvalResult {
    let n = casting::to_i64(&args[0])?;
    if n <= 0 {
        return Ok(Value::Text(n.to_string()));
    }
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    Ok(Value::Text(format!("{}{}", n, suffix)))
}

/// Random version 4 UUID in hyphenated lowercase form.
fn new_guid(_: &[Value]) -> Value {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    Value::Text(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}

fn eol(_: &[Value]) -> Value {
    Value::text(if cfg!(windows) { "\r\n" } else { "\n" })
}

// ============================================================================
// Replacing and splitting
// ============================================================================

fn replace(args: &[Value]) -> EvalResult {
    let old = text(&args[1]);
    if old.is_empty() {
        return Err(EvalError::new(format!(
            "'{}' should be a string with length at least 1",
            old
        )));
    }
    Ok(Value::Text(text(&args[0]).replace(old, text(&args[2]))))
}

fn replace_ignore_case(args: &[Value]) -> EvalResult {
    let old = text(&args[1]);
    if old.is_empty() {
        return Err(EvalError::new(format!(
            "'{}' should be a string with length at least 1",
            old
        )));
    }
    let pattern = regex::RegexBuilder::new(&regex::escape(old))
        .case_insensitive(true)
        .build()
        .map_err(|e| EvalError::new(e.to_string()))?;
    let replaced = pattern.replace_all(text(&args[0]), regex::NoExpand(text(&args[2])));
    Ok(Value::Text(replaced.into_owned()))
}

/// `split(text, separator?)`; an empty separator splits into characters.
fn split(args: &[Value]) -> Value {
    let source = text(&args[0]);
    let separator = args.get(1).map(text).unwrap_or("");
    if separator.is_empty() {
        return Value::list(source.chars().map(|c| Value::Text(c.to_string())));
    }
    Value::list(source.split(separator).map(Value::text))
}

/// `substring(text, start, length?)`, reporting the offending argument.
fn substring(expr: &Expression, memory: &dyn Memory, options: &Options) -> EvalResult {
    let args = evaluate_children(expr, memory, options, None)?;
    let source = match &args[0] {
        Value::Null => return Ok(Value::text("")),
        Value::Text(s) => s,
        other => return Err(EvalError::new(format!("{} is not a string.", other))),
    };
    let chars: Vec<char> = source.chars().collect();
    let start = casting::to_i64(&args[1])
        .map_err(|_| EvalError::new(format!("{} is not an integer.", expr.children()[1])))?;
    if start < 0 || start as usize > chars.len() {
        return Err(EvalError::new(format!(
            "{}={} which is out of range for {}",
            expr.children()[1],
            start,
            source
        )));
    }
    let start = start as usize;
    let length = match args.get(2) {
        Some(value) => {
            let length = casting::to_i64(value)
                .map_err(|_| EvalError::new(format!("{} is not an integer.", expr.children()[2])))?;
            if length < 0 || start + length as usize > chars.len() {
                return Err(EvalError::new(format!(
                    "{}={} which is out of range for {}",
                    expr.children()[2],
                    length,
                    source
                )));
            }
            length as usize
        }
        None => chars.len() - start,
    };
    Ok(Value::Text(chars[start..start + length].iter().collect()))
}

// ============================================================================
// Casing
// ============================================================================

fn to_lower(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(1), options)?;
    Ok(Value::Text(text(&args[0]).to_lowercase()))
}

fn to_upper(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(1), options)?;
    Ok(Value::Text(text(&args[0]).to_uppercase()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn sentence_case(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(1), options)?;
    Ok(Value::Text(capitalize(text(&args[0]))))
}

/// Capitalize every space separated word; spacing is preserved.
fn title_case(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(1), options)?;
    let words: Vec<String> = text(&args[0]).split(' ').map(capitalize).collect();
    Ok(Value::Text(words.join(" ")))
}

// ============================================================================
// Searching
// ============================================================================

fn starts_with(args: &[Value]) -> Value {
    Value::Bool(text(&args[0]).starts_with(text(&args[1])))
}

fn ends_with(args: &[Value]) -> Value {
    Value::Bool(text(&args[0]).ends_with(text(&args[1])))
}

fn char_index(source: &str, byte_index: usize) -> i64 {
    source[..byte_index].chars().count() as i64
}

/// `indexOf(text | list, search)`; -1 when absent.
fn index_of(args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::List(items) => Ok(Value::Integer(
            items.iter().position(|v| v.loose_eq(&args[1])).map_or(-1, |i| i as i64),
        )),
        Value::Null | Value::Text(_) => {
            let source = text(&args[0]);
            let search = args[1].to_text();
            if args[0].is_null() {
                return Ok(Value::Integer(-1));
            }
            Ok(Value::Integer(
                source.find(search.as_str()).map_or(-1, |i| char_index(source, i)),
            ))
        }
        other => Err(EvalError::new(format!("{} works only on string or list.", other))),
    }
}

fn last_index_of(args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::List(items) => Ok(Value::Integer(
            items.iter().rposition(|v| v.loose_eq(&args[1])).map_or(-1, |i| i as i64),
        )),
        Value::Null => Ok(Value::Integer(-1)),
        Value::Text(source) => {
            let search = args[1].to_text();
            if search.is_empty() {
                return Ok(Value::Integer((source.chars().count() as i64 - 1).max(0)));
            }
            Ok(Value::Integer(
                source.rfind(search.as_str()).map_or(-1, |i| char_index(source, i)),
            ))
        }
        other => Err(EvalError::new(format!("{} works only on string or list.", other))),
    }
}

// ============================================================================
// Package
// ============================================================================

/// Register the string builtins.
pub fn register_string_package(builder: &mut RegistryBuilder) {
    builder.add(
        Evaluator::new(
            ty::CONCAT,
            apply_sequence(concat, None),
            ReturnType::STRING | ReturnType::ARRAY,
        )
        .with_validator(validate_at_least_one),
    );
    builder.add(
        Evaluator::new(ty::LENGTH, apply(length, Some(verify_string_or_null)), ReturnType::NUMBER)
            .with_validator(validate_unary_string),
    );
    builder.add(
        Evaluator::new(
            ty::REPLACE,
            apply_with_error(replace, Some(verify_string_or_null)),
            ReturnType::STRING,
        )
        .with_validator(|e| validate_arity_and_any_type(e, 3, 3, ReturnType::STRING)),
    );
    builder.add(
        Evaluator::new(
            ty::REPLACE_IGNORE_CASE,
            apply_with_error(replace_ignore_case, Some(verify_string_or_null)),
            ReturnType::STRING,
        )
        .with_validator(|e| validate_arity_and_any_type(e, 3, 3, ReturnType::STRING)),
    );
    builder.add(
        Evaluator::new(ty::SPLIT, apply(split, Some(verify_string_or_null)), ReturnType::ARRAY)
            .with_validator(|e| validate_arity_and_any_type(e, 1, 2, ReturnType::STRING)),
    );
    builder.add(
        Evaluator::new(ty::SUBSTRING, substring, ReturnType::STRING).with_validator(|e| {
            validate_order(e, &[ReturnType::NUMBER], &[ReturnType::STRING, ReturnType::NUMBER])
        }),
    );

    let casings: [(&str, fn(&[Value], &Options) -> EvalResult); 4] = [
        (ty::TO_LOWER, to_lower),
        (ty::TO_UPPER, to_upper),
        (ty::SENTENCE_CASE, sentence_case),
        (ty::TITLE_CASE, title_case),
    ];
    for (name, f) in casings {
        builder.add(
            Evaluator::new(
                name,
                apply_with_options_and_error(f, Some(verify_string_or_null)),
                ReturnType::STRING,
            )
            .with_validator(validate_unary_or_binary_string),
        );
    }

    builder.add(
        Evaluator::new(
            ty::TRIM,
            apply(|args| Value::text(text(&args[0]).trim()), Some(verify_string_or_null)),
            ReturnType::STRING,
        )
        .with_validator(validate_unary_string),
    );
    builder.add(
        Evaluator::new(
            ty::STARTS_WITH,
            apply(starts_with, Some(verify_string_or_null)),
            ReturnType::BOOLEAN,
        )
        .with_validator(|e| validate_arity_and_any_type(e, 2, 2, ReturnType::STRING)),
    );
    builder.add(
        Evaluator::new(
            ty::ENDS_WITH,
            apply(ends_with, Some(verify_string_or_null)),
            ReturnType::BOOLEAN,
        )
        .with_validator(|e| validate_arity_and_any_type(e, 2, 2, ReturnType::STRING)),
    );
    builder.add(
        Evaluator::new(
            ty::COUNT_WORD,
            apply(count_word, Some(verify_string_or_null)),
            ReturnType::NUMBER,
        )
        .with_validator(validate_unary_string),
    );
    builder.add(
        Evaluator::new(
            ty::ADD_ORDINAL,
            apply_with_error(add_ordinal, Some(verify_integer)),
            ReturnType::STRING,
        )
        .with_validator(|e| validate_arity_and_any_type(e, 1, 1, ReturnType::NUMBER)),
    );
    builder.add(
        Evaluator::new(ty::NEW_GUID, apply(new_guid, None), ReturnType::STRING)
            .with_validator(validate_no_children),
    );
    builder.add(
        Evaluator::new(ty::EOL, apply(eol, None), ReturnType::STRING)
            .with_validator(validate_no_children),
    );
    builder.add(
        Evaluator::new(ty::INDEX_OF, apply_with_error(index_of, None), ReturnType::NUMBER)
            .with_validator(|e| validate_arity_and_any_type(e, 2, 2, ReturnType::OBJECT)),
    );
    builder.add(
        Evaluator::new(ty::LAST_INDEX_OF, apply_with_error(last_index_of, None), ReturnType::NUMBER)
            .with_validator(|e| validate_arity_and_any_type(e, 2, 2, ReturnType::OBJECT)),
    );
}

#[cfg(test)]
#[path = "string_test.rs"]
mod string_test;
