//! Conversion Package
//!
//! Type conversions, encodings (base64, data URIs, URI components), JSON
//! interop, culture-aware number formatting and URI parsing.
//!
//! Binary data is a list of byte-valued integers, so it can travel through
//! memory and JSON like any other value.

use super::resolve_culture;
use crate::api::Options;
use crate::casting;
use crate::evaluator::combinators::{apply, apply_with_error, apply_with_options_and_error};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::values::Value;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use url::Url;

const DATA_URI_PREFIX: &str = "data:text/plain;charset=utf-8;base64,";

// ============================================================================
// Primitive conversions
// ============================================================================

fn float(args: &[Value]) -> EvalResult {
    Ok(Value::Float(casting::parse_float(&args[0])?))
}

fn int(args: &[Value]) -> EvalResult {
    Ok(Value::Integer(casting::parse_int(&args[0])?))
}

fn bool_(args: &[Value]) -> EvalResult {
    Ok(Value::Bool(casting::parse_bool(&args[0])?))
}

/// `string(value, locale?)`: text passes through, numbers use the culture's
/// decimal separator, everything else renders as JSON.
fn string(args: &[Value], options: &Options) -> EvalResult {
    let culture = resolve_culture(args.get(1), options)?;
    let rendered = match &args[0] {
        Value::Text(s) => s.clone(),
        number @ (Value::Integer(_) | Value::Float(_)) => number
            .to_json_string()
            .replace('.', &culture.decimal_separator.to_string()),
        other => other.to_json_string(),
    };
    Ok(Value::Text(rendered))
}

/// `formatNumber(number, precision, locale?)`
fn format_number(args: &[Value], options: &Options) -> EvalResult {
    let culture = resolve_culture(args.get(2), options)?;
    let value = casting::to_f64(&args[0])?;
    let precision = match casting::to_i64(&args[1]) {
        Ok(p) if (0..=15).contains(&p) => p as usize,
        _ => {
            return Err(EvalError::new(format!(
                "The second parameter {} must be an integer between 0 and 15.",
                args[1]
            )));
        }
    };
    Ok(Value::Text(culture.format_number(value, precision)))
}

/// Text that spells a JSON number or boolean becomes that value.
fn string_or_value(args: &[Value]) -> Value {
    match &args[0] {
        Value::Text(s) => match Value::parse_json(s.trim()) {
            Ok(parsed @ (Value::Integer(_) | Value::Float(_) | Value::Bool(_))) => parsed,
            _ => args[0].clone(),
        },
        other => other.clone(),
    }
}

// ============================================================================
// Binary and base64
// ============================================================================

fn to_binary(bytes: &[u8]) -> Value {
    Value::list(bytes.iter().map(|b| Value::Integer(*b as i64)))
}

/// Bytes of text (UTF-8) or of a byte list.
fn bytes_of(value: &Value) -> Result<Vec<u8>, EvalError> {
    match value {
        Value::Text(s) => Ok(s.as_bytes().to_vec()),
        Value::List(items) => items
            .iter()
            .map(|item| match item.as_i64() {
                Some(b @ 0..=255) => Ok(b as u8),
                _ => Err(EvalError::new(format!("{} is not a byte.", item))),
            })
            .collect(),
        other => Err(EvalError::new(format!("{} is not a string or byte array.", other))),
    }
}

fn decode_base64(text: &str) -> Result<Vec<u8>, EvalError> {
    STANDARD
        .decode(text.trim())
        .map_err(|_| EvalError::new(format!("{} is not a valid base64 string.", text)))
}

fn utf8(bytes: Vec<u8>) -> EvalResult {
    String::from_utf8(bytes)
        .map(Value::Text)
        .map_err(|_| EvalError::new("The decoded bytes are not valid UTF-8."))
}

fn binary(args: &[Value]) -> EvalResult {
    Ok(to_binary(&bytes_of(&args[0])?))
}

fn base64(args: &[Value]) -> EvalResult {
    Ok(Value::Text(STANDARD.encode(bytes_of(&args[0])?)))
}

fn base64_to_binary(args: &[Value]) -> EvalResult {
    Ok(to_binary(&decode_base64(&args[0].to_text())?))
}

fn base64_to_string(args: &[Value]) -> EvalResult {
    utf8(decode_base64(&args[0].to_text())?)
}

fn data_uri(args: &[Value]) -> EvalResult {
    Ok(Value::Text(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(bytes_of(&args[0])?))))
}

/// Payload of a `data:` URI; base64 when flagged, percent-encoded otherwise.
fn data_uri_payload(uri: &str) -> Result<Vec<u8>, EvalError> {
    let invalid = || EvalError::new(format!("{} is not a valid data URI.", uri));
    let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        decode_base64(payload)
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

fn data_uri_to_binary(args: &[Value]) -> EvalResult {
    Ok(to_binary(&data_uri_payload(&args[0].to_text())?))
}

fn data_uri_to_string(args: &[Value]) -> EvalResult {
    utf8(data_uri_payload(&args[0].to_text())?)
}

// ============================================================================
// URI components
// ============================================================================

fn uri_component(args: &[Value]) -> Value {
    Value::Text(urlencoding::encode(&args[0].to_text()).into_owned())
}

fn uri_component_to_string(args: &[Value]) -> EvalResult {
    let text = args[0].to_text();
    urlencoding::decode(&text)
        .map(|decoded| Value::Text(decoded.into_owned()))
        .map_err(|_| EvalError::new(format!("{} is not a valid URI component.", text)))
}

// ============================================================================
// JSON
// ============================================================================

fn json(args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Text(s) => Value::parse_json(s.trim())
            .map_err(|e| EvalError::new(format!("{} is not a valid json string: {}", s, e))),
        other => Ok(other.clone()),
    }
}

fn json_stringify(args: &[Value]) -> Value {
    Value::Text(args[0].to_json_string())
}

// ============================================================================
// URI parsing
// ============================================================================

fn parse_uri(value: &Value) -> Result<Url, EvalError> {
    let text = value.to_text();
    Url::parse(&text).map_err(|_| EvalError::new(format!("{} is an illegal URI string", text)))
}

fn uri_host(args: &[Value]) -> EvalResult {
    Ok(parse_uri(&args[0])?.host_str().map(Value::text).unwrap_or_default())
}

fn uri_path(args: &[Value]) -> EvalResult {
    Ok(Value::text(parse_uri(&args[0])?.path()))
}

fn uri_path_and_query(args: &[Value]) -> EvalResult {
    let uri = parse_uri(&args[0])?;
    Ok(Value::Text(match uri.query() {
        Some(query) => format!("{}?{}", uri.path(), query),
        None => uri.path().to_string(),
    }))
}

fn uri_port(args: &[Value]) -> EvalResult {
    let uri = parse_uri(&args[0])?;
    Ok(uri.port_or_known_default().map(|p| Value::Integer(p as i64)).unwrap_or_default())
}

/// The query including its leading `?`, or empty.
fn uri_query(args: &[Value]) -> EvalResult {
    Ok(Value::Text(parse_uri(&args[0])?.query().map(|q| format!("?{}", q)).unwrap_or_default()))
}

fn uri_scheme(args: &[Value]) -> EvalResult {
    Ok(Value::text(parse_uri(&args[0])?.scheme()))
}

// ============================================================================
// Package
// ============================================================================

fn verify_number_then_integer(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    match position {
        0 => verify_number(value, expr, position),
        1 => verify_integer(value, expr, position),
        _ => verify_string(value, expr, position),
    }
}

/// Register the conversion, encoding and URI builtins.
pub fn register_conversion_package(builder: &mut RegistryBuilder) {
    let s = ReturnType::STRING;

    builder.add(
        Evaluator::new(ty::FLOAT, apply_with_error(float, None), ReturnType::NUMBER)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::INT, apply_with_error(int, None), ReturnType::NUMBER)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::BOOL, apply_with_error(bool_, None), ReturnType::BOOLEAN)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::STRING, apply_with_options_and_error(string, None), s)
            .with_validator(move |e| validate_order(e, &[s], &[ReturnType::OBJECT])),
    );
    builder.add(
        Evaluator::new(
            ty::FORMAT_NUMBER,
            apply_with_options_and_error(format_number, Some(verify_number_then_integer)),
            s,
        )
        .with_validator(move |e| {
            validate_order(e, &[s], &[ReturnType::NUMBER, ReturnType::NUMBER])
        }),
    );
    builder.add(
        Evaluator::new(ty::STRING_OR_VALUE, apply(string_or_value, None), ReturnType::OBJECT)
            .with_validator(validate_unary),
    );

    let encoders: [(&str, fn(&[Value]) -> EvalResult, ReturnType); 7] = [
        (ty::BINARY, binary, ReturnType::ARRAY),
        (ty::BASE64, base64, s),
        (ty::BASE64_TO_BINARY, base64_to_binary, ReturnType::ARRAY),
        (ty::BASE64_TO_STRING, base64_to_string, s),
        (ty::DATA_URI, data_uri, s),
        (ty::DATA_URI_TO_BINARY, data_uri_to_binary, ReturnType::ARRAY),
        (ty::DATA_URI_TO_STRING, data_uri_to_string, s),
    ];
    for (name, f, return_type) in encoders {
        builder.add(
            Evaluator::new(name, apply_with_error(f, None), return_type)
                .with_validator(validate_unary),
        );
    }
    builder.add(
        Evaluator::new(ty::URI_COMPONENT, apply(uri_component, Some(verify_string)), s)
            .with_validator(validate_unary_string),
    );
    builder.add(
        Evaluator::new(
            ty::URI_COMPONENT_TO_STRING,
            apply_with_error(uri_component_to_string, Some(verify_string)),
            s,
        )
        .with_validator(validate_unary_string),
    );

    builder.add(
        Evaluator::new(ty::JSON, apply_with_error(json, None), ReturnType::OBJECT)
            .with_validator(validate_unary),
    );
    builder.add(
        Evaluator::new(ty::JSON_STRINGIFY, apply(json_stringify, None), s)
            .with_validator(validate_unary),
    );

    let uri_parts: [(&str, fn(&[Value]) -> EvalResult, ReturnType); 6] = [
        (ty::URI_HOST, uri_host, s),
        (ty::URI_PATH, uri_path, s),
        (ty::URI_PATH_AND_QUERY, uri_path_and_query, s),
        (ty::URI_PORT, uri_port, ReturnType::NUMBER),
        (ty::URI_QUERY, uri_query, s),
        (ty::URI_SCHEME, uri_scheme, s),
    ];
    for (name, f, return_type) in uri_parts {
        builder.add(
            Evaluator::new(name, apply_with_error(f, Some(verify_string)), return_type)
                .with_validator(validate_unary_string),
        );
    }
}

#[cfg(test)]
#[path = "conversion_test.rs"]
mod conversion_test;
