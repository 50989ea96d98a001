//! Value conversions shared by the builtins.
//!
//! Conversions come in two flavors:
//!
//! - **Coercions** (`to_f64`, `to_i64`, `to_i32`): accept any numeric value and
//!   fail when the value is not a number or does not fit the target.
//! - **Parses** (`parse_float`, `parse_int`, `parse_bool`): turn text into a
//!   value using invariant-culture rules, used by `float()`, `int()` and
//!   `bool()`.

use crate::values::Value;
use core::fmt;

/// Errors produced while converting a value.
#[derive(Debug, Clone, PartialEq)]
pub enum CastError {
    /// The value is not a number.
    NotANumber { value: String },
    /// The value is a number but has a fractional part.
    NotAnInteger { value: String },
    /// The value does not fit in the requested integer width.
    OutOfRange { value: String, target: &'static str },
    /// Text that could not be parsed as the requested kind.
    InvalidText { value: String, target: &'static str },
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastError::NotANumber { value } => write!(f, "{} is not a number.", value),
            CastError::NotAnInteger { value } => write!(f, "{} is not an integer.", value),
            CastError::OutOfRange { value, target } => {
                write!(f, "{} must be a {}.", value, target)
            }
            CastError::InvalidText { value, target } => {
                write!(f, "{} cannot be converted to {}.", value, target)
            }
        }
    }
}

impl std::error::Error for CastError {}

pub fn to_f64(value: &Value) -> Result<f64, CastError> {
    value.as_f64().ok_or_else(|| CastError::NotANumber {
        value: value.to_string(),
    })
}

/// Integral view of a number; floats must carry no fractional part.
pub fn to_i64(value: &Value) -> Result<i64, CastError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(x) if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 => {
            Ok(*x as i64)
        }
        Value::Float(_) => Err(CastError::NotAnInteger {
            value: value.to_string(),
        }),
        _ => Err(CastError::NotANumber {
            value: value.to_string(),
        }),
    }
}

pub fn to_i32(value: &Value) -> Result<i32, CastError> {
    let wide = to_i64(value)?;
    i32::try_from(wide).map_err(|_| CastError::OutOfRange {
        value: value.to_string(),
        target: "32-bit signed integer",
    })
}

/// Convert to a collection index (non-negative, pointer sized).
pub fn to_index(value: &Value) -> Result<usize, CastError> {
    let wide = to_i32(value)?;
    usize::try_from(wide).map_err(|_| CastError::OutOfRange {
        value: value.to_string(),
        target: "non-negative integer",
    })
}

/// Parse a float the way `float()` does: numbers pass through, text is
/// parsed with invariant rules.
pub fn parse_float(value: &Value) -> Result<f64, CastError> {
    match value {
        Value::Text(s) => s.trim().parse::<f64>().map_err(|_| CastError::InvalidText {
            value: s.clone(),
            target: "float",
        }),
        other => to_f64(other),
    }
}

/// Parse an integer the way `int()` does: integral floats and numeric text
/// are accepted, fractional values truncate toward zero.
pub fn parse_int(value: &Value) -> Result<i64, CastError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(x) if x.is_finite() => Ok(x.trunc() as i64),
        Value::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|x| x.trunc() as i64))
                .map_err(|_| CastError::InvalidText {
                    value: s.clone(),
                    target: "int",
                })
        }
        other => Err(CastError::NotANumber {
            value: other.to_string(),
        }),
    }
}

/// Boolean conversion used by `bool()`.
///
/// Text must spell `true`/`false` (any case); numbers are true when non-zero;
/// null is false and containers are true.
pub fn parse_bool(value: &Value) -> Result<bool, CastError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        Value::Integer(i) => Ok(*i != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CastError::InvalidText {
                value: s.clone(),
                target: "bool",
            }),
        },
        Value::List(_) | Value::Map(_) => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_i64_rejects_fractions() {
        assert_eq!(to_i64(&Value::Float(5.0)), Ok(5));
        assert_eq!(
            to_i64(&Value::Float(5.5)),
            Err(CastError::NotAnInteger {
                value: "5.5".to_string()
            })
        );
        assert!(to_i64(&Value::text("5")).is_err());
    }

    #[test]
    fn test_to_i32_range() {
        assert_eq!(to_i32(&Value::Integer(7)), Ok(7));
        let err = to_i32(&Value::Integer(i64::from(i32::MAX) + 1)).unwrap_err();
        assert_eq!(err.to_string(), "2147483648 must be a 32-bit signed integer.");
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_float(&Value::text("10.333")), Ok(10.333));
        assert_eq!(parse_int(&Value::text("10")), Ok(10));
        assert_eq!(parse_int(&Value::Float(3.9)), Ok(3));
        assert_eq!(parse_bool(&Value::text("False")), Ok(false));
        assert_eq!(parse_bool(&Value::Integer(1)), Ok(true));
        assert!(parse_bool(&Value::text("maybe")).is_err());
    }
}
