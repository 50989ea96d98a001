//! Typed evaluation targets.
//!
//! [`FromValue`] coerces an evaluation result to a Rust type on a best-effort
//! basis: exact numeric matches, stringification, truthiness. Integral
//! targets refuse lossy conversions, so `5.0` becomes `5_i64` but `5.5` is a
//! type error.

use crate::casting;
use crate::evaluator::EvalError;
use crate::values::{ObjectMap, Value};

/// Conversion from an evaluation result.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, EvalError>;
}

pub(crate) fn short_type_name<T>() -> &'static str {
    let full = core::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn type_error<T>(value: &Value) -> EvalError {
    EvalError::new(format!("'{}' is not of type {}", value, short_type_name::<T>()))
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        Ok(value.to_text())
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        casting::parse_bool(&value).map_err(|_| type_error::<bool>(&value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(type_error::<Vec<T>>(&other)),
        }
    }
}

impl FromValue for ObjectMap {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(type_error::<ObjectMap>(&other)),
        }
    }
}

/// Numeric view used by the numeric targets; numeric text is accepted.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Text(s) => s.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, EvalError> {
                    if let Value::Integer(i) = value {
                        return <$ty>::try_from(i).map_err(|_| type_error::<$ty>(&value));
                    }
                    let double = numeric(&value).ok_or_else(|| type_error::<$ty>(&value))?;
                    let converted = double.round();
                    if converted != double
                        || converted < <$ty>::MIN as f64
                        || converted > <$ty>::MAX as f64
                    {
                        return Err(type_error::<$ty>(&value));
                    }
                    Ok(converted as $ty)
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        numeric(&value).ok_or_else(|| type_error::<f64>(&value))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        numeric(&value)
            .map(|x| x as f32)
            .ok_or_else(|| type_error::<f32>(&value))
    }
}
