//! Path-addressable state that expressions evaluate against.
//!
//! The evaluator depends only on the narrow [`Memory`] contract. Two
//! implementations ship with the core:
//!
//! - [`SimpleObjectMemory`]: a single [`Value`] tree addressed by paths.
//! - [`StackedMemory`]: temporary frames layered over an ambient memory, the
//!   mechanism `foreach`/`select`/`where` use to bind iteration variables.

mod path;
mod simple;
mod stacked;

pub use path::{PathError, PathSegment, parse_path};
pub use simple::SimpleObjectMemory;
pub use stacked::{PopError, StackedMemory};

use crate::evaluator::EvalError;
use crate::values::Value;

/// External state addressed by paths like `user.orders[0].id`.
pub trait Memory {
    /// Resolve a path. `None` means the path does not exist; a present null
    /// is `Some(Value::Null)`.
    fn get(&self, path: &str) -> Option<Value>;

    /// Store a value at a path and return the stored value.
    fn set(&self, path: &str, value: Value) -> Result<Value, EvalError>;
}

impl<M: Memory + ?Sized> Memory for &M {
    fn get(&self, path: &str) -> Option<Value> {
        (**self).get(path)
    }

    fn set(&self, path: &str, value: Value) -> Result<Value, EvalError> {
        (**self).set(path, value)
    }
}

/// Walk `segments` down from `value`.
pub(crate) fn resolve_segments<'v>(
    value: &'v Value,
    segments: &[PathSegment],
) -> Option<&'v Value> {
    let mut current = value;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Property(name), Value::Map(map)) => map.get(name)?,
            (PathSegment::Index(idx), Value::List(items)) => {
                items.get(usize::try_from(*idx).ok()?)?
            }
            _ => return None,
        };
    }
    Some(current)
}
