//! Layered memory for variable bindings.
//!
//! Higher-order builtins (`foreach`, `select`, `where`, `any`, `all`) bind an
//! iteration variable by pushing a one-property frame in front of the ambient
//! memory, evaluating the body, and popping the frame again:
//! ```text
//! select(items, x, x.value)
//!          frame: { x: <current item> }
//!          base:  the memory the whole expression runs against
//! ```
//! Lookups search frames from innermost to outermost, then the base. Once the
//! aggregate returns the frames are gone, so `x` never leaks into siblings.

use super::Memory;
use crate::evaluator::EvalError;
use crate::values::Value;
use core::fmt;

/// A stack of memories searched from innermost to outermost.
pub struct StackedMemory<'a> {
    base: &'a dyn Memory,
    frames: Vec<Box<dyn Memory + 'a>>,
}

impl<'a> StackedMemory<'a> {
    /// Wrap an ambient memory with an empty frame stack.
    pub fn wrap(base: &'a dyn Memory) -> Self {
        Self {
            base,
            frames: Vec::new(),
        }
    }

    /// Push a frame onto the stack.
    pub fn push<M: Memory + 'a>(&mut self, frame: M) {
        self.frames.push(Box::new(frame));
    }

    /// Pop the topmost frame from the stack.
    ///
    /// Returns an error if only the base memory is left.
    pub fn pop(&mut self) -> Result<(), PopError> {
        self.frames.pop().ok_or(PopError::EmptyStack)?;
        Ok(())
    }

    /// Number of pushed frames (the base is not counted).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Memory for StackedMemory<'_> {
    fn get(&self, path: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(path))
            .or_else(|| self.base.get(path))
    }

    fn set(&self, path: &str, _value: Value) -> Result<Value, EvalError> {
        Err(EvalError::new(format!(
            "Can't set value to {}, stacked memory is read-only",
            path
        )))
    }
}

/// Error when popping from a stack without frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopError {
    EmptyStack,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::EmptyStack => write!(f, "Cannot pop from empty memory stack"),
        }
    }
}

impl std::error::Error for PopError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::SimpleObjectMemory;

    #[test]
    fn test_inner_frame_shadows_base() {
        let base = SimpleObjectMemory::new(Value::map([
            ("x", Value::Integer(1)),
            ("y", Value::Integer(2)),
        ]));
        let mut stack = StackedMemory::wrap(&base);
        stack.push(SimpleObjectMemory::with_binding("x", Value::Integer(10)));

        assert_eq!(stack.get("x"), Some(Value::Integer(10)));
        assert_eq!(stack.get("y"), Some(Value::Integer(2)));
        assert_eq!(stack.depth(), 1);

        stack.pop().unwrap();
        assert_eq!(stack.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn test_pop_empty_stack() {
        let base = SimpleObjectMemory::default();
        let mut stack = StackedMemory::wrap(&base);
        assert_eq!(stack.pop(), Err(PopError::EmptyStack));
    }

    #[test]
    fn test_set_is_rejected() {
        let base = SimpleObjectMemory::default();
        let stack = StackedMemory::wrap(&base);
        let err = stack.set("x", Value::Null).unwrap_err();
        assert!(err.message().contains("read-only"));
    }
}
