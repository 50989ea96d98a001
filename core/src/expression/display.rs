//! Diagnostic rendering.
//!
//! Paths render as `a.b[c]`, symbolic binary operators render infix and
//! everything else renders as a call. The output names the tree for error
//! messages; it is not guaranteed to parse back.

use super::{Expression, expression_type};
use crate::values::Value;
use core::fmt;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.value() {
            return write_constant(f, value);
        }

        let children = self.children();
        let ty = self.expr_type();

        if ty == expression_type::ACCESSOR {
            if let Some(prop) = children.first().and_then(Expression::constant_text) {
                match children.len() {
                    1 => return write!(f, "{}", prop),
                    2 => return write!(f, "{}.{}", children[1], prop),
                    _ => {}
                }
            }
        } else if ty == expression_type::ELEMENT && children.len() == 2 {
            return write!(f, "{}[{}]", children[0], children[1]);
        }

        let infix = ty.chars().next().is_some_and(|c| !c.is_alphabetic()) && children.len() >= 2;
        if !infix {
            write!(f, "{}", ty)?;
        }
        write!(f, "(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                if infix {
                    write!(f, " {} ", ty)?;
                } else {
                    write!(f, ", ")?;
                }
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

fn write_constant(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => write!(f, "null"),
        Value::Text(s) => {
            write!(f, "'")?;
            for c in s.chars() {
                match c {
                    '\'' => write!(f, "\\'")?,
                    '\\' => write!(f, "\\\\")?,
                    c => write!(f, "{}", c)?,
                }
            }
            write!(f, "'")
        }
        Value::List(items) => {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_constant(f, item)?;
            }
            write!(f, "]")
        }
        other => write!(f, "{}", other),
    }
}
