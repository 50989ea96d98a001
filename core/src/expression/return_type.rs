use crate::values::Value;
use bitflags::bitflags;

bitflags! {
    /// Statically declared result kinds of an expression.
    ///
    /// Validators use these for best-effort checks when a tree is built.
    /// `OBJECT` means "unconstrained": a child declaring it always passes
    /// static checks and is verified at runtime instead.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct ReturnType: u8 {
        const BOOLEAN = 1;
        const NUMBER = 1 << 1;
        const OBJECT = 1 << 2;
        const STRING = 1 << 3;
        const ARRAY = 1 << 4;
    }
}

impl ReturnType {
    /// Kind of a constant, derived from the value's runtime shape.
    pub fn of_value(value: &Value) -> ReturnType {
        match value {
            Value::Bool(_) => ReturnType::BOOLEAN,
            Value::Integer(_) | Value::Float(_) => ReturnType::NUMBER,
            Value::Text(_) => ReturnType::STRING,
            Value::List(_) => ReturnType::ARRAY,
            Value::Null | Value::Map(_) => ReturnType::OBJECT,
        }
    }

    /// Comma separated flag names, used in validation messages.
    pub fn names(self) -> String {
        let mut names = Vec::new();
        for (flag, name) in [
            (ReturnType::BOOLEAN, "Boolean"),
            (ReturnType::NUMBER, "Number"),
            (ReturnType::OBJECT, "Object"),
            (ReturnType::STRING, "String"),
            (ReturnType::ARRAY, "Array"),
        ] {
            if self.contains(flag) {
                names.push(name);
            }
        }
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ReturnType::NUMBER.names(), "Number");
        assert_eq!(
            (ReturnType::STRING | ReturnType::NUMBER).names(),
            "Number, String"
        );
    }

    #[test]
    fn test_of_value() {
        assert_eq!(ReturnType::of_value(&Value::Float(1.5)), ReturnType::NUMBER);
        assert_eq!(ReturnType::of_value(&Value::Null), ReturnType::OBJECT);
        assert_eq!(
            ReturnType::of_value(&Value::list([])),
            ReturnType::ARRAY
        );
    }
}
