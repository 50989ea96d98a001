use super::{Memory, PathSegment, parse_path, resolve_segments};
use crate::evaluator::EvalError;
use crate::values::{ObjectMap, Value};
use parking_lot::RwLock;

/// Memory over a single value tree.
///
/// Reads take a shared lock; `set` takes the write lock and creates missing
/// intermediate objects along the way.
#[derive(Debug, Default)]
pub struct SimpleObjectMemory {
    root: RwLock<Value>,
}

impl SimpleObjectMemory {
    pub fn new(root: Value) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    /// A one-property frame, used for iteration bindings.
    pub fn with_binding(name: &str, value: Value) -> Self {
        let mut map = ObjectMap::with_capacity(1);
        map.insert(name, value);
        Self::new(Value::Map(map))
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        Self::new(Value::from(json))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Value {
        self.root.read().clone()
    }
}

impl From<Value> for SimpleObjectMemory {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

impl Memory for SimpleObjectMemory {
    fn get(&self, path: &str) -> Option<Value> {
        let segments = parse_path(path).ok()?;
        let root = self.root.read();
        resolve_segments(&root, &segments).cloned()
    }

    fn set(&self, path: &str, value: Value) -> Result<Value, EvalError> {
        let segments = parse_path(path).map_err(|e| EvalError::new(e.to_string()))?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(EvalError::new(format!("Can't set value to empty path '{}'", path)));
        };

        let mut root = self.root.write();
        if root.is_null() {
            *root = Value::Map(ObjectMap::new());
        }

        let mut current: &mut Value = &mut *root;
        for segment in parents {
            current = descend_or_create(current, segment, path)?;
        }

        match (last, current) {
            (PathSegment::Property(name), Value::Map(map)) => match map.get_mut(name) {
                Some(slot) => *slot = value.clone(),
                None => {
                    map.insert(name.as_str(), value.clone());
                }
            },
            (PathSegment::Index(idx), Value::List(items)) => {
                let len = items.len();
                match usize::try_from(*idx) {
                    Ok(i) if i < len => items[i] = value.clone(),
                    Ok(i) if i == len => items.push(value.clone()),
                    _ => {
                        return Err(EvalError::new(format!(
                            "Index {} is out of range for '{}'",
                            idx, path
                        )));
                    }
                }
            }
            (_, other) => {
                return Err(EvalError::new(format!(
                    "Can't set value to '{}': {} is not a container",
                    path,
                    other.kind_name()
                )));
            }
        }
        Ok(value)
    }
}

fn descend_or_create<'v>(
    current: &'v mut Value,
    segment: &PathSegment,
    path: &str,
) -> Result<&'v mut Value, EvalError> {
    match (segment, current) {
        (PathSegment::Property(name), Value::Map(map)) => {
            if !map.contains_key(name) {
                map.insert(name.as_str(), Value::Map(ObjectMap::new()));
            }
            map.get_mut(name)
                .ok_or_else(|| EvalError::new(format!("Can't set value to '{}'", path)))
        }
        (PathSegment::Index(idx), Value::List(items)) => usize::try_from(*idx)
            .ok()
            .and_then(|i| items.get_mut(i))
            .ok_or_else(|| EvalError::new(format!("Index {} is out of range for '{}'", idx, path))),
        (_, other) => Err(EvalError::new(format!(
            "Can't set value to '{}': {} is not a container",
            path,
            other.kind_name()
        ))),
    }
}
