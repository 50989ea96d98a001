//! Memory path syntax.
//!
//! A path is a sequence of property names and indices:
//! ```text
//! user.name          -> [Property("user"), Property("name")]
//! items[2]           -> [Property("items"), Index(2)]
//! bag['first name']  -> [Property("bag"), Property("first name")]
//! ```

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Property(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub path: String,
    pub reason: &'static str,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid memory path '{}': {}", self.path, self.reason)
    }
}

impl std::error::Error for PathError {}

/// Split a path into segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let err = |reason| PathError {
        path: path.to_string(),
        reason,
    };

    let mut segments = Vec::new();
    let mut chars = path.chars().peekable();
    let mut current = String::new();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if current.is_empty() && segments.is_empty() {
                    return Err(err("empty property name"));
                }
                if !current.is_empty() {
                    segments.push(PathSegment::Property(core::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Property(core::mem::take(&mut current)));
                }
                match chars.peek() {
                    Some(&quote @ ('\'' | '"')) => {
                        chars.next();
                        let mut key = String::new();
                        loop {
                            match chars.next() {
                                Some(ch) if ch == quote => break,
                                Some(ch) => key.push(ch),
                                None => return Err(err("unterminated quoted key")),
                            }
                        }
                        if chars.next() != Some(']') {
                            return Err(err("expected ']' after quoted key"));
                        }
                        segments.push(PathSegment::Property(key));
                    }
                    _ => {
                        let mut digits = String::new();
                        loop {
                            match chars.next() {
                                Some(']') => break,
                                Some(ch) => digits.push(ch),
                                None => return Err(err("unterminated index")),
                            }
                        }
                        let index = digits
                            .trim()
                            .parse::<i64>()
                            .map_err(|_| err("index is not an integer"))?;
                        segments.push(PathSegment::Index(index));
                    }
                }
            }
            ']' => return Err(err("unbalanced ']'")),
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        segments.push(PathSegment::Property(current));
    }
    Ok(segments)
}
