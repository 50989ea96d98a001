//! Locale support: time zones, cultures and date format patterns.
//!
//! Everything here is read-only after first use. Tables are built lazily and
//! shared by every evaluation.

pub mod culture;
pub mod datetime_format;
pub mod timezones;

pub use culture::{Culture, lookup_culture};
pub use datetime_format::format_datetime;
pub use timezones::resolve_timezone;

use crate::evaluator::EvalError;
use core::fmt;

/// Errors raised while resolving locale data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// Neither an IANA nor a Windows time zone name.
    UnknownTimezone(String),
    /// A culture name missing from the culture table.
    UnknownLocale(String),
    /// A date format pattern that cannot be rendered.
    InvalidFormat(String),
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleError::UnknownTimezone(name) => write!(f, "{} is an illegal timezone", name),
            LocaleError::UnknownLocale(name) => write!(f, "{} is not a valid locale", name),
            LocaleError::InvalidFormat(format) => {
                write!(f, "illegal format representation: {}", format)
            }
        }
    }
}

impl std::error::Error for LocaleError {}

impl From<LocaleError> for EvalError {
    fn from(err: LocaleError) -> Self {
        EvalError::new(err.to_string())
    }
}
