//! Configuration options for evaluation and rewriting.

use crate::values::Value;
use std::fmt;
use std::sync::Arc;

/// Callback producing a replacement for a path that resolved to nothing.
pub type NullSubstitution = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Configuration options for expression evaluation.
///
/// An immutable snapshot passed by reference through every evaluate call.
///
/// # Example
///
/// ```
/// use adex_core::api::Options;
/// use adex_core::values::Value;
/// use std::sync::Arc;
///
/// let options = Options {
///     null_substitution: Some(Arc::new(|path: &str| {
///         Value::text(format!("{} is undefined", path))
///     })),
///     locale: Some("fr-FR".to_string()),
/// };
/// ```
#[derive(Clone, Default)]
pub struct Options {
    /// Replacement for memory paths that are missing or null.
    ///
    /// Default: None (missing paths evaluate to null)
    pub null_substitution: Option<NullSubstitution>,

    /// Locale used by culture-sensitive builtins (number and date
    /// formatting, casing) when no explicit locale argument is given.
    ///
    /// Default: None (invariant culture)
    pub locale: Option<String>,
}

impl Options {
    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..Self::default()
        }
    }

    pub fn with_null_substitution<F>(f: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Self {
            null_substitution: Some(Arc::new(f)),
            ..Self::default()
        }
    }

    /// The same options with null substitution turned off.
    pub fn without_null_substitution(&self) -> Self {
        Self {
            null_substitution: None,
            locale: self.locale.clone(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("null_substitution", &self.null_substitution.is_some())
            .field("locale", &self.locale)
            .finish()
    }
}

/// Configuration options for the logical rewriter.
///
/// # Example
///
/// ```
/// use adex_core::api::RewriteOptions;
///
/// let options = RewriteOptions { max_clauses: Some(256) };
/// ```
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Maximum number of clauses disjunctive normal form may produce.
    ///
    /// Distribution of OR under AND is exponential in the worst case. Set to
    /// `None` for no limit (be careful with untrusted input!).
    ///
    /// Default: Some(10_000)
    pub max_clauses: Option<usize>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            max_clauses: Some(10_000),
        }
    }
}
