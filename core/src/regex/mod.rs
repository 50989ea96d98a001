//! Regex compilation for `isMatch`.
//!
//! Patterns first pass a conformance grammar ([`grammar`]), then compile
//! once and are memoized in a process-wide LRU cache shared by every
//! evaluation. Compiled regexes are handed out as `Arc<Regex>`, so callers
//! never hold the cache lock while matching.

mod grammar;
mod lru;

pub use grammar::is_common_regex;
pub use lru::LruCache;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{debug, trace};

/// Capacity of the process-wide cache.
pub const REGEX_CACHE_CAPACITY: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("Regular expression can't be empty.")]
    Empty,
    #[error("'{0}' is not a valid regex.")]
    Unsupported(String),
    #[error("'{pattern}' failed to compile: {reason}")]
    Compile { pattern: String, reason: String },
}

/// Compiled regexes keyed by pattern text.
#[derive(Debug)]
pub struct RegexCache {
    entries: Mutex<LruCache<String, Arc<Regex>>>,
    compiles: AtomicUsize,
}

impl RegexCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            compiles: AtomicUsize::new(0),
        }
    }

    /// The cached regex for `pattern`, compiling it on a miss.
    ///
    /// The pattern must already have passed the conformance check.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>, RegexError> {
        let mut entries = self.entries.lock();
        if let Some(regex) = entries.get(pattern) {
            trace!(pattern, "Regex cache hit");
            return Ok(Arc::clone(regex));
        }

        let regex = Regex::new(pattern).map_err(|e| RegexError::Compile {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.compiles.fetch_add(1, Ordering::Relaxed);
        let regex = Arc::new(regex);
        if let Some((evicted, _)) = entries.set(pattern.to_string(), Arc::clone(&regex)) {
            debug!(pattern, evicted = %evicted, "Regex cache full, evicted least recently used");
        }
        Ok(regex)
    }

    /// Number of compilations performed so far.
    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.lock().contains(pattern)
    }
}

static REGEX_CACHE: Lazy<RegexCache> =
    Lazy::new(|| RegexCache::with_capacity(REGEX_CACHE_CAPACITY));

/// The process-wide cache used by [`create_regex`].
pub fn global_cache() -> &'static RegexCache {
    &REGEX_CACHE
}

/// Check `pattern` against the conformance grammar and fetch its compiled
/// form from `cache`.
pub fn create_regex_in(cache: &RegexCache, pattern: &str) -> Result<Arc<Regex>, RegexError> {
    if pattern.is_empty() {
        return Err(RegexError::Empty);
    }
    if !is_common_regex(pattern) {
        debug!(pattern, "Rejected non-conforming regex");
        return Err(RegexError::Unsupported(pattern.to_string()));
    }
    cache.get_or_compile(pattern)
}

/// [`create_regex_in`] against the process-wide cache.
pub fn create_regex(pattern: &str) -> Result<Arc<Regex>, RegexError> {
    create_regex_in(global_cache(), pattern)
}
