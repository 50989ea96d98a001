//! Function registry.
//!
//! Maps function names to evaluators. The builtin set is fixed when the
//! registry is built; hosts add their own functions to a custom overlay at
//! any time, from any thread.
//!
//! ## Design Principles
//!
//! - **Case-insensitive**: `toUpper`, `TOUPPER` and `toupper` name the same
//!   function.
//! - **Builtins win**: lookups consult builtins before the overlay, and the
//!   overlay refuses names that a builtin already owns.
//! - **Negations are a table**: `a <-> b` pairs are recorded symmetrically
//!   while building and never change afterward.

use super::{Evaluator, ExpressionError};
use crate::stdlib;
use dashmap::DashMap;
use hashbrown::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Name of an entry as registered, next to its evaluator.
type Entry = (String, Arc<Evaluator>);

fn key(name: &str) -> String {
    name.to_lowercase()
}

/// Builds the immutable part of a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    builtins: HashMap<String, Entry>,
    negations: HashMap<String, String>,
}

impl RegistryBuilder {
    /// An empty builder, without any builtin functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the standard builtin library.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        stdlib::register_builtins(&mut builder);
        builder
    }

    /// Add a builtin evaluator under its own name.
    pub fn add(&mut self, evaluator: impl Into<Arc<Evaluator>>) -> Arc<Evaluator> {
        let evaluator = evaluator.into();
        let name = evaluator.name().to_string();
        if self
            .builtins
            .insert(key(&name), (name.clone(), Arc::clone(&evaluator)))
            .is_some()
        {
            warn!(name = %name, "Builtin function registered twice");
        }
        evaluator
    }

    /// Make `alias` resolve to the evaluator registered as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<(), ExpressionError> {
        let (_, evaluator) = self
            .builtins
            .get(&key(target))
            .cloned()
            .ok_or_else(|| ExpressionError::UnknownFunction(target.to_string()))?;
        self.builtins.insert(key(alias), (alias.to_string(), evaluator));
        Ok(())
    }

    /// Declare `a` and `b` as negations of each other.
    ///
    /// Pairing a name with itself marks a pass-through function: negating it
    /// pushes the negation into its children.
    pub fn pair_negations(&mut self, a: &str, b: &str) {
        self.negations.insert(key(a), b.to_string());
        self.negations.insert(key(b), a.to_string());
    }

    pub fn build(self) -> Registry {
        debug!(
            builtins = self.builtins.len(),
            negations = self.negations.len(),
            "Built function registry"
        );
        Registry {
            builtins: self.builtins,
            custom: DashMap::new(),
            negations: self.negations,
        }
    }
}

/// Name to evaluator map: immutable builtins plus a concurrent custom overlay.
pub struct Registry {
    builtins: HashMap<String, Entry>,
    custom: DashMap<String, Entry>,
    negations: HashMap<String, String>,
}

static_assertions::assert_impl_all!(Registry: Send, Sync);

impl Registry {
    /// A registry holding the standard builtin library.
    pub fn new() -> Self {
        RegistryBuilder::with_builtins().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Find an evaluator by name, builtins first.
    pub fn lookup(&self, name: &str) -> Option<Arc<Evaluator>> {
        let k = key(name);
        if let Some((_, evaluator)) = self.builtins.get(&k) {
            return Some(Arc::clone(evaluator));
        }
        self.custom.get(&k).map(|entry| Arc::clone(&entry.value().1))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(&key(name))
    }

    /// Add a custom evaluator to the overlay.
    ///
    /// Fails if a builtin already owns the name. Re-registering a custom name
    /// replaces the previous entry.
    pub fn register(&self, evaluator: Evaluator) -> Result<Arc<Evaluator>, ExpressionError> {
        let name = evaluator.name().to_string();
        let k = key(&name);
        if self.builtins.contains_key(&k) {
            return Err(ExpressionError::ShadowsBuiltin(name));
        }
        let evaluator = Arc::new(evaluator);
        trace!(name = %name, "Registering custom function");
        self.custom.insert(k, (name, Arc::clone(&evaluator)));
        Ok(evaluator)
    }

    /// Remove a custom evaluator. Builtins cannot be removed.
    pub fn unregister(&self, name: &str) -> Option<Arc<Evaluator>> {
        self.custom.remove(&key(name)).map(|(_, (_, evaluator))| evaluator)
    }

    /// Drop every custom evaluator; builtins are untouched.
    pub fn clear_custom(&self) {
        self.custom.clear();
    }

    pub fn custom_len(&self) -> usize {
        self.custom.len()
    }

    /// All registered names, builtins (with aliases) and custom entries.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.values().map(|(name, _)| name.clone()).collect();
        names.extend(
            self.custom
                .iter()
                .filter(|entry| !self.builtins.contains_key(entry.key()))
                .map(|entry| entry.value().0.clone()),
        );
        names.sort();
        names
    }

    /// The evaluator paired as the negation of `name`, if any.
    pub fn negation(&self, name: &str) -> Option<Arc<Evaluator>> {
        let canonical = self.lookup(name)?;
        let partner = self.negations.get(&key(canonical.name()))?;
        self.lookup(partner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ReturnType;
    use crate::values::Value;

    fn constant_fn(name: &str) -> Evaluator {
        Evaluator::new(name, |_, _, _| Ok(Value::Integer(42)), ReturnType::NUMBER)
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_resolves_aliases() {
        let registry = Registry::new();
        let add = registry.lookup("ADD").unwrap();
        assert_eq!(add.name(), "+");
        assert_eq!(registry.lookup("toupper").unwrap().name(), "toUpper");
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_custom_cannot_shadow_builtin() {
        let registry = Registry::new();
        let err = registry.register(constant_fn("Concat")).unwrap_err();
        assert_eq!(err, ExpressionError::ShadowsBuiltin("Concat".to_string()));
    }

    #[test]
    fn test_custom_overlay_lifecycle() {
        let registry = Registry::new();
        registry.register(constant_fn("answer")).unwrap();
        assert!(registry.contains("ANSWER"));
        assert!(!registry.is_builtin("answer"));
        assert!(registry.names().contains(&"answer".to_string()));

        registry.clear_custom();
        assert!(!registry.contains("answer"));
        assert!(registry.contains("concat"));
    }

    #[test]
    fn test_custom_last_writer_wins() {
        let registry = Registry::new();
        registry.register(constant_fn("f")).unwrap();
        registry
            .register(Evaluator::new("F", |_, _, _| Ok(Value::Integer(7)), ReturnType::NUMBER))
            .unwrap();
        assert_eq!(registry.custom_len(), 1);
        assert_eq!(registry.lookup("f").unwrap().name(), "F");
        assert!(registry.unregister("f").is_some());
        assert_eq!(registry.custom_len(), 0);
    }

    #[test]
    fn test_names_have_no_duplicates() {
        let registry = Registry::new();
        registry.register(constant_fn("extra")).unwrap();
        let names = registry.names();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
        assert!(names.contains(&"+".to_string()));
        assert!(names.contains(&"add".to_string()));
    }

    #[test]
    fn test_negations_are_symmetric() {
        let registry = Registry::new();
        assert_eq!(registry.negation("<").unwrap().name(), ">=");
        assert_eq!(registry.negation(">=").unwrap().name(), "<");
        assert_eq!(registry.negation("less").unwrap().name(), ">=");
        assert_eq!(registry.negation("equals").unwrap().name(), "!=");
        assert_eq!(registry.negation("optional").unwrap().name(), "optional");
        assert!(registry.negation("concat").is_none());
    }

    #[test]
    fn test_builder_alias_requires_target() {
        let mut builder = RegistryBuilder::new();
        builder.add(constant_fn("base"));
        builder.alias("other", "base").unwrap();
        assert!(builder.alias("x", "missing").is_err());
        let registry = builder.build();
        assert_eq!(registry.lookup("other").unwrap().name(), "base");
    }
}
