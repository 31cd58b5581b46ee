//! Named-rule registry for extending the text DSL.
//!
//! This module provides [`RuleRegistry`], a thread-safe table of rule
//! factories. Registering `"uppercase"` makes `"required|uppercase"` parse;
//! the factory receives the rule's parameters and builds a [`RuleSpec`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::RuleError;
use crate::rule::RuleSpec;

/// A factory building a rule spec from the parameters written after `:`.
pub type RuleFactory = dyn Fn(&[String]) -> Result<RuleSpec, RuleError> + Send + Sync;

type FactoryMap = Arc<RwLock<HashMap<String, Arc<RuleFactory>>>>;

/// A thread-safe registry of named rule extensions.
///
/// Cloning a registry shares the underlying table, so one registry can be
/// built at startup and handed to validators across threads. Builtin rule
/// names always win; the registry is only consulted for names the parser
/// does not recognize.
///
/// # Example
///
/// ```rust
/// use gauntlet::{Rule, RuleRegistry, Rules, Validator};
/// use serde_json::json;
///
/// let registry = RuleRegistry::new();
/// registry
///     .register("uppercase", |_params| {
///         Ok(Rule::closure(|attribute, value, fail| {
///             if let Some(s) = value.as_str() {
///                 if s.to_uppercase() != s {
///                     fail(format!("The {attribute} field must be uppercase."));
///                 }
///             }
///         }))
///     })
///     .unwrap();
///
/// let validator = Validator::make_with_registry(
///     json!({"code": "abc"}),
///     Rules::new().field("code", "required|uppercase"),
///     &registry,
/// )
/// .unwrap();
///
/// assert!(validator.fails());
/// ```
pub struct RuleRegistry {
    factories: FactoryMap,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a rule factory under a name.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DuplicateRule`] if the name is already taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        factory: impl Fn(&[String]) -> Result<RuleSpec, RuleError> + Send + Sync + 'static,
    ) -> Result<(), RuleError> {
        let name = name.into();
        let mut factories = self.factories.write();

        if factories.contains_key(&name) {
            return Err(RuleError::DuplicateRule(name));
        }

        factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Looks up a factory by name.
    pub fn get(&self, name: &str) -> Option<Arc<RuleFactory>> {
        self.factories.read().get(name).cloned()
    }

    /// Returns true if a factory is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RuleRegistry {
    fn clone(&self) -> Self {
        Self {
            factories: Arc::clone(&self.factories),
        }
    }
}
