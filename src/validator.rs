//! The validation engine.
//!
//! [`Validator::make`] parses a rule set against a record up front (so
//! misconfigured rules abort before anything is evaluated), then evaluates
//! lazily on first access: every pattern is expanded into concrete paths,
//! every chain runs in order, and every failure lands in one
//! [`MessageBag`]. After-hooks run once at the end and may add cross-field
//! findings.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{MessageBag, RuleError, ValidationError, Violation};
use crate::messages::Messages;
use crate::path::{index_or_field, FieldPath, PathPattern, PathSegment};
use crate::registry::RuleRegistry;
use crate::rule::{parse_chain, NamedRule, RuleSpec, Rules};
use crate::Validated;

type AfterHook = dyn Fn(&mut AfterContext<'_>) + Send + Sync;

/// The result of one evaluation: the message bag plus the validated subset
/// of the record. Immutable once built.
#[derive(Debug, Clone)]
pub struct Outcome {
    bag: MessageBag,
    validated: Value,
}

impl Outcome {
    /// True if no messages were recorded.
    pub fn passes(&self) -> bool {
        self.bag.is_empty()
    }

    /// Complement of [`passes`](Self::passes).
    pub fn fails(&self) -> bool {
        !self.passes()
    }

    /// The accumulated messages.
    pub fn errors(&self) -> &MessageBag {
        &self.bag
    }

    /// The validated subset: only the fields that had rules, were present,
    /// and passed, reassembled into the record's tree shape.
    pub fn validated(&self) -> &Value {
        &self.validated
    }
}

/// Context handed to after-hooks.
///
/// Gives read access to the record under validation and append access to the
/// message bag. Messages added here carry the
/// [`CrossField`](Violation::CrossField) kind.
pub struct AfterContext<'a> {
    record: &'a Value,
    bag: &'a mut MessageBag,
}

impl<'a> AfterContext<'a> {
    /// The record being validated.
    pub fn record(&self) -> &Value {
        self.record
    }

    /// Resolves a dotted path in the record.
    pub fn get(&self, path: &str) -> Option<&Value> {
        FieldPath::parse(path).resolve(self.record)
    }

    /// The messages accumulated so far, per-field findings included.
    pub fn errors(&self) -> &MessageBag {
        self.bag
    }

    /// Appends a cross-field message to the given dotted path.
    pub fn add(&mut self, path: &str, text: impl Into<String>) {
        self.bag.add(FieldPath::parse(path), Violation::CrossField, text);
    }
}

/// The validation engine.
///
/// Holds one record and one parsed rule set. Evaluation runs at most once,
/// on first access to [`passes`](Self::passes) / [`fails`](Self::fails) /
/// [`errors`](Self::errors) / [`validate`](Self::validate), and the outcome
/// is cached. The engine keeps no global state; independent validators are
/// safe to run in parallel.
///
/// # Example
///
/// ```rust
/// use gauntlet::{Rules, Validator};
/// use serde_json::json;
///
/// let validator = Validator::make(
///     json!({"username": "eko", "password": "eko"}),
///     Rules::new()
///         .field("username", "required|email|max:100")
///         .field("password", "required|min:6|max:20"),
/// )
/// .unwrap();
///
/// assert!(validator.fails());
/// assert!(validator.errors().has("username"));
/// assert!(validator.errors().has("password"));
/// ```
pub struct Validator {
    record: Value,
    chains: Vec<(PathPattern, Vec<RuleSpec>)>,
    hooks: Vec<Arc<AfterHook>>,
    messages: Messages,
    stop_on_first: bool,
    outcome: Mutex<Option<Arc<Outcome>>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("record", &self.record)
            .field("stop_on_first", &self.stop_on_first)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Builds a validator from a record and a rule set, using only builtin
    /// rule names.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] if any path pattern or rule in the set is
    /// malformed. This is an authoring defect, distinct from validation
    /// failure, and no evaluation happens.
    pub fn make(record: Value, rules: Rules) -> Result<Self, RuleError> {
        Self::build(record, rules, None)
    }

    /// Builds a validator whose rule set may use names from a registry.
    pub fn make_with_registry(
        record: Value,
        rules: Rules,
        registry: &RuleRegistry,
    ) -> Result<Self, RuleError> {
        Self::build(record, rules, Some(registry))
    }

    fn build(
        record: Value,
        rules: Rules,
        registry: Option<&RuleRegistry>,
    ) -> Result<Self, RuleError> {
        let mut chains = Vec::with_capacity(rules.entries.len());
        for (pattern, input) in &rules.entries {
            let pattern = PathPattern::parse(pattern)?;
            let chain = parse_chain(input, registry)?;
            chains.push((pattern, chain));
        }
        Ok(Self {
            record,
            chains,
            hooks: Vec::new(),
            messages: Messages::default(),
            stop_on_first: false,
            outcome: Mutex::new(None),
        })
    }

    /// Registers an after-hook, run once after all per-field evaluation.
    ///
    /// Hooks run in registration order and may append further messages.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gauntlet::{Rules, Validator};
    /// use serde_json::json;
    ///
    /// let validator = Validator::make(
    ///     json!({"username": "a@b.com", "password": "a@b.com"}),
    ///     Rules::new()
    ///         .field("username", "required|email|max:100")
    ///         .field("password", "required|min:6|max:20"),
    /// )
    /// .unwrap()
    /// .after(|ctx| {
    ///     if ctx.get("username") == ctx.get("password") {
    ///         ctx.add("password", "The password must differ from the username.");
    ///     }
    /// });
    ///
    /// assert!(validator.fails());
    /// assert_eq!(validator.errors().get("password").len(), 1);
    /// ```
    pub fn after(mut self, hook: impl Fn(&mut AfterContext<'_>) + Send + Sync + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Stops every chain at its first failing rule.
    ///
    /// The default is to run the whole chain and collect every failure. The
    /// `bail` rule does the same for a single chain.
    pub fn stop_on_first(mut self, stop: bool) -> Self {
        self.stop_on_first = stop;
        self
    }

    /// Replaces the message templates used for builtin rule failures.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// The record under validation.
    pub fn record(&self) -> &Value {
        &self.record
    }

    /// True if the record satisfies every rule.
    pub fn passes(&self) -> bool {
        self.outcome().passes()
    }

    /// Complement of [`passes`](Self::passes).
    pub fn fails(&self) -> bool {
        !self.passes()
    }

    /// The accumulated message bag.
    pub fn errors(&self) -> MessageBag {
        self.outcome().errors().clone()
    }

    /// The cached evaluation outcome, computing it on first access.
    pub fn outcome(&self) -> Arc<Outcome> {
        let mut slot = self.outcome.lock();
        if let Some(outcome) = slot.as_ref() {
            return Arc::clone(outcome);
        }
        let outcome = Arc::new(self.evaluate());
        *slot = Some(Arc::clone(&outcome));
        outcome
    }

    /// Strict mode: returns the validated subset of the record, or the full
    /// message bag wrapped in a [`ValidationError`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use gauntlet::{Rules, Validator};
    /// use serde_json::json;
    ///
    /// let validator = Validator::make(
    ///     json!({"username": "thisgleam@gmail.com", "password": "12345678", "admin": true}),
    ///     Rules::new()
    ///         .field("username", "required|email|max:100")
    ///         .field("password", "required|min:6|max:20"),
    /// )
    /// .unwrap();
    ///
    /// let valid = validator.validate().unwrap();
    /// // only the fields covered by rules come back
    /// assert_eq!(
    ///     valid,
    ///     json!({"username": "thisgleam@gmail.com", "password": "12345678"})
    /// );
    /// ```
    pub fn validate(&self) -> Result<Value, ValidationError> {
        let outcome = self.outcome();
        if outcome.passes() {
            Ok(outcome.validated().clone())
        } else {
            Err(ValidationError::new(outcome.errors().clone()))
        }
    }

    /// The outcome as a `stillwater` validation: the validated subset on
    /// success, the message bag on failure.
    pub fn validated(&self) -> Validated<Value> {
        let outcome = self.outcome();
        if outcome.passes() {
            Validation::Success(outcome.validated().clone())
        } else {
            Validation::Failure(outcome.errors().clone())
        }
    }

    fn evaluate(&self) -> Outcome {
        let mut bag = MessageBag::new();
        let mut validated = Value::Object(Map::new());

        for (pattern, chain) in &self.chains {
            let has_required = chain
                .iter()
                .any(|r| matches!(r, RuleSpec::Named(NamedRule::Required)));

            for (path, value) in pattern.expand(&self.record) {
                // Without `required` in the chain, an absent value is
                // implicitly optional: skip the whole chain.
                if present(value).is_none() && !has_required {
                    continue;
                }

                let attribute = path.to_string();
                let mut bail = self.stop_on_first;
                let mut failed = false;

                'chain: for rule in chain {
                    match rule {
                        RuleSpec::Named(NamedRule::Bail) => {
                            bail = true;
                        }
                        RuleSpec::Named(named) => {
                            if let Some(message) = named.check(&attribute, value, &self.messages) {
                                bag.add(path.clone(), message.kind, message.text);
                                failed = true;
                                // A failed `required` leaves nothing for the
                                // rest of the chain to inspect.
                                if matches!(named, NamedRule::Required) || bail {
                                    break 'chain;
                                }
                            }
                        }
                        RuleSpec::Check(rule) => {
                            let Some(value) = present(value) else {
                                continue;
                            };
                            if !rule.passes(&attribute, value) {
                                bag.add(path.clone(), Violation::Invalid, rule.message(&attribute));
                                failed = true;
                                if bail {
                                    break 'chain;
                                }
                            }
                        }
                        RuleSpec::Closure(rule) => {
                            let Some(value) = present(value) else {
                                continue;
                            };
                            let mut reported = Vec::new();
                            rule.as_ref()(&attribute, value, &mut |text| reported.push(text));
                            if !reported.is_empty() {
                                failed = true;
                                for text in reported {
                                    bag.add(path.clone(), Violation::Invalid, text);
                                }
                                if bail {
                                    break 'chain;
                                }
                            }
                        }
                    }
                }

                if !failed {
                    if let Some(value) = present(value) {
                        insert_at(&mut validated, &self.record, &path, value.clone());
                    }
                }
            }
        }

        let mut ctx = AfterContext {
            record: &self.record,
            bag: &mut bag,
        };
        for hook in &self.hooks {
            hook.as_ref()(&mut ctx);
        }

        Outcome { bag, validated }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Writes a value into the validated-subset tree at a concrete path,
/// creating intermediate records and lists as needed.
///
/// The source record decides the container an index segment creates: an
/// index that resolved through a record's all-digit key stays a record key
/// in the subset instead of becoming a padded list.
fn insert_at(root: &mut Value, record: &Value, path: &FieldPath, value: Value) {
    let mut current = root;
    let mut source = Some(record);
    for segment in path.segments() {
        match segment {
            PathSegment::Field(name) => {
                source = source.and_then(|v| v.get(name.as_str()));
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                match current {
                    Value::Object(map) => {
                        current = map.entry(name.clone()).or_insert(Value::Null);
                    }
                    _ => return,
                }
            }
            PathSegment::Index(idx) => {
                let key_lookup = matches!(source, Some(Value::Object(_)));
                source = source.and_then(|v| index_or_field(v, *idx));
                if key_lookup {
                    if !current.is_object() {
                        *current = Value::Object(Map::new());
                    }
                    match current {
                        Value::Object(map) => {
                            current = map.entry(idx.to_string()).or_insert(Value::Null);
                        }
                        _ => return,
                    }
                } else {
                    if !current.is_array() {
                        *current = Value::Array(Vec::new());
                    }
                    match current {
                        Value::Array(items) => {
                            while items.len() <= *idx {
                                items.push(Value::Null);
                            }
                            current = &mut items[*idx];
                        }
                        _ => return,
                    }
                }
            }
        }
    }
    *current = value;
}

// Validators are handed across threads in host applications; the cache and
// hooks must stay Send + Sync.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator>();
    assert_sync::<Validator>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_at_builds_nested_shape() {
        let record = json!({
            "name": {"first": "Gleam", "last": "Budi"},
            "address": [{"city": "Jakarta"}, {"city": "Bandung"}]
        });
        let mut root = Value::Object(Map::new());
        insert_at(&mut root, &record, &FieldPath::parse("name.first"), json!("Gleam"));
        insert_at(&mut root, &record, &FieldPath::parse("address.0.city"), json!("Jakarta"));
        insert_at(&mut root, &record, &FieldPath::parse("address.1.city"), json!("Bandung"));

        assert_eq!(
            root,
            json!({
                "name": {"first": "Gleam"},
                "address": [{"city": "Jakarta"}, {"city": "Bandung"}]
            })
        );
    }

    #[test]
    fn test_insert_at_pads_missing_indices() {
        let record = json!({"items": ["a", "b", "c"]});
        let mut root = Value::Object(Map::new());
        insert_at(&mut root, &record, &FieldPath::parse("items.2"), json!("c"));
        assert_eq!(root, json!({"items": [null, null, "c"]}));
    }

    #[test]
    fn test_insert_at_keeps_numeric_record_keys() {
        let record = json!({"budgets": {"2020": {"amount": 100}}});
        let mut root = Value::Object(Map::new());
        insert_at(
            &mut root,
            &record,
            &FieldPath::parse("budgets.2020.amount"),
            json!(100),
        );
        assert_eq!(root, json!({"budgets": {"2020": {"amount": 100}}}));
    }

    #[test]
    fn test_outcome_cached_once() {
        let validator = Validator::make(
            json!({"username": ""}),
            Rules::new().field("username", "required"),
        )
        .unwrap();

        let first = validator.outcome();
        let second = validator.outcome();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_misconfigured_rule_aborts_before_evaluation() {
        let err = Validator::make(
            json!({"username": ""}),
            Rules::new().field("username", "required|max:oops"),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::InvalidParameter { .. }));
    }
}
