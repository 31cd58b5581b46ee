//! Rule specifications and the rule-set builder.
//!
//! A [`RuleSpec`] is one link in a field's rule chain. Three kinds exist and
//! all dispatch through one evaluation path:
//!
//! - a named builtin with optional parameters (`required`, `max:100`),
//! - a reusable rule object implementing [`RuleCheck`],
//! - an inline closure that reports failures through a `fail` callback.
//!
//! [`Rule`] is the factory for building specs in code; [`Rules`] maps field
//! path patterns to ordered chains.

mod builtin;
mod parse;

use std::sync::Arc;

use serde_json::Value;

use crate::error::RuleError;

pub use builtin::NamedRule;
pub(crate) use parse::parse_chain;

/// A reusable rule object.
///
/// Implementors answer whether a value passes and supply the failure message
/// used when it does not. Rule objects must not mutate shared state; the
/// `Send + Sync` bounds let one instance serve concurrent validations.
///
/// # Example
///
/// ```rust
/// use gauntlet::RuleCheck;
/// use serde_json::Value;
///
/// struct Uppercase;
///
/// impl RuleCheck for Uppercase {
///     fn passes(&self, _attribute: &str, value: &Value) -> bool {
///         value
///             .as_str()
///             .map(|s| s.to_uppercase() == s)
///             .unwrap_or(false)
///     }
///
///     fn message(&self, attribute: &str) -> String {
///         format!("The {attribute} field must be uppercase.")
///     }
/// }
/// ```
pub trait RuleCheck: Send + Sync {
    /// Returns true if the value satisfies this rule.
    fn passes(&self, attribute: &str, value: &Value) -> bool;

    /// Returns the failure message for the given attribute.
    fn message(&self, attribute: &str) -> String;
}

/// An inline rule closure: `(attribute, value, fail)`.
///
/// The closure calls `fail(message)` for each violation it finds; it may
/// fail more than once and never halts the rest of the chain.
pub type ClosureRule = dyn Fn(&str, &Value, &mut dyn FnMut(String)) + Send + Sync;

/// One link in a rule chain.
#[derive(Clone)]
pub enum RuleSpec {
    /// A named builtin rule.
    Named(NamedRule),
    /// A reusable rule object.
    Check(Arc<dyn RuleCheck>),
    /// An inline closure rule.
    Closure(Arc<ClosureRule>),
}

impl std::fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSpec::Named(rule) => f.debug_tuple("Named").field(rule).finish(),
            RuleSpec::Check(_) => f.write_str("Check(..)"),
            RuleSpec::Closure(_) => f.write_str("Closure(..)"),
        }
    }
}

/// Factory for rule specifications.
///
/// Mirrors the text DSL: `Rule::required()` is `"required"`, `Rule::max(100)`
/// is `"max:100"`, and so on. Use these when a chain mixes builtins with rule
/// objects or closures.
///
/// # Example
///
/// ```rust
/// use gauntlet::{Rule, Rules};
///
/// let rules = Rules::new()
///     .field("username", "required|email|max:100")
///     .field(
///         "password",
///         vec![Rule::required(), Rule::min(6), Rule::max(20)],
///     );
/// ```
pub struct Rule;

impl Rule {
    /// The `required` rule: fails on absent, null, or empty values.
    pub fn required() -> RuleSpec {
        RuleSpec::Named(NamedRule::Required)
    }

    /// The `bail` rule: stop this chain at its first failure.
    pub fn bail() -> RuleSpec {
        RuleSpec::Named(NamedRule::Bail)
    }

    /// The `email` rule: the value must look like an email address.
    pub fn email() -> RuleSpec {
        RuleSpec::Named(NamedRule::Email)
    }

    /// The `numeric` rule: the value must be a number or a numeric string.
    pub fn numeric() -> RuleSpec {
        RuleSpec::Named(NamedRule::Numeric)
    }

    /// The `min:N` rule: size must be at least `N`.
    ///
    /// Size is the character count for strings, the numeric value for
    /// numbers, and the element count for lists and nested records.
    pub fn min(bound: impl Into<f64>) -> RuleSpec {
        RuleSpec::Named(NamedRule::Min(bound.into()))
    }

    /// The `max:N` rule: size must be at most `N`.
    pub fn max(bound: impl Into<f64>) -> RuleSpec {
        RuleSpec::Named(NamedRule::Max(bound.into()))
    }

    /// The `in:a,b,c` rule: the value must be one of the given options.
    pub fn one_of<I, S>(options: I) -> RuleSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleSpec::Named(NamedRule::OneOf(
            options.into_iter().map(Into::into).collect(),
        ))
    }

    /// The `regex:PATTERN` rule.
    ///
    /// The pattern is compiled here, so a malformed pattern is rejected
    /// before any validation runs.
    pub fn regex(pattern: &str) -> Result<RuleSpec, RuleError> {
        let regex = regex::Regex::new(pattern).map_err(|source| RuleError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(RuleSpec::Named(NamedRule::Pattern {
            regex,
            source: pattern.to_string(),
        }))
    }

    /// Wraps a reusable rule object.
    pub fn check(rule: impl RuleCheck + 'static) -> RuleSpec {
        RuleSpec::Check(Arc::new(rule))
    }

    /// Wraps an inline closure rule.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gauntlet::Rule;
    ///
    /// let uppercase = Rule::closure(|attribute, value, fail| {
    ///     if let Some(s) = value.as_str() {
    ///         if s.to_uppercase() != s {
    ///             fail(format!("The {attribute} field must be uppercase."));
    ///         }
    ///     }
    /// });
    /// ```
    pub fn closure(
        rule: impl Fn(&str, &Value, &mut dyn FnMut(String)) + Send + Sync + 'static,
    ) -> RuleSpec {
        RuleSpec::Closure(Arc::new(rule))
    }
}

/// Unparsed input for one field's rule chain.
///
/// Built through `From` conversions so [`Rules::field`] accepts a pipe-joined
/// string, a list of rule strings, or a list of [`RuleSpec`]s.
#[derive(Clone)]
pub struct ChainInput(pub(crate) Vec<ChainItem>);

#[derive(Clone)]
pub(crate) enum ChainItem {
    Text(String),
    Spec(RuleSpec),
}

impl From<&str> for ChainInput {
    fn from(text: &str) -> Self {
        Self(vec![ChainItem::Text(text.to_string())])
    }
}

impl From<String> for ChainInput {
    fn from(text: String) -> Self {
        Self(vec![ChainItem::Text(text)])
    }
}

impl From<RuleSpec> for ChainInput {
    fn from(spec: RuleSpec) -> Self {
        Self(vec![ChainItem::Spec(spec)])
    }
}

impl From<Vec<RuleSpec>> for ChainInput {
    fn from(specs: Vec<RuleSpec>) -> Self {
        Self(specs.into_iter().map(ChainItem::Spec).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ChainInput {
    fn from(texts: [&str; N]) -> Self {
        Self(
            texts
                .into_iter()
                .map(|t| ChainItem::Text(t.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<&str>> for ChainInput {
    fn from(texts: Vec<&str>) -> Self {
        Self(
            texts
                .into_iter()
                .map(|t| ChainItem::Text(t.to_string()))
                .collect(),
        )
    }
}

/// A rule set: field path patterns mapped to ordered rule chains.
///
/// Entry order is preserved and determines evaluation (and therefore error)
/// order. Patterns may contain `*` wildcards over list indices.
///
/// # Example
///
/// ```rust
/// use gauntlet::Rules;
///
/// let rules = Rules::new()
///     .field("name.first", ["required", "max:100"])
///     .field("address.*.city", "required|max:100");
/// ```
#[derive(Clone, Default)]
pub struct Rules {
    pub(crate) entries: Vec<(String, ChainInput)>,
}

impl Rules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule chain for a field path pattern.
    ///
    /// The pattern and chain are parsed when the validator is built, so a
    /// malformed entry surfaces as a [`RuleError`] from
    /// [`Validator::make`](crate::Validator::make).
    pub fn field(mut self, pattern: impl Into<String>, chain: impl Into<ChainInput>) -> Self {
        self.entries.push((pattern.into(), chain.into()));
        self
    }

    /// Returns the number of pattern entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the rule set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
