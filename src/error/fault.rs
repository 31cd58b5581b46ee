//! Failure conditions: rule misconfiguration and strict-mode validation
//! failure.

use crate::error::MessageBag;

/// A rule-set authoring error.
///
/// These are programming defects, not bad input: an unknown rule name, a
/// malformed parameter, an invalid regex, or a malformed path pattern.
/// They are detected while the rule set is parsed, before any value is
/// inspected, and abort validation entirely.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule name that is neither a builtin nor registered.
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    /// A rule that needs a parameter was given none.
    #[error("rule '{0}' requires a parameter")]
    MissingParameter(String),

    /// A rule parameter that could not be interpreted.
    #[error("rule '{rule}' has invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// The rule name.
        rule: String,
        /// The offending parameter text.
        param: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A `regex:` rule whose pattern failed to compile.
    #[error("rule 'regex' has invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        /// The pattern text.
        pattern: String,
        /// The compile error.
        source: regex::Error,
    },

    /// A field path pattern that could not be parsed.
    #[error("invalid field path '{0}'")]
    InvalidPath(String),

    /// Attempted to register a rule name that already exists.
    #[error("rule '{0}' already registered")]
    DuplicateRule(String),
}

/// Strict-mode validation failure.
///
/// Returned by [`Validator::validate`](crate::Validator::validate) when the
/// record fails. Always carries the complete message bag so the caller can
/// present every problem at once.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{bag}")]
pub struct ValidationError {
    bag: MessageBag,
}

impl ValidationError {
    /// Creates a validation error from a message bag.
    pub fn new(bag: MessageBag) -> Self {
        Self { bag }
    }

    /// Returns the message bag.
    pub fn bag(&self) -> &MessageBag {
        &self.bag
    }

    /// Consumes the error, returning the message bag.
    pub fn into_bag(self) -> MessageBag {
        self.bag
    }
}
