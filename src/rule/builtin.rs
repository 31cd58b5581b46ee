//! Builtin named rules and their evaluation.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Message, Violation};
use crate::messages::Messages;

/// A named builtin rule, parsed from the text DSL or built via
/// [`Rule`](crate::Rule).
#[derive(Debug, Clone)]
pub enum NamedRule {
    /// Stop the chain at its first failure.
    Bail,
    /// The value must be present and non-empty.
    Required,
    /// The value must look like an email address.
    Email,
    /// The value must be a number or a numeric string.
    Numeric,
    /// The value's size must be at least the bound.
    Min(f64),
    /// The value's size must be at most the bound.
    Max(f64),
    /// The value must be one of the listed options.
    OneOf(Vec<String>),
    /// The value must match the regex.
    Pattern {
        /// The compiled pattern.
        regex: Regex,
        /// The original pattern text, for messages.
        source: String,
    },
}

impl NamedRule {
    /// The message-template code for this rule.
    pub fn code(&self) -> &'static str {
        match self {
            NamedRule::Bail => "bail",
            NamedRule::Required => "required",
            NamedRule::Email => "email",
            NamedRule::Numeric => "numeric",
            NamedRule::Min(_) => "min",
            NamedRule::Max(_) => "max",
            NamedRule::OneOf(_) => "in",
            NamedRule::Pattern { .. } => "regex",
        }
    }

    /// Evaluates this rule against one field value.
    ///
    /// `value` is `None` when the path is absent from the record. Only
    /// `required` fails on absence; every other rule skips absent and null
    /// values (the chain-level optional semantics live in the validator).
    pub(crate) fn check(
        &self,
        attribute: &str,
        value: Option<&Value>,
        messages: &Messages,
    ) -> Option<Message> {
        if let NamedRule::Required = self {
            return if is_empty_value(value) {
                Some(Message::new(
                    Violation::Missing,
                    messages.render(self.code(), attribute, None),
                ))
            } else {
                None
            };
        }

        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => return None,
        };

        let failed = match self {
            NamedRule::Bail | NamedRule::Required => return None,
            NamedRule::Email => !value
                .as_str()
                .map(|s| email_regex().is_match(s))
                .unwrap_or(false),
            NamedRule::Numeric => !is_numeric(value),
            NamedRule::Min(bound) => value_size(value).map(|s| s < *bound).unwrap_or(true),
            NamedRule::Max(bound) => value_size(value).map(|s| s > *bound).unwrap_or(true),
            NamedRule::OneOf(options) => !value_text(value)
                .map(|t| options.iter().any(|o| o == &t))
                .unwrap_or(false),
            NamedRule::Pattern { regex, .. } => {
                !value.as_str().map(|s| regex.is_match(s)).unwrap_or(false)
            }
        };

        if failed {
            let param = match self {
                NamedRule::Min(bound) | NamedRule::Max(bound) => Some(format_bound(*bound)),
                _ => None,
            };
            Some(Message::new(
                Violation::Invalid,
                messages.render(self.code(), attribute, param.as_deref()),
            ))
        } else {
            None
        }
    }
}

/// True when the value is what `required` rejects: absent, null, empty
/// string, empty list, or empty record.
pub(crate) fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.parse::<f64>().is_ok(),
        _ => false,
    }
}

/// The size a `min`/`max` bound compares against: character count for
/// strings, numeric value for numbers, element count for lists and records.
fn value_size(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        _ => None,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}
