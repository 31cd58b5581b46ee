//! The path-keyed message bag.
//!
//! This module provides [`MessageBag`], an ordered mapping from concrete
//! field path to the messages recorded against it, and [`Message`] with its
//! [`Violation`] kind.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::prelude::*;

use crate::path::FieldPath;

/// The kind of finding a message represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// A required value was absent or empty.
    Missing,
    /// A present value failed a format or bound rule.
    Invalid,
    /// An after-hook rejected a combination of fields.
    CrossField,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// What class of failure this is.
    pub kind: Violation,
    /// Human-readable description.
    pub text: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(kind: Violation, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// An ordered collection of validation messages keyed by field path.
///
/// Paths appear in the order they were first written to, and each path's
/// messages appear in the order its rules were evaluated. An empty bag means
/// validation passed.
///
/// # Example
///
/// ```rust
/// use gauntlet::{FieldPath, MessageBag, Violation};
///
/// let mut bag = MessageBag::new();
/// bag.add(
///     FieldPath::from_field("username"),
///     Violation::Missing,
///     "The username field is required.",
/// );
///
/// assert!(!bag.is_empty());
/// assert_eq!(bag.get("username").len(), 1);
/// assert!(bag.get("password").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageBag {
    entries: IndexMap<FieldPath, Vec<Message>>,
}

impl MessageBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the given path's list.
    pub fn add(&mut self, path: FieldPath, kind: Violation, text: impl Into<String>) {
        self.entries
            .entry(path)
            .or_default()
            .push(Message::new(kind, text));
    }

    /// Returns the messages recorded against a dotted path, in evaluation
    /// order, or an empty slice if the path has none.
    pub fn get(&self, path: &str) -> &[Message] {
        self.at_path(&FieldPath::parse(path))
    }

    /// Returns the messages recorded against a concrete path.
    pub fn at_path(&self, path: &FieldPath) -> &[Message] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first message for a dotted path, if any.
    pub fn first(&self, path: &str) -> Option<&Message> {
        self.get(path).first()
    }

    /// Returns true if at least one message is recorded against the path.
    pub fn has(&self, path: &str) -> bool {
        !self.get(path).is_empty()
    }

    /// Returns true if no messages are recorded at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total number of messages across all paths.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns the number of distinct paths with messages.
    pub fn path_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns an iterator over paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries.keys()
    }

    /// Returns an iterator over `(path, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[Message])> {
        self.entries.iter().map(|(p, m)| (p, m.as_slice()))
    }

    /// Serializes the bag as an ordered JSON object mapping each path to its
    /// list of message texts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gauntlet::{FieldPath, MessageBag, Violation};
    /// use serde_json::json;
    ///
    /// let mut bag = MessageBag::new();
    /// bag.add(
    ///     FieldPath::from_field("username"),
    ///     Violation::Missing,
    ///     "The username field is required.",
    /// );
    ///
    /// assert_eq!(
    ///     bag.to_json(),
    ///     json!({"username": ["The username field is required."]})
    /// );
    /// ```
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (path, messages) in &self.entries {
            let texts: Vec<Value> = messages
                .iter()
                .map(|m| Value::String(m.text.clone()))
                .collect();
            map.insert(path.to_string(), Value::Array(texts));
        }
        Value::Object(map)
    }
}

impl Semigroup for MessageBag {
    fn combine(mut self, other: Self) -> Self {
        for (path, messages) in other.entries {
            self.entries.entry(path).or_default().extend(messages);
        }
        self
    }
}

impl Display for MessageBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "validation failed with {} error(s):", self.len())?;
        let mut n = 0;
        for (path, messages) in &self.entries {
            for message in messages {
                n += 1;
                writeln!(f, "  {}. {}: {}", n, path, message.text)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for MessageBag {}

// The bag crosses thread boundaries inside ValidationError; keep it that way
// if the field types ever change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<MessageBag>();
    assert_sync::<MessageBag>();
};
