//! Field paths and path patterns for locating values in nested records.
//!
//! This module provides [`FieldPath`] for concrete locations like
//! `address.0.city`, and [`PathPattern`] for rule-set patterns that may
//! contain the `*` wildcard, like `address.*.city`. Patterns are expanded
//! against a record into the concrete paths they cover.

use std::fmt::{self, Display};

use serde_json::Value;

use crate::error::RuleError;

/// A segment of a concrete field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field access (e.g., `city`).
    Field(String),
    /// An index into a list (e.g., `0`).
    Index(usize),
}

/// A concrete path to one value in a nested record.
///
/// Paths render in dotted form with numeric index segments, matching the
/// keys a message bag uses: `address.0.city`.
///
/// # Example
///
/// ```rust
/// use gauntlet::FieldPath;
///
/// let path = FieldPath::root()
///     .push_field("address")
///     .push_index(0)
///     .push_field("city");
///
/// assert_eq!(path.to_string(), "address.0.city");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates an empty path representing the record root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parses a dotted path string into a concrete path.
    ///
    /// All-digit segments become index segments, everything else a field
    /// segment. An empty string parses to the root path. Records with
    /// all-digit keys (e.g. `{"2020": ...}`) still resolve: an index
    /// segment that lands on a record falls back to a field lookup.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        let segments = path
            .split('.')
            .map(|seg| match seg.parse::<usize>() {
                Ok(idx) => PathSegment::Index(idx),
                Err(_) => PathSegment::Field(seg.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Walks the record tree along this path, returning the value it points
    /// at, or `None` if any segment is missing along the way.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let mut current = record;
        for segment in &self.segments {
            current = match segment {
                PathSegment::Field(name) => current.get(name.as_str())?,
                PathSegment::Index(idx) => index_or_field(current, *idx)?,
            };
        }
        Some(current)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                PathSegment::Field(name) => write!(f, "{}", name)?,
                PathSegment::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}

/// A segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// A named field access.
    Field(String),
    /// A literal list index.
    Index(usize),
    /// Every index of the list at this point.
    Wildcard,
}

/// A rule-set path pattern, possibly containing `*` wildcards.
///
/// A pattern without wildcards covers exactly one concrete path. A `*`
/// segment expands to every index present in the list at that point; a
/// pattern with several wildcards covers the cross-product of indices.
///
/// # Example
///
/// ```rust
/// use gauntlet::PathPattern;
/// use serde_json::json;
///
/// let pattern = PathPattern::parse("address.*.city").unwrap();
/// let record = json!({
///     "address": [{"city": "Jakarta"}, {"city": "Bandung"}]
/// });
///
/// let expanded = pattern.expand(&record);
/// assert_eq!(expanded.len(), 2);
/// assert_eq!(expanded[0].0.to_string(), "address.0.city");
/// assert_eq!(expanded[1].0.to_string(), "address.1.city");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parses a dotted pattern string.
    ///
    /// `*` segments become wildcards, all-digit segments become literal
    /// indices. Empty patterns or empty segments are a configuration error.
    pub fn parse(pattern: &str) -> Result<Self, RuleError> {
        if pattern.is_empty() {
            return Err(RuleError::InvalidPath(pattern.to_string()));
        }
        let mut segments = Vec::new();
        for seg in pattern.split('.') {
            if seg.is_empty() {
                return Err(RuleError::InvalidPath(pattern.to_string()));
            }
            segments.push(match seg {
                "*" => PatternSegment::Wildcard,
                _ => match seg.parse::<usize>() {
                    Ok(idx) => PatternSegment::Index(idx),
                    Err(_) => PatternSegment::Field(seg.to_string()),
                },
            });
        }
        Ok(Self { segments })
    }

    /// Returns true if this pattern contains at least one wildcard segment.
    pub fn has_wildcard(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PatternSegment::Wildcard))
    }

    /// Expands this pattern against a record into concrete paths and the
    /// values they point at.
    ///
    /// A pattern without wildcards always yields exactly one entry, with
    /// `None` as the value when the path is missing from the record. A
    /// wildcard over an absent or non-list value yields zero entries.
    pub fn expand<'a>(&self, record: &'a Value) -> Vec<(FieldPath, Option<&'a Value>)> {
        let mut out = Vec::new();
        expand_into(&self.segments, Some(record), FieldPath::root(), &mut out);
        out
    }
}

// Dotted syntax cannot distinguish `2020` the index from `2020` the key, so
// an index that misses retries as a field name on records.
pub(crate) fn index_or_field(value: &Value, idx: usize) -> Option<&Value> {
    value
        .get(idx)
        .or_else(|| value.get(idx.to_string().as_str()))
}

fn expand_into<'a>(
    segments: &[PatternSegment],
    current: Option<&'a Value>,
    prefix: FieldPath,
    out: &mut Vec<(FieldPath, Option<&'a Value>)>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push((prefix, current));
        return;
    };

    match head {
        PatternSegment::Field(name) => {
            let next = current.and_then(|v| v.get(name.as_str()));
            expand_into(rest, next, prefix.push_field(name.clone()), out);
        }
        PatternSegment::Index(idx) => {
            let next = current.and_then(|v| index_or_field(v, *idx));
            expand_into(rest, next, prefix.push_index(*idx), out);
        }
        PatternSegment::Wildcard => {
            let Some(items) = current.and_then(|v| v.as_array()) else {
                return;
            };
            for (idx, item) in items.iter().enumerate() {
                expand_into(rest, Some(item), prefix.push_index(idx), out);
            }
        }
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                PatternSegment::Field(name) => write!(f, "{}", name)?,
                PatternSegment::Index(idx) => write!(f, "{}", idx)?,
                PatternSegment::Wildcard => write!(f, "*")?,
            }
        }
        Ok(())
    }
}
