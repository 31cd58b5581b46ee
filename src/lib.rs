//! # Gauntlet
//!
//! A rule-chain validator for nested data that accumulates EVERY failure
//! into a path-keyed message bag, rather than short-circuiting on the first
//! one.
//!
//! ## Overview
//!
//! A record (any `serde_json::Value` tree) is checked against a rule set
//! mapping field path patterns to ordered rule chains. Patterns may contain
//! the `*` wildcard over list indices (`address.*.city`); each expanded
//! concrete path is validated independently and reports into its own
//! indexed key (`address.0.city`). Rules are written in a compact text DSL
//! (`"required|email|max:100"`), as reusable [`RuleCheck`] objects, or as
//! inline closures; cross-field checks run as after-hooks.
//!
//! ## Core Types
//!
//! - [`Validator`]: the engine; evaluates once, caches the outcome
//! - [`Rules`]: field path pattern → ordered rule chain
//! - [`MessageBag`]: ordered path → message list, the structured error view
//! - [`RuleError`]: rule-set authoring defects, reported before evaluation
//! - [`ValidationError`]: strict-mode failure carrying the full bag
//!
//! ## Example
//!
//! ```rust
//! use gauntlet::{Rules, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::make(
//!     json!({"username": "", "password": ""}),
//!     Rules::new()
//!         .field("username", "required")
//!         .field("password", "required"),
//! )
//! .unwrap();
//!
//! assert!(validator.fails());
//! assert_eq!(
//!     validator.errors().to_json(),
//!     json!({
//!         "username": ["The username field is required."],
//!         "password": ["The password field is required."]
//!     })
//! );
//! ```

pub mod error;
pub mod messages;
pub mod path;
pub mod registry;
pub mod rule;
pub mod validator;

pub use error::{Message, MessageBag, RuleError, ValidationError, Violation};
pub use messages::Messages;
pub use path::{FieldPath, PathPattern, PathSegment, PatternSegment};
pub use registry::{RuleFactory, RuleRegistry};
pub use rule::{ChainInput, NamedRule, Rule, RuleCheck, RuleSpec, Rules};
pub use validator::{AfterContext, Outcome, Validator};

/// Type alias for validation results using MessageBag
pub type Validated<T> = stillwater::Validation<T, MessageBag>;
