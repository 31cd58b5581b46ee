//! Error types: the path-keyed message bag and the failure conditions.
//!
//! Validation findings accumulate in a [`MessageBag`]. Misconfigured rules
//! surface as [`RuleError`] before any evaluation runs; strict-mode failures
//! surface as [`ValidationError`] carrying the full bag.

mod fault;
mod message_bag;

pub use fault::{RuleError, ValidationError};
pub use message_bag::{Message, MessageBag, Violation};
