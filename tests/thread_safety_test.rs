//! Tests for concurrent use of validators and the rule registry.

use gauntlet::{Rule, RuleRegistry, Rules, Validator};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_independent_validations() {
    let handles: Vec<_> = (0..10)
        .map(|i| {
            thread::spawn(move || {
                let validator = Validator::make(
                    json!({
                        "username": format!("user{i}@example.com"),
                        "password": "12345678"
                    }),
                    Rules::new()
                        .field("username", "required|email|max:100")
                        .field("password", "required|min:6|max:20"),
                )
                .unwrap();
                assert!(validator.passes());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_shared_validator_across_threads() {
    let validator = Arc::new(
        Validator::make(
            json!({"username": "eko"}),
            Rules::new().field("username", "required|email"),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                assert!(validator.fails());
                assert_eq!(validator.errors().get("username").len(), 1);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(RuleRegistry::new());
    registry
        .register("uppercase", |_| {
            Ok(Rule::closure(|attribute, value, fail| {
                if let Some(s) = value.as_str() {
                    if s.to_uppercase() != s {
                        fail(format!("The {attribute} field must be UPPERCASE."));
                    }
                }
            }))
        })
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let validator = Validator::make_with_registry(
                    json!({"code": format!("CODE{i}")}),
                    Rules::new().field("code", "required|uppercase"),
                    &registry,
                )
                .unwrap();
                assert!(validator.passes());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
