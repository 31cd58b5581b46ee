//! End-to-end scenarios for the validator: a login-form record checked
//! against required/email/length chains, strict mode, and cross-field
//! after-hooks.

use gauntlet::{Rules, Validator, Violation};
use serde_json::json;

#[test]
fn test_required_fields_present() {
    let validator = Validator::make(
        json!({"username": "admin", "password": "12345678"}),
        Rules::new()
            .field("username", "required")
            .field("password", "required"),
    )
    .unwrap();

    assert!(validator.passes());
    assert!(!validator.fails());
    assert!(validator.errors().is_empty());
}

#[test]
fn test_required_fields_empty() {
    let validator = Validator::make(
        json!({"username": "", "password": ""}),
        Rules::new()
            .field("username", "required")
            .field("password", "required"),
    )
    .unwrap();

    assert!(validator.fails());
    assert!(!validator.passes());

    let errors = validator.errors();
    assert_eq!(errors.get("username").len(), 1);
    assert_eq!(errors.get("password").len(), 1);
    assert_eq!(errors.first("username").unwrap().kind, Violation::Missing);
}

#[test]
fn test_strict_mode_carries_full_bag() {
    let validator = Validator::make(
        json!({"username": "", "password": ""}),
        Rules::new()
            .field("username", "required")
            .field("password", "required"),
    )
    .unwrap();

    let err = validator.validate().unwrap_err();
    assert_eq!(err.bag().path_count(), 2);
    assert!(err.bag().has("username"));
    assert!(err.bag().has("password"));
}

#[test]
fn test_multiple_rules_collect_all_failures() {
    let validator = Validator::make(
        json!({"username": "eko", "password": "eko"}),
        Rules::new()
            .field("username", "required|email|max:100")
            .field("password", ["required", "min:6", "max:20"]),
    )
    .unwrap();

    assert!(validator.fails());

    let errors = validator.errors();
    // username is present and under 100 chars, only the email rule fails
    let username: Vec<&str> = errors
        .get("username")
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(
        username,
        vec!["The username field must be a valid email address."]
    );

    // password is present and under 20 chars, only the min rule fails
    let password: Vec<&str> = errors
        .get("password")
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(password, vec!["The password field must be at least 6."]);
}

#[test]
fn test_valid_data_returns_validated_subset() {
    let validator = Validator::make(
        json!({
            "username": "thisgleam@gmail.com",
            "password": "12345678",
            "admin": true
        }),
        Rules::new()
            .field("username", "required|email|max:100")
            .field("password", "required|min:6|max:20"),
    )
    .unwrap();

    let valid = validator.validate().unwrap();
    // fields without rules are filtered out
    assert_eq!(
        valid,
        json!({"username": "thisgleam@gmail.com", "password": "12345678"})
    );
}

#[test]
fn test_after_hook_adds_cross_field_error() {
    let validator = Validator::make(
        json!({
            "username": "thisgleam@gmail.com",
            "password": "thisgleam@gmail.com"
        }),
        Rules::new()
            .field("username", "required|email|max:100")
            .field("password", ["required", "min:6", "max:20"]),
    )
    .unwrap()
    .after(|ctx| {
        if ctx.get("username") == ctx.get("password") {
            ctx.add("password", "The password must differ from the username.");
        }
    });

    // both fields pass their own chains, the hook alone fails the record
    assert!(validator.fails());

    let errors = validator.errors();
    assert!(errors.get("username").is_empty());
    assert_eq!(errors.get("password").len(), 1);
    assert_eq!(
        errors.first("password").unwrap().kind,
        Violation::CrossField
    );
}

#[test]
fn test_after_hooks_run_in_registration_order() {
    let validator = Validator::make(
        json!({"username": "admin"}),
        Rules::new().field("username", "required"),
    )
    .unwrap()
    .after(|ctx| ctx.add("username", "first"))
    .after(|ctx| ctx.add("username", "second"));

    let texts: Vec<String> = validator
        .errors()
        .get("username")
        .iter()
        .map(|m| m.text.clone())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[test]
fn test_after_hook_sees_per_field_findings() {
    let validator = Validator::make(
        json!({"username": ""}),
        Rules::new().field("username", "required"),
    )
    .unwrap()
    .after(|ctx| {
        assert!(ctx.errors().has("username"));
        ctx.add("username", "still empty");
    });

    assert_eq!(validator.errors().get("username").len(), 2);
}

#[test]
fn test_absent_optional_field_is_skipped() {
    // no `required` in the chain: absence short-circuits to "no error"
    let validator = Validator::make(
        json!({"username": "admin"}),
        Rules::new()
            .field("username", "required")
            .field("nickname", "min:3|max:20"),
    )
    .unwrap();

    assert!(validator.passes());
}

#[test]
fn test_absent_required_field_reports_once() {
    let validator = Validator::make(
        json!({}),
        Rules::new().field("username", "required|email|min:5"),
    )
    .unwrap();

    let errors = validator.errors();
    // required fails and the rest of the chain is skipped
    assert_eq!(errors.get("username").len(), 1);
    assert_eq!(errors.first("username").unwrap().kind, Violation::Missing);
}

#[test]
fn test_null_counts_as_absent() {
    let validator = Validator::make(
        json!({"nickname": null}),
        Rules::new().field("nickname", "min:3"),
    )
    .unwrap();
    assert!(validator.passes());

    let validator = Validator::make(
        json!({"nickname": null}),
        Rules::new().field("nickname", "required"),
    )
    .unwrap();
    assert!(validator.fails());
}

#[test]
fn test_passes_equals_empty_bag() {
    let records = [
        json!({"username": "admin", "password": "12345678"}),
        json!({"username": "", "password": ""}),
        json!({}),
    ];

    for record in records {
        let validator = Validator::make(
            record,
            Rules::new()
                .field("username", "required")
                .field("password", "required"),
        )
        .unwrap();
        assert_eq!(validator.passes(), validator.errors().is_empty());
        assert_eq!(validator.fails(), !validator.passes());
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    let make = || {
        Validator::make(
            json!({"username": "eko", "password": "eko"}),
            Rules::new()
                .field("username", "required|email|max:100")
                .field("password", "required|min:6|max:20"),
        )
        .unwrap()
    };

    let first = make().errors();
    let second = make().errors();
    assert_eq!(first, second);
    assert_eq!(first.to_json(), second.to_json());
}

#[test]
fn test_stillwater_bridge() {
    let validator = Validator::make(
        json!({"username": "admin"}),
        Rules::new().field("username", "required"),
    )
    .unwrap();
    assert!(validator.validated().is_success());

    let validator = Validator::make(
        json!({"username": ""}),
        Rules::new().field("username", "required"),
    )
    .unwrap();
    let result = validator.validated();
    assert!(result.is_failure());
    let bag = result.into_result().unwrap_err();
    assert!(bag.has("username"));
}

#[test]
fn test_rules_reach_numeric_record_keys() {
    let validator = Validator::make(
        json!({"budgets": {"2020": {"amount": 100}, "2021": {}}}),
        Rules::new()
            .field("budgets.2020.amount", "required|numeric")
            .field("budgets.2021.amount", "required"),
    )
    .unwrap();

    assert!(validator.fails());

    let errors = validator.errors();
    assert!(errors.get("budgets.2020.amount").is_empty());
    assert_eq!(errors.get("budgets.2021.amount").len(), 1);
    assert_eq!(
        errors.first("budgets.2021.amount").unwrap().kind,
        Violation::Missing
    );

    let validator = Validator::make(
        json!({"budgets": {"2020": {"amount": 100}}}),
        Rules::new().field("budgets.2020.amount", "required|numeric"),
    )
    .unwrap();
    // the subset keeps the record shape, not a padded list
    assert_eq!(
        validator.validate().unwrap(),
        json!({"budgets": {"2020": {"amount": 100}}})
    );
}

#[test]
fn test_validated_subset_keeps_nested_shape() {
    let validator = Validator::make(
        json!({
            "name": {"first": "Gleam", "last": "Budi"},
            "address": [
                {"street": "Jalan Durian", "city": "Jakarta"},
                {"street": "Jalan Manggis", "city": "Jakarta"}
            ],
            "extra": "dropped"
        }),
        Rules::new()
            .field("name.first", ["required", "max:100"])
            .field("address.*.city", ["required", "max:100"]),
    )
    .unwrap();

    let valid = validator.validate().unwrap();
    assert_eq!(
        valid,
        json!({
            "name": {"first": "Gleam"},
            "address": [{"city": "Jakarta"}, {"city": "Jakarta"}]
        })
    );
}
