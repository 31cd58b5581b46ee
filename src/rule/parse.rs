//! Parser for the text rule DSL.
//!
//! Chains split on `|`, rule parameters follow the first `:` and split on
//! `,` (except `regex:`, whose parameter is taken verbatim). Parsing is pure
//! and happens before any evaluation, so a malformed rule never gets halfway
//! through a record.

use regex::Regex;

use crate::error::RuleError;
use crate::registry::RuleRegistry;
use crate::rule::{ChainInput, ChainItem, NamedRule, RuleSpec};

/// Flattens chain input into parsed rule specs, in order.
pub(crate) fn parse_chain(
    input: &ChainInput,
    registry: Option<&RuleRegistry>,
) -> Result<Vec<RuleSpec>, RuleError> {
    let mut chain = Vec::new();
    for item in &input.0 {
        match item {
            ChainItem::Spec(spec) => chain.push(spec.clone()),
            ChainItem::Text(text) => {
                for token in text.split('|') {
                    chain.push(parse_token(token, registry)?);
                }
            }
        }
    }
    Ok(chain)
}

fn parse_token(token: &str, registry: Option<&RuleRegistry>) -> Result<RuleSpec, RuleError> {
    let token = token.trim();
    let (name, param) = match token.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (token, None),
    };

    let spec = match name {
        "bail" => RuleSpec::Named(NamedRule::Bail),
        "required" => RuleSpec::Named(NamedRule::Required),
        "email" => RuleSpec::Named(NamedRule::Email),
        "numeric" => RuleSpec::Named(NamedRule::Numeric),
        "min" => RuleSpec::Named(NamedRule::Min(parse_bound(name, param)?)),
        "max" => RuleSpec::Named(NamedRule::Max(parse_bound(name, param)?)),
        "in" => {
            let param = param.ok_or_else(|| RuleError::MissingParameter(name.to_string()))?;
            let options: Vec<String> = param.split(',').map(str::to_string).collect();
            RuleSpec::Named(NamedRule::OneOf(options))
        }
        "regex" => {
            let param = param.ok_or_else(|| RuleError::MissingParameter(name.to_string()))?;
            let regex = Regex::new(param).map_err(|source| RuleError::InvalidRegex {
                pattern: param.to_string(),
                source,
            })?;
            RuleSpec::Named(NamedRule::Pattern {
                regex,
                source: param.to_string(),
            })
        }
        _ => {
            let factory = registry
                .and_then(|r| r.get(name))
                .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
            let params: Vec<String> = match param {
                Some(param) => param.split(',').map(str::to_string).collect(),
                None => Vec::new(),
            };
            factory.as_ref()(&params)?
        }
    };
    Ok(spec)
}

fn parse_bound(rule: &str, param: Option<&str>) -> Result<f64, RuleError> {
    let param = param.ok_or_else(|| RuleError::MissingParameter(rule.to_string()))?;
    param
        .parse::<f64>()
        .map_err(|_| RuleError::InvalidParameter {
            rule: rule.to_string(),
            param: param.to_string(),
            reason: "not a number".to_string(),
        })
}
