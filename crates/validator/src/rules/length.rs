//! String length rules: `minLength`, `maxLength`
//!
//! Length is measured in bytes and both bounds are inclusive.

use serde_json::Value;

use super::{is_integer_str, required_param, violation};
use crate::error::RuleError;
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

fn check_length(
    rule: &'static str,
    key: &'static str,
    field: &str,
    value: &Value,
    param: Option<&str>,
    holds: fn(usize, usize) -> bool,
) -> Result<(), RuleError> {
    let param = required_param(rule, field, param)?;
    let limit = is_integer_str(param)
        .then(|| param.parse::<usize>().ok())
        .flatten();

    match (value.as_str(), limit) {
        (Some(text), Some(limit)) if holds(text.len(), limit) => Ok(()),
        _ => Err(violation(rule, key, field).with_arg(param).into()),
    }
}

/// Accepts strings of at least `param` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinLength;

impl Rule for MinLength {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        check_length("minlength", keys::MIN_LENGTH, field, value, param, |len, min| {
            len >= min
        })
    }
}

/// Accepts strings of at most `param` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLength;

impl Rule for MaxLength {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        check_length("maxlength", keys::MAX_LENGTH, field, value, param, |len, max| {
            len <= max
        })
    }
}
