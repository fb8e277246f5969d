//! JSON type rules: `string`, `boolean`, `array`, and list membership `in`
//!
//! None of these coerce: `"true"` is not a boolean and `1` is not a string.

use std::cmp::Ordering;

use serde_json::Value;

use super::{Number, as_number, required_param, violation};
use crate::error::RuleError;
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

macro_rules! type_rule {
    ($(#[$meta:meta])* $name:ident, $rule:literal, $key:expr, $check:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Rule for $name {
            fn validate(
                &self,
                field: &str,
                value: &Value,
                _param: Option<&str>,
                _ctx: &RuleContext<'_>,
            ) -> Result<(), RuleError> {
                if $check(value) {
                    Ok(())
                } else {
                    Err(violation($rule, $key, field).into())
                }
            }
        }
    };
}

type_rule! {
    /// Accepts JSON strings.
    StringType, "string", keys::STRING, Value::is_string
}

type_rule! {
    /// Accepts JSON booleans.
    Boolean, "boolean", keys::BOOLEAN, Value::is_boolean
}

type_rule! {
    /// Accepts JSON arrays.
    Array, "array", keys::ARRAY, Value::is_array
}

/// Accepts one of a comma-separated list of literals.
///
/// Options are typed by their shape. A numeric option (`1`, `2.5`) matches
/// numbers of equal value, and any other option matches strings verbatim.
/// Quoting (`"1"`) makes a numeric-looking option match the string instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct In;

impl Rule for In {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let options = required_param("in", field, param)?;
        let found = options
            .split(',')
            .map(str::trim)
            .any(|option| matches_option(value, option));

        if found {
            Ok(())
        } else {
            Err(violation("in", keys::IN, field).with_arg(options).into())
        }
    }
}

fn matches_option(value: &Value, option: &str) -> bool {
    if let Some(quoted) = option
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return value.as_str() == Some(quoted);
    }

    match (value, Number::parse(option)) {
        (Value::Number(_), Some(expected)) => as_number(value)
            .and_then(|actual| actual.compare(expected))
            .is_some_and(Ordering::is_eq),
        (Value::String(s), None) => s == option,
        _ => false,
    }
}
