//! Numeric rules: `integer`, `numeric`, `min`, `max`

use std::cmp::Ordering;

use serde_json::Value;

use super::{
    Number, as_number, is_integer_str, is_numeric_str, required_param, strict_flag, violation,
};
use crate::error::RuleError;
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

// ============================================================================
// INTEGER
// ============================================================================

/// Accepts whole numbers.
///
/// Without `strict`, integer-looking strings (`"42"`, `"-7"`) and floats
/// with no fractional part also pass. With `strict`, only native integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

impl Rule for Integer {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let strict = strict_flag("integer", param)?;
        let ok = match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => true,
            Value::Number(n) if !strict => n.as_f64().is_some_and(|f| f.fract() == 0.0),
            Value::String(s) if !strict => is_integer_str(s),
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(violation("integer", keys::INTEGER, field).into())
        }
    }
}

// ============================================================================
// NUMERIC
// ============================================================================

/// Accepts numbers; without `strict`, numeric strings too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

impl Rule for Numeric {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let strict = strict_flag("numeric", param)?;
        let ok = match value {
            Value::Number(_) => true,
            Value::String(s) if !strict => is_numeric_str(s),
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(violation("numeric", keys::NUMERIC, field).into())
        }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

fn check_bound(
    rule: &'static str,
    key: &'static str,
    field: &str,
    value: &Value,
    param: Option<&str>,
    holds: fn(Ordering) -> bool,
) -> Result<(), RuleError> {
    let param = required_param(rule, field, param)?;
    let bound = Number::parse(param);

    match (as_number(value), bound) {
        (Some(actual), Some(bound)) if actual.compare(bound).is_some_and(holds) => Ok(()),
        _ => Err(violation(rule, key, field).with_arg(param).into()),
    }
}

/// Inclusive lower bound: `value >= param`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Rule for Min {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        check_bound("min", keys::MIN, field, value, param, Ordering::is_ge)
    }
}

/// Inclusive upper bound: `value <= param`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Rule for Max {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        check_bound("max", keys::MAX, field, value, param, Ordering::is_le)
    }
}
