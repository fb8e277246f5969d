//! Built-in rules
//!
//! Every rule here is a zero-sized, stateless type implementing
//! [`Rule`](crate::registry::Rule). They are reached through the
//! [`RuleRegistry`](crate::registry::RuleRegistry) by their lower-case name.
//!
//! | Name | Parameter | Accepts |
//! |---|---|---|
//! | `integer` | `strict`? | integers, integer strings unless strict |
//! | `numeric` | `strict`? | numbers, numeric strings unless strict |
//! | `min` / `max` | number | numeric values within the inclusive bound |
//! | `minLength` / `maxLength` | integer | strings within the inclusive byte length |
//! | `email` | | address syntax |
//! | `regex` | pattern | strings matching the pattern |
//! | `datetime` | strftime format | strings that round-trip through the format |
//! | `enum` | set name | members of a registered [`EnumSet`](crate::registry::EnumSet) |
//! | `file` | MIME list? | uploaded-file descriptors |
//! | `string` / `boolean` / `array` | | values of that JSON type |
//! | `in` | comma list | one of the listed values |

mod content;
mod datetime;
mod enumeration;
mod file;
mod length;
mod numeric;
mod types;

pub use content::{Email, Regex};
pub use datetime::{DEFAULT_FORMAT, DateTime};
pub use enumeration::Enum;
pub use file::File;
pub use length::{MaxLength, MinLength};
pub use numeric::{Integer, Max, Min, Numeric};
pub use types::{Array, Boolean, In, StringType};

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::LazyLock;

use serde_json::Value;

use crate::error::{ConfigError, RuleError, Violation};

static NUMERIC_STRING: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$")
        .expect("numeric pattern is valid")
});

static INTEGER_STRING: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[+-]?\d+$").expect("integer pattern is valid"));

/// Builds the usual violation: message key with the field as first argument.
pub(crate) fn violation(
    rule: &'static str,
    key: impl Into<Cow<'static, str>>,
    field: &str,
) -> Violation {
    Violation::new(rule, key).with_arg(field)
}

/// Requires a parameter or reports a configuration error.
pub(crate) fn required_param<'p>(
    rule: &'static str,
    field: &str,
    param: Option<&'p str>,
) -> Result<&'p str, RuleError> {
    param.ok_or_else(|| {
        RuleError::Config(ConfigError::MissingParameter {
            field: field.to_string(),
            rule: rule.to_string(),
        })
    })
}

/// Returns true for strings shaped like a decimal or scientific number.
pub(crate) fn is_numeric_str(text: &str) -> bool {
    NUMERIC_STRING.is_match(text)
}

/// Returns true for strings shaped like a whole number.
pub(crate) fn is_integer_str(text: &str) -> bool {
    INTEGER_STRING.is_match(text)
}

/// A numeric operand. Whole numbers stay exact; everything else is `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    /// Parses a numeric string, keeping whole numbers that fit `i128` exact.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if is_integer_str(text) {
            if let Ok(n) = text.parse::<i128>() {
                return Some(Self::Int(n));
            }
        }
        is_numeric_str(text)
            .then(|| text.parse().ok().map(Self::Float))
            .flatten()
    }

    /// Compares two operands, exactly when both are whole numbers.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(f) => f,
        }
    }
}

/// Reads a native number or numeric string. Booleans never count.
pub(crate) fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| Number::Int(i.into()))
            .or_else(|| n.as_u64().map(|u| Number::Int(u.into())))
            .or_else(|| n.as_f64().map(Number::Float)),
        Value::String(s) => Number::parse(s),
        _ => None,
    }
}

/// Parses the `strict` flag accepted by `integer` and `numeric`.
pub(crate) fn strict_flag(rule: &'static str, param: Option<&str>) -> Result<bool, RuleError> {
    match param {
        None => Ok(false),
        Some(p) if p.eq_ignore_ascii_case("strict") => Ok(true),
        Some(other) => Err(RuleError::Config(ConfigError::InvalidParameter {
            rule: rule.to_string(),
            reason: format!("expected 'strict', found '{other}'"),
        })),
    }
}
