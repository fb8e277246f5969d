//! Date/time rule: `datetime`
//!
//! A value passes when it parses under the strftime-style format *and*
//! re-formatting the parsed value reproduces the input byte for byte. The
//! round trip rejects inputs the parser would otherwise tolerate, such as
//! missing zero padding or out-of-range components.

use std::fmt::Write as _;

use chrono::{DateTime as ZonedDateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use super::violation;
use crate::error::RuleError;
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

/// Format used when the rule has no parameter.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepts strings that round-trip through a format.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTime;

impl Rule for DateTime {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let format = param.unwrap_or(DEFAULT_FORMAT);

        if value.as_str().is_some_and(|text| round_trips(text, format)) {
            Ok(())
        } else {
            Err(violation("datetime", keys::DATETIME, field)
                .with_arg(format)
                .into())
        }
    }
}

/// Parses with the most specific type the format supports, then re-formats.
fn round_trips(text: &str, format: &str) -> bool {
    if let Ok(parsed) = ZonedDateTime::<FixedOffset>::parse_from_str(text, format) {
        return reformat(&parsed.format(format)).as_deref() == Some(text);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
        return reformat(&parsed.format(format)).as_deref() == Some(text);
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
        return reformat(&parsed.format(format)).as_deref() == Some(text);
    }
    if let Ok(parsed) = NaiveTime::parse_from_str(text, format) {
        return reformat(&parsed.format(format)).as_deref() == Some(text);
    }
    false
}

/// Renders a delayed format, `None` when the format cannot be rendered.
fn reformat(rendered: &impl std::fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{rendered}").ok()?;
    Some(out)
}
