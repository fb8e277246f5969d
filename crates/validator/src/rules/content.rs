//! String content rules: `email`, `regex`

use std::borrow::Cow;
use std::sync::LazyLock;

use serde_json::Value;

use super::{required_param, violation};
use crate::error::RuleError;
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("email pattern is valid")
});

/// Longest address accepted (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

// ============================================================================
// EMAIL
// ============================================================================

/// Validates address syntax (WHATWG/HTML5 grammar, 254 byte limit).
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Rule for Email {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        _param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        match value.as_str() {
            Some(address) if address.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(address) => {
                Ok(())
            }
            _ => Err(violation("email", keys::EMAIL, field).into()),
        }
    }
}

// ============================================================================
// REGEX
// ============================================================================

/// Accepts strings matching the pattern given as parameter.
///
/// The pattern may be bare (`^\d+$`) or delimited with trailing flags
/// (`/^abc$/i`, flags from `imsxU`). A pattern that does not compile is a
/// plain non-match, never an internal error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Regex;

impl Rule for Regex {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let pattern = required_param("regex", field, param)?;

        let matched = value.as_str().is_some_and(|text| {
            match regex::Regex::new(&normalize_pattern(pattern)) {
                Ok(compiled) => compiled.is_match(text),
                Err(e) => {
                    tracing::debug!(field, error = %e, "Regex rule pattern does not compile");
                    false
                }
            }
        });

        if matched {
            Ok(())
        } else {
            Err(violation("regex", keys::REGEX, field).into())
        }
    }
}

/// Turns `/body/flags` into `(?flags)body`; bare patterns pass through.
fn normalize_pattern(pattern: &str) -> Cow<'_, str> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Cow::Borrowed(pattern);
    };
    let Some(close) = rest.rfind('/') else {
        return Cow::Borrowed(pattern);
    };

    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if !flags.chars().all(|c| "imsxU".contains(c)) {
        return Cow::Borrowed(pattern);
    }

    if flags.is_empty() {
        Cow::Owned(body.to_string())
    } else {
        Cow::Owned(format!("(?{flags}){body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use rstest::rstest;
    use serde_json::json;

    fn run(rule: &dyn Rule, value: Value, param: Option<&str>) -> Result<(), RuleError> {
        let registry = RuleRegistry::new();
        rule.validate("f", &value, param, &RuleContext::new(&registry))
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last+tag@sub.example.org", true)]
    #[case("invalid", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("user@-example.com", false)]
    fn test_email(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(run(&Email, json!(input), None).is_ok(), ok);
    }

    #[test]
    fn test_email_rejects_non_strings_and_long_addresses() {
        assert!(run(&Email, json!(42), None).is_err());
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(run(&Email, json!(long), None).is_err());
    }

    #[rstest]
    #[case(r"^\d{3}-\d{4}$", "123-4567", true)]
    #[case(r"^\d{3}-\d{4}$", "invalid", false)]
    #[case("/^abc$/i", "ABC", true)]
    #[case("/^abc$/", "ABC", false)]
    #[case("^a:b$", "a:b", true)]
    fn test_regex(#[case] pattern: &str, #[case] input: &str, #[case] ok: bool) {
        assert_eq!(run(&Regex, json!(input), Some(pattern)).is_ok(), ok);
    }

    #[test]
    fn test_broken_pattern_is_a_plain_mismatch() {
        let result = run(&Regex, json!("abc"), Some("(unclosed"));
        assert!(matches!(result, Err(RuleError::Violation(_))));
    }

    #[test]
    fn test_regex_rejects_non_strings() {
        assert!(run(&Regex, json!(123), Some(r"^\d+$")).is_err());
    }

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern("abc"), "abc");
        assert_eq!(normalize_pattern("/abc/"), "abc");
        assert_eq!(normalize_pattern("/abc/im"), "(?im)abc");
        assert_eq!(normalize_pattern("/a/b/zz"), "/a/b/zz");
    }
}
