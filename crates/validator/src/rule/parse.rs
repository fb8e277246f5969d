//! Rule string parsing
//!
//! The declaration mini-language is `name` or `name:param`. The separator is
//! the first `:`, so parameters may themselves contain colons
//! (`regex:^a:b$`, `datetime:%H:%M`).

use crate::error::ConfigError;

/// Separator between a rule name and its parameter.
pub const PARAM_SEPARATOR: char = ':';

/// A parsed rule string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedRule {
    /// Rule name, case preserved.
    pub name: String,
    /// Trimmed parameter, `None` when missing or blank.
    pub param: Option<String>,
}

/// Splits a rule string into its name and optional parameter.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::rule::parse;
///
/// let rule = parse(" min : 10 ").unwrap();
/// assert_eq!(rule.name, "min");
/// assert_eq!(rule.param.as_deref(), Some("10"));
///
/// assert_eq!(parse("required").unwrap().param, None);
/// assert!(parse("   ").is_err());
/// ```
pub fn parse(text: &str) -> Result<ParsedRule, ConfigError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConfigError::EmptyRule);
    }

    let (name, param) = match text.split_once(PARAM_SEPARATOR) {
        Some((name, param)) => (name.trim(), Some(param.trim())),
        None => (text, None),
    };

    if name.is_empty() {
        return Err(ConfigError::EmptyRule);
    }

    Ok(ParsedRule {
        name: name.to_string(),
        param: param.filter(|p| !p.is_empty()).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("min:10", "min", Some("10"))]
    #[case("required", "required", None)]
    #[case("  maxLength :  5  ", "maxLength", Some("5"))]
    #[case("integer:", "integer", None)]
    #[case("integer:   ", "integer", None)]
    #[case("regex:^a:b$", "regex", Some("^a:b$"))]
    #[case("datetime:%H:%M", "datetime", Some("%H:%M"))]
    fn test_parse(#[case] input: &str, #[case] name: &str, #[case] param: Option<&str>) {
        let parsed = parse(input).unwrap();
        assert_eq!(parsed.name, name);
        assert_eq!(parsed.param.as_deref(), param);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(":10")]
    #[case("  : x")]
    fn test_parse_empty(#[case] input: &str) {
        assert_eq!(parse(input), Err(ConfigError::EmptyRule));
    }
}
