//! Error types for validation failures
//!
//! The engine surfaces exactly one error type to callers, [`ValidationError`].
//! It carries the (possibly overridden) message, an [`ErrorKind`], the
//! conventional "bad request" status, the failing field and rule, and an
//! optional chained cause.
//!
//! Lower layers use small `thiserror` enums ([`ConfigError`], [`RuleError`])
//! and the message-key based [`Violation`], which the validator renders
//! through a [`MessageResolver`](crate::message::MessageResolver).

use std::borrow::Cow;
use std::fmt;

// ============================================================================
// STATUS CODE
// ============================================================================

/// Status attached to every [`ValidationError`] (HTTP 400 Bad Request).
pub const BAD_REQUEST: u16 = 400;

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// A mistake in the rule declarations rather than in the payload.
///
/// These indicate a programming error and should surface during development.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A rule string was empty after trimming, or had no name.
    #[error("rule declaration is empty")]
    EmptyRule,

    /// A rule that requires a parameter was declared without one.
    #[error("rule '{rule}' on field '{field}' requires a parameter")]
    MissingParameter {
        /// Field the rule is declared on.
        field: String,
        /// Rule name as declared.
        rule: String,
    },

    /// A standard rule name that the registry does not know.
    #[error("unknown rule '{rule}' on field '{field}'")]
    UnknownRule {
        /// Field the rule is declared on.
        field: String,
        /// Rule name as declared.
        rule: String,
    },

    /// A rule parameter that cannot be interpreted.
    #[error("invalid parameter for rule '{rule}': {reason}")]
    InvalidParameter {
        /// Rule name.
        rule: String,
        /// Why the parameter was rejected.
        reason: String,
    },

    /// A custom message key without the `field.rule` shape.
    #[error("custom message key '{0}' must have the form 'field.rule'")]
    InvalidMessageKey(String),
}

// ============================================================================
// VIOLATIONS
// ============================================================================

/// A rejected value, expressed as a message key plus positional arguments.
///
/// The final text is produced later by the validator, so rules never
/// hardcode user-facing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Canonical (lower-case) rule name, empty for custom predicates.
    pub rule: Cow<'static, str>,
    /// Message key resolved through the message service.
    pub key: Cow<'static, str>,
    /// Positional arguments for the message template.
    pub args: Vec<String>,
}

impl Violation {
    /// Creates a violation for `rule` rendered from `key`.
    pub fn new(rule: impl Into<Cow<'static, str>>, key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            rule: rule.into(),
            key: key.into(),
            args: Vec::new(),
        }
    }

    /// Appends a positional message argument.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Failure produced by a single rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The value does not satisfy the rule.
    #[error("value rejected by rule '{}'", .0.rule)]
    Violation(Violation),

    /// The rule itself is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<Violation> for RuleError {
    fn from(violation: Violation) -> Self {
        Self::Violation(violation)
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed declarations, unknown rules, unresolvable messages.
    Configuration,
    /// `required` or `requiredWithout` failed.
    Requirement,
    /// A built-in or custom rule rejected the value.
    Rule,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Requirement => "requirement",
            ErrorKind::Rule => "rule",
        })
    }
}

/// The single error surfaced by [`Validator::validate`](crate::Validator::validate).
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::{ErrorKind, ValidationError};
///
/// let error = ValidationError::new(ErrorKind::Rule, "min", "Too small")
///     .with_field("age")
///     .with_param("10");
///
/// assert_eq!(error.status(), 400);
/// assert_eq!(error.field(), Some("age"));
/// ```
#[derive(Debug)]
pub struct ValidationError {
    kind: ErrorKind,
    code: Cow<'static, str>,
    message: String,
    field: Option<String>,
    params: Vec<String>,
    status: u16,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ValidationError {
    /// Creates a new error with a kind, a rule code and a message.
    pub fn new(
        kind: ErrorKind,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            field: None,
            params: Vec::new(),
            status: BAD_REQUEST,
            source: None,
        }
    }

    /// Wraps a configuration error, keeping it as the cause.
    pub fn configuration(error: ConfigError) -> Self {
        Self::new(ErrorKind::Configuration, "configuration", error.to_string()).with_source(error)
    }

    /// Sets the field path for this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Appends a positional message parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Chains the originating low-level error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Replaces the message, keeping everything else.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Canonical rule name, or `"configuration"`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable, possibly localized or overridden, message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Positional message parameters.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Numeric status, always [`BAD_REQUEST`].
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for declaration mistakes.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind == ErrorKind::Configuration
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<ConfigError> for ValidationError {
    fn from(error: ConfigError) -> Self {
        Self::configuration(error)
    }
}

// ============================================================================
// TESTS
// ============================================================================
