//! Validation orchestrator
//!
//! A [`Validator`] owns a compiled rule set, the custom message overrides,
//! the registry it dispatches standard rules through and the resolver that
//! renders messages. It is immutable once built and can be shared across
//! threads; each [`Validator::validate`] call creates its own
//! [`DataAccessor`].
//!
//! Validation is fail-fast: fields are visited in declaration order, and the
//! first violation ends the call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::Serialize;
use serde_json::Value;

use crate::accessor::DataAccessor;
use crate::error::{ConfigError, ErrorKind, RuleError, ValidationError, Violation};
use crate::message::{MessageCatalog, MessageResolver, keys};
use crate::registry::{RuleContext, RuleRegistry};
use crate::requirement::{RequirementEngine, RequirementError, Resolution};
use crate::rule::{CompiledRuleSet, FieldKey, MetaRule, RuleDeclaration, Verdict, compile};

static DEFAULT_RESOLVER: LazyLock<Arc<dyn MessageResolver>> =
    LazyLock::new(|| Arc::new(MessageCatalog::english()) as Arc<dyn MessageResolver>);

// ============================================================================
// CUSTOM MESSAGES
// ============================================================================

/// Per-field, per-rule message overrides keyed by `"field.rule"`.
///
/// The key splits at its last dot, so nested fields work
/// (`"address.city.maxLength"`). The rule part is matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CustomMessages {
    entries: HashMap<(String, String), String>,
}

impl CustomMessages {
    /// Creates an empty set of overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an override, rejecting keys without a field and a rule part.
    pub fn insert(
        &mut self,
        key: impl AsRef<str>,
        message: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let key = key.as_ref();
        let (field, rule) = key
            .rsplit_once('.')
            .filter(|(field, rule)| !field.is_empty() && !rule.is_empty())
            .ok_or_else(|| ConfigError::InvalidMessageKey(key.to_string()))?;

        self.entries.insert(
            (field.to_string(), rule.to_ascii_lowercase()),
            message.into(),
        );
        Ok(())
    }

    /// Override for `rule` on `field`.
    #[must_use]
    pub fn get(&self, field: &str, rule: &str) -> Option<&str> {
        // Avoids allocating when there are no overrides at all.
        if self.entries.is_empty() {
            return None;
        }
        self.entries
            .get(&(field.to_string(), rule.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Compiled, reusable validator.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::{ErrorKind, Validator};
/// use serde_json::json;
///
/// let validator = Validator::builder()
///     .rule("id", ["required", "integer"])
///     .rule("email", ["required", "email"])
///     .message("email.email", "Please give us a real address.")
///     .build()
///     .unwrap();
///
/// let data = validator.validate(json!({"id": 7, "email": "a@b.com"})).unwrap();
/// assert_eq!(data.field("id").unwrap(), &json!(7));
///
/// let error = validator.validate(json!({"id": 7, "email": "nope"})).unwrap_err();
/// assert_eq!(error.kind(), ErrorKind::Rule);
/// assert_eq!(error.message(), "Please give us a real address.");
/// assert_eq!(error.status(), 400);
/// ```
#[derive(Clone)]
pub struct Validator {
    rules: CompiledRuleSet,
    messages: CustomMessages,
    registry: Arc<RuleRegistry>,
    resolver: Arc<dyn MessageResolver>,
}

impl Validator {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Compiles `declarations` with the shared registry and English messages.
    pub fn new<I, K, D>(declarations: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<FieldKey>,
        D: Into<RuleDeclaration>,
    {
        Self::builder().rules(declarations).build()
    }

    /// Compiled rules in declaration order.
    #[must_use]
    pub fn rule_set(&self) -> &CompiledRuleSet {
        &self.rules
    }

    /// Registry standard rules are dispatched through.
    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Validates a payload, handing it back wrapped in an accessor.
    pub fn validate(&self, payload: impl Into<Value>) -> Result<DataAccessor, ValidationError> {
        let data = DataAccessor::new(payload.into());
        let engine = RequirementEngine::new(&data);
        let ctx = RuleContext::new(&self.registry);

        for (field, rules) in self.rules.iter() {
            let (value, remaining) = match engine.resolve(field, rules) {
                Ok(Resolution::Proceed { value, rules }) => (value, rules),
                Ok(Resolution::Skip(state)) => {
                    tracing::debug!(field, ?state, "Skipping field");
                    continue;
                }
                Err(RequirementError::Violated { state, violation }) => {
                    tracing::debug!(field, ?state, "Presence check failed");
                    return Err(self.reject(ErrorKind::Requirement, field, violation));
                }
                Err(RequirementError::Config(error)) => {
                    return Err(misconfigured(field, error));
                }
            };

            for rule in remaining {
                self.check_rule(field, value, rule, &ctx)?;
            }
            tracing::debug!(field, "Field passed");
        }

        Ok(data)
    }

    /// Serializes `payload` to JSON and validates it.
    pub fn validate_serialize<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<DataAccessor, ValidationError> {
        let value = serde_json::to_value(payload).map_err(|e| {
            ValidationError::new(ErrorKind::Configuration, "payload", "payload is not serializable")
                .with_source(e)
        })?;
        self.validate(value)
    }

    fn check_rule(
        &self,
        field: &str,
        value: &Value,
        rule: &MetaRule,
        ctx: &RuleContext<'_>,
    ) -> Result<(), ValidationError> {
        match rule {
            MetaRule::Custom(custom) => {
                tracing::trace!(field, "Running custom rule");
                match custom.check(value) {
                    Verdict::Pass => Ok(()),
                    Verdict::Fail => Err(self.reject(
                        ErrorKind::Rule,
                        field,
                        Violation::new("", keys::CUSTOM).with_arg(field),
                    )),
                }
            }
            MetaRule::Standard { name, param } => {
                tracing::trace!(field, rule = %name, "Dispatching rule");
                let Some(handler) = self.registry.resolve(name) else {
                    return Err(misconfigured(
                        field,
                        ConfigError::UnknownRule {
                            field: field.to_string(),
                            rule: name.clone(),
                        },
                    ));
                };

                match handler.validate(field, value, param.as_deref(), ctx) {
                    Ok(()) => Ok(()),
                    Err(RuleError::Violation(mut violation)) => {
                        // Overrides and codes follow the declared name, even
                        // when the handler was registered under an alias.
                        violation.rule = rule.canonical_name().into();
                        Err(self.reject(ErrorKind::Rule, field, violation))
                    }
                    Err(RuleError::Config(error)) => Err(misconfigured(field, error)),
                }
            }
        }
    }

    /// Turns a violation into the surfaced error, applying overrides.
    fn reject(&self, kind: ErrorKind, field: &str, violation: Violation) -> ValidationError {
        let Violation { rule, key, args } = violation;

        // Custom predicates have no name and cannot be targeted by overrides.
        let overridden = if rule.is_empty() {
            None
        } else {
            self.messages.get(field, &rule)
        };

        let message = match overridden {
            Some(text) => text.to_string(),
            None => match self.resolver.get(&key, &args) {
                Ok(text) => text,
                Err(error) => {
                    tracing::warn!(field, key = %key, %error, "Message could not be resolved");
                    return ValidationError::new(
                        ErrorKind::Configuration,
                        "configuration",
                        error.to_string(),
                    )
                    .with_field(field)
                    .with_source(error);
                }
            },
        };

        let code = if rule.is_empty() { "custom".into() } else { rule };
        let error = ValidationError::new(kind, code, message).with_field(field);
        // The first argument is always the field itself.
        args.into_iter()
            .skip(1)
            .fold(error, |error, param| error.with_param(param))
    }
}

fn misconfigured(field: &str, error: ConfigError) -> ValidationError {
    tracing::warn!(field, %error, "Invalid rule configuration");
    ValidationError::configuration(error).with_field(field)
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("messages", &self.messages)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
///
/// Declarations and message keys are collected as given and checked
/// together in [`build`](Self::build).
#[derive(Default)]
pub struct ValidatorBuilder {
    declarations: Vec<(FieldKey, RuleDeclaration)>,
    messages: Vec<(String, String)>,
    registry: Option<Arc<RuleRegistry>>,
    resolver: Option<Arc<dyn MessageResolver>>,
}

impl ValidatorBuilder {
    /// Declares rules for one field. Repeating a field appends.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, field: impl Into<FieldKey>, rules: impl Into<RuleDeclaration>) -> Self {
        self.declarations.push((field.into(), rules.into()));
        self
    }

    /// Declares rules for many fields.
    #[must_use = "builder methods must be chained or built"]
    pub fn rules<I, K, D>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<FieldKey>,
        D: Into<RuleDeclaration>,
    {
        self.declarations.extend(
            declarations
                .into_iter()
                .map(|(field, rules)| (field.into(), rules.into())),
        );
        self
    }

    /// Overrides the message for `"field.rule"`.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.push((key.into(), text.into()));
        self
    }

    /// Adds many message overrides.
    #[must_use = "builder methods must be chained or built"]
    pub fn messages<I, K, V>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Dispatches through `registry` instead of the shared one.
    #[must_use = "builder methods must be chained or built"]
    pub fn registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Renders messages with `resolver` instead of the English catalog.
    #[must_use = "builder methods must be chained or built"]
    pub fn resolver(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Compiles the declarations and message keys.
    pub fn build(self) -> Result<Validator, ValidationError> {
        let rules = compile(self.declarations).map_err(|error| {
            tracing::warn!(%error, "Rule declarations do not compile");
            ValidationError::configuration(error)
        })?;

        let mut messages = CustomMessages::new();
        for (key, text) in self.messages {
            messages.insert(&key, text)?;
        }

        tracing::debug!(
            fields = rules.len(),
            overrides = messages.len(),
            "Validator built"
        );

        Ok(Validator {
            rules,
            messages,
            registry: self.registry.unwrap_or_else(RuleRegistry::shared),
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::clone(&DEFAULT_RESOLVER)),
        })
    }
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBuilder")
            .field("declarations", &self.declarations)
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageError;
    use crate::rule::CustomRule;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::error::Error as _;

    #[test]
    fn test_custom_message_keys() {
        let mut messages = CustomMessages::new();
        messages.insert("email.Email", "bad").unwrap();
        messages.insert("address.city.maxLength", "too long").unwrap();

        assert_eq!(messages.get("email", "email"), Some("bad"));
        assert_eq!(messages.get("address.city", "maxlength"), Some("too long"));
        assert_eq!(messages.get("email", "min"), None);

        for key in ["email", ".email", "email.", ""] {
            assert!(matches!(
                messages.insert(key, "x"),
                Err(ConfigError::InvalidMessageKey(_))
            ));
        }
    }

    #[test]
    fn test_invalid_message_key_fails_build() {
        let error = Validator::builder()
            .rule("a", "integer")
            .message("nodot", "x")
            .build()
            .unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_empty_rule_fails_build() {
        let error = Validator::new([("a", ["integer", "  "])]).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_error_carries_field_rule_and_params() {
        let validator = Validator::new([("age", "min:18")]).unwrap();
        let error = validator.validate(json!({"age": 12})).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Rule);
        assert_eq!(error.code(), "min");
        assert_eq!(error.field(), Some("age"));
        assert_eq!(error.params(), ["18".to_string()]);
        assert_eq!(error.message(), "The age field must be at least 18.");
    }

    #[test]
    fn test_custom_predicate_is_not_overridable() {
        let validator = Validator::builder()
            .rule("n", CustomRule::new(|v: &Value| v.as_i64() == Some(1)))
            .message("n.", "never used")
            .build();
        // "n." has an empty rule part, so it is rejected outright.
        assert!(validator.is_err());

        let validator = Validator::builder()
            .rule("n", CustomRule::new(|v: &Value| v.as_i64() == Some(1)))
            .message("n.custom", "not used either")
            .build()
            .unwrap();
        let error = validator.validate(json!({"n": 2})).unwrap_err();
        assert_eq!(error.code(), "custom");
        assert_eq!(error.message(), "The n field is invalid.");
    }

    #[test]
    fn test_unresolvable_message_is_configuration_error() {
        let validator = Validator::builder()
            .rule("a", "integer")
            .resolver(Arc::new(MessageCatalog::empty("en")))
            .build()
            .unwrap();

        let error = validator.validate(json!({"a": "x"})).unwrap_err();
        assert!(error.is_configuration());
        assert_eq!(error.status(), 400);
        let source = error.source().unwrap();
        assert!(source.downcast_ref::<MessageError>().is_some());
    }

    #[test]
    fn test_override_wins_over_broken_resolver() {
        let validator = Validator::builder()
            .rule("a", "integer")
            .message("a.integer", "whole numbers only")
            .resolver(Arc::new(MessageCatalog::empty("en")))
            .build()
            .unwrap();

        let error = validator.validate(json!({"a": "x"})).unwrap_err();
        assert_eq!(error.message(), "whole numbers only");
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }
}
