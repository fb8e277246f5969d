//! Rule sets stored as documents
//!
//! A manifest keeps declarations and message overrides together so they can
//! live in configuration files:
//!
//! ```json
//! {
//!   "rules": { "id": ["required", "integer"], "email": "email" },
//!   "messages": { "email.email": "Please give us a real address." }
//! }
//! ```

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, ValidationError};
use crate::rule::RuleDeclaration;
use crate::validator::{Validator, ValidatorBuilder};

/// Declarations and message overrides read from a document.
///
/// Field order in `rules` is preserved, so validation order follows the
/// document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleManifest {
    /// Field to rule string or list of rule strings.
    #[serde(default)]
    pub rules: IndexMap<String, RuleDeclaration>,
    /// `"field.rule"` to message text.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl RuleManifest {
    /// Reads a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(text).map_err(|e| {
            ValidationError::configuration(ConfigError::InvalidParameter {
                rule: "manifest".to_string(),
                reason: e.to_string(),
            })
        })
    }

    /// Feeds the manifest into an existing builder.
    #[must_use]
    pub fn apply(self, builder: ValidatorBuilder) -> ValidatorBuilder {
        builder.rules(self.rules).messages(self.messages)
    }

    /// Builds a validator with the shared registry and English messages.
    pub fn into_validator(self) -> Result<Validator, ValidationError> {
        self.apply(Validator::builder()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const MANIFEST: &str = r#"{
        "rules": {
            "id": ["required", "integer"],
            "email": "email",
            "age": ["min:18"]
        },
        "messages": {"email.Email": "Please give us a real address."}
    }"#;

    #[test]
    fn test_preserves_declaration_order() {
        let manifest = RuleManifest::from_json(MANIFEST).unwrap();
        let validator = manifest.into_validator().unwrap();
        let fields: Vec<&str> = validator.rule_set().iter().map(|(f, _)| f).collect();
        assert_eq!(fields, ["id", "email", "age"]);
    }

    #[test]
    fn test_messages_apply() {
        let validator = RuleManifest::from_json(MANIFEST)
            .unwrap()
            .into_validator()
            .unwrap();
        let error = validator
            .validate(json!({"id": 1, "email": "nope"}))
            .unwrap_err();
        assert_eq!(error.message(), "Please give us a real address.");
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(RuleManifest::from_json(r#"{"rules": {"a": 3}}"#).is_err());
        assert!(RuleManifest::from_json(r#"{"rule": {}}"#).is_err());
        assert!(RuleManifest::from_json("{}").unwrap().rules.is_empty());
    }
}
