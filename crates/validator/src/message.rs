//! Message resolution
//!
//! Rules report failures as message keys plus positional arguments. The
//! validator turns them into text through a [`MessageResolver`], so final
//! user-facing strings can be localized without touching the rules.
//!
//! [`MessageCatalog`] is the bundled resolver: per-locale tables of
//! templates with `{0}`, `{1}`, ... placeholders, seeded with English text
//! for every built-in key.

use std::collections::HashMap;

use serde_json::Value;

/// Message keys used by the engine.
pub mod keys {
    pub const REQUIRED: &str = "validation.required";
    pub const REQUIRED_WITHOUT_EXCLUSIVE: &str = "validation.required_without.exclusive";
    pub const REQUIRED_WITHOUT_MISSING: &str = "validation.required_without.missing";
    pub const INTEGER: &str = "validation.integer";
    pub const NUMERIC: &str = "validation.numeric";
    pub const MIN: &str = "validation.min";
    pub const MAX: &str = "validation.max";
    pub const MIN_LENGTH: &str = "validation.min_length";
    pub const MAX_LENGTH: &str = "validation.max_length";
    pub const EMAIL: &str = "validation.email";
    pub const REGEX: &str = "validation.regex";
    pub const DATETIME: &str = "validation.datetime";
    pub const ENUM: &str = "validation.enum";
    pub const STRING: &str = "validation.string";
    pub const BOOLEAN: &str = "validation.boolean";
    pub const ARRAY: &str = "validation.array";
    pub const IN: &str = "validation.in";
    pub const FILE: &str = "validation.file";
    pub const FILE_MIME: &str = "validation.file.mime";
    pub const FILE_UPLOAD_ERROR: &str = "validation.file.upload_error";
    pub const CUSTOM: &str = "validation.custom";
}

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

const ENGLISH: &[(&str, &str)] = &[
    (keys::REQUIRED, "The {0} field is required."),
    (
        keys::REQUIRED_WITHOUT_EXCLUSIVE,
        "The {0} field must not be present together with {1}.",
    ),
    (
        keys::REQUIRED_WITHOUT_MISSING,
        "The {0} field is required when {1} is not present.",
    ),
    (keys::INTEGER, "The {0} field must be an integer."),
    (keys::NUMERIC, "The {0} field must be a number."),
    (keys::MIN, "The {0} field must be at least {1}."),
    (keys::MAX, "The {0} field must not be greater than {1}."),
    (keys::MIN_LENGTH, "The {0} field must be at least {1} bytes long."),
    (keys::MAX_LENGTH, "The {0} field must not be longer than {1} bytes."),
    (keys::EMAIL, "The {0} field must be a valid email address."),
    (keys::REGEX, "The {0} field format is invalid."),
    (keys::DATETIME, "The {0} field must match the format {1}."),
    (keys::ENUM, "The {0} field must be one of the {1} values."),
    (keys::STRING, "The {0} field must be a string."),
    (keys::BOOLEAN, "The {0} field must be true or false."),
    (keys::ARRAY, "The {0} field must be a list."),
    (keys::IN, "The {0} field must be one of: {1}."),
    (keys::FILE, "The {0} field must be an uploaded file."),
    (keys::FILE_MIME, "The {0} field must be a file of type: {1}."),
    (
        "validation.file.upload_error.1",
        "The {0} file exceeds the server upload size limit.",
    ),
    (
        "validation.file.upload_error.2",
        "The {0} file exceeds the form upload size limit.",
    ),
    (
        "validation.file.upload_error.3",
        "The {0} file was only partially uploaded.",
    ),
    ("validation.file.upload_error.4", "No file was uploaded for {0}."),
    (
        "validation.file.upload_error.6",
        "The {0} file could not be stored: missing temporary folder.",
    ),
    (
        "validation.file.upload_error.7",
        "The {0} file could not be written to disk.",
    ),
    (
        "validation.file.upload_error.8",
        "The {0} file upload was stopped by an extension.",
    ),
    (
        "validation.file.upload_error.unknown",
        "The {0} file failed to upload (error {1}).",
    ),
    (keys::CUSTOM, "The {0} field is invalid."),
];

/// Errors raised by a [`MessageResolver`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// The active locale has no table.
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    /// No template for the key in the active (or fallback) locale.
    #[error("no message '{key}' for locale '{locale}'")]
    UnknownKey {
        /// Requested key.
        key: String,
        /// Active locale.
        locale: String,
    },

    /// A catalog document could not be read.
    #[error("invalid message catalog: {0}")]
    InvalidCatalog(String),
}

/// Maps a message key and positional arguments to display text.
pub trait MessageResolver: Send + Sync {
    /// Renders `key` with `args`.
    fn get(&self, key: &str, args: &[String]) -> Result<String, MessageError>;
}

/// Per-locale template tables.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::message::{MessageCatalog, MessageResolver};
///
/// let catalog = MessageCatalog::english()
///     .merge_json("fr", r#"{"validation": {"required": "Le champ {0} est requis."}}"#)
///     .unwrap()
///     .with_locale("fr");
///
/// let text = catalog.get("validation.required", &["nom".to_string()]).unwrap();
/// assert_eq!(text, "Le champ nom est requis.");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    tables: HashMap<String, HashMap<String, String>>,
    locale: String,
    fallback: Option<String>,
}

impl MessageCatalog {
    /// Creates a catalog with no tables.
    #[must_use]
    pub fn empty(locale: impl Into<String>) -> Self {
        Self {
            tables: HashMap::new(),
            locale: locale.into(),
            fallback: None,
        }
    }

    /// Creates a catalog seeded with the English built-in messages.
    #[must_use]
    pub fn english() -> Self {
        let table = ENGLISH
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut catalog = Self::empty(DEFAULT_LOCALE);
        catalog.tables.insert(DEFAULT_LOCALE.to_string(), table);
        catalog
    }

    /// Switches the active locale.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets a locale consulted when the active one lacks a key.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_fallback(mut self, locale: impl Into<String>) -> Self {
        self.fallback = Some(locale.into());
        self
    }

    /// Adds or replaces one template.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.tables
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// Merges a JSON document into `locale`.
    ///
    /// Nested objects are flattened with dots, so
    /// `{"validation": {"min": "..."}}` defines `validation.min`.
    pub fn merge_json(mut self, locale: impl Into<String>, text: &str) -> Result<Self, MessageError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| MessageError::InvalidCatalog(e.to_string()))?;
        let Value::Object(_) = document else {
            return Err(MessageError::InvalidCatalog(
                "top level must be an object".to_string(),
            ));
        };

        let table = self.tables.entry(locale.into()).or_default();
        flatten(&document, String::new(), table)?;
        Ok(self)
    }

    /// Active locale.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn template(&self, key: &str) -> Result<&str, MessageError> {
        let active = self.tables.get(&self.locale);
        let fallback = self
            .fallback
            .as_ref()
            .and_then(|fallback| self.tables.get(fallback));

        if active.is_none() && fallback.is_none() {
            return Err(MessageError::UnknownLocale(self.locale.clone()));
        }

        active
            .and_then(|table| table.get(key))
            .or_else(|| fallback.and_then(|table| table.get(key)))
            .map(String::as_str)
            .ok_or_else(|| MessageError::UnknownKey {
                key: key.to_string(),
                locale: self.locale.clone(),
            })
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl MessageResolver for MessageCatalog {
    fn get(&self, key: &str, args: &[String]) -> Result<String, MessageError> {
        Ok(render(self.template(key)?, args))
    }
}

fn flatten(
    value: &Value,
    prefix: String,
    table: &mut HashMap<String, String>,
) -> Result<(), MessageError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, path, table)?;
            }
            Ok(())
        }
        Value::String(template) => {
            table.insert(prefix, template.clone());
            Ok(())
        }
        other => Err(MessageError::InvalidCatalog(format!(
            "'{prefix}' must be a string or an object, found {other}"
        ))),
    }
}

/// Substitutes `{n}` placeholders; unknown placeholders are kept verbatim.
fn render(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index = after[..close].parse::<usize>().ok()?;
            Some((args.get(index)?, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_render_positional() {
        assert_eq!(render("{0} >= {1}", &args(&["age", "18"])), "age >= 18");
        assert_eq!(render("{1}{0}", &args(&["a", "b"])), "ba");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        assert_eq!(render("{2} {x} {", &args(&["a"])), "{2} {x} {");
    }

    #[test]
    fn test_english_covers_builtin_keys() {
        let catalog = MessageCatalog::english();
        for key in [keys::REQUIRED, keys::MIN, keys::EMAIL, keys::CUSTOM] {
            assert!(catalog.get(key, &args(&["f", "1"])).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_unknown_key() {
        let catalog = MessageCatalog::english();
        assert_eq!(
            catalog.get("nope", &[]),
            Err(MessageError::UnknownKey {
                key: "nope".to_string(),
                locale: "en".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_locale() {
        let catalog = MessageCatalog::english().with_locale("de");
        assert_eq!(
            catalog.get(keys::REQUIRED, &[]),
            Err(MessageError::UnknownLocale("de".to_string()))
        );
    }

    #[test]
    fn test_fallback_locale() {
        let catalog = MessageCatalog::english()
            .with_message("de", keys::REQUIRED, "{0} fehlt.")
            .with_locale("de")
            .with_fallback("en");
        assert_eq!(catalog.get(keys::REQUIRED, &args(&["x"])).unwrap(), "x fehlt.");
        assert_eq!(
            catalog.get(keys::EMAIL, &args(&["x"])).unwrap(),
            "The x field must be a valid email address."
        );
    }

    #[test]
    fn test_missing_locale_uses_fallback() {
        let catalog = MessageCatalog::english().with_locale("de").with_fallback("en");
        assert_eq!(
            catalog.get(keys::REQUIRED, &args(&["x"])).unwrap(),
            "The x field is required."
        );
    }

    #[test]
    fn test_merge_json_rejects_non_strings() {
        let result = MessageCatalog::english().merge_json("en", r#"{"validation": {"min": 3}}"#);
        assert!(matches!(result, Err(MessageError::InvalidCatalog(_))));
        let result = MessageCatalog::english().merge_json("en", "[]");
        assert!(matches!(result, Err(MessageError::InvalidCatalog(_))));
    }
}
