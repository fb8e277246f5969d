//! Rule declarations and their compilation
//!
//! Callers describe rules per field as a [`RuleDeclaration`]: a rule string,
//! a predicate, or an ordered list mixing both. [`compile`] turns a set of
//! declarations into a [`CompiledRuleSet`], keeping declaration order for
//! fields and for rules within a field.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use super::meta::{CustomRule, MetaRule};
use super::parse::parse;
use crate::error::ConfigError;

// ============================================================================
// FIELD KEYS
// ============================================================================

/// A field name, dotted path, or positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(String);

impl FieldKey {
    /// Borrows the key as a path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&String> for FieldKey {
    fn from(key: &String) -> Self {
        Self(key.clone())
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// One declared rule: text in the mini-language, or a predicate.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// `"name"` or `"name:param"`.
    Text(String),
    /// Caller-supplied predicate.
    Predicate(CustomRule),
}

impl RuleSpec {
    /// Wraps a predicate closure.
    pub fn predicate<F, R>(predicate: F) -> Self
    where
        F: Fn(&serde_json::Value) -> R + Send + Sync + 'static,
        R: Into<super::meta::Verdict>,
    {
        RuleSpec::Predicate(CustomRule::new(predicate))
    }
}

impl From<&str> for RuleSpec {
    fn from(text: &str) -> Self {
        RuleSpec::Text(text.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(text: String) -> Self {
        RuleSpec::Text(text)
    }
}

impl From<CustomRule> for RuleSpec {
    fn from(rule: CustomRule) -> Self {
        RuleSpec::Predicate(rule)
    }
}

/// The ordered rules declared for a single field.
///
/// Deserializes from either a single string or an array of strings, so rule
/// sets can be loaded from JSON or TOML manifests.
#[derive(Debug, Clone, Default)]
pub struct RuleDeclaration(Vec<RuleSpec>);

impl RuleDeclaration {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn and(mut self, spec: impl Into<RuleSpec>) -> Self {
        self.0.push(spec.into());
        self
    }

    /// Declared rules in order.
    #[must_use]
    pub fn specs(&self) -> &[RuleSpec] {
        &self.0
    }
}

impl From<RuleSpec> for RuleDeclaration {
    fn from(spec: RuleSpec) -> Self {
        Self(vec![spec])
    }
}

impl From<&str> for RuleDeclaration {
    fn from(text: &str) -> Self {
        Self::from(RuleSpec::from(text))
    }
}

impl From<String> for RuleDeclaration {
    fn from(text: String) -> Self {
        Self::from(RuleSpec::from(text))
    }
}

impl From<CustomRule> for RuleDeclaration {
    fn from(rule: CustomRule) -> Self {
        Self::from(RuleSpec::from(rule))
    }
}

impl From<Vec<RuleSpec>> for RuleDeclaration {
    fn from(specs: Vec<RuleSpec>) -> Self {
        Self(specs)
    }
}

impl From<Vec<&str>> for RuleDeclaration {
    fn from(specs: Vec<&str>) -> Self {
        Self(specs.into_iter().map(RuleSpec::from).collect())
    }
}

impl From<Vec<String>> for RuleDeclaration {
    fn from(specs: Vec<String>) -> Self {
        Self(specs.into_iter().map(RuleSpec::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleDeclaration {
    fn from(specs: [&str; N]) -> Self {
        Self(specs.into_iter().map(RuleSpec::from).collect())
    }
}

impl FromIterator<RuleSpec> for RuleDeclaration {
    fn from_iter<I: IntoIterator<Item = RuleSpec>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for RuleDeclaration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(text) => RuleDeclaration::from(text),
            Raw::Many(texts) => RuleDeclaration::from(texts),
        })
    }
}

// ============================================================================
// COMPILED RULE SET
// ============================================================================

/// Field to ordered rules, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    fields: IndexMap<String, Vec<MetaRule>>,
}

impl CompiledRuleSet {
    /// Rules for one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[MetaRule]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterates fields and their rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetaRule])> {
        self.fields
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field has rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Compiles declarations into executable rules.
///
/// Predicates become [`MetaRule::Custom`]; rule strings are parsed into
/// [`MetaRule::Standard`]. Declaring the same field twice appends to its
/// rule list. No data is inspected here.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::rule::{compile, RuleDeclaration};
///
/// let set = compile([
///     ("id", RuleDeclaration::from(["required", "integer"])),
///     ("email", RuleDeclaration::from("email")),
/// ])
/// .unwrap();
///
/// let names: Vec<_> = set.iter().map(|(field, _)| field).collect();
/// assert_eq!(names, ["id", "email"]);
/// assert_eq!(set.get("id").unwrap()[1].name(), "integer");
/// ```
pub fn compile<I, K, D>(declarations: I) -> Result<CompiledRuleSet, ConfigError>
where
    I: IntoIterator<Item = (K, D)>,
    K: Into<FieldKey>,
    D: Into<RuleDeclaration>,
{
    let mut fields: IndexMap<String, Vec<MetaRule>> = IndexMap::new();

    for (key, declaration) in declarations {
        let FieldKey(field) = key.into();
        let declaration = declaration.into();
        let rules = fields.entry(field).or_default();

        for spec in declaration.0 {
            let rule = match spec {
                RuleSpec::Predicate(custom) => MetaRule::Custom(custom),
                RuleSpec::Text(text) => {
                    let parsed = parse(&text)?;
                    MetaRule::standard(parsed.name, parsed.param)
                }
            };
            rules.push(rule);
        }
    }

    Ok(CompiledRuleSet { fields })
}
