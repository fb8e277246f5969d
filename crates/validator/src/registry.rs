//! Rule registry for name-addressed rules
//!
//! The registry maps canonical (lower-case) rule names to shared, stateless
//! [`Rule`] instances. Built-ins are instantiated lazily the first time
//! they are resolved and then served from a read-mostly cache, so every
//! resolution of a name returns the same `Arc`.
//!
//! A process-wide instance is available through [`RuleRegistry::shared`];
//! isolated registries (for custom rules or enum sets scoped to one
//! validator) are created with [`RuleRegistry::new`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, RuleError};
use crate::rules;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A stateless validator addressed by name.
///
/// Implementations must be pure functions of their inputs; one instance is
/// shared by every field and every thread.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::error::{RuleError, Violation};
/// use fieldcheck_validator::registry::{Rule, RuleContext, RuleRegistry};
/// use serde_json::{Value, json};
///
/// #[derive(Debug)]
/// struct Uppercase;
///
/// impl Rule for Uppercase {
///     fn validate(
///         &self,
///         field: &str,
///         value: &Value,
///         _param: Option<&str>,
///         _ctx: &RuleContext<'_>,
///     ) -> Result<(), RuleError> {
///         match value.as_str() {
///             Some(s) if s.chars().all(|c| !c.is_lowercase()) => Ok(()),
///             _ => Err(Violation::new("uppercase", "validation.custom").with_arg(field).into()),
///         }
///     }
/// }
///
/// let registry = RuleRegistry::new();
/// registry.register("Uppercase", Uppercase);
/// assert!(registry.resolve("uppercase").is_some());
/// ```
pub trait Rule: Send + Sync + fmt::Debug {
    /// Checks `value` of `field` against the rule and its parameter.
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError>;
}

/// Read access to registry data rules may need while validating.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> RuleContext<'a> {
    /// Creates a context backed by `registry`.
    #[must_use]
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Looks up a registered enum set.
    #[must_use]
    pub fn enum_set(&self, name: &str) -> Option<EnumSet> {
        self.registry.enum_set(name)
    }
}

// ============================================================================
// ENUM SETS
// ============================================================================

/// How the members of an [`EnumSet`] are represented in payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumBacking {
    /// Members are case names; values must be strings.
    Name,
    /// Members carry string backing values.
    String,
    /// Members carry integer backing values; values must be integers.
    Integer,
}

/// A finite set of allowed values for the `enum` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSet {
    backing: EnumBacking,
    members: Vec<Value>,
}

impl EnumSet {
    /// A name-based set (`Red`, `Green`, ...).
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backing: EnumBacking::Name,
            members: names.into_iter().map(|s| Value::String(s.into())).collect(),
        }
    }

    /// A string-backed set.
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backing: EnumBacking::String,
            members: values.into_iter().map(|s| Value::String(s.into())).collect(),
        }
    }

    /// An integer-backed set.
    pub fn integers<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self {
            backing: EnumBacking::Integer,
            members: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Builds a set from the serialized form of Rust enum variants.
    ///
    /// Unit variants serialize to their names; `#[serde(rename)]` and
    /// integer representations are honoured. All members must serialize to
    /// the same kind (all strings or all integers).
    pub fn from_variants<I, T>(variants: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let invalid = |reason: String| ConfigError::InvalidParameter {
            rule: "enum".to_string(),
            reason,
        };

        let members = variants
            .into_iter()
            .map(|variant| serde_json::to_value(variant).map_err(|e| invalid(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let backing = if members.iter().all(Value::is_string) {
            EnumBacking::Name
        } else if members.iter().all(|m| m.is_i64() || m.is_u64()) {
            EnumBacking::Integer
        } else {
            return Err(invalid(
                "variants must all serialize to strings or to integers".to_string(),
            ));
        };

        Ok(Self { backing, members })
    }

    /// Declared backing type.
    #[must_use]
    pub fn backing(&self) -> EnumBacking {
        self.backing
    }

    /// Returns true if `value` has the backing type and is a member.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        let type_matches = match self.backing {
            EnumBacking::Name | EnumBacking::String => value.is_string(),
            EnumBacking::Integer => value.is_i64() || value.is_u64(),
        };
        type_matches && self.members.iter().any(|m| m == value)
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[Value] {
        &self.members
    }
}

// ============================================================================
// RULE REGISTRY
// ============================================================================

static SHARED: LazyLock<Arc<RuleRegistry>> = LazyLock::new(|| Arc::new(RuleRegistry::new()));

/// Flyweight cache of rule instances keyed by canonical name.
#[derive(Default)]
pub struct RuleRegistry {
    cache: RwLock<HashMap<String, Arc<dyn Rule>>>,
    enums: RwLock<HashMap<String, EnumSet>>,
}

impl RuleRegistry {
    /// Creates an isolated registry that knows the built-ins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn shared() -> Arc<RuleRegistry> {
        Arc::clone(&SHARED)
    }

    /// Resolves a rule by name, instantiating built-ins on first use.
    ///
    /// Returns `None` for names no rule answers to; callers decide whether
    /// that is an error.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Rule>> {
        let key = name.to_ascii_lowercase();

        if let Some(rule) = self.cache.read().get(&key) {
            return Some(Arc::clone(rule));
        }

        let fresh = instantiate(&key)?;
        let mut cache = self.cache.write();
        let rule = cache.entry(key).or_insert_with(|| {
            tracing::trace!(rule = name, "Instantiated built-in rule");
            fresh
        });
        Some(Arc::clone(rule))
    }

    /// Registers a rule under `name`, replacing any previous entry.
    pub fn register<R: Rule + 'static>(&self, name: &str, rule: R) {
        let key = name.to_ascii_lowercase();
        tracing::debug!(rule = %key, "Registered rule");
        self.cache.write().insert(key, Arc::new(rule));
    }

    /// Registers a finite value set for the `enum` rule.
    pub fn register_enum(&self, name: impl Into<String>, set: EnumSet) {
        self.enums.write().insert(name.into(), set);
    }

    /// Looks up a registered enum set.
    #[must_use]
    pub fn enum_set(&self, name: &str) -> Option<EnumSet> {
        self.enums.read().get(name).cloned()
    }

    /// Instantiates every built-in up front.
    pub fn warm(&self) {
        for name in BUILTINS {
            let _ = self.resolve(name);
        }
    }

    /// All names this registry answers to, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTINS.iter().map(|name| (*name).to_string()).collect();
        names.extend(self.cache.read().keys().cloned());
        names.sort();
        names.dedup();
        names
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("cached", &self.cache.read().len())
            .field("enums", &self.enums.read().len())
            .finish()
    }
}

const BUILTINS: &[&str] = &[
    "integer",
    "numeric",
    "min",
    "max",
    "minlength",
    "maxlength",
    "email",
    "regex",
    "datetime",
    "enum",
    "file",
    "string",
    "boolean",
    "array",
    "in",
];

fn instantiate(key: &str) -> Option<Arc<dyn Rule>> {
    let rule: Arc<dyn Rule> = match key {
        "integer" => Arc::new(rules::Integer),
        "numeric" => Arc::new(rules::Numeric),
        "min" => Arc::new(rules::Min),
        "max" => Arc::new(rules::Max),
        "minlength" => Arc::new(rules::MinLength),
        "maxlength" => Arc::new(rules::MaxLength),
        "email" => Arc::new(rules::Email),
        "regex" => Arc::new(rules::Regex),
        "datetime" => Arc::new(rules::DateTime),
        "enum" => Arc::new(rules::Enum),
        "file" => Arc::new(rules::File),
        "string" => Arc::new(rules::StringType),
        "boolean" => Arc::new(rules::Boolean),
        "array" => Arc::new(rules::Array),
        "in" => Arc::new(rules::In),
        _ => return None,
    };
    Some(rule)
}
