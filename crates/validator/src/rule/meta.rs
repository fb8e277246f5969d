//! Compiled rule representation
//!
//! A [`MetaRule`] is either a *standard* rule addressed by name (dispatched
//! through the [`RuleRegistry`](crate::registry::RuleRegistry)) or a
//! *custom* rule wrapping a caller-supplied predicate. Both are immutable and
//! cheap to clone, so a compiled rule set can serve any number of calls.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Outcome of a custom predicate.
///
/// Only an explicit failure rejects the value; anything else counts as a
/// pass. Predicates may return any type convertible into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The value is accepted.
    Pass,
    /// The value is rejected.
    Fail,
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok { Verdict::Pass } else { Verdict::Fail }
    }
}

impl From<()> for Verdict {
    fn from((): ()) -> Self {
        Verdict::Pass
    }
}

impl From<Option<bool>> for Verdict {
    fn from(outcome: Option<bool>) -> Self {
        match outcome {
            Some(false) => Verdict::Fail,
            _ => Verdict::Pass,
        }
    }
}

impl From<Value> for Verdict {
    fn from(outcome: Value) -> Self {
        match outcome {
            Value::Bool(false) => Verdict::Fail,
            _ => Verdict::Pass,
        }
    }
}

type Predicate = dyn Fn(&Value) -> Verdict + Send + Sync;

/// A user-supplied predicate wrapped as a rule.
#[derive(Clone)]
pub struct CustomRule {
    predicate: Arc<Predicate>,
}

impl CustomRule {
    /// Wraps a predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldcheck_validator::rule::{CustomRule, Verdict};
    /// use serde_json::json;
    ///
    /// let even = CustomRule::new(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
    /// assert_eq!(even.check(&json!(4)), Verdict::Pass);
    /// assert_eq!(even.check(&json!(3)), Verdict::Fail);
    /// ```
    pub fn new<F, R>(predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self {
            predicate: Arc::new(move |value| predicate(value).into()),
        }
    }

    /// Runs the predicate.
    #[must_use]
    pub fn check(&self, value: &Value) -> Verdict {
        (self.predicate)(value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("predicate", &"<function>")
            .finish()
    }
}

/// One compiled rule for one field.
#[derive(Debug, Clone)]
pub enum MetaRule {
    /// Built-in or registered rule dispatched by name.
    Standard {
        /// Name as declared.
        name: String,
        /// Optional parameter.
        param: Option<String>,
    },
    /// Caller-supplied predicate.
    Custom(CustomRule),
}

impl MetaRule {
    /// Creates a standard rule.
    pub fn standard(name: impl Into<String>, param: Option<String>) -> Self {
        MetaRule::Standard {
            name: name.into(),
            param,
        }
    }

    /// Declared name; custom rules report the empty string.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MetaRule::Standard { name, .. } => name,
            MetaRule::Custom(_) => "",
        }
    }

    /// Lower-cased name used for registry and message lookups.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// Declared parameter.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        match self {
            MetaRule::Standard { param, .. } => param.as_deref(),
            MetaRule::Custom(_) => None,
        }
    }

    /// Returns true if this standard rule has the given canonical name.
    #[must_use]
    pub fn is(&self, canonical: &str) -> bool {
        matches!(self, MetaRule::Standard { name, .. } if name.eq_ignore_ascii_case(canonical))
    }
}

impl From<CustomRule> for MetaRule {
    fn from(rule: CustomRule) -> Self {
        MetaRule::Custom(rule)
    }
}
