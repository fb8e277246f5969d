//! Field presence resolution
//!
//! Before any value rule runs, each field goes through a small decision
//! procedure driven by the presence pseudo-rules:
//!
//! - `required`: the field must be present,
//! - `requiredWithout:other[,other...]`: exactly one of the field and the
//!   listed fields may be present,
//! - `nullable`: a present `null` skips the remaining rules.
//!
//! Presence is decided first, on the raw payload (a present `null` counts as
//! present). Only then does `nullable` look at the value.

use serde_json::Value;

use crate::accessor::DataAccessor;
use crate::error::{ConfigError, Violation};
use crate::message::keys;
use crate::rule::MetaRule;

/// Canonical name of the `required` pseudo-rule.
pub const REQUIRED: &str = "required";
/// Canonical name of the `requiredWithout` pseudo-rule.
pub const REQUIRED_WITHOUT: &str = "requiredwithout";
/// Canonical name of the `nullable` pseudo-rule.
pub const NULLABLE: &str = "nullable";

/// Returns true for rule names handled here rather than by the registry.
#[must_use]
pub fn is_presence_rule(name: &str) -> bool {
    [REQUIRED, REQUIRED_WITHOUT, NULLABLE]
        .iter()
        .any(|pseudo| name.eq_ignore_ascii_case(pseudo))
}

// ============================================================================
// CONSTRAINTS
// ============================================================================

/// Presence constraints derived from one field's rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRequirementConstraints {
    /// A `required` rule is declared.
    pub is_required: bool,
    /// Fields named by every `requiredWithout` rule, in declaration order.
    pub required_without: Vec<String>,
    /// A `nullable` rule is declared.
    pub is_nullable: bool,
}

impl FieldRequirementConstraints {
    /// Scans `rules` for presence pseudo-rules.
    pub fn derive(field: &str, rules: &[MetaRule]) -> Result<Self, ConfigError> {
        let mut constraints = Self::default();

        for rule in rules {
            if rule.is(REQUIRED) {
                constraints.is_required = true;
            } else if rule.is(REQUIRED_WITHOUT) {
                let missing = || ConfigError::MissingParameter {
                    field: field.to_string(),
                    rule: rule.name().to_string(),
                };
                let others: Vec<String> = rule
                    .param()
                    .ok_or_else(missing)?
                    .split(',')
                    .map(str::trim)
                    .filter(|other| !other.is_empty())
                    .map(str::to_string)
                    .collect();
                if others.is_empty() {
                    return Err(missing());
                }
                constraints.required_without.extend(others);
            } else if rule.is(NULLABLE) {
                constraints.is_nullable = true;
            }
        }

        Ok(constraints)
    }
}

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Where a field ended up in the presence decision.
///
/// Every state except [`ProceedToValueRules`](Self::ProceedToValueRules) is
/// terminal for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementState {
    /// Not evaluated yet.
    Unevaluated,
    /// `required` and absent.
    RequiredFailed,
    /// `requiredWithout` presence rule broken.
    RequiredWithoutFailed,
    /// Absent and allowed to be; nothing else runs.
    SkipDueToAbsence,
    /// Present `null` with `nullable`; nothing else runs.
    SkipDueToNullable,
    /// Present; value rules run next.
    ProceedToValueRules,
}

impl RequirementState {
    /// Returns true if value rules must not run.
    #[must_use]
    pub fn should_skip_further_validation(self) -> bool {
        !matches!(self, RequirementState::ProceedToValueRules)
    }
}

/// Result of resolving one field.
#[derive(Debug)]
pub enum Resolution<'r, 'v> {
    /// Nothing more to check for this field.
    Skip(RequirementState),
    /// Run `rules` against `value`.
    Proceed {
        /// The present value (may be `null` when not nullable).
        value: &'v Value,
        /// Remaining rules, presence pseudo-rules removed.
        rules: Vec<&'r MetaRule>,
    },
}

impl Resolution<'_, '_> {
    /// Final state of the field.
    #[must_use]
    pub fn state(&self) -> RequirementState {
        match self {
            Resolution::Skip(state) => *state,
            Resolution::Proceed { .. } => RequirementState::ProceedToValueRules,
        }
    }
}

/// Why a field failed its presence rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequirementError {
    /// The declarations are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The presence rules reject the payload.
    #[error("presence rule '{}' failed", .violation.rule)]
    Violated {
        /// Terminal failure state.
        state: RequirementState,
        /// Message key and arguments.
        violation: Violation,
    },
}

/// Resolves presence semantics for fields of one payload.
#[derive(Debug, Clone, Copy)]
pub struct RequirementEngine<'a> {
    data: &'a DataAccessor,
}

impl<'a> RequirementEngine<'a> {
    /// Creates an engine over `data`.
    #[must_use]
    pub fn new(data: &'a DataAccessor) -> Self {
        Self { data }
    }

    /// Decides whether `field` may skip, must fail, or proceeds with the
    /// remaining rules.
    pub fn resolve<'r>(
        &self,
        field: &str,
        rules: &'r [MetaRule],
    ) -> Result<Resolution<'r, 'a>, RequirementError> {
        let constraints = FieldRequirementConstraints::derive(field, rules)?;
        let value = self.data.field(field).ok();
        let present = value.is_some();

        if constraints.is_required && !present {
            return Err(violated(
                RequirementState::RequiredFailed,
                Violation::new(REQUIRED, keys::REQUIRED).with_arg(field),
            ));
        }

        if !constraints.required_without.is_empty() {
            let others = &constraints.required_without;
            let present_others: Vec<&str> = others
                .iter()
                .map(String::as_str)
                .filter(|other| self.data.has_field(other))
                .collect();

            if present && !present_others.is_empty() {
                return Err(violated(
                    RequirementState::RequiredWithoutFailed,
                    Violation::new(REQUIRED_WITHOUT, keys::REQUIRED_WITHOUT_EXCLUSIVE)
                        .with_arg(field)
                        .with_arg(present_others.join(", ")),
                ));
            }
            if !present && present_others.is_empty() {
                return Err(violated(
                    RequirementState::RequiredWithoutFailed,
                    Violation::new(REQUIRED_WITHOUT, keys::REQUIRED_WITHOUT_MISSING)
                        .with_arg(field)
                        .with_arg(others.join(", ")),
                ));
            }
        }

        let Some(value) = value else {
            return Ok(Resolution::Skip(RequirementState::SkipDueToAbsence));
        };

        if constraints.is_nullable && value.is_null() {
            return Ok(Resolution::Skip(RequirementState::SkipDueToNullable));
        }

        let rules = rules
            .iter()
            .filter(|rule| !is_presence_rule(rule.name()))
            .collect();

        Ok(Resolution::Proceed { value, rules })
    }
}

fn violated(state: RequirementState, violation: Violation) -> RequirementError {
    RequirementError::Violated { state, violation }
}
