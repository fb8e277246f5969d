//! Finite set membership: `enum:SetName`

use serde_json::Value;

use super::{required_param, violation};
use crate::error::{ConfigError, RuleError};
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

/// Accepts members of an [`EnumSet`](crate::registry::EnumSet) registered
/// under the parameter name.
///
/// The value's JSON type must match the set's backing type: an
/// integer-backed set never accepts `"1"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enum;

impl Rule for Enum {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let name = required_param("enum", field, param)?;
        let set = ctx.enum_set(name).ok_or_else(|| ConfigError::InvalidParameter {
            rule: "enum".to_string(),
            reason: format!("no enum set named '{name}' is registered"),
        })?;

        if set.contains(value) {
            Ok(())
        } else {
            Err(violation("enum", keys::ENUM, field).with_arg(name).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EnumSet, RuleRegistry};
    use serde_json::json;

    fn registry() -> RuleRegistry {
        let registry = RuleRegistry::new();
        registry.register_enum("Suit", EnumSet::names(["Hearts", "Spades"]));
        registry.register_enum("Priority", EnumSet::integers([1, 2, 3]));
        registry
    }

    fn run(value: Value, param: Option<&str>) -> Result<(), RuleError> {
        let registry = registry();
        Enum.validate("f", &value, param, &RuleContext::new(&registry))
    }

    #[test]
    fn test_name_based_membership() {
        assert!(run(json!("Hearts"), Some("Suit")).is_ok());
        assert!(run(json!("hearts"), Some("Suit")).is_err());
    }

    #[test]
    fn test_integer_backing_requires_integer_values() {
        assert!(run(json!(2), Some("Priority")).is_ok());
        assert!(matches!(
            run(json!("2"), Some("Priority")),
            Err(RuleError::Violation(_))
        ));
    }

    #[test]
    fn test_unknown_set_is_configuration_error() {
        assert!(matches!(
            run(json!("x"), Some("Colour")),
            Err(RuleError::Config(ConfigError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn test_missing_parameter_is_configuration_error() {
        assert!(matches!(
            run(json!("x"), None),
            Err(RuleError::Config(ConfigError::MissingParameter { .. }))
        ));
    }
}
