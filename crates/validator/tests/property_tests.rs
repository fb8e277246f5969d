//! Property-based tests for fieldcheck-validator.

use fieldcheck_validator::prelude::*;
use fieldcheck_validator::rule::parse;
use proptest::prelude::*;
use serde_json::{Value, json};

// ============================================================================
// PARSER
// ============================================================================

proptest! {
    #[test]
    fn parse_splits_at_first_colon(name in "[a-zA-Z]{1,12}", param in "[ -~]{1,20}") {
        let text = format!("{name}:{param}");
        let parsed = parse(&text).unwrap();
        prop_assert_eq!(parsed.name, name);
        let expected = param.trim();
        prop_assert_eq!(parsed.param.as_deref(), (!expected.is_empty()).then_some(expected));
    }

    #[test]
    fn parse_ignores_surrounding_whitespace(name in "[a-z]{1,12}", pad in " {0,4}") {
        let parsed = parse(&format!("{pad}{name}{pad}")).unwrap();
        prop_assert_eq!(parsed.name, name);
        prop_assert_eq!(parsed.param, None);
    }

    #[test]
    fn blank_rules_never_parse(blank in "[ \t\n]{0,8}") {
        prop_assert!(parse(&blank).is_err());
    }
}

// ============================================================================
// ACCESSOR
// ============================================================================

proptest! {
    #[test]
    fn nested_paths_round_trip(
        a in "[a-z]{1,8}",
        b in "[a-z]{1,8}",
        n in any::<i64>(),
    ) {
        let data = DataAccessor::new(json!({ a.clone(): { b.clone(): n } }));
        let path = format!("{a}.{b}");
        prop_assert!(data.has_field(&path));
        prop_assert_eq!(data.field(&path).unwrap(), &json!(n));
        let missing = format!("{path}.deeper");
        prop_assert!(!data.has_field(&missing));
    }

    #[test]
    fn array_indices_respect_bounds(len in 0usize..8, index in 0usize..12) {
        let items: Vec<Value> = (0..len).map(|i| json!(i)).collect();
        let data = DataAccessor::new(json!({ "items": items }));
        prop_assert_eq!(data.has_field(&format!("items.{index}")), index < len);
    }
}

// ============================================================================
// ENGINE
// ============================================================================

proptest! {
    #[test]
    fn min_max_agree_with_comparison(bound in -1000i64..1000, value in -1000i64..1000) {
        let validator = Validator::new([("n", rules![format!("min:{bound}")])]).unwrap();
        prop_assert_eq!(validator.validate(json!({ "n": value })).is_ok(), value >= bound);

        let validator = Validator::new([("n", rules![format!("max:{bound}")])]).unwrap();
        prop_assert_eq!(validator.validate(json!({ "n": value })).is_ok(), value <= bound);
    }

    #[test]
    fn integer_strings_pass_non_strict_integer(n in any::<i64>()) {
        let as_string = json!({ "n": n.to_string() });
        let as_number = json!({ "n": n });

        let validator = Validator::new([("n", "integer")]).unwrap();
        prop_assert!(validator.validate(as_string.clone()).is_ok());

        let strict = Validator::new([("n", "integer:strict")]).unwrap();
        prop_assert!(strict.validate(as_string).is_err());
        prop_assert!(strict.validate(as_number).is_ok());
    }

    #[test]
    fn validation_is_deterministic(s in ".{0,40}") {
        let validator = Validator::new([("s", rules!["required", "maxLength:10", "email"])]).unwrap();
        let first = validator.validate(json!({ "s": s.clone() })).map_err(|e| e.to_string());
        let second = validator.validate(json!({ "s": s })).map_err(|e| e.to_string());
        prop_assert_eq!(first.map(DataAccessor::into_inner), second.map(DataAccessor::into_inner));
    }
}
