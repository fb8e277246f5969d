//! Rule declarations, parsing and compilation
//!
//! - [`parse`]: `"name:param"` into a [`ParsedRule`]
//! - [`MetaRule`]: compiled standard or custom rule
//! - [`compile`]: declarations into a [`CompiledRuleSet`]

mod compile;
mod meta;
mod parse;

pub use compile::{CompiledRuleSet, FieldKey, RuleDeclaration, RuleSpec, compile};
pub use meta::{CustomRule, MetaRule, Verdict};
pub use parse::{PARAM_SEPARATOR, ParsedRule, parse};

/// Builds a [`RuleDeclaration`] from rule strings and predicates.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::rules;
/// use fieldcheck_validator::rule::CustomRule;
///
/// let declaration = rules!["required", "min:1", CustomRule::new(|v| !v.is_null())];
/// assert_eq!(declaration.specs().len(), 3);
/// ```
#[macro_export]
macro_rules! rules {
    ($($spec:expr),* $(,)?) => {
        $crate::rule::RuleDeclaration::from(
            ::std::vec![$($crate::rule::RuleSpec::from($spec)),*]
        )
    };
}
