//! Prelude module for convenient imports.
//!
//! Provides a single `use fieldcheck_validator::prelude::*;` import that
//! brings in the types needed to declare rules and run validation.
//!
//! # Examples
//!
//! ```rust
//! use fieldcheck_validator::prelude::*;
//!
//! let validator = Validator::new([
//!     ("age", rules!["required", "integer", "min:18"]),
//!     ("tag", rules![CustomRule::new(|v| v.is_string())]),
//! ])
//! .unwrap();
//! assert_eq!(validator.rule_set().len(), 2);
//! ```

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::accessor::DataAccessor;
pub use crate::error::{ErrorKind, ValidationError};
pub use crate::manifest::RuleManifest;
pub use crate::validator::{Validator, ValidatorBuilder};

// ============================================================================
// DECLARATIONS
// ============================================================================

pub use crate::rule::{CustomRule, RuleDeclaration, RuleSpec, Verdict};
pub use crate::rules;

// ============================================================================
// EXTENSION POINTS
// ============================================================================

pub use crate::message::{MessageCatalog, MessageResolver};
pub use crate::registry::{EnumSet, Rule, RuleContext, RuleRegistry};
