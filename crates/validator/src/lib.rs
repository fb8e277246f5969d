//! # fieldcheck-validator
//!
//! Declarative validation of JSON-like payloads against per-field rule
//! strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldcheck_validator::prelude::*;
//! use serde_json::json;
//!
//! let validator = Validator::builder()
//!     .rule("id", ["required", "integer"])
//!     .rule("email", ["required", "email"])
//!     .rule("nickname", ["nullable", "minLength:3"])
//!     .build()
//!     .unwrap();
//!
//! let data = validator
//!     .validate(json!({"id": "42", "email": "a@b.com", "nickname": null}))
//!     .unwrap();
//! assert_eq!(data.field("id").unwrap(), "42");
//!
//! let error = validator.validate(json!({"email": "a@b.com"})).unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::Requirement);
//! assert_eq!(error.field(), Some("id"));
//! ```
//!
//! ## Rule Language
//!
//! A rule is `name` or `name:param`. Names are case-insensitive. Presence is
//! controlled by `required`, `requiredWithout:other` and `nullable`; the
//! remaining rules are listed in [`rules`].
//!
//! Custom predicates mix freely with rule strings, see the [`rules!`] macro.
//!
//! ## Pipeline
//!
//! 1. [`rule::compile`] turns declarations into [`rule::MetaRule`]s once.
//! 2. [`requirement::RequirementEngine`] decides per field whether to fail,
//!    skip, or continue.
//! 3. Standard rules are dispatched through a [`registry::RuleRegistry`].
//! 4. The first violation is rendered by a [`message::MessageResolver`]
//!    unless a custom message overrides it.

// ValidationError is the only error surfaced to callers and is returned by
// value from every validation call.
#![allow(clippy::result_large_err)]

pub mod accessor;
pub mod error;
pub mod manifest;
pub mod message;
pub mod prelude;
pub mod registry;
pub mod requirement;
pub mod rule;
pub mod rules;
pub mod validator;

pub use accessor::DataAccessor;
pub use error::{ErrorKind, ValidationError};
pub use validator::{Validator, ValidatorBuilder};
