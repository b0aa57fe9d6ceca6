//! Declarative request validation.
//!
//! A [`RuleSet`] names fields and the rules each must satisfy. Checking a
//! payload returns human-readable violation messages instead of failing
//! fast, so a response can report every problem at once:
//!
//! ```
//! use std::collections::HashMap;
//! use armature_validate::{FieldRules, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .field("username", FieldRules::new().required().alpha_numeric())
//!     .field("email", FieldRules::new().required().email());
//!
//! let mut data = HashMap::new();
//! data.insert(String::from("username"), String::from("jane doe"));
//!
//! let errors = rules.check(&data);
//! assert_eq!(errors.len(), 2);
//! ```
//!
//! Uniqueness checks need a database and run through
//! [`RuleSet::check_with_db`].

mod checks;
mod error;
mod rules;

pub use error::{Result, ValidateError};
pub use rules::{FieldRules, Rule, RuleSet};
