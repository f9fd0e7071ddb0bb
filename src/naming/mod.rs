//! # Naming Module
//!
//! Pure classification helpers that map OpenAPI operation identifiers to
//! canonical verbs and resource names.
//!
//! The classifier is table-driven: an ordered list of `(pattern, verb)`
//! pairs checked top to bottom, with the table's ordering part of the
//! contract. Callers extend behavior by prepending higher-priority rules,
//! never by mutating shared globals.

mod resource;
mod similarity;
mod verb;

pub use resource::{pascal_case, pluralize, resource_name, singularize};
pub use similarity::{best_match, handler_match_score};
pub use verb::{Verb, VerbRule, VerbRules};
