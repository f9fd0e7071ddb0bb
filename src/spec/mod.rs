//! # Spec Module
//!
//! Loading and normalization of per-domain OpenAPI 3.x documents.
//!
//! A document is parsed twice on purpose: once as a raw
//! [`serde_json::Value`] tree, once through [`oas3`] for structural
//! validation. Operation metadata is extracted against the typed spec, but
//! every schema node handed onward keeps its raw form so `$ref` names
//! survive for entity resolution.

mod load;
mod operations;
mod types;

pub use load::{load_document, parse_document};
pub use operations::build_operations;
pub use types::{OperationMeta, ParameterLocation, ParameterMeta, SpecDocument};
