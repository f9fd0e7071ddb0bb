use http::Method;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

impl From<oas3::spec::ParameterIn> for ParameterLocation {
    fn from(loc: oas3::spec::ParameterIn) -> Self {
        match loc {
            oas3::spec::ParameterIn::Path => ParameterLocation::Path,
            oas3::spec::ParameterIn::Query => ParameterLocation::Query,
            oas3::spec::ParameterIn::Header => ParameterLocation::Header,
            oas3::spec::ParameterIn::Cookie => ParameterLocation::Cookie,
        }
    }
}

/// Resolved metadata for a single operation parameter.
#[derive(Debug, Clone)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
}

/// Everything the generators need to know about one OpenAPI operation.
///
/// Schema nodes are kept as raw JSON values with `$ref`s intact: entity
/// resolution works on reference *names*, which an eager dereference pass
/// would erase.
#[derive(Debug, Clone)]
pub struct OperationMeta {
    pub operation_id: String,
    pub method: Method,
    pub path_pattern: String,
    pub parameters: Vec<ParameterMeta>,
    /// Raw `application/json` request body schema, if declared.
    pub request_schema: Option<Value>,
    /// Raw schema of the first 2xx `application/json` response.
    pub response_schema: Option<Value>,
    /// Whether the response unwraps to a collection. Drives the
    /// `get` → `list` verb refinement.
    pub response_is_array: bool,
}

/// A loaded, immutable OpenAPI document for one domain.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    /// URL-safe slug derived from `info.title`.
    pub slug: String,
    pub operations: Vec<OperationMeta>,
    /// Raw `components.schemas` table, keyed by schema name.
    pub schemas: BTreeMap<String, Value>,
}

impl SpecDocument {
    /// Look up a component schema by name.
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }
}
