use super::operations::build_operations;
use super::types::SpecDocument;
use crate::error::{Error, Result};
use oas3::OpenApiV3Spec;
use std::collections::BTreeMap;
use std::path::Path;

/// Drop path-item keys that are neither HTTP methods nor standard fields.
///
/// Real-world specs carry tooling extensions under `paths` that `oas3`
/// rejects; the generators never read them.
fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = [
        "get", "post", "put", "delete", "patch", "options", "head", "trace",
    ];

    if let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") {
        for item in paths_map.values_mut() {
            if let serde_json::Value::Object(obj) = item {
                let keys: Vec<String> = obj.keys().cloned().collect();
                for k in keys {
                    let lk = k.to_ascii_lowercase();
                    let keep = match lk.as_str() {
                        "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                        m if METHODS.contains(&m) => true,
                        _ => k.starts_with("x-"),
                    };
                    if !keep {
                        obj.remove(&k);
                    }
                }
            }
        }
    }
}

fn slug_from_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}

/// Parse an already-read OpenAPI document.
///
/// Non-fatal findings (missing or duplicate `operationId`s) are appended to
/// `warnings` as plain messages; the caller attaches domain context.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the document is not parseable as
/// OpenAPI 3.x.
pub fn parse_document(
    content: &str,
    yaml: bool,
    warnings: &mut Vec<String>,
) -> Result<SpecDocument> {
    let mut value: serde_json::Value = if yaml {
        serde_yaml::from_str(content).map_err(|e| Error::Validation(e.to_string()))?
    } else {
        serde_json::from_str(content).map_err(|e| Error::Validation(e.to_string()))?
    };

    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec =
        serde_json::from_value(value.clone()).map_err(|e| Error::Validation(e.to_string()))?;

    let slug = slug_from_title(&spec.info.title);
    let operations = build_operations(&spec, &value, warnings);
    let schemas = collect_schemas(&value);

    Ok(SpecDocument {
        slug,
        operations,
        schemas,
    })
}

/// Load a per-domain OpenAPI document from disk.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the file is missing or unreadable
/// and [`Error::Validation`] when it does not parse as OpenAPI 3.x.
pub fn load_document(path: &Path, warnings: &mut Vec<String>) -> Result<SpecDocument> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("cannot read spec file {}: {e}", path.display())))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_document(&content, yaml, warnings)
}

/// The raw `components.schemas` table, keyed by schema name.
fn collect_schemas(value: &serde_json::Value) -> BTreeMap<String, serde_json::Value> {
    let mut table = BTreeMap::new();
    if let Some(schemas) = value
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.as_object())
    {
        for (name, schema) in schemas {
            table.insert(name.clone(), schema.clone());
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_unknown_verbs() {
        let mut v = json!({
            "paths": {
                "/x": { "get": {}, "patch": {}, "unknown": {}, "x-custom": true }
            }
        });
        strip_unknown_verbs(&mut v);
        assert!(v["paths"]["/x"].get("unknown").is_none());
        assert!(v["paths"]["/x"].get("x-custom").is_some());
    }

    #[test]
    fn test_slug_from_title() {
        assert_eq!(slug_from_title("Exchange API v2"), "exchange_api_v2");
        assert_eq!(slug_from_title("  Orders  "), "orders");
    }

    #[test]
    fn test_parse_document_collects_schema_table() {
        let doc = json!({
            "openapi": "3.1.0",
            "info": { "title": "Orders", "version": "1.0.0" },
            "paths": {},
            "components": {
                "schemas": {
                    "Order": { "type": "object", "properties": { "id": { "type": "string" } } }
                }
            }
        });
        let mut warnings = Vec::new();
        let spec = parse_document(&doc.to_string(), false, &mut warnings).unwrap();
        assert_eq!(spec.slug, "orders");
        assert!(spec.schema("Order").is_some());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_document_rejects_garbage() {
        let mut warnings = Vec::new();
        let err = parse_document("not: openapi", true, &mut warnings).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
