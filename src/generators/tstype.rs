use crate::resolve::resolve_alias;
use serde_json::Value;
use std::collections::BTreeMap;

/// A field of a generated TypeScript interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsField {
    /// Property name, quoted when not a valid TS identifier.
    pub name: String,
    /// TypeScript type expression.
    pub ty: String,
    pub optional: bool,
}

fn ref_name(value: &Value) -> Option<&str> {
    value
        .get("$ref")?
        .as_str()?
        .strip_prefix("#/components/schemas/")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quote a property name when TypeScript requires it.
pub fn ts_property_name(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{name}'")
    }
}

/// Map a JSON Schema node to a TypeScript type expression.
///
/// References map to their schema name; everything the mapping does not
/// understand becomes `unknown` rather than `any`, so generated interfaces
/// stay honest about what the spec did not say.
pub fn ts_type(schema: &Value) -> String {
    if let Some(name) = ref_name(schema) {
        return name.to_string();
    }
    match schema.get("type").and_then(|t| t.as_str()) {
        Some("string") => "string".to_string(),
        Some("integer") | Some("number") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        Some("array") => match schema.get("items") {
            Some(items) => format!("{}[]", ts_type(items)),
            None => "unknown[]".to_string(),
        },
        Some("object") => "Record<string, unknown>".to_string(),
        Some("null") => "null".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Map a JSON Schema node to a zod validator expression.
pub fn zod_type(schema: &Value) -> String {
    if ref_name(schema).is_some() {
        return "z.record(z.unknown())".to_string();
    }
    match schema.get("type").and_then(|t| t.as_str()) {
        Some("string") => "z.string()".to_string(),
        Some("integer") | Some("number") => "z.number()".to_string(),
        Some("boolean") => "z.boolean()".to_string(),
        Some("array") => match schema.get("items") {
            Some(items) => format!("z.array({})", zod_type(items)),
            None => "z.array(z.unknown())".to_string(),
        },
        Some("object") => "z.record(z.unknown())".to_string(),
        _ => "z.unknown()".to_string(),
    }
}

/// Dereference a schema through `$ref`s and alias chains until a
/// structural node is reached. Depth-bounded; broken chains return the
/// last node seen.
pub fn deref_schema<'a>(schema: &'a Value, table: &'a BTreeMap<String, Value>) -> &'a Value {
    let mut current = schema;
    for _ in 0..8 {
        let Some(name) = ref_name(current) else {
            return current;
        };
        let resolved = resolve_alias(name, table);
        let Some(target) = resolved.as_deref().and_then(|n| table.get(n)) else {
            return current;
        };
        current = target;
    }
    current
}

/// Named property nodes of a schema, `allOf`-merged and dereferenced.
///
/// Returns `(name, node, optional)` triples in declaration order; the
/// first declaration of a name wins across `allOf` members.
pub(crate) fn extract_properties(
    schema: &Value,
    table: &BTreeMap<String, Value>,
) -> Vec<(String, Value, bool)> {
    fn collect(
        schema: &Value,
        table: &BTreeMap<String, Value>,
        out: &mut Vec<(String, Value, bool)>,
        depth: usize,
    ) {
        if depth > 4 {
            return;
        }
        let schema = deref_schema(schema, table);

        if let Some(members) = schema.get("allOf").and_then(|v| v.as_array()) {
            for member in members {
                collect(member, table, out, depth + 1);
            }
            return;
        }

        let required: Vec<&str> = schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
            for (name, prop) in props {
                if out.iter().any(|(existing, _, _)| existing == name) {
                    continue;
                }
                out.push((
                    name.clone(),
                    prop.clone(),
                    !required.contains(&name.as_str()),
                ));
            }
        }
    }

    let mut properties = Vec::new();
    collect(schema, table, &mut properties, 0);
    properties
}

/// Extract interface fields from a schema, merging `allOf` members and
/// honoring the `required` list.
pub fn extract_ts_fields(schema: &Value, table: &BTreeMap<String, Value>) -> Vec<TsField> {
    extract_properties(schema, table)
        .into_iter()
        .map(|(name, prop, optional)| TsField {
            name: ts_property_name(&name),
            ty: ts_type(&prop),
            optional,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ts_type_primitives_and_arrays() {
        assert_eq!(ts_type(&json!({ "type": "string" })), "string");
        assert_eq!(ts_type(&json!({ "type": "integer" })), "number");
        assert_eq!(
            ts_type(&json!({ "type": "array", "items": { "type": "boolean" } })),
            "boolean[]"
        );
        assert_eq!(
            ts_type(&json!({ "$ref": "#/components/schemas/Order" })),
            "Order"
        );
        assert_eq!(ts_type(&json!({})), "unknown");
    }

    #[test]
    fn test_zod_type_mapping() {
        assert_eq!(zod_type(&json!({ "type": "string" })), "z.string()");
        assert_eq!(
            zod_type(&json!({ "type": "array", "items": { "type": "number" } })),
            "z.array(z.number())"
        );
        assert_eq!(zod_type(&json!({})), "z.unknown()");
    }

    #[test]
    fn test_extract_fields_honors_required() {
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "string" },
                "note": { "type": "string" }
            }
        });
        let fields = extract_ts_fields(&schema, &BTreeMap::new());
        assert_eq!(fields.len(), 2);
        let id = fields.iter().find(|f| f.name == "id").unwrap();
        assert!(!id.optional);
        let note = fields.iter().find(|f| f.name == "note").unwrap();
        assert!(note.optional);
    }

    #[test]
    fn test_extract_fields_merges_all_of() {
        let mut table = BTreeMap::new();
        table.insert(
            "Base".to_string(),
            json!({
                "type": "object",
                "required": ["id"],
                "properties": { "id": { "type": "string" } }
            }),
        );
        let schema = json!({
            "allOf": [
                { "$ref": "#/components/schemas/Base" },
                { "type": "object", "properties": { "amount": { "type": "number" } } }
            ]
        });
        let fields = extract_ts_fields(&schema, &table);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "amount"]);
    }

    #[test]
    fn test_extract_fields_survives_ref_cycles() {
        let mut table = BTreeMap::new();
        table.insert("A".to_string(), json!({ "$ref": "#/components/schemas/A" }));
        let schema = json!({ "$ref": "#/components/schemas/A" });
        // Must terminate; a self-referential schema has no fields to give.
        assert!(extract_ts_fields(&schema, &table).is_empty());
    }

    #[test]
    fn test_property_names_quoted_when_needed() {
        assert_eq!(ts_property_name("orderId"), "orderId");
        assert_eq!(ts_property_name("x-request-id"), "'x-request-id'");
    }
}
