use serde_json::Value;
use std::collections::BTreeMap;

/// Marker schema used by envelope conventions; never an entity itself.
const DATA_ENVELOPE: &str = "DataEnvelope";

/// Schema-name suffixes that mark request/response wrappers. A name with
/// one of these suffixes is never accepted as a domain entity.
const WRAPPER_SUFFIXES: [&str; 3] = ["Request", "Response", "Envelope"];

fn is_wrapper_name(name: &str) -> bool {
    WRAPPER_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// Apply the wrapper-suffix filter to a candidate name.
fn accept(name: &str) -> Option<String> {
    if is_wrapper_name(name) {
        None
    } else {
        Some(name.to_string())
    }
}

/// The component-schema name a `$ref` points at, if any.
fn ref_name(value: &Value) -> Option<&str> {
    value
        .get("$ref")?
        .as_str()?
        .strip_prefix("#/components/schemas/")
}

/// Whether `value` is an object consisting solely of a `$ref`.
fn is_bare_ref(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| o.len() == 1 && o.contains_key("$ref"))
        .unwrap_or(false)
}

/// Entity evidence carried by a `data` property.
///
/// Outer `None` means the node contributed nothing and resolution should
/// continue with the next candidate. `Some(None)` is the inline-object
/// signal: the response schema itself is the entity, there is no named
/// schema to point at.
fn entity_from_data(data: &Value, table: &BTreeMap<String, Value>) -> Option<Option<String>> {
    // data: {$ref: X} — the common single-entity envelope.
    if let Some(name) = ref_name(data) {
        if table.contains_key(name) {
            if let Some(accepted) = accept(name) {
                return Some(Some(accepted));
            }
        }
        return None;
    }

    // data: {type: array, items: {$ref: X}} — list-response unwrap.
    if data.get("type").and_then(|t| t.as_str()) == Some("array") {
        if let Some(name) = data.get("items").and_then(ref_name) {
            if let Some(accepted) = accept(name) {
                return Some(Some(accepted));
            }
        }
        return None;
    }

    // data: {properties: {items: {type: array, ...}}} — doubly-nested list
    // envelope, with the item ref one or two levels under `items`.
    if let Some(items) = data.get("properties").and_then(|p| p.get("items")) {
        if items.get("type").and_then(|t| t.as_str()) == Some("array") {
            let inner = items.get("items");
            let name = inner
                .and_then(ref_name)
                .or_else(|| inner.and_then(|i| i.get("items")).and_then(ref_name));
            if let Some(name) = name {
                if let Some(accepted) = accept(name) {
                    return Some(Some(accepted));
                }
            }
            return None;
        }
    }

    // data is an inline object with no ref: the response schema itself is
    // the entity.
    let is_object = data.get("type").and_then(|t| t.as_str()) == Some("object")
        || data.get("properties").is_some()
        || data.as_object().map(|o| o.is_empty()).unwrap_or(false);
    if is_object {
        return Some(None);
    }

    None
}

/// Resolve a response (or request) schema to the name of the domain entity
/// it carries, unwrapping the envelope conventions in strict precedence.
///
/// Returns `None` both when nothing matches and when the schema signals
/// "use me directly" (an inline `data` object); either way the caller falls
/// back to a conventionally-derived name.
pub fn resolve_entity(schema: &Value, table: &BTreeMap<String, Value>) -> Option<String> {
    // 1. oneOf: recurse into the first option's resolved schema.
    if let Some(options) = schema.get("oneOf").and_then(|v| v.as_array()) {
        if let Some(first) = options.first() {
            let resolved = ref_name(first)
                .and_then(|name| table.get(name))
                .unwrap_or(first);
            if let Some(found) = resolve_entity(resolved, table) {
                return Some(found);
            }
            // A referenced first option whose body resolves nowhere still
            // names a candidate, subject to the usual filter.
            if let Some(name) = ref_name(first) {
                if name != DATA_ENVELOPE {
                    if let Some(accepted) = accept(name) {
                        return Some(accepted);
                    }
                }
            }
            return None;
        }
    }

    if let Some(members) = schema.get("allOf").and_then(|v| v.as_array()) {
        // 2. An allOf member declaring a `data` property.
        for member in members {
            if let Some(data) = member.get("properties").and_then(|p| p.get("data")) {
                if let Some(result) = entity_from_data(data, table) {
                    return result;
                }
            }
        }
        // 3. An allOf member that is a bare `$ref`, excluding the envelope
        // marker and wrapper-suffixed names.
        for member in members {
            if is_bare_ref(member) {
                if let Some(name) = ref_name(member) {
                    if name != DATA_ENVELOPE {
                        if let Some(accepted) = accept(name) {
                            return Some(accepted);
                        }
                    }
                }
            }
        }
        return None;
    }

    // 4. Direct `properties.data` on a non-allOf schema, mirroring rule 2.
    if let Some(data) = schema.get("properties").and_then(|p| p.get("data")) {
        if let Some(result) = entity_from_data(data, table) {
            return result;
        }
    }

    None
}

/// Whether a response schema denotes a collection.
///
/// Used as the `list` hint for verb classification: a top-level array, an
/// enveloped `data` array, or a doubly-nested `data.items` array all count.
pub fn has_list_shape(schema: &Value) -> bool {
    fn data_is_list(data: &Value) -> bool {
        if data.get("type").and_then(|t| t.as_str()) == Some("array") {
            return true;
        }
        data.get("properties")
            .and_then(|p| p.get("items"))
            .and_then(|i| i.get("type"))
            .and_then(|t| t.as_str())
            == Some("array")
    }

    if schema.get("type").and_then(|t| t.as_str()) == Some("array") {
        return true;
    }
    if let Some(first) = schema
        .get("oneOf")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
    {
        if has_list_shape(first) {
            return true;
        }
    }
    if let Some(members) = schema.get("allOf").and_then(|v| v.as_array()) {
        for member in members {
            if let Some(data) = member.get("properties").and_then(|p| p.get("data")) {
                if data_is_list(data) {
                    return true;
                }
            }
        }
    }
    if let Some(data) = schema.get("properties").and_then(|p| p.get("data")) {
        if data_is_list(data) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_envelope_with_data_ref() {
        let table = table(&[
            ("DataEnvelope", json!({ "type": "object" })),
            ("Trade", json!({ "type": "object" })),
        ]);
        let schema = json!({
            "allOf": [
                { "$ref": "#/components/schemas/DataEnvelope" },
                { "properties": { "data": { "$ref": "#/components/schemas/Trade" } } }
            ]
        });
        assert_eq!(resolve_entity(&schema, &table), Some("Trade".to_string()));
    }

    #[test]
    fn test_envelope_with_data_array() {
        let table = table(&[("Market", json!({ "type": "object" }))]);
        let schema = json!({
            "allOf": [
                { "properties": { "data": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Market" }
                } } }
            ]
        });
        assert_eq!(resolve_entity(&schema, &table), Some("Market".to_string()));
    }

    #[test]
    fn test_doubly_nested_list_envelope() {
        let table = table(&[("Position", json!({ "type": "object" }))]);
        let schema = json!({
            "allOf": [
                { "properties": { "data": { "properties": { "items": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Position" }
                } } } } }
            ]
        });
        assert_eq!(
            resolve_entity(&schema, &table),
            Some("Position".to_string())
        );
    }

    #[test]
    fn test_inline_data_object_signals_self() {
        let table = table(&[]);
        let schema = json!({
            "allOf": [
                { "properties": { "data": {
                    "type": "object",
                    "properties": { "id": { "type": "string" } }
                } } }
            ]
        });
        assert_eq!(resolve_entity(&schema, &table), None);
    }

    #[test]
    fn test_bare_ref_member() {
        let table = table(&[("Order", json!({ "type": "object" }))]);
        let schema = json!({
            "allOf": [ { "$ref": "#/components/schemas/Order" } ]
        });
        assert_eq!(resolve_entity(&schema, &table), Some("Order".to_string()));
    }

    #[test]
    fn test_wrapper_suffixes_filtered_everywhere() {
        let table = table(&[
            ("CreateOrderResponse", json!({ "type": "object" })),
            ("OrderRequest", json!({ "type": "object" })),
        ]);
        let bare = json!({
            "allOf": [ { "$ref": "#/components/schemas/CreateOrderResponse" } ]
        });
        assert_eq!(resolve_entity(&bare, &table), None);

        let data_ref = json!({
            "properties": { "data": { "$ref": "#/components/schemas/OrderRequest" } }
        });
        assert_eq!(resolve_entity(&data_ref, &table), None);
    }

    #[test]
    fn test_one_of_recurses_into_first_option() {
        let table = table(&[
            (
                "OrderEnvelope",
                json!({
                    "allOf": [
                        { "properties": { "data": { "$ref": "#/components/schemas/Order" } } }
                    ]
                }),
            ),
            ("Order", json!({ "type": "object" })),
        ]);
        let schema = json!({
            "oneOf": [
                { "$ref": "#/components/schemas/OrderEnvelope" },
                { "type": "null" }
            ]
        });
        assert_eq!(resolve_entity(&schema, &table), Some("Order".to_string()));
    }

    #[test]
    fn test_direct_data_mirror_on_plain_schema() {
        let table = table(&[("Balance", json!({ "type": "object" }))]);
        let schema = json!({
            "type": "object",
            "properties": { "data": {
                "type": "array",
                "items": { "$ref": "#/components/schemas/Balance" }
            } }
        });
        assert_eq!(resolve_entity(&schema, &table), Some("Balance".to_string()));
    }

    #[test]
    fn test_data_ref_missing_from_table_is_skipped() {
        let table = table(&[]);
        let schema = json!({
            "properties": { "data": { "$ref": "#/components/schemas/Ghost" } }
        });
        assert_eq!(resolve_entity(&schema, &table), None);
    }

    #[test]
    fn test_no_match_is_none() {
        let table = table(&[]);
        assert_eq!(resolve_entity(&json!({ "type": "string" }), &table), None);
    }

    #[test]
    fn test_list_shape_detection() {
        assert!(has_list_shape(&json!({ "type": "array" })));
        assert!(has_list_shape(&json!({
            "allOf": [ { "properties": { "data": { "type": "array" } } } ]
        })));
        assert!(has_list_shape(&json!({
            "properties": { "data": { "properties": { "items": { "type": "array" } } } }
        })));
        assert!(has_list_shape(&json!({
            "oneOf": [ { "type": "array" }, { "type": "null" } ]
        })));
        assert!(!has_list_shape(&json!({ "type": "object" })));
    }
}
