#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The concrete resolution scenarios the system guarantees, exercised
//! through the public API.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use stratagen::naming::{resource_name, Verb, VerbRules};
use stratagen::resolve::{resolve_alias, resolve_entity};

fn table(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_list_markets_classifies_as_list_of_markets() {
    let rules = VerbRules::standard();
    assert_eq!(rules.classify("listMarkets", None, false), Verb::List);
    assert_eq!(resource_name(&rules, "listMarkets"), "Markets");
}

#[test]
fn test_get_order_classifies_as_get_of_order() {
    let rules = VerbRules::standard();
    assert_eq!(rules.classify("getOrder", None, false), Verb::Get);
    assert_eq!(resource_name(&rules, "getOrder"), "Order");
}

#[test]
fn test_data_envelope_unwraps_to_trade() {
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
fn test_wrapper_suffixed_candidate_is_rejected() {
    let table = table(&[("CreateOrderResponse", json!({ "type": "object" }))]);
    let schema = json!({
        "allOf": [ { "$ref": "#/components/schemas/CreateOrderResponse" } ]
    });
    assert_eq!(resolve_entity(&schema, &table), None);
}

#[test]
fn test_alias_schema_resolves_to_target() {
    let table = table(&[
        (
            "AuthSessionToken",
            json!({ "allOf": [ { "$ref": "#/components/schemas/AuthSession" } ] }),
        ),
        ("AuthSession", json!({ "type": "object" })),
    ]);
    assert_eq!(
        resolve_alias("AuthSessionToken", &table),
        Some("AuthSession".to_string())
    );
}

#[test]
fn test_classification_is_total_and_deterministic() {
    let rules = VerbRules::standard();
    let ids = [
        "listMarkets",
        "createOrder",
        "cancelOrder",
        "deleteSession",
        "getTicker",
        "refreshToken",
        "submitWithdrawal",
        "somethingUnrecognizable",
        "x",
    ];
    for id in ids {
        let first = rules.classify(id, None, false);
        let second = rules.classify(id, None, false);
        assert_eq!(first, second, "unstable classification for '{id}'");
        assert!(matches!(
            first,
            Verb::Create | Verb::List | Verb::Get | Verb::Update | Verb::Delete
        ));
    }
}

#[test]
fn test_entity_resolution_never_returns_wrapper_names() {
    let table = table(&[
        ("OrderResponse", json!({ "type": "object" })),
        ("OrderRequest", json!({ "type": "object" })),
        ("OrderEnvelope", json!({ "type": "object" })),
    ]);
    let shapes = [
        json!({ "allOf": [ { "$ref": "#/components/schemas/OrderResponse" } ] }),
        json!({ "properties": { "data": { "$ref": "#/components/schemas/OrderRequest" } } }),
        json!({ "allOf": [
            { "properties": { "data": {
                "type": "array",
                "items": { "$ref": "#/components/schemas/OrderEnvelope" }
            } } }
        ] }),
    ];
    for shape in &shapes {
        if let Some(name) = resolve_entity(shape, &table) {
            assert!(
                !name.ends_with("Request")
                    && !name.ends_with("Response")
                    && !name.ends_with("Envelope"),
                "wrapper name '{name}' leaked"
            );
        }
    }
}

#[test]
fn test_alias_resolution_terminates_on_long_chains_and_cycles() {
    // A chain of aliases terminates at the first non-alias.
    let mut entries: Vec<(String, Value)> = (0..20)
        .map(|i| {
            (
                format!("Alias{i}"),
                json!({ "allOf": [ { "$ref": format!("#/components/schemas/Alias{}", i + 1) } ] }),
            )
        })
        .collect();
    entries.push(("Alias20".to_string(), json!({ "type": "object" })));
    let chain: BTreeMap<String, Value> = entries.into_iter().collect();
    assert_eq!(resolve_alias("Alias0", &chain), Some("Alias20".to_string()));

    // A deliberate cycle resolves to None instead of spinning.
    let cycle = table(&[
        (
            "A",
            json!({ "allOf": [ { "$ref": "#/components/schemas/B" } ] }),
        ),
        (
            "B",
            json!({ "allOf": [ { "$ref": "#/components/schemas/A" } ] }),
        ),
    ]);
    assert_eq!(resolve_alias("A", &cycle), None);
}
