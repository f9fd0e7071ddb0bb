use super::alias::resolve_alias;
use super::entity::resolve_entity;
use crate::naming::{pascal_case, pluralize, resource_name, singularize, Verb, VerbRules};
use crate::spec::OperationMeta;
use serde_json::Value;
use std::collections::BTreeMap;

/// One operation with its classified verb and normalized resource name.
#[derive(Debug, Clone)]
pub struct ClassifiedOperation {
    pub verb: Verb,
    pub resource: String,
    pub meta: OperationMeta,
}

/// All operations acting on one logical entity type.
///
/// Grouping is a stable partition: every operation lands in exactly one
/// group, groups are ordered by resource name, and members are ordered by
/// operation id, so regrouping the same input always yields the same
/// output regardless of document ordering.
#[derive(Debug, Clone)]
pub struct ResourceGroup {
    /// Singular PascalCase resource name.
    pub resource: String,
    pub operations: Vec<ClassifiedOperation>,
}

impl ResourceGroup {
    /// Distinct verbs present in this group, in canonical order.
    pub fn verbs(&self) -> Vec<Verb> {
        let mut verbs: Vec<Verb> = self.operations.iter().map(|op| op.verb).collect();
        verbs.sort_unstable();
        verbs.dedup();
        verbs
    }
}

/// Partition operations into resource groups.
pub fn group_operations(rules: &VerbRules, operations: &[OperationMeta]) -> Vec<ResourceGroup> {
    let mut groups: BTreeMap<String, Vec<ClassifiedOperation>> = BTreeMap::new();
    for meta in operations {
        let verb = rules.classify(
            &meta.operation_id,
            Some(&meta.method),
            meta.response_is_array,
        );
        let resource = singularize(&resource_name(rules, &meta.operation_id));
        groups.entry(resource.clone()).or_default().push(ClassifiedOperation {
            verb,
            resource,
            meta: meta.clone(),
        });
    }
    groups
        .into_iter()
        .map(|(resource, mut operations)| {
            operations.sort_by(|a, b| a.meta.operation_id.cmp(&b.meta.operation_id));
            ResourceGroup {
                resource,
                operations,
            }
        })
        .collect()
}

/// Best-effort mapping from a resource group to the schema name of its
/// domain entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityResolution {
    /// The resolved schema name, when one was found.
    pub entity: Option<String>,
    /// Conventionally-derived name used when `entity` is absent.
    pub fallback: String,
    /// Whether the resolution came from structural evidence or an exact
    /// table match rather than a low-confidence heuristic.
    pub confident: bool,
}

impl EntityResolution {
    /// The name generators should use.
    pub fn name(&self) -> &str {
        self.entity.as_deref().unwrap_or(&self.fallback)
    }
}

/// How strongly a verb's response schema testifies to the entity name.
///
/// List responses often reference item types with divergent naming, so they
/// are the weakest evidence; `get` responses are the strongest.
fn evidence_rank(verb: Verb) -> u8 {
    match verb {
        Verb::Get => 0,
        Verb::Create | Verb::Update => 1,
        Verb::List => 2,
        Verb::Delete => 3,
    }
}

/// Resolve the entity name for a resource group.
///
/// Structural evidence from member responses is tried first, strongest verb
/// first. When that yields nothing the fallback ladder runs against the
/// schema table: exact match, case-insensitive match, domain prefix,
/// singular/plural variants, domain-prefixed variants, and finally alias
/// resolution of the resource name itself.
pub fn resolve_entity_for_group(
    group: &ResourceGroup,
    table: &BTreeMap<String, Value>,
    domain: Option<&str>,
) -> EntityResolution {
    let resource = group.resource.clone();

    let mut ordered: Vec<&ClassifiedOperation> = group.operations.iter().collect();
    ordered.sort_by_key(|op| evidence_rank(op.verb));
    for op in ordered {
        let Some(schema) = op.meta.response_schema.as_ref() else {
            continue;
        };
        if let Some(found) = resolve_entity(schema, table) {
            let entity = resolve_alias(&found, table).unwrap_or(found);
            return EntityResolution {
                entity: Some(entity),
                fallback: resource,
                confident: true,
            };
        }
    }

    let prefix = domain.map(pascal_case);
    if let Some((entity, confident)) = ladder(&resource, table, prefix.as_deref()) {
        return EntityResolution {
            entity: Some(entity),
            fallback: resource,
            confident,
        };
    }

    EntityResolution {
        entity: None,
        fallback: resource,
        confident: false,
    }
}

fn ladder(
    resource: &str,
    table: &BTreeMap<String, Value>,
    prefix: Option<&str>,
) -> Option<(String, bool)> {
    if table.contains_key(resource) {
        return Some((resource.to_string(), true));
    }
    if let Some(key) = table.keys().find(|k| k.eq_ignore_ascii_case(resource)) {
        return Some((key.clone(), true));
    }
    if let Some(prefix) = prefix {
        let prefixed = format!("{prefix}{resource}");
        if table.contains_key(&prefixed) {
            return Some((prefixed, false));
        }
    }
    for variant in [singularize(resource), pluralize(resource)] {
        if variant != resource && table.contains_key(&variant) {
            return Some((variant, false));
        }
    }
    if let Some(prefix) = prefix {
        for variant in [singularize(resource), pluralize(resource)] {
            let prefixed = format!("{prefix}{variant}");
            if table.contains_key(&prefixed) {
                return Some((prefixed, false));
            }
        }
    }
    if let Some(target) = resolve_alias(resource, table) {
        if target != resource {
            return Some((target, false));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;

    fn op(operation_id: &str, method: Method) -> OperationMeta {
        OperationMeta {
            operation_id: operation_id.to_string(),
            method,
            path_pattern: "/x".to_string(),
            parameters: Vec::new(),
            request_schema: None,
            response_schema: None,
            response_is_array: false,
        }
    }

    fn table(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let rules = VerbRules::standard();
        let operations = vec![
            op("listOrders", Method::GET),
            op("getOrder", Method::GET),
            op("createOrder", Method::POST),
            op("listMarkets", Method::GET),
        ];
        let groups = group_operations(&rules, &operations);
        let total: usize = groups.iter().map(|g| g.operations.len()).sum();
        assert_eq!(total, operations.len());
        let names: Vec<&str> = groups.iter().map(|g| g.resource.as_str()).collect();
        assert_eq!(names, vec!["Market", "Order"]);
        assert_eq!(groups[1].operations.len(), 3);
    }

    #[test]
    fn test_grouping_is_stable_under_input_reordering() {
        let rules = VerbRules::standard();
        let mut operations = vec![
            op("createOrder", Method::POST),
            op("getOrder", Method::GET),
            op("listOrders", Method::GET),
        ];
        let a = group_operations(&rules, &operations);
        operations.reverse();
        let b = group_operations(&rules, &operations);
        let ids =
            |g: &[ResourceGroup]| -> Vec<String> {
                g.iter()
                    .flat_map(|grp| grp.operations.iter().map(|o| o.meta.operation_id.clone()))
                    .collect()
            };
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_group_verbs_are_deduplicated_and_ordered() {
        let rules = VerbRules::standard();
        let operations = vec![
            op("deleteOrder", Method::DELETE),
            op("createOrder", Method::POST),
            op("getOrder", Method::GET),
        ];
        let groups = group_operations(&rules, &operations);
        assert_eq!(
            groups[0].verbs(),
            vec![Verb::Create, Verb::Get, Verb::Delete]
        );
    }

    #[test]
    fn test_structural_evidence_prefers_get_over_list() {
        let rules = VerbRules::standard();
        let mut get_op = op("getOrder", Method::GET);
        get_op.response_schema = Some(json!({
            "properties": { "data": { "$ref": "#/components/schemas/Order" } }
        }));
        let mut list_op = op("listOrders", Method::GET);
        list_op.response_schema = Some(json!({
            "properties": { "data": {
                "type": "array",
                "items": { "$ref": "#/components/schemas/OrderSummary" }
            } }
        }));
        let operations = vec![list_op, get_op];
        let groups = group_operations(&rules, &operations);
        let table = table(&[
            ("Order", json!({ "type": "object" })),
            ("OrderSummary", json!({ "type": "object" })),
        ]);
        let resolution = resolve_entity_for_group(&groups[0], &table, None);
        assert_eq!(resolution.entity.as_deref(), Some("Order"));
        assert!(resolution.confident);
    }

    #[test]
    fn test_fallback_ladder_exact_then_case_insensitive() {
        let rules = VerbRules::standard();
        let groups = group_operations(&rules, &[op("getTicker", Method::GET)]);
        let table = table(&[("ticker", json!({ "type": "object" }))]);
        let resolution = resolve_entity_for_group(&groups[0], &table, None);
        assert_eq!(resolution.entity.as_deref(), Some("ticker"));
        assert!(resolution.confident);
    }

    #[test]
    fn test_fallback_ladder_domain_prefix_and_plural() {
        let rules = VerbRules::standard();
        let groups = group_operations(&rules, &[op("getBalance", Method::GET)]);

        let prefixed = table(&[("ExchangeBalance", json!({ "type": "object" }))]);
        let resolution = resolve_entity_for_group(&groups[0], &prefixed, Some("exchange"));
        assert_eq!(resolution.entity.as_deref(), Some("ExchangeBalance"));
        assert!(!resolution.confident);

        let plural = table(&[("Balances", json!({ "type": "object" }))]);
        let resolution = resolve_entity_for_group(&groups[0], &plural, None);
        assert_eq!(resolution.entity.as_deref(), Some("Balances"));
    }

    #[test]
    fn test_fallback_ladder_alias_of_resource_name() {
        let rules = VerbRules::standard();
        let groups = group_operations(&rules, &[op("getSession", Method::GET)]);
        let table = table(&[
            (
                "Session",
                json!({ "allOf": [ { "$ref": "#/components/schemas/AuthSession" } ] }),
            ),
            ("AuthSession", json!({ "type": "object" })),
        ]);
        let resolution = resolve_entity_for_group(&groups[0], &table, None);
        // Exact match wins before alias resolution; the alias is only
        // consulted when the direct name misses.
        assert_eq!(resolution.entity.as_deref(), Some("Session"));
    }

    #[test]
    fn test_give_up_yields_fallback_name() {
        let rules = VerbRules::standard();
        let groups = group_operations(&rules, &[op("getHeartbeat", Method::GET)]);
        let resolution = resolve_entity_for_group(&groups[0], &table(&[]), None);
        assert_eq!(resolution.entity, None);
        assert_eq!(resolution.name(), "Heartbeat");
        assert!(!resolution.confident);
    }
}
