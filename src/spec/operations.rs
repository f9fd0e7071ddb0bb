use super::types::{OperationMeta, ParameterLocation, ParameterMeta};
use crate::naming::pascal_case;
use crate::resolve::has_list_shape;
use oas3::spec::{ObjectOrReference, Parameter};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::collections::HashSet;

fn resolve_parameter_ref<'a>(spec: &'a OpenApiV3Spec, ref_path: &str) -> Option<&'a Parameter> {
    let name = ref_path.strip_prefix("#/components/parameters/")?;
    spec.components
        .as_ref()?
        .parameters
        .get(name)
        .and_then(|param_ref| match param_ref {
            ObjectOrReference::Object(param) => Some(param),
            _ => None,
        })
}

fn extract_parameters(
    spec: &OpenApiV3Spec,
    params: &Vec<ObjectOrReference<Parameter>>,
) -> Vec<ParameterMeta> {
    let mut out = Vec::new();
    for p in params {
        let param = match p {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path),
        };

        if let Some(param) = param {
            let schema = param.schema.as_ref().and_then(|s| match s {
                ObjectOrReference::Object(obj) => serde_json::to_value(obj).ok(),
                ObjectOrReference::Ref { .. } => None,
            });

            out.push(ParameterMeta {
                name: param.name.clone(),
                location: ParameterLocation::from(param.location),
                required: param.required.is_some(),
                schema,
            });
        }
    }
    out
}

/// The raw path-item node for `method` under `path`, straight from the
/// unparsed document.
fn raw_operation<'a>(raw: &'a Value, path: &str, method: &http::Method) -> Option<&'a Value> {
    raw.get("paths")?
        .get(path)?
        .get(method.as_str().to_ascii_lowercase())
}

/// Raw `application/json` request body schema, `$ref`s intact.
fn raw_request_schema(op: &Value) -> Option<Value> {
    op.get("requestBody")?
        .get("content")?
        .get("application/json")?
        .get("schema")
        .cloned()
}

/// Raw schema of the first 2xx `application/json` response.
///
/// `200` wins outright; otherwise the lowest 2xx status with a JSON body is
/// used so the pick is stable across reorderings of the response map.
fn raw_response_schema(op: &Value) -> Option<Value> {
    let responses = op.get("responses")?.as_object()?;

    let json_schema = |status: &str| -> Option<&Value> {
        responses
            .get(status)?
            .get("content")?
            .get("application/json")?
            .get("schema")
    };

    if let Some(schema) = json_schema("200") {
        return Some(schema.clone());
    }

    let mut statuses: Vec<u16> = responses.keys().filter_map(|s| s.parse().ok()).collect();
    statuses.sort_unstable();
    statuses
        .into_iter()
        .filter(|s| (200..300).contains(s))
        .find_map(|s| json_schema(&s.to_string()).cloned())
}

/// Derive an identifier for an operation that declared none.
fn synthesize_operation_id(method: &http::Method, path: &str) -> String {
    let resource: String = path
        .split('/')
        .filter(|seg| !seg.is_empty())
        .map(|seg| pascal_case(seg.trim_matches(['{', '}'])))
        .collect();
    format!("{}{resource}", method.as_str().to_ascii_lowercase())
}

/// Deduplicate an operation id against the set already seen.
///
/// Duplicate `operationId`s are a data-quality issue in the source
/// document, tolerated rather than fatal: later duplicates get a numeric
/// suffix and a warning.
fn unique_operation_id(
    seen: &mut HashSet<String>,
    name: &str,
    warnings: &mut Vec<String>,
) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if seen.insert(candidate.clone()) {
            warnings.push(format!(
                "duplicate operationId '{name}' → using '{candidate}'"
            ));
            return candidate;
        }
        counter += 1;
    }
}

/// Extract per-operation metadata from a parsed spec.
///
/// The typed spec drives the walk (paths, methods, parameters); request and
/// response schemas are looked up in the raw document so `$ref` names reach
/// the entity resolver unexpanded.
pub fn build_operations(
    spec: &OpenApiV3Spec,
    raw: &Value,
    warnings: &mut Vec<String>,
) -> Vec<OperationMeta> {
    let mut operations = Vec::new();
    let mut seen = HashSet::new();

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method_str, operation) in item.methods() {
                let method = method_str.clone();
                let declared = operation.operation_id.clone().unwrap_or_else(|| {
                    let synthesized = synthesize_operation_id(&method, path);
                    warnings.push(format!(
                        "missing operationId for {method} {path} → using '{synthesized}'"
                    ));
                    synthesized
                });
                let operation_id = unique_operation_id(&mut seen, &declared, warnings);

                let mut parameters = Vec::new();
                parameters.extend(extract_parameters(spec, &item.parameters));
                parameters.extend(extract_parameters(spec, &operation.parameters));

                let raw_op = raw_operation(raw, path, &method);
                let request_schema = raw_op.and_then(raw_request_schema);
                let response_schema = raw_op.and_then(raw_response_schema);
                let response_is_array = response_schema
                    .as_ref()
                    .map(has_list_shape)
                    .unwrap_or(false);

                operations.push(OperationMeta {
                    operation_id,
                    method,
                    path_pattern: path.clone(),
                    parameters,
                    request_schema,
                    response_schema,
                    response_is_array,
                });
            }
        }
    }

    operations
}
