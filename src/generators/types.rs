use super::templates::EntityTemplate;
use super::{export_path, file_stem, resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::GenerationContext;
use crate::error::Result;
use crate::generators::tstype::extract_ts_fields;
use crate::naming::pascal_case;
use crate::resolve::{EntityResolution, ResourceGroup};
use askama::Template;
use serde_json::Value;
use std::collections::HashSet;

/// Emits one domain entity interface per resource group.
///
/// This generator is the entity authority for a run: it is the one place
/// low-confidence resolutions surface as warnings, so the user sees each
/// ambiguity once rather than once per generator.
pub struct TypesGenerator;

/// The schema node an entity interface is built from.
///
/// A resolved entity name wins; otherwise the strongest-evidence response
/// schema stands in, unwrapped to its inline `data` object when the
/// envelope carries one.
fn entity_schema<'a>(
    group: &'a ResourceGroup,
    resolution: &EntityResolution,
    schemas: &'a std::collections::BTreeMap<String, Value>,
) -> Option<&'a Value> {
    if let Some(entity) = &resolution.entity {
        if let Some(schema) = schemas.get(entity) {
            return Some(schema);
        }
    }
    for op in &group.operations {
        let Some(schema) = op.meta.response_schema.as_ref() else {
            continue;
        };
        return Some(inline_data(schema).unwrap_or(schema));
    }
    None
}

/// An inline `data` object carried directly or by an `allOf` member.
fn inline_data(schema: &Value) -> Option<&Value> {
    let direct = schema.get("properties").and_then(|p| p.get("data"));
    let member = schema
        .get("allOf")
        .and_then(|v| v.as_array())
        .and_then(|members| {
            members
                .iter()
                .find_map(|m| m.get("properties").and_then(|p| p.get("data")))
        });
    direct
        .or(member)
        .filter(|d| d.get("$ref").is_none() && d.get("properties").is_some())
}

impl Generator for TypesGenerator {
    fn kind(&self) -> &'static str {
        "types"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();
        let groups = resolved_groups(ctx)?;
        let schemas = ctx.document()?.schemas.clone();

        let mut seen = HashSet::new();
        let mut exports = Vec::new();
        for (group, resolution) in &groups {
            if !resolution.confident {
                output.warn(
                    ctx,
                    self.kind(),
                    format!(
                        "no confident entity for resource '{}' → using '{}'",
                        group.resource,
                        resolution.name()
                    ),
                );
            }
            let name = pascal_case(resolution.name());
            if !seen.insert(name.clone()) {
                tracing::debug!(entity = %name, "entity already emitted, skipping duplicate");
                continue;
            }

            let fields = entity_schema(group, resolution, &schemas)
                .map(|schema| extract_ts_fields(schema, &schemas))
                .unwrap_or_default();

            let stem = file_stem(&name);
            let path = ctx
                .layout
                .file_path(&layer, &domain, self.kind(), &format!("{stem}.ts"))?;
            let rendered = EntityTemplate {
                name,
                fields,
            }
            .render()?;
            write_file(&path, &rendered)?;
            output.record(path);
            exports.push(export_path(ctx, &layer, self.kind(), &stem)?);
        }

        for export in exports {
            ctx.record_export(&layer, export);
        }
        Ok(output)
    }
}
