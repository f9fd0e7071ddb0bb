use super::templates::{SchemasTemplate, ZodField, ZodSchema};
use super::tstype::{extract_properties, ts_property_name, zod_type};
use super::{export_path, file_stem, resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::GenerationContext;
use crate::error::Result;
use crate::naming::pascal_case;
use crate::spec::{OperationMeta, ParameterLocation};
use askama::Template;
use serde_json::Value;
use std::collections::BTreeMap;

/// Emits zod request-validation schemas, one module per resource group.
///
/// Each operation contributes a body schema (when it declares a JSON
/// request body) and a query schema (when it has query parameters). Names
/// derive from the operation id, so the handler generator can reference
/// them without shared state.
pub struct SchemaGenerator;

fn zod_fields(schema: &Value, table: &BTreeMap<String, Value>) -> Vec<ZodField> {
    extract_properties(schema, table)
        .into_iter()
        .map(|(name, prop, optional)| {
            let mut expr = zod_type(&prop);
            if optional {
                expr.push_str(".optional()");
            }
            ZodField {
                name: ts_property_name(&name),
                expr,
            }
        })
        .collect()
}

fn query_fields(op: &OperationMeta) -> Vec<ZodField> {
    op.parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Query)
        .map(|p| {
            let mut expr = p
                .schema
                .as_ref()
                .map(zod_type)
                .unwrap_or_else(|| "z.string()".to_string());
            if !p.required {
                expr.push_str(".optional()");
            }
            ZodField {
                name: ts_property_name(&p.name),
                expr,
            }
        })
        .collect()
}

impl Generator for SchemaGenerator {
    fn kind(&self) -> &'static str {
        "schema"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();
        let groups = resolved_groups(ctx)?;
        let table = ctx.document()?.schemas.clone();

        let mut exports = Vec::new();
        for (group, _) in &groups {
            let mut schemas = Vec::new();
            for op in &group.operations {
                let op_id = &op.meta.operation_id;
                if let Some(request) = &op.meta.request_schema {
                    schemas.push(ZodSchema {
                        const_name: format!("{op_id}BodySchema"),
                        type_name: format!("{}Body", pascal_case(op_id)),
                        fields: zod_fields(request, &table),
                    });
                }
                let query = query_fields(&op.meta);
                if !query.is_empty() {
                    schemas.push(ZodSchema {
                        const_name: format!("{op_id}QuerySchema"),
                        type_name: format!("{}Query", pascal_case(op_id)),
                        fields: query,
                    });
                }
            }
            if schemas.is_empty() {
                continue;
            }

            let stem = file_stem(&group.resource);
            let path = ctx.layout.file_path(
                &layer,
                &domain,
                self.kind(),
                &format!("{stem}.schemas.ts"),
            )?;
            let rendered = SchemasTemplate { schemas }.render()?;
            write_file(&path, &rendered)?;
            output.record(path);
            exports.push(format!("{stem}.schemas"));
        }

        for stem in exports {
            let export = export_path(ctx, &layer, self.kind(), &stem)?;
            ctx.record_export(&layer, export);
        }
        Ok(output)
    }
}
