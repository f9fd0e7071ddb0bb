use super::templates::{RouteEntry, RoutesTemplate};
use super::{export_path, express_path, resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::naming::pascal_case;
use askama::Template;

/// Emits the express route registrations for one domain, wiring every
/// operation's path and method to its handler stub.
pub struct RoutesGenerator;

fn router_name(domain: &str) -> String {
    let pascal = pascal_case(domain);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => format!("{}{}Router", first.to_lowercase(), chars.as_str()),
        None => "router".to_string(),
    }
}

impl Generator for RoutesGenerator {
    fn kind(&self) -> &'static str {
        "routes"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();
        let groups = resolved_groups(ctx)?;

        let path = ctx
            .layout
            .main_file_path(&layer, &domain, self.kind())?
            .ok_or_else(|| {
                Error::config(format!(
                    "generator 'routes' needs a main_file in layer '{layer}'"
                ))
            })?;

        let mut imports = Vec::new();
        let mut routes = Vec::new();
        for (group, _) in &groups {
            for op in &group.operations {
                let op_id = &op.meta.operation_id;
                let handler_import = ctx.layout.import_path_to_file(
                    &path,
                    &layer,
                    "handler",
                    &domain,
                    &format!("{op_id}.ts"),
                )?;
                imports.push(format!("import {{ {op_id} }} from '{handler_import}';"));
                routes.push(RouteEntry {
                    method: op.meta.method.as_str().to_ascii_lowercase(),
                    path: express_path(&op.meta.path_pattern),
                    handler: op_id.clone(),
                });
            }
        }

        let rendered = RoutesTemplate {
            router_name: router_name(&domain),
            imports,
            routes,
        }
        .render()?;
        write_file(&path, &rendered)?;
        output.record(path);

        let export = export_path(ctx, &layer, self.kind(), &format!("{domain}.routes"))?;
        ctx.record_export(&layer, export);
        Ok(output)
    }
}
