use super::templates::HandlerTemplate;
use super::{export_path, file_stem, resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::{state_keys, GenerationContext};
use crate::error::Result;
use crate::naming::pascal_case;
use askama::Template;

/// Emits one HTTP handler stub per operation.
///
/// Handler bodies are intentional TODO placeholders; the stub carries the
/// imports a real implementation will want — the operation's request
/// schemas and, when the repository generator ran earlier in this run, the
/// resource's repository interface.
pub struct HandlerGenerator;

impl Generator for HandlerGenerator {
    fn kind(&self) -> &'static str {
        "handler"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();
        let groups = resolved_groups(ctx)?;
        let repositories = ctx.state_list(state_keys::REPOSITORIES);
        let repository_layer = ctx.layout.layer_containing("repository").map(str::to_string);

        let mut handlers = Vec::new();
        for (group, resolution) in &groups {
            let entity = pascal_case(resolution.name());
            let repository = format!("{entity}Repository");
            let group_stem = file_stem(&group.resource);

            for op in &group.operations {
                let op_id = op.meta.operation_id.clone();
                let path = ctx
                    .layout
                    .file_path(&layer, &domain, self.kind(), &format!("{op_id}.ts"))?;

                let mut imports = Vec::new();
                if op.meta.request_schema.is_some() {
                    let schema_import = ctx.layout.import_path_to_file(
                        &path,
                        &layer,
                        "schema",
                        &domain,
                        &format!("{group_stem}.schemas.ts"),
                    )?;
                    imports.push(format!(
                        "import {{ {op_id}BodySchema }} from '{schema_import}';"
                    ));
                }
                if repositories.contains(&repository) {
                    if let Some(repo_layer) = &repository_layer {
                        let repo_import = ctx.layout.import_path_to_file(
                            &path,
                            repo_layer,
                            "repository",
                            &domain,
                            &format!("{group_stem}.repository.ts"),
                        )?;
                        imports.push(format!(
                            "import type {{ {repository} }} from '{repo_import}';"
                        ));
                    }
                }

                let rendered = HandlerTemplate {
                    name: op_id.clone(),
                    method: op.meta.method.as_str().to_string(),
                    path: op.meta.path_pattern.clone(),
                    imports,
                }
                .render()?;
                write_file(&path, &rendered)?;
                output.record(path);
                handlers.push(op_id);
            }
        }

        for op_id in handlers {
            let export = export_path(ctx, &layer, self.kind(), &op_id)?;
            ctx.record_export(&layer, export);
            ctx.push_state(state_keys::HANDLERS, op_id);
        }
        Ok(output)
    }
}
