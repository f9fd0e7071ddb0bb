use super::templates::RepositoryTemplate;
use super::{export_path, file_stem, resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::{state_keys, GenerationContext};
use crate::error::Result;
use crate::naming::{pascal_case, Verb};
use askama::Template;
use std::collections::HashSet;

/// Emits one repository interface per resource group, with a method per
/// verb observed on the resource.
pub struct RepositoryGenerator;

fn method_signature(verb: Verb, entity: &str) -> String {
    match verb {
        Verb::Create => format!("create(data: {entity}): Promise<{entity}>;"),
        Verb::List => format!("list(): Promise<{entity}[]>;"),
        Verb::Get => format!("get(id: string): Promise<{entity} | null>;"),
        Verb::Update => format!("update(id: string, data: Partial<{entity}>): Promise<{entity}>;"),
        Verb::Delete => format!("delete(id: string): Promise<void>;"),
    }
}

impl Generator for RepositoryGenerator {
    fn kind(&self) -> &'static str {
        "repository"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();
        let groups = resolved_groups(ctx)?;
        let types_layer = ctx
            .layout
            .layer_containing("types")
            .unwrap_or(layer.as_str())
            .to_string();

        let mut seen = HashSet::new();
        let mut recorded = Vec::new();
        for (group, resolution) in &groups {
            let entity = pascal_case(resolution.name());
            let name = format!("{entity}Repository");
            if !seen.insert(name.clone()) {
                continue;
            }

            let entity_stem = file_stem(&entity);
            let stem = file_stem(&group.resource);
            let path = ctx.layout.file_path(
                &layer,
                &domain,
                self.kind(),
                &format!("{stem}.repository.ts"),
            )?;
            let entity_import = ctx.layout.import_path_to_file(
                &path,
                &types_layer,
                "types",
                &domain,
                &format!("{entity_stem}.ts"),
            )?;

            let methods = group
                .verbs()
                .into_iter()
                .map(|verb| method_signature(verb, &entity))
                .collect();

            let rendered = RepositoryTemplate {
                name: name.clone(),
                entity,
                entity_import,
                methods,
            }
            .render()?;
            write_file(&path, &rendered)?;
            output.record(path);
            recorded.push((format!("{stem}.repository"), name));
        }

        for (stem, name) in recorded {
            let export = export_path(ctx, &layer, self.kind(), &stem)?;
            ctx.record_export(&layer, export);
            ctx.push_state(state_keys::REPOSITORIES, name);
        }
        Ok(output)
    }
}
