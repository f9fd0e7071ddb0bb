use super::templates::ConverterTemplate;
use super::{export_path, file_stem, resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::GenerationContext;
use crate::error::Result;
use crate::naming::pascal_case;
use askama::Template;
use std::collections::HashSet;

/// Emits entity ↔ DTO converter modules, one per resource group.
pub struct ConverterGenerator;

impl Generator for ConverterGenerator {
    fn kind(&self) -> &'static str {
        "converter"
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
        let mut exports = Vec::new();
        for (group, resolution) in &groups {
            let entity = pascal_case(resolution.name());
            if !seen.insert(entity.clone()) {
                continue;
            }

            let stem = file_stem(&group.resource);
            let path = ctx.layout.file_path(
                &layer,
                &domain,
                self.kind(),
                &format!("{stem}.converter.ts"),
            )?;
            let entity_import = ctx.layout.import_path_to_file(
                &path,
                &types_layer,
                "types",
                &domain,
                &format!("{}.ts", file_stem(&entity)),
            )?;

            let rendered = ConverterTemplate {
                entity,
                entity_import,
            }
            .render()?;
            write_file(&path, &rendered)?;
            output.record(path);
            exports.push(format!("{stem}.converter"));
        }

        for stem in exports {
            let export = export_path(ctx, &layer, self.kind(), &stem)?;
            ctx.record_export(&layer, export);
        }
        Ok(output)
    }
}
