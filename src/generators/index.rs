use super::templates::BarrelTemplate;
use super::{write_file, Generator, GeneratorOutput};
use crate::context::GenerationContext;
use crate::error::{Error, Result};
use askama::Template;

/// Emits the per-domain barrel `index.ts` for the current layer.
///
/// Regular domains re-export whatever the layer's leaf generators recorded
/// in the context's export list this run. Orchestrator domains own no spec
/// and instead re-export the domains they compose.
pub struct IndexGenerator;

impl Generator for IndexGenerator {
    fn kind(&self) -> &'static str {
        "index"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();

        let exports: Vec<String> = if ctx.is_orchestrator() {
            ctx.domain
                .composes
                .iter()
                .map(|composed| format!("../{composed}"))
                .collect()
        } else {
            ctx.exports(&layer)
                .into_iter()
                .map(|module| format!("./{module}"))
                .collect()
        };

        if exports.is_empty() {
            tracing::debug!(domain = %domain, layer = %layer, "no exports recorded, empty barrel");
        }

        let path = ctx
            .layout
            .main_file_path(&layer, &domain, self.kind())?
            .ok_or_else(|| {
                Error::config(format!(
                    "generator 'index' needs a main_file in layer '{layer}'"
                ))
            })?;
        let rendered = BarrelTemplate { exports }.render()?;
        write_file(&path, &rendered)?;
        output.record(path);
        Ok(output)
    }
}
