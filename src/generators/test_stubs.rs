use super::templates::TestStubTemplate;
use super::{resolved_groups, write_file, Generator, GeneratorOutput};
use crate::context::{state_keys, GenerationContext};
use crate::error::Result;
use crate::naming::best_match;
use askama::Template;

/// Emits one vitest stub per operation.
///
/// The stub imports the operation's handler. The handler name is recovered
/// from the names the handler generator recorded this run, matched by verb
/// and spelling similarity; when nothing matches, the operation id stands
/// in and a warning flags the dangling import for review.
pub struct TestStubsGenerator;

impl Generator for TestStubsGenerator {
    fn kind(&self) -> &'static str {
        "tests"
    }

    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
        let mut output = GeneratorOutput::default();
        let layer = ctx.layer.clone();
        let domain = ctx.domain_name().to_string();
        let groups = resolved_groups(ctx)?;
        let handlers = ctx.state_list(state_keys::HANDLERS);
        let handler_layer = ctx.layout.layer_containing("handler").map(str::to_string);

        for (group, _) in &groups {
            for op in &group.operations {
                let op_id = &op.meta.operation_id;
                let handler = best_match(
                    ctx.rules,
                    op_id,
                    handlers.iter().map(String::as_str),
                )
                .map(str::to_string);
                let handler = match handler {
                    Some(name) => name,
                    None => {
                        output.warn(
                            ctx,
                            self.kind(),
                            format!("no generated handler matches '{op_id}', importing it anyway"),
                        );
                        op_id.clone()
                    }
                };

                let path = ctx.layout.file_path(
                    &layer,
                    &domain,
                    self.kind(),
                    &format!("{op_id}.test.ts"),
                )?;
                let handler_import = match &handler_layer {
                    Some(hl) => ctx.layout.import_path_to_file(
                        &path,
                        hl,
                        "handler",
                        &domain,
                        &format!("{handler}.ts"),
                    )?,
                    None => format!("./{handler}"),
                };

                let rendered = TestStubTemplate {
                    name: op_id.clone(),
                    handler,
                    handler_import,
                    method: op.meta.method.as_str().to_string(),
                    path: op.meta.path_pattern.clone(),
                }
                .render()?;
                write_file(&path, &rendered)?;
                output.record(path);
            }
        }
        Ok(output)
    }
}
