//! # Generators Module
//!
//! Leaf generators, one per artifact kind. Each consumes the
//! [`GenerationContext`] plus the pure resolvers and emits zero or more
//! TypeScript files through askama templates.
//!
//! Generators are stateless between [`Generator::generate`] calls: the
//! same instance serves every domain in a run, and all per-run facts live
//! on the passed-in context. Cross-generator communication is explicit —
//! export lists, repository names, and handler names travel through the
//! context's `state` map, never by re-reading previously written files.

mod converter;
mod handler;
mod index;
mod repository;
mod routes;
mod schema;
pub(crate) mod templates;
mod test_stubs;
mod tstype;
mod types;

pub use converter::ConverterGenerator;
pub use handler::HandlerGenerator;
pub use index::IndexGenerator;
pub use repository::RepositoryGenerator;
pub use routes::RoutesGenerator;
pub use schema::SchemaGenerator;
pub use test_stubs::TestStubsGenerator;
pub use tstype::{extract_ts_fields, ts_property_name, ts_type, zod_type, TsField};
pub use types::TypesGenerator;

use crate::context::GenerationContext;
use crate::error::{Error, Result, Warning};
use crate::resolve::{resolve_entity_for_group, EntityResolution, ResourceGroup};
use std::path::{Path, PathBuf};

/// Result of one generator invocation.
#[derive(Debug, Default)]
pub struct GeneratorOutput {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl GeneratorOutput {
    pub fn record(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub fn warn(&mut self, ctx: &GenerationContext<'_>, generator: &str, message: impl Into<String>) {
        self.warnings
            .push(Warning::new(ctx.domain_name(), generator, message));
    }
}

/// A leaf generator.
pub trait Generator {
    /// Stable key the registry and layer tables refer to this generator by.
    fn kind(&self) -> &'static str;

    /// Emit this generator's files for one domain.
    fn generate(&self, ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput>;
}

/// Write a generated file, creating parent directories as needed.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| Error::io(path, e))?;
    println!("✅ Generated {}", path.display());
    Ok(())
}

/// kebab-case a PascalCase or camelCase name for use as a file stem.
pub(crate) fn file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' || c == ' ' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

/// Resource groups paired with their entity resolutions, recomputed per
/// generator invocation.
pub(crate) fn resolved_groups(
    ctx: &GenerationContext<'_>,
) -> Result<Vec<(ResourceGroup, EntityResolution)>> {
    let document = ctx.document()?;
    let groups = ctx.resource_groups()?;
    Ok(groups
        .into_iter()
        .map(|group| {
            let resolution =
                resolve_entity_for_group(&group, &document.schemas, Some(ctx.domain_name()));
            (group, resolution)
        })
        .collect())
}

/// Module path of a generated file relative to the domain's root under a
/// layer, as the barrel generator will re-export it.
pub(crate) fn export_path(
    ctx: &GenerationContext<'_>,
    layer: &str,
    generator: &str,
    stem: &str,
) -> Result<String> {
    let dir = ctx.layout.output_dir(layer, ctx.domain_name(), generator)?;
    let root = ctx.layout.domain_root(layer, ctx.domain_name())?;
    let rel = dir.strip_prefix(&root).unwrap_or_else(|_| Path::new(""));
    let mut parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    parts.push(stem);
    Ok(parts.join("/"))
}

/// Convert an OpenAPI path template to an express path.
pub(crate) fn express_path(path: &str) -> String {
    path.replace('{', ":").replace('}', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Order"), "order");
        assert_eq!(file_stem("OrderBook"), "order-book");
        assert_eq!(file_stem("auth_session"), "auth-session");
    }

    #[test]
    fn test_express_path() {
        assert_eq!(express_path("/orders/{id}"), "/orders/:id");
        assert_eq!(express_path("/a/{b}/c/{d}"), "/a/:b/c/:d");
    }
}
