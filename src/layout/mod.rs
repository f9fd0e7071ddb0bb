//! # Layout Module
//!
//! Declarative folder structure for the generated tree and the import-path
//! calculator between generated locations.
//!
//! Every path here is a pure function of configuration plus arguments.
//! Independently-invoked generators agree on each other's output locations
//! because they all ask the same questions of the same table; there is no
//! shared mutable path registry. A generator type with no location entry in
//! a layer is a loud configuration error, never a silently guessed path:
//! wrong import strings compile fine in generated TypeScript and only blow
//! up at the consumer's build, which is the worse failure.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Import alias used when two locations share no common ancestor.
pub const DEFAULT_IMPORT_ALIAS: &str = "@app";

/// Canonical execution order for the built-in layers. Layers not listed
/// here sort after, alphabetically.
pub const CANONICAL_LAYER_ORDER: [&str; 3] = ["core", "services", "tests"];

/// Where one generator writes inside a layer.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorLocation {
    /// Output directory relative to the layer base; `{domain}` is
    /// substituted at resolution time.
    pub output_dir: String,
    /// Single-file convention for the generator, if it has one. Also
    /// subject to `{domain}` substitution.
    #[serde(default)]
    pub main_file: Option<String>,
}

/// One layer of the generated architecture.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerStructure {
    pub base_path: PathBuf,
    /// Fallback import prefix for non-nested deployments.
    #[serde(default)]
    pub import_alias: Option<String>,
    /// Generator execution order within this layer.
    pub generator_order: Vec<String>,
    pub generators: BTreeMap<String, GeneratorLocation>,
}

/// The full per-layer folder structure, ready for path questions.
#[derive(Debug, Clone)]
pub struct Layout {
    layers: BTreeMap<String, LayerStructure>,
}

fn expand(template: &str, domain: &str) -> String {
    template.replace("{domain}", domain)
}

impl Layout {
    /// Build a layout from per-layer structures, prefixing every base path
    /// with `root`.
    pub fn new(root: &Path, mut layers: BTreeMap<String, LayerStructure>) -> Self {
        for layer in layers.values_mut() {
            layer.base_path = root.join(&layer.base_path);
        }
        Layout { layers }
    }

    pub fn layer(&self, name: &str) -> Result<&LayerStructure> {
        self.layers
            .get(name)
            .ok_or_else(|| Error::config(format!("layer '{name}' is not configured")))
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(|s| s.as_str())
    }

    /// Order the requested layers canonically (`core`, `services`, `tests`,
    /// then anything else alphabetically). An empty request means every
    /// configured layer.
    pub fn ordered_layers(&self, requested: &[String]) -> Result<Vec<String>> {
        let mut names: Vec<String> = if requested.is_empty() {
            self.layers.keys().cloned().collect()
        } else {
            for name in requested {
                self.layer(name)?;
            }
            requested.to_vec()
        };
        names.sort();
        names.dedup();
        names.sort_by_key(|name| {
            CANONICAL_LAYER_ORDER
                .iter()
                .position(|c| c == name)
                .unwrap_or(CANONICAL_LAYER_ORDER.len())
        });
        Ok(names)
    }

    /// The first layer (in canonical order) that configures `generator`.
    ///
    /// Used to aim cross-layer imports at a generator's home layer without
    /// hard-coding layer names into the generators themselves.
    pub fn layer_containing(&self, generator: &str) -> Option<&str> {
        let mut names: Vec<&String> = self.layers.keys().collect();
        names.sort_by_key(|name| {
            CANONICAL_LAYER_ORDER
                .iter()
                .position(|c| c == name)
                .unwrap_or(CANONICAL_LAYER_ORDER.len())
        });
        names
            .into_iter()
            .find(|name| {
                self.layers
                    .get(*name)
                    .map(|l| l.generators.contains_key(generator))
                    .unwrap_or(false)
            })
            .map(|s| s.as_str())
    }

    fn location(&self, layer: &str, generator: &str) -> Result<(&LayerStructure, &GeneratorLocation)> {
        let structure = self.layer(layer)?;
        let location = structure.generators.get(generator).ok_or_else(|| {
            Error::config(format!(
                "generator '{generator}' has no output location configured for layer '{layer}'"
            ))
        })?;
        Ok((structure, location))
    }

    /// The directory a generator writes into for one domain.
    pub fn output_dir(&self, layer: &str, domain: &str, generator: &str) -> Result<PathBuf> {
        let (structure, location) = self.location(layer, generator)?;
        Ok(structure.base_path.join(expand(&location.output_dir, domain)))
    }

    /// A named file inside a generator's output directory.
    pub fn file_path(
        &self,
        layer: &str,
        domain: &str,
        generator: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        Ok(self.output_dir(layer, domain, generator)?.join(file_name))
    }

    /// The generator's configured main file for one domain, if declared.
    pub fn main_file_path(
        &self,
        layer: &str,
        domain: &str,
        generator: &str,
    ) -> Result<Option<PathBuf>> {
        let (structure, location) = self.location(layer, generator)?;
        Ok(location.main_file.as_ref().map(|main| {
            structure
                .base_path
                .join(expand(&location.output_dir, domain))
                .join(expand(main, domain))
        }))
    }

    /// The root of one domain's output under a layer. Clean runs delete
    /// this directory before regenerating.
    pub fn domain_root(&self, layer: &str, domain: &str) -> Result<PathBuf> {
        Ok(self.layer(layer)?.base_path.join(domain))
    }

    /// Relative import string from `from_file` to a generator's location.
    ///
    /// Targets the generator's main file when one is declared, otherwise
    /// its directory. The result is extensionless and `./`-prefixed for
    /// sibling paths. When the two locations share no common root
    /// component, falls back to the layer's import alias instead of
    /// producing a `../` chain that crosses out of the tree.
    pub fn import_path(
        &self,
        from_file: &Path,
        layer: &str,
        to_generator: &str,
        domain: &str,
    ) -> Result<String> {
        let (structure, location) = self.location(layer, to_generator)?;
        let mut target = structure.base_path.join(expand(&location.output_dir, domain));
        if let Some(main) = &location.main_file {
            target = target.join(expand(main, domain));
        }
        Ok(self.relative_import(from_file, structure, &target))
    }

    /// Relative import string from `from_file` to a named file in a
    /// generator's output directory.
    pub fn import_path_to_file(
        &self,
        from_file: &Path,
        layer: &str,
        to_generator: &str,
        domain: &str,
        file_name: &str,
    ) -> Result<String> {
        let (structure, location) = self.location(layer, to_generator)?;
        let target = structure
            .base_path
            .join(expand(&location.output_dir, domain))
            .join(file_name);
        Ok(self.relative_import(from_file, structure, &target))
    }

    fn relative_import(&self, from_file: &Path, layer: &LayerStructure, target: &Path) -> String {
        let from_dir = from_file.parent().unwrap_or_else(|| Path::new(""));
        match relative_components(from_dir, target) {
            Some(relative) => strip_module_suffix(&relative),
            None => {
                let alias = layer
                    .import_alias
                    .as_deref()
                    .unwrap_or(DEFAULT_IMPORT_ALIAS);
                let under_base = target.strip_prefix(&layer.base_path).unwrap_or(target);
                let joined = format!("{alias}/{}", path_to_slash(under_base));
                strip_module_suffix(&joined)
            }
        }
    }
}

fn path_to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Compute a `../`-style relative path between two locations, walking
/// components only — no filesystem or cwd access. Returns `None` when the
/// paths share no leading component.
fn relative_components(from_dir: &Path, target: &Path) -> Option<String> {
    let from: Vec<&str> = from_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    let to: Vec<&str> = target
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 && !from.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for seg in &to[common..] {
        parts.push((*seg).to_string());
    }
    if parts.is_empty() {
        parts.push(".".to_string());
    }
    let joined = parts.join("/");
    if joined.starts_with("..") {
        Some(joined)
    } else {
        Some(format!("./{joined}"))
    }
}

/// Strip the module-resolution suffix TypeScript imports must not carry.
fn strip_module_suffix(path: &str) -> String {
    path.strip_suffix(".ts").unwrap_or(path).to_string()
}
