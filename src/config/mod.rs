//! # Config Module
//!
//! Project configuration loaded from `stratagen.toml`: the domain list,
//! verb-classification overrides, and per-layer base-path adjustments on
//! top of the built-in folder structure.

mod layers;

pub use layers::default_layers;

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::naming::{Verb, VerbRules};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    /// Root the layer base paths are resolved under.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Command run once after post-processing, unless `--no-build`.
    #[serde(default)]
    pub build_command: Option<String>,
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainKind {
    /// Owns an OpenAPI document; the full generator set runs.
    Openapi,
    /// Composes other domains' generated artifacts; no spec is loaded and
    /// only the barrel generators run.
    Orchestrator,
}

impl Default for DomainKind {
    fn default() -> Self {
        DomainKind::Openapi
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    pub name: String,
    /// Path to the domain's OpenAPI document. Required unless the domain
    /// is an orchestrator.
    #[serde(default)]
    pub spec: Option<PathBuf>,
    #[serde(default)]
    pub kind: DomainKind,
    /// Domains an orchestrator re-exports.
    #[serde(default)]
    pub composes: Vec<String>,
}

impl DomainConfig {
    /// The spec path, required for OpenAPI domains.
    pub fn spec_path(&self) -> Result<&Path> {
        self.spec.as_deref().ok_or_else(|| {
            Error::config(format!("domain '{}' has no spec file configured", self.name))
        })
    }
}

/// One verb-classification override, prepended ahead of the standard table.
#[derive(Debug, Clone, Deserialize)]
pub struct NamingRule {
    pub pattern: String,
    pub verb: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamingSection {
    #[serde(default)]
    pub rules: Vec<NamingRule>,
}

/// Per-layer adjustments; everything not listed keeps its built-in value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerOverride {
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(default)]
    pub import_alias: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    #[serde(default)]
    pub domains: Vec<DomainConfig>,
    #[serde(default)]
    pub naming: NamingSection,
    #[serde(default)]
    pub layers: BTreeMap<String, LayerOverride>,
}

impl ProjectConfig {
    /// Load the project configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the file is missing,
    /// unreadable, or not valid TOML.
    pub fn load(path: &Path) -> Result<ProjectConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: ProjectConfig = toml::from_str(&contents)
            .map_err(|e| Error::config(format!("invalid config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for domain in &self.domains {
            match domain.kind {
                DomainKind::Openapi if domain.spec.is_none() => {
                    return Err(Error::config(format!(
                        "domain '{}' has no spec file configured",
                        domain.name
                    )));
                }
                DomainKind::Orchestrator if domain.composes.is_empty() => {
                    return Err(Error::config(format!(
                        "orchestrator domain '{}' composes no domains",
                        domain.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn domain(&self, name: &str) -> Result<&DomainConfig> {
        self.domains
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::config(format!("unknown domain '{name}'")))
    }

    /// Verb rules: the standard table with the config's overrides
    /// prepended. The first configured rule ends up with the highest
    /// priority.
    pub fn verb_rules(&self) -> Result<VerbRules> {
        let mut rules = VerbRules::standard();
        for rule in self.naming.rules.iter().rev() {
            let verb = Verb::parse(&rule.verb).ok_or_else(|| {
                Error::config(format!(
                    "unknown verb '{}' in naming rule '{}'",
                    rule.verb, rule.pattern
                ))
            })?;
            rules.prepend(&rule.pattern, verb)?;
        }
        Ok(rules)
    }

    /// The layout: built-in layer tables plus the config's overrides,
    /// rooted at `project.output_root`.
    pub fn layout(&self) -> Layout {
        let mut layers = default_layers();
        for (name, over) in &self.layers {
            if let Some(layer) = layers.get_mut(name) {
                if let Some(base) = &over.base_path {
                    layer.base_path = base.clone();
                }
                if let Some(alias) = &over.import_alias {
                    layer.import_alias = Some(alias.clone());
                }
            }
        }
        Layout::new(&self.project.output_root, layers)
    }
}
