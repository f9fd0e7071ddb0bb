//! Per-domain generation context.
//!
//! One context is created per domain run, after the domain's spec is
//! loaded and before any generator executes; generators never create their
//! own. The `state` and `metadata` maps are scratch space scoped to the
//! run: later generators read structured facts earlier generators recorded
//! there (export lists, repository and handler names) instead of re-reading
//! emitted files, and both maps are discarded when the run ends.

use crate::config::{DomainConfig, DomainKind, ProjectConfig};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::naming::VerbRules;
use crate::resolve::{group_operations, ResourceGroup};
use crate::spec::SpecDocument;
use serde_json::Value;
use std::collections::HashMap;

/// Well-known `state` keys shared between generators.
pub mod state_keys {
    /// Prefix for per-layer export lists; the layer name is appended
    /// (`exports.core`). Written by leaf generators, read by the barrel
    /// generator and cross-domain post-processing.
    pub const EXPORTS_PREFIX: &str = "exports.";
    /// Repository interface names emitted for this domain.
    pub const REPOSITORIES: &str = "repositories";
    /// Handler function names emitted for this domain.
    pub const HANDLERS: &str = "handlers";
}

/// Aggregate of everything one domain's generators need.
pub struct GenerationContext<'a> {
    pub config: &'a ProjectConfig,
    pub layout: &'a Layout,
    pub rules: &'a VerbRules,
    pub domain: &'a DomainConfig,
    /// Loaded spec; absent for orchestrator domains.
    pub document: Option<SpecDocument>,
    /// Layer the currently-executing generator runs under.
    pub layer: String,
    /// Free-form cross-generator facts, discarded at run end.
    pub state: HashMap<String, Value>,
    /// Free-form annotations, discarded at run end.
    pub metadata: HashMap<String, Value>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        config: &'a ProjectConfig,
        layout: &'a Layout,
        rules: &'a VerbRules,
        domain: &'a DomainConfig,
        document: Option<SpecDocument>,
    ) -> Self {
        GenerationContext {
            config,
            layout,
            rules,
            domain,
            document,
            layer: String::new(),
            state: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn domain_name(&self) -> &str {
        &self.domain.name
    }

    pub fn is_orchestrator(&self) -> bool {
        self.domain.kind == DomainKind::Orchestrator
    }

    /// The loaded document.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for orchestrator domains, which never
    /// own a spec; a generator that needs one should not be configured to
    /// run under them.
    pub fn document(&self) -> Result<&SpecDocument> {
        self.document.as_ref().ok_or_else(|| {
            Error::config(format!(
                "domain '{}' has no OpenAPI document",
                self.domain.name
            ))
        })
    }

    /// Partition this domain's operations into resource groups.
    ///
    /// Recomputed per call on purpose: groups are cheap to derive and
    /// caching them across generators would let a mutation in one
    /// generator leak into the next.
    pub fn resource_groups(&self) -> Result<Vec<ResourceGroup>> {
        Ok(group_operations(self.rules, &self.document()?.operations))
    }

    /// Append a string to the list stored under `key`.
    pub fn push_state(&mut self, key: &str, value: impl Into<String>) {
        let entry = self
            .state
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = entry {
            items.push(Value::String(value.into()));
        }
    }

    /// The list stored under `key`, empty when absent.
    pub fn state_list(&self, key: &str) -> Vec<String> {
        self.state
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Record a module path exported from the current domain under `layer`.
    pub fn record_export(&mut self, layer: &str, module_path: impl Into<String>) {
        let key = format!("{}{layer}", state_keys::EXPORTS_PREFIX);
        self.push_state(&key, module_path);
    }

    /// Module paths exported under `layer`, in recording order.
    pub fn exports(&self, layer: &str) -> Vec<String> {
        self.state_list(&format!("{}{layer}", state_keys::EXPORTS_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> ProjectConfig {
        toml::from_str(
            r#"
            [project]
            name = "demo"

            [[domains]]
            name = "exchange"
            spec = "specs/exchange.yaml"

            [[domains]]
            name = "gateway"
            kind = "orchestrator"
            composes = ["exchange"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_state_lists_round_trip() {
        let config = config();
        let layout = Layout::new(Path::new("."), crate::config::default_layers());
        let rules = VerbRules::standard();
        let domain = config.domain("exchange").unwrap();
        let mut ctx = GenerationContext::new(&config, &layout, &rules, domain, None);

        ctx.record_export("core", "entities/order");
        ctx.record_export("core", "repositories/order.repository");
        ctx.push_state(state_keys::HANDLERS, "createOrder");

        assert_eq!(
            ctx.exports("core"),
            vec!["entities/order", "repositories/order.repository"]
        );
        assert_eq!(ctx.state_list(state_keys::HANDLERS), vec!["createOrder"]);
        assert!(ctx.exports("services").is_empty());
    }

    #[test]
    fn test_orchestrator_document_access_is_config_error() {
        let config = config();
        let layout = Layout::new(Path::new("."), crate::config::default_layers());
        let rules = VerbRules::standard();
        let domain = config.domain("gateway").unwrap();
        let ctx = GenerationContext::new(&config, &layout, &rules, domain, None);
        assert!(matches!(ctx.document(), Err(Error::Configuration(_))));
    }

}
