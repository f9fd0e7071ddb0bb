//! # Pipeline Module
//!
//! Per-domain orchestration. Each domain runs a linear state machine with
//! no retries:
//!
//! ```text
//! LOAD_SPEC → (optional) CLEAN_OUTPUT → RUN_GENERATORS → done | failed
//! ```
//!
//! Domains are processed strictly sequentially, and generators within a
//! domain run one at a time in the order the layer tables declare. The
//! first generator error aborts the whole run; warnings accumulate and are
//! reported at the end. Cross-domain post-processing runs exactly once
//! after every requested domain has completed, because it needs the union
//! of all domains' results.

mod postprocess;

use crate::config::{DomainConfig, DomainKind, ProjectConfig};
use crate::context::GenerationContext;
use crate::error::{Error, Result, Warning};
use crate::layout::Layout;
use crate::naming::VerbRules;
use crate::registry::GeneratorRegistry;
use crate::spec::load_document;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// What one `generate` invocation should do.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Domains to generate; empty means every configured domain.
    pub domains: Vec<String>,
    /// Layers to generate; empty means every configured layer.
    pub layers: Vec<String>,
    /// Delete each domain's output directories before regenerating.
    pub clean: bool,
    /// Skip the configured build command after post-processing.
    pub no_build: bool,
}

/// What a completed run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

/// The sequential generation pipeline.
pub struct Pipeline<'a> {
    config: &'a ProjectConfig,
    layout: Layout,
    rules: VerbRules,
    registry: &'a mut GeneratorRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ProjectConfig, registry: &'a mut GeneratorRegistry) -> Result<Self> {
        Ok(Pipeline {
            layout: config.layout(),
            rules: config.verb_rules()?,
            config,
            registry,
        })
    }

    /// Run generation for the selected domains, then post-process.
    pub fn run(&mut self, options: &RunOptions) -> Result<RunSummary> {
        let layers = self.layout.ordered_layers(&options.layers)?;
        let domains = self.select_domains(&options.domains)?;

        let mut summary = RunSummary::default();
        let mut produced: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for domain in domains {
            self.run_domain(domain, &layers, options.clean, &mut summary, &mut produced)?;
        }

        postprocess::write_aggregate_barrels(&self.layout, &produced, &mut summary)?;
        if !options.no_build {
            postprocess::run_build_command(self.config)?;
        }

        Ok(summary)
    }

    fn select_domains(&self, requested: &[String]) -> Result<Vec<&'a DomainConfig>> {
        if requested.is_empty() {
            if self.config.domains.is_empty() {
                return Err(Error::config("no domains configured"));
            }
            return Ok(self.config.domains.iter().collect());
        }
        requested
            .iter()
            .map(|name| self.config.domain(name))
            .collect()
    }

    /// One domain's linear run. Fail-fast: the first generator error
    /// propagates with domain and generator context attached.
    fn run_domain(
        &mut self,
        domain: &DomainConfig,
        layers: &[String],
        clean: bool,
        summary: &mut RunSummary,
        produced: &mut BTreeMap<String, BTreeSet<String>>,
    ) -> Result<()> {
        tracing::info!(domain = %domain.name, "generating");

        // LOAD_SPEC. Orchestrator domains compose other domains' artifacts
        // instead of owning a document; the skip is an explicit domain-type
        // branch, not an inference from a missing file.
        let document = match domain.kind {
            DomainKind::Orchestrator => None,
            DomainKind::Openapi => {
                let mut messages = Vec::new();
                let document = load_document(domain.spec_path()?, &mut messages)?;
                for message in messages {
                    summary
                        .warnings
                        .push(Warning::new(domain.name.clone(), "spec", message));
                }
                Some(document)
            }
        };

        let mut ctx = GenerationContext::new(
            self.config,
            &self.layout,
            &self.rules,
            domain,
            document,
        );

        // CLEAN_OUTPUT. Delete-then-regenerate so stale files from an
        // earlier schema version cannot linger.
        if clean {
            for layer in layers {
                let root = self.layout.domain_root(layer, &domain.name)?;
                if root.exists() {
                    std::fs::remove_dir_all(&root).map_err(|e| Error::io(&root, e))?;
                    tracing::debug!(path = %root.display(), "cleaned output directory");
                }
            }
        }

        // RUN_GENERATORS, in each layer's declared order.
        for layer in layers {
            let order = self.layout.layer(layer)?.generator_order.clone();
            for kind in order {
                if ctx.is_orchestrator() && kind != "index" {
                    continue;
                }
                if !self.registry.contains(&kind) {
                    tracing::debug!(generator = %kind, layer = %layer, "not registered, skipping");
                    continue;
                }
                let Some(generator) = self.registry.get(&kind) else {
                    continue;
                };
                ctx.layer = layer.clone();
                let output = generator.generate(&mut ctx).map_err(|e| match e {
                    e @ (Error::Configuration(_) | Error::Generation { .. }) => e,
                    other => Error::generation(&domain.name, &kind, other.to_string()),
                })?;
                if !output.files.is_empty() {
                    produced
                        .entry(layer.clone())
                        .or_default()
                        .insert(domain.name.clone());
                }
                summary.files.extend(output.files);
                summary.warnings.extend(output.warnings);
            }
        }

        // The context and its state/metadata scratch maps drop here; no
        // cross-run leakage.
        Ok(())
    }
}
