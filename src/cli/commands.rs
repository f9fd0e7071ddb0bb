use crate::config::ProjectConfig;
use crate::error::print_warnings;
use crate::naming::VerbRules;
use crate::pipeline::{Pipeline, RunOptions};
use crate::registry::default_registry;
use crate::resolve::{group_operations, resolve_entity_for_group};
use crate::spec::load_document;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface for stratagen.
#[derive(Parser)]
#[command(name = "stratagen")]
#[command(about = "Layered backend source generator driven by OpenAPI specs", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate layered artifacts for configured domains
    Generate {
        /// Domain to generate (repeatable)
        #[arg(short, long, conflicts_with = "all")]
        domain: Vec<String>,

        /// Generate every configured domain
        #[arg(long)]
        all: bool,

        /// Restrict generation to specific layers (repeatable; default:
        /// every configured layer)
        #[arg(short, long)]
        layer: Vec<String>,

        /// Delete each domain's output directories before regenerating
        #[arg(long, default_value_t = false)]
        clean: bool,

        /// Skip the configured build command after generation
        #[arg(long, default_value_t = false)]
        no_build: bool,

        /// Path to the project configuration file
        #[arg(short, long, default_value = "stratagen.toml")]
        config: PathBuf,
    },
    /// Print classified operations and resolved entities for one spec
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

/// Parse arguments from the environment and execute.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    super::init_logging(cli.verbose);
    run(cli)
}

/// Execute an already-parsed CLI invocation.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            domain,
            all,
            layer,
            clean,
            no_build,
            config,
        } => {
            if !all && domain.is_empty() {
                anyhow::bail!("nothing to generate: pass --domain <name> or --all");
            }
            let config = ProjectConfig::load(&config)?;
            let mut registry = default_registry();
            let mut pipeline = Pipeline::new(&config, &mut registry)?;
            let summary = pipeline.run(&RunOptions {
                domains: if all { Vec::new() } else { domain },
                layers: layer,
                clean,
                no_build,
            })?;
            println!("✅ Generated {} file(s)", summary.files.len());
            print_warnings(&summary.warnings);
            Ok(())
        }
        Commands::Inspect { spec } => inspect(&spec),
    }
}

/// Development aid: show how one document classifies and resolves, without
/// writing anything.
fn inspect(spec: &Path) -> anyhow::Result<()> {
    let mut messages = Vec::new();
    let document = load_document(spec, &mut messages)?;
    let rules = VerbRules::standard();
    let groups = group_operations(&rules, &document.operations);

    println!("spec: {} ({} operations)", document.slug, document.operations.len());
    for group in &groups {
        let resolution = resolve_entity_for_group(group, &document.schemas, None);
        let marker = match (&resolution.entity, resolution.confident) {
            (Some(_), true) => "",
            (Some(_), false) => " (low confidence)",
            (None, _) => " (fallback)",
        };
        println!("\n{} → {}{marker}", group.resource, resolution.name());
        for op in &group.operations {
            println!(
                "  {:<7} {:<6} {} [{}]",
                op.verb.as_str(),
                op.meta.method.as_str(),
                op.meta.path_pattern,
                op.meta.operation_id
            );
        }
    }
    for message in messages {
        println!("⚠️  {message}");
    }
    Ok(())
}
