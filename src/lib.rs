//! # stratagen
//!
//! **stratagen** turns OpenAPI 3.x documents into layered backend
//! implementation artifacts: domain entity interfaces, repository
//! interfaces, zod request schemas, HTTP handler stubs, express route
//! registrations, DTO converters, barrel files, and vitest stubs.
//!
//! ## Architecture
//!
//! The library is organized into a pipeline over pure resolvers:
//!
//! - **[`spec`]** - OpenAPI 3.x loading and per-operation metadata
//!   extraction, with raw schema nodes preserved for name resolution
//! - **[`naming`]** - table-driven verb classification and resource-name
//!   extraction from operation identifiers
//! - **[`resolve`]** - envelope unwrapping to canonical entity names,
//!   `allOf`-alias resolution, and resource grouping
//! - **[`layout`]** - the declarative folder structure and the relative
//!   import-path calculator between generated locations
//! - **[`context`]** - the per-domain generation context and its
//!   cross-generator state store
//! - **[`registry`]** - explicit bootstrap-time generator registration
//!   with lazy instantiation
//! - **[`generators`]** - the leaf generators, one per artifact kind
//! - **[`pipeline`]** - the sequential per-domain orchestrator and
//!   cross-domain post-processing
//! - **[`config`]** - `stratagen.toml` loading and the built-in layer
//!   tables
//! - **[`cli`]** - the `stratagen` command-line interface
//!
//! ## Generation Flow
//!
//! ```text
//! OpenAPI spec → SpecDocument → resolvers (pure) → generators (file
//! writers) → post-processing (aggregate barrels, build command)
//! ```
//!
//! Data flows one direction. Generators communicate forward through the
//! context's state store — export lists, repository names, handler names —
//! never by parsing each other's emitted text. Everything is strictly
//! sequential; re-running a domain with `--clean` is byte-identical, and
//! idempotence rather than concurrency is the resource discipline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stratagen::config::ProjectConfig;
//! use stratagen::pipeline::{Pipeline, RunOptions};
//! use stratagen::registry::default_registry;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ProjectConfig::load("stratagen.toml".as_ref())?;
//! let mut registry = default_registry();
//! let mut pipeline = Pipeline::new(&config, &mut registry)?;
//! let summary = pipeline.run(&RunOptions::default())?;
//! println!("{} files", summary.files.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod generators;
pub mod layout;
pub mod naming;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod spec;

pub use context::GenerationContext;
pub use error::{Error, Result, Warning};
pub use generators::{Generator, GeneratorOutput};
pub use pipeline::{Pipeline, RunOptions, RunSummary};
pub use registry::{default_registry, GeneratorRegistry};
